//! Filesystem content store: markdown files with YAML front matter in a flat
//! directory. Files whose name starts with `_` are drafts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use metrics::counter;
use tokio::fs;
use tracing::warn;

use crate::application::content::{ContentError, ContentRepo, front_matter_block, parse_post};
use crate::domain::posts::Post;

const SOURCE: &str = "infra::content_fs::FsContentStore";

pub struct FsContentStore {
    directory: PathBuf,
}

impl FsContentStore {
    pub fn new(directory: PathBuf) -> Result<Self, ContentError> {
        if !directory.is_dir() {
            return Err(ContentError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("content directory `{}` does not exist", directory.display()),
            )));
        }
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Scan the directory and parse every markdown file. Files that fail to
    /// parse are logged and skipped so one bad draft cannot take down every
    /// page.
    async fn scan(&self) -> Result<Vec<(PathBuf, Post)>, ContentError> {
        counter!("ardesia_content_scans_total").increment(1);

        let mut entries = fs::read_dir(&self.directory).await?;
        let mut posts = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let draft = stem.starts_with('_');

            let source = fs::read_to_string(&path).await?;
            match parse_post(stem, &source, draft) {
                Ok(post) => posts.push((path, post)),
                Err(err) => {
                    warn!(
                        target = SOURCE,
                        file = %path.display(),
                        error = %err,
                        "skipping unparseable content file"
                    );
                }
            }
        }

        // Deterministic order for downstream sorting ties.
        posts.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(posts)
    }

    async fn locate(&self, slug: &str) -> Result<Option<(PathBuf, Post)>, ContentError> {
        if slug.is_empty() || slug.contains('/') || slug.contains("..") {
            return Err(ContentError::InvalidSlug(slug.to_string()));
        }
        Ok(self
            .scan()
            .await?
            .into_iter()
            .find(|(_, post)| post.slug() == slug))
    }
}

#[async_trait]
impl ContentRepo for FsContentStore {
    async fn list_posts(&self) -> Result<Vec<Post>, ContentError> {
        Ok(self.scan().await?.into_iter().map(|(_, post)| post).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        Ok(self.locate(slug).await?.map(|(_, post)| post))
    }

    async fn update_body(&self, slug: &str, markdown: &str) -> Result<(), ContentError> {
        let Some((path, _)) = self.locate(slug).await? else {
            return Err(ContentError::UnknownSlug(slug.to_string()));
        };

        let source = fs::read_to_string(&path).await?;
        let block = front_matter_block(&source).ok_or_else(|| ContentError::FrontMatter {
            file: path.display().to_string(),
            reason: "stored file lost its front matter".to_string(),
        })?;

        let mut updated = String::with_capacity(block.len() + markdown.len() + 2);
        updated.push_str(block);
        updated.push('\n');
        updated.push_str(markdown);
        if !markdown.ends_with('\n') {
            updated.push('\n');
        }

        fs::write(&path, updated).await?;
        counter!("ardesia_content_updates_total").increment(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---\ntitle: Hello\ndescription: A post\npublished_at: \"2025-06-20\"\nauthor: Someone\n---\n\nOriginal body.\n";

    fn store_with(files: &[(&str, &str)]) -> (tempfile::TempDir, FsContentStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).expect("write fixture");
        }
        let store = FsContentStore::new(dir.path().to_path_buf()).expect("store");
        (dir, store)
    }

    #[tokio::test]
    async fn lists_markdown_files_and_flags_drafts() {
        let (_dir, store) = store_with(&[
            ("hello.md", POST),
            ("_scratch.md", POST),
            ("notes.txt", "not content"),
        ]);

        let posts = store.list_posts().await.expect("list");
        assert_eq!(posts.len(), 2);
        let draft = posts.iter().find(|post| post.slug() == "scratch").expect("draft");
        assert!(draft.draft);
        let published = posts.iter().find(|post| post.slug() == "hello").expect("post");
        assert!(!published.draft);
    }

    #[tokio::test]
    async fn skips_files_with_broken_front_matter() {
        let (_dir, store) = store_with(&[("hello.md", POST), ("broken.md", "no fences here")]);
        let posts = store.list_posts().await.expect("list");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug(), "hello");
    }

    #[tokio::test]
    async fn update_body_preserves_front_matter() {
        let (dir, store) = store_with(&[("hello.md", POST)]);

        store
            .update_body("hello", "Rewritten body.")
            .await
            .expect("update");

        let rewritten = std::fs::read_to_string(dir.path().join("hello.md")).expect("read back");
        assert!(rewritten.starts_with("---\ntitle: Hello\n"));
        assert!(rewritten.contains("published_at: \"2025-06-20\""));
        assert!(rewritten.ends_with("Rewritten body.\n"));
        assert!(!rewritten.contains("Original body."));

        let post = store
            .find_by_slug("hello")
            .await
            .expect("find")
            .expect("still present");
        assert_eq!(post.body_markdown, "Rewritten body.\n");
    }

    #[tokio::test]
    async fn update_rejects_unknown_and_malformed_slugs() {
        let (_dir, store) = store_with(&[("hello.md", POST)]);

        let err = store
            .update_body("missing", "body")
            .await
            .expect_err("unknown slug");
        assert!(matches!(err, ContentError::UnknownSlug(_)));

        let err = store
            .update_body("../etc/passwd", "body")
            .await
            .expect_err("traversal");
        assert!(matches!(err, ContentError::InvalidSlug(_)));
    }

    #[tokio::test]
    async fn missing_directory_is_rejected_at_construction() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        assert!(FsContentStore::new(missing).is_err());
    }
}

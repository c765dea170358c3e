//! Content repository seam and front matter handling.
//!
//! Posts live as markdown files with a YAML front matter block between `---`
//! fences. The repository trait is what the services consume; the filesystem
//! adapter lives in `infra::content_fs` and tests substitute an in-memory one.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    error::DomainError,
    posts::{Post, PostAttributes, resolve_slug},
};

pub const FRONT_MATTER_FENCE: &str = "---";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed front matter in `{file}`: {reason}")]
    FrontMatter { file: String, reason: String },
    #[error("post `{0}` not found")]
    UnknownSlug(String),
    #[error("invalid slug `{0}`")]
    InvalidSlug(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// Every post in the store, drafts included. Callers apply visibility
    /// rules via `domain::posts`.
    async fn list_posts(&self) -> Result<Vec<Post>, ContentError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError>;

    /// Replace a post's markdown body, preserving its front matter verbatim.
    async fn update_body(&self, slug: &str, markdown: &str) -> Result<(), ContentError>;
}

/// Split a content file into its front matter and markdown body.
///
/// The file must open with a `---` fence on the first line; the front matter
/// runs until the next line consisting solely of `---`.
pub fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix(FRONT_MATTER_FENCE)?;
    let rest = rest
        .strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == FRONT_MATTER_FENCE {
            let front_matter = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((front_matter, body));
        }
        offset += line.len();
    }
    None
}

/// The complete opening block of a content file, fences included. Used when
/// rewriting a file body so the stored front matter survives byte-for-byte.
pub fn front_matter_block(source: &str) -> Option<&str> {
    let (_, body) = split_front_matter(source)?;
    let block_len = source.len() - body.len();
    Some(&source[..block_len])
}

/// Parse one content file into a [`Post`].
pub fn parse_post(file_stem: &str, source: &str, draft: bool) -> Result<Post, ContentError> {
    let (front_matter, body) = split_front_matter(source).ok_or_else(|| {
        ContentError::FrontMatter {
            file: file_stem.to_string(),
            reason: "missing opening or closing `---` fence".to_string(),
        }
    })?;

    let mut attributes: PostAttributes =
        serde_yaml::from_str(front_matter).map_err(|err| ContentError::FrontMatter {
            file: file_stem.to_string(),
            reason: err.to_string(),
        })?;

    resolve_slug(&mut attributes, file_stem)?;

    Ok(Post {
        attributes,
        body_markdown: body.trim_start_matches(['\n', '\r']).to_string(),
        draft,
    })
}

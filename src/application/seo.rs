//! Per-page SEO metadata: document title plus the Open Graph and Twitter card
//! meta set, written directly into the head model.
//!
//! These elements are foreign to the link tag manager; it must never remove
//! them.

use crate::config::SiteSettings;
use crate::domain::head::DocumentHead;

/// The page-specific inputs the metadata set is derived from.
#[derive(Debug, Clone)]
pub struct PageSeo {
    pub title: String,
    pub description: String,
    /// Site-relative or absolute image URL; falls back to the configured
    /// default social image.
    pub image: Option<String>,
    /// Site-relative path of the page, e.g. `/blog/some-post`.
    pub path: String,
}

#[derive(Clone)]
pub struct SeoService {
    site: SiteSettings,
}

impl SeoService {
    pub fn new(site: SiteSettings) -> Self {
        Self { site }
    }

    /// Document title: `{page} - {site}`.
    pub fn page_title(&self, title: &str) -> String {
        format!("{} - {}", title, self.site.title)
    }

    /// Absolutize a site-relative path against the configured public URL.
    /// Already-absolute URLs pass through unchanged.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let trimmed = path.trim_start_matches('/');
        format!("{}/{trimmed}", self.site.public_url)
    }

    /// Write the full metadata set for a page into the head, replacing any
    /// values a previous page left behind.
    pub fn apply(&self, head: &mut DocumentHead, page: &PageSeo) {
        head.set_title(self.page_title(&page.title));

        head.upsert_meta("title", &page.title);
        if !self.site.author.is_empty() {
            head.upsert_meta("author", &self.site.author);
        }
        head.upsert_meta("description", &page.description);

        // Open Graph
        head.upsert_meta("og:url", self.absolute_url(&page.path));
        head.upsert_meta("og:title", &page.title);
        head.upsert_meta("og:description", &page.description);

        let image = page
            .image
            .clone()
            .or_else(|| self.site.default_social_image.clone())
            .map(|image| self.absolute_url(&image));
        if let Some(image) = image.as_ref() {
            head.upsert_meta("og:image", image);
        }

        // Twitter card
        head.upsert_meta("twitter:card", "summary_large_image");
        if !self.site.social_handle.is_empty() {
            head.upsert_meta("twitter:site", &self.site.social_handle);
            head.upsert_meta("twitter:creator", &self.site.social_handle);
        }
        head.upsert_meta("twitter:title", &page.title);
        head.upsert_meta("twitter:description", &page.description);
        if let Some(image) = image.as_ref() {
            head.upsert_meta("twitter:image", image);
            head.upsert_meta("twitter:image:alt", &page.title);
        }
        if !self.site.author.is_empty() {
            head.upsert_meta("twitter:label1", "Written by");
            head.upsert_meta("twitter:data1", &self.site.author);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::head::HeadNode;

    fn site() -> SiteSettings {
        SiteSettings {
            title: "Ardesia".to_string(),
            tagline: String::new(),
            public_url: "https://blog.example.com".to_string(),
            author: "R. Ferri".to_string(),
            social_handle: "@rferri".to_string(),
            default_social_image: Some("/static/cover-default.png".to_string()),
            analytics_tag: None,
            previous_articles: 2,
        }
    }

    fn meta<'a>(head: &'a DocumentHead, name: &str) -> Option<&'a str> {
        head.nodes().iter().find_map(|node| match node {
            HeadNode::Meta {
                name: meta_name,
                content,
            } if meta_name == name => Some(content.as_str()),
            _ => None,
        })
    }

    fn page() -> PageSeo {
        PageSeo {
            title: "Hello".to_string(),
            description: "A post".to_string(),
            image: Some("/covers/hello.png".to_string()),
            path: "/blog/hello".to_string(),
        }
    }

    #[test]
    fn applies_title_and_social_meta_set() {
        let seo = SeoService::new(site());
        let mut head = DocumentHead::new();
        seo.apply(&mut head, &page());

        assert!(head.render_html().contains("<title>Hello - Ardesia</title>"));
        assert_eq!(meta(&head, "og:url"), Some("https://blog.example.com/blog/hello"));
        assert_eq!(
            meta(&head, "og:image"),
            Some("https://blog.example.com/covers/hello.png")
        );
        assert_eq!(meta(&head, "twitter:card"), Some("summary_large_image"));
        assert_eq!(meta(&head, "twitter:site"), Some("@rferri"));
        assert_eq!(meta(&head, "twitter:data1"), Some("R. Ferri"));
    }

    #[test]
    fn falls_back_to_default_social_image() {
        let seo = SeoService::new(site());
        let mut head = DocumentHead::new();
        let mut page = page();
        page.image = None;
        seo.apply(&mut head, &page);

        assert_eq!(
            meta(&head, "og:image"),
            Some("https://blog.example.com/static/cover-default.png")
        );
    }

    #[test]
    fn skips_authorship_meta_when_unconfigured() {
        let mut site = site();
        site.author = String::new();
        site.social_handle = String::new();
        site.default_social_image = None;

        let seo = SeoService::new(site);
        let mut head = DocumentHead::new();
        let mut page = page();
        page.image = None;
        seo.apply(&mut head, &page);

        assert!(meta(&head, "author").is_none());
        assert!(meta(&head, "twitter:site").is_none());
        assert!(meta(&head, "og:image").is_none());
    }

    #[test]
    fn reapplying_for_a_new_page_replaces_rather_than_accumulates() {
        let seo = SeoService::new(site());
        let mut head = DocumentHead::new();
        seo.apply(&mut head, &page());
        let count_first = head.nodes().len();

        let mut second = page();
        second.title = "Another".to_string();
        second.path = "/blog/another".to_string();
        seo.apply(&mut head, &second);

        assert_eq!(head.nodes().len(), count_first);
        assert_eq!(
            meta(&head, "og:url"),
            Some("https://blog.example.com/blog/another")
        );
    }

    #[test]
    fn absolute_image_urls_pass_through() {
        let seo = SeoService::new(site());
        assert_eq!(
            seo.absolute_url("https://cdn.example.com/x.png"),
            "https://cdn.example.com/x.png"
        );
    }
}

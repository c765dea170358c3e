//! Sitemap service for sitemap.xml and robots.txt generation.

use std::sync::Arc;

use thiserror::Error;
use time::Date;

use crate::application::content::{ContentError, ContentRepo};
use crate::config::SiteSettings;
use crate::domain::posts;

pub const STATIC_ROUTES: [&str; 4] = ["/", "/blog", "/about", "/privacy-policy"];

#[derive(Clone)]
pub struct SitemapService {
    content: Arc<dyn ContentRepo>,
    site: SiteSettings,
}

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl SitemapService {
    pub fn new(content: Arc<dyn ContentRepo>, site: SiteSettings) -> Self {
        Self { content, site }
    }

    /// Every production route: the static pages plus one `/blog/{slug}` per
    /// published post. This is also the prerender route list.
    pub async fn production_routes(&self, today: Date) -> Result<Vec<String>, SitemapError> {
        let stored = self.content.list_posts().await?;

        let mut routes: Vec<String> = STATIC_ROUTES.iter().map(|route| route.to_string()).collect();
        for post in posts::published(&stored, today) {
            routes.push(format!("/blog/{}", post.slug()));
        }
        Ok(routes)
    }

    pub async fn sitemap_xml(&self, today: Date) -> Result<String, SitemapError> {
        let stored = self.content.list_posts().await?;

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for route in STATIC_ROUTES {
            xml.push_str(&sitemap_entry(&self.site.public_url, route, None));
        }
        for post in posts::published(&stored, today) {
            xml.push_str(&sitemap_entry(
                &self.site.public_url,
                &format!("/blog/{}", post.slug()),
                Some(post.attributes.published_at),
            ));
        }
        xml.push_str("</urlset>\n");
        Ok(xml)
    }

    pub fn robots_txt(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
            self.site.public_url
        )
    }
}

fn sitemap_entry(base: &str, path: &str, lastmod: Option<Date>) -> String {
    let loc = if path == "/" {
        base.to_string()
    } else {
        format!("{base}{path}")
    };
    match lastmod.map(posts::format_iso_date) {
        Some(lastmod) => format!("  <url><loc>{loc}</loc><lastmod>{lastmod}</lastmod></url>\n"),
        None => format!("  <url><loc>{loc}</loc></url>\n"),
    }
}

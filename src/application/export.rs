//! Static export: render every production route to files on disk.
//!
//! The exporter walks the route list with a single long-lived head model,
//! the same way a browsing session walks pages, so the canonical-link
//! lifecycle (attach, replace, clear) is exercised for real: a post that
//! declares a canonical URL must never leak it into the next document.

use std::path::{Path, PathBuf};

use askama::Template;
use thiserror::Error;
use time::Date;
use tokio::fs;
use tracing::info;

use crate::application::chrome::ChromeService;
use crate::application::feed::{FeedError, FeedService};
use crate::application::sitemap::{SitemapError, SitemapService};
use crate::config::SiteSettings;
use crate::presentation::views::{
    AboutContext, AboutTemplate, BlogIndexContext, BlogIndexTemplate, HomeContext, HomeTemplate,
    LayoutContext, PostTemplate, PrivacyContext, PrivacyTemplate,
};

#[derive(Debug)]
pub struct ExportReport {
    pub documents: usize,
    pub out_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Sitemap(#[from] SitemapError),
    #[error("failed to render `{route}`: {source}")]
    Render {
        route: String,
        #[source]
        source: askama::Error,
    },
    #[error("post route `{0}` has no backing content")]
    MissingPost(String),
}

pub struct ExportService {
    feed: FeedService,
    chrome: ChromeService,
    sitemap: SitemapService,
    site: SiteSettings,
}

impl ExportService {
    pub fn new(
        feed: FeedService,
        chrome: ChromeService,
        sitemap: SitemapService,
        site: SiteSettings,
    ) -> Self {
        Self {
            feed,
            chrome,
            sitemap,
            site,
        }
    }

    pub async fn export(&self, out_dir: &Path, today: Date) -> Result<ExportReport, ExportError> {
        fs::create_dir_all(out_dir).await?;

        // One head for the whole walk; composing each route replaces the
        // previous page's metadata and canonical slot.
        let mut links = self.chrome.fresh_head();
        let mut documents = 0;

        for route in self.sitemap.production_routes(today).await? {
            let html = match route.as_str() {
                "/" => {
                    let chrome = self.chrome.compose(&mut links, &self.chrome.home_request());
                    let content = HomeContext {
                        recent: self.feed.home_rail(today).await?,
                    };
                    render_route(&route, HomeTemplate {
                        view: LayoutContext::new(chrome, content),
                    })?
                }
                "/blog" => {
                    let chrome = self
                        .chrome
                        .compose(&mut links, &self.chrome.blog_index_request());
                    let content = BlogIndexContext {
                        posts: self.feed.blog_index(today).await?,
                    };
                    render_route(&route, BlogIndexTemplate {
                        view: LayoutContext::new(chrome, content),
                    })?
                }
                "/about" => {
                    let chrome = self.chrome.compose(&mut links, &self.chrome.about_request());
                    render_route(&route, AboutTemplate {
                        view: LayoutContext::new(chrome, AboutContext),
                    })?
                }
                "/privacy-policy" => {
                    let chrome = self
                        .chrome
                        .compose(&mut links, &self.chrome.privacy_request());
                    render_route(&route, PrivacyTemplate {
                        view: LayoutContext::new(chrome, PrivacyContext),
                    })?
                }
                _ => {
                    let slug = route.trim_start_matches("/blog/");
                    let detail = self
                        .feed
                        .post_detail(slug, today)
                        .await?
                        .ok_or_else(|| ExportError::MissingPost(route.clone()))?;
                    let canonical = self.feed.canonical_url(slug).await?;
                    let chrome = self
                        .chrome
                        .compose(&mut links, &self.chrome.post_request(&detail, canonical));
                    render_route(&route, PostTemplate {
                        view: LayoutContext::new(chrome, detail),
                    })?
                }
            };

            write_document(out_dir, &route, &self.decorate(html)).await?;
            documents += 1;
        }

        // The walk is over; nothing page-scoped may survive it.
        self.chrome.teardown(&mut links);

        fs::write(
            out_dir.join("sitemap.xml"),
            self.sitemap.sitemap_xml(today).await?,
        )
        .await?;
        fs::write(out_dir.join("robots.txt"), self.sitemap.robots_txt()).await?;

        info!(
            target = "ardesia::export",
            documents,
            out_dir = %out_dir.display(),
            "export completed"
        );

        Ok(ExportReport {
            documents,
            out_dir: out_dir.to_path_buf(),
        })
    }

    /// Post-render decoration: append the analytics snippet when a
    /// measurement id is configured.
    fn decorate(&self, html: String) -> String {
        match &self.site.analytics_tag {
            Some(tag) => format!("{html}{}", analytics_snippet(tag)),
            None => html,
        }
    }
}

fn render_route<T: Template>(route: &str, template: T) -> Result<String, ExportError> {
    template.render().map_err(|source| ExportError::Render {
        route: route.to_string(),
        source,
    })
}

async fn write_document(out_dir: &Path, route: &str, html: &str) -> Result<(), ExportError> {
    let mut path = out_dir.to_path_buf();
    for segment in route.split('/').filter(|segment| !segment.is_empty()) {
        path.push(segment);
    }
    fs::create_dir_all(&path).await?;
    fs::write(path.join("index.html"), html).await?;
    Ok(())
}

fn analytics_snippet(tag: &str) -> String {
    format!(
        "\n<script async src=\"https://www.googletagmanager.com/gtag/js?id={tag}\"></script>\n\
         <script>window.dataLayer=window.dataLayer||[];function gtag(){{dataLayer.push(arguments);}}gtag('js',new Date());gtag('config','{tag}');</script>\n"
    )
}

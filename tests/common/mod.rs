#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use ardesia::application::{
    chrome::ChromeService, content::ContentRepo, feed::FeedService, render::render_service,
    sitemap::SitemapService,
};
use ardesia::config::SiteSettings;
use ardesia::infra::{
    content_fs::FsContentStore,
    http::{HttpState, build_router},
};

pub fn site_settings() -> SiteSettings {
    SiteSettings {
        title: "Ardesia".to_string(),
        tagline: "Notes on small software.".to_string(),
        public_url: "https://blog.example.com".to_string(),
        author: "R. Ferri".to_string(),
        social_handle: "@rferri".to_string(),
        default_social_image: None,
        analytics_tag: None,
        previous_articles: 2,
    }
}

pub fn write_post(
    dir: &Path,
    file_name: &str,
    title: &str,
    date: &str,
    canonical: Option<&str>,
    body: &str,
) {
    let canonical_line = canonical
        .map(|url| format!("canonical_url: {url}\n"))
        .unwrap_or_default();
    let source = format!(
        "---\ntitle: {title}\ndescription: About {title}.\ntags: [testing]\npublished_at: \"{date}\"\nauthor: R. Ferri\n{canonical_line}---\n\n{body}\n"
    );
    std::fs::write(dir.join(file_name), source).expect("write content fixture");
}

pub fn router_for(content_dir: &Path, include_drafts: bool) -> Router {
    let store = FsContentStore::new(content_dir.to_path_buf()).expect("content store");
    let content: Arc<dyn ContentRepo> = Arc::new(store);
    let site = site_settings();

    build_router(HttpState {
        feed: Arc::new(FeedService::new(
            content.clone(),
            render_service(),
            site.clone(),
            include_drafts,
        )),
        chrome: Arc::new(ChromeService::new(site.clone())),
        sitemap: Arc::new(SitemapService::new(content.clone(), site)),
        content,
    })
}

pub async fn get(router: &Router, path: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("router response");

    let status = response.status();
    let body = body_to_string(response.into_body()).await;
    (status, body)
}

pub async fn post_json(router: &Router, path: &str, payload: &str) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("build request"),
        )
        .await
        .expect("router response");

    let status = response.status();
    let body = body_to_string(response.into_body()).await;
    (status, body)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.expect("collect body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

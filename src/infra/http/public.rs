use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use time::{Date, OffsetDateTime};

use crate::{
    application::{
        chrome::ChromeService,
        content::ContentRepo,
        error::HttpError,
        feed::{FeedError, FeedService},
        sitemap::SitemapService,
    },
    presentation::views::{
        AboutContext, AboutTemplate, BlogIndexContext, BlogIndexTemplate, HomeContext,
        HomeTemplate, LayoutContext, PostTemplate, PrivacyContext, PrivacyTemplate,
        render_not_found_response, render_template_response,
    },
};

use super::{
    api,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub chrome: Arc<ChromeService>,
    pub sitemap: Arc<SitemapService>,
    pub content: Arc<dyn ContentRepo>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/blog", get(blog_index))
        .route("/blog/{slug}", get(post_detail))
        .route("/about", get(about))
        .route("/privacy-policy", get(privacy_policy))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots_txt))
        .route("/static/{*path}", get(crate::infra::assets::serve_static))
        .merge(api::build_router())
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

async fn home(State(state): State<HttpState>) -> Response {
    match state.feed.home_rail(today()).await {
        Ok(recent) => {
            let mut links = state.chrome.fresh_head();
            let chrome = state.chrome.compose(&mut links, &state.chrome.home_request());
            render_template_response(
                HomeTemplate {
                    view: LayoutContext::new(chrome, HomeContext { recent }),
                },
                StatusCode::OK,
            )
        }
        Err(err) => feed_error_to_response("infra::http::public::home", err),
    }
}

async fn blog_index(State(state): State<HttpState>) -> Response {
    match state.feed.blog_index(today()).await {
        Ok(posts) => {
            let mut links = state.chrome.fresh_head();
            let chrome = state
                .chrome
                .compose(&mut links, &state.chrome.blog_index_request());
            render_template_response(
                BlogIndexTemplate {
                    view: LayoutContext::new(chrome, BlogIndexContext { posts }),
                },
                StatusCode::OK,
            )
        }
        Err(err) => feed_error_to_response("infra::http::public::blog_index", err),
    }
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::post_detail";

    let detail = match state.feed.post_detail(&slug, today()).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return not_found(State(state)).await,
        Err(err) => return feed_error_to_response(SOURCE, err),
    };

    let canonical = match state.feed.canonical_url(&slug).await {
        Ok(canonical) => canonical,
        Err(err) => return feed_error_to_response(SOURCE, err),
    };

    let mut links = state.chrome.fresh_head();
    let chrome = state
        .chrome
        .compose(&mut links, &state.chrome.post_request(&detail, canonical));
    render_template_response(
        PostTemplate {
            view: LayoutContext::new(chrome, detail),
        },
        StatusCode::OK,
    )
}

async fn about(State(state): State<HttpState>) -> Response {
    let mut links = state.chrome.fresh_head();
    let chrome = state.chrome.compose(&mut links, &state.chrome.about_request());
    render_template_response(
        AboutTemplate {
            view: LayoutContext::new(chrome, AboutContext),
        },
        StatusCode::OK,
    )
}

async fn privacy_policy(State(state): State<HttpState>) -> Response {
    let mut links = state.chrome.fresh_head();
    let chrome = state
        .chrome
        .compose(&mut links, &state.chrome.privacy_request());
    render_template_response(
        PrivacyTemplate {
            view: LayoutContext::new(chrome, PrivacyContext),
        },
        StatusCode::OK,
    )
}

async fn not_found(State(state): State<HttpState>) -> Response {
    let mut links = state.chrome.fresh_head();
    let chrome = state
        .chrome
        .compose(&mut links, &state.chrome.not_found_request());
    render_not_found_response(chrome)
}

async fn sitemap(State(state): State<HttpState>) -> Response {
    match state.sitemap.sitemap_xml(today()).await {
        Ok(body) => xml_response(body, "application/xml"),
        Err(err) => HttpError::from_error(
            "infra::http::public::sitemap",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate sitemap",
            &err,
        )
        .into_response(),
    }
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    plain_response(state.sitemap.robots_txt())
}

fn feed_error_to_response(source: &'static str, err: FeedError) -> Response {
    HttpError::from_error(
        source,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to load content",
        &err,
    )
    .into_response()
}

fn xml_response(body: String, content_type: &str) -> Response {
    use axum::{body::Body, http::header::CONTENT_TYPE};

    axum::http::Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn plain_response(body: String) -> Response {
    use axum::{body::Body, http::header::CONTENT_TYPE};

    axum::http::Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

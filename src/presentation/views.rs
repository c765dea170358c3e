use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::{ErrorReport, HttpError};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Site identity rendered into the layout shell.
#[derive(Clone)]
pub struct SiteView {
    pub title: String,
    pub tagline: String,
    pub author: String,
    pub social_handle: String,
}

#[derive(Clone)]
pub struct BreadcrumbView {
    pub url: String,
    pub label: String,
}

/// Everything the base layout needs besides the page content: site identity,
/// the serialized head fragment, and the breadcrumb trail.
#[derive(Clone)]
pub struct LayoutChrome {
    pub site: SiteView,
    pub head_html: String,
    pub breadcrumbs: Vec<BreadcrumbView>,
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site: SiteView,
    pub head_html: String,
    pub breadcrumbs: Vec<BreadcrumbView>,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            site: chrome.site,
            head_html: chrome.head_html,
            breadcrumbs: chrome.breadcrumbs,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub cover_image: String,
    pub cover_image_alt: String,
    pub iso_date: String,
    pub published: String,
    pub tags: Vec<String>,
}

pub struct HomeContext {
    pub recent: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub view: LayoutContext<HomeContext>,
}

pub struct BlogIndexContext {
    pub posts: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "blog_index.html")]
pub struct BlogIndexTemplate {
    pub view: LayoutContext<BlogIndexContext>,
}

pub struct PostDetailContext {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub cover_image: String,
    pub cover_image_alt: String,
    pub iso_date: String,
    pub published: String,
    pub tags: Vec<String>,
    pub content_html: String,
    /// Absolute URL of this post, used by the share links.
    pub share_url: String,
    pub previous: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

pub struct AboutContext;

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub view: LayoutContext<AboutContext>,
}

pub struct PrivacyContext;

#[derive(Template)]
#[template(path = "privacy.html")]
pub struct PrivacyTemplate {
    pub view: LayoutContext<PrivacyContext>,
}

pub struct ErrorPageView {
    pub code: String,
    pub title: String,
    pub message: String,
    pub primary_action: ErrorAction,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            code: "404".to_string(),
            title: "Page not found".to_string(),
            message: "Sorry, we couldn't find the page you're looking for.".to_string(),
            primary_action: ErrorAction::home(),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Go back home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

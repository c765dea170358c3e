//! Content update API: rewrite a post's markdown body in place, keeping its
//! front matter untouched.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::application::{content::ContentError, error::HttpError};

use super::public::HttpState;

const SOURCE: &str = "infra::http::api::update_content";

pub fn build_router() -> Router<HttpState> {
    Router::new().route("/api/update-content", post(update_content))
}

#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub slug: String,
    pub content: String,
}

async fn update_content(
    State(state): State<HttpState>,
    Json(payload): Json<UpdateContentRequest>,
) -> Response {
    match state
        .content
        .update_body(&payload.slug, &payload.content)
        .await
    {
        Ok(()) => {
            info!(
                target = SOURCE,
                slug = %payload.slug,
                bytes = payload.content.len(),
                "post body updated"
            );
            (
                StatusCode::OK,
                Json(json!({ "message": format!("Updated `{}`", payload.slug) })),
            )
                .into_response()
        }
        Err(ContentError::UnknownSlug(slug)) => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Post not found",
            format!("no post with slug `{slug}`"),
        )
        .into_response(),
        Err(ContentError::InvalidSlug(slug)) => HttpError::new(
            SOURCE,
            StatusCode::BAD_REQUEST,
            "Invalid slug",
            format!("slug `{slug}` is not acceptable"),
        )
        .into_response(),
        Err(err) => HttpError::from_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update post",
            &err,
        )
        .into_response(),
    }
}

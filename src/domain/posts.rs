//! Post content model: front matter attributes, draft and publication rules,
//! and the orderings the listing surfaces rely on.

use serde::Deserialize;
use time::{Date, format_description::FormatItem, macros::format_description};

use crate::domain::error::DomainError;

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Front matter carried at the top of each content file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostAttributes {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub cover_image_alt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub published_at: Date,
    pub author: String,
    /// When the piece first appeared elsewhere; drives the canonical link.
    #[serde(default)]
    pub canonical_url: Option<String>,
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Date::parse(&raw, ISO_DATE_FORMAT).map_err(serde::de::Error::custom)
}

/// A loaded post: parsed attributes plus the raw markdown body.
#[derive(Debug, Clone)]
pub struct Post {
    pub attributes: PostAttributes,
    pub body_markdown: String,
    /// Content files whose name starts with `_` are drafts.
    pub draft: bool,
}

impl Post {
    pub fn slug(&self) -> &str {
        self.attributes
            .slug
            .as_deref()
            .expect("slug is resolved at load time")
    }

    pub fn is_published(&self, today: Date) -> bool {
        !self.draft && self.attributes.published_at <= today
    }
}

/// Resolve the slug a post is served under: explicit front matter wins,
/// otherwise the slugified file stem.
pub fn resolve_slug(attributes: &mut PostAttributes, file_stem: &str) -> Result<(), DomainError> {
    let resolved = match attributes.slug.take() {
        Some(explicit) => {
            let trimmed = explicit.trim().to_string();
            if trimmed.is_empty() {
                return Err(DomainError::validation("front matter slug is empty"));
            }
            trimmed
        }
        None => slug::slugify(file_stem.trim_start_matches('_')),
    };

    if resolved.is_empty() {
        return Err(DomainError::validation(format!(
            "could not derive a slug for `{file_stem}`"
        )));
    }

    attributes.slug = Some(resolved);
    Ok(())
}

/// Published posts, newest first. Drafts and future-dated posts are excluded.
pub fn published<'a>(posts: &'a [Post], today: Date) -> Vec<&'a Post> {
    let mut visible: Vec<&Post> = posts.iter().filter(|post| post.is_published(today)).collect();
    visible.sort_by(|a, b| b.attributes.published_at.cmp(&a.attributes.published_at));
    visible
}

/// The rail of earlier reading shown under a post: the most recent published
/// posts other than the current one, newest first.
pub fn previous_articles<'a>(
    posts: &'a [Post],
    current_slug: &str,
    today: Date,
    limit: usize,
) -> Vec<&'a Post> {
    published(posts, today)
        .into_iter()
        .filter(|post| post.slug() != current_slug)
        .take(limit)
        .collect()
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT).expect("valid calendar date")
}

pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT).expect("valid calendar date")
}

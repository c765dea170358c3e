//! Feed service: turns stored posts into the view contexts the blog surfaces
//! render.

use std::sync::Arc;

use thiserror::Error;
use time::Date;

use crate::application::content::{ContentError, ContentRepo};
use crate::application::render::MarkdownRenderService;
use crate::config::SiteSettings;
use crate::domain::posts::{self, Post};
use crate::presentation::views::{PostCard, PostDetailContext};

const HOME_RAIL_LIMIT: usize = 3;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Content(#[from] ContentError),
}

#[derive(Clone)]
pub struct FeedService {
    content: Arc<dyn ContentRepo>,
    renderer: Arc<MarkdownRenderService>,
    site: SiteSettings,
    include_drafts: bool,
}

impl FeedService {
    pub fn new(
        content: Arc<dyn ContentRepo>,
        renderer: Arc<MarkdownRenderService>,
        site: SiteSettings,
        include_drafts: bool,
    ) -> Self {
        Self {
            content,
            renderer,
            site,
            include_drafts,
        }
    }

    /// Cards for the blog index: published posts, newest first.
    pub async fn blog_index(&self, today: Date) -> Result<Vec<PostCard>, FeedError> {
        let posts = self.visible_posts().await?;
        Ok(posts::published(&posts, today)
            .into_iter()
            .map(post_card)
            .collect())
    }

    /// The "from the blog" rail on the home page.
    pub async fn home_rail(&self, today: Date) -> Result<Vec<PostCard>, FeedError> {
        let mut cards = self.blog_index(today).await?;
        cards.truncate(HOME_RAIL_LIMIT);
        Ok(cards)
    }

    /// Full detail context for one post, or `None` when the slug is unknown
    /// or points at a draft while drafts are not being served.
    ///
    /// Future-dated posts stay reachable by direct link; they are only hidden
    /// from listings.
    pub async fn post_detail(
        &self,
        slug: &str,
        today: Date,
    ) -> Result<Option<PostDetailContext>, FeedError> {
        let Some(post) = self.content.find_by_slug(slug).await? else {
            return Ok(None);
        };
        if post.draft && !self.include_drafts {
            return Ok(None);
        }

        let all = self.visible_posts().await?;
        let previous = posts::previous_articles(&all, slug, today, self.site.previous_articles)
            .into_iter()
            .map(post_card)
            .collect();

        let content_html = self.renderer.render_html(&post.body_markdown);
        let attributes = &post.attributes;

        Ok(Some(PostDetailContext {
            slug: post.slug().to_string(),
            title: attributes.title.clone(),
            description: attributes.description.clone(),
            author: attributes.author.clone(),
            cover_image: attributes.cover_image.clone().unwrap_or_default(),
            cover_image_alt: attributes
                .cover_image_alt
                .clone()
                .unwrap_or_else(|| attributes.description.clone()),
            iso_date: posts::format_iso_date(attributes.published_at),
            published: posts::format_human_date(attributes.published_at),
            tags: attributes.tags.clone(),
            content_html,
            share_url: format!("{}/blog/{}", self.site.public_url, post.slug()),
            previous,
        }))
    }

    /// The canonical URL a post declares, if any. `None` means the page must
    /// run the cleanup path instead of attaching a link.
    pub async fn canonical_url(&self, slug: &str) -> Result<Option<String>, FeedError> {
        let post = self.content.find_by_slug(slug).await?;
        Ok(post.and_then(|post| post.attributes.canonical_url))
    }

    async fn visible_posts(&self) -> Result<Vec<Post>, FeedError> {
        let mut posts = self.content.list_posts().await?;
        if !self.include_drafts {
            posts.retain(|post| !post.draft);
        }
        Ok(posts)
    }
}

fn post_card(post: &Post) -> PostCard {
    let attributes = &post.attributes;
    PostCard {
        slug: post.slug().to_string(),
        title: attributes.title.clone(),
        description: attributes.description.clone(),
        cover_image: attributes.cover_image.clone().unwrap_or_default(),
        cover_image_alt: attributes
            .cover_image_alt
            .clone()
            .unwrap_or_else(|| attributes.description.clone()),
        iso_date: posts::format_iso_date(attributes.published_at),
        published: posts::format_human_date(attributes.published_at),
        tags: attributes.tags.clone(),
    }
}

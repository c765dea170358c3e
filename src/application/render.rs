//! Markdown rendering pipeline: Comrak with Syntect code highlighting and
//! Ammonia sanitisation.
//!
//! Post bodies are mutable input (the update-content API accepts arbitrary
//! markdown), so raw HTML is allowed through Comrak and scrubbed afterwards.

use std::sync::Arc;

use comrak::plugins::syntect::{SyntectAdapter, SyntectAdapterBuilder};
use once_cell::sync::Lazy;

pub struct MarkdownRenderService {
    options: comrak::Options<'static>,
    highlighter: SyntectAdapter,
    sanitizer: ammonia::Builder<'static>,
}

static RENDER_SERVICE: Lazy<Arc<MarkdownRenderService>> =
    Lazy::new(|| Arc::new(MarkdownRenderService::new()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<MarkdownRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl MarkdownRenderService {
    fn new() -> Self {
        Self {
            options: default_options(),
            // Class-based output so the stylesheet owns the color scheme.
            highlighter: SyntectAdapterBuilder::new().css().build(),
            sanitizer: build_sanitizer(),
        }
    }

    pub fn render_html(&self, markdown: &str) -> String {
        let mut plugins = comrak::Plugins::default();
        plugins.render.codefence_syntax_highlighter = Some(&self.highlighter);

        let html = comrak::markdown_to_html_with_plugins(markdown, &self.options, &plugins);
        self.sanitizer.clean(&html).to_string()
    }
}

impl Default for MarkdownRenderService {
    fn default() -> Self {
        Self::new()
    }
}

fn default_options() -> comrak::Options<'static> {
    let mut options = comrak::Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.unsafe_ = true;
    options
}

fn build_sanitizer() -> ammonia::Builder<'static> {
    let mut sanitizer = ammonia::Builder::default();
    sanitizer.add_tag_attributes("code", &["class"]);
    sanitizer.add_tag_attributes("pre", &["class"]);
    sanitizer.add_tag_attributes("span", &["class"]);
    sanitizer
}

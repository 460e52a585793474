//! Entry points that pick a pipeline for a piece of content.

use crate::document::DocumentRenderer;
use crate::markdown::MarkdownRenderer;
use crate::output::RenderedOutput;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::trace;

/// Which pipeline a piece of content is meant for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FormatHint {
    /// Rich-text editor JSON
    Document,
    /// Markdown subset
    Markdown,
}

impl FormatHint {
    /// Guess the format of untagged content: JSON objects are document trees.
    pub fn detect(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            FormatHint::Document
        } else {
            FormatHint::Markdown
        }
    }
}

/// Render `content`, detecting its format when no hint is given.
///
/// ```
/// use kbrender::{render, Theme};
///
/// let theme = Theme::default();
/// let output = render("**Reset** your password", None, &theme);
/// assert_eq!(output.plain_text(), "Reset your password");
/// ```
pub fn render(content: &str, hint: Option<FormatHint>, theme: &Theme) -> RenderedOutput {
    let format = hint.unwrap_or_else(|| FormatHint::detect(content));
    trace!(%format, "rendering content");
    match format {
        FormatHint::Document => DocumentRenderer::new(theme).render(content),
        FormatHint::Markdown => MarkdownRenderer::new(theme).render(content),
    }
}

/// Article content as delivered by the help-center backend.
pub trait ArticleSource {
    /// Serialized document tree, when the article was written in the rich editor.
    fn lexical_content(&self) -> Option<&str>;

    /// Markdown body, always present.
    fn content(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexical_content: Option<String>,
}

impl ArticleSource for Article {
    fn lexical_content(&self) -> Option<&str> {
        self.lexical_content.as_deref()
    }

    fn content(&self) -> &str {
        &self.content
    }
}

/// Render an article: its document tree when non-empty, its markdown otherwise.
pub fn render_article(article: &impl ArticleSource, theme: &Theme) -> RenderedOutput {
    match article.lexical_content().filter(|tree| !tree.trim().is_empty()) {
        Some(tree) => render(tree, Some(FormatHint::Document), theme),
        None => render(article.content(), Some(FormatHint::Markdown), theme),
    }
}

//! # kbrender
//!
//! Styled rendering for help-center article content.
//!
//! Articles arrive in one of two shapes: a rich-text editor's JSON node tree,
//! or a GitHub-flavoured markdown subset. Both are rendered into the same
//! toolkit-agnostic [`RenderedOutput`], a list of [`Block`]s holding styled
//! text runs, which the [`adapters`] then map onto a terminal.
//!
//! ## Features
//!
//! - Typed document tree with a single JSON boundary
//! - Line-oriented markdown block parser with inline formatting, links,
//!   hashtags and mentions
//! - Light and dark themes, with overrides from a TOML config file
//! - Ratatui and ANSI adapters
//!
//! ## Example
//!
//! ```rust
//! use kbrender::{Block, FormatHint, Theme, render};
//!
//! let theme = Theme::default();
//!
//! let output = render("## Billing\n\n- [x] Update card", Some(FormatHint::Markdown), &theme);
//! assert!(matches!(output.blocks[0], Block::Heading { level: 2, .. }));
//!
//! let tree = r#"{"root":{"children":[
//!     {"type":"paragraph","children":[{"type":"text","text":"Hello","format":1}]}
//! ]}}"#;
//! let output = render(tree, None, &theme);
//! assert_eq!(output.plain_text(), "Hello");
//! ```

/// Toolkit adapters for rendered output.
pub mod adapters;

/// Configuration module for persisting user preferences.
///
/// Provides the theme choice, default input format and colour overrides.
pub mod config;

/// Renderer for rich-text editor node trees.
pub mod document;

pub mod error;

/// Markdown fallback renderer.
pub mod markdown;

/// Toolkit-agnostic render descriptors.
pub mod output;

pub mod render;
pub mod style;
pub mod theme;

// Re-export commonly used types for convenience
pub use config::Config;
pub use document::{DocumentNode, DocumentRenderer};
pub use error::{ConfigError, DocumentError};
pub use markdown::{InlineMarkdownProcessor, MarkdownRenderer};
pub use output::{Block, ListMarker, RenderedOutput, StyledRun, TableRow};
pub use render::{Article, ArticleSource, FormatHint, render, render_article};
pub use style::{Color, Font, FontWeight, RunStyle, TextFormat};
pub use theme::{Theme, ThemeName};

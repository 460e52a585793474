//! Colour, size and weight tokens consumed by the renderers.
//!
//! A [`Theme`] is always passed into a renderer explicitly; nothing in the
//! rendering core reads ambient theme state.

use crate::style::{Color, Font, FontWeight, RunStyle};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Built-in theme presets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase", ascii_case_insensitive)]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

/// Default weight per block type.
///
/// Headings other than h1/h2 use `heading`; bold text runs override any of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockWeights {
    pub paragraph: FontWeight,
    pub heading: FontWeight,
    pub list: FontWeight,
    pub quote: FontWeight,
    pub table_cell: FontWeight,
    pub table_header: FontWeight,
}

impl Default for BlockWeights {
    fn default() -> Self {
        Self {
            paragraph: FontWeight::Regular,
            heading: FontWeight::Semibold,
            list: FontWeight::Regular,
            quote: FontWeight::Regular,
            table_cell: FontWeight::Regular,
            table_header: FontWeight::Semibold,
        }
    }
}

/// Point size for a heading level; anything outside 1-6 gets 20.
pub fn heading_size(level: Option<u8>) -> f32 {
    match level {
        Some(1) => 28.0,
        Some(2) => 24.0,
        Some(3) => 20.0,
        Some(4) => 18.0,
        Some(5) => 16.0,
        Some(6) => 14.0,
        _ => 20.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub secondary_text: Color,
    pub accent: Color,
    pub code_text: Color,
    pub code_background: Color,
    pub quote_bar: Color,
    pub table_header_background: Color,
    pub table_border: Color,
    pub rule: Color,
    pub list_marker: Color,
    pub checked_marker: Color,
    pub body_size: f32,
    pub code_size: f32,
    pub weights: BlockWeights,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Self::light(),
            ThemeName::Dark => Self::dark(),
        }
    }

    pub fn light() -> Self {
        Self {
            text: Color::rgb(0x1c, 0x1c, 0x1e),
            secondary_text: Color::rgb(0x6e, 0x6e, 0x73),
            accent: Color::rgb(0x00, 0x7a, 0xff),
            code_text: Color::rgb(0xc4, 0x1a, 0x16),
            code_background: Color::rgb(0xf2, 0xf2, 0xf7),
            quote_bar: Color::rgb(0xc7, 0xc7, 0xcc),
            table_header_background: Color::rgb(0xe5, 0xe5, 0xea),
            table_border: Color::rgb(0xd1, 0xd1, 0xd6),
            rule: Color::rgb(0xd1, 0xd1, 0xd6),
            list_marker: Color::rgb(0x6e, 0x6e, 0x73),
            checked_marker: Color::rgb(0x34, 0xc7, 0x59),
            body_size: 16.0,
            code_size: 14.0,
            weights: BlockWeights::default(),
        }
    }

    pub fn dark() -> Self {
        Self {
            text: Color::rgb(0xf2, 0xf2, 0xf7),
            secondary_text: Color::rgb(0x98, 0x98, 0x9f),
            accent: Color::rgb(0x0a, 0x84, 0xff),
            code_text: Color::rgb(0xff, 0x9f, 0x0a),
            code_background: Color::rgb(0x2c, 0x2c, 0x2e),
            quote_bar: Color::rgb(0x48, 0x48, 0x4a),
            table_header_background: Color::rgb(0x3a, 0x3a, 0x3c),
            table_border: Color::rgb(0x48, 0x48, 0x4a),
            rule: Color::rgb(0x48, 0x48, 0x4a),
            list_marker: Color::rgb(0x98, 0x98, 0x9f),
            checked_marker: Color::rgb(0x30, 0xd1, 0x58),
            body_size: 16.0,
            code_size: 14.0,
            weights: BlockWeights::default(),
        }
    }

    /// Plain body-text style at the given weight.
    pub fn body(&self, weight: FontWeight) -> RunStyle {
        RunStyle::plain(Font::new(self.body_size, weight), self.text)
    }

    /// Heading font: bold for h1 and h2, the heading block weight otherwise.
    pub fn heading_font(&self, level: Option<u8>) -> Font {
        let weight = match level {
            Some(1 | 2) => FontWeight::Bold,
            _ => self.weights.heading,
        };
        Font::new(heading_size(level), weight)
    }

    /// Foreground and background used for inline code.
    pub fn code_colors(&self) -> (Color, Color) {
        (self.code_text, self.code_background)
    }

    /// Style of fenced code block content.
    pub fn code_block(&self) -> RunStyle {
        let mut style = RunStyle::plain(Font::monospaced(self.code_size), self.text);
        style.background = Some(self.code_background);
        style
    }

    /// Restyle `style` as link text.
    pub fn linked(&self, mut style: RunStyle) -> RunStyle {
        style.foreground = self.accent;
        style.underline = true;
        style
    }

    /// Restyle `style` as a hashtag or mention.
    pub fn tagged(&self, mut style: RunStyle) -> RunStyle {
        style.foreground = self.accent;
        if style.font.weight < FontWeight::Semibold {
            style.font.weight = FontWeight::Semibold;
        }
        style
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

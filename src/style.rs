//! Style primitives shared by both rendering pipelines.
//!
//! - [`TextFormat`]: bit flags for inline formatting, matching the rich-text
//!   editor's integer `format` field
//! - [`Color`], [`FontWeight`], [`Font`]: toolkit-agnostic style tokens
//! - [`RunStyle`]: the fully resolved style of one run of text

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Inline text formatting as stored in document trees.
    ///
    /// ```
    /// use kbrender::style::TextFormat;
    ///
    /// let format = TextFormat::from_bits_truncate(1 | 2 | 16);
    /// assert!(format.contains(TextFormat::BOLD | TextFormat::ITALIC));
    /// assert!(format.contains(TextFormat::CODE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextFormat: u32 {
        const BOLD          = 1;
        const ITALIC        = 1 << 1;
        const STRIKETHROUGH = 1 << 2;
        const UNDERLINE     = 1 << 3;
        /// Inline code. Forces a monospaced font and the code background.
        const CODE          = 1 << 4;
    }
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').filter(|h| h.is_ascii())?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Medium,
    Semibold,
    Bold,
}

impl FontWeight {
    /// Whether a terminal should draw this weight with the bold attribute.
    pub fn is_heavy(self) -> bool {
        self >= FontWeight::Semibold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: f32,
    pub weight: FontWeight,
    pub monospace: bool,
}

impl Font {
    pub fn new(size: f32, weight: FontWeight) -> Self {
        Self {
            size,
            weight,
            monospace: false,
        }
    }

    pub fn monospaced(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            monospace: true,
        }
    }
}

/// Resolved style for a single run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStyle {
    pub font: Font,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub foreground: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

impl RunStyle {
    pub fn plain(font: Font, foreground: Color) -> Self {
        Self {
            font,
            italic: false,
            underline: false,
            strikethrough: false,
            foreground,
            background: None,
        }
    }

    /// Apply text format flags on top of this style.
    ///
    /// Bold overrides whatever weight the block asked for. Inline code keeps
    /// the other flags but always switches to the monospaced font on the code
    /// background.
    pub fn with_format(mut self, format: TextFormat, code: (Color, Color)) -> Self {
        if format.contains(TextFormat::BOLD) {
            self.font.weight = FontWeight::Bold;
        }
        self.italic |= format.contains(TextFormat::ITALIC);
        self.underline |= format.contains(TextFormat::UNDERLINE);
        self.strikethrough |= format.contains(TextFormat::STRIKETHROUGH);
        if format.contains(TextFormat::CODE) {
            let (foreground, background) = code;
            self.font.monospace = true;
            self.foreground = foreground;
            self.background = Some(background);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: (Color, Color) = (Color::rgb(1, 1, 1), Color::rgb(2, 2, 2));

    #[test]
    fn test_unknown_format_bits_are_dropped() {
        let format = TextFormat::from_bits_truncate(1 | 32 | 128);
        assert_eq!(format, TextFormat::BOLD);
    }

    #[test]
    fn test_all_flags_apply_together() {
        let base = RunStyle::plain(Font::new(16.0, FontWeight::Regular), Color::rgb(0, 0, 0));
        let style = base.with_format(
            TextFormat::BOLD | TextFormat::ITALIC | TextFormat::CODE,
            CODE,
        );

        assert_eq!(style.font.weight, FontWeight::Bold);
        assert!(style.font.monospace);
        assert!(style.italic);
        assert_eq!(style.background, Some(CODE.1));
        assert_eq!(style.foreground, CODE.0);
    }

    #[test]
    fn test_bold_overrides_block_weight() {
        let base = RunStyle::plain(Font::new(14.0, FontWeight::Semibold), Color::rgb(0, 0, 0));
        assert_eq!(
            base.clone().with_format(TextFormat::BOLD, CODE).font.weight,
            FontWeight::Bold
        );
        assert_eq!(
            base.with_format(TextFormat::empty(), CODE).font.weight,
            FontWeight::Semibold
        );
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#0a84ff"), Some(Color::rgb(0x0a, 0x84, 0xff)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::from_hex("0a84ff"), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::rgb(10, 132, 255).to_string(), "#0a84ff");
    }
}

//! ANSI adapter: styled terminal output through `crossterm::style`.
//!
//! Layout is shared with the ratatui adapter; this module only turns each
//! span's style into escape sequences.

use super::ratatui::to_text;
use crate::output::RenderedOutput;
use ::ratatui::style::{Color as TuiColor, Modifier, Style};
use crossterm::queue;
use crossterm::style::{Attribute, Attributes, Color, ContentStyle, PrintStyledContent, StyledContent};
use std::io::{self, Write};

/// Write `output` as styled lines, each terminated by `\n`.
pub fn write_ansi(output: &RenderedOutput, mut out: impl Write) -> io::Result<()> {
    for line in to_text(output).lines {
        for span in line.spans {
            let styled = StyledContent::new(content_style(span.style), span.content);
            queue!(out, PrintStyledContent(styled))?;
        }
        writeln!(out)?;
    }
    out.flush()
}

fn content_style(style: Style) -> ContentStyle {
    let mut attributes = Attributes::default();
    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ] {
        if style.add_modifier.contains(modifier) {
            attributes.set(attribute);
        }
    }

    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.and_then(terminal_color);
    content.background_color = style.bg.and_then(terminal_color);
    content.attributes = attributes;
    content
}

fn terminal_color(color: TuiColor) -> Option<Color> {
    match color {
        TuiColor::Rgb(r, g, b) => Some(Color::Rgb { r, g, b }),
        _ => None,
    }
}

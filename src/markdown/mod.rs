//! Markdown fallback rendering.
//!
//! Articles without a document tree carry a GitHub-flavoured markdown subset.
//! [`parse_blocks`] classifies it line by line into [`MarkdownBlock`]s (with
//! inline text already run through [`InlineMarkdownProcessor`]), and
//! [`MarkdownRenderer`] resolves those blocks against a theme.

pub mod block;
pub mod inline;

pub use block::{MarkdownBlock, parse_blocks};
pub use inline::{InlineMarkdownProcessor, InlineStyle, StyledSpan, StyledSpans};

use crate::output::{Block, ListMarker, RenderedOutput, StyledRun, TableRow};
use crate::style::RunStyle;
use crate::theme::Theme;

pub struct MarkdownRenderer<'a> {
    theme: &'a Theme,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, content: &str) -> RenderedOutput {
        let blocks = parse_blocks(content)
            .iter()
            .map(|block| self.render_block(block))
            .collect();
        RenderedOutput::new(blocks)
    }

    fn render_block(&self, block: &MarkdownBlock) -> Block {
        let theme = self.theme;
        match block {
            MarkdownBlock::Heading { spans, level } => {
                let base = RunStyle::plain(theme.heading_font(Some(*level)), theme.text);
                Block::Heading {
                    level: *level,
                    runs: self.runs(spans, &base),
                }
            }
            MarkdownBlock::Paragraph { spans } => Block::Paragraph {
                runs: self.runs(spans, &theme.body(theme.weights.paragraph)),
            },
            MarkdownBlock::ListItem { spans, level } => {
                self.list_item(ListMarker::Bullet, *level, spans, false)
            }
            MarkdownBlock::OrderedListItem {
                spans,
                number,
                level,
            } => self.list_item(ListMarker::Number { value: *number }, *level, spans, false),
            MarkdownBlock::ChecklistItem {
                spans,
                checked,
                level,
            } => self.list_item(
                ListMarker::Checkbox { checked: *checked },
                *level,
                spans,
                *checked,
            ),
            MarkdownBlock::Quote { spans, level } => {
                let mut base = theme.body(theme.weights.quote);
                base.foreground = theme.secondary_text;
                Block::Quote {
                    level: *level,
                    bar_color: theme.quote_bar,
                    runs: self.runs(spans, &base),
                }
            }
            MarkdownBlock::CodeBlock { content, language } => Block::Code {
                label: language.as_ref().map(|lang| lang.to_uppercase()),
                content: content.clone(),
                style: theme.code_block(),
            },
            MarkdownBlock::Table { headers, rows } => {
                let header_style = theme.body(theme.weights.table_header);
                let cell_style = theme.body(theme.weights.table_cell);

                let mut table_rows = vec![TableRow {
                    header: true,
                    background: Some(theme.table_header_background),
                    cells: headers
                        .iter()
                        .map(|cell| self.runs(cell, &header_style))
                        .collect(),
                }];
                table_rows.extend(rows.iter().map(|row| TableRow {
                    header: false,
                    background: None,
                    cells: row.iter().map(|cell| self.runs(cell, &cell_style)).collect(),
                }));

                Block::Table {
                    border_color: theme.table_border,
                    rows: table_rows,
                }
            }
            MarkdownBlock::HorizontalRule => Block::Rule { color: theme.rule },
            MarkdownBlock::LineBreak => Block::Spacer,
        }
    }

    fn list_item(&self, marker: ListMarker, level: usize, spans: &StyledSpans, done: bool) -> Block {
        let mut base = self.theme.body(self.theme.weights.list);
        base.strikethrough = done;
        Block::ListItem {
            marker,
            marker_color: if done {
                self.theme.checked_marker
            } else {
                self.theme.list_marker
            },
            level,
            runs: self.runs(spans, &base),
        }
    }

    fn runs(&self, spans: &StyledSpans, base: &RunStyle) -> Vec<StyledRun> {
        spans
            .iter()
            .map(|span| {
                let inline = &span.style;
                let mut style = base.clone().with_format(inline.format, self.theme.code_colors());
                if inline.link.is_some() {
                    style = self.theme.linked(style);
                }
                if inline.hashtag || inline.mention {
                    style = self.theme.tagged(style);
                }
                StyledRun {
                    text: span.text.clone(),
                    style,
                    link: inline.link.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FontWeight;
    use pretty_assertions::assert_eq;

    fn render(content: &str) -> RenderedOutput {
        let theme = Theme::light();
        MarkdownRenderer::new(&theme).render(content)
    }

    #[test]
    fn test_heading_sizes_match_document_trees() {
        let output = render("# One\n### Three\n###### Six");
        let fonts: Vec<_> = output
            .blocks
            .iter()
            .map(|block| match block {
                Block::Heading { runs, .. } => (runs[0].style.font.size, runs[0].style.font.weight),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            fonts,
            vec![
                (28.0, FontWeight::Bold),
                (20.0, FontWeight::Semibold),
                (14.0, FontWeight::Semibold),
            ]
        );
    }

    #[test]
    fn test_checked_item_is_struck_through() {
        let theme = Theme::light();
        let output = render("- [x] Update card\n- [ ] Add invoice email");

        let items: Vec<_> = output
            .blocks
            .iter()
            .map(|block| match block {
                Block::ListItem {
                    marker,
                    marker_color,
                    runs,
                    ..
                } => (*marker, *marker_color, runs[0].style.strikethrough),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            items,
            vec![
                (ListMarker::Checkbox { checked: true }, theme.checked_marker, true),
                (ListMarker::Checkbox { checked: false }, theme.list_marker, false),
            ]
        );
    }

    #[test]
    fn test_checklist_rendering_is_repeatable() {
        let content = "- [x] one\n  - [ ] two";
        assert_eq!(render(content), render(content));
    }

    #[test]
    fn test_table_has_one_header_and_data_rows() {
        let output = render("| Plan | Price |\n|---|---|\n| Free | $0 |\n| Pro | $10 |");
        let Block::Table { rows, .. } = &output.blocks[0] else {
            panic!("expected table");
        };

        let headers: Vec<_> = rows.iter().map(|row| row.header).collect();
        assert_eq!(headers, vec![true, false, false]);
        assert_eq!(rows[0].cells[0][0].style.font.weight, FontWeight::Semibold);
        assert_eq!(rows[2].cells[1][0].text, "$10");
    }

    #[test]
    fn test_links_and_mentions_use_accent() {
        let theme = Theme::light();
        let output = render("Ask @help or read [the guide](https://example.com/guide).");
        let Block::Paragraph { runs } = &output.blocks[0] else {
            panic!("expected paragraph");
        };

        let mention = runs.iter().find(|r| r.text == "@help").unwrap();
        assert_eq!(mention.style.foreground, theme.accent);
        assert_eq!(mention.style.font.weight, FontWeight::Semibold);

        let link = runs.iter().find(|r| r.text == "the guide").unwrap();
        assert!(link.style.underline);
        assert_eq!(output.links(), vec!["https://example.com/guide"]);
    }

    #[test]
    fn test_plain_text_strips_markers() {
        let output = render("Use `kb sync` and `kb push` **now**");
        assert_eq!(output.plain_text(), "Use kb sync and kb push now");
    }

    #[test]
    fn test_code_block_label() {
        let output = render("```json\n{\"a\": 1}\n```");
        let Block::Code { label, content, style } = &output.blocks[0] else {
            panic!("expected code");
        };
        assert_eq!(label.as_deref(), Some("JSON"));
        assert_eq!(content, "{\"a\": 1}");
        assert!(style.font.monospace);
    }
}

//! Rendering of rich-text document trees.
//!
//! The input is the JSON editor state stored with an article: a `root` object
//! whose `children` are block nodes (paragraphs, headings, lists, quotes, code,
//! tables, rules) which in turn hold inline nodes (text runs with format flags,
//! links, hashtags, line breaks).
//!
//! Rendering never fails. Input that is not a recognizable tree is shown as one
//! plain paragraph, unknown node types render as paragraphs, and nodes missing
//! required fields render nothing.

pub mod node;

pub use node::{DocumentNode, ListKind, heading_font_size, heading_level, parse};

use crate::output::{Block, ListMarker, RenderedOutput, StyledRun, TableRow};
use crate::style::RunStyle;
use crate::theme::Theme;
use tracing::{debug, trace};

/// Renders document trees with a fixed theme.
pub struct DocumentRenderer<'a> {
    theme: &'a Theme,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Render editor JSON.
    ///
    /// Falls back to [`RenderedOutput::plain`] when `raw` cannot be parsed
    /// into a tree.
    pub fn render(&self, raw: &str) -> RenderedOutput {
        match parse(raw) {
            Ok(root) => self.render_tree(&root),
            Err(err) => {
                debug!(error = %err, "document tree unavailable, rendering plain text");
                RenderedOutput::plain(raw, self.theme)
            }
        }
    }

    /// Render an already parsed tree.
    pub fn render_tree(&self, root: &DocumentNode) -> RenderedOutput {
        let mut blocks = Vec::new();
        self.render_block(root, &mut blocks);
        RenderedOutput::new(blocks)
    }

    fn render_blocks(&self, nodes: &[DocumentNode], out: &mut Vec<Block>) {
        // Inline nodes that appear directly at block level are gathered into
        // a paragraph of their own.
        let mut pending: Vec<&DocumentNode> = Vec::new();
        for node in nodes {
            if is_inline(node) {
                pending.push(node);
                continue;
            }
            self.flush_inline(&mut pending, out);
            self.render_block(node, out);
        }
        self.flush_inline(&mut pending, out);
    }

    fn flush_inline(&self, pending: &mut Vec<&DocumentNode>, out: &mut Vec<Block>) {
        if pending.is_empty() {
            return;
        }
        let base = self.theme.body(self.theme.weights.paragraph);
        let runs = self.inline_runs(pending.drain(..), &base, None);
        out.push(paragraph(runs));
    }

    fn render_block(&self, node: &DocumentNode, out: &mut Vec<Block>) {
        match node {
            DocumentNode::Root { children } => self.render_blocks(children, out),
            DocumentNode::Paragraph { children } => {
                let base = self.theme.body(self.theme.weights.paragraph);
                out.push(paragraph(self.inline_runs(children, &base, None)));
            }
            DocumentNode::Heading { tag, children } => {
                let level = heading_level(tag);
                let base = RunStyle::plain(self.theme.heading_font(level), self.theme.text);
                out.push(Block::Heading {
                    // Unrecognized tags share h3's size, so they share its level too.
                    level: level.unwrap_or(3),
                    runs: self.inline_runs(children, &base, None),
                });
            }
            DocumentNode::List { kind, start, items } => {
                self.render_list(*kind, *start, items, 0, out);
            }
            DocumentNode::Quote { children } => {
                let mut base = self.theme.body(self.theme.weights.quote);
                base.foreground = self.theme.secondary_text;
                out.push(Block::Quote {
                    level: 1,
                    bar_color: self.theme.quote_bar,
                    runs: self.inline_runs(children, &base, None),
                });
            }
            DocumentNode::Code { language, children } => {
                let mut content = String::new();
                collect_text(children, &mut content);
                out.push(Block::Code {
                    label: language.as_ref().map(|lang| lang.to_uppercase()),
                    content,
                    style: self.theme.code_block(),
                });
            }
            DocumentNode::Table { rows } => out.push(self.render_table(rows)),
            DocumentNode::HorizontalRule => out.push(Block::Rule {
                color: self.theme.rule,
            }),
            DocumentNode::ListItem { children, .. }
            | DocumentNode::TableRow { cells: children }
            | DocumentNode::TableCell { children } => {
                trace!("structural node outside its container, rendering children");
                self.render_blocks(children, out);
            }
            DocumentNode::Link { .. }
            | DocumentNode::Hashtag { .. }
            | DocumentNode::LineBreak
            | DocumentNode::TextRun { .. } => {
                let base = self.theme.body(self.theme.weights.paragraph);
                out.push(paragraph(self.inline_runs([node], &base, None)));
            }
        }
    }

    fn render_list(
        &self,
        kind: ListKind,
        start: u64,
        items: &[DocumentNode],
        level: usize,
        out: &mut Vec<Block>,
    ) {
        let base = self.theme.body(self.theme.weights.list);
        let mut index = 0;

        for item in items {
            let (children, checked) = match item {
                DocumentNode::ListItem { children, checked } => (children.as_slice(), *checked),
                other => (std::slice::from_ref(other), None),
            };

            // Editors nest sub-lists inside their own list items; such items
            // carry no content and take no marker.
            let (nested, inline): (Vec<&DocumentNode>, Vec<&DocumentNode>) = children
                .iter()
                .partition(|child| matches!(child, DocumentNode::List { .. }));

            if !inline.is_empty() {
                let checked = checked.unwrap_or(false);
                let marker = match kind {
                    ListKind::Ordered => ListMarker::Number {
                        value: start.saturating_add(index),
                    },
                    ListKind::Unordered => ListMarker::Bullet,
                    ListKind::Checklist => ListMarker::Checkbox { checked },
                };
                let marker_color = if kind == ListKind::Checklist && checked {
                    self.theme.checked_marker
                } else {
                    self.theme.list_marker
                };
                out.push(Block::ListItem {
                    marker,
                    marker_color,
                    level,
                    runs: self.inline_runs(inline, &base, None),
                });
                index += 1;
            }

            for list in nested {
                if let DocumentNode::List { kind, start, items } = list {
                    self.render_list(*kind, *start, items, level + 1, out);
                }
            }
        }
    }

    fn render_table(&self, rows: &[DocumentNode]) -> Block {
        let mut table_rows = Vec::with_capacity(rows.len());

        for row in rows {
            let DocumentNode::TableRow { cells } = row else {
                trace!("ignoring non-row node inside table");
                continue;
            };
            // Header styling is positional: the first row is the header.
            let header = table_rows.is_empty();
            let base = self.theme.body(if header {
                self.theme.weights.table_header
            } else {
                self.theme.weights.table_cell
            });
            let cells = cells
                .iter()
                .map(|cell| match cell {
                    DocumentNode::TableCell { children } => self.inline_runs(children, &base, None),
                    other => self.inline_runs([other], &base, None),
                })
                .collect();

            table_rows.push(TableRow {
                header,
                background: header.then_some(self.theme.table_header_background),
                cells,
            });
        }

        Block::Table {
            border_color: self.theme.table_border,
            rows: table_rows,
        }
    }

    fn inline_runs<'n>(
        &self,
        nodes: impl IntoIterator<Item = &'n DocumentNode>,
        base: &RunStyle,
        link: Option<&str>,
    ) -> Vec<StyledRun> {
        let mut runs = Vec::new();
        self.push_inline(nodes, base, link, &mut runs);
        runs
    }

    fn push_inline<'n>(
        &self,
        nodes: impl IntoIterator<Item = &'n DocumentNode>,
        base: &RunStyle,
        link: Option<&str>,
        out: &mut Vec<StyledRun>,
    ) {
        let mut previous_was_block = false;

        for node in nodes {
            match node {
                DocumentNode::TextRun { text, format } => {
                    let mut style = base.clone().with_format(*format, self.theme.code_colors());
                    if link.is_some() {
                        style = self.theme.linked(style);
                    }
                    out.push(StyledRun {
                        text: text.clone(),
                        style,
                        link: link.map(str::to_string),
                    });
                }
                DocumentNode::LineBreak => out.push(StyledRun::new("\n", base.clone())),
                DocumentNode::Link { url, children } => {
                    self.push_inline(children, base, Some(url.as_str()), out);
                }
                DocumentNode::Hashtag { children } => {
                    self.push_inline(children, &self.theme.tagged(base.clone()), link, out);
                }
                DocumentNode::HorizontalRule => {}
                // Block containers nested in inline context (paragraphs inside
                // table cells, quotes inside list items) are flattened, one
                // line each.
                container => {
                    if previous_was_block && !out.is_empty() {
                        out.push(StyledRun::new("\n", base.clone()));
                    }
                    self.push_inline(children_of(container), base, link, out);
                    previous_was_block = true;
                    continue;
                }
            }
            previous_was_block = false;
        }
    }
}

fn paragraph(runs: Vec<StyledRun>) -> Block {
    if runs.is_empty() {
        Block::Spacer
    } else {
        Block::Paragraph { runs }
    }
}

fn is_inline(node: &DocumentNode) -> bool {
    matches!(
        node,
        DocumentNode::TextRun { .. }
            | DocumentNode::LineBreak
            | DocumentNode::Link { .. }
            | DocumentNode::Hashtag { .. }
    )
}

fn children_of(node: &DocumentNode) -> &[DocumentNode] {
    match node {
        DocumentNode::Root { children }
        | DocumentNode::Paragraph { children }
        | DocumentNode::Heading { children, .. }
        | DocumentNode::ListItem { children, .. }
        | DocumentNode::Quote { children }
        | DocumentNode::Code { children, .. }
        | DocumentNode::Link { children, .. }
        | DocumentNode::Hashtag { children }
        | DocumentNode::TableCell { children } => children,
        DocumentNode::List { items, .. } => items,
        DocumentNode::Table { rows } => rows,
        DocumentNode::TableRow { cells } => cells,
        DocumentNode::HorizontalRule | DocumentNode::LineBreak | DocumentNode::TextRun { .. } => &[],
    }
}

fn collect_text(nodes: &[DocumentNode], out: &mut String) {
    for node in nodes {
        match node {
            DocumentNode::TextRun { text, .. } => out.push_str(text),
            DocumentNode::LineBreak => out.push('\n'),
            other => collect_text(children_of(other), out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{FontWeight, TextFormat};
    use pretty_assertions::assert_eq;

    fn render(json: &str) -> RenderedOutput {
        let theme = Theme::light();
        DocumentRenderer::new(&theme).render(json)
    }

    fn doc(children: &str) -> String {
        format!(r#"{{"root":{{"type":"root","children":[{children}]}}}}"#)
    }

    fn text(value: &str, format: u32) -> String {
        format!(r#"{{"type":"text","text":"{value}","format":{format}}}"#)
    }

    #[test]
    fn test_invalid_json_matches_plain_paragraph() {
        let theme = Theme::light();
        for input in ["plain words", "{not json", "", r#"{"root": 5"#] {
            assert_eq!(render(input), RenderedOutput::plain(input, &theme), "input: {input:?}");
        }
    }

    #[test]
    fn test_missing_root_children_falls_back() {
        let theme = Theme::light();
        let input = r#"{"root":{"type":"root"}}"#;
        assert_eq!(render(input), RenderedOutput::plain(input, &theme));
    }

    #[test]
    fn test_heading_sizes_and_weights() {
        let json = doc(&format!(
            r#"{{"type":"heading","tag":"h1","children":[{}]}},
               {{"type":"heading","tag":"h3","format":"center","children":[{}]}},
               {{"type":"heading","tag":"banner","children":[{}]}}"#,
            text("One", 0),
            text("Three", 0),
            text("Odd", 0)
        ));
        let output = render(&json);

        let sizes: Vec<_> = output
            .blocks
            .iter()
            .map(|block| match block {
                Block::Heading { level, runs } => {
                    let font = runs[0].style.font;
                    (*level, font.size, font.weight)
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            sizes,
            vec![
                (1, 28.0, FontWeight::Bold),
                (3, 20.0, FontWeight::Semibold),
                (3, 20.0, FontWeight::Semibold),
            ]
        );
    }

    #[test]
    fn test_text_run_flags_combine() {
        let json = doc(&format!(
            r#"{{"type":"paragraph","children":[{}]}}"#,
            text("all", (TextFormat::BOLD | TextFormat::ITALIC | TextFormat::CODE).bits())
        ));
        let output = render(&json);
        let theme = Theme::light();

        let Block::Paragraph { runs } = &output.blocks[0] else {
            panic!("expected paragraph");
        };
        let style = &runs[0].style;
        assert_eq!(style.font.weight, FontWeight::Bold);
        assert!(style.italic);
        assert!(style.font.monospace);
        assert_eq!(style.background, Some(theme.code_background));
    }

    #[test]
    fn test_ordered_list_numbers_from_start() {
        let item = |t: &str| format!(r#"{{"type":"listitem","children":[{}]}}"#, text(t, 0));
        let json = doc(&format!(
            r#"{{"type":"list","listType":"number","start":3,"children":[{},{}]}}"#,
            item("a"),
            item("b")
        ));
        let output = render(&json);

        let markers: Vec<_> = output
            .blocks
            .iter()
            .map(|block| match block {
                Block::ListItem { marker, level, .. } => (*marker, *level),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            markers,
            vec![
                (ListMarker::Number { value: 3 }, 0),
                (ListMarker::Number { value: 4 }, 0)
            ]
        );
    }

    #[test]
    fn test_nested_list_item_takes_no_marker() {
        let json = doc(&format!(
            r#"{{"type":"list","listType":"number","children":[
                {{"type":"listitem","children":[{}]}},
                {{"type":"listitem","children":[
                    {{"type":"list","children":[{{"type":"listitem","children":[{}]}}]}}
                ]}},
                {{"type":"listitem","children":[{}]}}
            ]}}"#,
            text("first", 0),
            text("inner", 0),
            text("second", 0)
        ));
        let output = render(&json);

        let markers: Vec<_> = output
            .blocks
            .iter()
            .map(|block| match block {
                Block::ListItem { marker, level, .. } => (*marker, *level),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            markers,
            vec![
                (ListMarker::Number { value: 1 }, 0),
                (ListMarker::Bullet, 1),
                (ListMarker::Number { value: 2 }, 0),
            ]
        );
    }

    #[test]
    fn test_checklist_renders_identically_twice() {
        let json = doc(&format!(
            r#"{{"type":"list","listType":"check","children":[
                {{"type":"listitem","checked":true,"children":[{}]}},
                {{"type":"listitem","checked":false,"children":[{}]}},
                {{"type":"listitem","children":[{}]}}
            ]}}"#,
            text("done", 0),
            text("todo", 0),
            text("unset", 0)
        ));

        let first = render(&json);
        let second = render(&json);
        assert_eq!(first, second);

        let checks: Vec<_> = first
            .blocks
            .iter()
            .map(|block| match block {
                Block::ListItem { marker, runs, .. } => (*marker, runs[0].style.strikethrough),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            checks,
            vec![
                (ListMarker::Checkbox { checked: true }, false),
                (ListMarker::Checkbox { checked: false }, false),
                (ListMarker::Checkbox { checked: false }, false),
            ]
        );
    }

    #[test]
    fn test_code_block_label_and_linebreaks() {
        let json = doc(&format!(
            r#"{{"type":"code","language":"swift","children":[{},{{"type":"linebreak"}},{}]}},
               {{"type":"code","children":[{}]}}"#,
            text("let a = 1", 0),
            text("print(a)", 0),
            text("plain", 0)
        ));
        let output = render(&json);

        let Block::Code { label, content, style } = &output.blocks[0] else {
            panic!("expected code");
        };
        assert_eq!(label.as_deref(), Some("SWIFT"));
        assert_eq!(content, "let a = 1\nprint(a)");
        assert!(style.font.monospace);

        let Block::Code { label, style, .. } = &output.blocks[1] else {
            panic!("expected code");
        };
        assert_eq!(*label, None);
        assert!(style.font.monospace);
    }

    #[test]
    fn test_table_first_row_is_header() {
        let cell = |t: &str| {
            format!(
                r#"{{"type":"tablecell","children":[{{"type":"paragraph","children":[{}]}}]}}"#,
                text(t, 0)
            )
        };
        let json = doc(&format!(
            r#"{{"type":"table","children":[
                {{"type":"tablerow","children":[{},{}]}},
                {{"type":"tablerow","children":[{},{}]}}
            ]}}"#,
            cell("Plan"),
            cell("Price"),
            cell("Pro"),
            cell("$10")
        ));
        let output = render(&json);
        let theme = Theme::light();

        let Block::Table { rows, .. } = &output.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(rows.len(), 2);
        assert!(rows[0].header);
        assert_eq!(rows[0].background, Some(theme.table_header_background));
        assert_eq!(rows[0].cells[0][0].style.font.weight, FontWeight::Semibold);
        assert!(!rows[1].header);
        assert_eq!(rows[1].cells[1][0].text, "$10");
    }

    #[test]
    fn test_links_and_hashtags() {
        let json = doc(&format!(
            r##"{{"type":"paragraph","children":[
                {{"type":"link","url":"https://help.example.com","children":[{}]}},
                {},
                {{"type":"hashtag","text":"#billing","format":0}}
            ]}}"##,
            text("docs", 0),
            text(" and ", 0)
        ));
        let output = render(&json);
        let theme = Theme::light();

        let Block::Paragraph { runs } = &output.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(runs[0].link.as_deref(), Some("https://help.example.com"));
        assert!(runs[0].style.underline);
        assert_eq!(runs[0].style.foreground, theme.accent);
        assert_eq!(runs[1].link, None);
        assert_eq!(runs[2].text, "#billing");
        assert_eq!(runs[2].style.font.weight, FontWeight::Semibold);
        assert_eq!(output.links(), vec!["https://help.example.com"]);
    }

    #[test]
    fn test_unknown_leaf_keeps_siblings_and_ancestors() {
        let json = doc(&format!(
            r#"{{"type":"quote","children":[
                {},
                {{"type":"paragraph","children":[{{"type":"sparkle"}}]}},
                {{"type":"mystery","children":[{}]}}
            ]}},
            {{"type":"paragraph","children":[{}]}}"#,
            text("before", 0),
            text("deep", 0),
            text("after", 0)
        ));
        let output = render(&json);

        assert_eq!(output.blocks.len(), 2);
        assert!(matches!(&output.blocks[0], Block::Quote { .. }));
        assert_eq!(output.plain_text(), "before\ndeep\nafter");
    }

    #[test]
    fn test_malformed_nodes_do_not_discard_document() {
        let json = doc(&format!(
            r#"{{"type":"paragraph","children":[{}]}},
               {{"type":"heading","tag":2,"children":[{}]}},
               {{"type":"paragraph","children":[{},7]}}"#,
            text("Intro", 0),
            text("Middle", 0),
            text("Outro", 0)
        ));
        let output = render(&json);

        assert_eq!(output.blocks.len(), 3);
        assert!(matches!(&output.blocks[1], Block::Heading { level: 3, .. }));
        assert_eq!(output.plain_text(), "Intro\nMiddle\nOutro");
    }

    #[test]
    fn test_rule_and_empty_paragraph() {
        let json = doc(r#"{"type":"horizontalrule"},{"type":"paragraph","children":[]}"#);
        let output = render(&json);
        let theme = Theme::light();

        assert_eq!(
            output.blocks,
            vec![Block::Rule { color: theme.rule }, Block::Spacer]
        );
    }
}

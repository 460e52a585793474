//! Toolkit-agnostic render output.
//!
//! Both pipelines produce a [`RenderedOutput`]: an ordered list of [`Block`]s,
//! each carrying fully resolved [`StyledRun`]s. Adapters in
//! [`crate::adapters`] translate these descriptors into a concrete UI toolkit.

use crate::style::{Color, RunStyle};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderedOutput {
    pub blocks: Vec<Block>,
}

/// A styled run of inline text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ListMarker {
    Bullet,
    Number { value: u64 },
    Checkbox { checked: bool },
}

impl ListMarker {
    /// Text label for text-based toolkits.
    pub fn label(&self) -> String {
        match self {
            ListMarker::Bullet => "•".to_string(),
            ListMarker::Number { value } => format!("{value}."),
            ListMarker::Checkbox { checked: true } => "☑".to_string(),
            ListMarker::Checkbox { checked: false } => "☐".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Set on the first row only; tables carry no explicit header flag.
    pub header: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    pub cells: Vec<Vec<StyledRun>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Heading {
        level: u8,
        runs: Vec<StyledRun>,
    },
    Paragraph {
        runs: Vec<StyledRun>,
    },
    ListItem {
        marker: ListMarker,
        marker_color: Color,
        level: usize,
        runs: Vec<StyledRun>,
    },
    Quote {
        level: usize,
        bar_color: Color,
        runs: Vec<StyledRun>,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        content: String,
        style: RunStyle,
    },
    Table {
        border_color: Color,
        rows: Vec<TableRow>,
    },
    Rule {
        color: Color,
    },
    Spacer,
}

impl Block {
    /// Every inline run sequence held by this block.
    pub fn run_groups(&self) -> Vec<&[StyledRun]> {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs }
            | Block::ListItem { runs, .. }
            | Block::Quote { runs, .. } => vec![runs.as_slice()],
            Block::Table { rows, .. } => rows
                .iter()
                .flat_map(|row| row.cells.iter().map(Vec::as_slice))
                .collect(),
            Block::Code { .. } | Block::Rule { .. } | Block::Spacer => Vec::new(),
        }
    }

    fn plain_text(&self) -> String {
        fn join(runs: &[StyledRun]) -> String {
            runs.iter().map(|r| r.text.as_str()).collect()
        }

        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs }
            | Block::ListItem { runs, .. }
            | Block::Quote { runs, .. } => join(runs),
            Block::Code { content, .. } => content.clone(),
            Block::Table { rows, .. } => rows
                .iter()
                .map(|row| {
                    row.cells
                        .iter()
                        .map(|cell| join(cell))
                        .collect::<Vec<_>>()
                        .join("\t")
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Rule { .. } | Block::Spacer => String::new(),
        }
    }
}

impl RenderedOutput {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// The whole input as one unstyled paragraph.
    ///
    /// This is what every renderer degrades to when its input cannot be
    /// interpreted.
    pub fn plain(text: &str, theme: &Theme) -> Self {
        Self::new(vec![Block::Paragraph {
            runs: vec![StyledRun::new(text, theme.body(theme.weights.paragraph))],
        }])
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Unstyled text of every block, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Every link target in document order.
    pub fn links(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(Block::run_groups)
            .flatten()
            .filter_map(|run| run.link.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_is_single_paragraph() {
        let theme = Theme::light();
        let output = RenderedOutput::plain("not { json", &theme);

        assert_eq!(output.blocks.len(), 1);
        assert_eq!(output.plain_text(), "not { json");
    }

    #[test]
    fn test_marker_labels() {
        assert_eq!(ListMarker::Number { value: 7 }.label(), "7.");
        assert_eq!(ListMarker::Checkbox { checked: true }.label(), "☑");
        assert_eq!(ListMarker::Bullet.label(), "•");
    }

    #[test]
    fn test_serializes_with_type_tags() {
        let output = RenderedOutput::new(vec![
            Block::Spacer,
            Block::Rule {
                color: Color::rgb(0, 0, 0),
            },
        ]);
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["blocks"][0]["type"], "spacer");
        assert_eq!(json["blocks"][1]["type"], "rule");
    }
}

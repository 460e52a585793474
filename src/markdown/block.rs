//! Line-oriented block parser.
//!
//! Each line (or run of lines, for fences and tables) is classified by the
//! first rule that matches, in this order: blank line, fenced code, table,
//! horizontal rule, heading, list item, blockquote, paragraph.

use super::inline::{InlineMarkdownProcessor, StyledSpans};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownBlock {
    Heading {
        spans: StyledSpans,
        level: u8,
    },
    Paragraph {
        spans: StyledSpans,
    },
    ListItem {
        spans: StyledSpans,
        level: usize,
    },
    OrderedListItem {
        spans: StyledSpans,
        number: u64,
        level: usize,
    },
    ChecklistItem {
        spans: StyledSpans,
        checked: bool,
        level: usize,
    },
    Quote {
        spans: StyledSpans,
        level: usize,
    },
    CodeBlock {
        content: String,
        language: Option<String>,
    },
    Table {
        headers: Vec<StyledSpans>,
        rows: Vec<Vec<StyledSpans>>,
    },
    HorizontalRule,
    LineBreak,
}

const FENCE: &str = "```";

/// Split markdown into classified blocks.
///
/// # Examples
///
/// ```
/// use kbrender::markdown::{MarkdownBlock, parse_blocks};
///
/// let blocks = parse_blocks("# Billing\n\n- [x] Update card");
/// assert!(matches!(blocks[0], MarkdownBlock::Heading { level: 1, .. }));
/// assert!(matches!(blocks[1], MarkdownBlock::LineBreak));
/// assert!(matches!(blocks[2], MarkdownBlock::ChecklistItem { checked: true, level: 0, .. }));
/// ```
pub fn parse_blocks(content: &str) -> Vec<MarkdownBlock> {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if i != 0 && i != lines.len() - 1 {
                blocks.push(MarkdownBlock::LineBreak);
            }
            i += 1;
            continue;
        }

        if let Some(info) = trimmed.strip_prefix(FENCE) {
            let language = Some(info.trim()).filter(|lang| !lang.is_empty()).map(str::to_string);
            let mut body = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim().starts_with(FENCE) {
                body.push(lines[i]);
                i += 1;
            }
            // Skip the closing fence; an unterminated fence has consumed the rest.
            i += 1;
            blocks.push(MarkdownBlock::CodeBlock {
                content: body.join("\n"),
                language,
            });
            continue;
        }

        if line.contains('|') && lines.get(i + 1).is_some_and(|next| next.contains('|')) {
            let end = lines[i..]
                .iter()
                .position(|l| !l.contains('|'))
                .map_or(lines.len(), |offset| i + offset);
            blocks.push(parse_table(&lines[i..end]));
            i = end;
            continue;
        }

        blocks.push(classify_line(line));
        i += 1;
    }

    blocks
}

fn classify_line(line: &str) -> MarkdownBlock {
    let trimmed = line.trim();

    if matches!(trimmed, "---" | "***" | "___") {
        return MarkdownBlock::HorizontalRule;
    }

    if let Some(level) = heading_level(line) {
        let text = line.trim_start()[level..].trim();
        return MarkdownBlock::Heading {
            spans: InlineMarkdownProcessor::process(text),
            level: level as u8,
        };
    }

    if let Some(block) = classify_list_item(line) {
        return block;
    }

    if trimmed.starts_with('>') {
        let (text, level) = strip_quote_markers(trimmed);
        return MarkdownBlock::Quote {
            spans: InlineMarkdownProcessor::process(text),
            level,
        };
    }

    MarkdownBlock::Paragraph {
        spans: InlineMarkdownProcessor::process(trimmed),
    }
}

/// Count of leading `#`s when they form an ATX heading marker (1-6 `#`s
/// followed by whitespace).
fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    let followed_by_space = trimmed[level..].starts_with(char::is_whitespace);
    ((1..=6).contains(&level) && followed_by_space).then_some(level)
}

fn classify_list_item(line: &str) -> Option<MarkdownBlock> {
    static ORDERED: OnceLock<Regex> = OnceLock::new();
    let ordered = ORDERED
        .get_or_init(|| Regex::new(r"^(\d+)\. (.+)$").expect("ordered list pattern must compile"));

    let body = line.trim_start_matches(' ');
    let level = (line.len() - body.len()) / 2;

    for (prefix, checked) in [("- [ ] ", false), ("- [x] ", true), ("- [X] ", true)] {
        if let Some(text) = body.strip_prefix(prefix) {
            return Some(MarkdownBlock::ChecklistItem {
                spans: InlineMarkdownProcessor::process(text),
                checked,
                level,
            });
        }
    }

    for prefix in ["- ", "* ", "+ "] {
        if let Some(text) = body.strip_prefix(prefix) {
            return Some(MarkdownBlock::ListItem {
                spans: InlineMarkdownProcessor::process(text),
                level,
            });
        }
    }

    let caps = ordered.captures(body)?;
    // Numbers too large for u64 are not list markers.
    let number = caps[1].parse().ok()?;
    Some(MarkdownBlock::OrderedListItem {
        spans: InlineMarkdownProcessor::process(&caps[2]),
        number,
        level,
    })
}

/// Strip leading `>` markers, each optionally followed by one space.
fn strip_quote_markers(mut text: &str) -> (&str, usize) {
    let mut level = 0;
    while let Some(rest) = text.strip_prefix('>') {
        level += 1;
        text = rest.strip_prefix(' ').unwrap_or(rest);
    }
    (text, level)
}

fn parse_table(lines: &[&str]) -> MarkdownBlock {
    let mut rows = lines
        .iter()
        // Separator rows carry no content; alignment markup is not kept.
        .filter(|line| !line.contains("---") && !line.contains("==="))
        .map(|line| split_cells(line));

    let headers = rows.next().unwrap_or_default();
    MarkdownBlock::Table {
        headers,
        rows: rows.collect(),
    }
}

fn split_cells(line: &str) -> Vec<StyledSpans> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(InlineMarkdownProcessor::process).collect()
}

//! Ratatui adapter: descriptors to a [`Text`] ready for a `Paragraph` widget.

use crate::output::{Block, RenderedOutput, StyledRun, TableRow};
use crate::style::{Color, RunStyle};
use ::ratatui::style::{Color as TuiColor, Modifier, Style};
use ::ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

/// Width of a horizontal rule, in cells
const RULE_WIDTH: usize = 40;

/// Padding on each side of a table cell
const CELL_PADDING: usize = 1;

pub fn to_text(output: &RenderedOutput) -> Text<'static> {
    let mut lines = Vec::new();
    for block in &output.blocks {
        push_block(&mut lines, block);
    }
    Text::from(lines)
}

pub fn color(color: Color) -> TuiColor {
    TuiColor::Rgb(color.r, color.g, color.b)
}

/// Map a run style onto terminal attributes.
pub fn run_style(style: &RunStyle) -> Style {
    let mut out = Style::default().fg(color(style.foreground));
    if let Some(background) = style.background {
        out = out.bg(color(background));
    }

    let mut modifiers = Modifier::empty();
    if style.font.weight.is_heavy() {
        modifiers |= Modifier::BOLD;
    }
    if style.italic {
        modifiers |= Modifier::ITALIC;
    }
    if style.underline {
        modifiers |= Modifier::UNDERLINED;
    }
    if style.strikethrough {
        modifiers |= Modifier::CROSSED_OUT;
    }
    out.add_modifier(modifiers)
}

fn push_block(lines: &mut Vec<Line<'static>>, block: &Block) {
    match block {
        Block::Heading { runs, .. } | Block::Paragraph { runs } => {
            push_runs(lines, Vec::new(), &[], runs);
        }
        Block::ListItem {
            marker,
            marker_color,
            level,
            runs,
        } => {
            let indent = "  ".repeat(*level);
            let label = format!("{} ", marker.label());
            let hanging = " ".repeat(indent.width() + label.width());
            let first = vec![
                Span::raw(indent),
                Span::styled(label, Style::default().fg(color(*marker_color))),
            ];
            push_runs(lines, first, &[Span::raw(hanging)], runs);
        }
        Block::Quote {
            level,
            bar_color,
            runs,
        } => {
            let bar = Span::styled("│ ".repeat(*level), Style::default().fg(color(*bar_color)));
            push_runs(lines, vec![bar.clone()], &[bar], runs);
        }
        Block::Code {
            label,
            content,
            style,
        } => {
            let style = run_style(style);
            if let Some(label) = label {
                lines.push(Line::from(Span::styled(
                    label.clone(),
                    style.add_modifier(Modifier::DIM),
                )));
            }
            lines.extend(
                content
                    .lines()
                    .map(|line| Line::from(Span::styled(line.to_string(), style))),
            );
        }
        Block::Table { border_color, rows } => {
            lines.extend(table_lines(rows, Style::default().fg(color(*border_color))));
        }
        Block::Rule { color: rule } => lines.push(Line::from(Span::styled(
            "─".repeat(RULE_WIDTH),
            Style::default().fg(color(*rule)),
        ))),
        Block::Spacer => lines.push(Line::default()),
    }
}

/// Lay out runs, starting a new line at every `\n` in their text.
/// Continuation lines begin with `rest` instead of `first`.
fn push_runs(
    lines: &mut Vec<Line<'static>>,
    first: Vec<Span<'static>>,
    rest: &[Span<'static>],
    runs: &[StyledRun],
) {
    let mut current = first;
    for run in runs {
        let style = run_style(&run.style);
        for (i, piece) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(std::mem::replace(&mut current, rest.to_vec())));
            }
            if !piece.is_empty() {
                current.push(Span::styled(piece.to_string(), style));
            }
        }
    }
    lines.push(Line::from(current));
}

fn table_lines(rows: &[TableRow], border: Style) -> Vec<Line<'static>> {
    let col_count = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    if col_count == 0 {
        return Vec::new();
    }
    let widths = column_widths(rows, col_count);

    let mut lines = vec![border_line(('┌', '┬', '┐'), &widths, border)];
    for (i, row) in rows.iter().enumerate() {
        lines.push(row_line(row, &widths, border));
        if row.header && i + 1 < rows.len() {
            lines.push(border_line(('├', '┼', '┤'), &widths, border));
        }
    }
    lines.push(border_line(('└', '┴', '┘'), &widths, border));
    lines
}

/// Widest cell per column, in display cells
fn column_widths(rows: &[TableRow], col_count: usize) -> Vec<usize> {
    let mut widths = vec![1; col_count];
    for row in rows {
        for (i, cell) in row.cells.iter().enumerate() {
            widths[i] = widths[i].max(cell_width(cell));
        }
    }
    widths
}

fn cell_text(text: &str) -> String {
    text.replace('\n', " ")
}

fn cell_width(cell: &[StyledRun]) -> usize {
    cell.iter().map(|run| cell_text(&run.text).width()).sum()
}

fn border_line((left, mid, right): (char, char, char), widths: &[usize], style: Style) -> Line<'static> {
    let mut border = String::from(left);
    for (i, width) in widths.iter().enumerate() {
        border.push_str(&"─".repeat(width + CELL_PADDING * 2));
        if i + 1 < widths.len() {
            border.push(mid);
        }
    }
    border.push(right);
    Line::from(Span::styled(border, style))
}

fn row_line(row: &TableRow, widths: &[usize], border: Style) -> Line<'static> {
    let fill = row
        .background
        .map_or_else(Style::default, |background| Style::default().bg(color(background)));

    let mut spans = vec![Span::styled("│", border)];
    for (i, width) in widths.iter().enumerate() {
        let cell = row.cells.get(i).map(Vec::as_slice).unwrap_or_default();

        spans.push(Span::styled(" ".repeat(CELL_PADDING), fill));
        for run in cell {
            let mut style = run_style(&run.style);
            if run.style.background.is_none() {
                style = style.patch(fill);
            }
            spans.push(Span::styled(cell_text(&run.text), style));
        }
        let pad = width - cell_width(cell) + CELL_PADDING;
        spans.push(Span::styled(" ".repeat(pad), fill));
        spans.push(Span::styled("│", border));
    }
    Line::from(spans)
}

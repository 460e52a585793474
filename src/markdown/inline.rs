//! Inline markdown: code, emphasis, strikethrough, links, hashtags, mentions.
//!
//! Processing works on an attributed string. Each pass scans the current
//! plain text for every match of its pattern, then edits the attributed
//! string from the last match to the first: marker characters are removed and
//! the pass's attribute is added to what remains. Editing back to front keeps
//! the byte offsets of the not-yet-applied matches valid.
//!
//! The pass order is fixed and matters. Text already styled as inline code is
//! never matched again, italic never matches inside bold text, and
//! autolinks/hashtags/mentions never match inside link text.

use crate::style::TextFormat;
use regex::{Captures, Regex};
use std::ops::{Deref, Range};
use std::sync::OnceLock;

/// Inline attributes of a span of markdown text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineStyle {
    pub format: TextFormat,
    pub link: Option<String>,
    pub hashtag: bool,
    pub mention: bool,
}

impl InlineStyle {
    fn is_code(&self) -> bool {
        self.format.contains(TextFormat::CODE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: InlineStyle,
}

impl StyledSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::default(),
        }
    }
}

/// Inline-processed text: a sequence of spans, adjacent spans never sharing
/// a style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledSpans(Vec<StyledSpan>);

impl StyledSpans {
    pub fn plain_text(&self) -> String {
        self.0.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<StyledSpan> {
        self.0
    }
}

impl Deref for StyledSpans {
    type Target = [StyledSpan];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<StyledSpan>> for StyledSpans {
    fn from(spans: Vec<StyledSpan>) -> Self {
        let mut merged: Vec<StyledSpan> = Vec::with_capacity(spans.len());
        for span in spans {
            if span.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == span.style => last.text.push_str(&span.text),
                _ => merged.push(span),
            }
        }
        Self(merged)
    }
}

/// Applies the fixed sequence of inline passes to one line of text.
pub struct InlineMarkdownProcessor;

impl InlineMarkdownProcessor {
    /// Style `text`. Unterminated or malformed markers stay literal.
    ///
    /// ```
    /// use kbrender::markdown::InlineMarkdownProcessor;
    ///
    /// let spans = InlineMarkdownProcessor::process("**a** *b*");
    /// assert_eq!(spans.plain_text(), "a b");
    /// ```
    pub fn process(text: &str) -> StyledSpans {
        let p = patterns();
        let mut attributed = AttributedText::new(text);

        attributed.run_pass(&p.code, Guard::Anywhere, wrap(TextFormat::CODE));

        attributed.run_pass(&p.bold_stars, Guard::OutsideCode, wrap(TextFormat::BOLD));
        attributed.run_pass(&p.bold_underscores, Guard::OutsideCode, wrap(TextFormat::BOLD));

        attributed.run_pass(&p.italic_star, Guard::LoneMarker('*'), wrap(TextFormat::ITALIC));
        attributed.run_pass(
            &p.italic_underscore,
            Guard::LoneMarker('_'),
            wrap(TextFormat::ITALIC),
        );

        attributed.run_pass(&p.strike, Guard::OutsideCode, wrap(TextFormat::STRIKETHROUGH));

        attributed.run_pass(&p.link, Guard::OutsideCode, |caps| {
            Edit::inner(caps, 1, Attribute::Link(caps[2].to_string()))
        });
        attributed.run_pass(&p.autolink, Guard::OutsideCodeAndLinks, |caps| {
            Edit::whole(caps, Attribute::Link(caps[0].to_string()))
        });

        attributed.run_pass(&p.hashtag, Guard::OutsideCodeAndLinks, |caps| {
            Edit::whole(caps, Attribute::Hashtag)
        });
        attributed.run_pass(&p.mention, Guard::OutsideCodeAndLinks, |caps| {
            Edit::whole(caps, Attribute::Mention)
        });

        attributed.into_spans()
    }
}

struct Patterns {
    code: Regex,
    bold_stars: Regex,
    bold_underscores: Regex,
    italic_star: Regex,
    italic_underscore: Regex,
    strike: Regex,
    link: Regex,
    autolink: Regex,
    hashtag: Regex,
    mention: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |pattern: &str| Regex::new(pattern).expect("inline pattern must compile");
        Patterns {
            code: re(r"`([^`]+)`"),
            bold_stars: re(r"\*\*(.+?)\*\*"),
            bold_underscores: re(r"__(.+?)__"),
            italic_star: re(r"\*([^*]+)\*"),
            italic_underscore: re(r"_([^_]+)_"),
            strike: re(r"~~(.+?)~~"),
            link: re(r"\[([^\]]+)\]\(([^)\s]+)\)"),
            autolink: re(r"https?://\S+"),
            hashtag: re(r"#[A-Za-z0-9_]+"),
            mention: re(r"@[A-Za-z0-9_]+"),
        }
    })
}

#[derive(Debug, Clone)]
enum Attribute {
    Format(TextFormat),
    Link(String),
    Hashtag,
    Mention,
}

impl Attribute {
    fn apply_to(&self, style: &mut InlineStyle) {
        match self {
            Attribute::Format(format) => style.format |= *format,
            Attribute::Link(url) => {
                style.link = Some(url.clone());
                style.format |= TextFormat::UNDERLINE;
            }
            Attribute::Hashtag => style.hashtag = true,
            Attribute::Mention => style.mention = true,
        }
    }
}

/// One match of a pass: `outer` is removed except for `inner`, which
/// receives `attribute`.
#[derive(Debug)]
struct Edit {
    outer: Range<usize>,
    inner: Range<usize>,
    attribute: Attribute,
}

impl Edit {
    fn inner(caps: &Captures<'_>, group: usize, attribute: Attribute) -> Option<Self> {
        Some(Self {
            outer: caps.get(0)?.range(),
            inner: caps.get(group)?.range(),
            attribute,
        })
    }

    fn whole(caps: &Captures<'_>, attribute: Attribute) -> Option<Self> {
        let range = caps.get(0)?.range();
        Some(Self {
            outer: range.clone(),
            inner: range,
            attribute,
        })
    }
}

fn wrap(format: TextFormat) -> impl Fn(&Captures<'_>) -> Option<Edit> {
    move |caps| Edit::inner(caps, 1, Attribute::Format(format))
}

/// Which candidate matches a pass must reject.
#[derive(Debug, Clone, Copy)]
enum Guard {
    Anywhere,
    OutsideCode,
    OutsideCodeAndLinks,
    /// Italic: outside code and bold, and not touching another copy of the
    /// marker. Underscores additionally must not sit inside a word.
    LoneMarker(char),
}

impl Guard {
    fn rejects_style(self, style: &InlineStyle) -> bool {
        match self {
            Guard::Anywhere => false,
            Guard::OutsideCode => style.is_code(),
            Guard::OutsideCodeAndLinks => style.is_code() || style.link.is_some(),
            Guard::LoneMarker(_) => style.is_code() || style.format.contains(TextFormat::BOLD),
        }
    }

    fn accepts_context(self, text: &str, range: &Range<usize>) -> bool {
        let Guard::LoneMarker(marker) = self else {
            return true;
        };
        let before = text[..range.start].chars().next_back();
        let after = text[range.end..].chars().next();
        let clashes = |c: Option<char>| {
            c.is_some_and(|c| c == marker || (marker == '_' && c.is_alphanumeric()))
        };
        !clashes(before) && !clashes(after)
    }
}

/// Text with per-span inline styles, edited in place by the passes.
struct AttributedText {
    spans: Vec<StyledSpan>,
}

impl AttributedText {
    fn new(text: &str) -> Self {
        let spans = if text.is_empty() {
            Vec::new()
        } else {
            vec![StyledSpan::plain(text)]
        };
        Self { spans }
    }

    fn plain(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn run_pass<F>(&mut self, regex: &Regex, guard: Guard, build: F)
    where
        F: Fn(&Captures<'_>) -> Option<Edit>,
    {
        let text = self.plain();
        let mut edits = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let Some(caps) = regex.captures_at(&text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let range = whole.range();

            let accepted = guard.accepts_context(&text, &range)
                && !self.overlaps(&range, |style| guard.rejects_style(style));

            match (accepted, build(&caps)) {
                (true, Some(edit)) => {
                    edits.push(edit);
                    pos = if range.is_empty() {
                        next_boundary(&text, range.end)
                    } else {
                        range.end
                    };
                }
                // A rejected candidate may hide a valid match starting inside
                // it, so resume one character later rather than after it.
                _ => pos = next_boundary(&text, range.start),
            }
        }

        for edit in edits.iter().rev() {
            self.apply_edit(edit);
        }
    }

    fn apply_edit(&mut self, edit: &Edit) {
        self.delete(edit.inner.end..edit.outer.end);
        self.delete(edit.outer.start..edit.inner.start);

        let start = edit.outer.start;
        let inner = start..start + edit.inner.len();
        let first = self.split_at(inner.start);
        let last = self.split_at(inner.end);
        for span in &mut self.spans[first..last] {
            edit.attribute.apply_to(&mut span.style);
        }
    }

    fn delete(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.spans.drain(first..last);
    }

    /// Ensure a span boundary at byte `offset`; returns the index of the span
    /// that starts there.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for index in 0..self.spans.len() {
            let len = self.spans[index].text.len();
            if offset == start {
                return index;
            }
            if offset < start + len {
                let tail = self.spans[index].text.split_off(offset - start);
                let style = self.spans[index].style.clone();
                self.spans.insert(index + 1, StyledSpan { text: tail, style });
                return index + 1;
            }
            start += len;
        }
        self.spans.len()
    }

    fn overlaps(&self, range: &Range<usize>, rejects: impl Fn(&InlineStyle) -> bool) -> bool {
        let mut start = 0;
        for span in &self.spans {
            let end = start + span.text.len();
            if start < range.end && range.start < end && rejects(&span.style) {
                return true;
            }
            start = end;
        }
        false
    }

    fn into_spans(self) -> StyledSpans {
        StyledSpans::from(self.spans)
    }
}

fn next_boundary(text: &str, from: usize) -> usize {
    text[from..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| from + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn styled(text: &str, format: TextFormat) -> StyledSpan {
        StyledSpan {
            text: text.to_string(),
            style: InlineStyle {
                format,
                ..InlineStyle::default()
            },
        }
    }

    fn process(text: &str) -> Vec<StyledSpan> {
        InlineMarkdownProcessor::process(text).into_vec()
    }

    #[test]
    fn test_bold_then_italic() {
        assert_eq!(
            process("**a** *b*"),
            vec![
                styled("a", TextFormat::BOLD),
                StyledSpan::plain(" "),
                styled("b", TextFormat::ITALIC),
            ]
        );
    }

    #[test]
    fn test_two_code_spans_keep_surrounding_text() {
        let input = "run `make` then `make install` twice";
        let spans = InlineMarkdownProcessor::process(input);

        assert_eq!(spans.plain_text(), input.replace('`', ""));
        let code: Vec<_> = spans
            .iter()
            .filter(|s| s.style.format.contains(TextFormat::CODE))
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(code, vec!["make", "make install"]);
    }

    #[test]
    fn test_code_content_is_not_processed_further() {
        assert_eq!(
            process("`code **bold** #tag` **out**"),
            vec![
                styled("code **bold** #tag", TextFormat::CODE),
                StyledSpan::plain(" "),
                styled("out", TextFormat::BOLD),
            ]
        );
    }

    #[test]
    fn test_unterminated_markers_stay_literal() {
        assert_eq!(process("a **b"), vec![StyledSpan::plain("a **b")]);
        assert_eq!(process("`open"), vec![StyledSpan::plain("`open")]);
        assert_eq!(process("~~x"), vec![StyledSpan::plain("~~x")]);
    }

    #[test]
    fn test_italic_underscore_and_snake_case() {
        assert_eq!(
            process("_note_ about snake_case_name"),
            vec![
                styled("note", TextFormat::ITALIC),
                StyledSpan::plain(" about snake_case_name"),
            ]
        );
        assert_eq!(process("a_b_c"), vec![StyledSpan::plain("a_b_c")]);
    }

    #[test]
    fn test_lone_star_after_rejected_candidate() {
        // "*a *" touches the unmatched "**"; the later "*b*" must still match.
        assert_eq!(
            process("**a *b*"),
            vec![StyledSpan::plain("**a "), styled("b", TextFormat::ITALIC)]
        );
    }

    #[test]
    fn test_bold_underscores_and_strike() {
        assert_eq!(
            process("__big__ ~~old~~"),
            vec![
                styled("big", TextFormat::BOLD),
                StyledSpan::plain(" "),
                styled("old", TextFormat::STRIKETHROUGH),
            ]
        );
    }

    #[test]
    fn test_link_keeps_inner_bold() {
        let spans = process("see [**docs**](https://example.com/a) now");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].text, "docs");
        assert_eq!(spans[1].style.link.as_deref(), Some("https://example.com/a"));
        assert!(spans[1].style.format.contains(TextFormat::BOLD | TextFormat::UNDERLINE));
    }

    #[test]
    fn test_autolink_uses_matched_text() {
        let spans = process("visit https://help.example.com/#faq today");
        assert_eq!(spans[1].text, "https://help.example.com/#faq");
        assert_eq!(
            spans[1].style.link.as_deref(),
            Some("https://help.example.com/#faq")
        );
        // The fragment is part of the link, not a hashtag.
        assert!(spans.iter().all(|s| !s.style.hashtag));
    }

    #[test]
    fn test_link_label_not_relinked() {
        let spans = process("[https://a.io](https://b.io)");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].style.link.as_deref(), Some("https://b.io"));
    }

    #[test]
    fn test_hashtags_and_mentions() {
        let spans = process("ping @support_team about #billing2");
        let tagged: Vec<_> = spans
            .iter()
            .filter(|s| s.style.hashtag || s.style.mention)
            .map(|s| (s.text.as_str(), s.style.hashtag, s.style.mention))
            .collect();
        assert_eq!(
            tagged,
            vec![("@support_team", false, true), ("#billing2", true, false)]
        );
    }

    #[test]
    fn test_multibyte_text_around_markers() {
        let spans = InlineMarkdownProcessor::process("héllo **wörld** ✓ *ünï*");
        assert_eq!(spans.plain_text(), "héllo wörld ✓ ünï");
        assert_eq!(spans[1].text, "wörld");
        assert_eq!(spans[3].text, "ünï");
    }

    #[test]
    fn test_empty_input() {
        assert!(process("").is_empty());
    }
}

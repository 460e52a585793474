//! Typed document tree and its JSON boundary.
//!
//! Editor state arrives as loosely shaped JSON. It is deserialized once into
//! [`RawNode`]s and then converted into [`DocumentNode`] variants; everything
//! downstream of [`parse`] works on typed variants only. Unknown node types
//! become paragraphs here, and nodes missing required fields are dropped here,
//! so the renderer never has to second-guess its input.

use crate::error::DocumentError;
use crate::style::TextFormat;
use crate::theme::heading_size;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
    Checklist,
}

impl ListKind {
    fn from_wire(list_type: Option<&str>) -> Self {
        match list_type {
            Some("number") => ListKind::Ordered,
            Some("check") => ListKind::Checklist,
            _ => ListKind::Unordered,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Root {
        children: Vec<DocumentNode>,
    },
    Paragraph {
        children: Vec<DocumentNode>,
    },
    Heading {
        tag: String,
        children: Vec<DocumentNode>,
    },
    List {
        kind: ListKind,
        start: u64,
        items: Vec<DocumentNode>,
    },
    ListItem {
        children: Vec<DocumentNode>,
        checked: Option<bool>,
    },
    Quote {
        children: Vec<DocumentNode>,
    },
    Code {
        language: Option<String>,
        children: Vec<DocumentNode>,
    },
    Link {
        url: String,
        children: Vec<DocumentNode>,
    },
    Hashtag {
        children: Vec<DocumentNode>,
    },
    Table {
        rows: Vec<DocumentNode>,
    },
    TableRow {
        cells: Vec<DocumentNode>,
    },
    TableCell {
        children: Vec<DocumentNode>,
    },
    HorizontalRule,
    LineBreak,
    TextRun {
        text: String,
        format: TextFormat,
    },
}

/// Heading level for an `h1`..`h6` tag.
pub fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Font size for a heading tag; unrecognized tags get 20.
pub fn heading_font_size(tag: &str) -> f32 {
    heading_size(heading_level(tag))
}

#[derive(Debug, Deserialize)]
struct Envelope {
    root: Option<RawNode>,
}

/// One node exactly as the editor serializes it.
///
/// `format` is an integer bit set on text nodes but an alignment string on
/// element nodes, so it stays untyped until conversion. Every other field is
/// read leniently: a value of the wrong type counts as absent, and children
/// stay untyped so that one malformed entry only loses itself.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawNode {
    #[serde(rename = "type", deserialize_with = "lenient")]
    kind: Option<String>,
    #[serde(deserialize_with = "lenient")]
    children: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient")]
    text: Option<String>,
    format: Value,
    #[serde(deserialize_with = "lenient")]
    tag: Option<String>,
    #[serde(deserialize_with = "lenient")]
    list_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    start: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    checked: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    language: Option<String>,
    #[serde(deserialize_with = "lenient")]
    url: Option<String>,
}

/// Deserialize a field, treating a value of the wrong type as missing.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl RawNode {
    fn text_format(&self) -> TextFormat {
        self.format
            .as_u64()
            .and_then(|bits| u32::try_from(bits).ok())
            .map(TextFormat::from_bits_truncate)
            .unwrap_or_default()
    }
}

/// Parse editor JSON into a typed tree rooted at [`DocumentNode::Root`].
///
/// # Errors
///
/// Fails when the input is not JSON, has no `root` object, or the root has
/// no `children` array. Problems below the root never fail the parse.
pub fn parse(raw: &str) -> Result<DocumentNode, DocumentError> {
    DocumentNode::from_envelope(serde_json::from_str(raw)?)
}

impl DocumentNode {
    /// Convert an already decoded editor state (the object holding `root`).
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Self::from_envelope(serde_json::from_value(value)?)
    }

    fn from_envelope(envelope: Envelope) -> Result<Self, DocumentError> {
        let root = envelope.root.ok_or(DocumentError::MissingRoot)?;
        let children = root.children.ok_or(DocumentError::MissingChildren)?;

        Ok(DocumentNode::Root {
            children: convert_all(children),
        })
    }
}

/// Element types that own a `children` array.
const ELEMENT_TYPES: &[&str] = &[
    "root",
    "paragraph",
    "heading",
    "list",
    "listitem",
    "quote",
    "code",
    "link",
    "autolink",
    "hashtag",
    "table",
    "tablerow",
    "tablecell",
];

fn convert_all(nodes: Vec<Value>) -> Vec<DocumentNode> {
    nodes
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawNode>(value) {
            Ok(raw) => convert(raw),
            Err(err) => {
                debug!(error = %err, "skipping child that is not a node object");
                None
            }
        })
        .collect()
}

fn convert(mut raw: RawNode) -> Option<DocumentNode> {
    let kind = raw.kind.take().unwrap_or_default();
    match kind.as_str() {
        "text" | "code-highlight" => {
            let format = raw.text_format();
            match raw.text {
                Some(text) => Some(DocumentNode::TextRun { text, format }),
                None => skip(&kind, "text"),
            }
        }
        "tab" => Some(DocumentNode::TextRun {
            text: "\t".to_string(),
            format: raw.text_format(),
        }),
        "linebreak" => Some(DocumentNode::LineBreak),
        "horizontalrule" => Some(DocumentNode::HorizontalRule),
        "hashtag" if raw.children.is_none() => {
            // Editors commonly store hashtags as text nodes.
            let format = raw.text_format();
            match raw.text {
                Some(text) => Some(DocumentNode::Hashtag {
                    children: vec![DocumentNode::TextRun { text, format }],
                }),
                None => skip(&kind, "children"),
            }
        }
        "link" | "autolink" if raw.url.is_none() => skip(&kind, "url"),
        _ => convert_element(&kind, raw),
    }
}

fn convert_element(kind: &str, raw: RawNode) -> Option<DocumentNode> {
    let format = raw.text_format();
    let Some(children) = raw.children else {
        // Unknown leaves (mentions, emoji) still show their text.
        return match raw.text {
            Some(text) if !ELEMENT_TYPES.contains(&kind) => {
                debug!(node_type = kind, "unknown leaf node, rendering its text");
                Some(DocumentNode::TextRun { text, format })
            }
            _ => skip(kind, "children"),
        };
    };
    let children = convert_all(children);

    let node = match kind {
        "root" => DocumentNode::Root { children },
        "paragraph" => DocumentNode::Paragraph { children },
        "heading" => DocumentNode::Heading {
            tag: raw.tag.unwrap_or_default(),
            children,
        },
        "list" => DocumentNode::List {
            kind: ListKind::from_wire(raw.list_type.as_deref()),
            start: raw.start.unwrap_or(1),
            items: children,
        },
        "listitem" => DocumentNode::ListItem {
            children,
            checked: raw.checked,
        },
        "quote" => DocumentNode::Quote { children },
        "code" => DocumentNode::Code {
            language: raw.language.filter(|lang| !lang.trim().is_empty()),
            children,
        },
        "link" | "autolink" => DocumentNode::Link {
            url: raw.url.unwrap_or_default(),
            children,
        },
        "hashtag" => DocumentNode::Hashtag { children },
        "table" => DocumentNode::Table { rows: children },
        "tablerow" => DocumentNode::TableRow { cells: children },
        "tablecell" => DocumentNode::TableCell { children },
        other => {
            debug!(node_type = other, "unknown node type, rendering as paragraph");
            DocumentNode::Paragraph { children }
        }
    };
    Some(node)
}

fn skip(kind: &str, field: &str) -> Option<DocumentNode> {
    debug!(node_type = kind, missing = field, "skipping node");
    None
}

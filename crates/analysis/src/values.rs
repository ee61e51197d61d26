use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for scenes and beats.
///
/// The analysis service emits both numeric (`"scene_id": 1`) and string
/// (`"beat_id": "1-1"`) identifiers; the wire form is kept so that
/// re-serialized exports match what the service sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ident {
    Int(i64),
    Text(String),
}

impl Ident {
    /// True when `raw` names this identifier (as typed on a command line).
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Ident::Int(n) => raw.trim().parse::<i64>().map(|v| v == *n).unwrap_or(false),
            Ident::Text(s) => s == raw,
        }
    }

    /// Filesystem friendly rendering, used in export file names.
    pub fn slug(&self) -> String {
        self.to_string()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ident::Int(n) => write!(f, "{n}"),
            Ident::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Ident {
    fn from(value: i64) -> Self {
        Ident::Int(value)
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident::Text(value.to_string())
    }
}

impl From<String> for Ident {
    fn from(value: String) -> Self {
        Ident::Text(value)
    }
}

/// Display field that may arrive as text or as a number.
///
/// Lighting `quality` is `80` from one service build and `"soft"` from
/// another; both are shown verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl Label {
    /// Empty text, zero and `false` count as "not provided" when picking a
    /// display fallback.
    pub fn is_blank(&self) -> bool {
        match self {
            Label::Text(s) => s.trim().is_empty(),
            Label::Number(n) => n.as_f64().map(|v| v == 0.0).unwrap_or(false),
            Label::Flag(b) => !*b,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Text(s) => write!(f, "{s}"),
            Label::Number(n) => write!(f, "{n}"),
            Label::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

/// Returns the label text, or `fallback` when the label is absent or blank.
pub fn label_or(label: Option<&Label>, fallback: &str) -> String {
    match label {
        Some(l) if !l.is_blank() => l.to_string(),
        _ => fallback.to_string(),
    }
}

/// Color in hex notation (`#RGB` or `#RRGGBB`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(pub String);

impl HexColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        match self.0.strip_prefix('#') {
            Some(digits) => {
                matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
            }
            None => false,
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

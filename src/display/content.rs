// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

/// Headings (`#` to `######`) and bullet items at the start of any line.
static MARKDOWN_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s|^\*\s|^-\s").ok());

const CODE_KEYWORDS: [&str; 5] = ["def ", "class ", "import ", "function ", "const "];

/// A value to be displayed: a step result, a tool input, a decoded payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Content {
    /// Nothing was provided.
    #[default]
    Absent,
    /// A string, possibly the debug representation of a foreign object.
    Text(String),
    /// A structured value (mapping, sequence, number or boolean).
    Json(Value),
}

impl Content {
    /// Classify a JSON value. Strings become [`Content::Text`] and null
    /// becomes [`Content::Absent`].
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }

    /// Whether there is anything worth showing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(s) => s.is_empty(),
            Self::Json(v) => !super::is_truthy(v),
        }
    }
}

impl From<Value> for Content {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("None"),
            Self::Text(s) => f.write_str(s),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Language tag of a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// JSON
    Json,
    /// Python
    Python,
    /// JavaScript
    JavaScript,
}

impl Language {
    /// Fence tag, also used as the syntax lookup token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Python => "python",
            Self::JavaScript => "javascript",
        }
    }
}

/// A renderable unit of panel body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A fenced code block, highlighted when a language is known.
    Code {
        /// Syntax of `body`, if detected.
        language: Option<Language>,
        /// The code itself, without fences.
        body: String,
    },
    /// Markdown rendered as-is.
    Markdown(String),
}

impl Block {
    /// Code block with an optional language tag.
    pub fn code(language: Option<Language>, body: impl Into<String>) -> Self {
        Self::Code {
            language,
            body: body.into(),
        }
    }

    /// The literal `None` block shown for absent values.
    #[must_use]
    pub fn none() -> Self {
        Self::code(None, "None")
    }

    /// The markdown source of this block, with fences for code.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        match self {
            Self::Code { language, body } => {
                let tag = language.map(Language::as_str).unwrap_or_default();
                format!("```{tag}\n{body}\n```")
            }
            Self::Markdown(text) => text.clone(),
        }
    }
}

/// Pick a display block for `content`.
///
/// Rules are tried in order and the first match wins: absent values, text
/// that parses as JSON, structured values, text that is already markdown,
/// multi-line source code, and finally a plain code block.
#[must_use]
pub fn render_content(content: &Content) -> Block {
    if content == &Content::Absent || matches!(content, Content::Text(s) if s.is_empty()) {
        return Block::none();
    }

    let text = content.to_string();
    let trimmed = text.trim();

    if trimmed.starts_with(['{', '['])
        && let Ok(parsed) = serde_json::from_str::<Value>(trimmed)
        && let Ok(formatted) = serde_json::to_string_pretty(&parsed)
    {
        return Block::code(Some(Language::Json), formatted);
    }

    if let Content::Json(value @ (Value::Object(_) | Value::Array(_))) = content
        && let Ok(formatted) = serde_json::to_string_pretty(value)
    {
        return Block::code(Some(Language::Json), formatted);
    }

    if text.contains("```") {
        return Block::Markdown(text);
    }

    if MARKDOWN_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(trimmed))
    {
        return Block::Markdown(text);
    }

    if text.contains('\n') && CODE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        if text.contains("def ") || text.contains("import ") {
            return Block::code(Some(Language::Python), text);
        }
        if text.contains("function ") || text.contains("const ") {
            return Block::code(Some(Language::JavaScript), text);
        }
    }

    Block::code(None, text)
}

// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

use super::content::Block;

/// Styling applied to one piece of a panel title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    /// Unstyled.
    Plain,
    /// Dimmed.
    Dim,
    /// Bold bright white.
    BoldWhite,
    /// Dimmed red.
    DimRed,
}

/// A run of title text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// The text.
    pub text: String,
    /// How to paint it.
    pub style: SpanStyle,
}

impl Span {
    fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A panel title made of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Title {
    /// Spans in display order.
    pub spans: Vec<Span>,
}

impl Title {
    /// Append a span.
    #[must_use]
    pub fn push(mut self, text: impl Into<String>, style: SpanStyle) -> Self {
        self.spans.push(Span::new(text, style));
        self
    }

    /// `🔧 <tool> Input`, dropping the name when the tool is unknown.
    #[must_use]
    pub fn tool_input(tool: Option<&str>) -> Self {
        let title = Self::default().push("🔧", SpanStyle::Dim).push(" ", SpanStyle::Plain);
        match tool {
            Some(name) => title
                .push(name, SpanStyle::BoldWhite)
                .push(" ", SpanStyle::Plain)
                .push("Input", SpanStyle::Dim),
            None => title.push("Input", SpanStyle::Dim),
        }
    }

    /// A single dimmed label.
    #[must_use]
    pub fn label(text: &str) -> Self {
        Self::default().push(text, SpanStyle::Dim)
    }

    /// Append ` ⏱️  <secs>s` when an execution time is known.
    #[must_use]
    pub fn with_elapsed(self, seconds: Option<f64>) -> Self {
        match seconds {
            Some(secs) => self
                .push(" ", SpanStyle::Plain)
                .push(format!("⏱️  {secs:.3}s"), SpanStyle::Dim),
            None => self,
        }
    }

    /// The title without styling.
    #[must_use]
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Border color of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Border {
    /// Dimmed white, for ordinary panels.
    Dim,
    /// Red, for errors.
    Error,
}

/// A titled, bordered block of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    /// Shown in the top border.
    pub title: Title,
    /// Panel content.
    pub body: Block,
    /// Border color.
    pub border: Border,
}

impl Panel {
    /// An ordinary panel.
    #[must_use]
    pub const fn new(title: Title, body: Block) -> Self {
        Self {
            title,
            body,
            border: Border::Dim,
        }
    }

    /// The red-bordered `Error` panel.
    #[must_use]
    pub fn error(body: Block) -> Self {
        Self {
            title: Title::default().push("Error", SpanStyle::DimRed),
            body,
            border: Border::Error,
        }
    }
}

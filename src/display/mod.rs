// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Rendering of agent steps and streaming events.
//!
//! Inputs are resolved into tagged unions ([`Step`], [`Content`],
//! [`StreamKind`], [`ToolOutput`]) at the boundary, turned into [`Panel`]s
//! and written to an injected [`OutputSink`].

use clap::ValueEnum;
use serde::Deserialize;

/// Terminal sink: box-drawn panels, syntax highlighting, markdown.
mod console;
/// Content renderer: picks a code/markdown block for an arbitrary value.
mod content;
/// Recovery of JSON payloads embedded in debug-style strings.
mod extract;
/// Entry point tying steps and stream events to a sink.
mod formatter;
/// Panel, title and border types.
mod panel;
/// Parsing of JSON-lines input for the CLI.
mod record;
/// Output sink trait and the in-memory sink.
mod sink;
/// Discrete agent steps and their presenters.
mod step;
/// Streaming events and their presenter.
mod stream;

pub use console::ConsoleSink;
pub use content::{Block, Content, Language, render_content};
pub use extract::{ParsedToolResult, extract_json_payload, is_truthy};
pub use formatter::EventFormatter;
pub use panel::{Border, Panel, Span, SpanStyle, Title};
pub use record::{Record, RecordError};
pub use sink::{Emitted, LogRecord, MemorySink, OutputSink};
pub use step::{Action, Step};
pub use stream::{StreamEvent, StreamKind, ToolOutput};

/// Default syntax-highlighting theme for every rendered code block.
pub const CODE_THEME: &str = "base16-ocean.dark";

/// Tool whose input and result get the code-execution layout.
pub const EXECUTE_CODE: &str = "execute_code";

/// How steps are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Titled, bordered panels on the terminal.
    #[default]
    Pretty,
    /// Single-line structured log records.
    Log,
}

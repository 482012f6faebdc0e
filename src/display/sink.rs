// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

use std::fmt;
use std::io;
use tracing::info;

use super::panel::Panel;

/// A single-line record produced in log mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// A tool was invoked.
    ToolCall {
        /// Tool name, `unknown` when the action carried none.
        tool: String,
        /// Truncated input.
        input: String,
    },
    /// A tool returned.
    ToolResult {
        /// Truncated, single-line output.
        output: String,
    },
    /// A step that is not an action/result pair.
    Step {
        /// The step's compact JSON form.
        summary: String,
    },
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolCall { tool, input } => {
                write!(f, "🔧 Tool call: {tool} with input: {input}")
            }
            Self::ToolResult { output } => write!(f, "📄 Tool result: {output}"),
            Self::Step { summary } => write!(f, "Agent step: {summary}"),
        }
    }
}

/// Where formatted output goes.
pub trait OutputSink {
    /// Emit an empty separator line.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn blank_line(&mut self) -> io::Result<()>;

    /// Emit a titled, bordered panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn panel(&mut self, panel: &Panel) -> io::Result<()>;

    /// Emit preformatted text followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn plain(&mut self, text: &str) -> io::Result<()>;

    /// Emit streamed model text immediately, without a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn stream_text(&mut self, text: &str) -> io::Result<()>;

    /// Emit a log-mode record. Defaults to an `info` event.
    ///
    /// # Errors
    ///
    /// The default implementation never fails.
    fn log(&mut self, record: &LogRecord) -> io::Result<()> {
        match record {
            LogRecord::ToolCall { tool, .. } => info!(tool = %tool, "{record}"),
            LogRecord::ToolResult { .. } | LogRecord::Step { .. } => info!("{record}"),
        }
        Ok(())
    }
}

/// Something a [`MemorySink`] received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    /// [`OutputSink::blank_line`]
    Blank,
    /// [`OutputSink::panel`]
    Panel(Panel),
    /// [`OutputSink::plain`]
    Plain(String),
    /// [`OutputSink::stream_text`]
    Stream(String),
    /// [`OutputSink::log`]
    Log(LogRecord),
}

/// Sink that records everything in order instead of printing it.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Emissions in the order they happened.
    pub emitted: Vec<Emitted>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Panels received, in order.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.emitted.iter().filter_map(|e| match e {
            Emitted::Panel(p) => Some(p),
            _ => None,
        })
    }

    /// All streamed text concatenated.
    #[must_use]
    pub fn streamed(&self) -> String {
        self.emitted
            .iter()
            .filter_map(|e| match e {
                Emitted::Stream(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Log records received, in order.
    #[must_use]
    pub fn logs(&self) -> Vec<&LogRecord> {
        self.emitted
            .iter()
            .filter_map(|e| match e {
                Emitted::Log(r) => Some(r),
                _ => None,
            })
            .collect()
    }
}

impl OutputSink for MemorySink {
    fn blank_line(&mut self) -> io::Result<()> {
        self.emitted.push(Emitted::Blank);
        Ok(())
    }

    fn panel(&mut self, panel: &Panel) -> io::Result<()> {
        self.emitted.push(Emitted::Panel(panel.clone()));
        Ok(())
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        self.emitted.push(Emitted::Plain(text.to_string()));
        Ok(())
    }

    fn stream_text(&mut self, text: &str) -> io::Result<()> {
        self.emitted.push(Emitted::Stream(text.to_string()));
        Ok(())
    }

    fn log(&mut self, record: &LogRecord) -> io::Result<()> {
        self.emitted.push(Emitted::Log(record.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_record_lines() {
        let call = LogRecord::ToolCall {
            tool: "sum_fish".to_string(),
            input: r#"{"a":1}"#.to_string(),
        };
        assert_eq!(
            call.to_string(),
            r#"🔧 Tool call: sum_fish with input: {"a":1}"#
        );
        let result = LogRecord::ToolResult {
            output: "1003".to_string(),
        };
        assert_eq!(result.to_string(), "📄 Tool result: 1003");
        let step = LogRecord::Step {
            summary: "\"done\"".to_string(),
        };
        assert_eq!(step.to_string(), "Agent step: \"done\"");
    }

    #[test]
    fn test_memory_sink_records_in_order() -> io::Result<()> {
        let mut sink = MemorySink::new();
        sink.blank_line()?;
        sink.stream_text("Hel")?;
        sink.stream_text("lo")?;
        sink.plain("x")?;
        assert_eq!(sink.emitted.len(), 4);
        assert_eq!(sink.emitted[0], Emitted::Blank);
        assert_eq!(sink.streamed(), "Hello");
        assert_eq!(sink.panels().count(), 0);
        Ok(())
    }
}

// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

use std::io;
use tracing::trace;

use super::DisplayMode;
use super::sink::OutputSink;
use super::step::Step;
use super::stream::{StreamEvent, StreamKind, chunk_text, tool_end_panels, tool_start_panels};

/// Presents agent steps and stream events on an [`OutputSink`].
///
/// Holds no state between calls apart from the sink itself, so one
/// formatter can be fed an entire event stream chunk by chunk.
#[derive(Debug)]
pub struct EventFormatter<S: OutputSink> {
    sink: S,
}

impl<S: OutputSink> EventFormatter<S> {
    /// Create a formatter writing to `sink`.
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Borrow the sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Take the sink back.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Show one agent step as panels or as log records.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails to write.
    pub fn show_step(&mut self, step: &Step, mode: DisplayMode) -> io::Result<()> {
        match mode {
            DisplayMode::Pretty => self.pretty_step(step),
            DisplayMode::Log => {
                for record in step.log_records() {
                    self.sink.log(&record)?;
                }
                Ok(())
            }
        }
    }

    fn pretty_step(&mut self, step: &Step) -> io::Result<()> {
        let Some(panels) = step.panels() else {
            let Step::Other(value) = step else {
                return Ok(());
            };
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            return self.sink.plain(&pretty);
        };

        self.sink.blank_line()?;
        for panel in &panels {
            self.sink.panel(panel)?;
        }
        Ok(())
    }

    /// Show one streaming event. Only pretty mode renders anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails to write.
    pub fn show_stream_event(&mut self, event: &StreamEvent, mode: DisplayMode) -> io::Result<()> {
        if mode == DisplayMode::Log {
            trace!("Skipping stream event {} in log mode", event.event);
            return Ok(());
        }

        match event.kind() {
            StreamKind::ToolStart { tool, input } => {
                self.sink.blank_line()?;
                for panel in tool_start_panels(tool, input) {
                    self.sink.panel(&panel)?;
                }
            }
            StreamKind::ToolEnd { tool, output } => {
                for panel in tool_end_panels(tool, &output) {
                    self.sink.panel(&panel)?;
                }
            }
            StreamKind::ModelStream { chunk: Some(chunk) } => {
                let text = chunk_text(chunk);
                if !text.is_empty() {
                    self.sink.stream_text(&text)?;
                }
            }
            StreamKind::ModelStream { chunk: None } => {}
            StreamKind::Ignored => {
                trace!("Ignoring stream event {}", event.event);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::content::{Block, Language};
    use crate::display::panel::Border;
    use crate::display::sink::{Emitted, LogRecord, MemorySink};
    use anyhow::Result;
    use serde_json::{Value, json};

    fn formatter() -> EventFormatter<MemorySink> {
        EventFormatter::new(MemorySink::new())
    }

    fn stream(value: Value) -> Result<StreamEvent> {
        Ok(serde_json::from_value(value)?)
    }

    #[test]
    fn test_pretty_step_emits_blank_then_panels() -> Result<()> {
        let mut fmt = formatter();
        let step = Step::from(json!([
            {"tool": "execute_code", "tool_input": {"code": "print(1)"}},
            "text='{\"result\": 5, \"logs\": \"\", \"execution_time\": 0.002}', annotations=None"
        ]));
        fmt.show_step(&step, DisplayMode::Pretty)?;

        let sink = fmt.into_sink();
        assert_eq!(sink.emitted[0], Emitted::Blank);
        let titles: Vec<String> = sink.panels().map(|p| p.title.plain()).collect();
        assert_eq!(titles, vec!["🔧 execute_code Input", "Result ⏱️  0.002s"]);
        Ok(())
    }

    #[test]
    fn test_error_panel_is_distinct() -> Result<()> {
        let mut fmt = formatter();
        let step = Step::from(json!([
            {"tool": "execute_code", "tool_input": {"code": "boom()"}},
            "text='{\"result\": null, \"logs\": \"ran\", \"error\": \"boom\"}', annotations=None"
        ]));
        fmt.show_step(&step, DisplayMode::Pretty)?;

        let panels: Vec<_> = fmt.sink().panels().collect();
        assert_eq!(panels.len(), 3);
        assert!(panels.iter().all(|p| p.title.plain() != "Result"));
        assert_eq!(panels[1].title.plain(), "Logs");
        assert_eq!(panels[1].border, Border::Dim);
        assert_eq!(panels[2].border, Border::Error);
        Ok(())
    }

    #[test]
    fn test_non_pair_step_is_pretty_printed() -> Result<()> {
        let mut fmt = formatter();
        fmt.show_step(&Step::from(json!({"final": "answer"})), DisplayMode::Pretty)?;
        assert_eq!(
            fmt.sink().emitted,
            vec![Emitted::Plain("{\n  \"final\": \"answer\"\n}".to_string())]
        );
        Ok(())
    }

    #[test]
    fn test_log_mode_step() -> Result<()> {
        let mut fmt = formatter();
        let step = Step::from(json!([{"tool": "sum_fish", "tool_input": {"a": 1, "b": 2}}, "1003"]));
        fmt.show_step(&step, DisplayMode::Log)?;
        assert_eq!(
            fmt.sink().logs(),
            vec![
                &LogRecord::ToolCall {
                    tool: "sum_fish".to_string(),
                    input: r#"{"a":1,"b":2}"#.to_string(),
                },
                &LogRecord::ToolResult {
                    output: "1003".to_string()
                },
            ]
        );
        assert_eq!(fmt.sink().panels().count(), 0);
        Ok(())
    }

    #[test]
    fn test_stream_tool_start_and_end() -> Result<()> {
        let mut fmt = formatter();
        fmt.show_stream_event(
            &stream(json!({
                "event": "on_tool_start",
                "name": "math/sum_fish",
                "data": {"input": {"a": 1, "b": 2}}
            }))?,
            DisplayMode::Pretty,
        )?;
        fmt.show_stream_event(
            &stream(json!({
                "event": "on_tool_end",
                "name": "math/sum_fish",
                "data": {"output": {"content": "1003"}}
            }))?,
            DisplayMode::Pretty,
        )?;

        let sink = fmt.into_sink();
        assert_eq!(sink.emitted[0], Emitted::Blank);
        let panels: Vec<_> = sink.panels().collect();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].title.plain(), "🔧 sum_fish Input");
        assert_eq!(
            panels[0].body,
            Block::code(Some(Language::Json), "{\n  \"a\": 1,\n  \"b\": 2\n}")
        );
        assert_eq!(panels[1].title.plain(), "Result");
        assert_eq!(panels[1].body, Block::code(None, "1003"));
        Ok(())
    }

    #[test]
    fn test_stream_tokens_skip_json_deltas() -> Result<()> {
        let mut fmt = formatter();
        let chunks = [
            json!([{"type": "text", "text": "The sum "}]),
            json!([{"type": "input_json_delta", "text": "{\"a\": 1"}]),
            json!([{"type": "text", "text": "is 1003."}]),
        ];
        for content in chunks {
            fmt.show_stream_event(
                &stream(json!({
                    "event": "on_chat_model_stream",
                    "data": {"chunk": {"content": content}}
                }))?,
                DisplayMode::Pretty,
            )?;
        }

        let sink = fmt.into_sink();
        assert_eq!(sink.streamed(), "The sum is 1003.");
        assert!(!sink.streamed().contains("\"a\""));
        // Fragments with nothing to show are not written at all.
        assert_eq!(sink.emitted.len(), 2);
        Ok(())
    }

    #[test]
    fn test_stream_ignored_and_log_mode() -> Result<()> {
        let mut fmt = formatter();
        fmt.show_stream_event(
            &stream(json!({"event": "on_chain_end", "data": {"output": "x"}}))?,
            DisplayMode::Pretty,
        )?;
        fmt.show_stream_event(
            &stream(json!({"event": "on_tool_start", "name": "t", "data": {"input": {"a": 1}}}))?,
            DisplayMode::Log,
        )?;
        fmt.show_stream_event(
            &stream(json!({"event": "on_chat_model_stream", "data": {}}))?,
            DisplayMode::Pretty,
        )?;
        assert!(fmt.sink().emitted.is_empty());
        Ok(())
    }
}

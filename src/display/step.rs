// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

use serde_json::{Map, Value};

use super::EXECUTE_CODE;
use super::content::{Block, Content, Language, render_content};
use super::extract::{ParsedToolResult, extract_json_payload, is_truthy};
use super::panel::{Panel, Title};
use super::sink::LogRecord;
use crate::cli;

/// Longest input or result shown in a log-mode record.
const LOG_PREVIEW_LEN: usize = 100;

/// The action half of an agent step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    /// Name of the tool invoked.
    pub tool: Option<String>,
    /// Arguments passed to the tool: usually a mapping, sometimes a bare string.
    pub tool_input: Content,
}

impl Action {
    /// Read `tool` and `tool_input` out of a JSON value. Missing fields are
    /// left empty; a non-string `tool` is ignored.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            tool: value
                .get("tool")
                .and_then(Value::as_str)
                .map(str::to_string),
            tool_input: value
                .get("tool_input")
                .cloned()
                .map(Content::from_value)
                .unwrap_or_default(),
        }
    }

    /// The input as shown in a log record: compact JSON for structured
    /// input, the string itself otherwise.
    fn input_summary(&self) -> String {
        match &self.tool_input {
            Content::Absent => "{}".to_string(),
            other => other.to_string(),
        }
    }
}

/// One unit of agent execution history.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// An action and what it returned.
    Pair {
        /// The tool invocation.
        action: Action,
        /// The tool's result.
        result: Content,
    },
    /// Anything that is not an action/result pair.
    Other(Value),
}

impl Step {
    /// Build an action/result pair.
    pub fn pair(action: Action, result: impl Into<Content>) -> Self {
        Self::Pair {
            action,
            result: result.into(),
        }
    }

    /// Panels shown for this step in pretty mode. `None` for non-pairs.
    #[must_use]
    pub fn panels(&self) -> Option<Vec<Panel>> {
        let Self::Pair { action, result } = self else {
            return None;
        };
        let tool = action.tool.as_deref();
        let mut panels = action_input_panels(tool, &action.tool_input);
        if !result.is_empty() {
            panels.extend(result_panels(tool, result));
        }
        Some(panels)
    }

    /// Records emitted for this step in log mode.
    #[must_use]
    pub fn log_records(&self) -> Vec<LogRecord> {
        match self {
            Self::Pair { action, result } => {
                let input = action.input_summary();
                let output = cli::truncate(&result.to_string(), LOG_PREVIEW_LEN).replace('\n', " ");
                vec![
                    LogRecord::ToolCall {
                        tool: action.tool.clone().unwrap_or_else(|| "unknown".to_string()),
                        input: cli::truncate(&input, LOG_PREVIEW_LEN),
                    },
                    LogRecord::ToolResult { output },
                ]
            }
            Self::Other(value) => vec![LogRecord::Step {
                summary: value.to_string(),
            }],
        }
    }
}

impl From<Value> for Step {
    /// A two-element array is an action/result pair; the action fields are
    /// read from the first element when it is a mapping.
    fn from(value: Value) -> Self {
        match value {
            Value::Array(mut items) if items.len() == 2 => {
                let result = items.pop().unwrap_or_default();
                let action = items.pop().unwrap_or_default();
                Self::Pair {
                    action: Action::from_value(&action),
                    result: Content::from_value(result),
                }
            }
            other => Self::Other(other),
        }
    }
}

/// Panels describing a tool's input, whatever its shape. Empty when there
/// is no input.
pub(super) fn action_input_panels(tool: Option<&str>, input: &Content) -> Vec<Panel> {
    match input {
        Content::Json(Value::Object(map)) => input_panels(tool, map),
        other if !other.is_empty() => {
            vec![Panel::new(Title::tool_input(tool), render_content(other))]
        }
        _ => Vec::new(),
    }
}

/// Panels describing a mapping input. Empty when the mapping is.
fn input_panels(tool: Option<&str>, input: &Map<String, Value>) -> Vec<Panel> {
    if input.is_empty() {
        return Vec::new();
    }

    if tool == Some(EXECUTE_CODE)
        && let Some(code) = input.get("code")
    {
        let code = Content::from_value(code.clone()).to_string();
        let mut panels = vec![Panel::new(
            Title::tool_input(tool),
            Block::code(Some(Language::Python), code),
        )];

        let others: Map<String, Value> = input
            .iter()
            .filter(|(k, _)| k.as_str() != "code")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !others.is_empty() {
            panels.push(Panel::new(
                Title::label("Other Parameters"),
                render_content(&Content::Json(Value::Object(others))),
            ));
        }
        return panels;
    }

    vec![Panel::new(
        Title::tool_input(tool),
        render_content(&Content::Json(Value::Object(input.clone()))),
    )]
}

/// Panels describing a tool's result.
///
/// A JSON payload embedded in the result's text is preferred over the raw
/// result; `execute_code` payloads are split into result, logs and error.
pub(super) fn result_panels(tool: Option<&str>, result: &Content) -> Vec<Panel> {
    let payload = extract_json_payload(&result.to_string()).filter(is_truthy);

    match payload {
        Some(Value::Object(map)) if tool == Some(EXECUTE_CODE) => {
            execution_panels(&ParsedToolResult::from_map(&map))
        }
        Some(value) => vec![Panel::new(
            Title::label("Result"),
            render_content(&Content::from_value(value)),
        )],
        None => vec![Panel::new(Title::label("Result"), render_content(result))],
    }
}

fn execution_panels(parsed: &ParsedToolResult) -> Vec<Panel> {
    let mut panels = Vec::new();
    let has_logs = parsed.has_logs();

    // The elapsed time goes on the last regular panel: Logs when present.
    if parsed.has_result() {
        let elapsed = if has_logs { None } else { parsed.execution_time };
        let body = Content::from_value(parsed.result.clone().unwrap_or_default());
        panels.push(Panel::new(
            Title::label("Result").with_elapsed(elapsed),
            render_content(&body),
        ));
    }

    if has_logs {
        let body = Content::from_value(parsed.logs.clone().unwrap_or_default());
        panels.push(Panel::new(
            Title::label("Logs").with_elapsed(parsed.execution_time),
            render_content(&body),
        ));
    }

    if parsed.has_error() {
        let body = Content::from_value(parsed.error.clone().unwrap_or_default());
        panels.push(Panel::error(render_content(&body)));
    }

    panels
}

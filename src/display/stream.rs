// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

use serde::Deserialize;
use serde_json::{Map, Value};

use super::content::Content;
use super::extract::is_truthy;
use super::panel::Panel;
use super::step::{action_input_panels, result_panels};

/// Chunk elements of this type carry partial tool-call arguments.
const INPUT_JSON_DELTA: &str = "input_json_delta";

static NULL: Value = Value::Null;

/// One event from an agent's event stream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamEvent {
    /// Event tag, e.g. `on_tool_start`.
    #[serde(default)]
    pub event: String,
    /// Emitter name; for tools, possibly `server/tool`.
    #[serde(default)]
    pub name: String,
    /// Event payload.
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// What a [`StreamEvent`] means for display.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamKind<'a> {
    /// A tool is about to run.
    ToolStart {
        /// Tool name without any `server/` prefix.
        tool: &'a str,
        /// Tool input; `Null` when missing.
        input: &'a Value,
    },
    /// A tool finished.
    ToolEnd {
        /// Tool name without any `server/` prefix.
        tool: &'a str,
        /// The tool's output, classified.
        output: ToolOutput,
    },
    /// A model token chunk; `None` when the event carried no chunk.
    ModelStream {
        /// The chunk object.
        chunk: Option<&'a Value>,
    },
    /// Any other event.
    Ignored,
}

impl StreamEvent {
    /// Last `/`-separated segment of `name`.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Classify this event.
    #[must_use]
    pub fn kind(&self) -> StreamKind<'_> {
        match self.event.as_str() {
            "on_tool_start" => StreamKind::ToolStart {
                tool: self.tool_name(),
                input: self.data.get("input").unwrap_or(&NULL),
            },
            "on_tool_end" => StreamKind::ToolEnd {
                tool: self.tool_name(),
                output: ToolOutput::from_value(self.data.get("output").unwrap_or(&NULL)),
            },
            "on_chat_model_stream" => StreamKind::ModelStream {
                chunk: self.data.get("chunk").filter(|c| !c.is_null()),
            },
            _ => StreamKind::Ignored,
        }
    }
}

/// The `output` of an `on_tool_end` event.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A tool message object; holds its `content`.
    Message(Value),
    /// A plain mapping with a `content` key; holds that value.
    Mapping(Value),
    /// Anything else, held whole.
    Other(Value),
}

impl ToolOutput {
    /// Classify an output value.
    ///
    /// Tool messages are recognized by `"type": "tool"` or a
    /// `tool_call_id`, the way serialized tool messages look.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::Other(value.clone());
        };
        let Some(content) = obj.get("content") else {
            return Self::Other(value.clone());
        };

        let is_message = obj.get("type").and_then(Value::as_str) == Some("tool")
            || obj.contains_key("tool_call_id");
        if is_message {
            Self::Message(content.clone())
        } else {
            Self::Mapping(content.clone())
        }
    }

    /// Whether there is an output to show at all.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            // A message or mapping object is never empty: it has `content`.
            Self::Message(_) | Self::Mapping(_) => true,
            Self::Other(v) => is_truthy(v),
        }
    }

    /// The text passed on to result rendering.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Message(Value::Array(items)) if !items.is_empty() => {
                let texts: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.get("text"))
                    .map(|text| Content::from_value(text.clone()).to_string())
                    .collect();
                match texts.as_slice() {
                    [] => Value::Array(items.clone()).to_string(),
                    [only] => only.clone(),
                    _ => Value::from(texts).to_string(),
                }
            }
            Self::Message(content) | Self::Mapping(content) | Self::Other(content) => {
                stringify(content)
            }
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Panels for a tool-start event.
pub(super) fn tool_start_panels(tool: &str, input: &Value) -> Vec<Panel> {
    action_input_panels(Some(tool), &Content::from_value(input.clone()))
}

/// Panels for a tool-end event.
pub(super) fn tool_end_panels(tool: &str, output: &ToolOutput) -> Vec<Panel> {
    if !output.is_present() {
        return Vec::new();
    }
    result_panels(Some(tool), &Content::Text(output.display_text()))
}

/// Text carried by a model chunk, minus tool-call argument fragments.
pub(super) fn chunk_text(chunk: &Value) -> String {
    match chunk.get("content") {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str) != Some(INPUT_JSON_DELTA))
            .filter_map(|item| item.get("text").and_then(Value::as_str))
            .collect(),
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    }
}

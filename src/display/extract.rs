// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::trace;

/// `text='<payload>', annotations=` as printed by debug representations of
/// MCP text content. Greedy, so the payload runs to the last terminator.
static TEXT_CONTENT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)text='(.*)',\s*annotations=").ok());

/// Recover a JSON payload that an upstream layer wrapped in a debug string.
///
/// Returns `None` when the wrapper is missing or the payload is not JSON.
#[must_use]
pub fn extract_json_payload(result: &str) -> Option<Value> {
    let re = TEXT_CONTENT_PATTERN.as_ref()?;
    let captured = re.captures(result)?.get(1)?.as_str();

    let unescaped = captured.replace("\\'", "'").replace("\\\\", "\\");
    match serde_json::from_str(&unescaped) {
        Ok(value) => Some(value),
        Err(e) => {
            trace!("Embedded payload is not JSON: {}", e);
            None
        }
    }
}

/// Whether `value` counts as "something" for display decisions.
///
/// Null, `false`, zero, and empty strings, sequences and mappings do not.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// The result of a code-execution tool, as decoded from its payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedToolResult {
    /// Value produced by the executed code.
    pub result: Option<Value>,
    /// Captured output.
    pub logs: Option<Value>,
    /// Error raised during execution.
    pub error: Option<Value>,
    /// Wall time in seconds.
    pub execution_time: Option<f64>,
}

impl ParsedToolResult {
    /// Pick the recognized fields out of a decoded payload.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            result: map.get("result").cloned(),
            logs: map.get("logs").cloned(),
            error: map.get("error").cloned(),
            execution_time: map.get("execution_time").and_then(Value::as_f64),
        }
    }

    /// A non-null `result` is present.
    #[must_use]
    pub fn has_result(&self) -> bool {
        self.result.as_ref().is_some_and(|v| !v.is_null())
    }

    /// `logs` is present and non-empty.
    #[must_use]
    pub fn has_logs(&self) -> bool {
        self.logs.as_ref().is_some_and(is_truthy)
    }

    /// A non-null `error` is present.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.as_ref().is_some_and(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use serde_json::json;

    #[test]
    fn test_extracts_simple_payload() {
        let s = r#"[TextContent(type='text', text='{"a": 1}', annotations=None)]"#;
        assert_eq!(extract_json_payload(s), Some(json!({"a": 1})));
    }

    #[test]
    fn test_unescapes_quotes() {
        let s = r#"text='{"a": "it\'s ok"}', annotations=None"#;
        assert_eq!(extract_json_payload(s), Some(json!({"a": "it's ok"})));
    }

    #[test]
    fn test_unescapes_backslashes_after_quotes() {
        // A doubled backslash in the debug form is a single one in the payload,
        // which JSON then reads as the escape for a newline.
        let s = r#"text='{"logs": "a\\nb"}', annotations=None"#;
        assert_eq!(extract_json_payload(s), Some(json!({"logs": "a\nb"})));
    }

    #[test]
    fn test_greedy_across_newlines() {
        let s = "text='{\"a\":\n \"x\"}', annotations=None";
        assert_eq!(extract_json_payload(s), Some(json!({"a": "x"})));
    }

    #[test]
    fn test_big_integers_survive_extraction() -> Result<()> {
        let s = r#"text='{"result": 98765432109876543210987654321, "execution_time": 0.5}', annotations=None"#;
        let payload = extract_json_payload(s).context("payload expected")?;
        assert_eq!(
            payload.to_string(),
            r#"{"result":98765432109876543210987654321,"execution_time":0.5}"#
        );

        let parsed = ParsedToolResult::from_map(payload.as_object().context("not an object")?);
        assert!(parsed.has_result());
        assert_eq!(parsed.execution_time, Some(0.5));
        assert!(is_truthy(&payload["result"]));
        Ok(())
    }

    #[test]
    fn test_missing_pattern_or_bad_json() {
        assert_eq!(extract_json_payload(r#"{"a": 1}"#), None);
        assert_eq!(extract_json_payload("text='nope', annotations=None"), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!([])));
        assert!(is_truthy(&json!("ran")));
        assert!(is_truthy(&json!(0.5)));
    }

    #[test]
    fn test_parsed_tool_result_flags() -> Result<()> {
        let payload = json!({"result": null, "logs": "ran", "error": "boom"});
        let parsed = ParsedToolResult::from_map(payload.as_object().context("not an object")?);
        assert!(!parsed.has_result());
        assert!(parsed.has_logs());
        assert!(parsed.has_error());
        assert_eq!(parsed.execution_time, None);

        let payload = json!({"result": 5, "logs": "", "execution_time": 0.002});
        let parsed = ParsedToolResult::from_map(payload.as_object().context("not an object")?);
        assert!(parsed.has_result());
        assert!(!parsed.has_logs());
        assert!(!parsed.has_error());
        assert_eq!(parsed.execution_time, Some(0.002));
        Ok(())
    }
}

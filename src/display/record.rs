// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

use serde_json::Value;
use thiserror::Error;

use super::step::Step;
use super::stream::StreamEvent;

/// Failure to turn a line of input into a [`Record`].
#[derive(Debug, Error)]
pub enum RecordError {
    /// The line is not JSON.
    #[error("line is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The line is a stream event with a malformed field.
    #[error("malformed stream event: {0}")]
    Event(serde_json::Error),
}

/// One line of `steplight render` input.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// An agent step: `[action, result]`, or anything else.
    Step(Step),
    /// A streaming event: an object with an `event` string.
    Stream(StreamEvent),
}

impl Record {
    /// Parse a JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the line is not JSON, or looks like a
    /// stream event but its `name` or `data` have the wrong shape.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(line)?;
        if value.get("event").is_some_and(Value::is_string) {
            let event = serde_json::from_value(value).map_err(RecordError::Event)?;
            return Ok(Self::Stream(event));
        }
        Ok(Self::Step(Step::from(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::content::Content;
    use crate::display::step::Action;
    use anyhow::Result;

    #[test]
    fn test_parse_step_pair() -> Result<()> {
        let record = Record::parse(r#"[{"tool": "sum_fish", "tool_input": {"a": 1}}, "1003"]"#)?;
        let Record::Step(Step::Pair { action, result }) = record else {
            anyhow::bail!("expected a step pair");
        };
        assert_eq!(action.tool.as_deref(), Some("sum_fish"));
        assert_eq!(result, Content::Text("1003".to_string()));
        Ok(())
    }

    #[test]
    fn test_parse_pair_with_non_mapping_action() -> Result<()> {
        let record = Record::parse("[1, 2]")?;
        assert_eq!(
            record,
            Record::Step(Step::Pair {
                action: Action::default(),
                result: Content::Json(serde_json::json!(2)),
            })
        );
        Ok(())
    }

    #[test]
    fn test_parse_stream_event() -> Result<()> {
        let record = Record::parse(r#"{"event": "on_tool_end", "name": "a/b", "data": {"output": "x"}}"#)?;
        let Record::Stream(event) = record else {
            anyhow::bail!("expected a stream event");
        };
        assert_eq!(event.tool_name(), "b");
        Ok(())
    }

    #[test]
    fn test_parse_other_values_are_steps() -> Result<()> {
        assert!(matches!(Record::parse(r#"{"event": 3}"#)?, Record::Step(Step::Other(_))));
        assert!(matches!(Record::parse("\"done\"")?, Record::Step(Step::Other(_))));
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Record::parse("not json"), Err(RecordError::Json(_))));
        assert!(matches!(
            Record::parse(r#"{"event": "on_tool_start", "data": []}"#),
            Err(RecordError::Event(_))
        ));
    }
}

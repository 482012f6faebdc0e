// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! The example tool set: one arithmetic tool.

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use super::server::ToolHandler;
use super::types::{CallToolResult, Tool};

/// Offset `sum_fish` adds to every sum, so its answers are recognizable.
const FISH_OFFSET: i64 = 1000;

#[derive(Debug, Deserialize)]
struct SumArgs {
    a: i64,
    b: i64,
}

/// Tools exposed by `steplight serve`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExampleTools;

impl ExampleTools {
    fn sum_fish(arguments: Option<Value>) -> Result<CallToolResult> {
        let args: SumArgs = serde_json::from_value(arguments.unwrap_or_else(|| json!({})))
            .context("sum_fish expects integer arguments 'a' and 'b'")?;

        let sum = args
            .a
            .checked_add(args.b)
            .and_then(|s| s.checked_add(FISH_OFFSET))
            .ok_or_else(|| anyhow!("sum_fish overflowed for a={} b={}", args.a, args.b))?;

        debug!("sum_fish({}, {}) = {}", args.a, args.b, sum);
        Ok(CallToolResult::text(sum.to_string()))
    }
}

impl ToolHandler for ExampleTools {
    fn list_tools(&self) -> Vec<Tool> {
        vec![Tool {
            name: "sum_fish".to_string(),
            description: Some("Sum two numbers.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "a": { "type": "integer" },
                    "b": { "type": "integer" }
                },
                "required": ["a", "b"]
            }),
        }]
    }

    fn call_tool(&self, name: &str, arguments: Option<Value>) -> Result<CallToolResult> {
        match name {
            "sum_fish" => Self::sum_fish(arguments),
            _ => bail!("Unknown tool: {name}"),
        }
    }
}

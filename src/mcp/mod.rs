// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

/// MCP server implementation over newline-delimited JSON-RPC.
mod server;
/// Example tools served by `steplight serve`.
mod tools;
/// MCP type definitions and JSON-RPC messages.
mod types;

pub use server::{McpServer, ToolHandler};
pub use tools::ExampleTools;
pub use types::{
    CallToolParams, CallToolResult, ClientInfo, INTERNAL_ERROR, InitializeParams,
    InitializeResult, ListToolsResult, METHOD_NOT_FOUND, Notification, PROTOCOL_VERSION, Request,
    RequestId, Response, ResponseError, ServerCapabilities, ServerInfo, Tool, ToolContent,
    ToolsCapability,
};

/// Former name of [`McpServer`], kept so existing callers keep compiling.
#[deprecated(since = "0.3.0", note = "use `McpServer`")]
pub type FastMcp<H> = McpServer<H>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(deprecated, reason = "Exercises the compatibility alias")]
    fn test_fast_mcp_alias_is_mcp_server() {
        let server: FastMcp<ExampleTools> = McpServer::new(ExampleTools, "alias");
        assert!(!server.is_initialized());
    }
}

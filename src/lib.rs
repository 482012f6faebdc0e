// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Steplight renders what an agent does with its tools.
//!
//! It turns agent steps (a tool call plus its result) and streaming events
//! (tool start, tool end, model tokens) into terminal panels or log lines,
//! and ships a small MCP server with one example tool to point agents at.

/// Command-line interface definitions and utilities.
pub mod cli;
/// Configuration for rendering and the example server.
pub mod config;
/// Formatting of agent steps and streaming events.
pub mod display;
/// MCP server implementation and type definitions.
pub mod mcp;

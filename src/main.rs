// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Steplight CLI.
//!
//! Runs the example MCP server, or renders agent steps and streaming events
//! read as JSON lines.

#![allow(clippy::print_stdout, reason = "CLI tool needs to output to stdout")]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use steplight::cli::ColorConfig;
use steplight::config::Config;
use steplight::display::{ConsoleSink, DisplayMode, EventFormatter, Record, StreamKind};
use steplight::mcp::{ExampleTools, McpServer};

/// Command-line arguments for Steplight.
#[derive(Parser, Debug)]
#[command(name = "steplight")]
#[command(about = "Render agent tool calls and results, or run the example MCP server")]
#[command(version = env!("STEPLIGHT_VERSION"))]
struct Args {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Subcommands supported by Steplight.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run the example MCP server on stdin/stdout (default if no subcommand given).
    Serve,

    /// Render agent steps and stream events, one JSON value per line.
    ///
    /// A line holding an object with an "event" string is a stream event;
    /// `[action, result]` is a step; anything else is printed as-is.
    Render {
        /// File to read (defaults to stdin).
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Panels or log records. Overrides the config file.
        #[arg(long, value_enum)]
        mode: Option<DisplayMode>,

        /// Disable colored output.
        #[arg(long)]
        nocolor: bool,
    },
}

/// Entry point for the Steplight binary.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the subcommand fails.
fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("steplight=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(args.config.clone())?;

    match args.command {
        None | Some(Command::Serve) => run_server(&config),
        Some(Command::Render {
            input,
            mode,
            nocolor,
        }) => run_render(&config, input, mode, nocolor),
    }
}

/// Runs the example MCP server.
///
/// # Errors
///
/// Returns an error if stdin or stdout fail.
fn run_server(config: &Config) -> Result<()> {
    info!("Serving example tools as '{}'", config.server.name);
    let mut server = McpServer::new(ExampleTools, config.server.name.clone())
        .with_instructions(config.server.instructions.clone());
    server.run()
}

/// Runs the render command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or stdout cannot be written.
fn run_render(
    config: &Config,
    input: Option<PathBuf>,
    mode: Option<DisplayMode>,
    nocolor: bool,
) -> Result<()> {
    let mode = mode.unwrap_or(config.display.mode);
    let colors = ColorConfig::new(nocolor || !config.display.color);
    let sink = ConsoleSink::stdout(colors, &config.display.code_theme);
    let mut formatter = EventFormatter::new(sink);

    let reader: Box<dyn BufRead> = match &input {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("Failed to open {}", path.display())
        })?)),
        None => Box::new(std::io::stdin().lock()),
    };

    debug!("Rendering in {:?} mode", mode);

    // Streamed tokens are written without newlines; end the last run cleanly.
    let mut mid_stream = false;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match Record::parse(&line) {
            Ok(Record::Step(step)) => {
                if std::mem::take(&mut mid_stream) {
                    println!();
                }
                formatter.show_step(&step, mode)?;
            }
            Ok(Record::Stream(event)) => {
                let is_tokens = matches!(event.kind(), StreamKind::ModelStream { .. });
                if !is_tokens && std::mem::take(&mut mid_stream) {
                    println!();
                }
                formatter.show_stream_event(&event, mode)?;
                mid_stream |= is_tokens && mode == DisplayMode::Pretty;
            }
            Err(e) => warn!("Skipping line {}: {}", idx + 1, e),
        }
    }

    if mid_stream {
        println!();
    }
    Ok(())
}

/*
 * Copyright (C) 2026 Mark Wells Dev
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::display::{CODE_THEME, DisplayMode};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Rendering settings for `steplight render`
    #[serde(default)]
    pub display: DisplayConfig,

    /// Identity reported by the example MCP server
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Syntax-highlighting theme name (default: `CODE_THEME`)
    #[serde(default = "default_code_theme")]
    pub code_theme: String,

    /// Pretty panels or single-line log records (default: pretty)
    #[serde(default)]
    pub mode: DisplayMode,

    /// Whether to emit ANSI colors when stdout is a TTY (default: true)
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            code_theme: default_code_theme(),
            mode: DisplayMode::default(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Name sent in the `initialize` response
    #[serde(default = "default_server_name")]
    pub name: String,

    /// Instructions sent in the `initialize` response
    #[serde(default = "default_instructions")]
    pub instructions: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            instructions: default_instructions(),
        }
    }
}

fn default_code_theme() -> String {
    CODE_THEME.to_string()
}

const fn default_color() -> bool {
    true
}

fn default_server_name() -> String {
    "Example Server".to_string()
}

#[allow(
    clippy::unnecessary_wraps,
    reason = "serde default functions must match the field type"
)]
fn default_instructions() -> Option<String> {
    Some("This is an example server with a simple arithmetic tool.".to_string())
}

impl Config {
    /// Load configuration from standard paths or a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source cannot be read or does not
    /// deserialize into [`Config`].
    pub fn load(explicit_file: Option<PathBuf>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // 1. Start with defaults
        builder = builder
            .set_default("display.code_theme", CODE_THEME)?
            .set_default("display.color", true)?;

        // 2. Load from user config directory (~/.config/steplight/config.toml)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("steplight").join("config.toml");
            if config_path.exists() {
                builder = builder.add_source(config::File::from(config_path));
            }
        }

        // 3. Load from explicit file if provided
        if let Some(path) = explicit_file {
            builder = builder.add_source(config::File::from(path));
        }

        // 4. Load from environment variables (STEPLIGHT_DISPLAY__MODE, etc.)
        builder = builder.add_source(
            config::Environment::with_prefix("STEPLIGHT")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.code_theme, CODE_THEME);
        assert_eq!(config.display.mode, DisplayMode::Pretty);
        assert!(config.display.color);
        assert_eq!(config.server.name, "Example Server");
    }

    #[test]
    fn test_load_explicit_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(
            file,
            "[display]\nmode = \"log\"\ncode_theme = \"InspiredGitHub\"\n\n[server]\nname = \"Fish Server\""
        )?;

        let config = Config::load(Some(file.path().to_path_buf()))?;
        assert_eq!(config.display.mode, DisplayMode::Log);
        assert_eq!(config.display.code_theme, "InspiredGitHub");
        assert_eq!(config.server.name, "Fish Server");
        assert!(config.display.color);
        Ok(())
    }
}

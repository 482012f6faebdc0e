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

//! CLI utilities for terminal output formatting and colors.

use crossterm::tty::IsTty;
use regex::Regex;
use std::io::stdout;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

static ANSI_ESCAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").ok());

static LEADING_ANSI_ESCAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\x1b\[[0-9;]*m").ok());

/// SGR sequence that clears every style.
const RESET: &str = "\x1b[0m";

/// Configuration for color output
#[derive(Debug, Clone)]
pub struct ColorConfig {
    /// Whether ANSI escapes are emitted.
    pub enabled: bool,
}

impl ColorConfig {
    /// Create a new `ColorConfig`, auto-detecting TTY unless nocolor is true
    #[must_use]
    pub fn new(nocolor: bool) -> Self {
        Self {
            enabled: !nocolor && stdout().is_tty(),
        }
    }

    /// Wrap `s` in an SGR sequence when colors are enabled.
    fn paint(&self, code: &str, s: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    /// ANSI escape code for red (errors)
    #[must_use]
    pub fn red(&self, s: &str) -> String {
        self.paint("31", s)
    }

    /// Dim red, used for error panel titles
    #[must_use]
    pub fn dim_red(&self, s: &str) -> String {
        self.paint("2;31", s)
    }

    /// ANSI escape code for cyan (list bullets, links)
    #[must_use]
    pub fn cyan(&self, s: &str) -> String {
        self.paint("36", s)
    }

    /// ANSI escape code for dim text
    #[must_use]
    pub fn dim(&self, s: &str) -> String {
        self.paint("2", s)
    }

    /// Bold bright white, used for tool names
    #[must_use]
    pub fn bold_white(&self, s: &str) -> String {
        self.paint("1;97", s)
    }

    /// Bold
    #[must_use]
    pub fn bold(&self, s: &str) -> String {
        self.paint("1", s)
    }

    /// Italic
    #[must_use]
    pub fn italic(&self, s: &str) -> String {
        self.paint("3", s)
    }
}

/// Get the terminal width, defaulting to 80 if unable to detect
#[must_use]
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(80)
}

/// Truncate a string to `max_len` characters, adding "..." if truncated
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len <= 3 {
        return ".".repeat(max_len.min(3));
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Remove SGR escape sequences from `s`.
#[must_use]
pub fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.as_ref().map_or_else(
        || s.to_string(),
        |re| re.replace_all(s, "").into_owned(),
    )
}

/// Number of terminal columns `s` occupies once escape sequences are removed.
#[must_use]
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).width()
}

/// Split a line into pieces that each fit within `width` columns.
///
/// Used for code lines, which must not be re-flowed on whitespace. Escape
/// sequences take no columns; a style open at a split is closed at the end
/// of one piece and reopened at the start of the next.
#[must_use]
pub fn hard_wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 || visible_width(line) <= width {
        return vec![line.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut active = String::new();
    let mut rest = line;

    while let Some(ch) = rest.chars().next() {
        if let Some(seq) = LEADING_ANSI_ESCAPE
            .as_ref()
            .and_then(|re| re.find(rest))
            .map(|m| m.as_str())
        {
            current.push_str(seq);
            active = if seq == RESET {
                String::new()
            } else {
                seq.to_string()
            };
            rest = &rest[seq.len()..];
            continue;
        }

        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > width && current_width > 0 {
            if !active.is_empty() {
                current.push_str(RESET);
            }
            pieces.push(std::mem::take(&mut current));
            current.push_str(&active);
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
        rest = &rest[ch.len_utf8()..];
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

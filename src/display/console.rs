// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Mark Wells <contact@markwells.dev>

//! Terminal output: panels drawn with box characters, code highlighted with
//! syntect, markdown laid out with pulldown-cmark.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use std::io::{self, Stdout, Write};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use tracing::{debug, warn};

use super::CODE_THEME;
use super::content::Block;
use super::panel::{Border, Panel, SpanStyle, Title};
use super::sink::OutputSink;
use crate::cli::{self, ColorConfig};

/// Narrowest panel body we will lay out, regardless of terminal width.
const MIN_INNER_WIDTH: usize = 20;

/// Syntax highlighting with a fixed theme.
struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    fn new(theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes.remove(theme_name).unwrap_or_else(|| {
            warn!("Unknown code theme '{}', using {}", theme_name, CODE_THEME);
            themes.remove(CODE_THEME).unwrap_or_default()
        });

        Self {
            syntaxes: SyntaxSet::load_defaults_nonewlines(),
            theme,
        }
    }

    /// Highlight `lines` as `language`, one terminal line per input line.
    fn highlight(&self, lines: &[String], language: &str) -> Vec<String> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        lines
            .iter()
            .map(|line| match highlighter.highlight_line(line, &self.syntaxes) {
                Ok(ranges) => format!("{}\x1b[0m", as_24_bit_terminal_escaped(&ranges, false)),
                Err(e) => {
                    debug!("Highlighting failed for {}: {}", language, e);
                    line.clone()
                }
            })
            .collect()
    }
}

/// Sink that draws on a terminal (or anything else implementing [`Write`]).
pub struct ConsoleSink<W: Write> {
    out: W,
    colors: ColorConfig,
    width: usize,
    highlighter: Highlighter,
}

impl ConsoleSink<Stdout> {
    /// Sink on standard output, sized to the terminal.
    #[must_use]
    pub fn stdout(colors: ColorConfig, code_theme: &str) -> Self {
        Self::new(io::stdout(), colors, cli::terminal_width(), code_theme)
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Sink on `out`, drawing panels `width` columns wide.
    pub fn new(out: W, colors: ColorConfig, width: usize, code_theme: &str) -> Self {
        Self {
            out,
            colors,
            width,
            highlighter: Highlighter::new(code_theme),
        }
    }

    /// Take the writer back.
    pub fn into_inner(self) -> W {
        self.out
    }

    const fn inner_width(&self) -> usize {
        let inner = self.width.saturating_sub(4);
        if inner < MIN_INNER_WIDTH {
            MIN_INNER_WIDTH
        } else {
            inner
        }
    }

    fn paint_title(&self, title: &Title) -> String {
        title
            .spans
            .iter()
            .map(|span| match span.style {
                SpanStyle::Plain => span.text.clone(),
                SpanStyle::Dim => self.colors.dim(&span.text),
                SpanStyle::BoldWhite => self.colors.bold_white(&span.text),
                SpanStyle::DimRed => self.colors.dim_red(&span.text),
            })
            .collect()
    }

    fn paint_border(&self, border: Border, s: &str) -> String {
        match border {
            Border::Dim => self.colors.dim(s),
            Border::Error => self.colors.red(s),
        }
    }

    /// Lay out a block as terminal lines no wider than `width` columns.
    fn block_lines(&self, block: &Block, width: usize) -> Vec<String> {
        match block {
            Block::Code { language, body } => {
                self.code_lines(language.map(|l| l.as_str()), body, width)
            }
            Block::Markdown(text) => self.markdown_lines(text, width),
        }
    }

    fn code_lines(&self, language: Option<&str>, body: &str, width: usize) -> Vec<String> {
        let lines: Vec<String> = body.split('\n').map(str::to_string).collect();

        // Highlight whole source lines so wrapped pieces keep their scope.
        let lines = match language {
            Some(lang) if self.colors.enabled => self.highlighter.highlight(&lines, lang),
            _ => lines,
        };

        lines
            .iter()
            .flat_map(|line| cli::hard_wrap(line, width))
            .collect()
    }

    #[allow(clippy::too_many_lines, reason = "Match arms for each markdown event")]
    fn markdown_lines(&self, text: &str, width: usize) -> Vec<String> {
        let mut layout = MarkdownLayout::new(width);
        let mut lists: Vec<Option<u64>> = Vec::new();
        let mut code: Option<(String, String)> = None;
        let mut heading = false;
        let mut strong = false;
        let mut emphasis = false;

        for event in Parser::new(text) {
            match event {
                Event::Start(Tag::Heading(..)) => {
                    layout.flush();
                    heading = true;
                }
                Event::End(Tag::Heading(..)) => {
                    heading = false;
                    layout.flush();
                    layout.blank();
                }
                Event::Start(Tag::Paragraph) => {
                    // Loose list items wrap their text in a paragraph; keep the bullet.
                    if lists.is_empty() {
                        layout.flush();
                    }
                }
                Event::End(Tag::Paragraph) => {
                    layout.flush();
                    if lists.is_empty() {
                        layout.blank();
                    }
                }
                Event::Start(Tag::List(start)) => {
                    layout.flush();
                    lists.push(start);
                }
                Event::End(Tag::List(_)) => {
                    lists.pop();
                    if lists.is_empty() {
                        layout.blank();
                    }
                }
                Event::Start(Tag::Item) => {
                    layout.flush();
                    let indent = "  ".repeat(lists.len().saturating_sub(1));
                    let marker = match lists.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{n}.");
                            *n += 1;
                            marker
                        }
                        _ => "•".to_string(),
                    };
                    layout.push(&format!("{indent}{} ", self.colors.cyan(&marker)));
                }
                Event::End(Tag::Item) => layout.flush(),
                Event::Start(Tag::CodeBlock(kind)) => {
                    layout.flush();
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => lang.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some((lang, String::new()));
                }
                Event::End(Tag::CodeBlock(_)) => {
                    if let Some((lang, body)) = code.take() {
                        let language = Some(lang.as_str()).filter(|l| !l.is_empty());
                        let body = body.strip_suffix('\n').unwrap_or(&body);
                        layout.extend(self.code_lines(language, body, width));
                        layout.blank();
                    }
                }
                Event::Start(Tag::Strong) => strong = true,
                Event::End(Tag::Strong) => strong = false,
                Event::Start(Tag::Emphasis) => emphasis = true,
                Event::End(Tag::Emphasis) => emphasis = false,
                Event::Text(text) => {
                    if let Some((_, body)) = code.as_mut() {
                        body.push_str(&text);
                    } else if heading || strong {
                        layout.push(&self.colors.bold(&text));
                    } else if emphasis {
                        layout.push(&self.colors.italic(&text));
                    } else {
                        layout.push(&text);
                    }
                }
                Event::Code(text) => layout.push(&self.colors.cyan(&text)),
                Event::SoftBreak => layout.push(" "),
                Event::HardBreak => layout.flush(),
                Event::Rule => {
                    layout.flush();
                    layout.extend(vec![self.colors.dim(&"─".repeat(width))]);
                }
                _ => {}
            }
        }

        layout.finish()
    }

    fn write_panel(&mut self, panel: &Panel) -> io::Result<()> {
        let inner = self.inner_width();
        let span = inner + 2;

        let mut title = self.paint_title(&panel.title);
        let mut title_width = cli::visible_width(&title);
        if title_width + 2 > span {
            title = cli::truncate(&panel.title.plain(), span.saturating_sub(2));
            title_width = cli::visible_width(&title);
        }

        let top = if title_width == 0 {
            self.paint_border(panel.border, &format!("╭{}╮", "─".repeat(span)))
        } else {
            let fill = span.saturating_sub(title_width + 2);
            let left = fill / 2;
            let right = fill - left;
            format!(
                "{}{}{}",
                self.paint_border(panel.border, &format!("╭{} ", "─".repeat(left))),
                title,
                self.paint_border(panel.border, &format!(" {}╮", "─".repeat(right))),
            )
        };
        writeln!(self.out, "{top}")?;

        let edge = self.paint_border(panel.border, "│");
        for line in self.block_lines(&panel.body, inner) {
            let pad = inner.saturating_sub(cli::visible_width(&line));
            writeln!(self.out, "{edge} {line}{} {edge}", " ".repeat(pad))?;
        }

        let bottom = self.paint_border(panel.border, &format!("╰{}╯", "─".repeat(span)));
        writeln!(self.out, "{bottom}")
    }
}

impl<W: Write> OutputSink for ConsoleSink<W> {
    fn blank_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    fn panel(&mut self, panel: &Panel) -> io::Result<()> {
        self.write_panel(panel)?;
        self.out.flush()
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn stream_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

/// Accumulates styled markdown text into wrapped lines.
struct MarkdownLayout {
    width: usize,
    current: String,
    lines: Vec<String>,
}

impl MarkdownLayout {
    const fn new(width: usize) -> Self {
        Self {
            width,
            current: String::new(),
            lines: Vec::new(),
        }
    }

    fn push(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.current);
        // textwrap measures width without ANSI escapes.
        self.lines.extend(
            textwrap::wrap(&line, self.width)
                .into_iter()
                .map(std::borrow::Cow::into_owned),
        );
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn extend(&mut self, lines: Vec<String>) {
        self.lines.extend(lines);
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::content::Language;
    use anyhow::{Context, Result};

    fn sink(width: usize) -> ConsoleSink<Vec<u8>> {
        ConsoleSink::new(Vec::new(), ColorConfig { enabled: false }, width, CODE_THEME)
    }

    fn output(sink: ConsoleSink<Vec<u8>>) -> Result<String> {
        Ok(String::from_utf8(sink.into_inner())?)
    }

    #[test]
    fn test_panel_layout() -> Result<()> {
        let mut console = sink(30);
        console.panel(&Panel::new(
            Title::label("Result"),
            Block::code(None, "5"),
        ))?;
        let text = output(console)?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("╭"));
        assert!(lines[0].contains(" Result "));
        assert!(lines[0].ends_with("╮"));
        assert!(lines[1].starts_with("│ 5"));
        assert!(lines[1].ends_with(" │"));
        assert!(lines[2].starts_with("╰"));
        for line in &lines {
            assert_eq!(cli::visible_width(line), 30, "{line:?}");
        }
        Ok(())
    }

    #[test]
    fn test_long_code_lines_wrap_inside_panel() -> Result<()> {
        let mut console = sink(30);
        console.panel(&Panel::new(
            Title::label("Logs"),
            Block::code(Some(Language::Python), "x".repeat(60)),
        ))?;
        let text = output(console)?;
        // 26 columns of body per line.
        assert_eq!(text.lines().count(), 5);
        Ok(())
    }

    #[test]
    fn test_wrapped_comment_keeps_its_color() -> Result<()> {
        let console = ConsoleSink::new(Vec::new(), ColorConfig { enabled: true }, 40, CODE_THEME);
        let source = format!("# {}", "comment ".repeat(6));
        let pieces = console.code_lines(Some("python"), source.trim_end(), 20);

        assert!(pieces.len() > 1);
        let joined: String = pieces.iter().map(|p| cli::strip_ansi(p)).collect();
        assert_eq!(joined, source.trim_end());

        // The continuation opens with the style the first piece ended in.
        let first = &pieces[0];
        let start = first.rfind("\x1b[38;2;").context("first piece is unstyled")?;
        let end = first[start..].find('m').context("unterminated escape")?;
        let style = &first[start..=start + end];
        for piece in &pieces[1..] {
            assert!(piece.starts_with(style), "{piece:?}");
            assert!(cli::visible_width(piece) <= 20);
        }
        Ok(())
    }

    #[test]
    fn test_markdown_body() -> Result<()> {
        let mut console = sink(40);
        console.panel(&Panel::new(
            Title::label("Result"),
            Block::Markdown("# Title\n\n- one\n- two\n\n```python\nprint(1)\n```".to_string()),
        ))?;
        let text = output(console)?;
        assert!(text.contains("│ Title"));
        assert!(text.contains("│ • one"));
        assert!(text.contains("│ • two"));
        assert!(text.contains("│ print(1)"));
        assert!(!text.contains("```"));
        Ok(())
    }

    #[test]
    fn test_stream_text_has_no_newline() -> Result<()> {
        let mut console = sink(40);
        console.stream_text("Hel")?;
        console.stream_text("lo")?;
        assert_eq!(output(console)?, "Hello");
        Ok(())
    }

    #[test]
    fn test_highlighting_when_colors_enabled() -> Result<()> {
        let mut console = ConsoleSink::new(
            Vec::new(),
            ColorConfig { enabled: true },
            40,
            "no-such-theme",
        );
        console.panel(&Panel::new(
            Title::tool_input(Some("execute_code")),
            Block::code(Some(Language::Python), "print(1)"),
        ))?;
        let text = output(console)?;
        assert!(text.contains("\x1b["));
        assert!(cli::strip_ansi(&text).contains("│ print(1)"));
        Ok(())
    }
}

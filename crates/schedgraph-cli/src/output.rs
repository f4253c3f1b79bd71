//! Shared output layer: pretty, text and JSON for every command.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `[output] format` in `sg.toml`
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use schedgraph_core::ErrorCode;
use serde::{Deserialize, Serialize};

use crate::error::code_for;

pub const PRETTY_RULE_WIDTH: usize = 72;

pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Heading followed by a rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<16} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-oriented sections and tables.
    Pretty,
    /// Compact `key=value` lines for pipes and agents.
    Text,
    /// One pretty-printed JSON document.
    Json,
}

fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_mode: Option<OutputMode>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }
    if json_flag {
        return OutputMode::Json;
    }
    if let Some(mode) = format_env.and_then(|val| OutputMode::from_str(val, true).ok()) {
        return mode;
    }
    if let Some(mode) = config_mode {
        return mode;
    }
    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_mode: Option<OutputMode>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_mode,
        io::stdout().is_terminal(),
    )
}

/// Write `value` to `w` with the renderer matching `mode`.
pub fn render_to<T: Serialize>(
    w: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, value)?;
            writeln!(w)?;
        }
        OutputMode::Text => text_fn(value, w)?,
        OutputMode::Pretty => pretty_fn(value, w)?,
    }
    Ok(())
}

/// [`render_to`] on locked stdout.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_to(&mut out, mode, value, text_fn, pretty_fn)
}

// ────────────────────────────────────────────────────────────────────────────
// Tables
// ────────────────────────────────────────────────────────────────────────────

/// Column-aligned table; numeric-looking cells are right-aligned.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn write(&self, w: &mut dyn Write) -> io::Result<()> {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .chain(std::iter::once(&self.headers[col]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &width)| format!("{h:<width$}"))
            .collect();
        writeln!(w, "{}", header.join("  ").trim_end())?;
        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        writeln!(w, "{:-<total$}", "")?;

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| {
                    if looks_numeric(cell) {
                        format!("{cell:>width$}")
                    } else {
                        format!("{cell:<width$}")
                    }
                })
                .collect();
            writeln!(w, "{}", cells.join("  ").trim_end())?;
        }
        Ok(())
    }
}

fn looks_numeric(cell: &str) -> bool {
    cell.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '-')
        && cell.chars().any(|c| c.is_ascii_digit())
        && cell
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | 'x' | ','))
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Structured error for stderr.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl CliError {
    #[must_use]
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code: ErrorCode = code_for(err);
        Self {
            error: format!("{err:#}"),
            code: code.code(),
            hint: code.hint(),
        }
    }
}

pub fn render_error_to(w: &mut dyn Write, mode: OutputMode, error: &CliError) -> io::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, error)?;
            writeln!(w)
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(w, "error[{}]: {}", error.code, error.error)?;
            if let Some(hint) = error.hint {
                writeln!(w, "  hint: {hint}")?;
            }
            Ok(())
        }
    }
}

pub fn render_error(mode: OutputMode, error: &CliError) -> io::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    render_error_to(&mut out, mode, error)
}

/// `Some(d)` as a string, or `-` for the unreachable sentinel.
#[must_use]
pub fn dist_cell(dist: Option<i64>) -> String {
    dist.map_or_else(|| "-".to_string(), |d| d.to_string())
}

//! Rendering for `--output` and the stderr status lines.
//!
//! Lists render as a rounded table, single records as a `Key: value`
//! block. The structured formats serialize the domain values as-is and
//! `plain` prints one id per line for piping into other commands.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color ───────────────────────────────────────────────────────────

pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        ColorMode::Always => true,
        ColorMode::Never => false,
    }
}

/// `✓ message` on stderr. Suppressed by `--quiet`.
pub fn print_status(message: &str, color: &ColorMode, quiet: bool) {
    if quiet {
        return;
    }
    let mark = "✓";
    if should_color(color) {
        eprintln!("{} {message}", mark.green().bold());
    } else {
        eprintln!("{mark} {message}");
    }
}

/// Warnings are printed even with `--quiet`.
pub fn print_warning(message: &str, color: &ColorMode) {
    let label = "warning:";
    if should_color(color) {
        eprintln!("{} {message}", label.yellow().bold());
    } else {
        eprintln!("{label} {message}");
    }
}

// ── Rendering ───────────────────────────────────────────────────────

/// Render a collection. `to_row` builds the table row for `table`,
/// `id_of` supplies the `plain` line.
pub fn render_list<T, R>(
    format: &OutputFormat,
    items: &[T],
    to_row: impl Fn(&T) -> R,
    id_of: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let mut table = Table::new(items.iter().map(to_row));
            table.with(Style::rounded());
            table.to_string()
        }
        OutputFormat::Plain => items.iter().map(id_of).collect::<Vec<_>>().join("\n"),
        structured => serialize(structured, items),
    }
}

/// Render one record. `describe` produces the `table` view.
pub fn render_single<T>(
    format: &OutputFormat,
    item: &T,
    describe: impl Fn(&T) -> String,
    id_of: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => describe(item),
        OutputFormat::Plain => id_of(item),
        structured => serialize(structured, item),
    }
}

/// Write to stdout unless `--quiet` or there is nothing to show.
pub fn print_output(rendered: &str, quiet: bool) {
    if quiet || rendered.is_empty() {
        return;
    }
    let _ = writeln!(io::stdout().lock(), "{rendered}");
}

fn serialize<T: Serialize + ?Sized>(format: &OutputFormat, value: &T) -> String {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(value).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
    };
    rendered.unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables use `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::{OwoColorize, Style as Paint};
use tabled::{Table, Tabled, settings::Style};

use plantwall_core::display::WaterLevel;

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Terminal painter bound to the resolved color mode.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(mode: &ColorMode) -> Self {
        Self {
            enabled: should_color(mode),
        }
    }

    fn paint(self, text: &str, style: Paint) -> String {
        if self.enabled {
            text.style(style).to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn good(self, text: &str) -> String {
        self.paint(text, Paint::new().green())
    }

    pub fn warn(self, text: &str) -> String {
        self.paint(text, Paint::new().yellow())
    }

    pub fn bad(self, text: &str) -> String {
        self.paint(text, Paint::new().red().bold())
    }

    pub fn dim(self, text: &str) -> String {
        self.paint(text, Paint::new().dimmed())
    }

    /// On/off style indicator.
    pub fn flag(self, on: bool, on_text: &str, off_text: &str) -> String {
        if on {
            self.good(on_text)
        } else {
            self.dim(off_text)
        }
    }

    /// Percentage colored by reservoir severity.
    pub fn water_level(self, level: f64) -> String {
        let text = format!("{level:.1}%");
        match WaterLevel::from_percent(level) {
            WaterLevel::Low => self.bad(&text),
            WaterLevel::Medium => self.warn(&text),
            WaterLevel::High => self.good(&text),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `line_fn` on each item to emit one line per item
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    line_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&line_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => plain_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a status line to stderr, respecting quiet mode.
pub fn print_note(note: &str, quiet: bool) {
    if !quiet {
        eprintln!("{note}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Reading {
        name: &'static str,
        value: f64,
    }

    #[derive(Tabled)]
    struct ReadingRow {
        #[tabled(rename = "Name")]
        name: String,
    }

    #[test]
    fn plain_lists_emit_one_line_per_item() {
        let data = [
            Reading {
                name: "temperature",
                value: 21.5,
            },
            Reading {
                name: "humidity",
                value: 60.0,
            },
        ];
        let out = render_list(
            &OutputFormat::Plain,
            &data,
            |r| ReadingRow {
                name: r.name.into(),
            },
            |r| format!("{}={}", r.name, r.value),
        );
        assert_eq!(out, "temperature=21.5\nhumidity=60");
    }

    #[test]
    fn compact_json_is_single_line() {
        let reading = Reading {
            name: "ph",
            value: 6.4,
        };
        let out = render_single(&OutputFormat::JsonCompact, &reading, |_| String::new(), |_| {
            String::new()
        });
        assert_eq!(out, r#"{"name":"ph","value":6.4}"#);
    }

    #[test]
    fn painter_without_color_is_passthrough() {
        let painter = Painter::new(&ColorMode::Never);
        assert_eq!(painter.water_level(12.0), "12.0%");
        assert_eq!(painter.flag(true, "ON", "OFF"), "ON");
    }
}

//! Terminal rendering for check results and uptime statistics.

pub mod health;
pub mod uptime;

pub use health::format_health_result;
pub use uptime::format_uptime_stats;

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const GRAY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub format: OutputFormat,
    pub use_colors: bool,
}

impl FormatOptions {
    /// JSON wins over plain; both imply no colors.
    pub fn resolve(json: bool, plain: bool, no_color: bool) -> Self {
        if json {
            Self { format: OutputFormat::Json, use_colors: false }
        } else if plain {
            Self { format: OutputFormat::Plain, use_colors: false }
        } else {
            Self { format: OutputFormat::Table, use_colors: !no_color }
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn paint(&self, text: &str, color: &str) -> String {
        paint(text, color, self.use_colors)
    }
}

pub fn paint(text: &str, color: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// One table cell. Color is applied after padding so widths stay right.
pub struct Cell {
    text: String,
    color: Option<&'static str>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), color: None }
    }

    pub fn colored(text: impl Into<String>, color: &'static str) -> Self {
        Self { text: text.into(), color: Some(color) }
    }
}

/// Box-drawn table with a header row.
pub fn render_table(headers: &[&str], rows: &[Vec<Cell>], use_colors: bool) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.text.chars().count());
            }
        }
    }

    let border = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        paint(&format!("{left}{}{right}", segments.join(mid)), GRAY, use_colors)
    };
    let bar = paint("│", GRAY, use_colors);

    let line = |cells: Vec<(String, Option<&str>)>| {
        let mut out = bar.clone();
        for ((text, color), width) in cells.into_iter().zip(&widths) {
            let padded = format!(" {text:<width$} ");
            match color {
                Some(c) => out.push_str(&paint(&padded, c, use_colors)),
                None => out.push_str(&padded),
            }
            out.push_str(&bar);
        }
        out
    };

    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(border("┌", "┬", "┐"));
    out.push(line(headers.iter().map(|h| (h.to_string(), Some(CYAN))).collect()));
    out.push(border("├", "┼", "┤"));
    for row in rows {
        out.push(line(row.iter().map(|c| (c.text.clone(), c.color)).collect()));
    }
    out.push(border("└", "┴", "┘"));
    out.join("\n")
}

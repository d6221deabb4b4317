//! Output formatting for CLI results

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Output format for CLI results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned table (default)
    #[default]
    Table,
    /// JSON output for machine processing
    Json,
}

/// Writes command results to stdout in the selected format
#[derive(Debug, Clone, Copy)]
pub struct OutputWriter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Pretty-printed JSON. Written even in quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("{}", title);
            println!("{}", "=".repeat(title.len()));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        print!("{}", render_table(headers, rows));
    }
}

/// Left-aligned columns separated by two spaces
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut out = render_row(headers.to_vec());
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str).collect()));
    }
    out
}

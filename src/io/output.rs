use anyhow::Result;
use clap::ValueEnum;
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Terminal,
}

pub trait OutputWriter {
    /// Write one report, identified by `title` where the format shows one.
    fn write_report(&mut self, title: &str, report: &Value) -> Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, _title: &str, report: &Value) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Renders a report as tables: scalar fields in a key/value table, each list
/// of objects as its own table.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_object(&mut self, heading: &str, object: &Map<String, Value>) -> Result<()> {
        let mut scalars = Table::new();
        scalars
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Field", "Value"]);
        let mut has_scalars = false;
        let mut nested: Vec<(&String, &Value)> = Vec::new();

        for (key, value) in object {
            match value {
                Value::Array(items) if items.iter().any(Value::is_object) => {
                    nested.push((key, value))
                }
                Value::Object(_) => nested.push((key, value)),
                _ => {
                    scalars.add_row(vec![key.clone(), format_cell(value)]);
                    has_scalars = true;
                }
            }
        }

        writeln!(self.writer, "{}", heading.bold().cyan())?;
        if has_scalars {
            writeln!(self.writer, "{scalars}")?;
        }

        for (key, value) in nested {
            let title = format!("{} / {}", heading, key);
            match value {
                Value::Array(items) => self.write_rows(&title, items)?,
                Value::Object(inner) => self.write_object(&title, inner)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn write_rows(&mut self, heading: &str, rows: &[Value]) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", heading.bold())?;
        if rows.is_empty() {
            writeln!(self.writer, "{}", "(no data)".dimmed())?;
            return Ok(());
        }

        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            if let Value::Object(map) = row {
                for (key, value) in map {
                    if !is_nested(value) && !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
            }
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(columns.clone());
        for row in rows {
            if let Value::Object(map) = row {
                table.add_row(
                    columns
                        .iter()
                        .map(|c| map.get(c).map(format_cell).unwrap_or_default())
                        .collect::<Vec<_>>(),
                );
            }
        }
        writeln!(self.writer, "{table}")?;

        // Lists nested inside rows, such as per-generation dimension tables
        for (index, row) in rows.iter().enumerate() {
            if let Value::Object(map) = row {
                for (key, value) in map.iter().filter(|(_, v)| is_nested(v)) {
                    let title = format!("{} [{}] / {}", heading, index, key);
                    match value {
                        Value::Array(items) => self.write_rows(&title, items)?,
                        Value::Object(inner) => self.write_object(&title, inner)?,
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:.2}", f),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(format_cell)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, title: &str, report: &Value) -> Result<()> {
        match report {
            Value::Object(object) => self.write_object(title, object),
            Value::Array(rows) => self.write_rows(title, rows),
            other => {
                writeln!(self.writer, "{}: {}", title.bold().cyan(), format_cell(other))?;
                Ok(())
            }
        }
    }
}

/// Writer for `format` over `writer`.
pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

//! Rendering of command results for `--output`.
//!
//! `table` is for people: a rounded table for lists, a key/value block for
//! single records. `json`, `json-compact` and `yaml` emit the serde form of
//! the records exactly as the API returned them. `plain` prints bare ids,
//! one per line, for piping into other `usersync` invocations.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Render a collection.
///
/// `to_row` builds the table row for each record; `id_fn` is what `plain`
/// prints for it.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => Ok(Table::new(data.iter().map(to_row))
            .with(Style::rounded())
            .to_string()),
        OutputFormat::Plain => Ok(data.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            serialize(format, data)
        }
    }
}

/// Render one record. In `table` mode `detail_fn` lays it out.
pub fn render_single<T: Serialize>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Plain => Ok(id_fn(data)),
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            serialize(format, data)
        }
    }
}

/// Write rendered output to stdout. Nothing is written in quiet mode or
/// for an empty rendering.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    // A closed pipe (`usersync users list | head -1`) is not an error.
    let _ = writeln!(io::stdout().lock(), "{output}");
}

/// Status lines go to stderr so stdout stays machine-readable.
pub fn print_status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

fn serialize<T: Serialize + ?Sized>(format: OutputFormat, data: &T) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(data)
            .map(|yaml| yaml.trim_end().to_owned())
            .map_err(|e| e.to_string()),
        OutputFormat::Json | OutputFormat::Table | OutputFormat::Plain => {
            serde_json::to_string_pretty(data).map_err(|e| e.to_string())
        }
    };
    rendered.map_err(|reason| CliError::Output { reason })
}

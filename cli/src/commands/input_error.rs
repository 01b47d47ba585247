use thiserror::Error;
use tilestack_core::input::InputError;
use yansi::Paint;

/// An error that happened while reading an input file
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("{0}")]
    Input(String),
}

/// Convert an [`InputError`] into an [`ImportError`] with a human-readable
/// message
pub trait IntoImportError {
    fn into_import_error(self, path: &str) -> ImportError;
}

impl IntoImportError for InputError {
    fn into_import_error(self, path: &str) -> ImportError {
        let (line, column, value, record) = match self {
            InputError::InvalidNumber {
                line,
                column,
                value,
                record,
            } => (line, column, value, record),
            e => {
                let err = anyhow::Error::from(e);
                return ImportError::Input(format!("Unable to read `{path}': {err:#}"));
            }
        };

        // locate the offending field in the row
        let start = record
            .split(',')
            .take(column.saturating_sub(1))
            .map(|f| f.len() + 1)
            .sum::<usize>();
        let end = start + value.len();
        let (Some(before), Some(field), Some(after)) =
            (record.get(..start), record.get(start..end), record.get(end..))
        else {
            return ImportError::Input(format!(
                "Unable to read `{path}': Invalid number `{value}' in line {line}, column {column}"
            ));
        };

        let msg = format!("Invalid number in column {column}.");
        let line = line.to_string();
        let gutter = " ".repeat(line.len());
        let span_len = end - start;
        let center_prefix = ((span_len + 1) / 2).saturating_sub(1);
        let center_suffix = span_len / 2;
        ImportError::Input(format!(
            "Unable to read `{}'\n\n{} │ {}{}{}\n{} │ {}{}{}{}\n{} │ {}{}{}",
            path,
            line.bold(),
            before,
            field.red(),
            after,
            gutter,
            " ".repeat(start),
            "─".repeat(center_prefix).red(),
            (if span_len > 0 { "┬" } else { "│" }).red(),
            "─".repeat(center_suffix).red(),
            gutter,
            " ".repeat(start + center_prefix),
            "╰── ".red(),
            msg.red().bold()
        ))
    }
}

use crate::table::ColumnType;
use crate::table::Table;
use crate::table::Value;
use crate::upload::UploadedFile;
use std::fmt::Display;

/// Read-only facts about one loaded upload.
#[derive(Clone, Debug, PartialEq)]
pub struct Inspection {
    pub name: String,
    /// Size in KiB rounded to two decimals
    pub size_kib: f64,
    pub rows: usize,
    pub columns: usize,
    /// Column names with their detected types
    pub schema: Vec<(String, ColumnType)>,
    /// The first rows of the table
    pub preview: Table,
}

/// Reports name, size, shape and the first `preview_rows` rows.
pub fn inspect(file: &UploadedFile, table: &Table, preview_rows: usize) -> Inspection {
    Inspection {
        name: file.name().to_owned(),
        size_kib: size_in_kib(file.size()),
        rows: table.row_count(),
        columns: table.column_count(),
        schema: table
            .columns()
            .iter()
            .map(|column| (column.name.to_owned(), column.kind))
            .collect(),
        preview: table.head(preview_rows),
    }
}

pub(crate) fn size_in_kib(size: usize) -> f64 {
    (size as f64 / 1024f64 * 100f64).round() / 100f64
}

impl Display for Inspection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} KB, {} rows x {} columns",
            self.name, self.size_kib, self.rows, self.columns
        )
    }
}

/// Renders a table as a fixed-width text grid with a header separator.
/// Missing values show as `NaN`.
pub fn render_preview(table: &Table) -> String {
    if table.column_count() == 0 {
        return String::from("(no columns)\n");
    }

    let cells: Vec<Vec<String>> = table
        .rows()
        .map(|row| row.into_iter().map(preview_text).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(column.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    push_line(&mut output, table.column_names().into_iter(), &widths);
    push_line(&mut output, widths.iter().map(|width| "-".repeat(*width)), &widths);
    for row in &cells {
        push_line(&mut output, row.iter(), &widths);
    }
    output
}

fn preview_text(value: &Value) -> String {
    if value.is_null() {
        String::from("NaN")
    } else {
        value.to_string()
    }
}

fn push_line<I, S>(output: &mut String, cells: I, widths: &[usize])
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    output.push_str(line.join(" | ").trim_end());
    output.push('\n');
}

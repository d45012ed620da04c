//! Bar chart data for the first numeric columns of a table

use crate::error::Warning;
use crate::table::value::format_float;
use crate::table::Table;
use crate::table::Value;

/// Maximum number of columns plotted
const MAX_SERIES: usize = 2;

/// Width of the longest bar in the text rendering
const BAR_WIDTH: usize = 40;

/// Processed chart data ready for rendering
#[derive(Clone, Debug, PartialEq)]
pub struct ChartData {
    /// One series per plotted column, in table order
    pub series: Vec<ChartSeries>,
    /// Number of bars per series, one per row index
    pub rows: usize,
    /// Maximum value for scaling
    pub max_value: f64,
    /// Minimum value for scaling
    pub min_value: f64,
}

/// Bars of one numeric column
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// Bar height per row index, `None` where the cell is missing
    pub values: Vec<Option<f64>>,
}

/// Builds chart data from at most the first two numeric columns.
pub fn chart(table: &Table) -> Result<ChartData, Warning> {
    let series: Vec<ChartSeries> = table
        .columns()
        .iter()
        .filter(|column| column.kind.is_numeric())
        .take(MAX_SERIES)
        .map(|column| ChartSeries {
            name: column.name.to_owned(),
            values: column.values.iter().map(Value::as_f64).collect(),
        })
        .collect();

    if series.is_empty() {
        return Err(Warning::EmptyNumericSet {
            operation: "visualization",
        });
    }

    let finite = || {
        series
            .iter()
            .flat_map(|series| series.values.iter().flatten())
            .copied()
            .filter(|value| value.is_finite())
    };
    let max_value = finite().fold(f64::NEG_INFINITY, f64::max);
    let min_value = finite().fold(f64::INFINITY, f64::min);

    Ok(ChartData {
        rows: table.row_count(),
        max_value: if max_value.is_finite() { max_value } else { 0.0 },
        min_value: if min_value.is_finite() { min_value } else { 0.0 },
        series,
    })
}

/// Renders the chart as horizontal text bars, grouped by row index.
pub fn render_chart(data: &ChartData) -> String {
    let scale = data.max_value.abs().max(data.min_value.abs());
    let index_width = data.rows.saturating_sub(1).to_string().len();
    let name_width = data.series.iter().map(|series| series.name.chars().count()).max().unwrap_or(0);

    let mut output = String::new();
    for row in 0..data.rows {
        for series in &data.series {
            let value = series.values.get(row).copied().flatten();
            let bar = match value {
                Some(value) if value.is_finite() && scale > 0.0 => {
                    let length = (value.abs() / scale * BAR_WIDTH as f64).round() as usize;
                    if value < 0.0 { "-" } else { "#" }.repeat(length)
                }
                _ => String::new(),
            };
            let label = value.map(format_float).unwrap_or_default();
            let line = format!("{row:>index_width$} {:<name_width$} |{bar} {label}", series.name);
            output.push_str(line.trim_end());
            output.push('\n');
        }
    }
    output
}

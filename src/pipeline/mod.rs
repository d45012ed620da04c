//! # Refinery Pipeline
//!
//! Each stage is a plain function over an explicit [`Table`]:
//!
//! 1. [`load`](crate::spreadsheet::load) decodes an upload
//! 2. [`inspect`] reports size, shape and a preview
//! 3. [`deduplicate`] and [`impute`] clean the rows
//! 4. [`project`] keeps the selected columns
//! 5. [`chart`] builds bar chart data
//! 6. [`export`] serializes to CSV or XLSX
//!
//! [`process`] chains the stages for one file according to [`SessionOptions`],
//! and [`process_all`] runs a whole session, skipping files that fail.

pub mod cleaner;
pub mod exporter;
pub mod inspector;
pub mod projector;
pub mod visualizer;

pub use cleaner::deduplicate;
pub use cleaner::impute;
pub use exporter::export;
pub use exporter::Export;
pub use inspector::inspect;
pub use inspector::render_preview;
pub use inspector::Inspection;
pub use projector::project;
pub use projector::ColumnSelection;
pub use visualizer::chart;
pub use visualizer::render_chart;
pub use visualizer::ChartData;
pub use visualizer::ChartSeries;

use crate::error::RefineryError;
use crate::error::Warning;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::Format;
use crate::table::Table;
use crate::upload::UploadedFile;
use std::time::Duration;
use tracing::info;
use tracing::warn;

/// Per-session settings driving every stage.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionOptions {
    /// Rules for recognizing missing cells while loading
    pub criteria: Criteria,
    /// Remove duplicate rows
    pub deduplicate: bool,
    /// Fill missing numeric cells with the column mean
    pub impute: bool,
    pub selection: ColumnSelection,
    /// Build chart data
    pub visualize: bool,
    /// Export format, if any
    pub target: Option<Format>,
    /// Rows shown in the preview
    pub preview_rows: usize,
    /// Pause before each file
    pub delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            criteria: Criteria::default(),
            deduplicate: false,
            impute: false,
            selection: ColumnSelection::All,
            visualize: false,
            target: None,
            preview_rows: 5,
            delay: Duration::ZERO,
        }
    }
}

/// Outcome of running the pipeline over one file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileReport {
    /// Inspection of the table as loaded
    pub inspection: Inspection,
    pub removed_duplicates: usize,
    pub imputed_cells: usize,
    pub chart: Option<ChartData>,
    pub export: Option<Export>,
    /// Operations that became no-ops
    pub warnings: Vec<Warning>,
    /// The table after cleaning and projection
    pub table: Table,
}

/// Runs load, inspect, clean, project, chart and export for one file.
pub fn process(file: &UploadedFile, options: &SessionOptions) -> Result<FileReport, RefineryError> {
    if !options.delay.is_zero() {
        std::thread::sleep(options.delay);
    }
    info!(file = %file.name(), bytes = file.size(), "processing file");

    let mut table = crate::spreadsheet::load(file, &options.criteria)?;
    let inspection = inspect(file, &table, options.preview_rows);
    info!(file = %file.name(), rows = inspection.rows, columns = inspection.columns, "loaded table");

    let mut warnings = Vec::new();
    let removed_duplicates = if options.deduplicate {
        let removed = deduplicate(&mut table);
        info!(file = %file.name(), removed, "removed duplicate rows");
        removed
    } else {
        0
    };

    let imputed_cells = if options.impute {
        match impute(&mut table) {
            Ok(filled) => {
                info!(file = %file.name(), filled, "filled missing values");
                filled
            }
            Err(warning) => {
                warn!(file = %file.name(), "{}", warning);
                warnings.push(warning);
                0
            }
        }
    } else {
        0
    };

    let table = project(table, &options.selection)?;

    let chart = if options.visualize {
        chart(&table)
            .map_err(|warning| {
                warn!(file = %file.name(), "{}", warning);
                warnings.push(warning);
            })
            .ok()
    } else {
        None
    };

    let export = match options.target {
        Some(format) => {
            let export = export(&table, format, file.base_name())?;
            info!(
                file = %file.name(),
                download = %export.file_name,
                mime = export.mime_type,
                bytes = export.bytes.len(),
                "converted file"
            );
            Some(export)
        }
        None => None,
    };

    Ok(FileReport {
        inspection,
        removed_duplicates,
        imputed_cells,
        chart,
        export,
        warnings,
        table,
    })
}

/// Processes every file in order. A failing file is logged and reported in its
/// slot; it never stops the files after it.
pub fn process_all(files: &[UploadedFile], options: &SessionOptions) -> Vec<Result<FileReport, RefineryError>> {
    files
        .iter()
        .map(|file| {
            let result = process(file, options);
            if let Err(error) = &result {
                warn!(file = %file.name(), "skipping file: {}", error);
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;
    use crate::table::Value;

    fn people() -> UploadedFile {
        UploadedFile::new("people.csv", b"name,age\nA,30\nA,30\nB,\n".to_vec())
    }

    #[test]
    fn default_options_only_load_and_inspect() {
        let report = process(&people(), &SessionOptions::default()).unwrap();
        assert_eq!(report.inspection.rows, 3);
        assert_eq!(report.table.row_count(), 3);
        assert_eq!((report.removed_duplicates, report.imputed_cells), (0, 0));
        assert!(report.chart.is_none());
        assert!(report.export.is_none());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn clean_and_convert_people() {
        let options = SessionOptions {
            deduplicate: true,
            impute: true,
            target: Some(Format::Csv),
            ..Default::default()
        };
        let report = process(&people(), &options).unwrap();

        assert_eq!(report.removed_duplicates, 1);
        assert_eq!(report.imputed_cells, 1);
        let age = report.table.column("age").unwrap();
        assert_eq!(age.kind, ColumnType::Double);
        assert_eq!(age.values, vec![Value::Float(30.0), Value::Float(30.0)]);

        let export = report.export.unwrap();
        assert_eq!(export.file_name, "people.csv");
        assert_eq!(String::from_utf8(export.bytes).unwrap(), "name,age\nA,30.0\nB,30.0\n");
    }

    #[test]
    fn deduplicate_only_keeps_missing_cell() {
        let options = SessionOptions {
            deduplicate: true,
            target: Some(Format::Csv),
            ..Default::default()
        };
        let report = process(&people(), &options).unwrap();
        let export = report.export.unwrap();
        assert_eq!(String::from_utf8(export.bytes).unwrap(), "name,age\nA,30\nB,\n");
    }

    #[test]
    fn text_only_table_warns_twice() {
        let file = UploadedFile::new("notes.csv", b"id,note\na,x\nb,\n".to_vec());
        let options = SessionOptions {
            impute: true,
            visualize: true,
            ..Default::default()
        };
        let report = process(&file, &options).unwrap();

        assert!(report.chart.is_none());
        assert_eq!(report.warnings, vec![
            Warning::EmptyNumericSet { operation: "filling missing values" },
            Warning::EmptyNumericSet { operation: "visualization" },
        ]);
        assert_eq!(report.table.row_count(), 2);
    }

    #[test]
    fn projection_then_chart_and_xlsx() {
        let file = UploadedFile::new("scores.CSV", b"name,math,art,music\nA,90,70,1\nB,80,,2\n".to_vec());
        let options = SessionOptions {
            selection: ColumnSelection::columns(["music", "name", "art"]),
            visualize: true,
            target: Some(Format::Xlsx),
            ..Default::default()
        };
        let report = process(&file, &options).unwrap();

        assert_eq!(report.table.column_names(), vec!["music", "name", "art"]);
        let chart = report.chart.unwrap();
        let names: Vec<&str> = chart.series.iter().map(|series| series.name.as_str()).collect();
        assert_eq!(names, vec!["music", "art"]);
        assert_eq!(chart.series[1].values, vec![Some(70.0), None]);

        let export = report.export.unwrap();
        assert_eq!(export.file_name, "scores.xlsx");
        assert_eq!(export.format, Format::Xlsx);
    }

    #[test]
    fn session_continues_after_failures() {
        let files = vec![
            UploadedFile::new("data.txt", b"name,age\nA,30\n".to_vec()),
            UploadedFile::new("broken.xlsx", b"not a workbook".to_vec()),
            people(),
        ];
        let options = SessionOptions {
            selection: ColumnSelection::columns(["name"]),
            ..Default::default()
        };
        let results = process_all(&files, &options);

        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap_err().is_unsupported_format());
        assert!(results[1].as_ref().unwrap_err().is_parse_error());
        let report = results[2].as_ref().unwrap();
        assert_eq!(report.table.column_names(), vec!["name"]);
    }

    #[test]
    fn unknown_column_skips_file() {
        let options = SessionOptions {
            selection: ColumnSelection::columns(["salary"]),
            ..Default::default()
        };
        let error = process(&people(), &options).unwrap_err();
        assert_eq!(error.to_string(), "Unknown column 'salary'");
    }

    #[test]
    fn empty_selection_gives_empty_table() {
        let options = SessionOptions {
            selection: ColumnSelection::Columns(vec![]),
            target: Some(Format::Csv),
            ..Default::default()
        };
        let report = process(&people(), &options).unwrap();
        assert_eq!(report.table.column_count(), 0);
        assert!(report.export.unwrap().bytes.is_empty());
    }
}

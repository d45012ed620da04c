//! # Spreadsheet Loading and Writing
//!
//! Detects the upload format from its file name, decodes CSV text or XLSX
//! packages into a [`Table`], and serializes tables back to either format.
//! Both readers share the same type detection: every column gets the most
//! specific [`ColumnType`](crate::table::ColumnType) that fits all of its
//! non-missing cells.

pub(crate) mod cell;
pub mod criteria;
pub(crate) mod csv;
pub(crate) mod excel;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod writer;
pub(crate) mod xlsx;

use crate::error::RefineryError;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::csv::CsvSpreadsheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use crate::table::Table;
use crate::upload::UploadedFile;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading spreadsheet files.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    /// The file name has an extension outside the allow-list
    #[error("Unsupported file type '{extension}' for '{name}'")]
    UnsupportedFormat { name: String, extension: String },

    /// The bytes could not be decoded as the declared format
    #[error("Cannot parse '{name}': {message}")]
    ParseError { name: String, message: String },

    #[error("Spreadsheet '{0}' is empty")]
    SpreadsheetEmptyError(String),

    #[error("Sheet '{1}' in '{0}' has no cells")]
    EmptySheet(String, String),

    /// file name, sheet name, rows, columns
    #[error("Sheet '{1}' in '{0}' spans {2} rows x {3} columns, too large to load")]
    SheetTooLarge(String, String, usize, usize),

    /// file name, sheet name, cell reference, message
    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: {3}")]
    CellValueError(String, String, String, String),

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RecordLengthError { line: u64, expected: usize, found: usize },

    #[error("'{0}' is not valid {1} text")]
    EncodingError(String, &'static str),

    #[error("Missing part '{0}'")]
    FileError(String),
}

/// File formats accepted for upload and export.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Csv,
    Xlsx,
}

impl Format {
    /// Matches a dotted extension case-insensitively against the allow-list.
    pub fn from_extension(extension: &str) -> Option<Format> {
        if extension.eq_ignore_ascii_case(".csv") {
            Some(Format::Csv)
        } else if extension.eq_ignore_ascii_case(".xlsx") {
            Some(Format::Xlsx)
        } else {
            None
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Format::Csv => ".csv",
            Format::Xlsx => ".xlsx",
        }
    }

    pub const fn mime_type(&self) -> &'static str {
        match self {
            Format::Csv => "text/csv",
            Format::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Format::Csv => "CSV",
            Format::Xlsx => "Excel",
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded upload that can produce one table.
pub(crate) trait Spreadsheet {
    /// File name of the upload
    fn name(&self) -> String;

    /// Reads the data as a table with detected column types
    fn read_table(&mut self, criteria: &Criteria) -> Result<Table, RefineryError>;
}

/// Creates the reader matching the format.
pub(crate) fn open_spreadsheet(format: Format, file_name: &str, bytes: Vec<u8>) -> Result<Box<dyn Spreadsheet>, RefineryError> {
    let spreadsheet: Box<dyn Spreadsheet> = match format {
        Format::Csv => Box::new(CsvSpreadsheet::open(file_name, bytes)),
        Format::Xlsx => Box::new(XlsxSpreadsheet::open(file_name, bytes)?),
    };
    Ok(spreadsheet)
}

/// Parses an uploaded file into a table.
///
/// Fails with [`SpreadsheetError::UnsupportedFormat`] when the extension is not
/// `.csv` or `.xlsx`, and with [`SpreadsheetError::ParseError`] when the bytes do
/// not decode as the declared format. No partial table is returned.
pub fn load(file: &UploadedFile, criteria: &Criteria) -> Result<Table, RefineryError> {
    let extension = file.extension();
    let format = Format::from_extension(&extension).ok_or_else(|| SpreadsheetError::UnsupportedFormat {
        name: file.name().to_owned(),
        extension,
    })?;

    let table = open_spreadsheet(format, file.name(), file.bytes().to_vec())
        .and_then(|mut spreadsheet| {
            debug!(file = %spreadsheet.name(), format = %format, "reading upload");
            spreadsheet.read_table(criteria)
        })
        .map_err(|error| SpreadsheetError::ParseError {
            name: file.name().to_owned(),
            message: error.to_string(),
        })?;
    Ok(table)
}

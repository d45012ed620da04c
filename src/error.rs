use thiserror::Error;

/// Main error type for the refinery.
/// Aggregates errors from various sources including standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum RefineryError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    StringEncodingError(#[from] std::str::Utf8Error),

    // Third-party library errors
    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Table module errors
    #[error("{0}")]
    TableError(#[from] crate::table::TableError),
}

impl RefineryError {
    /// Returns true when the file was rejected because of its extension.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(
            self,
            RefineryError::SpreadsheetError(crate::spreadsheet::SpreadsheetError::UnsupportedFormat { .. })
        )
    }

    /// Returns true when the file bytes could not be decoded as the declared format.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            RefineryError::SpreadsheetError(crate::spreadsheet::SpreadsheetError::ParseError { .. })
        )
    }
}

/// Non-fatal conditions: the requested operation became a no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("No numeric columns available for {operation}")]
    EmptyNumericSet { operation: &'static str },
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, RefineryError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| RefineryError::WithContextError(format!("{}: {}", message, e)))
    }
}

impl<T> ResultMessage for Result<T, std::io::Error> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| std::io::Error::new(e.kind(), format!("{}: {}", message, e)))
    }
}

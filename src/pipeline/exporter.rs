use crate::error::RefineryError;
use crate::error::ResultMessage;
use crate::spreadsheet::writer::write_xlsx;
use crate::spreadsheet::Format;
use crate::table::Table;
use csv::Terminator;
use csv::WriterBuilder;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// A serialized table ready for download.
#[derive(Clone, Debug, PartialEq)]
pub struct Export {
    pub format: Format,
    /// Original base name with the extension of `format`
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Writes the bytes to `file_name` inside `directory`.
    pub fn save<P: AsRef<Path>>(&self, directory: P) -> Result<PathBuf, RefineryError> {
        let path = directory.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes).with_prefix(&path.display().to_string())?;
        debug!(path = %path.display(), bytes = self.bytes.len(), "saved export");
        Ok(path)
    }
}

/// Serializes the table into a fresh buffer of the requested format.
pub fn export(table: &Table, format: Format, base_name: &str) -> Result<Export, RefineryError> {
    let bytes = match format {
        Format::Csv => write_csv(table)?,
        Format::Xlsx => write_xlsx(table)?,
    };
    Ok(Export {
        format,
        file_name: format!("{}{}", base_name, format.extension()),
        mime_type: format.mime_type(),
        bytes,
    })
}

/// Header row then one record per row; missing cells are empty fields.
fn write_csv(table: &Table) -> Result<Vec<u8>, RefineryError> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.into_iter().map(ToString::to_string))?;
    }
    writer.into_inner().map_err(|error| error.into_error().into())
}

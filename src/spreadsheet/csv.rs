//! Comma-separated text reader
use crate::error::RefineryError;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use crate::table::column::unique_names;
use crate::table::Column;
use crate::table::ColumnType;
use crate::table::Table;
use crate::table::Value;
use csv::ReaderBuilder;
use csv::StringRecord;
use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use std::borrow::Cow;
use tracing::debug;

/// A CSV upload held in memory
pub(crate) struct CsvSpreadsheet {
    pub(crate) name: String,
    bytes: Vec<u8>,
}

impl CsvSpreadsheet {
    pub(crate) fn open(file_name: &str, bytes: Vec<u8>) -> CsvSpreadsheet {
        CsvSpreadsheet {
            name: file_name.to_owned(),
            bytes,
        }
    }

    /// Decodes the bytes as text, honoring a byte order mark and defaulting to UTF-8.
    fn decode(&self) -> Result<Cow<'_, str>, RefineryError> {
        let (encoding, bom_length) = Encoding::for_bom(&self.bytes).unwrap_or((UTF_8, 0));
        encoding
            .decode_without_bom_handling_and_without_replacement(&self.bytes[bom_length..])
            .ok_or_else(|| SpreadsheetError::EncodingError(self.name.to_owned(), encoding.name()).into())
    }

    /// Splits the text into the header and the data records.
    /// Blank lines are skipped by the reader; a quoted empty field (`""`) is a record.
    /// Short records are padded, long records are rejected.
    fn read_records(&self, text: &str) -> Result<(StringRecord, Vec<StringRecord>), RefineryError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = Vec::<StringRecord>::new();
        for result in reader.records() {
            let record = result?;
            if let Some(header) = records.first() {
                if record.len() > header.len() {
                    let line = record.position().map(|position| position.line()).unwrap_or(0);
                    Err(SpreadsheetError::RecordLengthError {
                        line,
                        expected: header.len(),
                        found: record.len(),
                    })?
                }
            }
            records.push(record);
        }

        if records.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(self.name.to_owned()))?
        }
        let header = records.remove(0);
        Ok((header, records))
    }
}

impl Spreadsheet for CsvSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Parses the whole file as one table with inferred column types
    fn read_table(&mut self, criteria: &Criteria) -> Result<Table, RefineryError> {
        let text = self.decode()?;
        let (header, records) = self.read_records(&text)?;
        debug!(file = %self.name, columns = header.len(), rows = records.len(), "read csv records");

        let names = header
            .iter()
            .map(|name| Some(name.to_owned()).filter(|name| !name.is_empty()))
            .collect();
        let field = |record: &StringRecord, index: usize| -> Option<String> {
            record.get(index).filter(|text| !criteria.is_null(text)).map(str::to_owned)
        };

        let columns = unique_names(names)
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let fields: Vec<Option<String>> = records.iter().map(|record| field(record, index)).collect();
                let kind = ColumnType::detect(
                    fields.iter().map(|text| text.as_deref().map(ColumnType::infer)).collect(),
                );
                let values = fields
                    .into_iter()
                    .map(|text| text.map(|text| Value::parse(&text, kind)).unwrap_or_default())
                    .collect();
                Column::new(name, kind, values)
            })
            .collect();
        Ok(Table::new(columns)?)
    }
}

use crate::error::RefineryError;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::excel;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::excel::PackageReader;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use crate::table::Table;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::BufReader;
use std::io::Cursor;
use tracing::debug;
use zip::read::ZipFile;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts"); // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");   // Individual custom number format
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");  // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");         // Individual cell format index
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr");
const TAG_SHEET: QName = QName(b"sheet");
const TAG_ROW: QName = QName(b"row");
const TAG_CELL: QName = QName(b"c");
const TAG_INLINE_STRING: QName = QName(b"is");
const TAG_VALUE: QName = QName(b"v");

/// An Excel XLSX workbook held in memory
pub(crate) struct XlsxSpreadsheet {
    /// File name of the upload
    pub(crate) name: String,
    /// ZIP archive containing the XLSX parts
    zip: ZipArchive<PackageReader>,
    /// Parsed number formats indexed by cell style
    number_formats: Vec<CellType>,
    /// Worksheets in workbook order as (name, zip_path) pairs
    sheets: Vec<(String, String)>,
}

impl XlsxSpreadsheet {
    /// Opens an XLSX package from its bytes and parses the workbook structure
    pub(crate) fn open(file_name: &str, bytes: Vec<u8>) -> Result<XlsxSpreadsheet, RefineryError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(file_name.to_owned()))?
        }
        let number_formats = load_number_formats(&mut zip, is_1904)?;
        debug!(file = file_name, sheets = sheets.len(), is_1904, "opened workbook");
        Ok(XlsxSpreadsheet {
            name: file_name.to_owned(),
            zip,
            number_formats,
            sheets,
        })
    }

    /// Loads the shared string table; missing part means no shared strings
    fn load_shared_strings(&mut self) -> Result<Vec<String>, RefineryError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }

    /// Reads every cell of one worksheet
    fn read_sheet(&mut self, sheet_name: &str, zip_path: &str, criteria: &Criteria) -> Result<Sheet, RefineryError> {
        let mut sheet = Sheet::new(&self.name, sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut reader = self.zip.xml_reader(zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                if let Some(index) = event.parse_attribute_value::<usize>("r")? {
                    row_count = index.saturating_sub(1);
                }
                col_count = 0;
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                col_count = col + 1;
                value.clear();
                kind = event.get_attribute_value("t")?.map(|t| {
                    match t.as_ref() {
                        "inlineStr" | "str" => CellType::InlineString,
                        "s" => CellType::SharedString,
                        "d" => CellType::IsoDateTime,
                        "b" => CellType::Boolean,
                        "e" => if criteria.error_as_null { CellType::Empty } else { CellType::Error },
                        _ => CellType::Number,
                    }
                }).unwrap_or(CellType::Number);
                if let Some(format_id) = event.get_attribute_value("s")? {
                    if kind == CellType::Number && !format_id.is_empty() {
                        let index = format_id.parse::<usize>()?;
                        kind = self.number_formats.get(index).copied().unwrap_or(CellType::Number);
                    }
                }
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if kind != CellType::Empty && !value.is_empty() && event.name() == TAG_CELL => {
                if kind == CellType::Error {
                    Err(SpreadsheetError::CellValueError(
                        sheet.file_name.to_owned(),
                        sheet.name.to_owned(),
                        index_to_reference(row, col),
                        value.to_owned(),
                    ))?
                }
                sheet.push(Cell {
                    row,
                    col,
                    kind,
                    value: std::mem::take(&mut value),
                });
            }
        });
        Ok(sheet)
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    /// Reads the first worksheet as a table
    fn read_table(&mut self, criteria: &Criteria) -> Result<Table, RefineryError> {
        let (sheet_name, zip_path) = self.sheets
            .first()
            .cloned()
            .ok_or_else(|| SpreadsheetError::SpreadsheetEmptyError(self.name.to_owned()))?;
        let sheet = self.read_sheet(&sheet_name, &zip_path, criteria)?;
        debug!(sheet = %sheet_name, cells = sheet.cells.len(), "read worksheet");
        let shared_strings = self.load_shared_strings()?;
        sheet.to_table(&shared_strings, criteria)
    }
}

/// Loads worksheet names and paths from workbook.xml, plus the date system flag
fn load_workbook(zip: &mut ZipArchive<PackageReader>) -> Result<(Vec<(String, String)>, bool), RefineryError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads number formats and cell style indexes from styles.xml
fn load_number_formats(zip: &mut ZipArchive<PackageReader>, is_1904: bool) -> Result<Vec<CellType>, RefineryError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
        Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
        Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                let style = CellType::parse_custom_number_format(&format, is_1904);
                custom_formats.insert(id.to_string(), style);
            }
        }
        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => break,
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            let id = event.get_attribute_value("numFmtId")?.unwrap_or(Cow::Borrowed("0"));
            format_indexes.push(id.to_string());
        }
    });

    Ok(excel::load_number_formats(format_indexes, custom_formats, is_1904))
}

/// Reads string content up to `end_tag`, skipping phonetic annotations.
/// With `is_text_content` the element body itself is the text (as in `<v>`).
fn read_string_value(
    reader: &mut XmlReader<BufReader<ZipFile<'_, PackageReader>>>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, RefineryError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::zip::ZipPackage;
    use crate::table::ColumnType;
    use crate::table::Value;
    use chrono::NaiveDate;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<workbookPr/><sheets><sheet name="Data" sheetId="1" r:id="rId1"/><sheet name="Other" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

    const RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy/mm/dd"/></numFmts>
<cellXfs count="3"><xf numFmtId="0"/><xf numFmtId="164"/><xf numFmtId="22"/></cellXfs></styleSheet>"#;

    const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
<si><t>name</t></si><si><r><t>A &amp; </t></r><r><t>Co</t></r><rPh><t>x</t></rPh></si><si><t>joined</t></si></sst>"#;

    const SHEET1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>age</t></is></c><c r="C1" t="s"><v>2</v></c><c r="D1" t="inlineStr"><is><t>ok</t></is></c></row>
<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2"><v>30</v></c><c r="C2" s="1"><v>45351</v></c><c r="D2" t="b"><v>1</v></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>B</t></is></c><c r="B3" t="e"><v>#DIV/0!</v></c><c r="C3" s="1"><v>45352</v></c><c r="D3" t="b"><v>0</v></c></row>
</sheetData></worksheet>"#;

    const SHEET2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>ignored</t></is></c></row>
</sheetData></worksheet>"#;

    fn workbook() -> Vec<u8> {
        package(SHEET1)
    }

    fn package(first_sheet: &str) -> Vec<u8> {
        let mut package = ZipPackage::new();
        package.add("xl/workbook.xml", WORKBOOK.as_bytes()).unwrap();
        package.add("xl/_rels/workbook.xml.rels", RELATIONSHIPS.as_bytes()).unwrap();
        package.add("xl/styles.xml", STYLES.as_bytes()).unwrap();
        package.add("xl/sharedStrings.xml", SHARED_STRINGS.as_bytes()).unwrap();
        package.add("xl/worksheets/sheet1.xml", first_sheet.as_bytes()).unwrap();
        package.add("xl/worksheets/sheet2.xml", SHEET2.as_bytes()).unwrap();
        package.finish().unwrap()
    }

    #[test]
    fn workbook_structure() {
        let spreadsheet = XlsxSpreadsheet::open("book.xlsx", workbook()).unwrap();
        assert_eq!(spreadsheet.sheets, vec![
            ("Data".to_owned(), "xl/worksheets/sheet1.xml".to_owned()),
            ("Other".to_owned(), "xl/worksheets/sheet2.xml".to_owned()),
        ]);
        assert_eq!(spreadsheet.number_formats, vec![
            CellType::Number,
            CellType::NumberDate1900,
            CellType::NumberDateTime1900,
        ]);
    }

    #[test]
    fn first_sheet_as_table() {
        let mut spreadsheet = XlsxSpreadsheet::open("book.xlsx", workbook()).unwrap();
        let table = spreadsheet.read_table(&Criteria::default()).unwrap();

        assert_eq!(table.column_names(), vec!["name", "age", "joined", "ok"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("name").unwrap().values, vec![
            Value::Text("A & Co".to_owned()),
            Value::Text("B".to_owned()),
        ]);
        let age = table.column("age").unwrap();
        assert_eq!(age.kind, ColumnType::BigInt);
        assert_eq!(age.values, vec![Value::Integer(30), Value::Null]);
        let joined = table.column("joined").unwrap();
        assert_eq!(joined.kind, ColumnType::Date);
        assert_eq!(joined.values[0], Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert_eq!(table.column("ok").unwrap().values, vec![Value::Boolean(true), Value::Boolean(false)]);
    }

    #[test]
    fn error_cells_fail_when_not_null() {
        let mut spreadsheet = XlsxSpreadsheet::open("book.xlsx", workbook()).unwrap();
        let criteria = Criteria {
            error_as_null: false,
            ..Criteria::default()
        };
        let result = spreadsheet.read_table(&criteria);
        assert!(matches!(
            result,
            Err(RefineryError::SpreadsheetError(SpreadsheetError::CellValueError(_, _, reference, _))) if reference == "B3"
        ));
    }

    #[test]
    fn not_a_package() {
        assert!(XlsxSpreadsheet::open("book.xlsx", b"name,age\n".to_vec()).is_err());
    }

    #[test]
    fn stray_cell_far_from_data_is_a_parse_error() {
        let mut sheet = String::from(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#);
        for row in 1..=5_000 {
            sheet.push_str(&format!(r#"<row r="{row}"><c r="A{row}"><v>{row}</v></c></row>"#));
        }
        sheet.push_str(r#"<row r="1048576"><c r="XFD1048576"><v>1</v></c></row></sheetData></worksheet>"#);

        let file = crate::upload::UploadedFile::new("stray.xlsx", package(&sheet));
        let error = crate::spreadsheet::load(&file, &Criteria::default()).unwrap_err();
        assert!(error.is_parse_error());
        assert!(error.to_string().contains("too large"));
    }
}

//! XLSX workbook writer: one worksheet named `Sheet1` with a header row.
use crate::error::RefineryError;
use crate::helpers::xml::XmlWriter;
use crate::helpers::zip::ZipPackage;
use crate::spreadsheet::cell::date_to_serial;
use crate::spreadsheet::cell::datetime_to_serial;
use crate::spreadsheet::cell::time_to_serial;
use crate::spreadsheet::reference::index_to_reference;
use crate::table::Table;
use crate::table::Value;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_WORKSHEET: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

pub(crate) const SHEET_NAME: &str = "Sheet1";

/// Cell style indexes into `cellXfs`, with their built-in number formats
const STYLE_DATE: &str = "1"; // numFmtId 14
const STYLE_TIMESTAMP: &str = "2"; // numFmtId 22
const STYLE_TIME: &str = "3"; // numFmtId 21
const NUMBER_FORMATS: [&str; 4] = ["0", "14", "22", "21"];

/// Serializes a table into XLSX package bytes.
pub(crate) fn write_xlsx(table: &Table) -> Result<Vec<u8>, RefineryError> {
    let mut package = ZipPackage::new();
    package.add("[Content_Types].xml", &content_types()?)?;
    package.add("_rels/.rels", &package_relationships()?)?;
    package.add("xl/workbook.xml", &workbook()?)?;
    package.add("xl/_rels/workbook.xml.rels", &workbook_relationships()?)?;
    package.add("xl/styles.xml", &styles()?)?;
    package.add("xl/worksheets/sheet1.xml", &worksheet(table)?)?;
    package.finish()
}

fn content_types() -> Result<Vec<u8>, RefineryError> {
    let mut xml = XmlWriter::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty("Default", &[
        ("Extension", "rels"),
        ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
    ])?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    xml.empty("Override", &[
        ("PartName", "/xl/workbook.xml"),
        ("ContentType", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"),
    ])?;
    xml.empty("Override", &[
        ("PartName", "/xl/worksheets/sheet1.xml"),
        ("ContentType", "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"),
    ])?;
    xml.empty("Override", &[
        ("PartName", "/xl/styles.xml"),
        ("ContentType", "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"),
    ])?;
    xml.end("Types")?;
    Ok(xml.into_bytes())
}

fn package_relationships() -> Result<Vec<u8>, RefineryError> {
    let mut xml = XmlWriter::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
    xml.empty("Relationship", &[("Id", "rId1"), ("Type", REL_OFFICE_DOCUMENT), ("Target", "xl/workbook.xml")])?;
    xml.end("Relationships")?;
    Ok(xml.into_bytes())
}

fn workbook() -> Result<Vec<u8>, RefineryError> {
    let mut xml = XmlWriter::new()?;
    xml.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
    xml.start("sheets", &[])?;
    xml.empty("sheet", &[("name", SHEET_NAME), ("sheetId", "1"), ("r:id", "rId1")])?;
    xml.end("sheets")?;
    xml.end("workbook")?;
    Ok(xml.into_bytes())
}

fn workbook_relationships() -> Result<Vec<u8>, RefineryError> {
    let mut xml = XmlWriter::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
    xml.empty("Relationship", &[("Id", "rId1"), ("Type", REL_WORKSHEET), ("Target", "worksheets/sheet1.xml")])?;
    xml.empty("Relationship", &[("Id", "rId2"), ("Type", REL_STYLES), ("Target", "styles.xml")])?;
    xml.end("Relationships")?;
    Ok(xml.into_bytes())
}

fn styles() -> Result<Vec<u8>, RefineryError> {
    let mut xml = XmlWriter::new()?;
    xml.start("styleSheet", &[("xmlns", NS_MAIN)])?;

    xml.start("fonts", &[("count", "1")])?;
    xml.start("font", &[])?;
    xml.empty("sz", &[("val", "11")])?;
    xml.empty("name", &[("val", "Calibri")])?;
    xml.end("font")?;
    xml.end("fonts")?;

    xml.start("fills", &[("count", "2")])?;
    for pattern in ["none", "gray125"] {
        xml.start("fill", &[])?;
        xml.empty("patternFill", &[("patternType", pattern)])?;
        xml.end("fill")?;
    }
    xml.end("fills")?;

    xml.start("borders", &[("count", "1")])?;
    xml.start("border", &[])?;
    for side in ["left", "right", "top", "bottom", "diagonal"] {
        xml.empty(side, &[])?;
    }
    xml.end("border")?;
    xml.end("borders")?;

    xml.start("cellStyleXfs", &[("count", "1")])?;
    xml.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")])?;
    xml.end("cellStyleXfs")?;

    let count = NUMBER_FORMATS.len().to_string();
    xml.start("cellXfs", &[("count", count.as_str())])?;
    for format in NUMBER_FORMATS {
        let apply = if format == "0" { "0" } else { "1" };
        xml.empty("xf", &[
            ("numFmtId", format),
            ("fontId", "0"),
            ("fillId", "0"),
            ("borderId", "0"),
            ("xfId", "0"),
            ("applyNumberFormat", apply),
        ])?;
    }
    xml.end("cellXfs")?;

    xml.start("cellStyles", &[("count", "1")])?;
    xml.empty("cellStyle", &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")])?;
    xml.end("cellStyles")?;

    xml.end("styleSheet")?;
    Ok(xml.into_bytes())
}

fn worksheet(table: &Table) -> Result<Vec<u8>, RefineryError> {
    let mut xml = XmlWriter::new()?;
    xml.start("worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
    if table.column_count() > 0 {
        let dimension = format!(
            "A1:{}",
            index_to_reference(table.row_count(), table.column_count() - 1)
        );
        xml.empty("dimension", &[("ref", dimension.as_str())])?;
    }
    xml.start("sheetData", &[])?;

    if table.column_count() > 0 {
        xml.start("row", &[("r", "1")])?;
        for (col, name) in table.column_names().into_iter().enumerate() {
            write_inline_string(&mut xml, &index_to_reference(0, col), name)?;
        }
        xml.end("row")?;
    }

    for (index, row) in table.rows().enumerate() {
        let row_number = (index + 2).to_string();
        xml.start("row", &[("r", row_number.as_str())])?;
        for (col, value) in row.into_iter().enumerate() {
            write_cell(&mut xml, &index_to_reference(index + 1, col), value)?;
        }
        xml.end("row")?;
    }

    xml.end("sheetData")?;
    xml.end("worksheet")?;
    Ok(xml.into_bytes())
}

/// Writes one data cell; missing and non-finite values leave the cell empty.
fn write_cell(xml: &mut XmlWriter, reference: &str, value: &Value) -> Result<(), RefineryError> {
    match value {
        Value::Null => Ok(()),
        Value::Boolean(flag) => write_number(xml, reference, &[("t", "b")], if *flag { "1" } else { "0" }),
        Value::Integer(number) => write_number(xml, reference, &[], &number.to_string()),
        Value::Float(number) if number.is_finite() => write_number(xml, reference, &[], &number.to_string()),
        Value::Float(_) => Ok(()),
        Value::Text(text) => write_inline_string(xml, reference, text),
        Value::Date(date) => match date_to_serial(*date) {
            Some(serial) => write_number(xml, reference, &[("s", STYLE_DATE)], &serial.to_string()),
            None => write_inline_string(xml, reference, &value.to_string()),
        },
        Value::Timestamp(datetime) => match datetime_to_serial(*datetime) {
            Some(serial) => write_number(xml, reference, &[("s", STYLE_TIMESTAMP)], &serial.to_string()),
            None => write_inline_string(xml, reference, &value.to_string()),
        },
        Value::Time(time) => write_number(xml, reference, &[("s", STYLE_TIME)], &time_to_serial(*time).to_string()),
    }
}

fn write_number(xml: &mut XmlWriter, reference: &str, attributes: &[(&str, &str)], number: &str) -> Result<(), RefineryError> {
    let mut cell_attributes = vec![("r", reference)];
    cell_attributes.extend_from_slice(attributes);
    xml.start("c", &cell_attributes)?;
    xml.element("v", &[], number)?;
    xml.end("c")
}

fn write_inline_string(xml: &mut XmlWriter, reference: &str, text: &str) -> Result<(), RefineryError> {
    xml.start("c", &[("r", reference), ("t", "inlineStr")])?;
    xml.start("is", &[])?;
    if text.trim() != text {
        xml.element("t", &[("xml:space", "preserve")], text)?;
    } else {
        xml.element("t", &[], text)?;
    }
    xml.end("is")?;
    xml.end("c")
}

use crate::spreadsheet::cell::CellType;
use crate::table::value::Value;
use std::collections::HashSet;

/// Supported column data types for tabular data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// 64-bit signed integers
    BigInt,
    /// Double-precision floating point numbers
    Double,
    /// Variable-length strings
    Varchar,
    /// Date and time with microsecond precision
    Timestamp,
    /// Date without time component
    Date,
    /// Time without date component
    Time,
}

/// A named, typed column of a table.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Column name (from header row or generated)
    pub name: String,
    /// Declared data type
    pub kind: ColumnType,
    /// Cells, one per row
    pub values: Vec<Value>,
}

impl ColumnType {
    /// Returns the string representation of the column type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::BigInt => "bigint",
            ColumnType::Double => "double",
            ColumnType::Varchar => "varchar",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
        }
    }

    /// Infers column type from a spreadsheet cell type and value.
    /// Handles various Excel date/time formats and numeric representations.
    pub(crate) fn from(cell_type: &CellType, value: &str) -> Option<Self> {
        match cell_type {
            CellType::Boolean => Some(ColumnType::Boolean),
            CellType::Number if Self::is_integer(value) => Some(ColumnType::BigInt),
            CellType::Number => Some(ColumnType::Double),
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => Some(ColumnType::Timestamp),
            CellType::NumberDate1900 | CellType::NumberDate1904 => Some(ColumnType::Date),
            CellType::NumberTime1900 | CellType::NumberTime1904 => Some(ColumnType::Time),
            CellType::IsoDateTime if value.contains("00:00:00") => Some(ColumnType::Date),
            CellType::IsoDateTime if !value.contains('T') => Some(ColumnType::Date),
            CellType::IsoDateTime => Some(ColumnType::Timestamp),
            CellType::InlineString | CellType::SharedString => Some(ColumnType::Varchar),
            _ => None,
        }
    }

    /// Infers column type from a delimited-text field.
    pub(crate) fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
            ColumnType::Boolean
        } else if trimmed.parse::<i64>().is_ok() {
            ColumnType::BigInt
        } else if trimmed.parse::<f64>().is_ok() {
            ColumnType::Double
        } else {
            ColumnType::Varchar
        }
    }

    /// Checks if a numeric string represents an integer value.
    /// Returns true if the decimal part contains only zeros or no decimal point.
    fn is_integer(value: &str) -> bool {
        if value.contains(['e', 'E']) {
            return value.parse::<f64>().map(|number| number.fract() == 0.0 && number.abs() < 9e15).unwrap_or(false);
        }
        match value.find('.') {
            Some(index) => value[(index + 1)..].chars().all(|char| char == '0'),
            None => true,
        }
    }

    /// Detects the most specific common type from a collection of candidate types.
    /// Falls back to VARCHAR if types are inconsistent or empty.
    pub(crate) fn detect(types: Vec<Option<ColumnType>>) -> ColumnType {
        let types: Vec<ColumnType> = types.into_iter().flatten().collect();
        if types.is_empty() {
            ColumnType::Varchar
        } else if types.iter().all(|kind| kind.is_boolean()) {
            ColumnType::Boolean
        } else if types.iter().all(|kind| kind.is_int()) {
            ColumnType::BigInt
        } else if types.iter().all(|kind| kind.is_numeric()) {
            ColumnType::Double
        } else if types.iter().all(|kind| kind.is_date()) {
            ColumnType::Date
        } else if types.iter().all(|kind| kind.is_time()) {
            ColumnType::Time
        } else if types.iter().all(|kind| kind.is_datetime()) {
            ColumnType::Timestamp
        } else {
            ColumnType::Varchar
        }
    }

    /// Returns true if this column type represents boolean values.
    #[inline]
    pub fn is_boolean(&self) -> bool {
        matches!(self, ColumnType::Boolean)
    }

    /// Returns true if this column type represents integer values.
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, ColumnType::BigInt)
    }

    /// Returns true if this column type represents numeric values (integer or floating point).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::BigInt | ColumnType::Double)
    }

    #[inline]
    pub fn is_date(&self) -> bool {
        matches!(self, ColumnType::Date)
    }

    #[inline]
    pub fn is_time(&self) -> bool {
        matches!(self, ColumnType::Time)
    }

    /// Returns true if this column type represents date/time related values.
    #[inline]
    pub fn is_datetime(&self) -> bool {
        matches!(self, ColumnType::Timestamp | ColumnType::Date | ColumnType::Time)
    }
}

impl Value {
    /// Converts a delimited-text field into a value of the given column type.
    /// Fields that do not fit the type are kept as text.
    pub(crate) fn parse(text: &str, kind: ColumnType) -> Value {
        let trimmed = text.trim();
        match kind {
            ColumnType::Boolean => Value::Boolean(trimmed.eq_ignore_ascii_case("true")),
            ColumnType::BigInt => trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(text.to_owned())),
            ColumnType::Double => trimmed
                .parse::<f64>()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::Text(text.to_owned())),
            _ => Value::Text(text.to_owned()),
        }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Number of missing cells in this column.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_null()).count()
    }
}

/// Builds unique column names from header cells.
/// Missing names become `Unnamed: <index>`; repeated names get `.1`, `.2`, ... suffixes.
pub(crate) fn unique_names(names: Vec<Option<String>>) -> Vec<String> {
    let mut seen = HashSet::<String>::new();
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let base = name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("Unnamed: {index}"));
            let mut name = base.clone();
            let mut suffix = 0usize;
            while seen.contains(&name) {
                suffix += 1;
                name = format!("{base}.{suffix}");
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_from_text() {
        assert_eq!(ColumnType::infer("TRUE"), ColumnType::Boolean);
        assert_eq!(ColumnType::infer("30"), ColumnType::BigInt);
        assert_eq!(ColumnType::infer(" -4 "), ColumnType::BigInt);
        assert_eq!(ColumnType::infer("30.5"), ColumnType::Double);
        assert_eq!(ColumnType::infer("1e3"), ColumnType::Double);
        assert_eq!(ColumnType::infer("A"), ColumnType::Varchar);
        assert_eq!(ColumnType::infer("1"), ColumnType::BigInt);
    }

    #[test]
    fn detect_common_type() {
        use ColumnType::*;
        assert_eq!(ColumnType::detect(vec![]), Varchar);
        assert_eq!(ColumnType::detect(vec![None, None]), Varchar);
        assert_eq!(ColumnType::detect(vec![Some(BigInt), None, Some(BigInt)]), BigInt);
        assert_eq!(ColumnType::detect(vec![Some(BigInt), Some(Double)]), Double);
        assert_eq!(ColumnType::detect(vec![Some(Boolean), Some(BigInt)]), Varchar);
        assert_eq!(ColumnType::detect(vec![Some(Date), Some(Timestamp)]), Timestamp);
        assert_eq!(ColumnType::detect(vec![Some(Date), Some(Varchar)]), Varchar);
    }

    #[test]
    fn spreadsheet_number_kinds() {
        assert_eq!(ColumnType::from(&CellType::Number, "30"), Some(ColumnType::BigInt));
        assert_eq!(ColumnType::from(&CellType::Number, "30.000"), Some(ColumnType::BigInt));
        assert_eq!(ColumnType::from(&CellType::Number, "30.5"), Some(ColumnType::Double));
        assert_eq!(ColumnType::from(&CellType::Number, "1.5E-3"), Some(ColumnType::Double));
        assert_eq!(ColumnType::from(&CellType::Empty, ""), None);
    }

    #[test]
    fn parse_keeps_text_for_mismatches() {
        assert_eq!(Value::parse("30", ColumnType::BigInt), Value::Integer(30));
        assert_eq!(Value::parse("30", ColumnType::Double), Value::Float(30.0));
        assert_eq!(Value::parse("False", ColumnType::Boolean), Value::Boolean(false));
        assert_eq!(Value::parse("x", ColumnType::BigInt), Value::Text("x".to_owned()));
    }

    #[test]
    fn names_are_unique() {
        let names = unique_names(vec![
            Some("a".to_owned()),
            None,
            Some("a".to_owned()),
            Some("a.1".to_owned()),
            Some(String::new()),
        ]);
        assert_eq!(names, vec!["a", "Unnamed: 1", "a.1", "a.1.1", "Unnamed: 4"]);
    }
}

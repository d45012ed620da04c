use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::reference::index_to_reference;
use crate::table::ColumnType;
use crate::table::Value;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::Timelike;

const MILLISECONDS_PER_DAY: f64 = 86_400_000f64;

/// Types of cell data in spreadsheet files.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (true/false)
    Boolean,
    /// Numeric values
    Number,
    /// Date/time values stored as numbers from 1900 epoch
    NumberDateTime1900,
    /// Date values stored as numbers from 1900 epoch
    NumberDate1900,
    /// Time values stored as numbers from 1900 epoch
    NumberTime1900,
    /// Date/time values stored as numbers from 1904 epoch
    NumberDateTime1904,
    /// Date values stored as numbers from 1904 epoch
    NumberDate1904,
    /// Time values stored as numbers from 1904 epoch
    NumberTime1904,
    /// ISO 8601 date/time strings
    IsoDateTime,
    /// Inline string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

impl CellType {
    /// Parses built-in Excel number format IDs to determine cell type.
    pub(crate) fn parse_builtin_number_format_id(id: &str, is_1904: bool) -> Option<Self> {
        match id {
            "22" => Some(if is_1904 { Self::NumberDateTime1904 } else { Self::NumberDateTime1900 }),
            "14" | "15" | "16" | "17" => Some(if is_1904 { Self::NumberDate1904 } else { Self::NumberDate1900 }),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(if is_1904 { Self::NumberTime1904 } else { Self::NumberTime1900 }),
            _ => None,
        }
    }

    /// Parses custom number format strings to determine cell type.
    /// Analyzes format codes for date/time patterns.
    pub(crate) fn parse_custom_number_format(format: &str, is_1904: bool) -> Self {
        let mut is_escaped = false;
        let mut is_literal = false;
        let mut is_date = false;
        let mut is_time = false;
        let mut is_color = false;
        for character in format.chars() {
            match character {
                _ if is_escaped => is_escaped = false,
                '_' | '\\' => is_escaped = true,

                '"' if is_literal => is_literal = false,
                '"' if !is_color => is_literal = true,

                ']' if is_color => is_color = false,
                '[' if !is_literal => is_color = true,
                _ if is_literal || is_color => (),

                'Y' | 'y' | 'D' | 'd' => is_date = true,
                'H' | 'h' | 'S' | 's' => is_time = true,
                _ => (),
            }
        }

        match (is_date, is_time, is_1904) {
            (true, true, false) => Self::NumberDateTime1900,
            (true, true, true) => Self::NumberDateTime1904,
            (true, false, false) => Self::NumberDate1900,
            (true, false, true) => Self::NumberDate1904,
            (false, true, false) => Self::NumberTime1900,
            (false, true, true) => Self::NumberTime1904,
            (false, false, _) => Self::Number,
        }
    }

    fn is_1904(&self) -> bool {
        matches!(self, Self::NumberDateTime1904 | Self::NumberDate1904 | Self::NumberTime1904)
    }

    fn is_serial(&self) -> bool {
        matches!(
            self,
            Self::NumberDateTime1900 | Self::NumberDate1900 | Self::NumberTime1900 |
            Self::NumberDateTime1904 | Self::NumberDate1904 | Self::NumberTime1904
        )
    }
}

/// Represents a single cell in a spreadsheet with position, type, and value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the sheet (shared strings hold their index)
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Resolves the text of string cells, looking up shared strings by index.
    pub(crate) fn text<'a>(&'a self, shared_strings: &'a [String]) -> Result<&'a str, String> {
        match self.kind {
            CellType::SharedString => self
                .value
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index))
                .map(String::as_str)
                .ok_or_else(|| format!("shared string '{}' not found", self.value)),
            _ => Ok(&self.value),
        }
    }

    /// Returns true for cells that hold no usable value.
    pub(crate) fn is_null(&self, shared_strings: &[String], criteria: &Criteria) -> bool {
        match self.kind {
            CellType::Empty | CellType::Error => true,
            CellType::InlineString | CellType::SharedString => self
                .text(shared_strings)
                .map(|text| criteria.is_null(text))
                .unwrap_or(false),
            _ => self.value.is_empty(),
        }
    }

    /// Converts cell value to boolean (1 = true, other = false).
    pub(crate) fn to_boolean(&self) -> bool {
        self.value == "1" || self.value.eq_ignore_ascii_case("true")
    }

    /// Converts cell value to 64-bit integer.
    pub(crate) fn to_bigint(&self) -> Result<i64, String> {
        self.value.parse::<i64>().or_else(|_| {
            self.value
                .parse::<f64>()
                .ok()
                .filter(|number| number.fract() == 0.0 && number.abs() < 9.2e18)
                .map(|number| number as i64)
                .ok_or_else(|| format!("parse '{}' to bigint failed", self.value))
        })
    }

    /// Converts cell value to double-precision floating point.
    pub(crate) fn to_double(&self) -> Result<f64, String> {
        self.value.parse::<f64>().map_err(|_| format!("parse '{}' to double failed", self.value))
    }

    /// Converts cell value to a timestamp.
    /// Handles Excel serial numbers (1900 and 1904 epochs) and ISO strings.
    pub(crate) fn to_datetime(&self) -> Result<NaiveDateTime, String> {
        if self.kind.is_serial() {
            serial_to_datetime(self.to_double()?, self.kind.is_1904())
                .ok_or_else(|| format!("serial '{}' out of range", self.value))
        } else if self.kind == CellType::IsoDateTime {
            let value = self.value.trim_end_matches('Z');
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| {
                    NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .map(|date| date.and_time(NaiveTime::MIN))
                })
                .map_err(|_| format!("parse '{}' to datetime failed", self.value))
        } else {
            Err(format!("parse '{}' to datetime failed", self.value))
        }
    }

    /// Converts cell value to a date, dropping any time of day.
    pub(crate) fn to_date(&self) -> Result<NaiveDate, String> {
        self.to_datetime().map(|datetime| datetime.date())
    }

    /// Converts cell value to a time of day, dropping any date.
    pub(crate) fn to_time(&self) -> Result<NaiveTime, String> {
        if self.kind.is_serial() {
            let fraction = self.to_double()?.rem_euclid(1.0);
            let milliseconds = ((fraction * MILLISECONDS_PER_DAY).round() as u32) % 86_400_000;
            NaiveTime::from_num_seconds_from_midnight_opt(milliseconds / 1_000, (milliseconds % 1_000) * 1_000_000)
                .ok_or_else(|| format!("parse '{}' to time failed", self.value))
        } else {
            self.to_datetime().map(|datetime| datetime.time())
        }
    }

    /// Converts the cell into a table value of the given column type.
    pub(crate) fn to_value(&self, kind: ColumnType, shared_strings: &[String]) -> Result<Value, String> {
        let value = match kind {
            ColumnType::Boolean => Value::Boolean(self.to_boolean()),
            ColumnType::BigInt => Value::Integer(self.to_bigint()?),
            ColumnType::Double => Value::Float(self.to_double()?),
            ColumnType::Timestamp => Value::Timestamp(self.to_datetime()?),
            ColumnType::Date => Value::Date(self.to_date()?),
            ColumnType::Time => Value::Time(self.to_time()?),
            ColumnType::Varchar => Value::Text(self.to_text(shared_strings)?),
        };
        Ok(value)
    }

    /// Text rendering used for mixed-type and header cells.
    pub(crate) fn to_text(&self, shared_strings: &[String]) -> Result<String, String> {
        let text = match self.kind {
            CellType::Boolean => Value::Boolean(self.to_boolean()).to_string(),
            CellType::NumberDate1900 | CellType::NumberDate1904 => Value::Date(self.to_date()?).to_string(),
            CellType::NumberTime1900 | CellType::NumberTime1904 => Value::Time(self.to_time()?).to_string(),
            CellType::NumberDateTime1900 | CellType::NumberDateTime1904 => {
                Value::Timestamp(self.to_datetime()?).to_string()
            }
            CellType::IsoDateTime => self.value.replace('T', " "),
            _ => self.text(shared_strings)?.to_owned(),
        };
        Ok(text)
    }
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}

/// Converts an Excel serial number to a timestamp.
/// Serials below 60 in the 1900 system are shifted by the Lotus 1-2-3 leap year bug.
pub(crate) fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    let milliseconds = ((serial - days) * MILLISECONDS_PER_DAY).round() as i64;
    let days = days as i64 + if is_1904 {
        1462
    } else if days < 60.0 {
        1
    } else {
        0
    };
    epoch()
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::milliseconds(milliseconds))
}

/// Converts a date to an Excel serial number in the 1900 system.
/// Dates before 1900-01-01 have no serial.
pub(crate) fn date_to_serial(date: NaiveDate) -> Option<f64> {
    let days = (date - epoch().date()).num_days();
    match days {
        i64::MIN..=1 => None,
        2..=60 => Some((days - 1) as f64),
        _ => Some(days as f64),
    }
}

/// Fraction of a day elapsed at the given time.
pub(crate) fn time_to_serial(time: NaiveTime) -> f64 {
    let seconds = time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1e9;
    seconds / 86_400f64
}

pub(crate) fn datetime_to_serial(datetime: NaiveDateTime) -> Option<f64> {
    date_to_serial(datetime.date()).map(|days| days + time_to_serial(datetime.time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell { row: 1, col: 2, kind, value: value.to_owned() }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn custom_number_formats() {
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd", false), CellType::NumberDate1900);
        assert_eq!(CellType::parse_custom_number_format("hh:mm:ss", true), CellType::NumberTime1904);
        assert_eq!(CellType::parse_custom_number_format("yyyy-mm-dd hh:mm", false), CellType::NumberDateTime1900);
        assert_eq!(CellType::parse_custom_number_format("0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("[Red]0.00", false), CellType::Number);
        assert_eq!(CellType::parse_custom_number_format("0\" days\"", false), CellType::Number);
    }

    #[test]
    fn serial_dates() {
        assert_eq!(cell(CellType::NumberDate1900, "1").to_date(), Ok(date(1900, 1, 1)));
        assert_eq!(cell(CellType::NumberDate1900, "59").to_date(), Ok(date(1900, 2, 28)));
        assert_eq!(cell(CellType::NumberDate1900, "61").to_date(), Ok(date(1900, 3, 1)));
        assert_eq!(cell(CellType::NumberDate1900, "45351").to_date(), Ok(date(2024, 2, 29)));
        assert_eq!(cell(CellType::NumberDate1904, "0").to_date(), Ok(date(1904, 1, 1)));
    }

    #[test]
    fn serial_times() {
        let noon = cell(CellType::NumberDateTime1900, "45351.5");
        assert_eq!(noon.to_datetime(), Ok(date(2024, 2, 29).and_hms_opt(12, 0, 0).unwrap()));
        assert_eq!(noon.to_time(), Ok(NaiveTime::from_hms_opt(12, 0, 0).unwrap()));
        assert_eq!(
            cell(CellType::NumberTime1900, "0.75").to_time(),
            Ok(NaiveTime::from_hms_opt(18, 0, 0).unwrap())
        );
    }

    #[test]
    fn serial_inverse() {
        for (year, month, day) in [(1900, 1, 1), (1900, 2, 28), (1900, 3, 1), (2024, 2, 29)] {
            let serial = date_to_serial(date(year, month, day)).unwrap();
            assert_eq!(serial_to_datetime(serial, false).unwrap().date(), date(year, month, day));
        }
        assert_eq!(date_to_serial(date(1899, 12, 31)), None);
        assert_eq!(time_to_serial(NaiveTime::from_hms_opt(6, 0, 0).unwrap()), 0.25);
    }

    #[test]
    fn iso_dates() {
        assert_eq!(cell(CellType::IsoDateTime, "2024-02-29").to_date(), Ok(date(2024, 2, 29)));
        assert_eq!(
            cell(CellType::IsoDateTime, "2024-02-29T08:30:00Z").to_datetime(),
            Ok(date(2024, 2, 29).and_hms_opt(8, 30, 0).unwrap())
        );
    }

    #[test]
    fn values_by_column_type() {
        let shared_strings = vec!["zero".to_owned(), "one".to_owned()];
        assert_eq!(cell(CellType::Number, "30").to_value(ColumnType::BigInt, &shared_strings), Ok(Value::Integer(30)));
        assert_eq!(cell(CellType::Number, "1E+3").to_value(ColumnType::BigInt, &shared_strings), Ok(Value::Integer(1000)));
        assert_eq!(cell(CellType::Number, "30").to_value(ColumnType::Double, &shared_strings), Ok(Value::Float(30.0)));
        assert_eq!(cell(CellType::Boolean, "1").to_value(ColumnType::Boolean, &shared_strings), Ok(Value::Boolean(true)));
        assert_eq!(
            cell(CellType::SharedString, "1").to_value(ColumnType::Varchar, &shared_strings),
            Ok(Value::Text("one".to_owned()))
        );
        assert_eq!(
            cell(CellType::Number, "1.5").to_value(ColumnType::Varchar, &shared_strings),
            Ok(Value::Text("1.5".to_owned()))
        );
        assert!(cell(CellType::SharedString, "7").to_value(ColumnType::Varchar, &shared_strings).is_err());
        assert!(cell(CellType::InlineString, "x").to_value(ColumnType::BigInt, &shared_strings).is_err());
    }

    #[test]
    fn null_cells() {
        let criteria = Criteria::default();
        let shared_strings = vec!["NA".to_owned()];
        assert!(cell(CellType::Empty, "").is_null(&shared_strings, &criteria));
        assert!(cell(CellType::SharedString, "0").is_null(&shared_strings, &criteria));
        assert!(cell(CellType::InlineString, "N/A").is_null(&shared_strings, &criteria));
        assert!(!cell(CellType::InlineString, "B").is_null(&shared_strings, &criteria));
        assert!(!cell(CellType::Number, "0").is_null(&shared_strings, &criteria));
        assert_eq!(cell(CellType::Number, "0").reference(), "C2");
    }
}

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use std::fmt::Display;

/// A single typed cell of a table.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Missing value
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

/// Hashable identity of a value, used to compare whole rows.
/// `NaN` is folded into `Null` and `-0.0` into `0.0`.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub(crate) enum ValueKey<'a> {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(u64),
    Text(&'a str),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Value {
    /// Returns true for missing cells, including floating point `NaN`.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(value) => value.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of integer and float cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Float(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    pub(crate) fn key(&self) -> ValueKey<'_> {
        match self {
            _ if self.is_null() => ValueKey::Null,
            Value::Boolean(value) => ValueKey::Boolean(*value),
            Value::Integer(value) => ValueKey::Integer(*value),
            Value::Float(value) if *value == 0.0 => ValueKey::Float(0f64.to_bits()),
            Value::Float(value) => ValueKey::Float(value.to_bits()),
            Value::Text(value) => ValueKey::Text(value),
            Value::Timestamp(value) => ValueKey::Timestamp(*value),
            Value::Date(value) => ValueKey::Date(*value),
            Value::Time(value) => ValueKey::Time(*value),
            Value::Null => ValueKey::Null,
        }
    }
}

/// Formats a float so that integral values keep a decimal point (`30.0`).
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_owned()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

impl Display for Value {
    /// Text form used by CSV export and previews; missing values render empty.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(value) => write!(f, "{}", if *value { "True" } else { "False" }),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{}", format_float(*value)),
            Value::Text(value) => write!(f, "{value}"),
            Value::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
            Value::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Value::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
        }
    }
}

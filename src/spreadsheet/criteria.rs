use std::collections::HashSet;

/// Text literals read as missing values.
pub const DEFAULT_NULLS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Criteria for decoding cells while loading a table.
#[derive(Clone, Debug, PartialEq)]
pub struct Criteria {
    /// Text cells equal to one of these literals are missing.
    pub nulls: HashSet<String>,

    /// Convert spreadsheet error cells to null values instead of failing.
    pub error_as_null: bool,
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria {
            nulls: DEFAULT_NULLS.iter().map(|null| null.to_string()).collect(),
            error_as_null: true,
        }
    }
}

impl Criteria {
    /// Returns true if the raw text denotes a missing value.
    pub(crate) fn is_null(&self, text: &str) -> bool {
        self.nulls.contains(text)
    }
}

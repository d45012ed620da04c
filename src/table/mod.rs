//! In-memory tabular data: ordered, named, typed columns of equal length.

pub mod column;
pub mod value;

pub use column::Column;
pub use column::ColumnType;
pub use value::Value;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("Column '{name}' has {found} rows, expected {expected}")]
    LengthMismatch { name: String, expected: usize, found: usize },

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),
}

/// Ordered collection of named columns sharing one row count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table, checking that all columns have the same length and unique names.
    pub fn new(columns: Vec<Column>) -> Result<Table, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns {
                if column.values.len() != expected {
                    return Err(TableError::LengthMismatch {
                        name: column.name.to_owned(),
                        expected,
                        found: column.values.len(),
                    });
                }
            }
        }
        for (index, column) in columns.iter().enumerate() {
            if columns[..index].iter().any(|other| other.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.to_owned()));
            }
        }
        Ok(Table { columns })
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Table {
        Table::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|column| column.values.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Values of one row in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index < self.row_count() {
            Some(self.columns.iter().map(|column| &column.values[index]).collect())
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).map(move |index| {
            self.columns.iter().map(|column| &column.values[index]).collect()
        })
    }

    /// The first `n` rows (or fewer) as a new table.
    pub fn head(&self, n: usize) -> Table {
        let columns = self.columns
            .iter()
            .map(|column| Column {
                name: column.name.to_owned(),
                kind: column.kind,
                values: column.values.iter().take(n).cloned().collect(),
            })
            .collect();
        Table { columns }
    }

    /// Keeps only the rows for which `keep[row]` is true.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            let mut index = 0usize;
            column.values.retain(|_| {
                let retained = keep.get(index).copied().unwrap_or(true);
                index += 1;
                retained
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new("name", ColumnType::Varchar, vec![
                Value::Text("A".to_owned()),
                Value::Text("B".to_owned()),
                Value::Text("C".to_owned()),
            ]),
            Column::new("age", ColumnType::BigInt, vec![
                Value::Integer(30),
                Value::Null,
                Value::Integer(40),
            ]),
        ]).unwrap()
    }

    #[test]
    fn table_shape() {
        let table = sample();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_names(), vec!["name", "age"]);
        assert_eq!(table.row(1), Some(vec![&Value::Text("B".to_owned()), &Value::Null]));
        assert_eq!(table.row(3), None);
        assert_eq!(table.rows().count(), 3);
    }

    #[test]
    fn table_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::new("a", ColumnType::BigInt, vec![Value::Integer(1)]),
            Column::new("b", ColumnType::BigInt, vec![]),
        ]);
        assert_eq!(
            result,
            Err(TableError::LengthMismatch { name: "b".to_owned(), expected: 1, found: 0 })
        );
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let result = Table::new(vec![
            Column::new("a", ColumnType::BigInt, vec![]),
            Column::new("a", ColumnType::Double, vec![]),
        ]);
        assert_eq!(result, Err(TableError::DuplicateColumn("a".to_owned())));
    }

    #[test]
    fn head_and_retain() {
        let mut table = sample();
        assert_eq!(table.head(2).row_count(), 2);
        assert_eq!(table.head(10).row_count(), 3);

        table.retain_rows(&[true, false, true]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("age").unwrap().values, vec![Value::Integer(30), Value::Integer(40)]);
    }

    #[test]
    fn empty_table() {
        let table = Table::empty();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(table.is_empty());
    }
}

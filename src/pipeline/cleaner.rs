use crate::error::Warning;
use crate::table::ColumnType;
use crate::table::Table;
use crate::table::Value;
use std::collections::HashSet;

/// Removes rows equal to an earlier row across all columns, keeping the first
/// occurrence in place. Returns the number of rows removed.
pub fn deduplicate(table: &mut Table) -> usize {
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        table
            .rows()
            .map(|row| seen.insert(row.into_iter().map(Value::key).collect::<Vec<_>>()))
            .collect()
    };

    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed > 0 {
        table.retain_rows(&keep);
    }
    removed
}

/// Fills missing cells of every numeric column with the mean of its present values.
///
/// Columns that receive fills become [`ColumnType::Double`]. A numeric column with
/// no present value is left alone. Returns the number of cells filled, or
/// [`Warning::EmptyNumericSet`] when the table has no numeric column at all.
pub fn impute(table: &mut Table) -> Result<usize, Warning> {
    if !table.columns().iter().any(|column| column.kind.is_numeric()) {
        return Err(Warning::EmptyNumericSet {
            operation: "filling missing values",
        });
    }

    let mut filled = 0usize;
    for column in table.columns_mut().iter_mut().filter(|column| column.kind.is_numeric()) {
        let present: Vec<f64> = column.values.iter().filter_map(Value::as_f64).collect();
        if present.is_empty() || column.null_count() == 0 {
            continue;
        }
        let mean = present.iter().sum::<f64>() / present.len() as f64;

        for value in column.values.iter_mut() {
            if value.is_null() {
                *value = Value::Float(mean);
                filled += 1;
            } else if let Value::Integer(integer) = *value {
                *value = Value::Float(integer as f64);
            }
        }
        column.kind = ColumnType::Double;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn text(value: &str) -> Value {
        Value::Text(value.to_owned())
    }

    fn people() -> Table {
        Table::new(vec![
            Column::new("name", ColumnType::Varchar, vec![text("A"), text("A"), text("B")]),
            Column::new("age", ColumnType::BigInt, vec![Value::Integer(30), Value::Integer(30), Value::Null]),
        ]).unwrap()
    }

    #[test]
    fn deduplicate_keeps_first_occurrence() {
        let mut table = Table::new(vec![
            Column::new("k", ColumnType::BigInt, vec![Value::Integer(2), Value::Integer(1), Value::Integer(2), Value::Null, Value::Null]),
            Column::new("v", ColumnType::Double, vec![Value::Float(0.5), Value::Float(0.5), Value::Float(0.5), Value::Float(f64::NAN), Value::Null]),
        ]).unwrap();

        assert_eq!(deduplicate(&mut table), 2);
        assert_eq!(table.column("k").unwrap().values, vec![Value::Integer(2), Value::Integer(1), Value::Null]);
        assert_eq!(deduplicate(&mut table), 0);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn impute_fills_with_mean_after_deduplicate() {
        let mut table = people();
        assert_eq!(deduplicate(&mut table), 1);
        assert_eq!(impute(&mut table), Ok(1));

        let age = table.column("age").unwrap();
        assert_eq!(age.kind, ColumnType::Double);
        assert_eq!(age.values, vec![Value::Float(30.0), Value::Float(30.0)]);
        assert_eq!(table.column("name").unwrap().values, vec![text("A"), text("B")]);
    }

    #[test]
    fn impute_is_idempotent() {
        let mut table = Table::new(vec![
            Column::new("x", ColumnType::Double, vec![Value::Float(1.0), Value::Null, Value::Float(4.0), Value::Null]),
        ]).unwrap();

        assert_eq!(impute(&mut table), Ok(2));
        let once = table.clone();
        assert_eq!(impute(&mut table), Ok(0));
        assert_eq!(table, once);
        assert_eq!(once.column("x").unwrap().values[1], Value::Float(2.5));
    }

    #[test]
    fn impute_skips_columns_without_values() {
        let mut table = Table::new(vec![
            Column::new("empty", ColumnType::BigInt, vec![Value::Null, Value::Null]),
            Column::new("full", ColumnType::BigInt, vec![Value::Integer(1), Value::Integer(2)]),
            Column::new("note", ColumnType::Varchar, vec![Value::Null, text("x")]),
        ]).unwrap();
        let before = table.clone();

        assert_eq!(impute(&mut table), Ok(0));
        assert_eq!(table, before);
    }

    #[test]
    fn impute_without_numeric_columns_warns() {
        let mut table = Table::new(vec![
            Column::new("id", ColumnType::Varchar, vec![text("a"), Value::Null]),
            Column::new("note", ColumnType::Varchar, vec![Value::Null, text("b")]),
        ]).unwrap();
        let before = table.clone();

        let warning = impute(&mut table).unwrap_err();
        assert_eq!(warning.to_string(), "No numeric columns available for filling missing values");
        assert_eq!(table, before);
    }
}

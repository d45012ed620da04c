use crate::table::Table;
use crate::table::TableError;

/// Which columns to keep, and in which order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    #[default]
    All,
    Columns(Vec<String>),
}

impl ColumnSelection {
    pub fn columns<I, S>(names: I) -> ColumnSelection
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelection::Columns(names.into_iter().map(Into::into).collect())
    }
}

/// Restricts the table to the selected columns in selection order.
///
/// An empty selection yields a table with no columns. A repeated name is kept at its
/// first position. Names missing from the table fail with [`TableError::UnknownColumn`].
pub fn project(table: Table, selection: &ColumnSelection) -> Result<Table, TableError> {
    let names = match selection {
        ColumnSelection::All => return Ok(table),
        ColumnSelection::Columns(names) => names,
    };

    if let Some(unknown) = names.iter().find(|name| table.column(name).is_none()) {
        return Err(TableError::UnknownColumn(unknown.to_owned()));
    }

    let mut columns: Vec<_> = table.into_columns().into_iter().map(Some).collect();
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let slot = columns
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|column| &column.name == name));
        if let Some(column) = slot.and_then(Option::take) {
            selected.push(column);
        }
    }
    Table::new(selected)
}

use crate::error::RefineryError;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::SpreadsheetError;
use crate::table::column::unique_names;
use crate::table::Column;
use crate::table::ColumnType;
use crate::table::Table;
use crate::table::Value;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Upper bound on the cells laid out for one sheet
pub(crate) const MAX_GRID_CELLS: usize = 1 << 26;

/// Represents a worksheet as a sparse list of cells plus its used column range.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Used column range (determined from cell data)
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Adds a cell to the sheet, updating the column range.
    pub(super) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, col: usize) {
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Lays the cells out as a grid over the used columns, one line per row that has
    /// cells. Later cells at the same position replace earlier ones.
    /// Fails when the grid would exceed [`MAX_GRID_CELLS`].
    pub(crate) fn grid(&self) -> Result<Vec<Vec<Option<&Cell>>>, SpreadsheetError> {
        let (Some(col_lower), Some(col_upper)) = (self.col_lower_bound, self.col_upper_bound) else {
            return Ok(Vec::new());
        };
        let width = col_upper - col_lower + 1;
        let rows: BTreeSet<usize> = self.cells.iter().map(|cell| cell.row).collect();
        if rows.len().saturating_mul(width) > MAX_GRID_CELLS {
            return Err(SpreadsheetError::SheetTooLarge(
                self.file_name.to_owned(),
                self.name.to_owned(),
                rows.len(),
                width,
            ));
        }

        let mut grid: BTreeMap<usize, Vec<Option<&Cell>>> =
            rows.into_iter().map(|row| (row, vec![None; width])).collect();
        for cell in &self.cells {
            if let Some(line) = grid.get_mut(&cell.row) {
                line[cell.col - col_lower] = Some(cell);
            }
        }
        Ok(grid.into_values().collect())
    }

    /// Builds a table: the first used row is the header, blank rows are skipped,
    /// and each column type is detected from its non-null cells.
    pub(crate) fn to_table(&self, shared_strings: &[String], criteria: &Criteria) -> Result<Table, RefineryError> {
        let grid = self.grid()?;
        let Some((header, records)) = grid.split_first() else {
            return Err(SpreadsheetError::EmptySheet(self.file_name.to_owned(), self.name.to_owned()).into());
        };

        let records: Vec<&Vec<Option<&Cell>>> = records
            .iter()
            .filter(|record| !record.iter().all(|cell| is_missing(*cell, shared_strings, criteria)))
            .collect();

        let names = header
            .iter()
            .map(|cell| match cell {
                Some(cell) if !cell.is_null(shared_strings, criteria) => cell
                    .to_text(shared_strings)
                    .map(Some)
                    .map_err(|message| self.cell_error(cell, message)),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut columns = Vec::<Column>::with_capacity(header.len());
        for (index, name) in unique_names(names).into_iter().enumerate() {
            let kinds = records
                .iter()
                .map(|record| match record[index] {
                    Some(cell) if !cell.is_null(shared_strings, criteria) => ColumnType::from(&cell.kind, &cell.value),
                    _ => None,
                })
                .collect();
            let kind = ColumnType::detect(kinds);
            let values = records
                .iter()
                .map(|record| match record[index] {
                    Some(cell) if !cell.is_null(shared_strings, criteria) => cell
                        .to_value(kind, shared_strings)
                        .map_err(|message| self.cell_error(cell, message)),
                    _ => Ok(Value::Null),
                })
                .collect::<Result<Vec<_>, _>>()?;
            columns.push(Column::new(name, kind, values));
        }
        Ok(Table::new(columns)?)
    }

    fn cell_error(&self, cell: &Cell, message: String) -> SpreadsheetError {
        SpreadsheetError::CellValueError(
            self.file_name.to_owned(),
            self.name.to_owned(),
            cell.reference(),
            message,
        )
    }
}

fn is_missing(cell: Option<&Cell>, shared_strings: &[String], criteria: &Criteria) -> bool {
    cell.map(|cell| cell.is_null(shared_strings, criteria)).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellType;

    fn push(sheet: &mut Sheet, row: usize, col: usize, kind: CellType, value: &str) {
        sheet.push(Cell {
            row,
            col,
            kind,
            value: value.to_owned(),
        });
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("", "");

        assert!(sheet.cells.is_empty());
        assert_eq!(sheet.col_upper_bound, None);
        assert!(sheet.grid().unwrap().is_empty());
    }

    #[test]
    fn sheet_update() {
        let mut sheet = Sheet::new("", "");
        push(&mut sheet, 1, 1, CellType::InlineString, "a");
        push(&mut sheet, 1, 3, CellType::InlineString, "b");
        push(&mut sheet, 3, 1, CellType::Number, "1");
        push(&mut sheet, 3, 3, CellType::Number, "2");

        assert_eq!(sheet.cells.len(), 4);
        assert_eq!(sheet.col_lower_bound, Some(1));
        assert_eq!(sheet.col_upper_bound, Some(3));

        let grid = sheet.grid().unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].len(), 3);
        assert!(grid[0][1].is_none());
        assert_eq!(grid[1][2].map(|cell| cell.value.as_str()), Some("2"));
    }

    #[test]
    fn sheet_to_table() {
        let mut sheet = Sheet::new("book.xlsx", "Sheet1");
        let shared_strings = vec!["name".to_owned(), "A".to_owned()];
        push(&mut sheet, 0, 0, CellType::SharedString, "0");
        push(&mut sheet, 0, 1, CellType::InlineString, "age");
        push(&mut sheet, 0, 2, CellType::InlineString, "age");
        push(&mut sheet, 1, 0, CellType::SharedString, "1");
        push(&mut sheet, 1, 1, CellType::Number, "30");
        push(&mut sheet, 1, 2, CellType::Number, "1.5");
        push(&mut sheet, 3, 0, CellType::InlineString, "B");
        push(&mut sheet, 3, 2, CellType::InlineString, "NA");

        let table = sheet.to_table(&shared_strings, &Criteria::default()).unwrap();
        assert_eq!(table.column_names(), vec!["name", "age", "age.1"]);
        assert_eq!(table.row_count(), 2);
        let age = table.column("age").unwrap();
        assert_eq!(age.kind, ColumnType::BigInt);
        assert_eq!(age.values, vec![Value::Integer(30), Value::Null]);
        let other = table.column("age.1").unwrap();
        assert_eq!(other.kind, ColumnType::Double);
        assert_eq!(other.values, vec![Value::Float(1.5), Value::Null]);
    }

    #[test]
    fn sheet_without_cells_is_an_error() {
        let sheet = Sheet::new("book.xlsx", "Sheet1");
        let result = sheet.to_table(&[], &Criteria::default());
        assert!(matches!(
            result,
            Err(RefineryError::SpreadsheetError(SpreadsheetError::EmptySheet(..)))
        ));
    }

    #[test]
    fn distant_rows_are_not_laid_out() {
        let mut sheet = Sheet::new("book.xlsx", "Sheet1");
        push(&mut sheet, 0, 0, CellType::InlineString, "x");
        push(&mut sheet, 1, 0, CellType::Number, "1");
        push(&mut sheet, 1_048_575, 0, CellType::Number, "2");

        assert_eq!(sheet.grid().unwrap().len(), 3);
        let table = sheet.to_table(&[], &Criteria::default()).unwrap();
        assert_eq!(table.column("x").unwrap().values, vec![Value::Integer(1), Value::Integer(2)]);
    }

    #[test]
    fn oversized_sheet_is_an_error() {
        let mut sheet = Sheet::new("book.xlsx", "Sheet1");
        for row in 0..5_000 {
            push(&mut sheet, row, 0, CellType::Number, "1");
        }
        push(&mut sheet, 1_048_575, 16_383, CellType::Number, "2");

        let result = sheet.to_table(&[], &Criteria::default());
        assert!(matches!(
            result,
            Err(RefineryError::SpreadsheetError(SpreadsheetError::SheetTooLarge(_, _, 5_001, 16_384)))
        ));
    }
}

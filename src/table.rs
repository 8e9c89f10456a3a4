//! A minimal rectangular table of heterogeneous cells.
//!
//! Columns are stored column-major; every column has the same number of
//! rows. The header layer owns all semantic validation — this type only
//! guarantees rectangularity.

use crate::error::{Error, StructuralError};
use crate::value::Value;

/// Ordered rows of [`Value`] cells, column-major.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    columns: Vec<Vec<Value>>,
    n_rows: usize,
}

impl Table {
    /// Build a table from columns of equal length.
    pub fn new(columns: Vec<Vec<Value>>) -> Result<Self, Error> {
        let n_rows = columns.first().map_or(0, Vec::len);
        for column in &columns {
            if column.len() != n_rows {
                return Err(StructuralError::ColumnLengthMismatch {
                    expected: n_rows,
                    got: column.len(),
                }
                .into());
            }
        }
        Ok(Table { columns, n_rows })
    }

    /// Build a table from rows, each `n_columns` cells wide.
    ///
    /// Unlike [`Table::new`], this keeps the row count even for a
    /// zero-column table.
    pub fn from_rows(n_columns: usize, rows: Vec<Vec<Value>>) -> Result<Self, Error> {
        let n_rows = rows.len();
        let mut columns = vec![Vec::with_capacity(n_rows); n_columns];
        for row in rows {
            if row.len() != n_columns {
                return Err(StructuralError::RowLengthMismatch {
                    expected: n_columns,
                    got: row.len(),
                }
                .into());
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell);
            }
        }
        Ok(Table { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.columns.get(column)?.get(row)
    }

    pub fn column(&self, column: usize) -> Option<&[Value]> {
        self.columns.get(column).map(Vec::as_slice)
    }

    /// The cells of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<Value>> {
        if row >= self.n_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| c[row].clone()).collect())
    }

    /// Append one row.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), Error> {
        if row.len() != self.n_columns() {
            return Err(StructuralError::RowLengthMismatch {
                expected: self.n_columns(),
                got: row.len(),
            }
            .into());
        }
        for (column, cell) in self.columns.iter_mut().zip(row) {
            column.push(cell);
        }
        self.n_rows += 1;
        Ok(())
    }

    /// Overwrite one row. The index must be in range.
    pub fn set_row(&mut self, row: usize, cells: Vec<Value>) -> Result<(), Error> {
        if cells.len() != self.n_columns() {
            return Err(StructuralError::RowLengthMismatch {
                expected: self.n_columns(),
                got: cells.len(),
            }
            .into());
        }
        debug_assert!(row < self.n_rows);
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column[row] = cell;
        }
        Ok(())
    }

    /// Append one column of `n_rows` cells.
    pub fn push_column(&mut self, column: Vec<Value>) -> Result<(), Error> {
        if column.len() != self.n_rows {
            return Err(StructuralError::ColumnLengthMismatch {
                expected: self.n_rows,
                got: column.len(),
            }
            .into());
        }
        self.columns.push(column);
        Ok(())
    }

    /// Delete the rows named by `indices`, preserving the relative order of
    /// the remaining rows. Indices must be in range and duplicate-free.
    pub fn remove_rows(&mut self, indices: &[usize]) {
        let mut keep = vec![true; self.n_rows];
        for &index in indices {
            debug_assert!(index < self.n_rows);
            keep[index] = false;
        }
        for column in &mut self.columns {
            let mut row = 0;
            column.retain(|_| {
                let kept = keep[row];
                row += 1;
                kept
            });
        }
        self.n_rows -= indices.len();
    }

    /// A new table whose row `i` is this table's row `order[i]`. The order
    /// must be a permutation of the row indices.
    pub fn permuted(&self, order: &[usize]) -> Table {
        debug_assert_eq!(order.len(), self.n_rows);
        let columns = self
            .columns
            .iter()
            .map(|column| order.iter().map(|&i| column[i].clone()).collect())
            .collect();
        Table {
            columns,
            n_rows: self.n_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruits() -> Table {
        Table::from_rows(
            2,
            vec![
                vec![Value::from("apple"), Value::from(0.5)],
                vec![Value::from("pear"), Value::from(0.75)],
                vec![Value::from("banana"), Value::from(0.66)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn rectangular_by_construction() {
        assert!(Table::new(vec![vec![Value::Int(1)], vec![]]).is_err());
        assert!(Table::from_rows(2, vec![vec![Value::Int(1)]]).is_err());
        let t = fruits();
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.n_columns(), 2);
        assert_eq!(t.cell(1, 0), Some(&Value::from("pear")));
    }

    #[test]
    fn remove_preserves_relative_order() {
        let mut t = fruits();
        t.remove_rows(&[1]);
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.cell(0, 0), Some(&Value::from("apple")));
        assert_eq!(t.cell(1, 0), Some(&Value::from("banana")));
    }

    #[test]
    fn permutation_takes_source_order() {
        let t = fruits();
        let p = t.permuted(&[2, 0, 1]);
        assert_eq!(p.cell(0, 0), Some(&Value::from("banana")));
        assert_eq!(p.cell(1, 0), Some(&Value::from("apple")));
        assert_eq!(p.cell(2, 0), Some(&Value::from("pear")));
    }
}

//! Collection axis headers.
//!
//! A categorical header describes an axis whose elements have no regular
//! organisation. With zero columns the axis is *undifferentiated* — elements
//! are identified only by position. With one or more typed columns the axis
//! is *categorical with values*: each element owns a row of features, each
//! column described by a [`DimensionDescriptor`].

use crate::descriptor::DimensionDescriptor;
use crate::error::{Error, IndexError, StructuralError, ValidationError};
use crate::table::Table;
use crate::value::{DimensionKind, Rgb, Value};

use super::ColumnRef;

/// How a column descriptor is obtained at construction.
#[derive(Debug, Clone)]
pub enum ColumnSpec {
    /// Scan the column once and infer the kind; the first disagreement
    /// widens it to `Mixed`.
    Inferred(String),
    /// Use the given descriptor; unless it is `Mixed`, every cell in the
    /// column must match its kind.
    Described(DimensionDescriptor),
}

/// A structural edit of a categorical header's rows.
///
/// Each case carries exactly the payload it needs. Compound cases apply
/// their change part against the original row numbering before growing or
/// shrinking the header.
#[derive(Debug, Clone)]
pub enum RowEdit {
    /// Replace the whole table; the column count is preserved.
    All { rows: Vec<Vec<Value>> },
    /// Append rows at the end, in input order.
    New { rows: Vec<Vec<Value>> },
    /// Overwrite the rows at `indices`, one-to-one with `rows`.
    Chg {
        indices: Vec<usize>,
        rows: Vec<Vec<Value>>,
    },
    /// Delete the rows at `indices`; remaining order is preserved.
    Remove { indices: Vec<usize> },
    /// Reorder rows: new row `i` is old row `order[i]`.
    Perm { order: Vec<usize> },
    /// `Chg` on `indices`/`changed`, then `New` on `appended`.
    ChgNew {
        indices: Vec<usize>,
        changed: Vec<Vec<Value>>,
        appended: Vec<Vec<Value>>,
    },
    /// `Chg` on `changed_indices`/`changed`, then `Remove` on `removed`;
    /// both index sets use the original, pre-change numbering.
    ChgRm {
        changed_indices: Vec<usize>,
        changed: Vec<Vec<Value>>,
        removed: Vec<usize>,
    },
}

impl RowEdit {
    /// The flag literal naming this edit case.
    pub fn name(&self) -> &'static str {
        match self {
            RowEdit::All { .. } => "all",
            RowEdit::New { .. } => "new",
            RowEdit::Chg { .. } => "chg",
            RowEdit::Remove { .. } => "remove",
            RowEdit::Perm { .. } => "perm",
            RowEdit::ChgNew { .. } => "chg&new",
            RowEdit::ChgRm { .. } => "chg&rm",
        }
    }
}

/// Header for an axis holding an arbitrary collection of elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoricalHeader {
    label: String,
    columns: Vec<DimensionDescriptor>,
    /// `None` for the undifferentiated case.
    table: Option<Table>,
    n_elem: usize,
}

impl CategoricalHeader {
    /// An axis whose elements are identified only by position.
    pub fn undifferentiated(label: impl Into<String>, n_elem: usize) -> Self {
        CategoricalHeader {
            label: label.into(),
            columns: Vec::new(),
            table: None,
            n_elem,
        }
    }

    /// An axis with a feature table, one spec per column.
    ///
    /// With zero columns this normalizes to the undifferentiated case.
    pub fn new(
        label: impl Into<String>,
        specs: Vec<ColumnSpec>,
        table: Table,
    ) -> Result<Self, Error> {
        if specs.len() != table.n_columns() {
            return Err(ValidationError::ColumnCountMismatch {
                expected: table.n_columns(),
                got: specs.len(),
            }
            .into());
        }
        if specs.is_empty() {
            return Ok(CategoricalHeader::undifferentiated(label, table.n_rows()));
        }
        let mut columns = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            let cells = table.column(index).expect("column count checked above");
            match spec {
                ColumnSpec::Inferred(name) => {
                    columns.push(DimensionDescriptor::infer_from_values(name, cells)?);
                }
                ColumnSpec::Described(descriptor) => {
                    for (row, cell) in cells.iter().enumerate() {
                        if !descriptor.accepts(cell) {
                            return Err(ValidationError::CellKindMismatch {
                                row,
                                column: index,
                                expected: descriptor.kind(),
                                found: cell.kind(),
                            }
                            .into());
                        }
                    }
                    columns.push(descriptor);
                }
            }
        }
        let n_elem = table.n_rows();
        Ok(CategoricalHeader {
            label: label.into(),
            columns,
            table: Some(table),
            n_elem,
        })
    }

    /// Convenience constructor from rows.
    pub fn from_rows(
        label: impl Into<String>,
        specs: Vec<ColumnSpec>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, Error> {
        let table = Table::from_rows(specs.len(), rows)?;
        CategoricalHeader::new(label, specs, table)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn n_elem(&self) -> usize {
        self.n_elem
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the header stores a feature table.
    pub fn is_with_values(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn column_descriptors(&self) -> &[DimensionDescriptor] {
        &self.columns
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    fn resolve_column(&self, column: ColumnRef<'_>) -> Result<usize, Error> {
        match column {
            ColumnRef::Index(index) => {
                if index >= self.n_columns() {
                    return Err(IndexError::ColumnOutOfRange {
                        column: index,
                        n_columns: self.n_columns(),
                    }
                    .into());
                }
                Ok(index)
            }
            ColumnRef::Label(label) => self
                .columns
                .iter()
                .position(|d| d.label() == label)
                .ok_or_else(|| {
                    ValidationError::UnknownColumn {
                        label: label.to_owned(),
                    }
                    .into()
                }),
        }
    }

    /// The value at `row` in the given column (default: first).
    ///
    /// An undifferentiated header returns the position itself.
    pub fn get_value(&self, row: usize, column: Option<ColumnRef<'_>>) -> Result<Value, Error> {
        if row >= self.n_elem {
            return Err(IndexError::RowOutOfRange {
                row,
                n_elem: self.n_elem,
            }
            .into());
        }
        if !self.is_with_values() {
            match column {
                None | Some(ColumnRef::Index(0)) => return Ok(Value::Int(row as i64)),
                Some(ColumnRef::Index(index)) => {
                    return Err(IndexError::ColumnOutOfRange {
                        column: index,
                        n_columns: 0,
                    }
                    .into());
                }
                Some(ColumnRef::Label(label)) => {
                    return Err(ValidationError::UnknownColumn {
                        label: label.to_owned(),
                    }
                    .into());
                }
            }
        }
        let column = match column {
            None => 0,
            Some(reference) => self.resolve_column(reference)?,
        };
        Ok(self
            .table
            .as_ref()
            .expect("a header with columns stores a table")
            .cell(row, column)
            .expect("row and column are range-checked")
            .clone())
    }

    /// A new header with one more column, type-checked like construction.
    pub fn add_column(&self, spec: ColumnSpec, values: Vec<Value>) -> Result<Self, Error> {
        if values.len() != self.n_elem {
            return Err(StructuralError::ColumnLengthMismatch {
                expected: self.n_elem,
                got: values.len(),
            }
            .into());
        }
        let descriptor = match spec {
            ColumnSpec::Inferred(name) => DimensionDescriptor::infer_from_values(name, &values)?,
            ColumnSpec::Described(descriptor) => {
                for (row, cell) in values.iter().enumerate() {
                    if !descriptor.accepts(cell) {
                        return Err(ValidationError::CellKindMismatch {
                            row,
                            column: self.n_columns(),
                            expected: descriptor.kind(),
                            found: cell.kind(),
                        }
                        .into());
                    }
                }
                descriptor
            }
        };
        let mut table = match &self.table {
            Some(table) => table.clone(),
            None => Table::from_rows(0, vec![Vec::new(); self.n_elem])?,
        };
        table.push_column(values)?;
        let mut columns = self.columns.clone();
        columns.push(descriptor);
        Ok(CategoricalHeader {
            label: self.label.clone(),
            columns,
            n_elem: table.n_rows(),
            table: Some(table),
        })
    }

    /// Apply a row edit, producing a new header.
    ///
    /// Value-carrying edits widen a column to `Mixed` whenever an incoming
    /// cell's kind disagrees with the column's current, non-mixed kind; a
    /// widened column never narrows again.
    pub fn update(&self, edit: RowEdit) -> Result<Self, Error> {
        if !self.is_with_values() {
            return self.update_undifferentiated(edit);
        }
        match edit {
            RowEdit::All { rows } => {
                self.check_row_widths(&rows)?;
                let columns = self.widened_columns(rows.iter());
                let table = Table::from_rows(self.n_columns(), rows)?;
                Ok(self.rebuilt(columns, table))
            }
            RowEdit::New { rows } => {
                self.check_row_widths(&rows)?;
                let columns = self.widened_columns(rows.iter());
                let mut table = self.table.clone().expect("header with values");
                for row in rows {
                    table.push_row(row)?;
                }
                Ok(self.rebuilt(columns, table))
            }
            RowEdit::Chg { indices, rows } => {
                self.check_change_arity(&indices, &rows)?;
                let columns = self.widened_columns(rows.iter());
                let mut table = self.table.clone().expect("header with values");
                for (&index, row) in indices.iter().zip(rows) {
                    table.set_row(index, row)?;
                }
                Ok(self.rebuilt(columns, table))
            }
            RowEdit::Remove { indices } => {
                self.check_removal(&indices)?;
                let mut table = self.table.clone().expect("header with values");
                table.remove_rows(&indices);
                Ok(self.rebuilt(self.columns.clone(), table))
            }
            RowEdit::Perm { order } => {
                validate_permutation(&order, self.n_elem)?;
                let table = self
                    .table
                    .as_ref()
                    .expect("header with values")
                    .permuted(&order);
                Ok(self.rebuilt(self.columns.clone(), table))
            }
            RowEdit::ChgNew {
                indices,
                changed,
                appended,
            } => {
                self.check_change_arity(&indices, &changed)?;
                self.check_row_widths(&appended)?;
                let columns = self.widened_columns(changed.iter().chain(appended.iter()));
                let mut table = self.table.clone().expect("header with values");
                for (&index, row) in indices.iter().zip(changed) {
                    table.set_row(index, row)?;
                }
                for row in appended {
                    table.push_row(row)?;
                }
                Ok(self.rebuilt(columns, table))
            }
            RowEdit::ChgRm {
                changed_indices,
                changed,
                removed,
            } => {
                self.check_change_arity(&changed_indices, &changed)?;
                self.check_removal(&removed)?;
                let columns = self.widened_columns(changed.iter());
                let mut table = self.table.clone().expect("header with values");
                for (&index, row) in changed_indices.iter().zip(changed) {
                    table.set_row(index, row)?;
                }
                table.remove_rows(&removed);
                Ok(self.rebuilt(columns, table))
            }
        }
    }

    /// The undifferentiated arm: rows carry no cells, only the element
    /// count moves.
    fn update_undifferentiated(&self, edit: RowEdit) -> Result<Self, Error> {
        let empty_rows = |rows: &[Vec<Value>]| -> Result<(), Error> {
            for row in rows {
                if !row.is_empty() {
                    return Err(StructuralError::RowLengthMismatch {
                        expected: 0,
                        got: row.len(),
                    }
                    .into());
                }
            }
            Ok(())
        };
        match edit {
            RowEdit::All { rows } => {
                empty_rows(&rows)?;
                Ok(CategoricalHeader::undifferentiated(
                    self.label.clone(),
                    rows.len(),
                ))
            }
            RowEdit::New { rows } => {
                empty_rows(&rows)?;
                Ok(CategoricalHeader::undifferentiated(
                    self.label.clone(),
                    self.n_elem + rows.len(),
                ))
            }
            RowEdit::Chg { indices, rows } => {
                self.check_change_arity(&indices, &rows)?;
                empty_rows(&rows)?;
                Ok(self.clone())
            }
            RowEdit::Remove { indices } => {
                self.check_removal(&indices)?;
                Ok(CategoricalHeader::undifferentiated(
                    self.label.clone(),
                    self.n_elem - indices.len(),
                ))
            }
            RowEdit::Perm { order } => {
                validate_permutation(&order, self.n_elem)?;
                Ok(self.clone())
            }
            RowEdit::ChgNew {
                indices,
                changed,
                appended,
            } => {
                self.check_change_arity(&indices, &changed)?;
                empty_rows(&changed)?;
                empty_rows(&appended)?;
                Ok(CategoricalHeader::undifferentiated(
                    self.label.clone(),
                    self.n_elem + appended.len(),
                ))
            }
            RowEdit::ChgRm {
                changed_indices,
                changed,
                removed,
            } => {
                self.check_change_arity(&changed_indices, &changed)?;
                empty_rows(&changed)?;
                self.check_removal(&removed)?;
                Ok(CategoricalHeader::undifferentiated(
                    self.label.clone(),
                    self.n_elem - removed.len(),
                ))
            }
        }
    }

    /// A single synthetic row combining the given rows, for merge and
    /// binning operations.
    ///
    /// Non-color columns collect the distinct values in first-seen order as
    /// a list; color columns take the channel-wise mean of the distinct
    /// colors.
    pub fn merge_rows(&self, indices: &[usize]) -> Result<Vec<Value>, Error> {
        if indices.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }
        for &index in indices {
            if index >= self.n_elem {
                return Err(IndexError::RowOutOfRange {
                    row: index,
                    n_elem: self.n_elem,
                }
                .into());
            }
        }
        let table = match &self.table {
            Some(table) => table,
            None => return Ok(Vec::new()),
        };
        let mut merged = Vec::with_capacity(self.n_columns());
        for (column, descriptor) in self.columns.iter().enumerate() {
            let mut distinct: Vec<Value> = Vec::new();
            for &row in indices {
                let cell = table.cell(row, column).expect("range checked above");
                if !distinct.contains(cell) {
                    distinct.push(cell.clone());
                }
            }
            if descriptor.kind() == DimensionKind::Color {
                let colors: Vec<Rgb> = distinct
                    .iter()
                    .filter_map(|v| match v {
                        Value::Color(rgb) => Some(*rgb),
                        _ => None,
                    })
                    .collect();
                merged.push(Value::Color(
                    Rgb::mean(&colors).expect("at least one row selected"),
                ));
            } else {
                merged.push(Value::List(distinct));
            }
        }
        Ok(merged)
    }

    fn rebuilt(&self, columns: Vec<DimensionDescriptor>, table: Table) -> Self {
        CategoricalHeader {
            label: self.label.clone(),
            columns,
            n_elem: table.n_rows(),
            table: Some(table),
        }
    }

    fn check_row_widths(&self, rows: &[Vec<Value>]) -> Result<(), Error> {
        for row in rows {
            if row.len() != self.n_columns() {
                return Err(StructuralError::RowLengthMismatch {
                    expected: self.n_columns(),
                    got: row.len(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_change_arity(&self, indices: &[usize], rows: &[Vec<Value>]) -> Result<(), Error> {
        if indices.len() != rows.len() {
            return Err(StructuralError::RowCountMismatch {
                expected: indices.len(),
                got: rows.len(),
            }
            .into());
        }
        self.check_row_widths(rows)?;
        for &index in indices {
            if index >= self.n_elem {
                return Err(IndexError::RowOutOfRange {
                    row: index,
                    n_elem: self.n_elem,
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_removal(&self, indices: &[usize]) -> Result<(), Error> {
        let mut seen = vec![false; self.n_elem];
        for &index in indices {
            if index >= self.n_elem {
                return Err(IndexError::RowOutOfRange {
                    row: index,
                    n_elem: self.n_elem,
                }
                .into());
            }
            if seen[index] {
                return Err(IndexError::DuplicateIndex { index }.into());
            }
            seen[index] = true;
        }
        Ok(())
    }

    /// Columns after absorbing `rows`: any non-mixed column that disagrees
    /// with an incoming cell widens to `Mixed`.
    fn widened_columns<'a>(
        &self,
        rows: impl Iterator<Item = &'a Vec<Value>>,
    ) -> Vec<DimensionDescriptor> {
        let mut columns = self.columns.clone();
        for row in rows {
            for (descriptor, cell) in columns.iter_mut().zip(row) {
                if descriptor.kind() != DimensionKind::Mixed && !descriptor.accepts(cell) {
                    *descriptor = descriptor.widen_to_mixed();
                }
            }
        }
        columns
    }
}

pub(crate) fn validate_permutation(order: &[usize], n_elem: usize) -> Result<(), Error> {
    if order.len() != n_elem {
        return Err(IndexError::NotAPermutation { n_elem }.into());
    }
    let mut seen = vec![false; n_elem];
    for &index in order {
        if index >= n_elem || seen[index] {
            return Err(IndexError::NotAPermutation { n_elem }.into());
        }
        seen[index] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruits() -> CategoricalHeader {
        CategoricalHeader::from_rows(
            "fruits",
            vec![
                ColumnSpec::Inferred("fruits".into()),
                ColumnSpec::Inferred("prices".into()),
                ColumnSpec::Inferred("color".into()),
            ],
            vec![
                vec![Value::from("apple"), Value::from(0.5), Value::from("red")],
                vec![Value::from("pear"), Value::from(0.75), Value::from("green")],
                vec![
                    Value::from("banana"),
                    Value::from(0.66),
                    Value::from("yellow"),
                ],
                vec![Value::from("cherry"), Value::from(0.89), Value::from("red")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn construction_infers_column_kinds() {
        let h = fruits();
        assert_eq!(h.n_elem(), 4);
        assert_eq!(h.n_columns(), 3);
        assert!(h.is_with_values());
        let kinds: Vec<_> = h.column_descriptors().iter().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            [
                DimensionKind::Text,
                DimensionKind::Numeric,
                DimensionKind::Text
            ]
        );
    }

    #[test]
    fn described_columns_are_validated_cell_by_cell() {
        let bad = CategoricalHeader::from_rows(
            "axis",
            vec![ColumnSpec::Described(
                DimensionDescriptor::new("n", DimensionKind::Numeric).unwrap(),
            )],
            vec![vec![Value::from(1i64)], vec![Value::from("two")]],
        );
        assert!(matches!(
            bad.unwrap_err(),
            Error::Validation(ValidationError::CellKindMismatch { row: 1, .. })
        ));
    }

    #[test]
    fn undifferentiated_returns_positions() {
        let h = CategoricalHeader::undifferentiated("repetitions", 8);
        assert!(!h.is_with_values());
        assert_eq!(h.n_columns(), 0);
        assert_eq!(h.get_value(3, None).unwrap(), Value::Int(3));
        assert!(h.get_value(8, None).is_err());
    }

    #[test]
    fn get_value_by_label_and_index() {
        let h = fruits();
        assert_eq!(h.get_value(1, None).unwrap(), Value::from("pear"));
        assert_eq!(
            h.get_value(2, Some(ColumnRef::Label("prices"))).unwrap(),
            Value::from(0.66)
        );
        assert_eq!(
            h.get_value(3, Some(ColumnRef::Index(2))).unwrap(),
            Value::from("red")
        );
        assert!(h.get_value(0, Some(ColumnRef::Label("weight"))).is_err());
        assert!(h.get_value(0, Some(ColumnRef::Index(3))).is_err());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let h = fruits();
        let updated = h.update(RowEdit::Remove { indices: vec![1] }).unwrap();
        assert_eq!(updated.n_elem(), 3);
        assert_eq!(updated.get_value(0, None).unwrap(), Value::from("apple"));
        assert_eq!(updated.get_value(1, None).unwrap(), Value::from("banana"));
        assert_eq!(updated.get_value(2, None).unwrap(), Value::from("cherry"));
    }

    #[test]
    fn perm_round_trips_through_its_inverse() {
        let h = fruits();
        let order = vec![2, 0, 3, 1];
        let mut inverse = vec![0; order.len()];
        for (i, &o) in order.iter().enumerate() {
            inverse[o] = i;
        }
        let permuted = h.update(RowEdit::Perm { order }).unwrap();
        assert_eq!(permuted.get_value(0, None).unwrap(), Value::from("banana"));
        let back = permuted.update(RowEdit::Perm { order: inverse }).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn perm_rejects_non_permutations() {
        let h = fruits();
        assert!(matches!(
            h.update(RowEdit::Perm {
                order: vec![0, 0, 1, 2]
            })
            .unwrap_err(),
            Error::Index(IndexError::NotAPermutation { .. })
        ));
        assert!(h.update(RowEdit::Perm { order: vec![0, 1] }).is_err());
    }

    #[test]
    fn chg_widens_disagreeing_columns() {
        let h = fruits();
        let updated = h
            .update(RowEdit::Chg {
                indices: vec![0],
                rows: vec![vec![Value::from("apple"), Value::from("free"), Value::from("red")]],
            })
            .unwrap();
        assert_eq!(
            updated.column_descriptors()[1].kind(),
            DimensionKind::Mixed
        );
        // untouched columns keep their kind
        assert_eq!(updated.column_descriptors()[0].kind(), DimensionKind::Text);

        // widening is monotonic: putting a number back does not narrow
        let again = updated
            .update(RowEdit::Chg {
                indices: vec![0],
                rows: vec![vec![Value::from("apple"), Value::from(0.5), Value::from("red")]],
            })
            .unwrap();
        assert_eq!(again.column_descriptors()[1].kind(), DimensionKind::Mixed);
    }

    #[test]
    fn chg_new_changes_then_appends() {
        let h = fruits();
        let updated = h
            .update(RowEdit::ChgNew {
                indices: vec![1],
                changed: vec![vec![
                    Value::from("quince"),
                    Value::from(1.1),
                    Value::from("gold"),
                ]],
                appended: vec![vec![
                    Value::from("fig"),
                    Value::from(1.4),
                    Value::from("purple"),
                ]],
            })
            .unwrap();
        assert_eq!(updated.n_elem(), 5);
        assert_eq!(updated.get_value(1, None).unwrap(), Value::from("quince"));
        assert_eq!(updated.get_value(4, None).unwrap(), Value::from("fig"));
    }

    #[test]
    fn chg_rm_uses_original_numbering() {
        let h = fruits();
        let updated = h
            .update(RowEdit::ChgRm {
                changed_indices: vec![3],
                changed: vec![vec![
                    Value::from("morello"),
                    Value::from(0.95),
                    Value::from("dark red"),
                ]],
                removed: vec![0, 2],
            })
            .unwrap();
        assert_eq!(updated.n_elem(), 2);
        assert_eq!(updated.get_value(0, None).unwrap(), Value::from("pear"));
        assert_eq!(updated.get_value(1, None).unwrap(), Value::from("morello"));
    }

    #[test]
    fn duplicate_removal_indices_are_rejected() {
        let h = fruits();
        assert!(matches!(
            h.update(RowEdit::Remove {
                indices: vec![1, 1]
            })
            .unwrap_err(),
            Error::Index(IndexError::DuplicateIndex { index: 1 })
        ));
    }

    #[test]
    fn undifferentiated_grows_and_shrinks() {
        let h = CategoricalHeader::undifferentiated("reps", 3);
        let grown = h
            .update(RowEdit::New {
                rows: vec![Vec::new(), Vec::new()],
            })
            .unwrap();
        assert_eq!(grown.n_elem(), 5);
        let shrunk = grown
            .update(RowEdit::Remove {
                indices: vec![3, 4],
            })
            .unwrap();
        assert_eq!(shrunk.n_elem(), 3);
        assert!(h
            .update(RowEdit::New {
                rows: vec![vec![Value::Int(1)]],
            })
            .is_err());
    }

    #[test]
    fn add_column_turns_undifferentiated_into_values() {
        let h = CategoricalHeader::undifferentiated("trials", 2);
        let with_scores = h
            .add_column(
                ColumnSpec::Inferred("score".into()),
                vec![Value::from(0.3), Value::from(0.9)],
            )
            .unwrap();
        assert!(with_scores.is_with_values());
        assert_eq!(with_scores.n_columns(), 1);
        assert_eq!(with_scores.get_value(1, None).unwrap(), Value::from(0.9));

        assert!(h
            .add_column(ColumnSpec::Inferred("score".into()), vec![Value::from(0.3)])
            .is_err());
    }

    #[test]
    fn merge_rows_dedups_and_averages_colors() {
        let h = CategoricalHeader::from_rows(
            "cells",
            vec![
                ColumnSpec::Inferred("tag".into()),
                ColumnSpec::Inferred("tint".into()),
            ],
            vec![
                vec![Value::from("a"), Value::from(Rgb::new(0, 0, 0))],
                vec![Value::from("b"), Value::from(Rgb::new(255, 0, 0))],
                vec![Value::from("a"), Value::from(Rgb::new(0, 0, 0))],
            ],
        )
        .unwrap();
        let merged = h.merge_rows(&[0, 1, 2]).unwrap();
        assert_eq!(
            merged[0],
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
        // mean of the two distinct colors, not of the three rows
        assert_eq!(merged[1], Value::Color(Rgb::new(128, 0, 0)));

        assert!(h.merge_rows(&[]).is_err());
        assert!(h.merge_rows(&[5]).is_err());
    }
}

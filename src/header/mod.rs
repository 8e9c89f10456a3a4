//! Axis headers.
//!
//! Every axis of a container is described by exactly one [`Header`]: either
//! a [`MeasureHeader`](measure::MeasureHeader) (regular sampling, virtual
//! values) or a [`CategoricalHeader`](categorical::CategoricalHeader)
//! (arbitrary collection, with or without per-element feature columns). The
//! variant set is closed and dispatched by exhaustive matching.

pub mod categorical;
pub mod measure;

use crate::descriptor::{DimensionDescriptor, UnitTable};
use crate::error::{Error, LabelMismatchError, StructuralError, UnsupportedFlagError};
use crate::value::Value;

use categorical::{CategoricalHeader, RowEdit};
use measure::MeasureHeader;

/// Reference to one header column, by position or by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Index(usize),
    Label(&'a str),
}

impl From<usize> for ColumnRef<'_> {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(label: &'a str) -> Self {
        ColumnRef::Label(label)
    }
}

/// Discriminator for [`Header::check_header_update`], carrying the element
/// counts the guard needs per case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateFlag {
    /// Axis redefinition: no check at all.
    Chgdim,
    /// Whole-header replacement: the element count may change freely.
    All,
    /// `added` elements appended at the end.
    New { added: usize },
    /// `changed` existing elements overwritten in place.
    Chg { changed: usize },
    /// `removed` elements deleted.
    Remove { removed: usize },
    /// Elements reordered; count unchanged.
    Perm,
    /// Change then append.
    ChgNew { changed: usize, appended: usize },
    /// Change then remove.
    ChgRm { changed: usize, removed: usize },
}

/// Metadata for one axis of an N-dimensional container.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Header {
    Measure(MeasureHeader),
    Categorical(CategoricalHeader),
}

impl Header {
    pub fn label(&self) -> &str {
        match self {
            Header::Measure(h) => h.label(),
            Header::Categorical(h) => h.label(),
        }
    }

    pub fn n_elem(&self) -> usize {
        match self {
            Header::Measure(h) => h.n_elem(),
            Header::Categorical(h) => h.n_elem(),
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Header::Categorical(_))
    }

    pub fn is_measure(&self) -> bool {
        !self.is_categorical()
    }

    pub fn is_categorical_with_values(&self) -> bool {
        matches!(self, Header::Categorical(h) if h.is_with_values())
    }

    pub fn is_undifferentiated(&self) -> bool {
        matches!(self, Header::Categorical(h) if !h.is_with_values())
    }

    /// Descriptors of the feature columns: one for a measure header, none
    /// for an undifferentiated header.
    pub fn column_descriptors(&self) -> &[DimensionDescriptor] {
        match self {
            Header::Measure(h) => std::slice::from_ref(h.descriptor()),
            Header::Categorical(h) => h.column_descriptors(),
        }
    }

    pub fn n_columns(&self) -> usize {
        match self {
            Header::Measure(_) => 1,
            Header::Categorical(h) => h.n_columns(),
        }
    }

    /// Per-column unit name; `None` stands for "no unit".
    pub fn units(&self) -> Vec<Option<&str>> {
        self.column_descriptors()
            .iter()
            .map(DimensionDescriptor::unit)
            .collect()
    }

    /// Per-column conversion table; `None` stands for "no unit".
    pub fn all_units(&self) -> Vec<Option<&UnitTable>> {
        self.column_descriptors()
            .iter()
            .map(DimensionDescriptor::unit_table)
            .collect()
    }

    /// The value at `row` in the given column (default: first).
    pub fn get_value(&self, row: usize, column: Option<ColumnRef<'_>>) -> Result<Value, Error> {
        match self {
            Header::Measure(h) => h.get_value(row, column),
            Header::Categorical(h) => h.get_value(row, column),
        }
    }

    /// The display name of one element: its first-column value, or the
    /// position itself for an undifferentiated header.
    pub fn item_name(&self, row: usize) -> Result<Value, Error> {
        self.get_value(row, None)
    }

    /// Display names for several elements.
    pub fn item_names(&self, rows: &[usize]) -> Result<Vec<Value>, Error> {
        rows.iter().map(|&row| self.item_name(row)).collect()
    }

    /// Apply a row edit through the shared contract.
    ///
    /// Measure headers have no editable rows; the measure arm refuses every
    /// flag.
    pub fn updated(&self, edit: RowEdit) -> Result<Header, Error> {
        match self {
            Header::Measure(_) => Err(UnsupportedFlagError::RowEditOnMeasure {
                flag: edit.name(),
            }
            .into()),
            Header::Categorical(h) => h.update(edit).map(Header::Categorical),
        }
    }

    /// Guard invoked before committing an axis edit: does `new_header`
    /// legally replace this header under `flag`?
    ///
    /// `Chgdim` redefines the axis and passes unconditionally. Every other
    /// flag preserves the header kind, the label and the existing column
    /// labels (as a prefix of the new ones), and constrains the element
    /// count delta. Measure headers additionally demand identity for
    /// content edits and unchanged sampling for append/remove edits.
    pub fn check_header_update(&self, flag: UpdateFlag, new_header: &Header) -> Result<(), Error> {
        if flag == UpdateFlag::Chgdim {
            return Ok(());
        }
        if self.is_categorical() != new_header.is_categorical() {
            return Err(StructuralError::KindChanged.into());
        }
        if self.label() != new_header.label() {
            return Err(LabelMismatchError::HeaderLabel {
                expected: self.label().to_owned(),
                got: new_header.label().to_owned(),
            }
            .into());
        }
        let old_columns = self.column_descriptors();
        let new_columns = new_header.column_descriptors();
        if new_columns.len() < old_columns.len() {
            return Err(LabelMismatchError::ColumnsDropped {
                expected: old_columns.len(),
                got: new_columns.len(),
            }
            .into());
        }
        for (index, (old, new)) in old_columns.iter().zip(new_columns).enumerate() {
            if old.label() != new.label() {
                return Err(LabelMismatchError::ColumnLabel {
                    index,
                    expected: old.label().to_owned(),
                    got: new.label().to_owned(),
                }
                .into());
            }
        }
        let expected = match flag {
            UpdateFlag::Chgdim => unreachable!("handled above"),
            UpdateFlag::All => None,
            UpdateFlag::New { added } => Some(self.n_elem() + added),
            UpdateFlag::Chg { .. } | UpdateFlag::Perm => Some(self.n_elem()),
            UpdateFlag::Remove { removed } => Some(checked_shrink(self.n_elem(), removed)?),
            UpdateFlag::ChgNew { appended, .. } => Some(self.n_elem() + appended),
            UpdateFlag::ChgRm { removed, .. } => Some(checked_shrink(self.n_elem(), removed)?),
        };
        if let Some(expected) = expected {
            if new_header.n_elem() != expected {
                return Err(StructuralError::ElementCountMismatch {
                    expected,
                    got: new_header.n_elem(),
                }
                .into());
            }
        }
        if let (Header::Measure(old), Header::Measure(new)) = (self, new_header) {
            match flag {
                UpdateFlag::Chg { .. } | UpdateFlag::Perm => {
                    if old != new {
                        return Err(StructuralError::MeasureContentEdit.into());
                    }
                }
                UpdateFlag::New { .. }
                | UpdateFlag::Remove { .. }
                | UpdateFlag::ChgNew { .. }
                | UpdateFlag::ChgRm { .. } => {
                    if !old.same_sampling(new) {
                        return Err(StructuralError::MeasureSamplingChanged.into());
                    }
                }
                UpdateFlag::All | UpdateFlag::Chgdim => {}
            }
        }
        Ok(())
    }
}

impl From<MeasureHeader> for Header {
    fn from(h: MeasureHeader) -> Self {
        Header::Measure(h)
    }
}

impl From<CategoricalHeader> for Header {
    fn from(h: CategoricalHeader) -> Self {
        Header::Categorical(h)
    }
}

fn checked_shrink(n_elem: usize, removed: usize) -> Result<usize, Error> {
    n_elem.checked_sub(removed).ok_or_else(|| {
        StructuralError::ElementCountMismatch {
            expected: n_elem,
            got: removed,
        }
        .into()
    })
}

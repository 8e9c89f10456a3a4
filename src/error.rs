//! Error types for header and container operations.
//!
//! Failures fall into five categories, each with its own enum. Every
//! operation validates its arguments completely before constructing any part
//! of its result, so a returned error guarantees the receiver is unchanged.

use crate::value::DimensionKind;

/// Malformed constructor arguments.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("label must not be empty")]
    EmptyLabel,

    #[error("only numeric dimensions can carry a unit (kind is {kind:?})")]
    UnitOnNonNumeric { kind: DimensionKind },

    #[error("a unit table needs at least one entry")]
    EmptyUnitTable,

    #[error("conversion coefficient for unit `{name}` is not a finite number")]
    NonFiniteCoefficient { name: String },

    #[error("no unit with coefficient 1.0 to act as the reference")]
    NoReferenceUnit,

    #[error("more than one unit has coefficient 1.0")]
    MultipleReferenceUnits,

    #[error("unknown unit `{name}`")]
    UnknownUnit { name: String },

    #[error("`{name}` is not a recognized color name")]
    UnknownColorName { name: String },

    #[error("descriptor label `{descriptor}` does not match header label `{header}`")]
    DescriptorLabelMismatch { header: String, descriptor: String },

    #[error("a measure axis must be numeric, descriptor kind is {kind:?}")]
    NonNumericMeasure { kind: DimensionKind },

    #[error("expected {expected} column descriptors, got {got}")]
    ColumnCountMismatch { expected: usize, got: usize },

    #[error("cell ({row}, {column}) has kind {found:?}, column is declared {expected:?}")]
    CellKindMismatch {
        row: usize,
        column: usize,
        expected: DimensionKind,
        found: DimensionKind,
    },

    #[error("no column labeled `{label}`")]
    UnknownColumn { label: String },

    #[error("at least one row index is required")]
    EmptySelection,
}

/// Header/data length or shape disagreement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralError {
    #[error("expected rank {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    #[error("axis {axis}: expected length {expected}, got {got}")]
    AxisLengthMismatch {
        axis: usize,
        expected: usize,
        got: usize,
    },

    #[error("old and new headers are not of the same kind")]
    KindChanged,

    #[error("expected {expected} elements, got {got}")]
    ElementCountMismatch { expected: usize, got: usize },

    #[error("row has {got} cells, table has {expected} columns")]
    RowLengthMismatch { expected: usize, got: usize },

    #[error("column has {got} rows, table has {expected}")]
    ColumnLengthMismatch { expected: usize, got: usize },

    #[error("expected {expected} replacement rows, got {got}")]
    RowCountMismatch { expected: usize, got: usize },

    #[error("a measure header's elements cannot be edited in place")]
    MeasureContentEdit,

    #[error("start, scale and unit of a measure header cannot change here")]
    MeasureSamplingChanged,

    #[error("axis {axis} is categorical with values; resizing it needs explicit row identities")]
    CategoricalResize { axis: usize },

    #[error("column structure (count, labels or units) changed")]
    ColumnStructureChanged,

    #[error("unit or conversion table changed")]
    UnitChanged,

    #[error("expected {expected} data slices, got {got}")]
    SliceCountMismatch { expected: usize, got: usize },

    #[error("expected {expected} headers, got {got}")]
    HeaderCountMismatch { expected: usize, got: usize },

    #[error("slice {index} has shape {got:?}, expected {expected:?}")]
    SliceShapeMismatch {
        index: usize,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}

/// Label not preserved by an update that must keep it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LabelMismatchError {
    #[error("header label must stay `{expected}`, got `{got}`")]
    HeaderLabel { expected: String, got: String },

    #[error("column {index} label must stay `{expected}`, got `{got}`")]
    ColumnLabel {
        index: usize,
        expected: String,
        got: String,
    },

    #[error("the {expected} existing column labels must be a prefix of the new header's {got}")]
    ColumnsDropped { expected: usize, got: usize },
}

/// Row, column or axis reference outside its valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndexError {
    #[error("row {row} outside [0, {n_elem})")]
    RowOutOfRange { row: usize, n_elem: usize },

    #[error("position {position} outside [0, {n_elem}) on axis {axis}")]
    PositionOutOfRange {
        axis: usize,
        position: usize,
        n_elem: usize,
    },

    #[error("column {column} outside [0, {n_columns})")]
    ColumnOutOfRange { column: usize, n_columns: usize },

    #[error("axis {axis} outside [0, {rank})")]
    AxisOutOfRange { axis: usize, rank: usize },

    #[error("indices do not form a permutation of [0, {n_elem})")]
    NotAPermutation { n_elem: usize },

    #[error("index {index} appears more than once")]
    DuplicateIndex { index: usize },

    #[error("insert positions must be strictly ascending")]
    UnsortedPositions,
}

/// Edit flag handed to an operation that does not implement it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnsupportedFlagError {
    #[error("`{flag}` edits are not supported by a measure header")]
    RowEditOnMeasure { flag: &'static str },
}

/// Any failure raised by this crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    LabelMismatch(#[from] LabelMismatchError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    UnsupportedFlag(#[from] UnsupportedFlagError),
}

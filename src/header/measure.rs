//! Regularly sampled axis headers.
//!
//! A measure header describes an axis sampled at a constant interval:
//! element `i` sits at `start + i * scale`. Values are virtual — they are
//! computed on access and never materialized.

use crate::bank::UnitBank;
use crate::descriptor::{DimensionDescriptor, UnitTable};
use crate::error::{Error, IndexError, ValidationError};
use crate::value::{DimensionKind, Value};

use super::ColumnRef;

/// Header for an axis with regular sampling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureHeader {
    label: String,
    start: f64,
    scale: f64,
    n_elem: usize,
    descriptor: DimensionDescriptor,
}

impl MeasureHeader {
    /// A measure header with no unit.
    pub fn new(
        label: impl Into<String>,
        start: f64,
        n_elem: usize,
        scale: f64,
    ) -> Result<Self, Error> {
        let label = label.into();
        let descriptor = DimensionDescriptor::new(label.clone(), DimensionKind::Numeric)?;
        Ok(MeasureHeader {
            label,
            start,
            scale,
            n_elem,
            descriptor,
        })
    }

    /// A measure header with a single unit.
    pub fn with_unit(
        label: impl Into<String>,
        start: f64,
        n_elem: usize,
        scale: f64,
        unit: &str,
    ) -> Result<Self, Error> {
        MeasureHeader::with_units(label, start, n_elem, scale, UnitTable::single(unit))
    }

    /// A measure header with a full conversion table.
    pub fn with_units(
        label: impl Into<String>,
        start: f64,
        n_elem: usize,
        scale: f64,
        units: UnitTable,
    ) -> Result<Self, Error> {
        let label = label.into();
        let descriptor =
            DimensionDescriptor::with_units(label.clone(), DimensionKind::Numeric, Some(units))?;
        Ok(MeasureHeader {
            label,
            start,
            scale,
            n_elem,
            descriptor,
        })
    }

    /// A measure header around an existing descriptor.
    ///
    /// The descriptor's label must equal the header's label, and its kind
    /// must be numeric. This constructor and the unit-based ones are
    /// mutually exclusive routes to the same invariant.
    pub fn with_descriptor(
        label: impl Into<String>,
        start: f64,
        n_elem: usize,
        scale: f64,
        descriptor: DimensionDescriptor,
    ) -> Result<Self, Error> {
        let label = label.into();
        if descriptor.label() != label {
            return Err(ValidationError::DescriptorLabelMismatch {
                header: label,
                descriptor: descriptor.label().to_owned(),
            }
            .into());
        }
        if !descriptor.kind().is_numeric() {
            return Err(ValidationError::NonNumericMeasure {
                kind: descriptor.kind(),
            }
            .into());
        }
        Ok(MeasureHeader {
            label,
            start,
            scale,
            n_elem,
            descriptor,
        })
    }

    /// A measure header whose conversion table is looked up in a unit bank.
    ///
    /// When the bank does not know the unit, the header falls back to a
    /// single-entry table holding just `unit`.
    pub fn from_bank(
        label: impl Into<String>,
        start: f64,
        n_elem: usize,
        scale: f64,
        unit: &str,
        bank: &dyn UnitBank,
    ) -> Result<Self, Error> {
        let units = bank
            .lookup(unit)
            .unwrap_or_else(|| UnitTable::single(unit));
        MeasureHeader::with_units(label, start, n_elem, scale, units)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn n_elem(&self) -> usize {
        self.n_elem
    }

    pub fn descriptor(&self) -> &DimensionDescriptor {
        &self.descriptor
    }

    /// Name of the axis unit, if any.
    pub fn unit(&self) -> Option<&str> {
        self.descriptor.unit()
    }

    /// The virtual value at `row`: `start + row * scale`.
    pub fn value(&self, row: usize) -> Result<f64, Error> {
        if row >= self.n_elem {
            return Err(IndexError::RowOutOfRange {
                row,
                n_elem: self.n_elem,
            }
            .into());
        }
        Ok(self.start + row as f64 * self.scale)
    }

    /// Shared-contract accessor. The column must be absent or denote the
    /// single column (index 0 or the header's own label).
    pub fn get_value(&self, row: usize, column: Option<ColumnRef<'_>>) -> Result<Value, Error> {
        match column {
            None | Some(ColumnRef::Index(0)) => {}
            Some(ColumnRef::Index(index)) => {
                return Err(IndexError::ColumnOutOfRange {
                    column: index,
                    n_columns: 1,
                }
                .into());
            }
            Some(ColumnRef::Label(label)) => {
                if label != self.label {
                    return Err(ValidationError::UnknownColumn {
                        label: label.to_owned(),
                    }
                    .into());
                }
            }
        }
        Ok(Value::Float(self.value(row)?))
    }

    /// A new header inheriting every parameter not supplied.
    pub fn update(&self, start: Option<f64>, n_elem: Option<usize>, scale: Option<f64>) -> Self {
        MeasureHeader {
            label: self.label.clone(),
            start: start.unwrap_or(self.start),
            scale: scale.unwrap_or(self.scale),
            n_elem: n_elem.unwrap_or(self.n_elem),
            descriptor: self.descriptor.clone(),
        }
    }

    /// True when both headers sample the same line: label, start, scale and
    /// descriptor agree. The element count is deliberately not compared.
    pub(crate) fn same_sampling(&self, other: &MeasureHeader) -> bool {
        self.label == other.label
            && self.start == other.start
            && self.scale == other.scale
            && self.descriptor == other.descriptor
    }
}

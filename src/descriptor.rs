//! Dimension descriptors: label, type tag and unit bookkeeping.
//!
//! A [`DimensionDescriptor`] describes one scalar field — a header column or
//! the cell values of the data array. Numeric descriptors may carry a
//! [`UnitTable`] listing interchangeable units and their conversion
//! coefficients relative to a reference unit.

use crate::error::{Error, ValidationError};
use crate::value::{DimensionKind, Value};

/// One unit and its coefficient relative to the table's reference unit.
///
/// A value of `x` in this unit equals `x * coefficient` reference units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitEntry {
    name: String,
    coefficient: f64,
}

impl UnitEntry {
    pub fn new(name: impl Into<String>, coefficient: f64) -> Self {
        UnitEntry {
            name: name.into(),
            coefficient,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }
}

/// An ordered unit-conversion table.
///
/// Invariants, checked at construction: at least one entry, every
/// coefficient finite, exactly one coefficient equal to 1.0 (the reference
/// unit). Entries are kept sorted ascending by coefficient.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTable {
    entries: Vec<UnitEntry>,
}

impl UnitTable {
    /// Validate and sort a list of unit entries.
    pub fn new(mut entries: Vec<UnitEntry>) -> Result<Self, Error> {
        if entries.is_empty() {
            return Err(ValidationError::EmptyUnitTable.into());
        }
        for entry in &entries {
            if !entry.coefficient.is_finite() {
                return Err(ValidationError::NonFiniteCoefficient {
                    name: entry.name.clone(),
                }
                .into());
            }
        }
        let references = entries.iter().filter(|e| e.coefficient == 1.0).count();
        if references == 0 {
            return Err(ValidationError::NoReferenceUnit.into());
        }
        if references > 1 {
            return Err(ValidationError::MultipleReferenceUnits.into());
        }
        entries.sort_by(|a, b| {
            a.coefficient
                .partial_cmp(&b.coefficient)
                .expect("coefficients are finite")
        });
        Ok(UnitTable { entries })
    }

    /// A table holding a single reference unit.
    pub fn single(name: impl Into<String>) -> Self {
        UnitTable {
            entries: vec![UnitEntry::new(name, 1.0)],
        }
    }

    /// Build a table from `(name, coefficient)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        UnitTable::new(
            pairs
                .into_iter()
                .map(|(name, coefficient)| UnitEntry::new(name, coefficient))
                .collect(),
        )
    }

    /// Entries in ascending coefficient order.
    pub fn entries(&self) -> &[UnitEntry] {
        &self.entries
    }

    /// The unit whose coefficient is 1.0.
    pub fn reference(&self) -> &UnitEntry {
        self.entries
            .iter()
            .find(|e| e.coefficient == 1.0)
            .expect("a unit table always holds one reference unit")
    }

    fn coefficient_of(&self, name: &str) -> Result<f64, Error> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.coefficient)
            .ok_or_else(|| {
                ValidationError::UnknownUnit {
                    name: name.to_owned(),
                }
                .into()
            })
    }

    /// Convert `value` expressed in unit `from` into unit `to`.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, Error> {
        let from_coefficient = self.coefficient_of(from)?;
        let to_coefficient = self.coefficient_of(to)?;
        Ok(value * from_coefficient / to_coefficient)
    }
}

/// Metadata for one scalar field: a label, a type tag and optional units.
///
/// Immutable once constructed, except for the one-way
/// [`widen_to_mixed`](DimensionDescriptor::widen_to_mixed) transition which
/// produces a new descriptor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionDescriptor {
    label: String,
    kind: DimensionKind,
    units: Option<UnitTable>,
}

impl DimensionDescriptor {
    /// A descriptor with no unit.
    pub fn new(label: impl Into<String>, kind: DimensionKind) -> Result<Self, Error> {
        DimensionDescriptor::with_units(label, kind, None)
    }

    /// A descriptor with an optional unit table.
    ///
    /// Units are only legal on numeric descriptors.
    pub fn with_units(
        label: impl Into<String>,
        kind: DimensionKind,
        units: Option<UnitTable>,
    ) -> Result<Self, Error> {
        let label = label.into();
        if label.is_empty() {
            return Err(ValidationError::EmptyLabel.into());
        }
        if units.is_some() && !kind.is_numeric() {
            return Err(ValidationError::UnitOnNonNumeric { kind }.into());
        }
        Ok(DimensionDescriptor { label, kind, units })
    }

    /// A numeric descriptor with a single unit.
    pub fn numeric_with_unit(label: impl Into<String>, unit: &str) -> Result<Self, Error> {
        DimensionDescriptor::with_units(label, DimensionKind::Numeric, Some(UnitTable::single(unit)))
    }

    /// Infer a descriptor from a column of values.
    ///
    /// One pass: the kind is that of the first value; the first disagreement
    /// widens it to `Mixed`. An empty column is `Mixed`. No unit is
    /// attached.
    pub fn infer_from_values(label: impl Into<String>, values: &[Value]) -> Result<Self, Error> {
        let kind = match values.split_first() {
            None => DimensionKind::Mixed,
            Some((first, rest)) => {
                let first_kind = first.kind();
                if rest.iter().all(|v| v.kind() == first_kind) {
                    first_kind
                } else {
                    DimensionKind::Mixed
                }
            }
        };
        DimensionDescriptor::new(label, kind)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> DimensionKind {
        self.kind
    }

    /// Name of the current (reference) unit, if any.
    pub fn unit(&self) -> Option<&str> {
        self.units.as_ref().map(|t| t.reference().name())
    }

    pub fn unit_table(&self) -> Option<&UnitTable> {
        self.units.as_ref()
    }

    /// The one-way widening transition: same label, kind `Mixed`, unit
    /// cleared. Idempotent.
    pub fn widen_to_mixed(&self) -> Self {
        DimensionDescriptor {
            label: self.label.clone(),
            kind: DimensionKind::Mixed,
            units: None,
        }
    }

    /// Whether a value is admissible under this descriptor's kind.
    pub fn accepts(&self, value: &Value) -> bool {
        self.kind == DimensionKind::Mixed || value.kind() == self.kind
    }
}

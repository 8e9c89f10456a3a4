//! Lookup of well-known unit conversion tables.
//!
//! The bank itself lives outside this crate; consumers hand an
//! implementation to [`MeasureHeader::from_bank`](crate::header::measure::MeasureHeader::from_bank).

use crate::descriptor::UnitTable;

/// Source of predefined conversion tables, keyed by unit name.
pub trait UnitBank {
    /// The conversion table that contains `unit`, if the bank knows one.
    fn lookup(&self, unit: &str) -> Option<UnitTable>;
}

/// The reference bank: knows no units.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyBank;

impl UnitBank for EmptyBank {
    fn lookup(&self, _unit: &str) -> Option<UnitTable> {
        None
    }
}

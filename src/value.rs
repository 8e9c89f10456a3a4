//! Cell values and their type classification.
//!
//! Header tables store heterogeneous cells. [`Value`] is the closed set of
//! cell shapes, and [`Value::kind`] is the total classification used for
//! descriptor inference: every value maps to exactly one [`DimensionKind`].

use crate::error::{Error, ValidationError};

/// Logical type of one scalar field.
///
/// `Mixed` is the top of the lattice: a descriptor widened to `Mixed` accepts
/// every value and never narrows again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimensionKind {
    /// Integer, float or complex scalars.
    #[default]
    Numeric,
    /// Boolean flags.
    Logical,
    /// Free text.
    Text,
    /// RGB color values.
    Color,
    /// Anything, including aggregates; the widened catch-all.
    Mixed,
}

impl DimensionKind {
    /// Default cell content for a column of this kind.
    pub fn default_value(self) -> Value {
        match self {
            DimensionKind::Numeric => Value::Int(0),
            DimensionKind::Logical => Value::Logical(false),
            DimensionKind::Text => Value::Text(String::new()),
            DimensionKind::Color => Value::Color(Rgb::SENTINEL),
            DimensionKind::Mixed => Value::Empty,
        }
    }

    /// Returns true if this kind may carry a unit.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, DimensionKind::Numeric)
    }
}

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const PURPLE: Rgb = Rgb::new(255, 255, 0);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);

    /// Default color for cells with no explicit value. Stands out against
    /// common plot backgrounds.
    pub const SENTINEL: Rgb = Rgb::new(0, 149, 182);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Resolve a predefined color name.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "black" => Ok(Rgb::BLACK),
            "white" => Ok(Rgb::WHITE),
            "red" => Ok(Rgb::RED),
            "green" => Ok(Rgb::GREEN),
            "blue" => Ok(Rgb::BLUE),
            "purple" => Ok(Rgb::PURPLE),
            "cyan" => Ok(Rgb::CYAN),
            "magenta" => Ok(Rgb::MAGENTA),
            _ => Err(ValidationError::UnknownColorName {
                name: name.to_owned(),
            }
            .into()),
        }
    }

    /// Channel-wise arithmetic mean of a non-empty set of colors.
    pub fn mean(colors: &[Rgb]) -> Option<Rgb> {
        if colors.is_empty() {
            return None;
        }
        let n = colors.len() as f64;
        let sum = colors.iter().fold((0u32, 0u32, 0u32), |acc, c| {
            (acc.0 + c.r as u32, acc.1 + c.g as u32, acc.2 + c.b as u32)
        });
        Some(Rgb::new(
            (sum.0 as f64 / n).round() as u8,
            (sum.1 as f64 / n).round() as u8,
            (sum.2 as f64 / n).round() as u8,
        ))
    }
}

/// One cell of a header table.
///
/// The variant set is closed on purpose: classification is a total match,
/// not runtime type introspection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Logical(bool),
    Int(i64),
    Float(f64),
    Complex { re: f64, im: f64 },
    Text(String),
    Color(Rgb),
    /// Aggregate of several values, e.g. the product of merging rows.
    List(Vec<Value>),
    /// Absent content.
    Empty,
}

impl Value {
    /// Total classification of this value.
    pub fn kind(&self) -> DimensionKind {
        match self {
            Value::Logical(_) => DimensionKind::Logical,
            Value::Text(_) => DimensionKind::Text,
            Value::Int(_) | Value::Float(_) | Value::Complex { .. } => DimensionKind::Numeric,
            Value::Color(_) => DimensionKind::Color,
            Value::List(_) | Value::Empty => DimensionKind::Mixed,
        }
    }

    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Value {
        Value::Text(s.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Logical(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Rgb> for Value {
    fn from(v: Rgb) -> Self {
        Value::Color(v)
    }
}

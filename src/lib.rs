//! dimdata: N-dimensional data with descriptive axis headers.
//!
//! An [`Xdata`] couples a dense N-dimensional array with one [`Header`] per
//! axis, so that every dimension carries a label, a type and optional unit
//! conversions instead of being an anonymous index. The container's update
//! protocol keeps array shape and header element counts consistent through
//! every structural edit — append, removal, permutation, in-place change,
//! and whole-axis redefinition — with all-or-nothing validation.
//!
//! Everything is a value type: mutating operations return a new snapshot
//! and never touch the one they were called on.
//!
//! # Example
//!
//! ```
//! use dimdata::{CategoricalHeader, Header, MeasureHeader, Xdata};
//! use ndarray::{ArrayD, IxDyn};
//!
//! // 4 time points x 2 trials
//! let data = ArrayD::zeros(IxDyn(&[4, 2]));
//! let headers = vec![
//!     Header::from(MeasureHeader::with_unit("t", 0.0, 4, 0.5, "s").unwrap()),
//!     Header::from(CategoricalHeader::undifferentiated("trials", 2)),
//! ];
//! let x = Xdata::new("response", data, headers, None).unwrap();
//!
//! assert_eq!(x.shape(), &[4, 2]);
//! assert_eq!(x.header(0).unwrap().get_value(3, None).unwrap(),
//!            dimdata::Value::Float(1.5));
//! ```

pub mod bank;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod header;
pub mod table;
pub mod value;

pub use bank::{EmptyBank, UnitBank};
pub use container::{AxisEdit, DimChange, Xdata};
pub use descriptor::{DimensionDescriptor, UnitEntry, UnitTable};
pub use error::{
    Error, IndexError, LabelMismatchError, StructuralError, UnsupportedFlagError, ValidationError,
};
pub use header::categorical::{CategoricalHeader, ColumnSpec, RowEdit};
pub use header::measure::MeasureHeader;
pub use header::{ColumnRef, Header, UpdateFlag};
pub use table::Table;
pub use value::{DimensionKind, Rgb, Value};

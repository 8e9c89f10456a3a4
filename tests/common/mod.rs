//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use dimdata::{CategoricalHeader, ColumnSpec, Header, MeasureHeader, Value, Xdata};
use ndarray::{ArrayD, IxDyn};

/// Dense array with sequential cell values, for position-sensitive checks.
pub fn numbered(shape: &[usize]) -> ArrayD<f64> {
    let len: usize = shape.iter().product();
    ArrayD::from_shape_vec(IxDyn(shape), (0..len).map(|v| v as f64).collect())
        .expect("shape and length agree")
}

/// The children example: per-element name, age and gender features.
pub fn children_header() -> CategoricalHeader {
    CategoricalHeader::from_rows(
        "child",
        vec![
            ColumnSpec::Inferred("name".into()),
            ColumnSpec::Inferred("age".into()),
            ColumnSpec::Inferred("gender".into()),
        ],
        vec![
            vec![
                Value::from("Emily"),
                Value::from(8i64),
                Value::from("female"),
            ],
            vec![Value::from("Paul"), Value::from(7i64), Value::from("male")],
            vec![
                Value::from("Helen"),
                Value::from(9i64),
                Value::from("female"),
            ],
        ],
    )
    .expect("well-formed fixture")
}

/// 4 time points x 3 children x 2 repetitions.
pub fn throws() -> Xdata {
    let headers = vec![
        Header::from(MeasureHeader::with_unit("t", 0.0, 4, 2.0, "ms").expect("valid header")),
        Header::from(children_header()),
        Header::from(CategoricalHeader::undifferentiated("repetitions", 2)),
    ];
    Xdata::new("height", numbered(&[4, 3, 2]), headers, None).expect("well-formed fixture")
}

/// The permutation sending each `order[i]` back to position `i`.
pub fn invert_permutation(order: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; order.len()];
    for (i, &o) in order.iter().enumerate() {
        inverse[o] = i;
    }
    inverse
}

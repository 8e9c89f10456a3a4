//! The container's transactional update protocol.
//!
//! Drives the axis state machine end to end against hand-computed arrays:
//! data and headers must move together, and every failed transition must
//! leave the original snapshot untouched (trivially so — snapshots are
//! values — but also produce the right error before any work is visible).

mod common;

use approx::assert_relative_eq;
use common::{children_header, invert_permutation, numbered, throws};
use dimdata::{
    AxisEdit, CategoricalHeader, DimChange, Error, Header, IndexError, MeasureHeader, RowEdit,
    StructuralError, Value,
};
use ndarray::{ArrayD, Axis, IxDyn};
use rstest::rstest;

fn lily() -> Vec<Value> {
    vec![Value::from("Lily"), Value::from(7i64), Value::from("female")]
}

#[test]
fn append_extends_axis_and_header_together() {
    let x = throws();
    let slice = numbered(&[4, 2]).mapv(|v| v + 100.0);
    let new_header = Header::from(
        children_header()
            .update(RowEdit::New { rows: vec![lily()] })
            .unwrap(),
    );

    let grown = x
        .update_axis(1, AxisEdit::New { slices: vec![slice.clone()] }, new_header)
        .unwrap();

    assert_eq!(grown.shape(), &[4, 4, 2]);
    assert_eq!(grown.n_elem(1).unwrap(), 4);
    assert_eq!(
        grown.header(1).unwrap().get_value(3, None).unwrap(),
        Value::from("Lily")
    );

    // pre-existing cells keep their coordinates
    for t in 0..4 {
        for c in 0..3 {
            for r in 0..2 {
                assert_relative_eq!(grown.data()[[t, c, r]], x.data()[[t, c, r]]);
            }
        }
    }
    // the appended slice reads back exactly
    for t in 0..4 {
        for r in 0..2 {
            assert_relative_eq!(grown.data()[[t, 3, r]], slice[[t, r]]);
        }
    }
}

#[test]
fn append_on_a_measure_axis_keeps_sampling() {
    let x = throws();
    let slice = numbered(&[3, 2]).mapv(|v| v + 50.0);
    let header = match x.header(0).unwrap() {
        Header::Measure(h) => h.clone(),
        _ => unreachable!(),
    };

    let grown = x
        .update_axis(
            0,
            AxisEdit::New { slices: vec![slice.clone()] },
            Header::from(header.update(None, Some(5), None)),
        )
        .unwrap();
    assert_eq!(grown.shape(), &[5, 3, 2]);
    // the new sample sits at start + 4 * scale
    assert_eq!(
        grown.header(0).unwrap().get_value(4, None).unwrap(),
        Value::Float(8.0)
    );
    for c in 0..3 {
        for r in 0..2 {
            assert_relative_eq!(grown.data()[[4, c, r]], slice[[c, r]]);
        }
    }

    // shifting start during an append is rejected
    let err = x
        .update_axis(
            0,
            AxisEdit::New { slices: vec![slice] },
            Header::from(header.update(Some(1.0), Some(5), None)),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Structural(StructuralError::MeasureSamplingChanged)
    ));
}

#[test]
fn append_with_a_stale_header_count_is_rejected() {
    let x = throws();
    let slice = numbered(&[4, 2]);
    // header grew by two, data by one
    let new_header = Header::from(
        children_header()
            .update(RowEdit::New {
                rows: vec![lily(), lily()],
            })
            .unwrap(),
    );
    assert!(matches!(
        x.update_axis(1, AxisEdit::New { slices: vec![slice] }, new_header)
            .unwrap_err(),
        Error::Structural(StructuralError::ElementCountMismatch { .. })
    ));
}

#[test]
fn remove_deletes_slices_and_rows_in_step() {
    let x = throws();
    let new_header = Header::from(
        children_header()
            .update(RowEdit::Remove { indices: vec![1] })
            .unwrap(),
    );
    let shrunk = x
        .update_axis(1, AxisEdit::Remove { indices: vec![1] }, new_header)
        .unwrap();

    assert_eq!(shrunk.shape(), &[4, 2, 2]);
    assert_eq!(
        shrunk.header(1).unwrap().item_names(&[0, 1]).unwrap(),
        vec![Value::from("Emily"), Value::from("Helen")]
    );
    for t in 0..4 {
        for r in 0..2 {
            assert_relative_eq!(shrunk.data()[[t, 0, r]], x.data()[[t, 0, r]]);
            assert_relative_eq!(shrunk.data()[[t, 1, r]], x.data()[[t, 2, r]]);
        }
    }
}

#[rstest]
#[case(vec![2, 0, 1])]
#[case(vec![1, 0, 2])]
#[case(vec![2, 1, 0])]
fn perm_moves_data_and_rows_together_and_round_trips(#[case] order: Vec<usize>) {
    let x = throws();
    let permuted_header = Header::from(
        children_header()
            .update(RowEdit::Perm { order: order.clone() })
            .unwrap(),
    );
    let permuted = x
        .update_axis(1, AxisEdit::Perm { order: order.clone() }, permuted_header)
        .unwrap();

    for (new_child, &old_child) in order.iter().enumerate() {
        assert_eq!(
            permuted.header(1).unwrap().item_name(new_child).unwrap(),
            x.header(1).unwrap().item_name(old_child).unwrap()
        );
        for t in 0..4 {
            for r in 0..2 {
                assert_relative_eq!(
                    permuted.data()[[t, new_child, r]],
                    x.data()[[t, old_child, r]]
                );
            }
        }
    }

    let inverse = invert_permutation(&order);
    let inverse_header = Header::from(
        match permuted.header(1).unwrap() {
            Header::Categorical(h) => h.clone(),
            _ => unreachable!(),
        }
        .update(RowEdit::Perm { order: inverse.clone() })
        .unwrap(),
    );
    let back = permuted
        .update_axis(1, AxisEdit::Perm { order: inverse }, inverse_header)
        .unwrap();
    assert_eq!(back, x);
}

#[test]
fn perm_requires_a_true_permutation() {
    let x = throws();
    let header = x.header(1).unwrap().clone();
    assert!(matches!(
        x.update_axis(1, AxisEdit::Perm { order: vec![0, 0, 1] }, header)
            .unwrap_err(),
        Error::Index(IndexError::NotAPermutation { .. })
    ));
}

#[test]
fn chg_overwrites_selected_slices_only() {
    let x = throws();
    let replacement = ArrayD::from_elem(IxDyn(&[4, 2]), 99.0);
    let header = x.header(1).unwrap().clone();
    let changed = x
        .update_axis(
            1,
            AxisEdit::Chg {
                indices: vec![1],
                slices: vec![replacement],
            },
            header,
        )
        .unwrap();

    for t in 0..4 {
        for r in 0..2 {
            assert_relative_eq!(changed.data()[[t, 1, r]], 99.0);
            assert_relative_eq!(changed.data()[[t, 0, r]], x.data()[[t, 0, r]]);
            assert_relative_eq!(changed.data()[[t, 2, r]], x.data()[[t, 2, r]]);
        }
    }
    assert_eq!(changed.header(1), x.header(1));
}

#[test]
fn chg_rm_applies_changes_before_removals_in_original_numbering() {
    let x = throws();
    let new_header = Header::from(
        children_header()
            .update(RowEdit::ChgRm {
                changed_indices: vec![0],
                changed: vec![vec![
                    Value::from("Emma"),
                    Value::from(8i64),
                    Value::from("female"),
                ]],
                removed: vec![2],
            })
            .unwrap(),
    );
    let replacement = ArrayD::from_elem(IxDyn(&[4, 2]), 7.0);
    let edited = x
        .update_axis(
            1,
            AxisEdit::ChgRm {
                changed_indices: vec![0],
                changed: vec![replacement],
                removed: vec![2],
            },
            new_header,
        )
        .unwrap();

    assert_eq!(edited.shape(), &[4, 2, 2]);
    assert_eq!(
        edited.header(1).unwrap().item_names(&[0, 1]).unwrap(),
        vec![Value::from("Emma"), Value::from("Paul")]
    );
    for t in 0..4 {
        for r in 0..2 {
            assert_relative_eq!(edited.data()[[t, 0, r]], 7.0);
            assert_relative_eq!(edited.data()[[t, 1, r]], x.data()[[t, 1, r]]);
        }
    }
}

#[test]
fn chg_new_changes_then_appends_slices() {
    let x = throws();
    let new_header = Header::from(
        children_header()
            .update(RowEdit::ChgNew {
                indices: vec![2],
                changed: vec![vec![
                    Value::from("Helen"),
                    Value::from(10i64),
                    Value::from("female"),
                ]],
                appended: vec![lily()],
            })
            .unwrap(),
    );
    let changed_slice = ArrayD::from_elem(IxDyn(&[4, 2]), -1.0);
    let appended_slice = numbered(&[4, 2]).mapv(|v| v + 200.0);
    let edited = x
        .update_axis(
            1,
            AxisEdit::ChgNew {
                indices: vec![2],
                changed: vec![changed_slice],
                appended: vec![appended_slice.clone()],
            },
            new_header,
        )
        .unwrap();

    assert_eq!(edited.shape(), &[4, 4, 2]);
    for t in 0..4 {
        for r in 0..2 {
            assert_relative_eq!(edited.data()[[t, 2, r]], -1.0);
            assert_relative_eq!(edited.data()[[t, 3, r]], appended_slice[[t, r]]);
        }
    }
    assert_eq!(
        edited.header(1).unwrap().get_value(2, Some("age".into())).unwrap(),
        Value::from(10i64)
    );
}

#[test]
fn all_replaces_one_axis_wholesale() {
    let x = throws();
    let two_children = children_header()
        .update(RowEdit::All {
            rows: vec![
                vec![Value::from("Emily"), Value::from(8i64), Value::from("female")],
                vec![Value::from("Paul"), Value::from(7i64), Value::from("male")],
            ],
        })
        .unwrap();
    let data = numbered(&[4, 2, 2]);
    let replaced = x
        .update_axis(
            1,
            AxisEdit::All { data: data.clone() },
            Header::from(two_children),
        )
        .unwrap();
    assert_eq!(replaced.shape(), &[4, 2, 2]);
    assert_eq!(replaced.data(), &data);

    // any other axis changing length fails the whole call
    let bad = numbered(&[3, 2, 2]);
    let two_children = match replaced.header(1).unwrap() {
        Header::Categorical(h) => h.clone(),
        _ => unreachable!(),
    };
    assert!(matches!(
        x.update_axis(1, AxisEdit::All { data: bad }, Header::from(two_children))
            .unwrap_err(),
        Error::Structural(StructuralError::AxisLengthMismatch { axis: 0, .. })
    ));
}

#[test]
fn all_with_an_identical_header_is_a_pure_overwrite() {
    let x = throws();
    let same_header = x.header(1).unwrap().clone();
    let data = numbered(&[4, 3, 2]).mapv(|v| v * 10.0);
    let overwritten = x
        .update_axis(1, AxisEdit::All { data: data.clone() }, same_header.clone())
        .unwrap();
    assert_eq!(overwritten.data(), &data);
    assert_eq!(overwritten.headers(), x.headers());

    // with an identical header the shape must not move at all
    assert!(x
        .update_axis(
            1,
            AxisEdit::All {
                data: numbered(&[4, 2, 2]),
            },
            same_header,
        )
        .is_err());
}

#[test]
fn slice_shapes_are_validated_against_unedited_axes() {
    let x = throws();
    let wrong = numbered(&[3, 2]);
    let new_header = Header::from(
        children_header()
            .update(RowEdit::New { rows: vec![lily()] })
            .unwrap(),
    );
    assert!(matches!(
        x.update_axis(1, AxisEdit::New { slices: vec![wrong] }, new_header)
            .unwrap_err(),
        Error::Structural(StructuralError::SliceShapeMismatch { index: 0, .. })
    ));

    let header = x.header(1).unwrap().clone();
    assert!(matches!(
        x.update_axis(
            1,
            AxisEdit::Chg {
                indices: vec![5],
                slices: vec![numbered(&[4, 2])],
            },
            header,
        )
        .unwrap_err(),
        Error::Index(IndexError::PositionOutOfRange { axis: 1, position: 5, .. })
    ));
}

#[test]
fn replace_data_resizes_anonymous_axes_only() {
    let x = throws();

    // time (measure) and repetitions (undifferentiated) stretch freely
    let grown = x.replace_data(numbered(&[6, 3, 4])).unwrap();
    assert_eq!(grown.n_elem(0).unwrap(), 6);
    assert_eq!(grown.n_elem(2).unwrap(), 4);
    assert_eq!(grown.header(1), x.header(1));

    // the children axis has row identities; any resize is structural
    for shape in [[4, 4, 2], [4, 2, 2]] {
        assert!(matches!(
            x.replace_data(numbered(&shape)).unwrap_err(),
            Error::Structural(StructuralError::CategoricalResize { axis: 1 })
        ));
    }
}

#[test]
fn permdim_transposes_data_and_headers_together() {
    let x = throws();
    let permuted = x
        .reshape_axes(DimChange::Permdim {
            order: vec![2, 0, 1],
        })
        .unwrap();
    assert_eq!(permuted.shape(), &[2, 4, 3]);
    assert_eq!(permuted.header(0).unwrap().label(), "repetitions");
    assert_eq!(permuted.header(1).unwrap().label(), "t");
    assert_eq!(permuted.header(2).unwrap().label(), "child");
    for t in 0..4 {
        for c in 0..3 {
            for r in 0..2 {
                assert_relative_eq!(permuted.data()[[r, t, c]], x.data()[[t, c, r]]);
            }
        }
    }
}

#[test]
fn rmdim_drops_axes_and_their_headers() {
    let x = throws();
    let data = x.data().index_axis(Axis(1), 0).to_owned();
    let flattened = x
        .reshape_axes(DimChange::Rmdim {
            axes: vec![1],
            data,
        })
        .unwrap();
    assert_eq!(flattened.shape(), &[4, 2]);
    assert_eq!(flattened.n_dimensions(), 2);
    assert_eq!(flattened.header(1).unwrap().label(), "repetitions");
}

#[test]
fn insertdim_adds_axes_at_their_final_positions() {
    let x = throws();
    let data = x.data().clone().insert_axis(Axis(1));
    let inserted = x
        .reshape_axes(DimChange::Insertdim {
            positions: vec![1],
            data,
            headers: vec![Header::from(CategoricalHeader::undifferentiated("slice", 1))],
        })
        .unwrap();
    assert_eq!(inserted.shape(), &[4, 1, 3, 2]);
    assert_eq!(inserted.header(1).unwrap().label(), "slice");
    assert_eq!(inserted.header(2).unwrap().label(), "child");

    // one header per position, lengths must match the data
    assert!(x
        .reshape_axes(DimChange::Insertdim {
            positions: vec![1],
            data: x.data().clone().insert_axis(Axis(1)),
            headers: vec![Header::from(CategoricalHeader::undifferentiated("slice", 2))],
        })
        .is_err());
}

#[test]
fn chgdim_redefines_axis_meaning_without_preservation() {
    let x = throws();
    // the children axis becomes a 5-point depth axis
    let depth = Header::from(MeasureHeader::with_unit("depth", 0.0, 5, 0.1, "m").unwrap());
    let redefined = x
        .reshape_axes(DimChange::Chgdim {
            axes: vec![1],
            data: numbered(&[4, 5, 2]),
            headers: vec![depth],
        })
        .unwrap();
    assert_eq!(redefined.shape(), &[4, 5, 2]);
    assert_eq!(redefined.header(1).unwrap().label(), "depth");
    assert!(redefined.header(1).unwrap().is_measure());

    // untouched axes must keep their length
    assert!(matches!(
        x.reshape_axes(DimChange::Chgdim {
            axes: vec![1],
            data: numbered(&[3, 3, 2]),
            headers: vec![Header::from(CategoricalHeader::undifferentiated("k", 3))],
        })
        .unwrap_err(),
        Error::Structural(StructuralError::AxisLengthMismatch { .. })
    ));
}

#[test]
fn global_swaps_everything_but_identity() {
    let x = throws();
    let replaced = x
        .reshape_axes(DimChange::Global {
            data: numbered(&[3, 3]),
            headers: vec![
                Header::from(MeasureHeader::new("u", 0.0, 3, 1.0).unwrap()),
                Header::from(MeasureHeader::new("v", 0.0, 3, 1.0).unwrap()),
            ],
        })
        .unwrap();
    assert_eq!(replaced.name(), "height");
    assert_eq!(replaced.shape(), &[3, 3]);
    assert_eq!(replaced.n_dimensions(), 2);
}

#[test]
fn snapshots_are_independent_values() {
    let x = throws();
    let header = Header::from(
        children_header()
            .update(RowEdit::Remove { indices: vec![0] })
            .unwrap(),
    );
    let shrunk = x
        .update_axis(1, AxisEdit::Remove { indices: vec![0] }, header)
        .unwrap();

    // the original still sees every child and every cell
    assert_eq!(x.shape(), &[4, 3, 2]);
    assert_eq!(
        x.header(1).unwrap().item_name(0).unwrap(),
        Value::from("Emily")
    );
    assert_eq!(shrunk.shape(), &[4, 2, 2]);
    assert_relative_eq!(x.data()[[0, 0, 0]], 0.0);
}

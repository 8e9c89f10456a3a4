//! The N-dimensional container and its transactional update protocol.
//!
//! An [`Xdata`] owns a dense array, one [`Header`] per axis and a
//! [`DimensionDescriptor`] for the cell values. Its invariant —
//! `headers[i].n_elem() == data.shape()[i]` for every axis — is maintained
//! by a family of pure transitions: each operation validates its arguments
//! completely against the current snapshot, then builds and returns a whole
//! new instance. A failed call leaves nothing half-updated behind.

use ndarray::{concatenate, ArrayD, ArrayViewD, Axis, IxDyn};

use crate::descriptor::{DimensionDescriptor, UnitTable};
use crate::error::{Error, IndexError, StructuralError};
use crate::header::categorical::{validate_permutation, RowEdit};
use crate::header::{Header, UpdateFlag};
use crate::value::DimensionKind;

/// A structural edit along one axis: the data payload matching one
/// [`RowEdit`]-shaped change of that axis's header.
///
/// Every slice is a rank `N-1` array shaped like a single cut of the data
/// perpendicular to the edited axis.
#[derive(Debug, Clone)]
pub enum AxisEdit {
    /// Replace the data wholesale; only the edited axis may change length.
    /// Degenerates to a pure data overwrite when the new header equals the
    /// current one.
    All { data: ArrayD<f64> },
    /// Overwrite the slices at `indices`, one-to-one with `slices`.
    Chg {
        indices: Vec<usize>,
        slices: Vec<ArrayD<f64>>,
    },
    /// Append slices at the end of the axis.
    New { slices: Vec<ArrayD<f64>> },
    /// Delete the positions at `indices`.
    Remove { indices: Vec<usize> },
    /// Reorder positions: new position `i` is old position `order[i]`.
    Perm { order: Vec<usize> },
    /// `Chg` then `New`.
    ChgNew {
        indices: Vec<usize>,
        changed: Vec<ArrayD<f64>>,
        appended: Vec<ArrayD<f64>>,
    },
    /// `Chg` then `Remove`; both index sets use the original numbering.
    ChgRm {
        changed_indices: Vec<usize>,
        changed: Vec<ArrayD<f64>>,
        removed: Vec<usize>,
    },
}

/// A change to the dimensional structure itself: what the axes *mean*.
#[derive(Debug, Clone)]
pub enum DimChange {
    /// Replace data and every header; name and cell descriptor are kept.
    Global {
        data: ArrayD<f64>,
        headers: Vec<Header>,
    },
    /// Redefine the headers of the named axes; the whole data array is
    /// replaced, so redefined axes may change length.
    Chgdim {
        axes: Vec<usize>,
        data: ArrayD<f64>,
        headers: Vec<Header>,
    },
    /// Insert whole axes. Positions are final axis numbers, strictly
    /// ascending, one header each; `data` is the full new array.
    Insertdim {
        positions: Vec<usize>,
        data: ArrayD<f64>,
        headers: Vec<Header>,
    },
    /// Remove whole axes; `data` is the full remaining array.
    Rmdim { axes: Vec<usize>, data: ArrayD<f64> },
    /// Reorder axes: new axis `i` is old axis `order[i]`. Data and headers
    /// move together; no new data is required.
    Permdim { order: Vec<usize> },
}

/// An N-dimensional dataset whose axes carry descriptive headers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Xdata {
    name: String,
    data: ArrayD<f64>,
    headers: Vec<Header>,
    cell_descriptor: DimensionDescriptor,
}

impl Xdata {
    /// Build a container from an array and one header per axis.
    ///
    /// `units` describes the cell values (e.g. the measured quantity).
    pub fn new(
        name: impl Into<String>,
        data: ArrayD<f64>,
        headers: Vec<Header>,
        units: Option<UnitTable>,
    ) -> Result<Self, Error> {
        let name = name.into();
        let cell_descriptor =
            DimensionDescriptor::with_units(name.clone(), DimensionKind::Numeric, units)?;
        check_headers_match(&data, &headers)?;
        Ok(Xdata {
            name,
            data,
            headers,
            cell_descriptor,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// The header of one axis.
    pub fn header(&self, axis: usize) -> Result<&Header, Error> {
        self.headers.get(axis).ok_or_else(|| {
            IndexError::AxisOutOfRange {
                axis,
                rank: self.n_dimensions(),
            }
            .into()
        })
    }

    /// Descriptor of the array's cell values.
    pub fn cell_descriptor(&self) -> &DimensionDescriptor {
        &self.cell_descriptor
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn n_dimensions(&self) -> usize {
        self.headers.len()
    }

    /// Number of elements along one axis.
    pub fn n_elem(&self, axis: usize) -> Result<usize, Error> {
        Ok(self.header(axis)?.n_elem())
    }

    /// Adopt a new array of the same rank, adjusting resizable headers.
    ///
    /// An axis whose length changes must be able to absorb anonymous
    /// elements: undifferentiated headers extend or shrink their implicit
    /// index, measure headers follow with their element count. A
    /// categorical-with-values axis cannot resize this way — the identity
    /// of the new rows would be ambiguous.
    pub fn replace_data(&self, new_data: ArrayD<f64>) -> Result<Self, Error> {
        if new_data.ndim() != self.n_dimensions() {
            return Err(StructuralError::RankMismatch {
                expected: self.n_dimensions(),
                got: new_data.ndim(),
            }
            .into());
        }
        let mut headers = Vec::with_capacity(self.headers.len());
        for (axis, header) in self.headers.iter().enumerate() {
            let old_len = header.n_elem();
            let new_len = new_data.shape()[axis];
            if new_len == old_len {
                headers.push(header.clone());
                continue;
            }
            match header {
                Header::Categorical(h) if h.is_with_values() => {
                    return Err(StructuralError::CategoricalResize { axis }.into());
                }
                Header::Categorical(h) => {
                    let edit = if new_len > old_len {
                        RowEdit::New {
                            rows: vec![Vec::new(); new_len - old_len],
                        }
                    } else {
                        RowEdit::Remove {
                            indices: (new_len..old_len).collect(),
                        }
                    };
                    headers.push(Header::Categorical(h.update(edit)?));
                }
                Header::Measure(h) => {
                    headers.push(Header::Measure(h.update(None, Some(new_len), None)));
                }
            }
        }
        Ok(Xdata {
            name: self.name.clone(),
            data: new_data,
            headers,
            cell_descriptor: self.cell_descriptor.clone(),
        })
    }

    /// Apply a structural edit along `axis`, committing data and header
    /// together.
    ///
    /// `new_header` is the already-updated header for the axis (typically
    /// produced by the matching header update); it is checked against the
    /// current one before anything is built. The row content of an incoming
    /// categorical header is trusted — filters construct it via the
    /// matching header update.
    pub fn update_axis(
        &self,
        axis: usize,
        edit: AxisEdit,
        new_header: Header,
    ) -> Result<Self, Error> {
        let old_header = self.header(axis)?;
        match edit {
            AxisEdit::All { data } => {
                if *old_header == new_header {
                    // Pure data overwrite: nothing about the axis changes.
                    if data.shape() != self.data.shape() {
                        return Err(first_shape_mismatch(self.data.shape(), data.shape()));
                    }
                    return Ok(self.with(data, axis, new_header));
                }
                old_header.check_header_update(UpdateFlag::All, &new_header)?;
                if let (Header::Measure(old), Header::Measure(new)) = (old_header, &new_header) {
                    if old.descriptor() != new.descriptor() {
                        return Err(StructuralError::UnitChanged.into());
                    }
                }
                if data.ndim() != self.n_dimensions() {
                    return Err(StructuralError::RankMismatch {
                        expected: self.n_dimensions(),
                        got: data.ndim(),
                    }
                    .into());
                }
                for ax in 0..self.n_dimensions() {
                    let expected = if ax == axis {
                        new_header.n_elem()
                    } else {
                        self.shape()[ax]
                    };
                    if data.shape()[ax] != expected {
                        return Err(StructuralError::AxisLengthMismatch {
                            axis: ax,
                            expected,
                            got: data.shape()[ax],
                        }
                        .into());
                    }
                }
                Ok(self.with(data, axis, new_header))
            }
            AxisEdit::Chg { indices, slices } => {
                old_header.check_header_update(
                    UpdateFlag::Chg {
                        changed: indices.len(),
                    },
                    &new_header,
                )?;
                self.check_frozen_structure(old_header, &new_header, true)?;
                self.check_positions(axis, &indices)?;
                self.check_slices(axis, &slices, indices.len())?;
                let mut data = self.data.clone();
                for (&index, slice) in indices.iter().zip(&slices) {
                    data.index_axis_mut(Axis(axis), index).assign(slice);
                }
                Ok(self.with(data, axis, new_header))
            }
            AxisEdit::New { slices } => {
                old_header.check_header_update(
                    UpdateFlag::New {
                        added: slices.len(),
                    },
                    &new_header,
                )?;
                self.check_frozen_structure(old_header, &new_header, true)?;
                self.check_slices(axis, &slices, slices.len())?;
                let data = append_slices(self.data.clone(), axis, &slices);
                Ok(self.with(data, axis, new_header))
            }
            AxisEdit::Remove { indices } => {
                old_header.check_header_update(
                    UpdateFlag::Remove {
                        removed: indices.len(),
                    },
                    &new_header,
                )?;
                self.check_frozen_structure(old_header, &new_header, false)?;
                self.check_positions(axis, &indices)?;
                check_no_duplicates(&indices)?;
                let kept: Vec<usize> = (0..self.shape()[axis])
                    .filter(|i| !indices.contains(i))
                    .collect();
                let data = self.data.select(Axis(axis), &kept);
                Ok(self.with(data, axis, new_header))
            }
            AxisEdit::Perm { order } => {
                old_header.check_header_update(UpdateFlag::Perm, &new_header)?;
                self.check_frozen_structure(old_header, &new_header, false)?;
                validate_permutation(&order, self.shape()[axis])?;
                let data = self.data.select(Axis(axis), &order);
                Ok(self.with(data, axis, new_header))
            }
            AxisEdit::ChgNew {
                indices,
                changed,
                appended,
            } => {
                old_header.check_header_update(
                    UpdateFlag::ChgNew {
                        changed: indices.len(),
                        appended: appended.len(),
                    },
                    &new_header,
                )?;
                self.check_frozen_structure(old_header, &new_header, true)?;
                self.check_positions(axis, &indices)?;
                self.check_slices(axis, &changed, indices.len())?;
                self.check_slices(axis, &appended, appended.len())?;
                let mut data = self.data.clone();
                for (&index, slice) in indices.iter().zip(&changed) {
                    data.index_axis_mut(Axis(axis), index).assign(slice);
                }
                let data = append_slices(data, axis, &appended);
                Ok(self.with(data, axis, new_header))
            }
            AxisEdit::ChgRm {
                changed_indices,
                changed,
                removed,
            } => {
                old_header.check_header_update(
                    UpdateFlag::ChgRm {
                        changed: changed_indices.len(),
                        removed: removed.len(),
                    },
                    &new_header,
                )?;
                self.check_frozen_structure(old_header, &new_header, true)?;
                self.check_positions(axis, &changed_indices)?;
                self.check_positions(axis, &removed)?;
                check_no_duplicates(&removed)?;
                self.check_slices(axis, &changed, changed_indices.len())?;
                let mut data = self.data.clone();
                for (&index, slice) in changed_indices.iter().zip(&changed) {
                    data.index_axis_mut(Axis(axis), index).assign(slice);
                }
                let kept: Vec<usize> = (0..self.shape()[axis])
                    .filter(|i| !removed.contains(i))
                    .collect();
                let data = data.select(Axis(axis), &kept);
                Ok(self.with(data, axis, new_header))
            }
        }
    }

    /// Redefine what the axes mean: replace, insert, remove or permute
    /// whole dimensions.
    pub fn reshape_axes(&self, change: DimChange) -> Result<Self, Error> {
        match change {
            DimChange::Global { data, headers } => {
                check_headers_match(&data, &headers)?;
                Ok(Xdata {
                    name: self.name.clone(),
                    data,
                    headers,
                    cell_descriptor: self.cell_descriptor.clone(),
                })
            }
            DimChange::Chgdim {
                axes,
                data,
                headers,
            } => {
                if axes.len() != headers.len() {
                    return Err(StructuralError::HeaderCountMismatch {
                        expected: axes.len(),
                        got: headers.len(),
                    }
                    .into());
                }
                check_no_duplicates(&axes)?;
                for &axis in &axes {
                    if axis >= self.n_dimensions() {
                        return Err(IndexError::AxisOutOfRange {
                            axis,
                            rank: self.n_dimensions(),
                        }
                        .into());
                    }
                }
                let mut new_headers = self.headers.clone();
                for (&axis, header) in axes.iter().zip(headers) {
                    // chgdim passes unconditionally; kept for symmetry with
                    // the single-axis protocol
                    new_headers[axis].check_header_update(UpdateFlag::Chgdim, &header)?;
                    new_headers[axis] = header;
                }
                // untouched axes keep their old length through their old
                // headers; redefined axes follow their new ones
                check_headers_match(&data, &new_headers)?;
                Ok(Xdata {
                    name: self.name.clone(),
                    data,
                    headers: new_headers,
                    cell_descriptor: self.cell_descriptor.clone(),
                })
            }
            DimChange::Insertdim {
                positions,
                data,
                headers,
            } => {
                if positions.len() != headers.len() {
                    return Err(StructuralError::HeaderCountMismatch {
                        expected: positions.len(),
                        got: headers.len(),
                    }
                    .into());
                }
                let final_rank = self.n_dimensions() + positions.len();
                if !positions.windows(2).all(|w| w[0] < w[1]) {
                    return Err(IndexError::UnsortedPositions.into());
                }
                for &position in &positions {
                    if position >= final_rank {
                        return Err(IndexError::AxisOutOfRange {
                            axis: position,
                            rank: final_rank,
                        }
                        .into());
                    }
                }
                let mut inserted = headers.into_iter();
                let mut kept = self.headers.iter().cloned();
                let mut new_headers = Vec::with_capacity(final_rank);
                for axis in 0..final_rank {
                    if positions.contains(&axis) {
                        new_headers.push(inserted.next().expect("one header per position"));
                    } else {
                        new_headers.push(kept.next().expect("kept headers fill the gaps"));
                    }
                }
                check_headers_match(&data, &new_headers)?;
                Ok(Xdata {
                    name: self.name.clone(),
                    data,
                    headers: new_headers,
                    cell_descriptor: self.cell_descriptor.clone(),
                })
            }
            DimChange::Rmdim { axes, data } => {
                check_no_duplicates(&axes)?;
                for &axis in &axes {
                    if axis >= self.n_dimensions() {
                        return Err(IndexError::AxisOutOfRange {
                            axis,
                            rank: self.n_dimensions(),
                        }
                        .into());
                    }
                }
                let new_headers: Vec<Header> = self
                    .headers
                    .iter()
                    .enumerate()
                    .filter(|(axis, _)| !axes.contains(axis))
                    .map(|(_, h)| h.clone())
                    .collect();
                check_headers_match(&data, &new_headers)?;
                Ok(Xdata {
                    name: self.name.clone(),
                    data,
                    headers: new_headers,
                    cell_descriptor: self.cell_descriptor.clone(),
                })
            }
            DimChange::Permdim { order } => {
                validate_permutation(&order, self.n_dimensions())?;
                let data = self
                    .data
                    .clone()
                    .permuted_axes(IxDyn(&order))
                    .as_standard_layout()
                    .to_owned();
                let headers = order.iter().map(|&i| self.headers[i].clone()).collect();
                Ok(Xdata {
                    name: self.name.clone(),
                    data,
                    headers,
                    cell_descriptor: self.cell_descriptor.clone(),
                })
            }
        }
    }

    fn with(&self, data: ArrayD<f64>, axis: usize, header: Header) -> Self {
        let mut headers = self.headers.clone();
        headers[axis] = header;
        Xdata {
            name: self.name.clone(),
            data,
            headers,
            cell_descriptor: self.cell_descriptor.clone(),
        }
    }

    /// Shape of one slice perpendicular to `axis`.
    fn slice_shape(&self, axis: usize) -> Vec<usize> {
        let mut shape = self.shape().to_vec();
        shape.remove(axis);
        shape
    }

    fn check_positions(&self, axis: usize, indices: &[usize]) -> Result<(), Error> {
        let n_elem = self.shape()[axis];
        for &position in indices {
            if position >= n_elem {
                return Err(IndexError::PositionOutOfRange {
                    axis,
                    position,
                    n_elem,
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_slices(
        &self,
        axis: usize,
        slices: &[ArrayD<f64>],
        expected_count: usize,
    ) -> Result<(), Error> {
        if slices.len() != expected_count {
            return Err(StructuralError::SliceCountMismatch {
                expected: expected_count,
                got: slices.len(),
            }
            .into());
        }
        let expected = self.slice_shape(axis);
        for (index, slice) in slices.iter().enumerate() {
            if slice.shape() != expected.as_slice() {
                return Err(StructuralError::SliceShapeMismatch {
                    index,
                    expected: expected.clone(),
                    got: slice.shape().to_vec(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// For structure-frozen flags on a categorical axis: column count,
    /// labels and units must not move (an undifferentiated axis must stay
    /// column-free). Value-carrying flags may widen a column to `Mixed`
    /// (which clears its unit); nothing narrows. Only `all` and `chgdim`
    /// may grow the column set.
    fn check_frozen_structure(
        &self,
        old_header: &Header,
        new_header: &Header,
        widening_allowed: bool,
    ) -> Result<(), Error> {
        let (old, new) = match (old_header, new_header) {
            (Header::Categorical(old), Header::Categorical(new)) => (old, new),
            _ => return Ok(()),
        };
        if old.n_columns() != new.n_columns() {
            return Err(StructuralError::ColumnStructureChanged.into());
        }
        for (old_column, new_column) in old
            .column_descriptors()
            .iter()
            .zip(new.column_descriptors())
        {
            let unchanged = old_column == new_column;
            let widened = widening_allowed
                && old_column.label() == new_column.label()
                && new_column.kind() == DimensionKind::Mixed
                && new_column.unit_table().is_none();
            if !(unchanged || widened) {
                return Err(StructuralError::ColumnStructureChanged.into());
            }
        }
        Ok(())
    }
}

/// Concatenate rank `N-1` slices onto the end of `data` along `axis`.
/// Shapes must already be validated.
fn append_slices(data: ArrayD<f64>, axis: usize, slices: &[ArrayD<f64>]) -> ArrayD<f64> {
    if slices.is_empty() {
        return data;
    }
    let expanded: Vec<ArrayD<f64>> = slices
        .iter()
        .map(|slice| slice.clone().insert_axis(Axis(axis)))
        .collect();
    let mut parts: Vec<ArrayViewD<'_, f64>> = Vec::with_capacity(expanded.len() + 1);
    parts.push(data.view());
    parts.extend(expanded.iter().map(ArrayD::view));
    concatenate(Axis(axis), &parts).expect("slice shapes are validated before concatenation")
}

fn check_headers_match(data: &ArrayD<f64>, headers: &[Header]) -> Result<(), Error> {
    if headers.len() != data.ndim() {
        return Err(StructuralError::RankMismatch {
            expected: headers.len(),
            got: data.ndim(),
        }
        .into());
    }
    for (axis, header) in headers.iter().enumerate() {
        if header.n_elem() != data.shape()[axis] {
            return Err(StructuralError::AxisLengthMismatch {
                axis,
                expected: header.n_elem(),
                got: data.shape()[axis],
            }
            .into());
        }
    }
    Ok(())
}

fn check_no_duplicates(indices: &[usize]) -> Result<(), Error> {
    for (position, &index) in indices.iter().enumerate() {
        if indices[..position].contains(&index) {
            return Err(IndexError::DuplicateIndex { index }.into());
        }
    }
    Ok(())
}

fn first_shape_mismatch(expected: &[usize], got: &[usize]) -> Error {
    if expected.len() != got.len() {
        return StructuralError::RankMismatch {
            expected: expected.len(),
            got: got.len(),
        }
        .into();
    }
    for (axis, (&e, &g)) in expected.iter().zip(got).enumerate() {
        if e != g {
            return StructuralError::AxisLengthMismatch {
                axis,
                expected: e,
                got: g,
            }
            .into();
        }
    }
    unreachable!("called only on mismatching shapes")
}

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Reading, writing and mapping sub-arrays through [`View`]s.
//!
//! All operations validate their ranges and shapes before touching
//! any element; a failed [`set_sub`] leaves the target unchanged.
//!
//! Concurrent reads and writes of the same array are serialized by
//! the borrow checker: writes take the target by `&mut`.

use std::borrow::Cow;

use crate::array::Array;
use crate::array::ArrayError;
use crate::layout::Order;
use crate::range::Range;
use crate::view::View;

static ROW_MAJOR: Order = Order::RowMajor;

/// A container that can be indexed through a [`View`]: it exposes its
/// dims, its layout and its elements in storage order.
pub trait Indexable {
    type Elem;

    /// The size of each axis.
    fn dims(&self) -> Cow<'_, [usize]>;

    /// The layout of [`Indexable::elements`].
    fn order(&self) -> &Order;

    /// The elements, in storage order.
    fn elements(&self) -> &[Self::Elem];
}

/// An [`Indexable`] container whose elements can be overwritten.
pub trait IndexableMut: Indexable {
    fn elements_mut(&mut self) -> &mut [Self::Elem];
}

impl<T> Indexable for Array<T> {
    type Elem = T;

    fn dims(&self) -> Cow<'_, [usize]> {
        Cow::Borrowed(Array::dims(self))
    }

    fn order(&self) -> &Order {
        Array::order(self)
    }

    fn elements(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> IndexableMut for Array<T> {
    fn elements_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

/// Vectors are one-dimensional.
impl<T> Indexable for Vec<T> {
    type Elem = T;

    fn dims(&self) -> Cow<'_, [usize]> {
        Cow::Owned(vec![self.len()])
    }

    fn order(&self) -> &Order {
        &ROW_MAJOR
    }

    fn elements(&self) -> &[T] {
        self
    }
}

impl<T> IndexableMut for Vec<T> {
    fn elements_mut(&mut self) -> &mut [T] {
        self
    }
}

/// The result of [`sub`]: a single element when every axis was
/// dropped, an array otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    Scalar(T),
    Array(Array<T>),
}

impl<T> Value<T> {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    pub fn into_scalar(self) -> Option<T> {
        match self {
            Value::Scalar(value) => Some(value),
            Value::Array(_) => None,
        }
    }

    pub fn into_array(self) -> Option<Array<T>> {
        match self {
            Value::Scalar(_) => None,
            Value::Array(array) => Some(array),
        }
    }
}

/// Read the elements of `source` selected by `ranges`, one range per
/// axis.
///
/// The result is a fresh row-major array shaped as the reduced shape
/// of the view, or a scalar if every axis was dropped.
///
/// ```
/// use ndview::Array;
/// use ndview::Value;
/// use ndview::ranges;
/// use ndview::sub;
///
/// let a = Array::from_vec(vec![3, 4], (0..12).collect()).unwrap();
/// let row = sub(&a, &ranges![1, (0, 2)]).unwrap();
/// assert_eq!(row, Value::Array(Array::collect_vector([4, 5])));
/// assert_eq!(sub(&a, &ranges![-1, -1]).unwrap(), Value::Scalar(11));
/// ```
pub fn sub<C>(source: &C, ranges: &[Range]) -> Result<Value<C::Elem>, ArrayError>
where
    C: Indexable + ?Sized,
    C::Elem: Clone,
{
    let dims = source.dims();
    let mut view = View::new(ranges, &dims, source.order())?;
    tracing::trace!(dims = ?dims, shape = ?view.shape(), "sub");
    let elements = source.elements();
    if view.rank() == 0 {
        return Ok(Value::Scalar(elements[view.current()].clone()));
    }

    let mut data = Vec::with_capacity(view.len());
    while !view.is_done() {
        data.push(elements[view.current()].clone());
        view.advance();
    }
    Ok(Value::Array(Array::from_parts(
        view.shape().to_vec(),
        Order::RowMajor,
        data,
    )))
}

/// Overwrite the elements of `target` selected by `ranges` with the
/// elements of `source`, taken in row-major order. `source` must have
/// exactly the reduced shape of the view; a view with every axis
/// dropped takes a rank-0 source (see [`Array::scalar`]).
///
/// Returns `source`. Positions selected more than once (through
/// repeated list indices) end up with the last value written.
pub fn set_sub<C>(
    target: &mut C,
    source: Array<C::Elem>,
    ranges: &[Range],
) -> Result<Array<C::Elem>, ArrayError>
where
    C: IndexableMut + ?Sized,
    C::Elem: Clone,
{
    let dims = target.dims().into_owned();
    let view = View::new(ranges, &dims, target.order())?;
    if source.dims() != view.shape() {
        return Err(ArrayError::IncompatibleDimensions {
            reason: format!(
                "source of shape {:?} written to a view of shape {:?}",
                source.dims(),
                view.shape()
            ),
        });
    }
    tracing::trace!(dims = ?dims, shape = ?view.shape(), "set_sub");

    let elements = target.elements_mut();
    for (loc, value) in view.into_iter().zip(source.iter()) {
        elements[loc] = value.clone();
    }
    Ok(source)
}

/// Overwrite the single element of `target` selected by `ranges`,
/// which must drop every axis.
pub fn set_scalar<C>(target: &mut C, value: C::Elem, ranges: &[Range]) -> Result<(), ArrayError>
where
    C: IndexableMut + ?Sized,
{
    let dims = target.dims().into_owned();
    let view = View::new(ranges, &dims, target.order())?;
    if view.rank() != 0 {
        return Err(ArrayError::IncompatibleDimensions {
            reason: format!("scalar written to a view of shape {:?}", view.shape()),
        });
    }
    target.elements_mut()[view.current()] = value;
    Ok(())
}

/// Apply `f` to every row of `matrix` and assemble the results.
///
/// If `f` returns scalars the result is a vector with one element per
/// row. If it returns vectors, they must all have the same length `n`
/// and the result is a `nrow x n` matrix.
pub fn map_rows<T, U, F>(matrix: &Array<T>, f: F) -> Result<Array<U>, ArrayError>
where
    T: Clone,
    U: Clone + Default,
    F: FnMut(Array<T>) -> Value<U>,
{
    map_along(matrix, Along::Rows, f)
}

/// Apply `f` to every column of `matrix` and assemble the results.
///
/// If `f` returns scalars the result is a vector with one element per
/// column. If it returns vectors, they must all have the same length
/// `n` and the result is a `n x ncol` matrix.
pub fn map_columns<T, U, F>(matrix: &Array<T>, f: F) -> Result<Array<U>, ArrayError>
where
    T: Clone,
    U: Clone + Default,
    F: FnMut(Array<T>) -> Value<U>,
{
    map_along(matrix, Along::Columns, f)
}

#[derive(Debug, Clone, Copy)]
enum Along {
    Rows,
    Columns,
}

impl Along {
    fn ranges(self, index: usize) -> [Range; 2] {
        match self {
            Along::Rows => [Range::from(index), Range::All],
            Along::Columns => [Range::All, Range::from(index)],
        }
    }

    fn result_dims(self, count: usize, len: usize) -> Vec<usize> {
        match self {
            Along::Rows => vec![count, len],
            Along::Columns => vec![len, count],
        }
    }
}

// What the first call of the mapped function decided to build.
enum Collected<U> {
    Scalars(Vec<U>),
    Lines(Array<U>),
}

impl<U: Clone + Default> Collected<U> {
    fn first(mapped: Value<U>, along: Along, count: usize) -> Result<Self, ArrayError> {
        match mapped {
            Value::Scalar(value) => {
                tracing::debug!(?along, count, "mapped to scalars");
                let mut values = Vec::with_capacity(count);
                values.push(value);
                Ok(Collected::Scalars(values))
            }
            Value::Array(line) => {
                if line.rank() != 1 {
                    return Err(ArrayError::IncompatibleDimensions {
                        reason: format!("mapped result of rank {} is not a vector", line.rank()),
                    });
                }
                tracing::debug!(?along, count, len = line.len(), "mapped to vectors");
                let dims = along.result_dims(count, line.len());
                let mut result = Array::create(dims, U::default())?;
                set_sub(&mut result, line, &along.ranges(0))?;
                Ok(Collected::Lines(result))
            }
        }
    }

    fn push(&mut self, mapped: Value<U>, along: Along, index: usize) -> Result<(), ArrayError> {
        match (self, mapped) {
            (Collected::Scalars(values), Value::Scalar(value)) => {
                values.push(value);
                Ok(())
            }
            (Collected::Lines(result), Value::Array(line)) => {
                set_sub(result, line, &along.ranges(index)).map(|_| ())
            }
            (Collected::Scalars(_), Value::Array(_)) => Err(ArrayError::IncompatibleDimensions {
                reason: format!(
                    "mapped result {} is an array, earlier results were scalars",
                    index
                ),
            }),
            (Collected::Lines(_), Value::Scalar(_)) => Err(ArrayError::IncompatibleDimensions {
                reason: format!("mapped result {} is a scalar, earlier results were arrays", index),
            }),
        }
    }

    fn finish(self) -> Array<U> {
        match self {
            Collected::Scalars(values) => Array::collect_vector(values),
            Collected::Lines(result) => result,
        }
    }
}

fn matrix_dims<T>(matrix: &Array<T>) -> Result<(usize, usize), ArrayError> {
    match *matrix.dims() {
        [nrow, ncol] => Ok((nrow, ncol)),
        ref dims => Err(ArrayError::IncompatibleDimensions {
            reason: format!("expected a matrix, got dims {:?}", dims),
        }),
    }
}

fn map_along<T, U, F>(matrix: &Array<T>, along: Along, mut f: F) -> Result<Array<U>, ArrayError>
where
    T: Clone,
    U: Clone + Default,
    F: FnMut(Array<T>) -> Value<U>,
{
    let (nrow, ncol) = matrix_dims(matrix)?;
    let count = match along {
        Along::Rows => nrow,
        Along::Columns => ncol,
    };

    let mut collected: Option<Collected<U>> = None;
    for index in 0..count {
        let line = sub(matrix, &along.ranges(index))?
            .into_array()
            .ok_or_else(|| ArrayError::IncompatibleDimensions {
                reason: "line of a matrix is not a vector".to_string(),
            })?;
        let mapped = f(line);
        match collected {
            None => collected = Some(Collected::first(mapped, along, count)?),
            Some(ref mut c) => c.push(mapped, along, index)?,
        }
    }
    Ok(collected.map_or_else(|| Array::collect_vector(Vec::new()), Collected::finish))
}

/// The transpose of a matrix, as a fresh row-major `ncol x nrow`
/// matrix.
///
/// ```
/// use ndview::Array;
/// use ndview::transpose;
///
/// let m = Array::from_vec(vec![2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
/// let t = transpose(&m).unwrap();
/// assert_eq!(t.dims(), &[3, 2]);
/// assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
/// ```
pub fn transpose<T: Clone>(matrix: &Array<T>) -> Result<Array<T>, ArrayError> {
    let (nrow, ncol) = matrix_dims(matrix)?;
    let strides = matrix.order().strides(matrix.dims());
    let elements = matrix.as_slice();
    let mut data = Vec::with_capacity(nrow * ncol);
    for c in 0..ncol {
        for r in 0..nrow {
            data.push(elements[r * strides[0] + c * strides[1]].clone());
        }
    }
    Ok(Array::from_parts(vec![ncol, nrow], Order::RowMajor, data))
}

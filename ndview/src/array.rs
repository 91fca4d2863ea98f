/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::layout::LayoutMap;
use crate::layout::Order;
use crate::layout::element_count;
use crate::view::View;
use crate::view::ViewIter;

/// The type of error for array indexing operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ArrayError {
    #[error("index {index} out of range for dimension of size {dimension}")]
    InvalidArrayIndex { index: isize, dimension: usize },

    #[error("empty range {start}:{end} for dimension of size {dimension}")]
    InvalidRange {
        start: isize,
        end: isize,
        dimension: usize,
    },

    #[error("incompatible dimensions: {reason}")]
    IncompatibleDimensions { reason: String },
}

/// A dense n-dimensional array.
///
/// Elements are stored in a single `Vec<T>`. The bijection between
/// coordinates and positions in that vector is given by the array's
/// [`Order`]: row-major (the default), column-major, or an arbitrary
/// permutation of the axes.
///
/// ```
/// use ndview::Array;
///
/// let a = Array::from_vec(vec![2, 3], (0..6).collect()).unwrap();
/// assert_eq!(a.rank(), 2);
/// assert_eq!(*a.get(&[1, 2]).unwrap(), 5);
/// assert_eq!(a.to_string(), "[[0, 1, 2], [3, 4, 5]]");
/// ```
#[derive(Serialize, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Array<T> {
    dims: Vec<usize>,
    order: Order,
    data: Vec<T>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Array<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw<T> {
            dims: Vec<usize>,
            order: Order,
            data: Vec<T>,
        }

        let Raw { dims, order, data } = Raw::deserialize(deserializer)?;
        Array::with_order(dims, order, data).map_err(serde::de::Error::custom)
    }
}

impl<T> Array<T> {
    /// Create a row-major array from its elements. The number of
    /// elements must equal the product of `dims`.
    pub fn from_vec(dims: impl Into<Vec<usize>>, data: Vec<T>) -> Result<Self, ArrayError> {
        Self::with_order(dims, Order::RowMajor, data)
    }

    /// Create an array whose elements are laid out in `order`.
    pub fn with_order(
        dims: impl Into<Vec<usize>>,
        order: Order,
        data: Vec<T>,
    ) -> Result<Self, ArrayError> {
        let dims = dims.into();
        order.validate(dims.len())?;
        let expected = element_count(&dims)?;
        if data.len() != expected {
            return Err(ArrayError::IncompatibleDimensions {
                reason: format!(
                    "{} elements given for dims {:?} ({} expected)",
                    data.len(),
                    dims,
                    expected
                ),
            });
        }
        Ok(Self { dims, order, data })
    }

    // Callers guarantee that `order` is valid for `dims` and that
    // `data.len()` is the product of `dims`.
    pub(crate) fn from_parts(dims: Vec<usize>, order: Order, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), dims.iter().product::<usize>());
        Self { dims, order, data }
    }

    /// A rank-0 array holding a single value.
    pub fn scalar(value: T) -> Self {
        Self::from_parts(Vec::new(), Order::RowMajor, vec![value])
    }

    /// A one-dimensional array of the given elements.
    pub fn collect_vector(elements: impl IntoIterator<Item = T>) -> Self {
        let data: Vec<T> = elements.into_iter().collect();
        Self::from_parts(vec![data.len()], Order::RowMajor, data)
    }

    /// A two-dimensional array with one row per item. All rows must
    /// have the same length. No rows give a `0 x 0` array.
    pub fn collect_rows(rows: impl IntoIterator<Item = Vec<T>>) -> Result<Self, ArrayError> {
        let mut nrow = 0;
        let mut ncol = None;
        let mut data = Vec::new();
        for row in rows {
            match ncol {
                None => ncol = Some(row.len()),
                Some(n) if n != row.len() => {
                    return Err(ArrayError::IncompatibleDimensions {
                        reason: format!("row {} has length {}, expected {}", nrow, row.len(), n),
                    });
                }
                Some(_) => (),
            }
            data.extend(row);
            nrow += 1;
        }
        Ok(Self::from_parts(
            vec![nrow, ncol.unwrap_or(0)],
            Order::RowMajor,
            data,
        ))
    }

    /// The size of each axis.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// The layout of the elements in storage.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// The number of axes.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// The total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The elements in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Deconstruct the array into its elements, in storage order.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// The storage position of the element at `coord`.
    pub fn location(&self, coord: &[usize]) -> Result<usize, ArrayError> {
        self.offset_of(coord)
    }

    /// The element at `coord`.
    pub fn get(&self, coord: &[usize]) -> Result<&T, ArrayError> {
        let loc = self.location(coord)?;
        Ok(&self.data[loc])
    }

    /// Iterate over the elements in logical row-major order (last axis
    /// fastest), whatever the storage order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            data: &self.data,
            offsets: View::full(&self.dims, self.order.strides(&self.dims), self.data.len())
                .into_iter(),
        }
    }
}

impl<T: Clone> Array<T> {
    /// A row-major array of the given dims, with every element set to
    /// `value`. Fails if the element count overflows `usize`.
    pub fn create(dims: impl Into<Vec<usize>>, value: T) -> Result<Self, ArrayError> {
        let dims = dims.into();
        let len = element_count(&dims)?;
        Ok(Self::from_parts(dims, Order::RowMajor, vec![value; len]))
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an [`Array`] in logical row-major
/// order.
pub struct Iter<'a, T> {
    data: &'a [T],
    offsets: ViewIter,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        self.offsets.next().map(|loc| &data[loc])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T: fmt::Display> fmt::Display for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn nested<'a, T: fmt::Display + 'a>(
            f: &mut fmt::Formatter<'_>,
            dims: &[usize],
            elements: &mut impl Iterator<Item = &'a T>,
        ) -> fmt::Result {
            let Some((&size, rest)) = dims.split_first() else {
                return match elements.next() {
                    Some(element) => write!(f, "{}", element),
                    None => Ok(()),
                };
            };
            write!(f, "[")?;
            for i in 0..size {
                if i > 0 {
                    write!(f, ", ")?;
                }
                nested(f, rest, elements)?;
            }
            write!(f, "]")
        }

        nested(f, &self.dims, &mut self.iter())
    }
}

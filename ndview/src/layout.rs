/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

use crate::array::Array;
use crate::array::ArrayError;

mod sealed {
    // Only types in this crate implement LayoutMap.
    pub trait Sealed {}
}

/// The order in which the axes of an array are laid out in flat
/// storage.
///
/// Each order defines a coefficient (stride) per axis such that the
/// map
///
/// ```text
/// flat(x) = ∑ coefficient[a] × x[a]
/// ```
///
/// is a bijection from the coordinates of a dense array onto
/// `0..∏ dims`.
///
/// For example, with dims `[3, 4]`:
///
/// ```
/// use ndview::Order;
///
/// assert_eq!(Order::RowMajor.coefficients(&[3, 4]).unwrap(), vec![4, 1]);
/// assert_eq!(Order::ColumnMajor.coefficients(&[3, 4]).unwrap(), vec![1, 3]);
/// ```
#[derive(Debug, Clone, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Order {
    /// The last axis varies fastest.
    #[default]
    RowMajor,
    /// The first axis varies fastest.
    ColumnMajor,
    /// The listed axes vary from slowest to fastest. `Permuted(vec![0,
    /// 1, .., n-1])` is row-major.
    Permuted(Vec<usize>),
}

impl Order {
    /// Check that this order describes an array of rank `rank`. Only
    /// permutations can fail: they must mention every axis exactly
    /// once.
    pub fn validate(&self, rank: usize) -> Result<(), ArrayError> {
        match self {
            Order::RowMajor | Order::ColumnMajor => Ok(()),
            Order::Permuted(axes) => {
                if axes.len() != rank
                    || axes.iter().any(|&axis| axis >= rank)
                    || !axes.iter().all_unique()
                {
                    return Err(ArrayError::IncompatibleDimensions {
                        reason: format!("{:?} is not a permutation of the {} axes", axes, rank),
                    });
                }
                Ok(())
            }
        }
    }

    /// The coefficient of every axis of a dense array of the given
    /// dims. Fails if the order does not fit the rank, or if the array
    /// would have more elements than `usize` can count.
    pub fn coefficients(&self, dims: &[usize]) -> Result<Vec<usize>, ArrayError> {
        self.validate(dims.len())?;
        element_count(dims)?;
        Ok(self.strides(dims))
    }

    // Assumes `self.validate(dims.len())` holds. Strides of an empty
    // array are never dereferenced, so they saturate instead of
    // overflowing.
    pub(crate) fn strides(&self, dims: &[usize]) -> Vec<usize> {
        match self {
            Order::RowMajor => fold_strides(dims, (0..dims.len()).rev()),
            Order::ColumnMajor => fold_strides(dims, 0..dims.len()),
            Order::Permuted(axes) => fold_strides(dims, axes.iter().rev().copied()),
        }
    }
}

/// The number of elements of a dense array of the given dims.
///
/// Any zero-sized axis makes the array empty, whatever the size of the
/// others. Otherwise the product must fit in a `usize`.
///
/// ```
/// use ndview::layout::element_count;
///
/// assert_eq!(element_count(&[3, 4]).unwrap(), 12);
/// assert_eq!(element_count(&[usize::MAX, 2, 0]).unwrap(), 0);
/// assert!(element_count(&[usize::MAX, 2]).is_err());
/// ```
pub fn element_count(dims: &[usize]) -> Result<usize, ArrayError> {
    if dims.contains(&0) {
        return Ok(0);
    }
    dims.iter()
        .try_fold(1usize, |count, &size| count.checked_mul(size))
        .ok_or_else(|| ArrayError::IncompatibleDimensions {
            reason: format!("element count of dims {:?} overflows", dims),
        })
}

// Walk the axes from the fastest varying to the slowest, assigning
// each the product of the sizes walked so far.
fn fold_strides(dims: &[usize], fastest_first: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut strides = vec![0; dims.len()];
    let mut stride = 1usize;
    for axis in fastest_first {
        strides[axis] = stride;
        stride = stride.saturating_mul(dims[axis]);
    }
    strides
}

/// A trait for layouts that map multidimensional coordinates (in
/// `ℕⁿ`) to linear storage offsets (`ℕ¹`) via an affine
/// transformation:
///
/// ```text
/// offset_of(x) = dot(coefficients, x)
/// ```
pub trait LayoutMap: sealed::Sealed {
    /// The number of dimensions in the domain of the map.
    fn rank(&self) -> usize;

    /// The shape of the domain (number of elements per dimension).
    fn sizes(&self) -> &[usize];

    /// Maps a multidimensional coordinate to a linear storage offset.
    fn offset_of(&self, coord: &[usize]) -> Result<usize, ArrayError>;
}

impl<T> sealed::Sealed for Array<T> {}

impl<T> LayoutMap for Array<T> {
    fn rank(&self) -> usize {
        self.dims().len()
    }

    fn sizes(&self) -> &[usize] {
        self.dims()
    }

    fn offset_of(&self, coord: &[usize]) -> Result<usize, ArrayError> {
        if coord.len() != LayoutMap::rank(self) {
            return Err(ArrayError::IncompatibleDimensions {
                reason: format!(
                    "coordinate {:?} for an array of rank {}",
                    coord,
                    LayoutMap::rank(self)
                ),
            });
        }
        if let Some((&index, &dimension)) = coord
            .iter()
            .zip(self.sizes())
            .find(|(index, dimension)| index >= dimension)
        {
            return Err(ArrayError::InvalidArrayIndex {
                index: index.try_into().unwrap_or(isize::MAX),
                dimension,
            });
        }

        // Dot product ∑ᵢ (strideᵢ × coordᵢ)
        Ok(self
            .order()
            .strides(self.sizes())
            .iter()
            .zip(coord)
            .map(|(s, i)| s * i)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major() {
        assert_eq!(Order::RowMajor.coefficients(&[4, 4, 4]).unwrap(), vec![16, 4, 1]);
        assert_eq!(Order::RowMajor.coefficients(&[2, 3, 5]).unwrap(), vec![15, 5, 1]);
        assert_eq!(Order::RowMajor.coefficients(&[]).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_column_major() {
        assert_eq!(Order::ColumnMajor.coefficients(&[2, 3, 5]).unwrap(), vec![1, 2, 6]);
    }

    #[test]
    fn test_permuted() {
        // Axis 1 slowest, then 2, then 0 fastest.
        assert_eq!(
            Order::Permuted(vec![1, 2, 0]).coefficients(&[2, 3, 5]).unwrap(),
            vec![1, 10, 2]
        );
        assert_eq!(
            Order::Permuted(vec![0, 1, 2]).coefficients(&[2, 3, 5]).unwrap(),
            Order::RowMajor.coefficients(&[2, 3, 5]).unwrap()
        );
        assert_eq!(
            Order::Permuted(vec![2, 1, 0]).coefficients(&[2, 3, 5]).unwrap(),
            Order::ColumnMajor.coefficients(&[2, 3, 5]).unwrap()
        );
    }

    #[test]
    fn test_permuted_bad() {
        for axes in [vec![0, 1], vec![0, 0, 1], vec![0, 1, 3]] {
            assert!(matches!(
                Order::Permuted(axes).coefficients(&[2, 3, 5]),
                Err(ArrayError::IncompatibleDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_coefficients_are_a_bijection() {
        let dims = [2, 3, 4];
        for order in [
            Order::RowMajor,
            Order::ColumnMajor,
            Order::Permuted(vec![1, 0, 2]),
            Order::Permuted(vec![2, 0, 1]),
        ] {
            let c = order.coefficients(&dims).unwrap();
            let mut seen: Vec<usize> = itertools::iproduct!(0..2, 0..3, 0..4)
                .map(|(i, j, k)| c[0] * i + c[1] * j + c[2] * k)
                .collect();
            seen.sort();
            assert!(seen.into_iter().eq(0..24), "{:?}", order);
        }
    }

    #[test]
    fn test_element_count() {
        assert_eq!(element_count(&[]).unwrap(), 1);
        assert_eq!(element_count(&[2, 3, 5]).unwrap(), 30);
        assert_eq!(element_count(&[usize::MAX, 2, 0]).unwrap(), 0);
        assert_eq!(element_count(&[0, usize::MAX, usize::MAX]).unwrap(), 0);
        assert!(matches!(
            element_count(&[usize::MAX, 2]),
            Err(ArrayError::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn test_coefficients_huge_dims() {
        // Empty arrays get coefficients however large their other axes.
        for order in [Order::RowMajor, Order::ColumnMajor] {
            assert_eq!(order.coefficients(&[usize::MAX, 2, 0]).unwrap().len(), 3);
            assert!(matches!(
                order.coefficients(&[usize::MAX, 2, 3]),
                Err(ArrayError::IncompatibleDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_offset_of() {
        let a = Array::with_order(vec![2, 3], Order::ColumnMajor, vec![0; 6]).unwrap();
        assert_eq!(LayoutMap::rank(&a), 2);
        assert_eq!(a.sizes(), &[2, 3]);
        assert_eq!(a.offset_of(&[1, 2]).unwrap(), 5);
        assert_eq!(a.offset_of(&[0, 1]).unwrap(), 2);
        assert!(a.offset_of(&[2, 0]).is_err());
        assert!(a.offset_of(&[0, 0, 0]).is_err());
    }
}

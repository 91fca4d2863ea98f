/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use itertools::izip;

use crate::range::Resolved;

/// The affine map of a view once its dropped axes are removed:
///
/// ```text
/// flat(x) = offset + ∑ coefficients[a] × position(ranges[a], x[a])
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduced {
    /// Contribution of every dropped axis.
    pub offset: usize,
    /// The surviving ranges, in their original relative order.
    pub ranges: Vec<Resolved>,
    /// The coefficients of the surviving axes.
    pub coefficients: Vec<usize>,
}

impl Reduced {
    /// The extent of each surviving axis.
    pub fn shape(&self) -> Vec<usize> {
        self.ranges.iter().map(Resolved::extent).collect()
    }
}

/// Fold every [`Resolved::Dropped`] axis into the offset and keep the
/// others, together with their coefficients.
///
/// Selecting index 2 along the first axis of a row-major `3 x 4`
/// array, for example, leaves one axis and an offset of `2 * 4`:
///
/// ```
/// use ndview::range::Resolved;
/// use ndview::reduce::drop_dimensions;
///
/// let r = drop_dimensions(vec![Resolved::Dropped(2), Resolved::Span(0, 4)], &[4, 1]);
/// assert_eq!(r.offset, 8);
/// assert_eq!(r.ranges, vec![Resolved::Span(0, 4)]);
/// assert_eq!(r.coefficients, vec![1]);
/// ```
pub fn drop_dimensions(ranges: Vec<Resolved>, coefficients: &[usize]) -> Reduced {
    debug_assert_eq!(ranges.len(), coefficients.len());
    let mut reduced = Reduced {
        offset: 0,
        ranges: Vec::with_capacity(ranges.len()),
        coefficients: Vec::with_capacity(ranges.len()),
    };
    for (range, &coefficient) in izip!(ranges, coefficients) {
        match range {
            Resolved::Dropped(index) => reduced.offset += coefficient * index,
            range => {
                reduced.ranges.push(range);
                reduced.coefficients.push(coefficient);
            }
        }
    }
    reduced
}

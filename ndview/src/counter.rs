/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Odometer enumeration of the coordinates of a reduced view, and the
//! incremental evaluation of its affine map.
//!
//! A view over a reduced shape `[d₀, d₁, ..., dₖ₋₁]` visits every
//! counter vector `[c₀, c₁, ..., cₖ₋₁]` with `cⱼ ∈ 0..dⱼ` in row-major
//! order (last axis fastest). After an [`increment`] only the axes
//! from the lowest changed one onwards have moved, so
//! [`map_counters`] only needs to redo the suffix of the sum
//!
//! ```text
//! flat = offset + ∑ₐ coefficient[a] × position(range[a], counter[a])
//! ```
//!
//! reusing the cached partial sums of the prefix.

use crate::range::Resolved;

/// Advance `counters` by one step in row-major order over `shape`.
///
/// Returns the lowest axis whose counter changed, and whether the
/// counters wrapped around. On a wrap every counter is back at zero and
/// the reported axis is `0`; this is also the result for rank 0, whose
/// single coordinate is visited once.
pub fn increment(counters: &mut [usize], shape: &[usize]) -> (usize, bool) {
    debug_assert_eq!(counters.len(), shape.len());
    for axis in (0..counters.len()).rev() {
        counters[axis] += 1;
        if counters[axis] < shape[axis] {
            return (axis, false);
        }
        counters[axis] = 0;
    }
    (0, true)
}

/// The axis position selected by `counter` along `range`.
pub fn position(range: &Resolved, counter: usize) -> usize {
    match range {
        Resolved::Span(start, _) => start + counter,
        Resolved::List(indices) => indices[counter],
        Resolved::Dropped(index) => *index,
    }
}

/// Evaluate the affine map at `counters`, recomputing the cached
/// partial sums for axes `valid_from..` only.
///
/// `cumsum[a]` holds `offset` plus the contributions of axes `0..=a`;
/// entries below `valid_from` must be up to date for the current
/// counters.
pub fn map_counters(
    offset: usize,
    ranges: &[Resolved],
    coefficients: &[usize],
    counters: &[usize],
    cumsum: &mut [usize],
    valid_from: usize,
) -> usize {
    let mut sum = match valid_from {
        0 => offset,
        axis => cumsum[axis - 1],
    };
    for axis in valid_from..ranges.len() {
        sum += coefficients[axis] * position(&ranges[axis], counters[axis]);
        cumsum[axis] = sum;
    }
    sum
}

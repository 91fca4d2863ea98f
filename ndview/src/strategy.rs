/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Property-based generators for [`Array`]s and [`Range`]
//! specifications.
//!
//! The main entry point is [`gen_array_and_ranges`], which pairs a
//! randomly shaped and laid out array with a valid range
//! specification for it, using every raw encoding (negative indices,
//! `0` as the end of a span, repeated gather indices).
//!
//! This module is only included in test builds (`#[cfg(test)]`).

use proptest::prelude::*;

use crate::array::Array;
use crate::layout::Order;
use crate::range::Range;

/// Generates dims of rank `1..=max_rank`, each of size `1..=max_len`.
pub fn gen_dims(max_rank: usize, max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1..=max_len, 1..=max_rank)
}

/// Generates a valid [`Order`] for arrays of the given rank.
pub fn gen_order(rank: usize) -> impl Strategy<Value = Order> {
    prop_oneof![
        Just(Order::RowMajor),
        Just(Order::ColumnMajor),
        Just((0..rank).collect::<Vec<_>>())
            .prop_shuffle()
            .prop_map(Order::Permuted),
    ]
}

/// Generates an array whose element at storage position `i` is `i`,
/// with random dims and layout.
pub fn gen_array(max_rank: usize, max_len: usize) -> impl Strategy<Value = Array<i64>> {
    gen_dims(max_rank, max_len)
        .prop_flat_map(|dims| {
            let order = gen_order(dims.len());
            (Just(dims), order)
        })
        .prop_map(|(dims, order)| {
            let len: usize = dims.iter().product();
            let data = (0..len as i64).collect();
            Array::with_order(dims, order, data).unwrap()
        })
}

// Either the position itself or its negative encoding.
fn encode(index: usize, dimension: usize, negative: bool) -> isize {
    if negative {
        index as isize - dimension as isize
    } else {
        index as isize
    }
}

/// Generates a valid [`Range`] for an axis of size `dimension`
/// (which must be positive).
pub fn gen_range(dimension: usize) -> impl Strategy<Value = Range> {
    let index = (0..dimension, any::<bool>())
        .prop_map(move |(i, negative)| Range::Index(encode(i, dimension, negative)));
    let span = (0..dimension)
        .prop_flat_map(move |start| (Just(start), start + 1..=dimension))
        .prop_flat_map(|(start, end)| (Just(start), Just(end), any::<bool>(), 0..3u8))
        .prop_map(move |(start, end, negative, end_encoding)| {
            let end = match end_encoding {
                0 if end == dimension => 0,
                1 if end < dimension => encode(end, dimension, true),
                _ => end as isize,
            };
            Range::Span(encode(start, dimension, negative), end)
        });
    let list = prop::collection::vec((0..dimension, any::<bool>()), 0..=dimension + 1)
        .prop_map(move |indices| {
            Range::List(
                indices
                    .into_iter()
                    .map(|(i, negative)| encode(i, dimension, negative))
                    .collect(),
            )
        });
    prop_oneof![Just(Range::All), index, span, list]
}

/// Generates a pair `(array, ranges)` where `ranges` is a valid range
/// specification for `array`.
pub fn gen_array_and_ranges(
    max_rank: usize,
    max_len: usize,
) -> impl Strategy<Value = (Array<i64>, Vec<Range>)> {
    gen_array(max_rank, max_len).prop_flat_map(|array| {
        let ranges: Vec<_> = array.dims().iter().map(|&d| gen_range(d)).collect();
        (Just(array), ranges)
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::range::transform_ranges;

    proptest! {
        #[test]
        fn test_generated_ranges_resolve((array, ranges) in gen_array_and_ranges(4, 6)) {
            prop_assert_eq!(ranges.len(), array.rank());
            prop_assert!(transform_ranges(&ranges, array.dims()).is_ok());
        }

        #[test]
        fn test_generated_arrays_are_dense(array in gen_array(4, 6)) {
            let mut seen: Vec<i64> = array.iter().copied().collect();
            seen.sort();
            prop_assert!(seen.into_iter().eq(0..array.len() as i64));
        }
    }
}

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Views: the enumeration of the flat offsets selected by a range
//! specification.
//!
//! A [`View`] is built from one [`Range`] per axis and the dims and
//! [`Order`] of the array being indexed. Construction runs the whole
//! pipeline up front, so that every error is reported before any
//! element is touched:
//!
//! ```text
//! ranges, dims ──transform_ranges──▶ resolved ranges
//! dims, order  ──coefficients─────▶ per-axis coefficients
//!              ──drop_dimensions──▶ (offset, surviving ranges, coefficients)
//! ```
//!
//! The view then walks the reduced shape with an odometer (see
//! [`crate::counter`]), following a peek-then-step protocol:
//!
//! ```
//! use ndview::Order;
//! use ndview::Range;
//! use ndview::View;
//!
//! // Rows 1 and 2 of a row-major 3 x 4 array.
//! let mut view = View::new(&[Range::Span(1, 3), Range::All], &[3, 4], &Order::RowMajor).unwrap();
//! let mut offsets = Vec::new();
//! while !view.is_done() {
//!     offsets.push(view.current());
//!     view.advance();
//! }
//! assert_eq!(offsets, (4..12).collect::<Vec<_>>());
//! ```
//!
//! A view whose reduced shape has a zero extent is done from the start
//! and visits nothing. A view with every axis dropped has rank 0 and
//! visits exactly one offset.
//!
//! Views are transient: they are built for one traversal, owned by
//! whoever walks them, and never shared.

use crate::array::ArrayError;
use crate::counter::increment;
use crate::counter::map_counters;
use crate::layout::Order;
use crate::layout::element_count;
use crate::range::Range;
use crate::range::Resolved;
use crate::range::transform_ranges;
use crate::reduce::Reduced;
use crate::reduce::drop_dimensions;

/// The flat offsets selected by one [`Range`] per axis of an array,
/// enumerated in row-major order of the reduced shape. A view owns its
/// odometer state: [`View::current`] reads the offset of the current
/// position and [`View::advance`] steps to the next one, until
/// [`View::is_done`].
#[derive(Debug, Clone)]
pub struct View {
    offset: usize,
    ranges: Vec<Resolved>,
    coefficients: Vec<usize>,
    shape: Vec<usize>,
    counters: Vec<usize>,
    /// Number of positions in a full cycle.
    len: usize,
    /// Number of positions stepped past in the current cycle.
    visited: usize,
    cumsum: Vec<usize>,
    /// Lowest axis whose partial sum is stale.
    valid_from: usize,
    /// The flat offset of the current counters.
    flat: usize,
    done: bool,
}

impl View {
    /// Build the view selecting `ranges` from an array with the given
    /// `dims`, laid out in `order`.
    pub fn new(ranges: &[Range], dims: &[usize], order: &Order) -> Result<Self, ArrayError> {
        let resolved = transform_ranges(ranges, dims)?;
        let coefficients = order.coefficients(dims)?;
        let reduced = drop_dimensions(resolved, &coefficients);
        // Gathers may repeat positions, so the reduced shape can count
        // more positions than the array has elements.
        let len = element_count(&reduced.shape())?;
        Ok(Self::from_reduced(reduced, len))
    }

    /// The view of every element of an array with the given dims and
    /// coefficients, holding `len` elements.
    pub(crate) fn full(dims: &[usize], coefficients: Vec<usize>, len: usize) -> Self {
        Self::from_reduced(
            Reduced {
                offset: 0,
                ranges: dims.iter().map(|&d| Resolved::Span(0, d)).collect(),
                coefficients,
            },
            len,
        )
    }

    fn from_reduced(reduced: Reduced, len: usize) -> Self {
        let shape = reduced.shape();
        let Reduced {
            offset,
            ranges,
            coefficients,
        } = reduced;
        let rank = shape.len();
        let mut view = Self {
            offset,
            ranges,
            coefficients,
            counters: vec![0; rank],
            len,
            visited: 0,
            cumsum: vec![0; rank],
            valid_from: 0,
            flat: offset,
            done: shape.contains(&0),
            shape,
        };
        if !view.done {
            view.refresh();
        }
        tracing::trace!(offset, shape = ?view.shape, empty = view.done, "view");
        view
    }

    fn refresh(&mut self) {
        self.flat = map_counters(
            self.offset,
            &self.ranges,
            &self.coefficients,
            &self.counters,
            &mut self.cumsum,
            self.valid_from,
        );
        self.valid_from = self.ranges.len();
    }

    /// The flat offset of the current position. Must not be called
    /// once the view [`is_done`](Self::is_done).
    pub fn current(&self) -> usize {
        debug_assert!(!self.done, "current() on an exhausted view");
        self.flat
    }

    /// Step to the next position. Returns `true` once every position
    /// has been visited; the counters are then all back at zero.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return true;
        }
        self.visited += 1;
        let (changed, wrapped) = increment(&mut self.counters, &self.shape);
        self.valid_from = changed;
        if wrapped {
            self.done = true;
        } else {
            self.refresh();
        }
        self.done
    }

    /// Whether every position has been visited.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// The reduced shape: the extent of every surviving axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The number of surviving axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// The number of positions the view visits in a full cycle.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The number of positions not yet stepped past.
    pub fn remaining(&self) -> usize {
        if self.done {
            0
        } else {
            self.len - self.visited
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The contribution of the dropped axes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The coefficients of the surviving axes.
    pub fn coefficients(&self) -> &[usize] {
        &self.coefficients
    }

    /// The current position, one counter per surviving axis.
    pub fn counters(&self) -> &[usize] {
        &self.counters
    }
}

impl IntoIterator for View {
    type Item = usize;
    type IntoIter = ViewIter;

    fn into_iter(self) -> Self::IntoIter {
        let remaining = self.remaining();
        ViewIter {
            view: self,
            remaining,
        }
    }
}

/// Iterator over the flat offsets of a [`View`], in row-major order of
/// the reduced shape.
#[derive(Debug, Clone)]
pub struct ViewIter {
    view: View,
    remaining: usize,
}

impl Iterator for ViewIter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.view.is_done() {
            return None;
        }
        let flat = self.view.current();
        self.view.advance();
        self.remaining -= 1;
        Some(flat)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ViewIter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(ranges: &[Range], dims: &[usize], order: &Order) -> Vec<usize> {
        View::new(ranges, dims, order).unwrap().into_iter().collect()
    }

    #[test]
    fn test_full_row_major() {
        assert!(
            offsets(&[Range::All, Range::All, Range::All], &[2, 3, 4], &Order::RowMajor)
                .into_iter()
                .eq(0..24)
        );
    }

    #[test]
    fn test_full_column_major() {
        // Logical row-major walk over column-major storage.
        assert_eq!(
            offsets(&[Range::All, Range::All], &[2, 3], &Order::ColumnMajor),
            vec![0, 2, 4, 1, 3, 5]
        );
    }

    #[test]
    fn test_drop_and_span() {
        // Row 1, columns 0..2 of a 3 x 4 array.
        let view =
            View::new(&[Range::Index(1), Range::Span(0, 2)], &[3, 4], &Order::RowMajor).unwrap();
        assert_eq!(view.offset(), 4);
        assert_eq!(view.shape(), &[2]);
        assert_eq!(view.coefficients(), &[1]);
        assert_eq!(view.into_iter().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_gather() {
        assert_eq!(
            offsets(
                &[Range::List(vec![2, 0]), Range::List(vec![-1, 1, -1])],
                &[3, 4],
                &Order::RowMajor
            ),
            vec![11, 9, 11, 3, 1, 3]
        );
    }

    #[test]
    fn test_rank_0() {
        let mut view =
            View::new(&[Range::Index(-1), Range::Index(2)], &[3, 4], &Order::RowMajor).unwrap();
        assert_eq!(view.rank(), 0);
        assert_eq!(view.len(), 1);
        assert!(!view.is_done());
        assert_eq!(view.current(), 10);
        assert!(view.advance());
        assert!(view.is_done());
    }

    #[test]
    fn test_empty() {
        let view =
            View::new(&[Range::All, Range::List(vec![])], &[3, 4], &Order::RowMajor).unwrap();
        assert!(view.is_done());
        assert!(view.is_empty());
        assert_eq!(view.into_iter().count(), 0);

        let view = View::new(&[Range::All, Range::All], &[0, 4], &Order::RowMajor).unwrap();
        assert!(view.is_done());
        assert_eq!(view.into_iter().len(), 0);
    }

    #[test]
    fn test_full_cycle_resets_counters() {
        let mut view = View::new(
            &[Range::Span(1, 3), Range::All, Range::List(vec![0, 2])],
            &[3, 2, 3],
            &Order::RowMajor,
        )
        .unwrap();
        let mut visited = 0;
        loop {
            let _ = view.current();
            visited += 1;
            if view.advance() {
                break;
            }
        }
        assert_eq!(visited, view.len());
        assert_eq!(visited, 2 * 2 * 2);
        assert_eq!(view.counters(), &[0, 0, 0]);
        assert_eq!(view.remaining(), 0);
        // Further steps are no-ops.
        assert!(view.advance());
    }

    #[test]
    fn test_iter_after_advance() {
        let mut view = View::new(&[Range::All], &[3], &Order::RowMajor).unwrap();
        view.advance();
        assert_eq!(view.remaining(), 2);
        let iter = view.into_iter();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.collect::<Vec<_>>(), vec![1, 2]);

        let mut view = View::new(&[Range::Span(1, 0), Range::All], &[3, 4], &Order::RowMajor)
            .unwrap();
        for _ in 0..5 {
            view.advance();
        }
        let iter = view.clone().into_iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.collect::<Vec<_>>(), vec![9, 10, 11]);

        // Once the cycle completes nothing is left.
        while !view.advance() {}
        assert_eq!(view.into_iter().len(), 0);
    }

    #[test]
    fn test_gather_longer_than_axis() {
        let view = View::new(&[Range::List(vec![0; 5])], &[1], &Order::RowMajor).unwrap();
        assert_eq!(view.len(), 5);
        assert_eq!(view.into_iter().collect::<Vec<_>>(), vec![0; 5]);
    }

    #[test]
    fn test_huge_dims() {
        let view = View::new(&[Range::All, Range::All], &[usize::MAX, 0], &Order::ColumnMajor)
            .unwrap();
        assert!(view.is_done());
        assert_eq!(view.len(), 0);
        assert!(matches!(
            View::new(&[Range::Index(0), Range::Index(0)], &[usize::MAX, 2], &Order::RowMajor),
            Err(ArrayError::IncompatibleDimensions { .. })
        ));
    }

    #[test]
    fn test_size_hint() {
        let mut iter = View::new(&[Range::All, Range::Span(1, 0)], &[2, 3], &Order::RowMajor)
            .unwrap()
            .into_iter();
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            View::new(&[Range::Index(10)], &[3], &Order::RowMajor),
            Err(ArrayError::InvalidArrayIndex {
                index: 10,
                dimension: 3
            })
        ));
        assert!(matches!(
            View::new(&[Range::Span(3, 1)], &[3], &Order::RowMajor),
            Err(ArrayError::InvalidRange { .. })
        ));
        assert!(matches!(
            View::new(&[Range::All], &[3, 3], &Order::RowMajor),
            Err(ArrayError::IncompatibleDimensions { .. })
        ));
        assert!(matches!(
            View::new(&[Range::All], &[3], &Order::Permuted(vec![1])),
            Err(ArrayError::IncompatibleDimensions { .. })
        ));
    }
}

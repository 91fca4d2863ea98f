/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Views over dense n-dimensional arrays.
//!
//! Provides [`Array`], a dense array stored in a flat vector in
//! row-major, column-major or permuted-axis order, and [`View`], the
//! enumeration of the flat offsets selected by one [`Range`] per axis.
//! A range keeps an axis whole, fixes it at one position (dropping it
//! from the result), restricts it to an interval or gathers an
//! arbitrary list of positions.
//!
//! On top of views the crate provides reading ([`sub`]) and writing
//! ([`set_sub`]) of sub-arrays, row and column mapping
//! ([`map_rows`], [`map_columns`]) and [`transpose`].
//!
//! ```
//! use ndview::Array;
//! use ndview::Range;
//! use ndview::Value;
//! use ndview::ranges;
//! use ndview::sub;
//!
//! let a = Array::from_vec(vec![3, 4], (0..12).collect()).unwrap();
//! let corners = sub(&a, &ranges![vec![0, -1], vec![0, -1]]).unwrap();
//! assert_eq!(corners.into_array().unwrap().as_slice(), &[0, 3, 8, 11]);
//! assert_eq!(sub(&a, &ranges![-1, 1]).unwrap(), Value::Scalar(9));
//! assert!(sub(&a, &ranges![Range::All]).is_err());
//! ```

/// Dense arrays and the crate's error type.
pub mod array;
pub use array::Array;
pub use array::ArrayError;

/// Odometer enumeration of view coordinates.
pub mod counter;

/// Memory layouts and their coefficients.
pub mod layout;
pub use layout::LayoutMap;
pub use layout::Order;

/// Operations on arrays through views.
pub mod ops;
pub use ops::Indexable;
pub use ops::IndexableMut;
pub use ops::Value;
pub use ops::map_columns;
pub use ops::map_rows;
pub use ops::set_scalar;
pub use ops::set_sub;
pub use ops::sub;
pub use ops::transpose;

/// Text syntax for range specifications.
pub mod parse;

/// Range specifications and their resolution against axes.
pub mod range;
pub use range::Range;

/// Removal of the axes fixed by a view.
pub mod reduce;

/// Property-based generators for randomized test input.
#[cfg(test)]
pub mod strategy;

/// Iteration over the offsets selected by ranges.
pub mod view;
pub use view::View;
pub use view::ViewIter;

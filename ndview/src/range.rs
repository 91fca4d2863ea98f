/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::array::ArrayError;

/// A range specification for a single axis of an array.
///
/// Raw indices are signed. They are resolved against the size of the
/// axis they are applied to (see [`transform_index`]):
///
/// - a negative index `k` counts from the back, i.e. means `size + k`;
/// - `0` in the end position of a [`Range::Span`] means "up to the end
///   of the axis".
///
/// Ranges are convertible from native Rust values:
///
/// ```
/// use ndview::Range;
///
/// assert_eq!(Range::from(..), Range::All);
/// assert_eq!(Range::from(-1), Range::Index(-1));
/// assert_eq!(Range::from(1..3), Range::Span(1, 3));
/// assert_eq!(Range::from(2..), Range::Span(2, 0));
/// assert_eq!(Range::from((1, 0)), Range::Span(1, 0));
/// assert_eq!(Range::from(vec![2, 0, 2]), Range::List(vec![2, 0, 2]));
/// ```
#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Range {
    /// The whole axis. The axis is kept.
    All,
    /// A single position. The axis is dropped from the result.
    Index(isize),
    /// The half-open interval `start..end`. The axis is kept.
    Span(isize, isize),
    /// An arbitrary gather of positions, possibly repeated and in any
    /// order. The axis is kept, with the list's length as its size.
    List(Vec<isize>),
}

/// A [`Range`] after its indices have been resolved against an axis.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum Resolved {
    /// The axis is fixed at this position and removed from the view.
    Dropped(usize),
    /// `start..end`, with `start < end` unless the axis itself is empty.
    Span(usize, usize),
    /// Resolved gather positions.
    List(Vec<usize>),
}

impl Resolved {
    /// The number of positions this range selects along its axis.
    pub fn extent(&self) -> usize {
        match self {
            Resolved::Dropped(_) => 1,
            Resolved::Span(start, end) => end - start,
            Resolved::List(indices) => indices.len(),
        }
    }
}

/// Resolve a raw index against an axis of size `dimension`.
///
/// `is_end` selects the convention for the exclusive end of a span:
/// `0` then means `dimension`, and `dimension` itself is a valid
/// result.
///
/// ```text
/// index == 0  =>  is_end ? dimension : 0
/// index <  0  =>  dimension + index
/// index >  0  =>  index
/// ```
///
/// The result must lie in `[0, dimension)`, or `[0, dimension]` for
/// an end, otherwise [`ArrayError::InvalidArrayIndex`] is returned.
pub fn transform_index(index: isize, dimension: usize, is_end: bool) -> Result<usize, ArrayError> {
    let invalid = || ArrayError::InvalidArrayIndex { index, dimension };
    let resolved = match index {
        0 if is_end => dimension,
        index if index < 0 => dimension
            .checked_sub(index.unsigned_abs())
            .ok_or_else(invalid)?,
        index => index.unsigned_abs(),
    };
    let in_bounds = if is_end {
        resolved <= dimension
    } else {
        resolved < dimension
    };
    if in_bounds {
        Ok(resolved)
    } else {
        Err(invalid())
    }
}

/// Resolve one axis' range specification against its size.
pub fn transform_range(range: &Range, dimension: usize) -> Result<Resolved, ArrayError> {
    match range {
        Range::All => Ok(Resolved::Span(0, dimension)),
        Range::Index(index) => Ok(Resolved::Dropped(transform_index(*index, dimension, false)?)),
        Range::Span(start, end) => {
            // A start at the end of the axis selects nothing.
            let resolved_start = match *start {
                start if start > 0 && start.unsigned_abs() == dimension => dimension,
                start => transform_index(start, dimension, false)?,
            };
            let resolved_end = transform_index(*end, dimension, true)?;
            if resolved_start >= resolved_end {
                return Err(ArrayError::InvalidRange {
                    start: *start,
                    end: *end,
                    dimension,
                });
            }
            Ok(Resolved::Span(resolved_start, resolved_end))
        }
        Range::List(indices) => indices
            .iter()
            .map(|&index| transform_index(index, dimension, false))
            .collect::<Result<Vec<_>, _>>()
            .map(Resolved::List),
    }
}

/// Resolve one range per axis. The number of ranges must equal the
/// rank of `dims`.
pub fn transform_ranges(ranges: &[Range], dims: &[usize]) -> Result<Vec<Resolved>, ArrayError> {
    if ranges.len() != dims.len() {
        return Err(ArrayError::IncompatibleDimensions {
            reason: format!(
                "{} ranges given for an array of rank {}",
                ranges.len(),
                dims.len()
            ),
        });
    }
    ranges
        .iter()
        .zip(dims)
        .map(|(range, &dimension)| transform_range(range, dimension))
        .collect()
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::All => write!(f, "*"),
            Range::Index(index) => write!(f, "{}", index),
            Range::Span(start, end) => write!(f, "{}:{}", start, end),
            Range::List(indices) => {
                write!(f, "[")?;
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", index)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl FromStr for Range {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ranges = crate::parse::parse(s)?;
        match ranges.len() {
            1 => Ok(ranges.remove(0)),
            n => Err(anyhow::anyhow!("expected a single range, got {n} in {s:?}")),
        }
    }
}

impl From<std::ops::RangeFull> for Range {
    fn from(_: std::ops::RangeFull) -> Self {
        Range::All
    }
}

// Out-of-range values saturate and are then rejected by
// `transform_index`.
fn signed<T: TryInto<isize>>(value: T) -> isize {
    value.try_into().unwrap_or(isize::MAX)
}

macro_rules! impl_from_integer {
    ( $( $t:ty ),* ) => {
        $(
            impl From<$t> for Range {
                fn from(index: $t) -> Self {
                    Range::Index(signed(index))
                }
            }

            impl From<std::ops::Range<$t>> for Range {
                fn from(r: std::ops::Range<$t>) -> Self {
                    Range::Span(signed(r.start), signed(r.end))
                }
            }

            impl From<std::ops::RangeFrom<$t>> for Range {
                fn from(r: std::ops::RangeFrom<$t>) -> Self {
                    Range::Span(signed(r.start), 0)
                }
            }

            impl From<($t, $t)> for Range {
                fn from((start, end): ($t, $t)) -> Self {
                    Range::Span(signed(start), signed(end))
                }
            }

            impl From<Vec<$t>> for Range {
                fn from(indices: Vec<$t>) -> Self {
                    Range::List(indices.into_iter().map(signed).collect())
                }
            }

            impl<const N: usize> From<[$t; N]> for Range {
                fn from(indices: [$t; N]) -> Self {
                    Range::List(indices.into_iter().map(signed).collect())
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, isize, usize);

/// Build a `Vec<Range>`, converting each argument with
/// [`Range::from`].
///
/// ```
/// use ndview::Range;
///
/// let r = ndview::ranges![1, Range::All, (0, 2), vec![3, -1]];
/// assert_eq!(
///     r,
///     vec![
///         Range::Index(1),
///         Range::All,
///         Range::Span(0, 2),
///         Range::List(vec![3, -1]),
///     ]
/// );
/// ```
#[macro_export]
macro_rules! ranges {
    ( $( $range:expr ),* $(,)? ) => {
        vec![ $( $crate::range::Range::from($range) ),* ]
    };
}

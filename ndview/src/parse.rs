/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! A compact text syntax for range specifications, one range per
//! axis:
//! ```text
//! ranges   ::= range ( "," range )*
//! range    ::= all | list | span | index
//! all      ::= "*"
//! list     ::= "[" ( integer ( "," integer )* )? "]"
//! span     ::= integer? ":" integer?
//! index    ::= integer
//! integer  ::= "-"? [0-9]+
//! ```
//!
//! Integers keep the raw encoding of [`Range`]: negative values count
//! from the back of the axis and `0` as the end of a span means the
//! end of the axis. A missing start is `0` and a missing end is the end
//! of the axis, so `"1:, *, -1, [2,0,2]"` is the same as
//! `ranges![(1, 0), Range::All, -1, vec![2, 0, 2]]`.
//!
//! Whitespace is not part of the grammar; [`parse`] strips it.

use nom::IResult;
use nom::Parser as _;
use nom::branch::alt;
use nom::character::complete::char;
use nom::character::complete::digit1;
use nom::combinator::map;
use nom::combinator::map_res;
use nom::combinator::opt;
use nom::combinator::recognize;
use nom::multi::separated_list0;
use nom::multi::separated_list1;
use nom::sequence::delimited;
use nom::sequence::separated_pair;

use crate::range::Range;

fn integer(input: &str) -> IResult<&str, isize> {
    map_res(recognize((opt(char('-')), digit1)), str::parse).parse(input)
}

fn all(input: &str) -> IResult<&str, Range> {
    map(char('*'), |_| Range::All).parse(input)
}

fn list(input: &str) -> IResult<&str, Range> {
    map(
        delimited(char('['), separated_list0(char(','), integer), char(']')),
        Range::List,
    )
    .parse(input)
}

fn span(input: &str) -> IResult<&str, Range> {
    map(
        separated_pair(opt(integer), char(':'), opt(integer)),
        |(start, end)| Range::Span(start.unwrap_or(0), end.unwrap_or(0)),
    )
    .parse(input)
}

fn index(input: &str) -> IResult<&str, Range> {
    map(integer, Range::Index).parse(input)
}

fn range(input: &str) -> IResult<&str, Range> {
    alt((all, list, span, index)).parse(input)
}

fn ranges(input: &str) -> IResult<&str, Vec<Range>> {
    separated_list1(char(','), range).parse(input)
}

/// Parses a comma-separated list of ranges, ignoring all whitespace.
///
/// ```
/// use ndview::Range;
///
/// let r = ndview::parse::parse("1:3, *, -1, [0, 2]").unwrap();
/// assert_eq!(
///     r,
///     vec![
///         Range::Span(1, 3),
///         Range::All,
///         Range::Index(-1),
///         Range::List(vec![0, 2]),
///     ]
/// );
/// ```
pub fn parse(input: &str) -> anyhow::Result<Vec<Range>> {
    use nom::combinator::all_consuming;

    let input: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let (_, ranges) = all_consuming(ranges)
        .parse(&input)
        .map_err(|err| anyhow::anyhow!("failed to parse ranges: {err:?} (input: {input:?})"))?;
    Ok(ranges)
}

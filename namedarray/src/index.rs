/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Index expressions and their resolution against an [`Axis`].
//!
//! An [`IndexExpr`] is the caller-supplied addressing value for one
//! axis. Its shape varies at the call site: a single label, a raw
//! position, a range, or a sequence mixing any of these. Resolution
//! dispatches on that shape and consults the axis only where labels
//! appear; positions and ranges pass through untouched, with
//! out-of-range failures deferred to the dense storage layer.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::axis::Axis;
use crate::axis::AxisError;

/// A range of positions, with a stride. Ranges are convertible from
/// native Rust ranges; the unbounded forms leave the end open until
/// the axis size is known.
///
/// Deriving `Eq`, `Ord` and `Hash` is sound because all fields are
/// `Ord` and comparison is purely structural over `(start, end,
/// step)`.
#[derive(
    Debug,
    Clone,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    PartialOrd,
    Ord
)]
pub struct Range(pub usize, pub Option<usize>, pub usize);

impl Range {
    pub(crate) fn resolve(&self, size: usize) -> (usize, usize, usize) {
        match self {
            Range(begin, Some(end), step) => (*begin, std::cmp::min(size, *end), *step),
            Range(begin, None, step) => (*begin, size, *step),
        }
    }

    /// The concrete positions this range covers on an axis of the
    /// given size, in order.
    pub fn positions(&self, size: usize) -> Vec<usize> {
        let (begin, end, step) = self.resolve(size);
        if begin >= end {
            return Vec::new();
        }
        (begin..end).step_by(step).collect()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range(begin, None, step) => write!(f, "{}::{}", begin, step),
            Range(begin, Some(end), step) => write!(f, "{}:{}:{}", begin, end, step),
        }
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self(r.start, Some(r.end), 1)
    }
}

impl From<std::ops::RangeInclusive<usize>> for Range {
    fn from(r: std::ops::RangeInclusive<usize>) -> Self {
        Self(*r.start(), Some(*r.end() + 1), 1)
    }
}

impl From<std::ops::RangeFrom<usize>> for Range {
    fn from(r: std::ops::RangeFrom<usize>) -> Self {
        Self(r.start, None, 1)
    }
}

impl From<std::ops::RangeTo<usize>> for Range {
    fn from(r: std::ops::RangeTo<usize>) -> Self {
        Self(0, Some(r.end), 1)
    }
}

impl From<std::ops::RangeFull> for Range {
    fn from(_: std::ops::RangeFull) -> Self {
        Self(0, None, 1)
    }
}

/// An addressing expression for one axis of a
/// [`NamedArray`](crate::NamedArray).
///
/// Expressions are usually built implicitly through `From`
/// conversions, so call sites read like plain indexing:
///
/// ```
/// # use namedarray::IndexExpr;
/// let by_label: IndexExpr = "latency".into();
/// let by_position: IndexExpr = 3.into();
/// let by_range: IndexExpr = (1..4).into();
/// let by_labels: IndexExpr = ["a", "c"].into();
/// ```
///
/// Mixed sequences are built with the [`dsl`] constructors:
///
/// ```
/// use namedarray::dsl::at;
/// use namedarray::dsl::label;
/// use namedarray::dsl::seq;
///
/// let mixed = seq([label("a"), at(2), label("b")]);
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub enum IndexExpr {
    /// A symbolic label, resolved against the axis.
    Label(String),
    /// A raw zero-based position, passed through untouched.
    At(usize),
    /// A range of positions, passed through untouched.
    Span(Range),
    /// A sequence of subexpressions, each resolved independently.
    Seq(Vec<IndexExpr>),
}

impl IndexExpr {
    /// Resolves this expression against `axis`, producing the
    /// normalized index consumed by dense storage.
    ///
    /// Dispatch follows the shape of the expression, in this order of
    /// precedence:
    /// 1. a label resolves to its registered position;
    /// 2. a sequence resolves each element through this same dispatch
    ///    and collects the covered positions in order;
    /// 3. anything else (a position, a range) passes through
    ///    unchanged.
    ///
    /// The only failure is [`AxisError::UnknownLabel`], surfaced from
    /// any nesting depth. Positions and ranges are trusted here;
    /// indexing an out-of-range position fails at the storage layer
    /// instead.
    pub fn resolve(&self, axis: &Axis) -> Result<Resolved, AxisError> {
        match self {
            IndexExpr::Label(label) => Ok(Resolved::At(axis.position(label)?)),
            IndexExpr::Seq(exprs) => {
                let mut positions = Vec::new();
                for expr in exprs {
                    match expr.resolve(axis)? {
                        Resolved::At(pos) => positions.push(pos),
                        Resolved::Span(range) => positions.extend(range.positions(axis.len())),
                        Resolved::Set(set) => positions.extend(set),
                    }
                }
                Ok(Resolved::Set(positions))
            }
            IndexExpr::At(pos) => Ok(Resolved::At(*pos)),
            IndexExpr::Span(range) => Ok(Resolved::Span(range.clone())),
        }
    }
}

impl From<&str> for IndexExpr {
    fn from(label: &str) -> Self {
        IndexExpr::Label(label.to_string())
    }
}

impl From<String> for IndexExpr {
    fn from(label: String) -> Self {
        IndexExpr::Label(label)
    }
}

impl From<usize> for IndexExpr {
    fn from(position: usize) -> Self {
        IndexExpr::At(position)
    }
}

// Conversions for the other common integer types, so bare literals
// index without annotation. Positions are zero-based from the front;
// a negative value is a caller error.
macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for IndexExpr {
                fn from(position: $ty) -> Self {
                    let position = usize::try_from(position).expect("negative position");
                    IndexExpr::At(position)
                }
            }
        )*
    };
}

from_int!(u32, u64, i32, i64);

impl From<Range> for IndexExpr {
    fn from(range: Range) -> Self {
        IndexExpr::Span(range)
    }
}

impl From<std::ops::Range<usize>> for IndexExpr {
    fn from(r: std::ops::Range<usize>) -> Self {
        IndexExpr::Span(r.into())
    }
}

impl From<std::ops::RangeInclusive<usize>> for IndexExpr {
    fn from(r: std::ops::RangeInclusive<usize>) -> Self {
        IndexExpr::Span(r.into())
    }
}

impl From<std::ops::RangeFrom<usize>> for IndexExpr {
    fn from(r: std::ops::RangeFrom<usize>) -> Self {
        IndexExpr::Span(r.into())
    }
}

impl From<std::ops::RangeTo<usize>> for IndexExpr {
    fn from(r: std::ops::RangeTo<usize>) -> Self {
        IndexExpr::Span(r.into())
    }
}

impl From<std::ops::RangeFull> for IndexExpr {
    fn from(r: std::ops::RangeFull) -> Self {
        IndexExpr::Span(r.into())
    }
}

impl<E: Into<IndexExpr>> From<Vec<E>> for IndexExpr {
    fn from(exprs: Vec<E>) -> Self {
        IndexExpr::Seq(exprs.into_iter().map(Into::into).collect())
    }
}

impl<E: Into<IndexExpr>, const N: usize> From<[E; N]> for IndexExpr {
    fn from(exprs: [E; N]) -> Self {
        IndexExpr::Seq(exprs.into_iter().map(Into::into).collect())
    }
}

/// The normalized index produced by [`IndexExpr::resolve`]: a single
/// position, a range of positions, or an explicit position set.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Resolved {
    At(usize),
    Span(Range),
    Set(Vec<usize>),
}

impl Resolved {
    /// Materializes the covered positions on an axis of the given
    /// size.
    pub fn indices(&self, size: usize) -> Vec<usize> {
        match self {
            Resolved::At(pos) => vec![*pos],
            Resolved::Span(range) => range.positions(size),
            Resolved::Set(positions) => positions.clone(),
        }
    }

    /// The single position this index addresses, if it addresses
    /// exactly one.
    pub fn as_single(&self) -> Option<usize> {
        match self {
            Resolved::At(pos) => Some(*pos),
            _ => None,
        }
    }
}

/// Constructor functions for building `IndexExpr` values, convenient
/// for sequences mixing labels and positions.
pub mod dsl {
    use super::IndexExpr;
    use super::Range;

    pub fn label(label: impl Into<String>) -> IndexExpr {
        IndexExpr::Label(label.into())
    }

    pub fn at(position: usize) -> IndexExpr {
        IndexExpr::At(position)
    }

    pub fn span(range: impl Into<Range>) -> IndexExpr {
        IndexExpr::Span(range.into())
    }

    pub fn seq(exprs: impl IntoIterator<Item = IndexExpr>) -> IndexExpr {
        IndexExpr::Seq(exprs.into_iter().collect())
    }
}

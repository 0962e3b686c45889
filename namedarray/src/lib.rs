/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Labeled two-dimensional arrays.
//!
//! Provides [`NamedArray`], a dense numeric matrix whose rows and
//! columns are addressable by symbolic names as well as by raw
//! positions, ranges, and sequences of either. The crate is the
//! index-resolution layer over the storage: numeric semantics belong
//! entirely to [`ndarray`], which owns allocation and the buffer
//! representation.
//!
//! ```
//! use namedarray::NamedArray;
//!
//! let mut costs = NamedArray::from_rows(
//!     ["a", "b"],
//!     ["x", "y", "z"],
//!     vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
//! )
//! .unwrap();
//!
//! assert_eq!(costs.get("a", "y").unwrap(), 2.0);
//! costs.set("b", "x", 40.0).unwrap();
//! assert_eq!(costs.get(1, 0).unwrap(), 40.0);
//! ```

/// Per-axis label registries mapping names to positions.
pub mod axis;

/// Index expressions and their resolution against an axis.
pub mod index;

/// The labeled array facade over dense storage.
pub mod array;

pub use array::ArrayError;
pub use array::NamedArray;
pub use axis::Axis;
pub use axis::AxisError;
/// DSL-style constructors for building `IndexExpr` values.
pub use index::dsl;
pub use index::IndexExpr;
pub use index::Range;
pub use index::Resolved;

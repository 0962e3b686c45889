/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// The type of error for axis operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AxisError {
    #[error("duplicate labels: {unique} unique of {supplied} supplied")]
    DuplicateLabels { supplied: usize, unique: usize },

    #[error("unknown label `{label}`")]
    UnknownLabel { label: String },
}

/// An axis is an ordered sequence of unique labels together with the
/// mapping from each label to its zero-based position in that
/// sequence. One axis describes the rows of a
/// [`NamedArray`](crate::NamedArray), another its columns.
///
/// An axis is write-once: it is built from its label sequence at
/// construction and never mutated afterward.
///
/// ```
/// # use namedarray::Axis;
/// let axis = Axis::new(["a", "b", "c"]).unwrap();
/// assert_eq!(axis.len(), 3);
/// assert_eq!(axis.position("b").unwrap(), 1);
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct Axis {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Axis {
    /// Creates a new axis from an ordered sequence of labels. Each
    /// label is assigned the position at which it appears.
    ///
    /// Fails with [`AxisError::DuplicateLabels`] if any label repeats.
    /// Duplicates are detected by comparing the size of the resolved
    /// mapping against the length of the input sequence: a repeated
    /// label collapses onto one entry, leaving the mapping short.
    pub fn new<I, L>(labels: I) -> Result<Self, AxisError>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let positions: HashMap<String, usize> = labels
            .iter()
            .enumerate()
            .map(|(pos, label)| (label.clone(), pos))
            .collect();
        if positions.len() != labels.len() {
            return Err(AxisError::DuplicateLabels {
                supplied: labels.len(),
                unique: positions.len(),
            });
        }
        Ok(Self { labels, positions })
    }

    /// The number of labels on this axis.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The position registered for `label`, or
    /// [`AxisError::UnknownLabel`] if the label is absent.
    pub fn position(&self, label: &str) -> Result<usize, AxisError> {
        self.positions
            .get(label)
            .copied()
            .ok_or_else(|| AxisError::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// The labels of this axis, in position order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

// How many label=position entries Display renders before eliding the
// rest.
const DISPLAY_LIMIT: usize = 8;

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (pos, label) in self.labels.iter().take(DISPLAY_LIMIT).enumerate() {
            if pos > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", label, pos)?;
        }
        if self.labels.len() > DISPLAY_LIMIT {
            write!(f, ",...")?;
        }
        write!(f, "}}")
    }
}

/// Construct the label sequence for an axis from bare identifiers.
///
/// ```
/// let axis = namedarray::Axis::new(namedarray::axes!(host, gpu)).unwrap();
/// assert_eq!(axis.labels(), &["host".to_string(), "gpu".to_string()]);
/// ```
#[macro_export]
macro_rules! axes {
    ( $( $label:ident ),* $(,)? ) => {
        {
            let mut labels: Vec<String> = Vec::new();
            $(
                labels.push(stringify!($label).to_string());
            )*
            labels
        }
    };
}

/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use ndarray::Array2;
use num_traits::Zero;

use crate::axis::Axis;
use crate::axis::AxisError;
use crate::index::IndexExpr;

/// The type of error for labeled array operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ArrayError {
    #[error("row count mismatch: {labels} labels, {rows} data rows")]
    RowCountMismatch { labels: usize, rows: usize },

    #[error("column count mismatch: {labels} labels, {columns} data columns")]
    ColumnCountMismatch { labels: usize, columns: usize },

    #[error("element count mismatch: {got} elements for a {rows}x{columns} array")]
    ElementCountMismatch {
        rows: usize,
        columns: usize,
        got: usize,
    },

    #[error("ragged data: row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("expression addresses more than one cell")]
    NotScalar,

    #[error(transparent)]
    Axis(#[from] AxisError),
}

/// A dense two-dimensional array whose rows and columns are
/// addressable by name as well as by position.
///
/// A `NamedArray` owns one [`Array2`] buffer and two [`Axis`] values,
/// one per dimension. The buffer shape is fixed at construction:
/// `(row_axis.len(), column_axis.len())`. Cells are mutable through
/// indexed writes, but rows and columns are never added or removed.
///
/// Any [`IndexExpr`]-convertible value addresses an axis, so labels,
/// positions, ranges and sequences mix freely:
///
/// ```
/// # use namedarray::NamedArray;
/// let mut array = NamedArray::new(["a", "b"], ["x", "y", "z"]).unwrap();
/// array.set("a", "y", 2.5).unwrap();
/// assert_eq!(array.get("a", "y").unwrap(), 2.5);
/// assert_eq!(array.get(0, 1).unwrap(), 2.5);
///
/// // A range of rows by position, two columns by name:
/// let sub = array.select(.., ["x", "z"]).unwrap();
/// assert_eq!(sub.dim(), (2, 2));
/// ```
///
/// `NamedArray` performs no internal locking. Callers that share one
/// across threads must serialize access externally, including around
/// any read/write sequence that must be atomic as a group.
#[derive(Clone, PartialEq, Debug)]
pub struct NamedArray<T = f64> {
    rows: Axis,
    columns: Axis,
    data: Array2<T>,
}

impl<T> NamedArray<T> {
    /// Creates an array with the given row and column labels and a
    /// zero-filled buffer of the corresponding shape.
    ///
    /// Fails with [`AxisError::DuplicateLabels`] if either label
    /// sequence contains repeats.
    pub fn new<R, C, L, M>(row_labels: R, column_labels: C) -> Result<Self, ArrayError>
    where
        R: IntoIterator<Item = L>,
        C: IntoIterator<Item = M>,
        L: Into<String>,
        M: Into<String>,
        T: Clone + Zero,
    {
        let rows = Axis::new(row_labels)?;
        let columns = Axis::new(column_labels)?;
        tracing::debug!(
            rows = rows.len(),
            columns = columns.len(),
            "allocating zero-filled array"
        );
        let data = Array2::zeros((rows.len(), columns.len()));
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    /// Creates an array from existing nested data, adopting it as the
    /// buffer instead of zero-filling.
    ///
    /// The data is validated before anything is constructed: the row
    /// label count must equal the number of data rows, the column
    /// label count must equal the length of the first row, the total
    /// element count must equal rows × columns, and every row must
    /// have the same length as the first.
    pub fn from_rows<R, C, L, M>(
        row_labels: R,
        column_labels: C,
        data: Vec<Vec<T>>,
    ) -> Result<Self, ArrayError>
    where
        R: IntoIterator<Item = L>,
        C: IntoIterator<Item = M>,
        L: Into<String>,
        M: Into<String>,
    {
        let row_labels: Vec<String> = row_labels.into_iter().map(Into::into).collect();
        let column_labels: Vec<String> = column_labels.into_iter().map(Into::into).collect();
        if row_labels.len() != data.len() {
            return Err(ArrayError::RowCountMismatch {
                labels: row_labels.len(),
                rows: data.len(),
            });
        }
        let first = data.first().map_or(0, Vec::len);
        if !data.is_empty() && column_labels.len() != first {
            return Err(ArrayError::ColumnCountMismatch {
                labels: column_labels.len(),
                columns: first,
            });
        }
        let total: usize = data.iter().map(Vec::len).sum();
        if total != row_labels.len() * column_labels.len() {
            return Err(ArrayError::ElementCountMismatch {
                rows: row_labels.len(),
                columns: column_labels.len(),
                got: total,
            });
        }
        if let Some((row, got)) = data
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != first)
        {
            return Err(ArrayError::RaggedRow {
                row,
                expected: first,
                got,
            });
        }

        let rows = Axis::new(row_labels)?;
        let columns = Axis::new(column_labels)?;
        tracing::debug!(
            rows = rows.len(),
            columns = columns.len(),
            "adopting existing data"
        );
        let shape = (rows.len(), columns.len());
        let flat: Vec<T> = data.into_iter().flatten().collect();
        let data = Array2::from_shape_vec(shape, flat).expect("shape already validated");
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    /// Reads the single cell addressed by the pair of expressions.
    /// Both expressions must resolve to exactly one position; use
    /// [`select`](Self::select) for multi-cell reads.
    ///
    /// # Panics
    /// Panics if a resolved position is out of range for the buffer,
    /// as raw positions are trusted and checked only by the storage
    /// layer.
    pub fn get(
        &self,
        row: impl Into<IndexExpr>,
        column: impl Into<IndexExpr>,
    ) -> Result<T, ArrayError>
    where
        T: Clone,
    {
        let row = row
            .into()
            .resolve(&self.rows)?
            .as_single()
            .ok_or(ArrayError::NotScalar)?;
        let column = column
            .into()
            .resolve(&self.columns)?
            .as_single()
            .ok_or(ArrayError::NotScalar)?;
        Ok(self.data[[row, column]].clone())
    }

    /// Reads the sub-array addressed by the pair of expressions. Each
    /// expression is resolved independently against its axis; the
    /// result holds the addressed rows and columns in expression
    /// order.
    ///
    /// # Panics
    /// Panics if a resolved position is out of range for the buffer.
    pub fn select(
        &self,
        row: impl Into<IndexExpr>,
        column: impl Into<IndexExpr>,
    ) -> Result<Array2<T>, ArrayError>
    where
        T: Clone,
    {
        let row_indices = row.into().resolve(&self.rows)?.indices(self.rows.len());
        let column_indices = column
            .into()
            .resolve(&self.columns)?
            .indices(self.columns.len());
        Ok(Array2::from_shape_fn(
            (row_indices.len(), column_indices.len()),
            |(i, j)| self.data[[row_indices[i], column_indices[j]]].clone(),
        ))
    }

    /// Reads whole rows by a single flat expression against the outer
    /// axis, without column resolution. This is the single-expression
    /// counterpart to the pair forms: `select_rows(1..)` returns all
    /// but the first row across every column.
    ///
    /// # Panics
    /// Panics if a resolved position is out of range for the buffer.
    pub fn select_rows(&self, index: impl Into<IndexExpr>) -> Result<Array2<T>, ArrayError>
    where
        T: Clone,
    {
        let row_indices = index.into().resolve(&self.rows)?.indices(self.rows.len());
        Ok(Array2::from_shape_fn(
            (row_indices.len(), self.columns.len()),
            |(i, j)| self.data[[row_indices[i], j]].clone(),
        ))
    }

    /// Writes `value` into every cell addressed by the pair of
    /// expressions. A single/single pair writes one cell; range or
    /// sequence expressions broadcast the value across the addressed
    /// block. If either expression fails to resolve, nothing is
    /// written.
    ///
    /// # Panics
    /// Panics if a resolved position is out of range for the buffer.
    pub fn set(
        &mut self,
        row: impl Into<IndexExpr>,
        column: impl Into<IndexExpr>,
        value: T,
    ) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        let row_indices = row.into().resolve(&self.rows)?.indices(self.rows.len());
        let column_indices = column
            .into()
            .resolve(&self.columns)?
            .indices(self.columns.len());
        for &r in &row_indices {
            for &c in &column_indices {
                self.data[[r, c]] = value.clone();
            }
        }
        Ok(())
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// The shape of the buffer as `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// The row axis.
    pub fn row_axis(&self) -> &Axis {
        &self.rows
    }

    /// The column axis.
    pub fn column_axis(&self) -> &Axis {
        &self.columns
    }

    /// The underlying buffer.
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }
}

impl<T: fmt::Display> fmt::Display for NamedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows: {}", self.rows)?;
        writeln!(f, "columns: {}", self.columns)?;
        write!(f, "{}", self.data)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::dsl::at;
    use crate::dsl::label;
    use crate::dsl::seq;

    fn sample() -> NamedArray<f64> {
        NamedArray::from_rows(
            ["a", "b"],
            ["x", "y", "z"],
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_zero_filled() {
        let array = NamedArray::<f64>::new(["a", "b"], ["x", "y"]).unwrap();
        assert_eq!(array.shape(), (2, 2));
        assert_eq!(array.get("a", "x").unwrap(), 0.0);
        assert!(array.data().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        assert!(matches!(
            NamedArray::<f64>::new(["a", "a"], ["x", "y"]).unwrap_err(),
            ArrayError::Axis(AxisError::DuplicateLabels { .. })
        ));
        assert!(matches!(
            NamedArray::<f64>::new(["a", "b"], ["x", "x"]).unwrap_err(),
            ArrayError::Axis(AxisError::DuplicateLabels { .. })
        ));
    }

    #[test]
    fn test_from_rows() {
        let array = sample();
        assert_eq!(array.len(), 2);
        assert_eq!(array.shape(), (2, 3));
        assert_eq!(array.get("a", "y").unwrap(), 2.0);
        assert_eq!(array.get("b", "z").unwrap(), 6.0);
    }

    #[test]
    fn test_from_rows_row_count_mismatch() {
        assert!(matches!(
            NamedArray::from_rows(["a", "b"], ["x", "y", "z"], vec![vec![1.0, 2.0, 3.0]])
                .unwrap_err(),
            ArrayError::RowCountMismatch { labels: 2, rows: 1 }
        ));
    }

    #[test]
    fn test_from_rows_column_count_mismatch() {
        assert!(matches!(
            NamedArray::from_rows(["a"], ["x", "y"], vec![vec![1.0, 2.0, 3.0]]).unwrap_err(),
            ArrayError::ColumnCountMismatch {
                labels: 2,
                columns: 3
            }
        ));
    }

    #[test]
    fn test_from_rows_ragged() {
        assert!(matches!(
            NamedArray::from_rows(
                ["a", "b", "c"],
                ["x", "y"],
                vec![vec![1.0, 2.0], vec![1.0, 2.0, 3.0], vec![1.0]]
            )
            .unwrap_err(),
            ArrayError::RaggedRow {
                row: 1,
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut array = NamedArray::<f64>::new(["a", "b"], ["x", "y"]).unwrap();
        array.set("a", "y", 9.0).unwrap();
        assert_eq!(array.get("a", "y").unwrap(), 9.0);
        assert_eq!(array.get(0, 1).unwrap(), 9.0);

        array.set(1, 0, -3.5).unwrap();
        assert_eq!(array.get("b", "x").unwrap(), -3.5);
    }

    #[test]
    fn test_set_broadcast() {
        let mut array = sample();
        array.set("a", .., 0.0).unwrap();
        assert_eq!(array.select_rows("a").unwrap(), array![[0.0, 0.0, 0.0]]);
        assert_eq!(array.get("b", "x").unwrap(), 4.0);

        array.set(.., ["x", "z"], 7.0).unwrap();
        assert_eq!(
            *array.data(),
            array![[7.0, 0.0, 7.0], [7.0, 5.0, 7.0]]
        );
    }

    #[test]
    fn test_select_mixed() {
        let array = sample();
        let sub = array
            .select(seq([label("b"), at(0)]), ["x", "z"])
            .unwrap();
        assert_eq!(sub, array![[4.0, 6.0], [1.0, 3.0]]);
    }

    #[test]
    fn test_select_span() {
        let array = sample();
        assert_eq!(array.select(.., 1..).unwrap(), array![[2.0, 3.0], [5.0, 6.0]]);
        assert_eq!(array.select("a", ..).unwrap(), array![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn test_select_rows_flat() {
        let array = sample();
        assert_eq!(array.select_rows(1).unwrap(), array![[4.0, 5.0, 6.0]]);
        assert_eq!(
            array.select_rows(..).unwrap(),
            array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
        );
        assert_eq!(array.select_rows("b").unwrap(), array![[4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_get_not_scalar() {
        let array = sample();
        assert!(matches!(
            array.get(.., "x").unwrap_err(),
            ArrayError::NotScalar
        ));
        assert!(matches!(
            array.get("a", ["x", "y"]).unwrap_err(),
            ArrayError::NotScalar
        ));
    }

    #[test]
    fn test_unknown_label_leaves_array_unchanged() {
        let mut array = sample();
        let before = array.clone();
        assert!(matches!(
            array.get("missing", "x").unwrap_err(),
            ArrayError::Axis(AxisError::UnknownLabel { label }) if label == "missing"
        ));
        assert!(matches!(
            array.set("a", "missing", 99.0).unwrap_err(),
            ArrayError::Axis(AxisError::UnknownLabel { label }) if label == "missing"
        ));
        assert_eq!(array, before);
    }

    #[test]
    fn test_integer_elements() {
        let mut array = NamedArray::<i64>::new(["r"], ["c", "d"]).unwrap();
        array.set("r", "d", 5).unwrap();
        assert_eq!(array.get("r", "d").unwrap(), 5);
        assert_eq!(array.get("r", "c").unwrap(), 0);
    }

    #[test]
    fn test_display() {
        let rendered = sample().to_string();
        assert!(rendered.starts_with("rows: {a=0,b=1}\ncolumns: {x=0,y=1,z=2}\n"));
    }
}

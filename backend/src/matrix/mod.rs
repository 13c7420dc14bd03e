//! Square integer matrix and the operations served over HTTP.
//!
//! This module provides:
//! - [`Matrix`]: validated n×n matrix of `i64`
//! - [`operations`]: the five operations and their dispatch enum
//!
//! ## Usage Flow
//!
//! ```text
//! CSV bytes → parser::parse_matrix → Matrix → Operation::apply → text body
//! ```

pub mod operations;

pub use operations::{operations_description, Operation, OperationOutput};

use crate::error::{MatrixError, MatrixResult};

/// A square matrix of signed integers.
///
/// Every row has the same length and the row count equals the column
/// count. Values are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<i64>>,
}

impl Matrix {
    /// Build a matrix from already-parsed rows, checking the shape.
    ///
    /// Applies the same shape rules, in the same order, as the CSV parser.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> MatrixResult<Self> {
        let cols = rows.first().map(Vec::len).ok_or(MatrixError::Empty)?;
        if rows.len() != cols {
            return Err(MatrixError::NotSquare {
                rows: rows.len(),
                cols,
            });
        }
        if let Some(row) = rows.iter().position(|r| r.len() != cols) {
            return Err(MatrixError::InconsistentRow { row });
        }
        Ok(Self { rows })
    }

    /// Wrap rows the parser has already validated.
    pub(crate) fn from_validated(rows: Vec<Vec<i64>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == rows.len()));
        Self { rows }
    }

    /// Side length n of the n×n matrix.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<i64>] {
        &self.rows
    }

    /// Elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.rows.iter().flat_map(|row| row.iter().copied())
    }

    /// Rows as comma-joined integers, one row per line.
    pub fn echo(&self) -> String {
        render_rows(&self.rows)
    }

    /// The transposed matrix: `output[i][j] = input[j][i]`.
    pub fn transpose(&self) -> Matrix {
        let n = self.size();
        let rows = (0..n)
            .map(|i| (0..n).map(|j| self.rows[j][i]).collect())
            .collect();
        Matrix { rows }
    }

    /// Transpose rendered the same way as [`Matrix::echo`].
    pub fn invert(&self) -> String {
        self.transpose().echo()
    }

    /// All elements on a single comma-joined line.
    pub fn flatten(&self) -> String {
        join(self.iter())
    }

    /// Sum of all elements. Overflow wraps.
    pub fn sum(&self) -> i64 {
        self.iter().fold(0i64, i64::wrapping_add)
    }

    /// Product of all elements starting from 1. Overflow wraps.
    pub fn product(&self) -> i64 {
        self.iter().fold(1i64, i64::wrapping_mul)
    }
}

fn render_rows(rows: &[Vec<i64>]) -> String {
    rows.iter()
        .map(|row| join(row.iter().copied()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn join(values: impl Iterator<Item = i64>) -> String {
    values
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[i64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_echo() {
        assert_eq!(m(&[&[1, 2], &[3, 4]]).echo(), "1,2\n3,4");
        assert_eq!(m(&[&[-7]]).echo(), "-7");
    }

    #[test]
    fn test_invert() {
        assert_eq!(m(&[&[1, 2], &[3, 4]]).invert(), "1,3\n2,4");
        assert_eq!(
            m(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]).invert(),
            "1,4,7\n2,5,8\n3,6,9"
        );
    }

    #[test]
    fn test_transpose_is_self_inverse() {
        let matrix = m(&[&[1, -2, 3], &[0, 5, 60], &[7, 8, -9]]);
        assert_eq!(matrix.transpose().transpose(), matrix);
    }

    #[test]
    fn test_flatten_row_major() {
        let matrix = m(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        let flat = matrix.flatten();
        assert_eq!(flat, "1,2,3,4,5,6,7,8,9");
        assert_eq!(flat.split(',').count(), 9);
    }

    #[test]
    fn test_sum_ignores_order() {
        let a = m(&[&[1, 2], &[3, 4]]);
        let b = m(&[&[4, 3], &[2, 1]]);
        assert_eq!(a.sum(), 10);
        assert_eq!(a.sum(), b.sum());
    }

    #[test]
    fn test_product() {
        assert_eq!(m(&[&[1, 2], &[3, 4]]).product(), 24);
        assert_eq!(m(&[&[1, 0], &[3, 4]]).product(), 0);
        assert_eq!(m(&[&[-1, 2], &[3, 4]]).product(), -24);
    }

    #[test]
    fn test_overflow_wraps() {
        assert_eq!(m(&[&[i64::MAX, 1], &[0, 0]]).sum(), i64::MIN);
        // 2^32 * 2^32 = 2^64 wraps to zero
        let big = 1i64 << 32;
        assert_eq!(m(&[&[big, big], &[1, 1]]).product(), 0);
    }

    #[test]
    fn test_from_rows_shape_errors() {
        assert_eq!(Matrix::from_rows(vec![]), Err(MatrixError::Empty));
        assert_eq!(
            Matrix::from_rows(vec![vec![1, 2]]),
            Err(MatrixError::NotSquare { rows: 1, cols: 2 })
        );
        assert_eq!(
            Matrix::from_rows(vec![vec![1, 2], vec![3]]),
            Err(MatrixError::InconsistentRow { row: 1 })
        );
    }
}

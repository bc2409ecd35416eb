use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EqualityConfig;
use crate::error::{Axis, MatrixError, Result};

/// Dense, row-major matrix of `f64` with 1-based element addressing.
///
/// The top left element is `(1, 1)` and the bottom right is
/// `(rows(), cols())`. Shape is fixed for the lifetime of a value; every
/// operation that changes shape returns a new `Matrix`. Only [`Matrix::set`]
/// and [`Matrix::fill`] mutate in place.
///
/// ```
/// use redeem_linalg::math::Matrix;
///
/// let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(a.get(2, 1).unwrap(), 3.0);
/// assert_eq!(a.transpose().get(1, 2).unwrap(), 3.0);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

#[derive(Deserialize)]
struct RawMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = MatrixError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        Matrix::from_shape_vec((raw.rows, raw.cols), raw.data)
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Matrix {
    /// Create a zero matrix with `max(1, rows)` rows and `max(1, cols)` columns.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Self {
        if rows == 0 || cols == 0 {
            log::debug!(
                "Requested degenerate {}x{} matrix, clamping to 1x1",
                rows,
                cols
            );
            return Self::zeros_1x1();
        }
        Self::filled(rows, cols, 0.0).expect("Matrix::new: element count overflows usize")
    }

    /// Create an `n x n` identity matrix.
    ///
    /// Fails with `InvalidArgument` if `n` is smaller than 1.
    pub fn identity(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(MatrixError::invalid("Size of matrix must be larger than 0"));
        }
        let mut m = Self::filled(n, n, 0.0)?;
        for i in 0..n {
            let idx = m.offset(i, i);
            m.data[idx] = 1.0;
        }
        Ok(m)
    }

    /// Create an `rows x cols` matrix whose elements all equal `value`.
    ///
    /// Fails with `InvalidArgument` if either dimension is smaller than 1.
    pub fn constant(rows: usize, cols: usize, value: f64) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::invalid(
                "Number of rows and/or columns must be larger than 0",
            ));
        }
        Self::filled(rows, cols, value)
    }

    /// Build a matrix from a row-major buffer.
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<f64>) -> Result<Self> {
        let (rows, cols) = shape;
        if rows == 0 || cols == 0 {
            return Err(MatrixError::invalid(format!(
                "invalid shape ({}, {}): dimensions must be larger than 0",
                rows, cols
            )));
        }
        if Self::element_count(rows, cols)? != data.len() {
            return Err(MatrixError::invalid(format!(
                "invalid shape ({}, {}) for buffer of length {}",
                rows,
                cols,
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(MatrixError::invalid("cannot build a matrix from zero rows"));
        };
        let cols = first.len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::invalid(format!(
                    "row {} has {} elements, expected {}",
                    i + 1,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_shape_vec((rows.len(), cols), data)
    }

    fn filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        let len = Self::element_count(rows, cols)?;
        Ok(Self {
            data: vec![value; len],
            rows,
            cols,
        })
    }

    fn zeros_1x1() -> Self {
        Self {
            data: vec![0.0],
            rows: 1,
            cols: 1,
        }
    }

    /// `rows * cols`, or `InvalidArgument` when it does not fit in `usize`.
    fn element_count(rows: usize, cols: usize) -> Result<usize> {
        rows.checked_mul(cols).ok_or_else(|| {
            MatrixError::invalid(format!(
                "shape ({}, {}) has more elements than fit in memory",
                rows, cols
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Shape, bounds and element access
// ---------------------------------------------------------------------------

impl Matrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major view of the entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    /// 0-based offset into `data`.
    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Validate a 1-based row index and return it 0-based.
    #[inline]
    fn row_index(&self, i: usize) -> Result<usize> {
        if i < 1 || i > self.rows {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Row,
                index: i,
                bound: self.rows,
            });
        }
        Ok(i - 1)
    }

    /// Validate a 1-based column index and return it 0-based.
    #[inline]
    fn col_index(&self, j: usize) -> Result<usize> {
        if j < 1 || j > self.cols {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Col,
                index: j,
                bound: self.cols,
            });
        }
        Ok(j - 1)
    }

    fn row_slice(&self, row: usize) -> &[f64] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    fn row_slice_mut(&mut self, row: usize) -> &mut [f64] {
        let start = self.offset(row, 0);
        let cols = self.cols;
        &mut self.data[start..start + cols]
    }

    /// Value at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        let row = self.row_index(i)?;
        let col = self.col_index(j)?;
        Ok(self.data[self.offset(row, col)])
    }

    /// Store `value` at row `i`, column `j`. Nothing is written on error.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        let row = self.row_index(i)?;
        let col = self.col_index(j)?;
        let idx = self.offset(row, col);
        self.data[idx] = value;
        Ok(())
    }

    /// Overwrite every element with `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v = value);
    }

    /// Copy of row `i`.
    pub fn row(&self, i: usize) -> Result<Vec<f64>> {
        let row = self.row_index(i)?;
        Ok(self.row_slice(row).to_vec())
    }

    /// Copy of column `j`.
    pub fn col(&self, j: usize) -> Result<Vec<f64>> {
        let col = self.col_index(j)?;
        Ok((0..self.rows).map(|r| self.data[self.offset(r, col)]).collect())
    }
}

// ---------------------------------------------------------------------------
// Equality
// ---------------------------------------------------------------------------

impl Matrix {
    /// Approximate equality with the default tolerance of `1e-10`.
    pub fn approx_eq(&self, other: &Matrix) -> bool {
        self.approx_eq_with(other, &EqualityConfig::default())
    }

    /// Shapes must match and no pair of entries may differ by more than
    /// `config.tolerance` under `config.mode`.
    pub fn approx_eq_with(&self, other: &Matrix, config: &EqualityConfig) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        !self
            .data
            .iter()
            .zip(other.data.iter())
            .any(|(&a, &b)| config.mode.differs(a, b, config.tolerance))
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

// ---------------------------------------------------------------------------
// Algebra
// ---------------------------------------------------------------------------

impl Matrix {
    /// Apply `f` to every element, producing a matrix of the same shape.
    pub fn map<F>(&self, mut f: F) -> Matrix
    where
        F: FnMut(f64) -> f64,
    {
        Matrix {
            data: self.data.iter().map(|&v| f(v)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Deep copy of `self` with `edit` applied to it.
    fn modified_copy<F>(&self, edit: F) -> Matrix
    where
        F: FnOnce(&mut Matrix),
    {
        let mut out = self.clone();
        edit(&mut out);
        out
    }

    /// New `cols x rows` matrix with rows and columns interchanged.
    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                data.push(self.data[self.offset(row, col)]);
            }
        }
        Matrix {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Element-wise sum. Both matrices must have the same shape.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        if self.shape() != other.shape() {
            log::debug!(
                "Rejecting add of {}x{} and {}x{}",
                self.rows,
                self.cols,
                other.rows,
                other.cols
            );
            return Err(MatrixError::invalid("Number of rows and columns differ"));
        }
        Ok(Matrix {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a + b)
                .collect(),
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Element-wise sum with a scalar.
    pub fn add_scalar(&self, value: f64) -> Matrix {
        self.map(|v| v + value)
    }

    /// Element-wise product with a scalar.
    pub fn mul_scalar(&self, value: f64) -> Matrix {
        self.map(|v| v * value)
    }
}

// ---------------------------------------------------------------------------
// Structural operations
// ---------------------------------------------------------------------------

impl Matrix {
    /// Horizontal concatenation `[self | other]`.
    ///
    /// The result has `rows()` rows and `cols() + other.cols()` columns.
    pub fn concatenate_rows(&self, other: &Matrix) -> Result<Matrix> {
        if self.rows != other.rows {
            return Err(MatrixError::invalid("The number of rows must be identical"));
        }
        let cols = self.cols + other.cols;
        let mut data = Vec::with_capacity(self.rows * cols);
        for row in 0..self.rows {
            data.extend_from_slice(self.row_slice(row));
            data.extend_from_slice(other.row_slice(row));
        }
        Ok(Matrix {
            data,
            rows: self.rows,
            cols,
        })
    }

    /// Copy of rows `from_row..=to_row` and columns `from_col..=to_col`.
    ///
    /// Requires `1 <= from_row <= to_row <= rows()` and
    /// `1 <= from_col <= to_col <= cols()`.
    pub fn sub_matrix(
        &self,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> Result<Matrix> {
        let r0 = self.row_index(from_row)?;
        let c0 = self.col_index(from_col)?;
        let r1 = self.row_index(to_row)?;
        let c1 = self.col_index(to_col)?;
        if to_row < from_row {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Row,
                index: to_row,
                bound: self.rows,
            });
        }
        if to_col < from_col {
            return Err(MatrixError::IndexOutOfRange {
                axis: Axis::Col,
                index: to_col,
                bound: self.cols,
            });
        }

        let rows = r1 - r0 + 1;
        let cols = c1 - c0 + 1;
        let mut data = Vec::with_capacity(rows * cols);
        for row in r0..=r1 {
            data.extend_from_slice(&self.row_slice(row)[c0..=c1]);
        }
        Ok(Matrix { data, rows, cols })
    }

    /// Copy with rows `a` and `b` interchanged.
    pub fn swap_rows(&self, a: usize, b: usize) -> Result<Matrix> {
        let a = self.row_index(a)?;
        let b = self.row_index(b)?;
        Ok(self.modified_copy(|m| {
            if a != b {
                let (lo, hi) = (a.min(b), a.max(b));
                let cols = m.cols;
                let (head, tail) = m.data.split_at_mut(hi * cols);
                head[lo * cols..(lo + 1) * cols].swap_with_slice(&mut tail[..cols]);
            }
        }))
    }

    /// Copy where row `a` is replaced by `row(b) + value * row(c)`.
    ///
    /// Rows `b` and `c` are read from `self`, so `a == b` or `a == c` use the
    /// original values.
    pub fn add_mul_rows(&self, a: usize, b: usize, c: usize, value: f64) -> Result<Matrix> {
        let a = self.row_index(a)?;
        let b = self.row_index(b)?;
        let c = self.row_index(c)?;
        let combined: Vec<f64> = self
            .row_slice(b)
            .iter()
            .zip(self.row_slice(c).iter())
            .map(|(x, y)| x + value * y)
            .collect();
        Ok(self.modified_copy(|m| m.row_slice_mut(a).copy_from_slice(&combined)))
    }

    /// Copy without column `a`.
    ///
    /// A single-column matrix has no remaining columns to copy, so
    /// `delete_col(1)` on it fails with `IndexOutOfRange` for column 2.
    pub fn delete_col(&self, a: usize) -> Result<Matrix> {
        self.col_index(a)?;
        if a == 1 {
            self.sub_matrix(1, 2, self.rows, self.cols)
        } else if a == self.cols {
            self.sub_matrix(1, 1, self.rows, self.cols - 1)
        } else {
            let left = self.sub_matrix(1, 1, self.rows, a - 1)?;
            let right = self.sub_matrix(1, a + 1, self.rows, self.cols)?;
            left.concatenate_rows(&right)
        }
    }

    /// Copy where column `a` is replaced by the single column of `column`,
    /// which must be `rows() x 1`.
    pub fn replace_col(&self, a: usize, column: &Matrix) -> Result<Matrix> {
        let col = self.col_index(a)?;
        if column.rows != self.rows || column.cols != 1 {
            return Err(MatrixError::invalid(format!(
                "Must be a matrix of size {}x1, got {}x{}",
                self.rows, column.rows, column.cols
            )));
        }
        Ok(self.modified_copy(|m| {
            for (row, &value) in column.data.iter().enumerate() {
                let idx = m.offset(row, col);
                m.data[idx] = value;
            }
        }))
    }
}

// ---------------------------------------------------------------------------
// Text form
// ---------------------------------------------------------------------------

impl fmt::Display for Matrix {
    /// One bracketed row per line, elements separated by a single space.
    /// Values use the `{:?}` float form (`1.0`, `1e-12`), which `FromStr` reads back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (idx, value) in self.row_slice(row).iter().enumerate() {
                if idx > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:?}", value)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl FromStr for Matrix {
    type Err = MatrixError;

    /// Parse the form produced by `Display`. Blank lines are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (line_no, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let inner = line
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
                .ok_or_else(|| {
                    MatrixError::Parse(format!("line {} is not enclosed in brackets", line_no + 1))
                })?;
            let values = inner
                .split_whitespace()
                .map(|tok| {
                    tok.parse::<f64>().map_err(|e| {
                        MatrixError::Parse(format!(
                            "invalid value '{}' on line {}: {}",
                            tok,
                            line_no + 1,
                            e
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            if values.is_empty() {
                return Err(MatrixError::Parse(format!("line {} has no values", line_no + 1)));
            }
            if let Some(first) = rows.first() {
                if first.len() != values.len() {
                    return Err(MatrixError::Parse(format!(
                        "line {} has {} values, expected {}",
                        line_no + 1,
                        values.len(),
                        first.len()
                    )));
                }
            }
            rows.push(values);
        }
        if rows.is_empty() {
            return Err(MatrixError::Parse("no rows found".to_string()));
        }
        Matrix::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn offsets_are_row_major() {
        let m = sample();
        assert_eq!(m.offset(0, 0), 0);
        assert_eq!(m.offset(1, 2), 5);
        assert_eq!(m.row_slice(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn modified_copy_leaves_source_untouched() {
        let m = sample();
        let copy = m.modified_copy(|c| c.fill(9.0));
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(copy.as_slice().iter().all(|&v| v == 9.0));
    }

    #[test]
    fn swap_rows_handles_either_order() {
        let m = Matrix::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.swap_rows(1, 3).unwrap().as_slice(), &[3.0, 2.0, 1.0]);
        assert_eq!(m.swap_rows(3, 1).unwrap().as_slice(), &[3.0, 2.0, 1.0]);
        assert_eq!(m.swap_rows(2, 2).unwrap().as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_index_is_out_of_range() {
        let m = sample();
        assert!(m.get(0, 1).unwrap_err().is_index_out_of_range());
        assert!(m.get(1, 0).unwrap_err().is_index_out_of_range());
    }

    #[test]
    fn deserialize_rejects_inconsistent_shape() {
        let raw = RawMatrix {
            data: vec![1.0, 2.0, 3.0],
            rows: 2,
            cols: 2,
        };
        assert!(Matrix::try_from(raw).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn element_count_rejects_overflow() {
        let huge = 1usize << (usize::BITS / 2);
        assert!(Matrix::element_count(huge, huge).unwrap_err().is_invalid_argument());
        assert_eq!(Matrix::element_count(3, 4).unwrap(), 12);
    }
}

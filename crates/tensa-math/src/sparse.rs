//! Sparse matrix representation and solver interface.
//!
//! Provides a CSR (Compressed Sparse Row) matrix, the handful of products
//! the local-global solver needs (Aᵀ·P and AᵀA), and a trait for sparse
//! Cholesky solvers.

use serde::{Deserialize, Serialize};

/// Compressed Sparse Row (CSR) matrix.
///
/// Stores a sparse matrix in row-major order. Within each row, column
/// indices are sorted and unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row pointer array (length = rows + 1).
    /// `row_ptr[i]..row_ptr[i+1]` are the indices into `col_idx` and `values`
    /// for non-zeros in row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices of non-zero entries.
    pub col_idx: Vec<usize>,
    /// Non-zero values.
    pub values: Vec<f64>,
}

impl CsrMatrix {
    /// Creates an empty CSR matrix with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Returns the number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Creates a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries are summed. Entries that sum to zero are kept,
    /// so the sparsity pattern depends only on which triplets were pushed.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        // Count entries per row
        let mut row_counts = vec![0usize; rows];
        for &(r, _, _) in triplets {
            row_counts[r] += 1;
        }

        let mut row_ptr = vec![0usize; rows + 1];
        for i in 0..rows {
            row_ptr[i + 1] = row_ptr[i] + row_counts[i];
        }

        let mut entries: Vec<(usize, f64)> = vec![(0, 0.0); row_ptr[rows]];
        let mut cursor = row_ptr[..rows].to_vec();
        for &(r, c, v) in triplets {
            entries[cursor[r]] = (c, v);
            cursor[r] += 1;
        }

        // Sort each row by column and merge duplicates
        let mut out_ptr = vec![0usize; rows + 1];
        let mut col_idx = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for i in 0..rows {
            let row = &mut entries[row_ptr[i]..row_ptr[i + 1]];
            row.sort_unstable_by_key(|&(c, _)| c);
            let mut last: Option<usize> = None;
            for &(c, v) in row.iter() {
                if last == Some(c) {
                    if let Some(acc) = values.last_mut() {
                        *acc += v;
                    }
                } else {
                    col_idx.push(c);
                    values.push(v);
                    last = Some(c);
                }
            }
            out_ptr[i + 1] = col_idx.len();
        }

        Self {
            rows,
            cols,
            row_ptr: out_ptr,
            col_idx,
            values,
        }
    }

    /// Returns the entry at `(row, col)`, or zero if it is not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        match self.col_idx[range.clone()].binary_search(&col) {
            Ok(pos) => self.values[range.start + pos],
            Err(_) => 0.0,
        }
    }

    /// Computes `out = Aᵀ · v` where `v` has one entry per row.
    pub fn transpose_mul(&self, v: &[f64], out: &mut [f64]) {
        debug_assert_eq!(v.len(), self.rows);
        debug_assert_eq!(out.len(), self.cols);
        out.fill(0.0);
        for row in 0..self.rows {
            let vr = v[row];
            if vr == 0.0 {
                continue;
            }
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                out[self.col_idx[idx]] += self.values[idx] * vr;
            }
        }
    }

    /// Computes the Gram matrix AᵀA (cols × cols).
    ///
    /// Every pair of entries within one row of A scatters a product into
    /// the result, so the cost is the sum of squared row lengths.
    pub fn gram(&self) -> CsrMatrix {
        let mut triplets = Vec::new();
        for row in 0..self.rows {
            let range = self.row_ptr[row]..self.row_ptr[row + 1];
            for a in range.clone() {
                for b in range.clone() {
                    triplets.push((
                        self.col_idx[a],
                        self.col_idx[b],
                        self.values[a] * self.values[b],
                    ));
                }
            }
        }
        CsrMatrix::from_triplets(self.cols, self.cols, &triplets)
    }

    /// Returns a copy with `diag[i]` added to each diagonal entry.
    ///
    /// Missing diagonal entries are inserted.
    pub fn with_added_diagonal(&self, diag: &[f64]) -> CsrMatrix {
        debug_assert_eq!(self.rows, self.cols);
        let mut triplets = Vec::with_capacity(self.nnz() + diag.len());
        for row in 0..self.rows {
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                triplets.push((row, self.col_idx[idx], self.values[idx]));
            }
        }
        for (i, &d) in diag.iter().enumerate().take(self.rows) {
            triplets.push((i, i, d));
        }
        CsrMatrix::from_triplets(self.rows, self.cols, &triplets)
    }

    /// Returns true if both matrices store entries at exactly the same positions.
    pub fn same_pattern(&self, other: &CsrMatrix) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.row_ptr == other.row_ptr
            && self.col_idx == other.col_idx
    }
}

/// Trait for sparse symmetric positive-definite solvers.
pub trait SparseSolver {
    /// Factorize the matrix. Call once (or after the matrix changes).
    fn factorize(&mut self, matrix: &CsrMatrix) -> Result<(), String>;

    /// Solve Ax = b using the pre-computed factorization.
    /// Returns x in the provided output buffer.
    fn solve(&self, rhs: &[f64], solution: &mut [f64]) -> Result<(), String>;

    /// Returns true if the solver holds a valid factorization.
    fn is_factorized(&self) -> bool;

    /// Drops the factorization, leaving the solver unusable until the next `factorize`.
    fn invalidate(&mut self);
}

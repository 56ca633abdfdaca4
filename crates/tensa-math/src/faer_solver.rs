//! Sparse Cholesky solver backed by `faer`.
//!
//! Implements the [`SparseSolver`] trait using faer's supernodal LLᵀ
//! factorization.
//!
//! ## Workflow
//! 1. `factorize(matrix)` — converts CSR→CSC, computes symbolic + numeric LLᵀ
//! 2. `solve(rhs, solution)` — forward/backward substitution (cached factorization)
//! 3. Repeat `solve()` with different RHS without re-factorizing
//!
//! A later `factorize()` with the same sparsity pattern skips the symbolic
//! analysis and only recomputes the numeric factor.

use faer::Side;
use faer::linalg::solvers::Solve;
use faer::sparse::SparseColMat;
use faer::sparse::Triplet;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};

use crate::sparse::{CsrMatrix, SparseSolver};

/// Sparsity pattern plus the symbolic analysis computed for it.
struct CachedSymbolic {
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    symbolic: SymbolicLlt<usize>,
}

/// Sparse Cholesky (LLᵀ) solver using `faer`.
///
/// The system matrix of the local-global solver depends only on constraint
/// topology and weights, so one factorization serves every `solve` call.
pub struct FaerSolver {
    /// Cached LLᵀ factorization.
    factorization: Option<Llt<usize, f64>>,
    /// Symbolic analysis of the last factorized pattern.
    symbolic: Option<CachedSymbolic>,
    /// Whether the last `factorize` reused a cached symbolic analysis.
    reused_symbolic: bool,
    /// Matrix dimension (N×N).
    dimension: usize,
}

impl FaerSolver {
    /// Creates a new solver (unfactorized).
    pub fn new() -> Self {
        Self {
            factorization: None,
            symbolic: None,
            reused_symbolic: false,
            dimension: 0,
        }
    }

    /// Returns true if the last `factorize` call only refactored numerically.
    pub fn reused_symbolic(&self) -> bool {
        self.reused_symbolic
    }

    /// Convert our CSR matrix to faer's CSC matrix.
    fn csr_to_csc(matrix: &CsrMatrix) -> Result<SparseColMat<usize, f64>, String> {
        let mut triplets: Vec<Triplet<usize, usize, f64>> = Vec::with_capacity(matrix.nnz());
        for row in 0..matrix.rows {
            for idx in matrix.row_ptr[row]..matrix.row_ptr[row + 1] {
                let col = matrix.col_idx[idx];
                let val = matrix.values[idx];
                triplets.push(Triplet { row, col, val });
            }
        }

        SparseColMat::try_new_from_triplets(matrix.rows, matrix.cols, &triplets)
            .map_err(|e| format!("Failed to construct faer CSC matrix: {e:?}"))
    }

    fn cached_symbolic_for(&self, matrix: &CsrMatrix) -> Option<SymbolicLlt<usize>> {
        self.symbolic
            .as_ref()
            .filter(|c| c.row_ptr == matrix.row_ptr && c.col_idx == matrix.col_idx)
            .map(|c| c.symbolic.clone())
    }
}

impl Default for FaerSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseSolver for FaerSolver {
    fn factorize(&mut self, matrix: &CsrMatrix) -> Result<(), String> {
        // A failed attempt must not leave the previous factor usable.
        self.factorization = None;

        if matrix.rows != matrix.cols {
            return Err(format!(
                "Matrix must be square, got {}×{}",
                matrix.rows, matrix.cols
            ));
        }
        if matrix.rows == 0 {
            return Err("Cannot factorize empty matrix".into());
        }

        self.dimension = matrix.rows;
        let csc = Self::csr_to_csc(matrix)?;

        // Step 1: Symbolic analysis (ordering, fill-in prediction), reused when possible
        let (symbolic, reused) = match self.cached_symbolic_for(matrix) {
            Some(symbolic) => (symbolic, true),
            None => {
                let symbolic = SymbolicLlt::try_new(csc.symbolic().as_ref(), Side::Upper)
                    .map_err(|e| format!("Symbolic analysis failed: {e:?}"))?;
                self.symbolic = Some(CachedSymbolic {
                    row_ptr: matrix.row_ptr.clone(),
                    col_idx: matrix.col_idx.clone(),
                    symbolic: symbolic.clone(),
                });
                (symbolic, false)
            }
        };

        // Step 2: Numeric factorization (using the symbolic structure)
        let llt = Llt::try_new_with_symbolic(symbolic, csc.as_ref(), Side::Upper)
            .map_err(|e| format!("Cholesky factorization failed: {e:?}"))?;

        self.factorization = Some(llt);
        self.reused_symbolic = reused;
        Ok(())
    }

    fn solve(&self, rhs: &[f64], solution: &mut [f64]) -> Result<(), String> {
        let llt = self
            .factorization
            .as_ref()
            .ok_or_else(|| "Solver not factorized. Call factorize() first.".to_string())?;

        if rhs.len() != self.dimension {
            return Err(format!(
                "RHS length ({}) != matrix dimension ({})",
                rhs.len(),
                self.dimension
            ));
        }
        if solution.len() != self.dimension {
            return Err(format!(
                "Solution length ({}) != matrix dimension ({})",
                solution.len(),
                self.dimension
            ));
        }

        let rhs_col: faer::Mat<f64> = faer::Mat::from_fn(self.dimension, 1, |i, _| rhs[i]);

        // Solve using cached factorization: L L^T x = b
        let sol = llt.solve(&rhs_col);

        for (i, out) in solution.iter_mut().enumerate() {
            *out = sol[(i, 0)];
        }

        Ok(())
    }

    fn is_factorized(&self) -> bool {
        self.factorization.is_some()
    }

    fn invalidate(&mut self) {
        self.factorization = None;
    }
}

//! Dense LU factorization with partial pivoting
//!
//! Factorization and triangular solves run through faer. Storage follows
//! LAPACK `getrf`: the unit lower-triangular factor `L` lives strictly below
//! the diagonal, `U` on and above it, and `piv[k]` is the 1-based row
//! interchanged with row `k + 1` at step `k`. Right-hand sides are solved
//! in explicit column-major buffers.

use faer::dyn_stack::{MemBuffer, MemStack};
use faer::linalg::lu::partial_pivoting::solve::{solve_in_place, solve_in_place_scratch};
use faer::perm::PermRef;
use faer::MatMut;
use mdarray::DTensor;
use mdarray_linalg::lu::LU;
use mdarray_linalg_faer::{Faer, into_faer};
use num_complex::Complex64;

use crate::error::{Dlr2dError, Result};

/// LU factors of a square complex matrix
#[derive(Debug, Clone)]
pub struct LuFactors {
    lu: DTensor<Complex64, 2>,
    piv: Vec<i32>,
}

impl Default for LuFactors {
    /// Factors of the empty 0x0 matrix
    fn default() -> Self {
        Self {
            lu: DTensor::<Complex64, 2>::from_elem([0, 0], Complex64::new(0.0, 0.0)),
            piv: Vec::new(),
        }
    }
}

/// Row permutation of `P A` (row `perm[i]` of `A` is row `i` of `P A`)
/// as sequential 1-based interchanges
fn interchanges_from_perm(perm: &[usize]) -> Vec<i32> {
    let n = perm.len();
    let mut rows: Vec<usize> = (0..n).collect();
    let mut pos: Vec<usize> = (0..n).collect();
    let mut piv = Vec::with_capacity(n);
    for k in 0..n {
        let p = pos[perm[k]];
        piv.push((p + 1) as i32);
        rows.swap(k, p);
        pos[rows[k]] = k;
        pos[rows[p]] = p;
    }
    piv
}

/// Inverse of [`interchanges_from_perm`]
fn perm_from_interchanges(piv: &[i32]) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..piv.len()).collect();
    for (k, &p) in piv.iter().enumerate() {
        rows.swap(k, (p - 1) as usize);
    }
    rows
}

impl LuFactors {
    /// Factorize `P a = L U`
    ///
    /// Fails with [`Dlr2dError::SingularMatrix`] on an exactly zero pivot.
    pub fn factorize(a: &DTensor<Complex64, 2>) -> Result<Self> {
        let (n, ncols) = *a.shape();
        if n != ncols {
            return Err(Dlr2dError::InvalidParameter(format!(
                "LU factorization needs a square matrix, got {}x{}",
                n, ncols
            )));
        }
        if n == 0 {
            return Ok(Self::default());
        }

        let zero = Complex64::new(0.0, 0.0);
        let mut work = a.clone();
        let (l, u, p) = Faer.lu(&mut *work);

        if let Some(column) = (0..n).find(|&k| u[[k, k]] == zero || !u[[k, k]].is_finite()) {
            return Err(Dlr2dError::SingularMatrix { column });
        }

        // P has a single one per row
        let perm: Vec<usize> = (0..n)
            .map(|i| (0..n).find(|&j| p[[i, j]] != zero).unwrap_or(i))
            .collect();

        let lu = DTensor::<Complex64, 2>::from_fn([n, n], |idx| {
            if idx[0] > idx[1] {
                l[[idx[0], idx[1]]]
            } else {
                u[[idx[0], idx[1]]]
            }
        });
        Ok(Self {
            lu,
            piv: interchanges_from_perm(&perm),
        })
    }

    /// Rebuild factors from stored parts without refactorizing
    pub fn from_parts(lu: DTensor<Complex64, 2>, piv: Vec<i32>) -> Result<Self> {
        let (n, ncols) = *lu.shape();
        if n != ncols || piv.len() != n {
            return Err(Dlr2dError::InvalidRecord(format!(
                "LU factors of shape {}x{} with {} pivots",
                n,
                ncols,
                piv.len()
            )));
        }
        if let Some(&bad) = piv.iter().find(|&&p| p < 1 || p as usize > n) {
            return Err(Dlr2dError::InvalidRecord(format!(
                "pivot {} out of range 1..={}",
                bad, n
            )));
        }
        Ok(Self { lu, piv })
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.piv.len()
    }

    /// Packed `L` and `U` factors
    pub fn lu(&self) -> &DTensor<Complex64, 2> {
        &self.lu
    }

    /// 1-based row interchanges
    pub fn piv(&self) -> &[i32] {
        &self.piv
    }

    /// Solve `A X = B` in place (`getrs` semantics)
    ///
    /// `b` holds `nrhs` right-hand sides in column-major order, each of
    /// length `dim()`.
    pub fn solve_in_place(&self, b: &mut [Complex64], nrhs: usize) -> Result<()> {
        let n = self.dim();
        if b.len() != n * nrhs {
            return Err(Dlr2dError::ShapeMismatch {
                expected: n * nrhs,
                actual: b.len(),
            });
        }

        if n == 0 || nrhs == 0 {
            return Ok(());
        }

        let fwd = perm_from_interchanges(&self.piv);
        let mut inv = vec![0usize; n];
        for (i, &row) in fwd.iter().enumerate() {
            inv[row] = i;
        }
        let perm = PermRef::new_checked(&fwd, &inv, n);

        let lu = into_faer(&*self.lu);
        let rhs = MatMut::from_column_major_slice_mut(b, n, nrhs);
        let par = faer::get_global_parallelism();
        let mut scratch = MemBuffer::new(solve_in_place_scratch::<usize, Complex64>(n, nrhs, par));
        solve_in_place(lu, lu, perm, rhs, par, MemStack::new(&mut scratch));
        Ok(())
    }

    /// Explicit inverse, column by column
    pub fn inverse(&self) -> Result<DTensor<Complex64, 2>> {
        let n = self.dim();
        let mut buf = vec![Complex64::new(0.0, 0.0); n * n];
        for j in 0..n {
            buf[j + j * n] = Complex64::new(1.0, 0.0);
        }
        self.solve_in_place(&mut buf, n)?;
        Ok(DTensor::<Complex64, 2>::from_fn([n, n], |idx| {
            buf[idx[0] + idx[1] * n]
        }))
    }

    /// 1-norm condition number ‖A‖₁ ‖A⁻¹‖₁ of the factorized matrix `a`
    pub fn condition_estimate(&self, a: &DTensor<Complex64, 2>) -> Result<f64> {
        if self.dim() == 0 {
            return Ok(0.0);
        }
        let inv = self.inverse()?;
        Ok(norm1(a) * norm1(&inv))
    }
}

/// Maximum absolute column sum
pub fn norm1(a: &DTensor<Complex64, 2>) -> f64 {
    let (m, n) = *a.shape();
    (0..n)
        .map(|j| (0..m).map(|i| a[[i, j]].norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[path = "lu_tests.rs"]
mod tests;

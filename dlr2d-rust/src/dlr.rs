//! One-dimensional Discrete Lehmann Representation (DLR) grids
//!
//! The 1D DLR represents a Green's function by a small set of real-frequency
//! poles ω_k ∈ [-Λ, Λ] (β = 1):
//!
//! G(τ) = Σ_k c_k K(τ, ω_k),   G(iν_n) = Σ_k c_k K^S(n, ω_k)
//!
//! The poles are chosen by a rank-revealing selection over the logistic kernel
//! discretized on a fine composite Chebyshev grid; the Matsubara sampling nodes
//! are then chosen by the same selection applied to the imaginary-frequency
//! kernel rows. Both are the building blocks of the 2D node selection.

use mdarray::DTensor;
use num_complex::Complex64;

use crate::error::{Dlr2dError, Result};
use crate::kernel::{LogisticKernel, matsubara_kernel};
use crate::qr::pivoted_gram_schmidt;
use crate::traits::StatisticsType;

/// Chebyshev order of each fine-grid panel
pub const FINE_ORDER: usize = 24;

/// Default Matsubara cutoff for fine candidate grids: max(ceil(2Λ), 20)
pub fn fine_nmax(lambda: f64) -> i64 {
    ((2.0 * lambda).ceil() as i64).max(20)
}

/// Check `lambda > 0` and `0 < eps < 1`
pub fn check_params(lambda: f64, eps: f64) -> Result<()> {
    if !(lambda.is_finite() && lambda > 0.0) {
        return Err(Dlr2dError::InvalidParameter(format!(
            "lambda must be positive and finite, got {}",
            lambda
        )));
    }
    if !(eps > 0.0 && eps < 1.0) {
        return Err(Dlr2dError::InvalidParameter(format!(
            "eps must lie in (0, 1), got {}",
            eps
        )));
    }
    Ok(())
}

/// Chebyshev nodes of the first kind on `[a, b]`
fn chebyshev_nodes(a: f64, b: f64, p: usize) -> impl Iterator<Item = f64> {
    let mid = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    (0..p).map(move |k| {
        let x = (std::f64::consts::PI * (2 * k + 1) as f64 / (2 * p) as f64).cos();
        mid - half * x
    })
}

/// Composite Chebyshev grids in imaginary time and real frequency, dyadically
/// refined toward τ = 0, τ = 1 and ω = 0
#[derive(Debug, Clone)]
pub struct FineGrid {
    /// Imaginary-time points in relative format: τ for τ ≤ 1/2, τ - 1 beyond
    pub tau: Vec<f64>,
    /// Real-frequency points in [-Λ, Λ], ascending
    pub omega: Vec<f64>,
}

impl FineGrid {
    pub fn new(lambda: f64) -> Self {
        Self::with_order(lambda, FINE_ORDER)
    }

    pub fn with_order(lambda: f64, p: usize) -> Self {
        let levels = lambda.log2().ceil();
        let npt = ((levels - 2.0).max(1.0)) as usize;
        let npo = (levels.max(1.0)) as usize;

        // [0, 2^-npt], ..., [1/4, 1/2]
        let mut bpt = vec![0.0];
        bpt.extend((1..=npt).map(|i| 0.5_f64.powi((npt - i + 1) as i32)));
        let half: Vec<f64> = bpt
            .windows(2)
            .flat_map(|w| chebyshev_nodes(w[0], w[1], p))
            .collect();
        let mut tau = half.clone();
        tau.extend(half.iter().rev().map(|&t| -t));

        // [0, Λ/2^(npo-1)], ..., [Λ/2, Λ]
        let mut bpo = vec![0.0];
        bpo.extend((1..=npo).map(|i| lambda * 0.5_f64.powi((npo - i) as i32)));
        let positive: Vec<f64> = bpo
            .windows(2)
            .flat_map(|w| chebyshev_nodes(w[0], w[1], p))
            .collect();
        let mut omega: Vec<f64> = positive.iter().rev().map(|&w| -w).collect();
        omega.extend(positive.iter().copied());

        Self { tau, omega }
    }

    /// Logistic kernel matrix K[i, j] = K(τ_i, ω_j)
    pub fn kernel_matrix(&self, lambda: f64) -> DTensor<f64, 2> {
        let kernel = LogisticKernel::new(lambda);
        DTensor::<f64, 2>::from_fn([self.tau.len(), self.omega.len()], |idx| {
            kernel.compute_reltime(self.tau[idx[0]], self.omega[idx[1]])
        })
    }
}

/// Build the 1D DLR real-frequency nodes for cutoff `lambda` and tolerance `eps`
///
/// Returns the selected frequencies sorted ascending.
pub fn build_dlr_rf(lambda: f64, eps: f64) -> Result<Vec<f64>> {
    check_params(lambda, eps)?;
    let grid = FineGrid::new(lambda);
    let kmat = grid.kernel_matrix(lambda);
    let qr = pivoted_gram_schmidt(&kmat, eps, None);

    let mut rf: Vec<f64> = qr.pivots.iter().map(|&j| grid.omega[j]).collect();
    rf.sort_by(f64::total_cmp);
    log::debug!(
        "1D DLR: lambda={}, eps={:e}, {} of {} fine frequencies selected",
        lambda,
        eps,
        rf.len(),
        grid.omega.len()
    );
    Ok(rf)
}

/// Candidate Matsubara indices for a fine imaginary-frequency grid
///
/// Fermions use `[-nmax, nmax)` so the set is symmetric under ν → -ν,
/// bosons use `[-nmax, nmax]`.
pub fn fine_indices<S: StatisticsType>(nmax: i64) -> Vec<i64> {
    let upper = if S::STATISTICS.is_fermionic() { nmax } else { nmax + 1 };
    (-nmax..upper).collect()
}

/// Imaginary-frequency kernel matrix A[i, k] = K^S(n_i, ω_k)
pub fn matsubara_matrix<S: StatisticsType>(indices: &[i64], rf: &[f64]) -> DTensor<Complex64, 2> {
    DTensor::<Complex64, 2>::from_fn([indices.len(), rf.len()], |idx| {
        matsubara_kernel::<S>(indices[idx[0]], rf[idx[1]])
    })
}

/// Select `rf.len()` Matsubara sampling indices from `fine_indices::<S>(nmax)`
///
/// Returns the selected indices sorted ascending.
pub fn build_dlr_if<S: StatisticsType>(rf: &[f64], nmax: i64) -> Result<Vec<i64>> {
    if nmax < 1 {
        return Err(Dlr2dError::InvalidParameter(format!(
            "nmax must be at least 1, got {}",
            nmax
        )));
    }
    let candidates = fine_indices::<S>(nmax);
    let a = matsubara_matrix::<S>(&candidates, rf);

    // Rows of `a` are the columns of its transpose
    let at = DTensor::<Complex64, 2>::from_fn([rf.len(), candidates.len()], |idx| {
        a[[idx[1], idx[0]]]
    });
    let qr = pivoted_gram_schmidt(&at, 0.0, Some(rf.len()));

    let mut nodes: Vec<i64> = qr.pivots.iter().map(|&i| candidates[i]).collect();
    nodes.sort_unstable();
    Ok(nodes)
}

#[cfg(test)]
#[path = "dlr_tests.rs"]
mod tests;

//! Lehmann kernels in imaginary time and imaginary frequency
//!
//! With β = 1 the imaginary-time kernel is the logistic kernel
//!
//! K(τ, ω) = exp(-ωτ) / (1 + exp(-ω)),   τ ∈ [0, 1], ω ∈ [-Λ, Λ]
//!
//! and its Fourier images are the imaginary-frequency kernels
//!
//! K^F(n, ω) = 1 / (i(2n + 1)π - ω)
//! K^B(b, ω) = tanh(ω/2) / (i·2bπ - ω)
//!
//! The bosonic kernel carries the `tanh(ω/2)` weight so that it stays
//! finite at ω = 0.

use num_complex::Complex64;

use crate::freq::MatsubaraFreq;
use crate::traits::{Statistics, StatisticsType};

/// Logistic kernel in dimensionless imaginary time
#[derive(Debug, Clone, Copy)]
pub struct LogisticKernel {
    lambda: f64,
}

impl LogisticKernel {
    /// Create a new logistic kernel with the given cutoff parameter
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    /// Get the cutoff parameter
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Evaluate K(τ, ω) for τ ∈ [0, 1]
    ///
    /// The two branches keep every exponent non-positive.
    pub fn compute(&self, tau: f64, omega: f64) -> f64 {
        if omega >= 0.0 {
            (-omega * tau).exp() / (1.0 + (-omega).exp())
        } else {
            (omega * (1.0 - tau)).exp() / (1.0 + omega.exp())
        }
    }

    /// Evaluate the kernel for τ given relative to the nearest endpoint
    ///
    /// Grid points in `[0, 1/2]` are passed as τ, those in `(1/2, 1]` as the
    /// negative distance τ - 1, which keeps resolution near τ = 1. The sign
    /// bit decides, so `-0.0` is τ = 1.
    pub fn compute_reltime(&self, tau_rel: f64, omega: f64) -> f64 {
        if tau_rel.is_sign_positive() {
            self.compute(tau_rel, omega)
        } else {
            self.compute(-tau_rel, -omega)
        }
    }
}

/// Inverse weight `1/w(ω)` relating the statistics-specific kernel to the
/// fermionic one: 1 for fermions, tanh(ω/2) for bosons
pub fn inv_weight<S: StatisticsType>(omega: f64) -> f64 {
    match S::STATISTICS {
        Statistics::Fermionic => 1.0,
        Statistics::Bosonic => (0.5 * omega).tanh(),
    }
}

/// Imaginary-frequency kernel K^S(k, ω) at Matsubara index `k`
pub fn matsubara_kernel<S: StatisticsType>(k: i64, omega: f64) -> Complex64 {
    let freq = MatsubaraFreq::<S>::from_index(k);
    if freq.n() == 0 && omega == 0.0 {
        // limit of tanh(ω/2)/(-ω) as ω → 0
        return Complex64::new(-0.5, 0.0);
    }
    let iv = freq.value_imaginary(1.0);
    Complex64::new(inv_weight::<S>(omega), 0.0) / (iv - Complex64::new(omega, 0.0))
}

/// Fermionic kernel K^F(n, ω)
#[inline]
pub fn fermionic_kernel(n: i64, omega: f64) -> Complex64 {
    matsubara_kernel::<crate::traits::Fermionic>(n, omega)
}

/// Bosonic kernel K^B(b, ω)
#[inline]
pub fn bosonic_kernel(b: i64, omega: f64) -> Complex64 {
    matsubara_kernel::<crate::traits::Bosonic>(b, omega)
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;

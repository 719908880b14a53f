//! Matrix multiplication utilities (Faer backend)
//!
//! Thin wrappers around `mdarray-linalg-faer` used by the batched transforms.
//!
//! # Example
//! ```ignore
//! use dlr2d_rust::gemm::matmul_par;
//!
//! let c = matmul_par(&a, &b);
//! ```

use mdarray::DTensor;
use mdarray_linalg::prelude::{MatMul, MatMulBuilder};
use mdarray_linalg_faer::Faer;
use num_complex::Complex64;

/// Parallel complex matrix multiplication: C = A * B
///
/// Empty operands yield a zero matrix of the right shape without calling
/// into the backend.
///
/// # Panics
/// Panics if `A.cols != B.rows`.
pub fn matmul_par(a: &DTensor<Complex64, 2>, b: &DTensor<Complex64, 2>) -> DTensor<Complex64, 2> {
    let (m, k) = *a.shape();
    let (k2, n) = *b.shape();

    assert_eq!(
        k, k2,
        "Matrix dimension mismatch: A.cols ({}) != B.rows ({})",
        k, k2
    );

    if m == 0 || n == 0 || k == 0 {
        return DTensor::<Complex64, 2>::from_elem([m, n], Complex64::new(0.0, 0.0));
    }

    Faer.matmul(a, b).parallelize().eval()
}

/// Row-vector times matrix: y[j] = Σ_i x[i] * B[i, j]
pub fn vecmat(x: &[Complex64], b: &DTensor<Complex64, 2>) -> Vec<Complex64> {
    let k = x.len();
    let row = DTensor::<Complex64, 2>::from_fn([1, k], |idx| x[idx[1]]);
    let c = matmul_par(&row, b);
    let n = c.shape().1;
    (0..n).map(|j| c[[0, j]]).collect()
}

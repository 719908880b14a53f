//! Common test utilities
#![allow(dead_code)]

use dlr2d_rust::batch::column_of;
use dlr2d_rust::{ImfreqOps2d, bosonic_kernel, fermionic_kernel};
use mdarray::{DynRank, Tensor};
use num_complex::Complex;
use std::sync::OnceLock;

/// Cutoff and tolerance of the shared operator
pub const LAMBDA: f64 = 10.0;
pub const EPS: f64 = 1e-5;

/// Operator for Λ = 10, ε = 1e-5, built once per test binary
pub fn shared_ops() -> &'static ImfreqOps2d {
    static OPS: OnceLock<ImfreqOps2d> = OnceLock::new();
    OPS.get_or_init(|| ImfreqOps2d::new(LAMBDA, EPS).unwrap())
}

/// Simple deterministic pseudo-random number generator (LCG)
///
/// Linear Congruential Generator for reproducible random numbers in tests.
/// Uses the common parameters: a = 1664525, c = 1013904223 (from Numerical Recipes)
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate next f64 in range [0, 1) (base method)
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        // Map to [0, 1) using upper 48 bits
        ((self.state >> 16) as f64) / ((1u64 << 48) as f64)
    }

    /// Generate next value of type T (generic)
    pub fn next<T: RandomGenerate>(&mut self) -> T {
        T::generate(self)
    }
}

/// Trait for types that can be randomly generated from SimpleRng
pub trait RandomGenerate {
    fn generate(rng: &mut SimpleRng) -> Self;
}

impl RandomGenerate for f64 {
    fn generate(rng: &mut SimpleRng) -> Self {
        rng.next_f64() - 0.5
    }
}

impl RandomGenerate for Complex<f64> {
    fn generate(rng: &mut SimpleRng) -> Self {
        let re = rng.next_f64() - 0.5;
        let im = rng.next_f64() - 0.5;
        Complex::new(re, im)
    }
}

/// Random tensor of the given shape
pub fn random_tensor<T: RandomGenerate + Copy>(shape: &[usize], seed: u64) -> Tensor<T, DynRank> {
    let mut rng = SimpleRng::new(seed);
    let len: usize = shape.iter().product();
    let data: Vec<T> = (0..len).map(|_| rng.next::<T>()).collect();
    Tensor::<T, DynRank>::from_fn(shape, |idx| data[column_of(idx, shape)])
}

/// Largest entrywise |a - b|
pub fn max_abs_diff(a: &Tensor<Complex<f64>, DynRank>, b: &Tensor<Complex<f64>, DynRank>) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// Largest entrywise |a|
pub fn max_abs(a: &Tensor<Complex<f64>, DynRank>) -> f64 {
    a.iter().map(|x| x.norm()).fold(0.0, f64::max)
}

/// Two-frequency function built from a few poles off the DLR grid, one
/// term per channel; all poles lie within [-4, 4]
pub fn synthetic_g(n: i64, m: i64) -> Complex<f64> {
    let b = n + m + 1;
    fermionic_kernel(n, -1.7) * fermionic_kernel(m, 2.3) * 0.7
        + fermionic_kernel(n, 0.9) * bosonic_kernel(b, -3.1) * 0.4
        - fermionic_kernel(m, 3.2) * bosonic_kernel(b, 0.35) * 0.5
}

/// `synthetic_g` sampled on the operator's nodes, with two trailing
/// components scaled by 1 and -2i
pub fn synthetic_values(ops: &ImfreqOps2d) -> Tensor<Complex<f64>, DynRank> {
    let nodes = ops.ifnodes();
    let scales = [Complex::new(1.0, 0.0), Complex::new(0.0, -2.0)];
    Tensor::<Complex<f64>, DynRank>::from_fn(&[nodes.len(), 2][..], |idx| {
        let p = nodes[idx[0]];
        synthetic_g(p.n, p.m) * scales[idx[1]]
    })
}

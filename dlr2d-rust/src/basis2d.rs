//! Two-frequency DLR basis functions
//!
//! A two-frequency Lehmann representation splits into three channels. With
//! fermionic Matsubara indices `(n, m)`, the bosonic transfer index
//! `b = n + m + 1` (iΩ = iν + iν') and 1D real-frequency nodes ω_k, ω_l:
//!
//! | channel            | φ(n, m)                          |
//! |--------------------|----------------------------------|
//! | `FermionFermion`   | K^F(n, ω_k) · K^F(m, ω_l)        |
//! | `FirstBoson`       | K^F(n, ω_k) · K^B(b, ω_l)        |
//! | `SecondBoson`      | K^F(m, ω_k) · K^B(b, ω_l)        |

use mdarray::DTensor;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::freq::FreqPair;
use crate::kernel::{bosonic_kernel, fermionic_kernel};

/// Family of a 2D basis function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Product of two fermionic kernels in ν and ν'
    FermionFermion,
    /// Fermionic kernel in ν times bosonic kernel in ν + ν'
    FirstBoson,
    /// Fermionic kernel in ν' times bosonic kernel in ν + ν'
    SecondBoson,
}

impl Channel {
    pub const ALL: [Channel; 3] = [
        Channel::FermionFermion,
        Channel::FirstBoson,
        Channel::SecondBoson,
    ];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Channel::FermionFermion => "FF",
            Channel::FirstBoson => "FB1",
            Channel::SecondBoson => "FB2",
        };
        write!(f, "{}", s)
    }
}

/// One 2D basis function: a channel and two indices into the 1D nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasisFn {
    pub channel: Channel,
    pub k: usize,
    pub l: usize,
}

impl BasisFn {
    pub fn new(channel: Channel, k: usize, l: usize) -> Self {
        Self { channel, k, l }
    }

    /// Real-frequency pair (ω_k, ω_l)
    pub fn rf_pair(&self, rf: &[f64]) -> (f64, f64) {
        (rf[self.k], rf[self.l])
    }

    /// Value φ(n, m) at fermionic Matsubara indices `(n, m)`
    pub fn evaluate(&self, rf: &[f64], n: i64, m: i64) -> Complex64 {
        let (wk, wl) = self.rf_pair(rf);
        let b = n + m + 1;
        match self.channel {
            Channel::FermionFermion => fermionic_kernel(n, wk) * fermionic_kernel(m, wl),
            Channel::FirstBoson => fermionic_kernel(n, wk) * bosonic_kernel(b, wl),
            Channel::SecondBoson => fermionic_kernel(m, wk) * bosonic_kernel(b, wl),
        }
    }

    /// True if both indices address `rf` of length `r1`
    pub fn fits(&self, r1: usize) -> bool {
        self.k < r1 && self.l < r1
    }
}

/// All `3 · r1²` basis functions, channel-major then `k`, then `l`
pub fn full_basis(r1: usize) -> Vec<BasisFn> {
    Channel::ALL
        .iter()
        .flat_map(|&channel| {
            (0..r1).flat_map(move |k| (0..r1).map(move |l| BasisFn::new(channel, k, l)))
        })
        .collect()
}

/// Evaluate every basis function at one frequency pair
pub fn eval_row(rf: &[f64], basis: &[BasisFn], n: i64, m: i64) -> Vec<Complex64> {
    basis.iter().map(|f| f.evaluate(rf, n, m)).collect()
}

/// Evaluation matrix E[i, j] = φ_j(n_i, m_i)
pub fn eval_matrix(rf: &[f64], basis: &[BasisFn], points: &[FreqPair]) -> DTensor<Complex64, 2> {
    DTensor::<Complex64, 2>::from_fn([points.len(), basis.len()], |idx| {
        let p = points[idx[0]];
        basis[idx[1]].evaluate(rf, p.n, p.m)
    })
}

/// Coefficient-to-value matrix on the 2D nodes (`r × r`)
pub fn build_cf2if(rf: &[f64], basis: &[BasisFn], nodes: &[FreqPair]) -> DTensor<Complex64, 2> {
    eval_matrix(rf, basis, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_basis_layout() {
        let basis = full_basis(3);
        assert_eq!(basis.len(), 27);
        assert_eq!(basis[0], BasisFn::new(Channel::FermionFermion, 0, 0));
        assert_eq!(basis[5], BasisFn::new(Channel::FermionFermion, 1, 2));
        assert_eq!(basis[9], BasisFn::new(Channel::FirstBoson, 0, 0));
        assert_eq!(basis[26], BasisFn::new(Channel::SecondBoson, 2, 2));
    }

    #[test]
    fn test_channel_formulas() {
        let rf = [-2.5, 0.7];
        let (n, m) = (1, -3);
        let b = n + m + 1;

        let ff = BasisFn::new(Channel::FermionFermion, 0, 1).evaluate(&rf, n, m);
        assert_eq!(ff, fermionic_kernel(n, -2.5) * fermionic_kernel(m, 0.7));

        let fb1 = BasisFn::new(Channel::FirstBoson, 1, 0).evaluate(&rf, n, m);
        assert_eq!(fb1, fermionic_kernel(n, 0.7) * bosonic_kernel(b, -2.5));

        let fb2 = BasisFn::new(Channel::SecondBoson, 0, 0).evaluate(&rf, n, m);
        assert_eq!(fb2, fermionic_kernel(m, -2.5) * bosonic_kernel(b, -2.5));
    }

    #[test]
    fn test_channel_symmetry() {
        // Swapping ν and ν' exchanges the two bosonic channels
        let rf = [-1.3, 0.4, 5.0];
        for (n, m) in [(0, 2), (-4, 1), (3, -1)] {
            for k in 0..3 {
                for l in 0..3 {
                    let fb1 = BasisFn::new(Channel::FirstBoson, k, l).evaluate(&rf, n, m);
                    let fb2 = BasisFn::new(Channel::SecondBoson, k, l).evaluate(&rf, m, n);
                    assert!((fb1 - fb2).norm() < 1e-15);

                    let ff = BasisFn::new(Channel::FermionFermion, k, l).evaluate(&rf, n, m);
                    let ff_t = BasisFn::new(Channel::FermionFermion, l, k).evaluate(&rf, m, n);
                    assert!((ff - ff_t).norm() < 1e-15);
                }
            }
        }
    }

    #[test]
    fn test_eval_matrix_rows() {
        let rf = [-1.0, 2.0];
        let basis = full_basis(2);
        let nodes = [FreqPair::new(0, 0), FreqPair::new(-1, 3)];
        let e = build_cf2if(&rf, &basis, &nodes);
        assert_eq!(*e.shape(), (2, 12));
        for (i, p) in nodes.iter().enumerate() {
            let row = eval_row(&rf, &basis, p.n, p.m);
            for j in 0..basis.len() {
                assert_eq!(e[[i, j]], row[j]);
            }
        }
    }

    #[test]
    fn test_basis_serde() {
        let f = BasisFn::new(Channel::SecondBoson, 4, 1);
        let s = serde_json::to_string(&f).unwrap();
        assert_eq!(s, r#"{"channel":"second_boson","k":4,"l":1}"#);
        let g: BasisFn = serde_json::from_str(&s).unwrap();
        assert_eq!(f, g);
    }
}

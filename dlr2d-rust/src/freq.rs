//! Matsubara frequencies and two-frequency index pairs
//!
//! A Matsubara frequency is stored by its reduced integer `n` in
//! ν = nπ/β, so fermionic frequencies carry odd `n` and bosonic ones even `n`.
//! The 2D DLR works with *Matsubara indices* `k` instead, where
//! ν_k = (2k + ζ)π/β; [`MatsubaraFreq::from_index`] and
//! [`MatsubaraFreq::index`] convert between the two conventions.

use num_complex::Complex64;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Neg};

use crate::error::{Dlr2dError, Result};
use crate::traits::{Bosonic, Fermionic, Statistics, StatisticsType};

/// Matsubara frequency for a specific statistics type
///
/// Represents ν = nπ/β with `n` odd for fermions and even for bosons.
#[derive(Debug, Clone, Copy)]
pub struct MatsubaraFreq<S: StatisticsType> {
    n: i64,
    _phantom: PhantomData<S>,
}

pub type FermionicFreq = MatsubaraFreq<Fermionic>;
pub type BosonicFreq = MatsubaraFreq<Bosonic>;

/// Largest `|n|`, `|m|` of a [`FreqPair`]; keeps the transfer frequency
/// `2(n + m + 1) + ζ` representable in `i64`
pub const MAX_PAIR_INDEX: i64 = (i64::MAX - 2) / 4;

impl<S: StatisticsType> MatsubaraFreq<S> {
    /// Create a frequency from its reduced integer `n` (ν = nπ/β)
    ///
    /// Fails if the parity of `n` does not match the statistics.
    ///
    /// # Examples
    /// ```
    /// use dlr2d_rust::freq::{BosonicFreq, FermionicFreq};
    ///
    /// assert!(FermionicFreq::new(1).is_ok());
    /// assert!(BosonicFreq::new(1).is_err());
    /// ```
    pub fn new(n: i64) -> Result<Self> {
        if !S::STATISTICS.allows(n) {
            return Err(Dlr2dError::InvalidParameter(format!(
                "n={} has the wrong parity for {} statistics",
                n,
                S::STATISTICS
            )));
        }
        Ok(Self {
            n,
            _phantom: PhantomData,
        })
    }

    /// Create a frequency from its Matsubara index `k`, i.e. n = 2k + ζ
    ///
    /// `|k|` must stay below `i64::MAX / 2`; pair indices are checked
    /// against [`MAX_PAIR_INDEX`] by [`FreqPair::checked`].
    pub fn from_index(k: i64) -> Self {
        Self {
            n: 2 * k + S::STATISTICS.zeta(),
            _phantom: PhantomData,
        }
    }

    /// Reduced integer `n` with ν = nπ/β
    pub fn n(&self) -> i64 {
        self.n
    }

    /// Matsubara index `k` with ν = (2k + ζ)π/β
    pub fn index(&self) -> i64 {
        (self.n - S::STATISTICS.zeta()).div_euclid(2)
    }

    /// Real frequency value nπ/β
    pub fn value(&self, beta: f64) -> f64 {
        self.n as f64 * std::f64::consts::PI / beta
    }

    /// Imaginary frequency value i·nπ/β
    pub fn value_imaginary(&self, beta: f64) -> Complex64 {
        Complex64::new(0.0, self.value(beta))
    }

    pub fn statistics(&self) -> Statistics {
        S::STATISTICS
    }
}

/// Sum of two fermionic frequencies is the bosonic transfer frequency
impl Add for FermionicFreq {
    type Output = BosonicFreq;

    fn add(self, other: Self) -> BosonicFreq {
        BosonicFreq {
            n: self.n + other.n,
            _phantom: PhantomData,
        }
    }
}

impl<S: StatisticsType> Neg for MatsubaraFreq<S> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            n: -self.n,
            _phantom: PhantomData,
        }
    }
}

impl<S: StatisticsType> PartialEq for MatsubaraFreq<S> {
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n
    }
}

impl<S: StatisticsType> Eq for MatsubaraFreq<S> {}

impl<S: StatisticsType> PartialOrd for MatsubaraFreq<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: StatisticsType> Ord for MatsubaraFreq<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.n.cmp(&other.n)
    }
}

impl<S: StatisticsType> std::hash::Hash for MatsubaraFreq<S> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.n.hash(state);
    }
}

impl<S: StatisticsType> fmt::Display for MatsubaraFreq<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            0 => write!(f, "0"),
            1 => write!(f, "π/β"),
            -1 => write!(f, "-π/β"),
            n => write!(f, "{}π/β", n),
        }
    }
}

/// Pair of fermionic Matsubara indices `(n, m)` labelling a point iν, iν'
/// of a two-frequency function
///
/// Ordering is lexicographic in `(n, m)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FreqPair {
    pub n: i64,
    pub m: i64,
}

impl FreqPair {
    pub fn new(n: i64, m: i64) -> Self {
        Self { n, m }
    }

    /// Pair with both indices within [`MAX_PAIR_INDEX`]
    pub fn checked(n: i64, m: i64) -> Result<Self> {
        let limit = MAX_PAIR_INDEX as u64;
        if n.unsigned_abs() > limit || m.unsigned_abs() > limit {
            return Err(Dlr2dError::InvalidParameter(format!(
                "index pair ({}, {}) outside ±{}",
                n, m, MAX_PAIR_INDEX
            )));
        }
        Ok(Self { n, m })
    }

    /// First fermionic frequency ν = (2n + 1)π
    pub fn first(&self) -> FermionicFreq {
        FermionicFreq::from_index(self.n)
    }

    /// Second fermionic frequency ν' = (2m + 1)π
    pub fn second(&self) -> FermionicFreq {
        FermionicFreq::from_index(self.m)
    }

    /// Bosonic transfer frequency ν + ν', whose Matsubara index is n + m + 1
    pub fn transfer(&self) -> BosonicFreq {
        self.first() + self.second()
    }
}

impl From<(i64, i64)> for FreqPair {
    fn from((n, m): (i64, i64)) -> Self {
        Self { n, m }
    }
}

impl From<FreqPair> for (i64, i64) {
    fn from(pair: FreqPair) -> Self {
        (pair.n, pair.m)
    }
}

impl fmt::Display for FreqPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.n, self.m)
    }
}

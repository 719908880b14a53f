//! Fermionic and bosonic markers
//!
//! Index conventions: a Matsubara frequency is stored by the integer `n` of
//! `ν = nπ/β`, odd for fermions and even for bosons. A fermionic pair
//! `(n, m)` in the 2D representation uses the 1D indices of
//! `ν = (2n + 1)π/β` instead, see [`crate::freq::FreqPair`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistics {
    Fermionic,
    Bosonic,
}

impl Statistics {
    /// Parity ζ of `n` in `ν = nπ/β`
    pub fn zeta(self) -> i64 {
        match self {
            Statistics::Fermionic => 1,
            Statistics::Bosonic => 0,
        }
    }

    /// Whether `n` has the parity these statistics require
    pub fn allows(self, n: i64) -> bool {
        n.rem_euclid(2) == self.zeta()
    }

    pub fn is_fermionic(self) -> bool {
        self == Statistics::Fermionic
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Statistics::Fermionic => "fermionic",
            Statistics::Bosonic => "bosonic",
        })
    }
}

/// Type-level statistics used to specialize frequencies and kernels
pub trait StatisticsType: Copy + Send + Sync + 'static {
    const STATISTICS: Statistics;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fermionic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bosonic;

impl StatisticsType for Fermionic {
    const STATISTICS: Statistics = Statistics::Fermionic;
}

impl StatisticsType for Bosonic {
    const STATISTICS: Statistics = Statistics::Bosonic;
}

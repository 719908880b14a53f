//! Construction options for the 2D imaginary-frequency operator

use serde::{Deserialize, Serialize};

use crate::error::{Dlr2dError, Result};

/// Candidate set of Matsubara index pairs from which the 2D nodes are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateGrid {
    /// Pairs built from the 1D fermionic and bosonic DLR nodes: all
    /// `(n, m)` with both indices fermionic nodes, plus `(n, b - n - 1)` and
    /// `(b - m - 1, m)` for fermionic `n`, `m` and bosonic `b`.
    #[default]
    Reduced,

    /// Every pair with `n, m ∈ [-niom, niom)`.
    Dense { niom: i64 },
}

/// Parameters controlling node selection.
///
/// ### Default Values
/// - `grid`: [`CandidateGrid::Reduced`]
/// - `nmax`: `None` (use `max(ceil(2Λ), 20)`)
/// - `compress_tol`: `None` (use the operator tolerance `eps`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Dlr2dConfig {
    /// Candidate set for node selection.
    pub grid: CandidateGrid,

    /// Matsubara cutoff of the 1D fine grids feeding the reduced candidate set.
    pub nmax: Option<i64>,

    /// Relative tolerance for compressing the 2D basis. Defaults to `eps`.
    pub compress_tol: Option<f64>,
}

impl Dlr2dConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, grid: CandidateGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Shorthand for [`CandidateGrid::Dense`]
    pub fn with_dense_grid(self, niom: i64) -> Self {
        self.with_grid(CandidateGrid::Dense { niom })
    }

    pub fn with_nmax(mut self, nmax: i64) -> Self {
        self.nmax = Some(nmax);
        self
    }

    pub fn with_compress_tol(mut self, tol: f64) -> Self {
        self.compress_tol = Some(tol);
        self
    }

    /// Reject values node selection cannot work with
    pub fn validate(&self) -> Result<()> {
        if let CandidateGrid::Dense { niom } = self.grid {
            if niom < 1 {
                return Err(Dlr2dError::InvalidParameter(format!(
                    "dense candidate grid needs niom >= 1, got {}",
                    niom
                )));
            }
        }
        if let Some(nmax) = self.nmax {
            if nmax < 1 {
                return Err(Dlr2dError::InvalidParameter(format!(
                    "nmax must be at least 1, got {}",
                    nmax
                )));
            }
        }
        if let Some(tol) = self.compress_tol {
            if !(tol > 0.0 && tol < 1.0) {
                return Err(Dlr2dError::InvalidParameter(format!(
                    "compress_tol must lie in (0, 1), got {}",
                    tol
                )));
            }
        }
        Ok(())
    }
}

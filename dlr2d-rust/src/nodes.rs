//! Selection of the 2D DLR basis and Matsubara nodes
//!
//! Node selection runs two rank-revealing passes over the candidate matrix
//! `A[c, j] = φ_j(n_c, m_c)` spanning all `3 · r1²` basis functions:
//!
//! 1. columns of `A` with relative tolerance `eps` give the rank `r` and the
//!    retained basis functions `J`;
//! 2. columns of `A[:, J]ᵀ`, i.e. rows of `A`, limited to `r` pivots, give the
//!    nodes.
//!
//! Too sparse a candidate set produces an ill-conditioned `cf2if`, which
//! shows up as a large condition estimate rather than as an error.

use mdarray::DTensor;
use num_complex::Complex64;
use std::collections::BTreeSet;

use crate::basis2d::{BasisFn, eval_matrix, full_basis};
use crate::config::{CandidateGrid, Dlr2dConfig};
use crate::dlr::{build_dlr_if, fine_nmax};
use crate::error::{Dlr2dError, Result};
use crate::freq::FreqPair;
use crate::qr::pivoted_gram_schmidt;
use crate::traits::{Bosonic, Fermionic};

/// Retained 2D basis functions and the Matsubara nodes that determine them
#[derive(Debug, Clone)]
pub struct NodeSelection {
    /// Basis functions in pivot order
    pub basis: Vec<BasisFn>,
    /// Nodes in pivot order; same length as `basis`
    pub nodes: Vec<FreqPair>,
}

impl NodeSelection {
    pub fn rank(&self) -> usize {
        self.basis.len()
    }
}

/// Candidate `(n, m)` pairs, deduplicated and sorted
pub fn candidate_grid(lambda: f64, rf: &[f64], config: &Dlr2dConfig) -> Result<Vec<FreqPair>> {
    config.validate()?;
    match config.grid {
        CandidateGrid::Dense { niom } => Ok((-niom..niom)
            .flat_map(|n| (-niom..niom).map(move |m| FreqPair::new(n, m)))
            .collect()),
        CandidateGrid::Reduced => {
            let nmax = config.nmax.unwrap_or_else(|| fine_nmax(lambda));
            let f = build_dlr_if::<Fermionic>(rf, nmax)?;
            let b = build_dlr_if::<Bosonic>(rf, nmax)?;

            let mut set = BTreeSet::new();
            for &n in &f {
                for &m in &f {
                    set.insert(FreqPair::new(n, m));
                }
            }
            for &n in &f {
                for &bb in &b {
                    // ν + ν' = iΩ_b fixes the partner index
                    set.insert(FreqPair::new(n, bb - n - 1));
                    set.insert(FreqPair::new(bb - n - 1, n));
                }
            }
            Ok(set.into_iter().collect())
        }
    }
}

/// Choose the 2D basis and its nodes for 1D real-frequency nodes `rf`
pub fn select_nodes(
    lambda: f64,
    eps: f64,
    rf: &[f64],
    config: &Dlr2dConfig,
) -> Result<NodeSelection> {
    if rf.is_empty() {
        return Err(Dlr2dError::InvalidParameter(
            "real-frequency node list is empty".to_string(),
        ));
    }
    let candidates = candidate_grid(lambda, rf, config)?;
    let all = full_basis(rf.len());
    let a = eval_matrix(rf, &all, &candidates);

    let tol = config.compress_tol.unwrap_or(eps);
    let cols = pivoted_gram_schmidt(&a, tol, None);
    let r = cols.rank;

    // Rows of A[:, J]
    let at = DTensor::<Complex64, 2>::from_fn([r, candidates.len()], |idx| {
        a[[idx[1], cols.pivots[idx[0]]]]
    });
    let rows = pivoted_gram_schmidt(&at, 0.0, Some(r));

    if rows.rank < r {
        log::warn!(
            "2D node selection found only {} independent nodes for {} basis functions",
            rows.rank,
            r
        );
    }
    let basis: Vec<BasisFn> = cols.pivots[..rows.rank].iter().map(|&j| all[j]).collect();
    let nodes: Vec<FreqPair> = rows.pivots.iter().map(|&c| candidates[c]).collect();

    log::debug!(
        "2D node selection: {} candidates, {} basis functions, rank {}",
        candidates.len(),
        all.len(),
        basis.len()
    );
    Ok(NodeSelection { basis, nodes })
}

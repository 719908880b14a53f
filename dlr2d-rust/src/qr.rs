//! Rank-revealing column selection by pivoted Gram-Schmidt
//!
//! Columns are orthogonalized greedily: at every step the remaining column with
//! the largest residual norm becomes the next pivot, it is re-orthogonalized
//! against all previous pivots and normalized, and its direction is projected
//! out of the other columns. The procedure stops when the largest residual
//! norm drops below `rtol` times the first pivot norm, or when `max_rank`
//! pivots have been chosen.

use mdarray::DTensor;

use crate::scalar::Dlr2dScalar;

/// Result of a pivoted Gram-Schmidt pass
#[derive(Debug, Clone)]
pub struct PivotedQr {
    /// Selected column indices, in the order they were pivoted
    pub pivots: Vec<usize>,
    /// Numerical rank, equal to `pivots.len()`
    pub rank: usize,
    /// Residual norm of each pivot at the time it was selected
    pub norms: Vec<f64>,
}

fn dot<T: Dlr2dScalar>(x: &[T], y: &[T]) -> T {
    x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (&a, &b)| acc + a.conj() * b)
}

fn norm_sq<T: Dlr2dScalar>(x: &[T]) -> f64 {
    x.iter().map(|v| v.abs_sq()).sum()
}

fn axpy<T: Dlr2dScalar>(alpha: T, x: &[T], y: &mut [T]) {
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        *yi = *yi - alpha * xi;
    }
}

/// Pivoted Gram-Schmidt with reorthogonalization on the columns of `a`
///
/// # Arguments
/// * `a` - Input matrix (m × n), left untouched
/// * `rtol` - Relative tolerance for rank truncation; ignored when `max_rank` is set
/// * `max_rank` - Select exactly this many columns unless an exactly zero
///   residual is reached first
pub fn pivoted_gram_schmidt<T: Dlr2dScalar>(
    a: &DTensor<T, 2>,
    rtol: f64,
    max_rank: Option<usize>,
) -> PivotedQr {
    let (m, n) = *a.shape();
    let kmax = match max_rank {
        Some(k) => k.min(m).min(n),
        None => m.min(n),
    };

    let mut cols: Vec<Vec<T>> = (0..n)
        .map(|j| (0..m).map(|i| a[[i, j]]).collect())
        .collect();
    let mut resid: Vec<f64> = cols.iter().map(|c| norm_sq(c)).collect();
    let mut active = vec![true; n];

    let mut q: Vec<Vec<T>> = Vec::with_capacity(kmax);
    let mut pivots = Vec::with_capacity(kmax);
    let mut norms = Vec::with_capacity(kmax);
    let mut reference = 0.0_f64;

    while pivots.len() < kmax {
        let Some(p) = (0..n)
            .filter(|&j| active[j])
            .max_by(|&i, &j| resid[i].total_cmp(&resid[j]))
        else {
            break;
        };

        let nrm = resid[p].sqrt();
        if pivots.is_empty() {
            reference = nrm;
        }
        if nrm == 0.0 || (max_rank.is_none() && nrm <= rtol * reference) {
            break;
        }

        let mut v = std::mem::take(&mut cols[p]);
        active[p] = false;
        for qk in &q {
            let c = dot(qk, &v);
            axpy(c, qk, &mut v);
        }
        let vnorm = norm_sq(&v).sqrt();
        if vnorm == 0.0 {
            break;
        }
        let inv = 1.0 / vnorm;
        for vi in v.iter_mut() {
            *vi = vi.scale(inv);
        }

        for j in 0..n {
            if active[j] {
                let c = dot(&v, &cols[j]);
                axpy(c, &v, &mut cols[j]);
                resid[j] = norm_sq(&cols[j]);
            }
        }

        pivots.push(p);
        norms.push(nrm);
        q.push(v);
    }

    PivotedQr {
        rank: pivots.len(),
        pivots,
        norms,
    }
}

#[cfg(test)]
#[path = "qr_tests.rs"]
mod tests;

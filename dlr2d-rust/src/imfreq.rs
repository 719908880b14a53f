//! 2D DLR imaginary-frequency operator
//!
//! [`ImfreqOps2d`] owns the 2D Matsubara nodes, the 2D real-frequency basis,
//! the coefficient-to-value matrix `cf2if` and the LU factors of `cf2if`,
//! and converts between values on the nodes and DLR coefficients.
//!
//! Axis 0 of every coefficient or value array is the DLR rank `r`; the
//! trailing axes are independent right-hand sides. Row `i` of a value array
//! belongs to node `ifnode(i)`.

use mdarray::{DTensor, DynRank, Tensor};
use num_complex::Complex64;

use crate::basis2d::{BasisFn, build_cf2if, eval_row};
use crate::batch::{
    check_leading, column_of, dims, from_col_major, from_matrix, to_col_major, to_matrix,
};
use crate::config::Dlr2dConfig;
use crate::dlr::{build_dlr_rf, check_params};
use crate::error::{Dlr2dError, Result};
use crate::freq::FreqPair;
use crate::gemm::{matmul_par, vecmat};
use crate::lu::LuFactors;
use crate::nodes::select_nodes;
use crate::scalar::Dlr2dScalar;

/// Imaginary-frequency transforms of the 2D DLR
///
/// # Example
/// ```ignore
/// use dlr2d_rust::ImfreqOps2d;
///
/// let ops = ImfreqOps2d::new(10.0, 1e-5)?;
/// let gc = ops.values_to_coefficients(&g)?;
/// let g_back = ops.coefficients_to_values(&gc)?;
/// let g_nm = ops.coefficients_to_point_eval(&gc, 3, -7)?;
/// ```
#[derive(Debug, Clone)]
pub struct ImfreqOps2d {
    lambda: f64,
    eps: f64,
    rf: Vec<f64>,
    basis: Vec<BasisFn>,
    ifnodes: Vec<FreqPair>,
    cf2if: DTensor<Complex64, 2>,
    if2cf: LuFactors,
}

impl Default for ImfreqOps2d {
    /// Uninitialized operator (rank 0), a target for deserialization
    fn default() -> Self {
        Self {
            lambda: 0.0,
            eps: 0.0,
            rf: Vec::new(),
            basis: Vec::new(),
            ifnodes: Vec::new(),
            cf2if: DTensor::<Complex64, 2>::from_elem([0, 0], Complex64::new(0.0, 0.0)),
            if2cf: LuFactors::default(),
        }
    }
}

impl ImfreqOps2d {
    /// Build the operator for cutoff `lambda` and tolerance `eps` with the
    /// default reduced candidate grid
    pub fn new(lambda: f64, eps: f64) -> Result<Self> {
        Self::with_config(lambda, eps, &Dlr2dConfig::default())
    }

    /// Build the operator with explicit node-selection options
    pub fn with_config(lambda: f64, eps: f64, config: &Dlr2dConfig) -> Result<Self> {
        check_params(lambda, eps)?;
        config.validate()?;

        let rf = build_dlr_rf(lambda, eps)?;
        let selection = select_nodes(lambda, eps, &rf, config)?;
        let cf2if = build_cf2if(&rf, &selection.basis, &selection.nodes);
        let if2cf = LuFactors::factorize(&cf2if)?;

        let ops = Self {
            lambda,
            eps,
            rf,
            basis: selection.basis,
            ifnodes: selection.nodes,
            cf2if,
            if2cf,
        };

        let cond = ops.condition_estimate()?;
        log::debug!(
            "ImfreqOps2d: lambda={}, eps={:e}, 1D rank {}, 2D rank {}, condition estimate {:.3e}",
            lambda,
            eps,
            ops.rf.len(),
            ops.rank(),
            cond
        );
        if cond > 1.0 / (eps * eps) {
            log::warn!(
                "ImfreqOps2d: cf2if is poorly conditioned (estimate {:.3e} > 1/eps^2); \
                 consider a denser candidate grid",
                cond
            );
        }
        Ok(ops)
    }

    /// Reassemble an operator from stored fields without recomputation
    ///
    /// Only shapes are checked; the values are trusted.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        lambda: f64,
        eps: f64,
        rf: Vec<f64>,
        basis: Vec<BasisFn>,
        ifnodes: Vec<FreqPair>,
        cf2if: DTensor<Complex64, 2>,
        lu: DTensor<Complex64, 2>,
        piv: Vec<i32>,
    ) -> Result<Self> {
        let r = ifnodes.len();
        if basis.len() != r {
            return Err(Dlr2dError::InvalidRecord(format!(
                "{} basis functions for {} nodes",
                basis.len(),
                r
            )));
        }
        if let Some(bad) = basis.iter().find(|f| !f.fits(rf.len())) {
            return Err(Dlr2dError::InvalidRecord(format!(
                "basis function {:?} indexes past {} real-frequency nodes",
                bad,
                rf.len()
            )));
        }
        if let Some(bad) = ifnodes.iter().find(|p| FreqPair::checked(p.n, p.m).is_err()) {
            return Err(Dlr2dError::InvalidRecord(format!(
                "node {} outside the supported index range",
                bad
            )));
        }
        if *cf2if.shape() != (r, r) {
            let (rows, cols) = *cf2if.shape();
            return Err(Dlr2dError::InvalidRecord(format!(
                "cf2if has shape {}x{}, expected {}x{}",
                rows, cols, r, r
            )));
        }
        let if2cf = LuFactors::from_parts(lu, piv)?;
        if if2cf.dim() != r {
            return Err(Dlr2dError::InvalidRecord(format!(
                "LU factors of dimension {}, expected {}",
                if2cf.dim(),
                r
            )));
        }
        Ok(Self {
            lambda,
            eps,
            rf,
            basis,
            ifnodes,
            cf2if,
            if2cf,
        })
    }

    /// DLR rank `r`
    pub fn rank(&self) -> usize {
        self.ifnodes.len()
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// False for a default-constructed operator
    pub fn is_initialized(&self) -> bool {
        self.rank() > 0
    }

    /// 2D Matsubara nodes `(n, m)`
    pub fn ifnodes(&self) -> &[FreqPair] {
        &self.ifnodes
    }

    pub fn ifnode(&self, i: usize) -> FreqPair {
        self.ifnodes[i]
    }

    /// 1D real-frequency nodes the 2D basis is built from
    pub fn rfnodes(&self) -> &[f64] {
        &self.rf
    }

    pub fn rfnode(&self, i: usize) -> f64 {
        self.rf[i]
    }

    /// 2D real-frequency basis, one entry per coefficient
    pub fn basis(&self) -> &[BasisFn] {
        &self.basis
    }

    /// Real-frequency pair (ω_k, ω_l) of every basis function
    pub fn rf_pairs(&self) -> Vec<(f64, f64)> {
        self.basis.iter().map(|f| f.rf_pair(&self.rf)).collect()
    }

    pub fn cf2if(&self) -> &DTensor<Complex64, 2> {
        &self.cf2if
    }

    pub fn if2cf(&self) -> &LuFactors {
        &self.if2cf
    }

    pub fn if2cf_lu(&self) -> &DTensor<Complex64, 2> {
        self.if2cf.lu()
    }

    pub fn if2cf_piv(&self) -> &[i32] {
        self.if2cf.piv()
    }

    /// 1-norm condition number of `cf2if`
    ///
    /// Values above `1/eps²` mean the node set cannot deliver the requested
    /// accuracy.
    pub fn condition_estimate(&self) -> Result<f64> {
        self.if2cf.condition_estimate(&self.cf2if)
    }

    /// Values on the 2D nodes → DLR coefficients
    ///
    /// `g` has shape `[r, ...]`; the result has the same shape.
    pub fn values_to_coefficients<T: Dlr2dScalar>(
        &self,
        g: &Tensor<T, DynRank>,
    ) -> Result<Tensor<Complex64, DynRank>> {
        let batch = check_leading(g, self.rank())?;
        let mut buf = to_col_major(g);
        self.if2cf.solve_in_place(&mut buf, batch)?;
        Ok(from_col_major(&buf, &dims(g)))
    }

    /// DLR coefficients → values on the 2D nodes
    ///
    /// Real coefficients are promoted to complex values.
    pub fn coefficients_to_values<T: Dlr2dScalar>(
        &self,
        gc: &Tensor<T, DynRank>,
    ) -> Result<Tensor<Complex64, DynRank>> {
        check_leading(gc, self.rank())?;
        let values = matmul_par(&self.cf2if, &to_matrix(gc));
        Ok(from_matrix(&values, &dims(gc)))
    }

    /// Evaluate the DLR expansion with coefficients `gc` at an arbitrary
    /// Matsubara index pair `(n, m)`
    ///
    /// The result has shape `gc.shape[1..]`, or `[1]` when `gc` has rank 1.
    pub fn coefficients_to_point_eval<T: Dlr2dScalar>(
        &self,
        gc: &Tensor<T, DynRank>,
        n: i64,
        m: i64,
    ) -> Result<Tensor<Complex64, DynRank>> {
        let pair = FreqPair::checked(n, m)?;
        check_leading(gc, self.rank())?;
        let row = eval_row(&self.rf, &self.basis, pair.n, pair.m);
        let values = vecmat(&row, &to_matrix(gc));

        let shape = dims(gc);
        let mut out_shape = shape[1..].to_vec();
        if out_shape.is_empty() {
            out_shape.push(1);
        }
        let trailing = shape[1..].to_vec();
        Ok(Tensor::<Complex64, DynRank>::from_fn(&out_shape[..], |idx| {
            if trailing.is_empty() {
                values[0]
            } else {
                values[column_of(idx, &trailing)]
            }
        }))
    }

    /// Scalar-valued form of [`Self::coefficients_to_point_eval`]
    pub fn coefficients_to_point_eval_scalar<T: Dlr2dScalar>(
        &self,
        gc: &[T],
        n: i64,
        m: i64,
    ) -> Result<Complex64> {
        let pair = FreqPair::checked(n, m)?;
        if gc.len() != self.rank() {
            return Err(Dlr2dError::ShapeMismatch {
                expected: self.rank(),
                actual: gc.len(),
            });
        }
        Ok(self
            .basis
            .iter()
            .zip(gc.iter())
            .map(|(f, &c)| f.evaluate(&self.rf, pair.n, pair.m) * c.to_complex())
            .sum())
    }

    /// Rank-1 form of [`Self::values_to_coefficients`]
    pub fn values_to_coefficients_vec<T: Dlr2dScalar>(&self, g: &[T]) -> Result<Vec<Complex64>> {
        if g.len() != self.rank() {
            return Err(Dlr2dError::ShapeMismatch {
                expected: self.rank(),
                actual: g.len(),
            });
        }
        let mut buf: Vec<Complex64> = g.iter().map(|v| v.to_complex()).collect();
        self.if2cf.solve_in_place(&mut buf, 1)?;
        Ok(buf)
    }

    /// Rank-1 form of [`Self::coefficients_to_values`]
    pub fn coefficients_to_values_vec<T: Dlr2dScalar>(&self, gc: &[T]) -> Result<Vec<Complex64>> {
        if gc.len() != self.rank() {
            return Err(Dlr2dError::ShapeMismatch {
                expected: self.rank(),
                actual: gc.len(),
            });
        }
        let r = self.rank();
        Ok((0..r)
            .map(|i| {
                (0..r)
                    .map(|j| self.cf2if[[i, j]] * gc[j].to_complex())
                    .sum()
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "imfreq_tests.rs"]
mod tests;

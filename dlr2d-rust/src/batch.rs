//! Reshaping between batched N-D arrays and `r × batch` matrices
//!
//! Axis 0 of a batched array is the DLR dimension. The trailing axes are
//! flattened in row-major order, so trailing multi-index `(j1, ..., jk)` maps
//! to column `j = j1 * (d2 * ... * dk) + ... + jk`.

use mdarray::{DTensor, DynRank, Shape, Tensor};
use num_complex::Complex64;

use crate::error::{Dlr2dError, Result};
use crate::scalar::Dlr2dScalar;

/// Dimensions of a tensor as a `Vec`
pub fn dims<T>(t: &Tensor<T, DynRank>) -> Vec<usize> {
    t.shape().with_dims(|d| d.to_vec())
}

/// Validate that axis 0 has length `r` and return the batch size
///
/// The batch size is the product of the trailing dimensions (1 for rank-1
/// input).
pub fn check_leading<T>(t: &Tensor<T, DynRank>, r: usize) -> Result<usize> {
    if t.rank() == 0 {
        return Err(Dlr2dError::EmptyInput);
    }
    let shape = dims(t);
    if shape[0] != r {
        return Err(Dlr2dError::ShapeMismatch {
            expected: r,
            actual: shape[0],
        });
    }
    Ok(shape[1..].iter().product())
}

/// Row-major multi-index of flat position `flat` within `trailing`
pub fn unravel(mut flat: usize, trailing: &[usize], out: &mut [usize]) {
    for (slot, &d) in out.iter_mut().zip(trailing.iter()).rev() {
        *slot = flat % d;
        flat /= d;
    }
}

fn for_each_entry<T, F>(t: &Tensor<T, DynRank>, mut f: F)
where
    T: Copy,
    F: FnMut(usize, usize, T),
{
    let shape = dims(t);
    let r = shape[0];
    let trailing = &shape[1..];
    let batch: usize = trailing.iter().product();
    let mut idx = vec![0usize; shape.len()];
    for j in 0..batch {
        unravel(j, trailing, &mut idx[1..]);
        for i in 0..r {
            idx[0] = i;
            f(i, j, t[&idx[..]]);
        }
    }
}

/// Explicit column-major `r × batch` copy, promoted to complex
///
/// Entry `(i, j)` lands at `buf[i + j * r]`, the layout the LU solve expects.
pub fn to_col_major<T: Dlr2dScalar>(t: &Tensor<T, DynRank>) -> Vec<Complex64> {
    let shape = dims(t);
    let r = shape[0];
    let batch: usize = shape[1..].iter().product();
    let mut buf = vec![Complex64::new(0.0, 0.0); r * batch];
    for_each_entry(t, |i, j, v| buf[i + j * r] = v.to_complex());
    buf
}

/// View the batched array as an `r × batch` complex matrix
pub fn to_matrix<T: Dlr2dScalar>(t: &Tensor<T, DynRank>) -> DTensor<Complex64, 2> {
    let shape = dims(t);
    let r = shape[0];
    let batch: usize = shape[1..].iter().product();
    let mut m = DTensor::<Complex64, 2>::from_elem([r, batch], Complex64::new(0.0, 0.0));
    for_each_entry(t, |i, j, v| m[[i, j]] = v.to_complex());
    m
}

/// Inverse of [`to_col_major`]: rebuild an array of shape `shape`
pub fn from_col_major(buf: &[Complex64], shape: &[usize]) -> Tensor<Complex64, DynRank> {
    let r = shape[0];
    let trailing = &shape[1..];
    Tensor::<Complex64, DynRank>::from_fn(shape, |idx| {
        buf[idx[0] + column_of(&idx[1..], trailing) * r]
    })
}

/// Inverse of [`to_matrix`]: rebuild an array of shape `shape`
pub fn from_matrix(m: &DTensor<Complex64, 2>, shape: &[usize]) -> Tensor<Complex64, DynRank> {
    let trailing = &shape[1..];
    Tensor::<Complex64, DynRank>::from_fn(shape, |idx| {
        m[[idx[0], column_of(&idx[1..], trailing)]]
    })
}

/// Row-major flat position of a trailing multi-index
pub fn column_of(idx: &[usize], trailing: &[usize]) -> usize {
    idx.iter()
        .zip(trailing.iter())
        .fold(0, |acc, (&i, &d)| acc * d + i)
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;

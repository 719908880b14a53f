//! Scalar types accepted by the 2D DLR transforms
//!
//! Coefficient and value arrays may hold `f64` or `Complex64`. Both are
//! promoted to `Complex64` whenever they meet a complex transform matrix.

use num_complex::Complex64;
use num_traits::{Float, One, Zero};
use std::fmt::Debug;

/// Scalar trait for data flowing through the 2D DLR operator
pub trait Dlr2dScalar:
    Clone
    + Copy
    + Debug
    + Zero
    + One
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + std::ops::Neg<Output = Self>
    + Default
    + Send
    + Sync
    + 'static
{
    /// Complex conjugate of the value.
    fn conj(self) -> Self;

    /// Square of the absolute value (for complex numbers, |z|^2).
    fn abs_sq(self) -> f64;

    /// Absolute value as f64.
    fn abs_val(self) -> f64 {
        self.abs_sq().sqrt()
    }

    /// Create from f64 value.
    fn from_f64(val: f64) -> Self;

    /// Multiply by a real factor.
    fn scale(self, s: f64) -> Self;

    /// Promote to `Complex64`.
    fn to_complex(self) -> Complex64;
}

impl Dlr2dScalar for f64 {
    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self * self
    }

    #[inline]
    fn abs_val(self) -> f64 {
        Float::abs(self)
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        self * s
    }

    #[inline]
    fn to_complex(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }
}

impl Dlr2dScalar for Complex64 {
    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self.norm_sqr()
    }

    #[inline]
    fn abs_val(self) -> f64 {
        self.norm()
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        Complex64::new(val, 0.0)
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        self * s
    }

    #[inline]
    fn to_complex(self) -> Complex64 {
        self
    }
}

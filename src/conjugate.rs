use core::{
    fmt::{Debug, Display},
    ops::Neg,
};

use num_complex::Complex;

use crate::types::Real;

/// The complex conjugate of `re + i*im`, stored without performing the
/// conjugation.
///
/// Storage is `(re, neg_im)`, so the logical value is `re - i*neg_im`. The
/// layout matches `Complex<R>` which lets a conjugate be read as the complex
/// number it was built from.
#[derive(Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Conjugate<R> {
    re: R,
    neg_im: R,
}

impl<R: Real> Conjugate<R> {
    /// Conjugate of `re + i*im`.
    #[inline]
    pub fn new(re: R, im: R) -> Self {
        Self { re, neg_im: im }
    }

    #[inline]
    pub fn real(&self) -> R {
        self.re
    }

    #[inline]
    pub fn imag(&self) -> R {
        -self.neg_im
    }

    #[inline]
    pub fn neg_imag(&self) -> R {
        self.neg_im
    }

    #[inline]
    pub fn to_complex(&self) -> Complex<R> {
        Complex::new(self.re, -self.neg_im)
    }

    /// The complex number this conjugates, without arithmetic.
    #[inline]
    pub fn conj(&self) -> Complex<R> {
        Complex::new(self.re, self.neg_im)
    }
}

impl<R: Real> From<Complex<R>> for Conjugate<R> {
    fn from(c: Complex<R>) -> Self {
        Self::new(c.re, c.im)
    }
}

impl<R: Real> Neg for Conjugate<R> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            neg_im: -self.neg_im,
        }
    }
}

impl<R: Real> Debug for Conjugate<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Conjugate({:?}, {:?})", self.re, self.imag())
    }
}

impl<R: Real> Display for Conjugate<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{:+}i", self.re, self.imag())
    }
}

//! Negated views over existing storage.
//!
//! A [`Negator<T>`] has exactly the layout of `T`; what differs is the
//! interpretation. The value logically held by a `Negator<T>` is the negation
//! of the `T` stored in it. Reinterpreting a `&T` as a `&Negator<T>` therefore
//! negates it without reading or writing a single byte, and reinterpreting
//! back restores the original value.
//!
//! Building a negator with [`Negator::new`] is a conversion, not a
//! reinterpretation: the logical value is kept, so `Negator::new(5.0) == 5.0`
//! while `*Negator::view(&5.0) == -5.0`.

use core::{
    fmt::{Debug, Display},
    ops::Neg,
    slice,
};

use num_complex::Complex;

use crate::{
    conjugate::Conjugate,
    error::{Error, Result},
    ntraits::NTraits,
    types::Real,
};

#[derive(Clone, Copy, Default)]
#[repr(transparent)]
pub struct Negator<T>(T);

impl<T> Negator<T> {
    /// Views `value` as its own negation.
    #[inline]
    pub fn view(value: &T) -> &Self {
        // SAFETY: Negator<T> is repr(transparent) over T.
        unsafe { &*(value as *const T).cast::<Self>() }
    }

    #[inline]
    pub fn view_mut(value: &mut T) -> &mut Self {
        // SAFETY: Negator<T> is repr(transparent) over T.
        unsafe { &mut *(value as *mut T).cast::<Self>() }
    }

    #[inline]
    pub fn view_slice(values: &[T]) -> &[Self] {
        // SAFETY: same element layout, same length, borrow is carried over.
        unsafe { slice::from_raw_parts(values.as_ptr().cast::<Self>(), values.len()) }
    }

    #[inline]
    pub fn view_slice_mut(values: &mut [T]) -> &mut [Self] {
        // SAFETY: same element layout, same length, borrow is carried over.
        unsafe { slice::from_raw_parts_mut(values.as_mut_ptr().cast::<Self>(), values.len()) }
    }

    /// The stored value, which is the negation of the logical one.
    #[inline]
    pub fn as_plain(&self) -> &T {
        &self.0
    }

    #[inline]
    pub fn as_plain_mut(&mut self) -> &mut T {
        &mut self.0
    }

    #[inline]
    pub fn plain_slice(views: &[Self]) -> &[T] {
        // SAFETY: inverse of view_slice.
        unsafe { slice::from_raw_parts(views.as_ptr().cast::<T>(), views.len()) }
    }

    /// Takes ownership of `stored` as a negator, so the logical value becomes
    /// `-stored`.
    #[inline]
    pub const fn reinterpret(stored: T) -> Self {
        Negator(stored)
    }

    #[inline]
    pub fn into_stored(self) -> T {
        self.0
    }
}

/// Negation that is defined for every value of the type.
///
/// Integers are left out since `-MIN` overflows, see [`TryNeg`].
pub trait ExactNeg: Neg<Output = Self> + Sized {}

impl ExactNeg for f32 {}
impl ExactNeg for f64 {}
impl<R: Real> ExactNeg for Complex<R> {}
impl<R: Real> ExactNeg for Conjugate<R> {}

/// Negation that reports an unrepresentable result instead of overflowing.
pub trait TryNeg: Sized {
    fn try_neg(self) -> Result<Self>;
}

impl<T: ExactNeg> TryNeg for T {
    #[inline]
    fn try_neg(self) -> Result<Self> {
        Ok(-self)
    }
}

macro_rules! impl_try_neg_int {
    ($($t:ty),+) => {
        $(
            impl TryNeg for $t {
                #[inline]
                fn try_neg(self) -> Result<Self> {
                    self.checked_neg().ok_or(Error::NotRepresentable {
                        target: stringify!($t),
                    })
                }
            }
        )+
    };
}

impl_try_neg_int!(i32, i64);

impl<T: ExactNeg> Negator<T> {
    /// A negator whose logical value is `value`.
    #[inline]
    pub fn new(value: T) -> Self {
        Negator(-value)
    }

    /// Computes the logical value. This is the one place a negator performs
    /// arithmetic.
    #[inline]
    pub fn to_value(&self) -> T
    where
        T: Clone,
    {
        -self.0.clone()
    }
}

impl<T: TryNeg> Negator<T> {
    /// Like [`Negator::new`], for types whose negation can overflow.
    #[inline]
    pub fn try_new(value: T) -> Result<Self> {
        value.try_neg().map(Negator)
    }

    #[inline]
    pub fn try_value(&self) -> Result<T>
    where
        T: Clone,
    {
        self.0.clone().try_neg()
    }
}

impl<T: ExactNeg> From<T> for Negator<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Neg for Negator<T> {
    type Output = T;

    #[inline]
    fn neg(self) -> T {
        self.0
    }
}

impl<T: Clone> Neg for &Negator<T> {
    type Output = T;

    #[inline]
    fn neg(self) -> T {
        self.0.clone()
    }
}

impl<T: NTraits> PartialEq for Negator<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.real_part() == other.0.real_part() && self.0.imag_part() == other.0.imag_part()
    }
}

/// Compares the logical content of `view` with `plain`. This is IEEE
/// equality, so a view of NaN is unequal to everything; use
/// [`is_numerically_equal`](crate::is_numerically_equal) to treat NaNs as
/// equal.
#[inline]
pub fn negated_eq<T: NTraits>(view: &Negator<T>, plain: &T) -> bool {
    -view.0.real_part() == plain.real_part() && -view.0.imag_part() == plain.imag_part()
}

/// `negator == plain` and `plain == negator` for a concrete scalar type.
#[macro_export]
macro_rules! impl_negator_eq {
    ($($t:ty),+) => {
        $(
            impl PartialEq<$t> for $crate::negator::Negator<$t> {
                #[inline]
                fn eq(&self, other: &$t) -> bool {
                    $crate::negator::negated_eq(self, other)
                }
            }

            impl PartialEq<$crate::negator::Negator<$t>> for $t {
                #[inline]
                fn eq(&self, other: &$crate::negator::Negator<$t>) -> bool {
                    $crate::negator::negated_eq(other, self)
                }
            }
        )+
    };
}

impl_negator_eq!(
    f32,
    f64,
    i32,
    i64,
    Complex<f32>,
    Complex<f64>,
    Conjugate<f32>,
    Conjugate<f64>
);

impl<T: Debug> Debug for Negator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "-({:?})", self.0)
    }
}

impl<T: Display> Display for Negator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "-({})", self.0)
    }
}

#[inline]
pub fn as_negated_view<T>(value: &T) -> &Negator<T> {
    Negator::view(value)
}

#[inline]
pub fn as_plain<T>(view: &Negator<T>) -> &T {
    view.as_plain()
}

#[cfg(test)]
#[path = "./negator_test.rs"]
mod tests;

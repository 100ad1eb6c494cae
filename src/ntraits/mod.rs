//! The numeric trait facade.
//!
//! [`NTraits`] is what generic algorithms use to classify values, compare
//! values of mismatched types, and pull passive content out of a scalar. The
//! last one is guarded: on a differentiable scalar it is refused while the
//! scalar's engine is recording, because the extracted number would no longer
//! be connected to the recorded inputs.

use num_complex::Complex;
use num_traits::{Float, NumCast, ToPrimitive, Zero};

use crate::{
    conjugate::Conjugate,
    error::{Error, Result, TapeTag},
    negator::{Negator, TryNeg},
    precision::{Narrow, Narrowest, ScalarMeta, Widen, Widest},
    types::Real,
};

/// Read access to a differentiable engine's recording state.
pub trait RecordingContext {
    /// The tape currently recording on this context, if any.
    fn active_tape(&self) -> Option<TapeTag>;

    #[inline]
    fn is_recording(&self) -> bool {
        self.active_tape().is_some()
    }
}

/// A context that never records. Used by every non-differentiable scalar.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Idle;

impl RecordingContext for Idle {
    #[inline]
    fn active_tape(&self) -> Option<TapeTag> {
        None
    }
}

impl<C: RecordingContext + ?Sized> RecordingContext for &C {
    #[inline]
    fn active_tape(&self) -> Option<TapeTag> {
        (**self).active_tape()
    }
}

pub trait NTraits: ScalarMeta + Sized {
    /// Precision of the stored components.
    type Precision: Real;
    /// The scalar with derivative information dropped.
    type Passive: Copy;
    /// Where the recording state for this scalar is read from.
    type Context: RecordingContext + Default;

    /// Real part of the logical value. Unguarded, use [`NTraits::value`] to
    /// extract content.
    fn real_part(&self) -> Self::Precision;

    #[inline]
    fn imag_part(&self) -> Self::Precision {
        Self::Precision::zero()
    }

    /// Unguarded passive content. Fails only when the content has no
    /// representation in `Self::Passive`, such as a view of `-i32::MIN`.
    fn passive(&self) -> Result<Self::Passive>;

    #[inline]
    fn is_nan(&self) -> bool {
        self.real_part().is_nan() || self.imag_part().is_nan()
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.real_part().is_finite() && self.imag_part().is_finite()
    }

    #[inline]
    fn is_inf(&self) -> bool {
        let (re, im) = (self.real_part(), self.imag_part());
        (re.is_infinite() && !im.is_nan()) || (im.is_infinite() && !re.is_nan())
    }

    #[inline]
    fn value(&self) -> Result<Self::Passive> {
        self.value_in(&Self::Context::default())
    }

    fn value_in<C>(&self, ctx: &C) -> Result<Self::Passive>
    where
        C: RecordingContext + ?Sized,
    {
        ensure_not_taping::<Self, C>("value", ctx)?;
        self.passive()
    }

    #[inline]
    fn cast<U: CastFrom<Self>>(&self) -> Result<U> {
        U::cast_from(self, &Self::Context::default())
    }

    #[inline]
    fn cast_in<U, C>(&self, ctx: &C) -> Result<U>
    where
        U: CastFrom<Self>,
        C: RecordingContext + ?Sized,
    {
        U::cast_from(self, ctx)
    }
}

/// Conversion out of a scalar `T`, checked against the recording state.
pub trait CastFrom<T>: Sized {
    fn cast_from<C>(value: &T, ctx: &C) -> Result<Self>
    where
        C: RecordingContext + ?Sized;
}

/// Fails with [`Error::TapingNotAllowed`] when `T` is differentiable and `ctx`
/// is recording.
pub fn ensure_not_taping<T, C>(op: &'static str, ctx: &C) -> Result<()>
where
    T: ScalarMeta + ?Sized,
    C: RecordingContext + ?Sized,
{
    if !T::IS_DIFFERENTIABLE {
        return Ok(());
    }
    match ctx.active_tape() {
        Some(tag) => {
            log::warn!("refused {} of a differentiable scalar while tape {} is recording", op, tag);
            Err(Error::TapingNotAllowed { op, tag })
        }
        None => Ok(()),
    }
}

macro_rules! impl_ntraits_real {
    ($($t:ty),+) => {
        $(
            impl NTraits for $t {
                type Precision = $t;
                type Passive = $t;
                type Context = Idle;

                #[inline]
                fn real_part(&self) -> $t {
                    *self
                }

                #[inline]
                fn passive(&self) -> Result<$t> {
                    Ok(*self)
                }
            }
        )+
    };
}

macro_rules! impl_ntraits_int {
    ($($t:ty),+) => {
        $(
            impl NTraits for $t {
                type Precision = f64;
                type Passive = $t;
                type Context = Idle;

                #[inline]
                fn real_part(&self) -> f64 {
                    *self as f64
                }

                #[inline]
                fn passive(&self) -> Result<$t> {
                    Ok(*self)
                }

                #[inline]
                fn is_nan(&self) -> bool {
                    false
                }

                #[inline]
                fn is_finite(&self) -> bool {
                    true
                }

                #[inline]
                fn is_inf(&self) -> bool {
                    false
                }
            }
        )+
    };
}

impl_ntraits_real!(f32, f64);
impl_ntraits_int!(i32, i64);

impl<R> NTraits for Complex<R>
where
    R: Real,
    Complex<R>: ScalarMeta,
{
    type Precision = R;
    type Passive = Complex<R>;
    type Context = Idle;

    #[inline]
    fn real_part(&self) -> R {
        self.re
    }

    #[inline]
    fn imag_part(&self) -> R {
        self.im
    }

    #[inline]
    fn passive(&self) -> Result<Complex<R>> {
        Ok(*self)
    }
}

impl<R> NTraits for Conjugate<R>
where
    R: Real,
    Conjugate<R>: ScalarMeta,
{
    type Precision = R;
    type Passive = Conjugate<R>;
    type Context = Idle;

    #[inline]
    fn real_part(&self) -> R {
        self.real()
    }

    #[inline]
    fn imag_part(&self) -> R {
        self.imag()
    }

    #[inline]
    fn passive(&self) -> Result<Conjugate<R>> {
        Ok(*self)
    }
}

// classification never looks at the sign, so it goes straight to the stored
// value.
impl<T> NTraits for Negator<T>
where
    T: NTraits,
    T::Passive: TryNeg,
{
    type Precision = T::Precision;
    type Passive = T::Passive;
    type Context = T::Context;

    #[inline]
    fn real_part(&self) -> T::Precision {
        -self.as_plain().real_part()
    }

    #[inline]
    fn imag_part(&self) -> T::Precision {
        -self.as_plain().imag_part()
    }

    #[inline]
    fn passive(&self) -> Result<T::Passive> {
        self.as_plain().passive()?.try_neg()
    }

    #[inline]
    fn is_nan(&self) -> bool {
        self.as_plain().is_nan()
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.as_plain().is_finite()
    }

    #[inline]
    fn is_inf(&self) -> bool {
        self.as_plain().is_inf()
    }
}

macro_rules! impl_cast_primitive {
    ($($t:ty),+) => {
        $(
            impl<T> CastFrom<T> for $t
            where
                T: NTraits,
                T::Passive: ToPrimitive,
            {
                fn cast_from<C>(value: &T, ctx: &C) -> Result<Self>
                where
                    C: RecordingContext + ?Sized,
                {
                    ensure_not_taping::<T, C>("cast", ctx)?;
                    <$t as NumCast>::from(value.passive()?).ok_or(Error::NotRepresentable {
                        target: stringify!($t),
                    })
                }
            }
        )+
    };
}

impl_cast_primitive!(f32, f64, i32, i64);

macro_rules! impl_cast_complex {
    ($($r:ty),+) => {
        $(
            impl<T> CastFrom<T> for Complex<$r>
            where
                T: NTraits,
            {
                fn cast_from<C>(value: &T, ctx: &C) -> Result<Self>
                where
                    C: RecordingContext + ?Sized,
                {
                    ensure_not_taping::<T, C>("cast", ctx)?;
                    Ok(Complex::new(
                        promote::<$r, T::Precision>(value.real_part()),
                        promote::<$r, T::Precision>(value.imag_part()),
                    ))
                }
            }
        )+
    };
}

impl_cast_complex!(f32, f64);

#[inline]
fn promote<W: Real, R: Real>(r: R) -> W {
    <W as NumCast>::from(r).unwrap_or_else(W::nan)
}

/// Equality of two reals up to a relative tolerance. NaN equals NaN, an
/// infinity only equals itself.
fn reals_equal<W: Real>(a: W, b: W, tol: W) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    let scale = W::one().max(Float::abs(a)).max(Float::abs(b));
    Float::abs(a - b) <= tol * scale
}

#[inline]
pub fn is_nan<T: NTraits>(x: &T) -> bool {
    x.is_nan()
}

#[inline]
pub fn is_finite<T: NTraits>(x: &T) -> bool {
    x.is_finite()
}

#[inline]
pub fn is_inf<T: NTraits>(x: &T) -> bool {
    x.is_inf()
}

#[inline]
pub fn value<T: NTraits>(x: &T) -> Result<T::Passive> {
    x.value()
}

#[inline]
pub fn cast<U, T>(x: &T) -> Result<U>
where
    T: NTraits,
    U: CastFrom<T>,
{
    x.cast()
}

/// Numeric equality across scalar types.
///
/// Both operands are promoted to the [`Widest`] of their precisions and
/// compared with the significance of the [`Narrowest`] one, so an `f32` equals
/// the `f64` it was rounded from. A complex operand only equals a real-valued
/// one when its imaginary part is exactly zero.
pub fn is_numerically_equal<A, B>(a: &A, b: &B) -> bool
where
    A: NTraits,
    B: NTraits,
    A::Precision: Widen<B::Precision> + Narrow<B::Precision>,
    Widest<A::Precision, B::Precision>: Real,
    Narrowest<A::Precision, B::Precision>: Real,
{
    let tol = <Narrowest<A::Precision, B::Precision> as Real>::SIGNIFICANT;
    is_numerically_equal_tol(a, b, tol.as_f64())
}

pub fn is_numerically_equal_tol<A, B>(a: &A, b: &B, tol: f64) -> bool
where
    A: NTraits,
    B: NTraits,
    A::Precision: Widen<B::Precision>,
    Widest<A::Precision, B::Precision>: Real,
{
    let tol = promote::<Widest<A::Precision, B::Precision>, f64>(tol);
    let (are, bre): (Widest<A::Precision, B::Precision>, _) =
        (promote(a.real_part()), promote(b.real_part()));
    let (aim, bim): (Widest<A::Precision, B::Precision>, _) =
        (promote(a.imag_part()), promote(b.imag_part()));

    let imag_equal = if A::IS_COMPLEX && B::IS_COMPLEX {
        reals_equal(aim, bim, tol)
    } else {
        aim.is_zero() && bim.is_zero()
    };
    imag_equal && reals_equal(are, bre, tol)
}

#[cfg(test)]
#[path = "./ntraits_test.rs"]
mod tests;

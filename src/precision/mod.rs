//! Compile-time classification and promotion of scalar types.
//!
//! Every scalar carries a [`ScalarMeta`] record, and every supported pairing
//! of scalars resolves a [`Widest`] and [`Narrowest`] type through [`Widen`]
//! and [`Narrow`]. Resolution happens entirely in the type system; a pairing
//! without a rule is a compile error rather than a runtime failure.
//!
//! Rules:
//! - real with real picks by precision.
//! - complex with anything picks `Complex` at the resulting precision.
//! - conjugate with conjugate stays `Conjugate`, conjugate with a real or a
//!   complex becomes `Complex`.
//! - a [`Negator`] promotes as the type it wraps.
//! - a differentiable scalar wins both `Widest` and `Narrowest` against a real,
//!   see [`impl_differentiable_promotion`](crate::impl_differentiable_promotion).

use num_complex::Complex;

use crate::{conjugate::Conjugate, negator::Negator};

pub trait ScalarMeta {
    /// Capability rank. Integers are 0, `f32` based types 1, `f64` based
    /// types 2 and differentiable types 3.
    const RANK: u8;
    const IS_COMPLEX: bool = false;
    const IS_NEGATOR: bool = false;
    const IS_DIFFERENTIABLE: bool = false;
}

pub trait Widen<Rhs> {
    type Output;
}

pub trait Narrow<Rhs> {
    type Output;
}

pub type Widest<A, B> = <A as Widen<B>>::Output;
pub type Narrowest<A, B> = <A as Narrow<B>>::Output;

macro_rules! impl_meta {
    ($rank:expr, $complex:expr => $($t:ty),+) => {
        $(
            impl ScalarMeta for $t {
                const RANK: u8 = $rank;
                const IS_COMPLEX: bool = $complex;
            }
        )+
    };
}

impl_meta!(0, false => i32, i64);
impl_meta!(1, false => f32);
impl_meta!(2, false => f64);
impl_meta!(1, true => Complex<f32>, Conjugate<f32>);
impl_meta!(2, true => Complex<f64>, Conjugate<f64>);

impl<T: ScalarMeta> ScalarMeta for Negator<T> {
    const RANK: u8 = T::RANK;
    const IS_COMPLEX: bool = T::IS_COMPLEX;
    const IS_NEGATOR: bool = true;
    const IS_DIFFERENTIABLE: bool = T::IS_DIFFERENTIABLE;
}

macro_rules! promote {
    ($($a:ty, $b:ty => $wide:ty, $narrow:ty;)+) => {
        $(
            impl Widen<$b> for $a {
                type Output = $wide;
            }

            impl Narrow<$b> for $a {
                type Output = $narrow;
            }
        )+
    };
}

// a negator on the right promotes as its wrapped type. the left side is
// covered by the blanket impls below.
macro_rules! promote_negator_rhs {
    ($($t:ty),+) => {
        $(
            impl<B> Widen<Negator<B>> for $t
            where
                $t: Widen<B>,
            {
                type Output = Widest<$t, B>;
            }

            impl<B> Narrow<Negator<B>> for $t
            where
                $t: Narrow<B>,
            {
                type Output = Narrowest<$t, B>;
            }
        )+
    };
}

type C32 = Complex<f32>;
type C64 = Complex<f64>;
type J32 = Conjugate<f32>;
type J64 = Conjugate<f64>;

promote! {
    f32, f32 => f32, f32;
    f32, f64 => f64, f32;
    f32, C32 => C32, C32;
    f32, C64 => C64, C32;
    f32, J32 => C32, C32;
    f32, J64 => C64, C32;

    f64, f32 => f64, f32;
    f64, f64 => f64, f64;
    f64, C32 => C64, C32;
    f64, C64 => C64, C64;
    f64, J32 => C64, C32;
    f64, J64 => C64, C64;

    C32, f32 => C32, C32;
    C32, f64 => C64, C32;
    C32, C32 => C32, C32;
    C32, C64 => C64, C32;
    C32, J32 => C32, C32;
    C32, J64 => C64, C32;

    C64, f32 => C64, C32;
    C64, f64 => C64, C64;
    C64, C32 => C64, C32;
    C64, C64 => C64, C64;
    C64, J32 => C64, C32;
    C64, J64 => C64, C64;

    J32, f32 => C32, C32;
    J32, f64 => C64, C32;
    J32, C32 => C32, C32;
    J32, C64 => C64, C32;
    J32, J32 => J32, J32;
    J32, J64 => J64, J32;

    J64, f32 => C64, C32;
    J64, f64 => C64, C64;
    J64, C32 => C64, C32;
    J64, C64 => C64, C64;
    J64, J32 => J64, J32;
    J64, J64 => J64, J64;
}

promote_negator_rhs!(f32, f64, C32, C64, J32, J64);

impl<A, B> Widen<B> for Negator<A>
where
    A: Widen<B>,
{
    type Output = Widest<A, B>;
}

impl<A, B> Narrow<B> for Negator<A>
where
    A: Narrow<B>,
{
    type Output = Narrowest<A, B>;
}

/// Promotion rules for a differentiable scalar type `$ad`.
///
/// Pairing `$ad` with itself, `f32`, `f64` or a negator of any of those
/// resolves to `$ad` for both [`Widest`] and [`Narrowest`]: dropping to a
/// plain real would discard the derivative information carried by `$ad`.
/// Pairings with complex or conjugate types are left undefined.
#[macro_export]
macro_rules! impl_differentiable_promotion {
    ($ad:ty) => {
        impl $crate::precision::Widen<$ad> for $ad {
            type Output = $ad;
        }

        impl $crate::precision::Narrow<$ad> for $ad {
            type Output = $ad;
        }

        $crate::impl_differentiable_promotion!(@real $ad, f32);
        $crate::impl_differentiable_promotion!(@real $ad, f64);

        impl<B> $crate::precision::Widen<$crate::negator::Negator<B>> for $ad
        where
            $ad: $crate::precision::Widen<B>,
        {
            type Output = $crate::precision::Widest<$ad, B>;
        }

        impl<B> $crate::precision::Narrow<$crate::negator::Negator<B>> for $ad
        where
            $ad: $crate::precision::Narrow<B>,
        {
            type Output = $crate::precision::Narrowest<$ad, B>;
        }
    };
    (@real $ad:ty, $real:ty) => {
        impl $crate::precision::Widen<$real> for $ad {
            type Output = $ad;
        }

        impl $crate::precision::Widen<$ad> for $real {
            type Output = $ad;
        }

        impl $crate::precision::Narrow<$real> for $ad {
            type Output = $ad;
        }

        impl $crate::precision::Narrow<$ad> for $real {
            type Output = $ad;
        }
    };
}

#[cfg(test)]
#[path = "./precision_test.rs"]
mod tests;

#![cfg_attr(not(feature = "std"), no_std)]

//! Numeric traits for code that is generic over its scalar type.
//!
//! - [`precision`] resolves the [`Widest`] and [`Narrowest`] of two scalar
//!   types at compile time.
//! - [`negator`] provides [`Negator<T>`], a view that negates a value in place
//!   by reinterpreting its storage.
//! - [`ntraits`] is the facade algorithms call into: classification,
//!   cross-type numeric equality, and passive value extraction that refuses
//!   to run while a differentiable scalar is being taped.
//! - [`tape`] (with `std`) is a reverse-mode engine providing [`ADouble`].

pub mod conjugate;
pub mod error;
pub mod negator;
pub mod ntraits;
pub mod precision;
pub mod types;

#[cfg(feature = "std")]
pub mod tape;

pub use conjugate::Conjugate;
pub use error::{Error, Result, TapeTag};
pub use negator::{as_negated_view, as_plain, ExactNeg, Negator, TryNeg};
pub use ntraits::{
    cast, is_finite, is_inf, is_nan, is_numerically_equal, is_numerically_equal_tol, value,
    CastFrom, Idle, NTraits, RecordingContext,
};
pub use precision::{Narrow, Narrowest, ScalarMeta, Widen, Widest};
pub use types::Real;

#[cfg(feature = "std")]
pub use tape::{trace_off, trace_on, ADouble, ThreadTape, Trace};

pub use num_complex::Complex;

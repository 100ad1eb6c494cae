use core::{
    fmt::{Debug, Display},
    ops::Neg,
};

use num_traits::{Float, NumAssignOps, NumCast, Signed};

// https://stackoverflow.com/questions/40929867/how-do-you-abstract-generics-in-nested-rust-types
// https://stackoverflow.com/questions/61167383/type-aliasing-for-multiple-traits-with-generic-types
pub trait Num:
    num_traits::Num + NumCast + NumAssignOps + PartialOrd + Neg<Output = Self> + Signed + Debug + Copy + Display
{
}
impl<T> Num for T where
    T: num_traits::Num
        + NumCast
        + NumAssignOps
        + PartialOrd
        + Neg<Output = Self>
        + Signed
        + Debug
        + Copy
        + Display
{
}

pub trait NumFloat: Float + Num {}
impl<T> NumFloat for T where T: Float + Num {}

/// A built-in floating point precision (`f32` or `f64`).
///
/// Every scalar the crate knows about stores its components in one of these,
/// and numeric comparisons are carried out in them.
pub trait Real: NumFloat + Default + Send + Sync + 'static {
    /// Relative tolerance below which two values are considered the same
    /// number. This is `eps^(7/8)`, leaving a few bits of slack for
    /// accumulated rounding.
    const SIGNIFICANT: Self;

    fn as_f64(self) -> f64;
}

impl Real for f32 {
    // f32::EPSILON.powf(0.875)
    const SIGNIFICANT: f32 = 8.745_232e-7;

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Real for f64 {
    // f64::EPSILON.powf(0.875)
    const SIGNIFICANT: f64 = 2.009_718_347_115_232e-14;

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant() {
        assert!((f32::SIGNIFICANT - f32::EPSILON.powf(0.875)).abs() < 1e-12);
        assert!((f64::SIGNIFICANT - f64::EPSILON.powf(0.875)).abs() < 1e-26);
        assert!(f64::SIGNIFICANT < f32::SIGNIFICANT as f64);
    }
}

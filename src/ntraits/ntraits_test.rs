use num_complex::Complex;

use super::*;
use crate::conjugate::Conjugate;

/// A context pinned to a fixed recording state.
struct Recording(Option<TapeTag>);

impl RecordingContext for Recording {
    fn active_tape(&self) -> Option<TapeTag> {
        self.0
    }
}

/// Minimal differentiable scalar: a value and a derivative.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Dual {
    value: f64,
    derivative: f64,
}

impl ScalarMeta for Dual {
    const RANK: u8 = 3;
    const IS_DIFFERENTIABLE: bool = true;
}

impl NTraits for Dual {
    type Precision = f64;
    type Passive = f64;
    type Context = Idle;

    fn real_part(&self) -> f64 {
        self.value
    }

    fn passive(&self) -> Result<f64> {
        Ok(self.value)
    }
}

const RECORDING: Recording = Recording(Some(7));
const IDLE: Recording = Recording(None);

#[test]
fn test_real_classification() {
    assert!(is_nan(&f64::NAN));
    assert!(!is_nan(&-9.45_f64));
    assert!(is_finite(&-9.45_f32));
    assert!(!is_finite(&f64::NAN));
    assert!(!is_finite(&f32::INFINITY));
    assert!(is_inf(&f64::NEG_INFINITY));
    assert!(!is_inf(&f64::NAN));
    assert!(is_finite(&-9_i32) && !is_nan(&-9_i64) && !is_inf(&i32::MAX));
}

#[test]
fn test_complex_classification() {
    let nan_im = Complex::new(1.0_f64, f64::NAN);
    let inf_re = Complex::new(f64::INFINITY, 0.0);
    let inf_nan = Complex::new(f64::INFINITY, f64::NAN);
    assert!(is_nan(&nan_im) && !is_finite(&nan_im) && !is_inf(&nan_im));
    assert!(!is_nan(&inf_re) && !is_finite(&inf_re) && is_inf(&inf_re));
    assert!(is_nan(&inf_nan) && !is_inf(&inf_nan));
    assert!(is_finite(&Conjugate::new(1.0_f32, 2.0)));
    assert!(is_inf(&Conjugate::new(0.0_f32, f32::INFINITY)));
}

#[test]
fn test_numerically_equal_reals() {
    let xd = -9.45_f64;
    let xf = -9.45_f32;
    assert!(is_numerically_equal(&xd, &xd));
    assert!(is_numerically_equal(&xd, &xf));
    assert!(is_numerically_equal(&xf, &xd));
    assert!(is_numerically_equal(&-9_i32, &-9.0_f64));
    assert!(is_numerically_equal(&-9.0_f32, &-9_i64));
    assert!(!is_numerically_equal(&xd, &-9.4500001_f64));
    assert!(!is_numerically_equal(&1.0_f64, &-1.0_f64));
}

#[test]
fn test_numerically_equal_small_magnitudes() {
    // below one the tolerance is absolute
    assert!(is_numerically_equal(&1e-20_f64, &0.0_f64));
    assert!(!is_numerically_equal(&1e-3_f64, &0.0_f64));
    assert!(is_numerically_equal_tol(&1e-3_f64, &0.0_f64, 1e-2));
}

#[test]
fn test_numerically_equal_special_values() {
    assert!(is_numerically_equal(&f64::NAN, &f64::NAN));
    assert!(is_numerically_equal(&f64::NAN, &f32::NAN));
    assert!(!is_numerically_equal(&f64::NAN, &1.0_f64));
    assert!(!is_numerically_equal(&1.0_f64, &f64::NAN));
    assert!(is_numerically_equal(&f64::INFINITY, &f32::INFINITY));
    assert!(!is_numerically_equal(&f64::INFINITY, &f64::NEG_INFINITY));
    assert!(!is_numerically_equal(&f64::INFINITY, &f64::MAX));
}

#[test]
fn test_numerically_equal_complex() {
    let xd = -9.45_f64;
    let xf = xd as f32;
    let cd = Complex::new(xd, 0.0);
    let cf = Complex::new(xf, 0.0);
    let cjd = Conjugate::new(xd, 0.0);
    let cjf = Conjugate::new(xf, 0.0);

    assert!(is_numerically_equal(&cd, &xd) && is_numerically_equal(&xd, &cd));
    assert!(is_numerically_equal(&cf, &xd) && is_numerically_equal(&xd, &cf));
    assert!(is_numerically_equal(&cjd, &xf) && is_numerically_equal(&xf, &cjd));
    assert!(is_numerically_equal(&cjf, &xd) && is_numerically_equal(&xd, &cjf));
    assert!(is_numerically_equal(&cd, &cjf) && is_numerically_equal(&cjf, &cd));

    // a real-valued operand needs an exactly zero imaginary part
    let tiny_im = Complex::new(xd, 1e-300);
    assert!(!is_numerically_equal(&tiny_im, &xd));
    assert!(!is_numerically_equal(&xd, &tiny_im));
    assert!(is_numerically_equal(&tiny_im, &cd));

    let c = Complex::new(1.0_f64, 2.0);
    assert!(is_numerically_equal(&Conjugate::new(1.0_f64, -2.0), &c));
    assert!(!is_numerically_equal(&Conjugate::new(1.0_f64, 2.0), &c));
}

#[test]
fn test_numerically_equal_negator() {
    let x = 9.45_f64;
    let nx = Negator::view(&x);
    assert!(is_numerically_equal(nx, &-x));
    assert!(is_numerically_equal(&-x, nx));
    assert!(is_numerically_equal(nx, &(-x as f32)));
    let c = Complex::new(1.0_f32, 2.0);
    assert!(is_numerically_equal(Negator::view(&c), &Complex::new(-1.0_f64, -2.0)));
}

#[test]
fn test_value_of_plain_scalars() {
    assert_eq!(value(&5.0_f64), Ok(5.0));
    assert_eq!(5.0_f32.value_in(&RECORDING), Ok(5.0));
    assert_eq!(value(Negator::view(&5.0_f64)), Ok(-5.0));
    assert_eq!(value(&Complex::new(1.0_f64, 2.0)), Ok(Complex::new(1.0, 2.0)));
}

#[test]
fn test_value_of_negated_integers() {
    assert_eq!(value(Negator::view(&-5_i32)), Ok(5));
    assert_eq!(
        value(Negator::view(&i32::MIN)),
        Err(Error::NotRepresentable { target: "i32" })
    );
    assert_eq!(
        cast::<f64, _>(Negator::view(&i64::MIN)),
        Err(Error::NotRepresentable { target: "i64" })
    );
    assert_eq!(cast::<f64, _>(Negator::view(&i64::MAX)), Ok(-(i64::MAX as f64)));

    // classification and comparison never leave f64
    let min = Negator::view(&i32::MIN);
    assert!(is_finite(min) && !is_nan(min));
    assert!(is_numerically_equal(min, &2_147_483_648.0_f64));
}

#[test]
fn test_value_of_differentiable_scalar() {
    let a = Dual {
        value: 5.0,
        derivative: 1.0,
    };
    assert_eq!(a.value_in(&IDLE), Ok(5.0));
    assert_eq!(
        a.value_in(&RECORDING),
        Err(Error::TapingNotAllowed {
            op: "value",
            tag: 7
        })
    );
    assert_eq!(a.derivative, 1.0);
    assert_eq!(a.value_in(&IDLE), Ok(5.0));
    assert!(Negator::view(&a).value_in(&RECORDING).is_err());
    assert_eq!(Negator::view(&a).value_in(&IDLE), Ok(-5.0));
}

#[test]
fn test_cast() {
    let a = Dual {
        value: 5.0,
        derivative: 0.0,
    };
    assert_eq!(a.cast_in::<f64, _>(&IDLE), Ok(5.0));
    assert_eq!(a.cast_in::<f32, _>(&IDLE), Ok(5.0));
    assert_eq!(a.cast_in::<i32, _>(&IDLE), Ok(5));
    assert!(matches!(
        a.cast_in::<f64, _>(&RECORDING),
        Err(Error::TapingNotAllowed { op: "cast", .. })
    ));
    assert!(a.cast_in::<Complex<f64>, _>(&RECORDING).is_err());

    assert_eq!(cast::<f32, _>(&2.5_f64), Ok(2.5));
    assert_eq!(2.5_f64.cast_in::<f32, _>(&RECORDING), Ok(2.5));
    assert_eq!(cast::<Complex<f64>, _>(&Conjugate::new(1.0_f32, 2.0)), Ok(Complex::new(1.0, -2.0)));
    assert_eq!(
        cast::<i32, _>(&f64::NAN),
        Err(Error::NotRepresentable { target: "i32" })
    );
    assert!(cast::<f64, _>(&Complex::new(1.0_f64, 1.0)).is_err());
    assert_eq!(cast::<f64, _>(&Complex::new(1.0_f64, 0.0)), Ok(1.0));
}

#[test]
fn test_context_by_reference() {
    let ctx: &dyn RecordingContext = &RECORDING;
    assert!(ctx.is_recording());
    assert!(!Idle.is_recording());
    let a = Dual {
        value: 1.0,
        derivative: 0.0,
    };
    assert!(a.value_in(ctx).is_err());
    assert!(a.value_in(&ctx).is_err());
}

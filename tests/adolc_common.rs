use core::any::TypeId;

use ntraits::{
    is_finite, is_inf, is_nan, is_numerically_equal,
    tape::{function, gradient, jacobian},
    trace_off, trace_on, ADouble, Complex, Conjugate, Error, NTraits, Narrowest, Negator, Widest,
};

fn same<A: 'static, B: 'static>() -> bool {
    TypeId::of::<A>() == TypeId::of::<B>()
}

#[test_log::test]
fn test_derivative() {
    let xp = [-2.3];
    trace_on(1).unwrap();
    let mut x = ADouble::default();
    x.declare_independent(xp[0]);
    let y = 3.0 * x.powi(3) + x.cos() + 1.0;
    let y0 = y.declare_dependent();
    trace_off().unwrap();

    assert!(is_numerically_equal(&y0, &(3.0 * xp[0].powi(3) + xp[0].cos() + 1.0)));
    let jac = jacobian(1, &xp).unwrap();
    assert!(is_numerically_equal(&jac[0][0], &(9.0 * x.powi(2) - x.sin())));
}

#[test]
fn test_ntraits() {
    assert!(same::<Widest<f32, ADouble>, ADouble>());
    assert!(same::<Widest<ADouble, f32>, ADouble>());
    assert!(same::<Widest<f64, ADouble>, ADouble>());
    assert!(same::<Widest<ADouble, f64>, ADouble>());
    assert!(same::<Widest<ADouble, ADouble>, ADouble>());
    assert!(same::<Narrowest<f32, ADouble>, ADouble>());
    assert!(same::<Narrowest<ADouble, f32>, ADouble>());
    assert!(same::<Narrowest<f64, ADouble>, ADouble>());
    assert!(same::<Narrowest<ADouble, f64>, ADouble>());
    assert!(same::<Narrowest<ADouble, ADouble>, ADouble>());

    let xad = ADouble::new(-9.45);
    let x_nan = ADouble::new(f64::NAN);
    let x_inf = ADouble::new(f64::INFINITY);
    assert!(is_nan(&x_nan));
    assert!(!is_nan(&xad));
    assert!(is_finite(&xad));
    assert!(!is_finite(&x_nan));
    assert!(!is_finite(&x_inf));
    assert!(is_inf(&x_inf));
    assert!(!is_inf(&xad));

    let xd = -9.45_f64;
    let xf = -9.45_f32;
    let yad = ADouble::from(-9);
    let yi = -9_i32;
    let cf = Complex::new(xf, 0.0);
    let cd = Complex::new(xd, 0.0);
    let cjf = Conjugate::new(xf, 0.0);
    let cjd = Conjugate::new(xd, 0.0);

    assert!(is_numerically_equal(&xad, &xd));
    assert!(is_numerically_equal(&xd, &xad));
    assert!(is_numerically_equal(&xad, &xad));
    assert!(is_numerically_equal(&xad, &xf));
    assert!(is_numerically_equal(&xf, &xad));
    assert!(is_numerically_equal(&yad, &yi));
    assert!(is_numerically_equal(&yi, &yad));
    assert!(is_numerically_equal(&cd, &xad));
    assert!(is_numerically_equal(&xad, &cd));
    assert!(is_numerically_equal(&cf, &xad));
    assert!(is_numerically_equal(&xad, &cf));
    assert!(is_numerically_equal(&cjd, &xad));
    assert!(is_numerically_equal(&xad, &cjd));
    assert!(is_numerically_equal(&cjf, &xad));
    assert!(is_numerically_equal(&xad, &cjf));
}

#[test_log::test]
fn test_taping_not_allowed() {
    let a = ADouble::new(5.0);
    assert_eq!(a.value(), Ok(5.0));

    trace_on(0).unwrap();
    assert_eq!(
        a.value(),
        Err(Error::TapingNotAllowed {
            op: "value",
            tag: 0
        })
    );
    trace_off().unwrap();
    assert_eq!(a.value(), Ok(5.0));
}

#[test_log::test]
fn test_negator() {
    let xp = [2.0];
    trace_on(2).unwrap();
    let mut x = ADouble::default();
    x.declare_independent(xp[0]);
    let result = x.powi(3);
    let y = Negator::view(&result).to_value();
    y.declare_dependent();
    trace_off().unwrap();

    assert_eq!(function(2, &xp).unwrap(), vec![-8.0]);
    let g = gradient(2, &xp).unwrap();
    assert!(g[0] == -3.0 * x.powi(2));

    let xd = ADouble::new(9.45);
    let nxd = Negator::view(&xd);
    assert!(is_numerically_equal(&-xd, nxd));

    let xad = ADouble::new(-9.45);
    let x_nan = ADouble::new(f64::NAN);
    let x_inf = ADouble::new(f64::INFINITY);
    let nxad = Negator::view(&xad);
    let nx_nan = Negator::view(&x_nan);
    let nx_inf = Negator::view(&x_inf);
    assert!(is_nan(nx_nan));
    assert!(!is_nan(nxad));
    assert!(is_finite(nxad));
    assert!(!is_finite(nx_nan));
    assert!(!is_finite(nx_inf));
    assert!(is_inf(nx_inf));
    assert!(!is_inf(nxad));

    let a = 5.0_f64;
    let ad = ADouble::new(5.0);
    assert!(Negator::new(a) == a);
    assert!(Negator::new(ad) == ad);
    assert!(*Negator::view(&a) == -a);
    assert!(*Negator::view(&ad) == -ad);
}

#[test_log::test]
fn test_cast() {
    let a = ADouble::new(5.0);
    let b = a.cast::<f64>().unwrap();
    assert!(b == a);

    trace_on(3).unwrap();
    assert_eq!(
        a.cast::<f64>(),
        Err(Error::TapingNotAllowed { op: "cast", tag: 3 })
    );
    trace_off().unwrap();

    trace_on(4).unwrap();
    let c = a.cast::<ADouble>().unwrap();
    trace_off().unwrap();
    assert!(c == a);
}

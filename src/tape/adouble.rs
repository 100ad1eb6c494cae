use core::{
    cmp::Ordering,
    fmt::{Debug, Display},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use super::{with_recorder, Location, Op, ThreadTape};
use crate::{
    error::Result,
    negator::{ExactNeg, Negator},
    ntraits::{CastFrom, NTraits, RecordingContext},
    precision::ScalarMeta,
};

/// A differentiable `f64`.
///
/// Outside a trace an `ADouble` is just its value. While a trace is open,
/// every operation touching an active `ADouble` is appended to the tape: the
/// result remembers where, so later operations can link to it.
#[derive(Clone, Copy, Default)]
pub struct ADouble {
    value: f64,
    location: Option<Location>,
}

impl ADouble {
    /// A constant: not an independent, never recorded on its own.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            location: None,
        }
    }

    /// An independent variable of the current trace, or a constant when no
    /// trace is open.
    pub fn independent(value: f64) -> Self {
        let mut x = Self::new(value);
        x.declare_independent(value);
        x
    }

    /// `x <<= value`: assigns `value` and marks `self` as the next independent.
    pub fn declare_independent(&mut self, value: f64) {
        self.value = value;
        self.location = with_recorder(|rec| {
            let node = rec.push_independent();
            rec.locate(node)
        });
    }

    /// `y >>= out`: marks `self` as the next dependent and hands out its value.
    ///
    /// This is how results leave a trace, so it is not subject to the taping
    /// guard on [`NTraits::value`].
    pub fn declare_dependent(&self) -> f64 {
        let value = self.value;
        with_recorder(|rec| {
            let node = rec
                .node(self.location)
                .unwrap_or_else(|| rec.push_const(value));
            rec.push_dependent(node);
        });
        value
    }

    /// Whether `self` is linked to the trace currently recording.
    pub fn is_active(&self) -> bool {
        with_recorder(|rec| rec.node(self.location).is_some()).unwrap_or(false)
    }

    fn unary(self, op: Op) -> Self {
        let value = op.eval(self.value, 0.0);
        let location = with_recorder(|rec| {
            let arg = rec.node(self.location)?;
            let node = rec.push_unary(op, arg);
            Some(rec.locate(node))
        })
        .flatten();
        Self { value, location }
    }

    fn binary(self, rhs: Self, op: Op) -> Self {
        let value = op.eval(self.value, rhs.value);
        let location = with_recorder(|rec| {
            let (lhs_node, rhs_node) = (rec.node(self.location), rec.node(rhs.location));
            if lhs_node.is_none() && rhs_node.is_none() {
                return None;
            }
            let lhs_node = lhs_node.unwrap_or_else(|| rec.push_const(self.value));
            let rhs_node = rhs_node.unwrap_or_else(|| rec.push_const(rhs.value));
            let node = rec.push_binary(op, lhs_node, rhs_node);
            Some(rec.locate(node))
        })
        .flatten();
        Self { value, location }
    }

    #[inline]
    pub fn powi(self, n: i32) -> Self {
        self.unary(Op::Powi(n))
    }

    #[inline]
    pub fn powf(self, exponent: impl Into<ADouble>) -> Self {
        self.binary(exponent.into(), Op::Powf)
    }

    #[inline]
    pub fn sin(self) -> Self {
        self.unary(Op::Sin)
    }

    #[inline]
    pub fn cos(self) -> Self {
        self.unary(Op::Cos)
    }

    #[inline]
    pub fn exp(self) -> Self {
        self.unary(Op::Exp)
    }

    #[inline]
    pub fn ln(self) -> Self {
        self.unary(Op::Ln)
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        self.unary(Op::Sqrt)
    }
}

impl From<f64> for ADouble {
    #[inline]
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<f32> for ADouble {
    #[inline]
    fn from(value: f32) -> Self {
        Self::new(value as f64)
    }
}

impl From<i32> for ADouble {
    #[inline]
    fn from(value: i32) -> Self {
        Self::new(value as f64)
    }
}

impl Neg for ADouble {
    type Output = ADouble;

    #[inline]
    fn neg(self) -> ADouble {
        self.unary(Op::Neg)
    }
}

impl ExactNeg for ADouble {}

macro_rules! impl_binary_ops {
    ($op_trait:ident, $op_fn:ident, $assign_trait:ident, $assign_fn:ident, $op:expr) => {
        impl $op_trait<ADouble> for ADouble {
            type Output = ADouble;

            #[inline]
            fn $op_fn(self, rhs: ADouble) -> ADouble {
                self.binary(rhs, $op)
            }
        }

        impl $op_trait<f64> for ADouble {
            type Output = ADouble;

            #[inline]
            fn $op_fn(self, rhs: f64) -> ADouble {
                self.binary(ADouble::new(rhs), $op)
            }
        }

        impl $op_trait<ADouble> for f64 {
            type Output = ADouble;

            #[inline]
            fn $op_fn(self, rhs: ADouble) -> ADouble {
                ADouble::new(self).binary(rhs, $op)
            }
        }

        impl $assign_trait<ADouble> for ADouble {
            #[inline]
            fn $assign_fn(&mut self, rhs: ADouble) {
                *self = self.binary(rhs, $op);
            }
        }

        impl $assign_trait<f64> for ADouble {
            #[inline]
            fn $assign_fn(&mut self, rhs: f64) {
                *self = self.binary(ADouble::new(rhs), $op);
            }
        }
    };
}

impl_binary_ops!(Add, add, AddAssign, add_assign, Op::Add);
impl_binary_ops!(Sub, sub, SubAssign, sub_assign, Op::Sub);
impl_binary_ops!(Mul, mul, MulAssign, mul_assign, Op::Mul);
impl_binary_ops!(Div, div, DivAssign, div_assign, Op::Div);

// comparisons look at values only and are never recorded
impl PartialEq for ADouble {
    #[inline]
    fn eq(&self, other: &ADouble) -> bool {
        self.value == other.value
    }
}

impl PartialEq<f64> for ADouble {
    #[inline]
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl PartialEq<ADouble> for f64 {
    #[inline]
    fn eq(&self, other: &ADouble) -> bool {
        *self == other.value
    }
}

impl PartialOrd for ADouble {
    #[inline]
    fn partial_cmp(&self, other: &ADouble) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl PartialOrd<f64> for ADouble {
    #[inline]
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.value.partial_cmp(other)
    }
}

impl Debug for ADouble {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.location {
            Some(location) => write!(f, "ADouble({:?} @ {:?})", self.value, location.node),
            None => write!(f, "ADouble({:?})", self.value),
        }
    }
}

impl Display for ADouble {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl ScalarMeta for ADouble {
    const RANK: u8 = 3;
    const IS_DIFFERENTIABLE: bool = true;
}

impl NTraits for ADouble {
    type Precision = f64;
    type Passive = f64;
    type Context = ThreadTape;

    #[inline]
    fn real_part(&self) -> f64 {
        self.value
    }

    #[inline]
    fn passive(&self) -> Result<f64> {
        Ok(self.value)
    }
}

impl CastFrom<ADouble> for ADouble {
    #[inline]
    fn cast_from<C>(value: &ADouble, _ctx: &C) -> Result<Self>
    where
        C: RecordingContext + ?Sized,
    {
        Ok(*value)
    }
}

impl CastFrom<Negator<ADouble>> for ADouble {
    #[inline]
    fn cast_from<C>(value: &Negator<ADouble>, _ctx: &C) -> Result<Self>
    where
        C: RecordingContext + ?Sized,
    {
        Ok(value.to_value())
    }
}

crate::impl_differentiable_promotion!(ADouble);
crate::impl_negator_eq!(ADouble);

//! `num_traits` coverage for [`Var`], which is what lets AD-generic code
//! bound itself on a single numeric trait.
//!
//! Everything here lifts through one of three shapes: nullary items wrap
//! the primitive result in [`Var::constant`], predicates and casts read the
//! primal value, and the math surface forwards to the chain-rule methods
//! the carrier already defines.

use std::num::FpCategory;

use num_traits::{
    Float as NumFloat, FloatConst, FromPrimitive, Num, NumCast, One, Signed, ToPrimitive, Zero,
};

use crate::float::Float;
use crate::var::Var;

/// `fn name() -> Self` items lifted constant-wise from `F`.
macro_rules! lift_nullary {
    ($($name:ident),+ $(,)?) => {
        $(
            #[inline]
            fn $name() -> Self {
                Var::constant(F::$name())
            }
        )+
    };
}

/// `fn name(self) -> T` items answered by the primal value alone.
macro_rules! read_primal {
    ($($name:ident -> $out:ty),+ $(,)?) => {
        $(
            #[inline]
            fn $name(self) -> $out {
                self.a.$name()
            }
        )+
    };
}

/// Unary math forwarded to the inherent chain-rule methods.
macro_rules! forward_unary {
    ($($name:ident),+ $(,)?) => {
        $(
            #[inline]
            fn $name(self) -> Self {
                Var::$name(self)
            }
        )+
    };
}

/// Binary math forwarded likewise.
macro_rules! forward_binary {
    ($($name:ident),+ $(,)?) => {
        $(
            #[inline]
            fn $name(self, rhs: Self) -> Self {
                Var::$name(self, rhs)
            }
        )+
    };
}

impl<F: Float, const N: usize> Zero for Var<F, N> {
    #[inline]
    fn zero() -> Self {
        Var::constant(F::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.a.is_zero()
    }
}

impl<F: Float, const N: usize> One for Var<F, N> {
    #[inline]
    fn one() -> Self {
        Var::constant(F::one())
    }
}

impl<F: Float, const N: usize> Num for Var<F, N> {
    type FromStrRadixErr = F::FromStrRadixErr;

    fn from_str_radix(s: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        F::from_str_radix(s, radix).map(Var::constant)
    }
}

macro_rules! lift_from_primitive {
    ($($name:ident($ty:ty)),+ $(,)?) => {
        $(
            #[inline]
            fn $name(n: $ty) -> Option<Self> {
                F::$name(n).map(Var::constant)
            }
        )+
    };
}

impl<F: Float, const N: usize> FromPrimitive for Var<F, N> {
    lift_from_primitive!(from_i64(i64), from_u64(u64), from_f32(f32), from_f64(f64));
}

macro_rules! cast_primal {
    ($($name:ident -> $ty:ty),+ $(,)?) => {
        $(
            #[inline]
            fn $name(&self) -> Option<$ty> {
                self.a.$name()
            }
        )+
    };
}

impl<F: Float, const N: usize> ToPrimitive for Var<F, N> {
    cast_primal!(to_i64 -> i64, to_u64 -> u64, to_f32 -> f32, to_f64 -> f64);
}

impl<F: Float, const N: usize> NumCast for Var<F, N> {
    #[inline]
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        F::from(n).map(Var::constant)
    }
}

impl<F: Float, const N: usize> Signed for Var<F, N> {
    #[inline]
    fn abs(&self) -> Self {
        Var::abs(*self)
    }

    #[inline]
    fn abs_sub(&self, rhs: &Self) -> Self {
        NumFloat::abs_sub(*self, *rhs)
    }

    #[inline]
    fn signum(&self) -> Self {
        Var::signum(*self)
    }

    #[inline]
    fn is_positive(&self) -> bool {
        self.a.is_sign_positive()
    }

    #[inline]
    fn is_negative(&self) -> bool {
        self.a.is_sign_negative()
    }
}

impl<F: Float, const N: usize> FloatConst for Var<F, N> {
    lift_nullary!(
        E,
        FRAC_1_PI,
        FRAC_1_SQRT_2,
        FRAC_2_PI,
        FRAC_2_SQRT_PI,
        FRAC_PI_2,
        FRAC_PI_3,
        FRAC_PI_4,
        FRAC_PI_6,
        FRAC_PI_8,
        LN_10,
        LN_2,
        LOG10_2,
        LOG10_E,
        LOG2_10,
        LOG2_E,
        PI,
        SQRT_2,
        TAU,
    );
}

impl<F: Float, const N: usize> NumFloat for Var<F, N> {
    lift_nullary!(
        nan,
        infinity,
        neg_infinity,
        neg_zero,
        min_value,
        min_positive_value,
        max_value,
        epsilon,
    );

    read_primal!(
        is_nan -> bool,
        is_infinite -> bool,
        is_finite -> bool,
        is_normal -> bool,
        is_sign_positive -> bool,
        is_sign_negative -> bool,
        classify -> FpCategory,
        integer_decode -> (u64, i16, i8),
    );

    forward_unary!(
        floor, ceil, round, trunc, fract, abs, signum, recip, sqrt, cbrt, exp, exp2, exp_m1, ln,
        log2, log10, ln_1p, sin, cos, tan, asin, acos, atan, sinh, cosh, tanh, asinh, acosh, atanh,
        to_degrees, to_radians,
    );

    forward_binary!(powf, log, atan2, hypot, max, min);

    #[inline]
    fn powi(self, n: i32) -> Self {
        Var::powi(self, n)
    }

    #[inline]
    fn mul_add(self, m: Self, b: Self) -> Self {
        Var::mul_add(self, m, b)
    }

    #[inline]
    fn sin_cos(self) -> (Self, Self) {
        Var::sin_cos(self)
    }

    #[inline]
    fn abs_sub(self, rhs: Self) -> Self {
        (self - rhs).max(Self::zero())
    }
}

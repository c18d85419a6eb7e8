//! The [`Scalar`] trait for AD-generic numeric code.
//!
//! Write a cost function once as `fn f<S: Scalar>(x: &[S]) -> S` and run it
//! on plain floats (no derivatives, full speed) or on [`Var`] (value plus
//! gradient in one pass) without touching the body.

use std::fmt::{Debug, Display};

use num_traits::FromPrimitive;

use crate::float::Float;
use crate::var::Var;

/// One bound covering every numeric carrier this crate evaluates with.
pub trait Scalar:
    num_traits::Float
    + num_traits::FloatConst
    + FromPrimitive
    + Copy
    + Default
    + Debug
    + Display
    + Send
    + 'static
{
    /// The primitive float underneath.
    type Float: Float;

    /// Lift a plain float to this carrier as a constant (zero derivative).
    fn from_f(val: Self::Float) -> Self;

    /// Extract the primal value.
    fn value(&self) -> Self::Float;
}

impl Scalar for f32 {
    type Float = f32;

    #[inline]
    fn from_f(val: f32) -> Self {
        val
    }

    #[inline]
    fn value(&self) -> f32 {
        *self
    }
}

impl Scalar for f64 {
    type Float = f64;

    #[inline]
    fn from_f(val: f64) -> Self {
        val
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }
}

impl<F: Float, const N: usize> Scalar for Var<F, N> {
    type Float = F;

    #[inline]
    fn from_f(val: F) -> Self {
        Var::constant(val)
    }

    #[inline]
    fn value(&self) -> F {
        self.a
    }
}

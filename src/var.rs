//! Forward-mode dual numbers with a compile-time gradient dimension.
//!
//! [`Var<F, N>`] pairs a value with its partial derivatives with respect to
//! `N` fixed independent variables. One evaluation of a function built from
//! `Var` arithmetic yields the value and the full gradient, entirely on the
//! stack.
//!
//! Every differentiable operation reduces to one of two tangent shapes:
//! a unary op scales the gradient by `f'(a)` ([`Var::chain`]), and a binary
//! op takes a weighted sum of its operands' gradients. The whole math
//! surface below is written in those terms.

use std::fmt::{self, Display};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

use crate::float::Float;

/// A dual number: primal value plus an `N`-component gradient.
///
/// `Var { a, d }` represents the value `a` together with
/// `d[i] = ∂a/∂x_i` for the `N` independent variables declared by
/// [`Var::seed`].
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct Var<F: Float, const N: usize> {
    /// Primal value.
    pub a: F,
    /// Gradient: one partial derivative per independent variable.
    pub d: [F; N],
}

impl<F: Float, const N: usize> Var<F, N> {
    /// Build a dual from raw parts.
    #[inline]
    pub fn new(a: F, d: [F; N]) -> Self {
        Var { a, d }
    }

    /// A constant: value `v`, zero gradient in every lane.
    #[inline]
    pub fn constant(v: F) -> Self {
        Var {
            a: v,
            d: [F::zero(); N],
        }
    }

    /// Declare `v` as the `i`-th independent variable: the gradient is the
    /// `i`-th standard basis vector. Requires `i < N`.
    #[inline]
    pub fn seed(v: F, i: usize) -> Self {
        debug_assert!(i < N, "seed index {} out of range for {} lanes", i, N);
        Var {
            a: v,
            d: std::array::from_fn(|k| if k == i { F::one() } else { F::zero() }),
        }
    }

    /// Unary chain rule: new value `val`, gradient scaled by `slope`.
    #[inline(always)]
    fn chain(self, val: F, slope: F) -> Self {
        Var {
            a: val,
            d: self.d.map(|g| slope * g),
        }
    }

    /// Binary chain rule: new value `val`, gradient `wl·d + wr·rhs.d`.
    #[inline(always)]
    fn combine(self, rhs: Self, val: F, wl: F, wr: F) -> Self {
        Var {
            a: val,
            d: std::array::from_fn(|k| wl * self.d[k] + wr * rhs.d[k]),
        }
    }
}

/// Unary functions given as `name(a) => (f(a), f'(a))`. Each entry becomes
/// an inherent method routing through [`Var::chain`].
macro_rules! chain_rule {
    ($($(#[$doc:meta])* $name:ident($a:ident) => $pair:expr;)+) => {
        impl<F: Float, const N: usize> Var<F, N> {
            $(
                $(#[$doc])*
                #[inline]
                pub fn $name(self) -> Self {
                    let $a = self.a;
                    let (val, slope) = $pair;
                    self.chain(val, slope)
                }
            )+
        }
    };
}

chain_rule! {
    /// `1/x`, slope `−1/a²`.
    recip(a) => { let i = F::one() / a; (i, -i * i) };
    /// Slope `1/(2√a)`.
    sqrt(a) => { let r = a.sqrt(); (r, F::from(0.5).unwrap() / r) };
    /// Slope `1/(3·∛a²)`.
    cbrt(a) => { let r = a.cbrt(); (r, (F::from(3.0).unwrap() * r * r).recip()) };
    /// `eˣ` is its own slope.
    exp(a) => { let e = a.exp(); (e, e) };
    exp2(a) => { let e = a.exp2(); (e, e * F::LN_2()) };
    exp_m1(a) => (a.exp_m1(), a.exp());
    /// Slope `1/a`.
    ln(a) => (a.ln(), a.recip());
    log2(a) => (a.log2(), (a * F::LN_2()).recip());
    log10(a) => (a.log10(), (a * F::LN_10()).recip());
    ln_1p(a) => (a.ln_1p(), (F::one() + a).recip());
    sin(a) => (a.sin(), a.cos());
    cos(a) => (a.cos(), -a.sin());
    /// Slope `1 + tan²a`, the secant squared.
    tan(a) => { let t = a.tan(); (t, F::one() + t * t) };
    asin(a) => (a.asin(), (F::one() - a * a).sqrt().recip());
    acos(a) => (a.acos(), -(F::one() - a * a).sqrt().recip());
    atan(a) => (a.atan(), (F::one() + a * a).recip());
    sinh(a) => (a.sinh(), a.cosh());
    cosh(a) => (a.cosh(), a.sinh());
    /// Slope `1 − tanh²a`.
    tanh(a) => { let t = a.tanh(); (t, F::one() - t * t) };
    asinh(a) => (a.asinh(), (a * a + F::one()).sqrt().recip());
    acosh(a) => (a.acosh(), (a * a - F::one()).sqrt().recip());
    atanh(a) => (a.atanh(), (F::one() - a * a).recip());
}

/// Step-like functions: the output is locally constant, so the gradient is
/// dropped. The kink/jump points report zero as well.
macro_rules! locally_flat {
    ($($(#[$doc:meta])* $name:ident;)+) => {
        impl<F: Float, const N: usize> Var<F, N> {
            $(
                $(#[$doc])*
                #[inline]
                pub fn $name(self) -> Self {
                    Var::constant(self.a.$name())
                }
            )+
        }
    };
}

locally_flat! {
    /// `−1`, `0`, or `1` by sign of the value.
    signum;
    floor;
    ceil;
    round;
    trunc;
}

impl<F: Float, const N: usize> Var<F, N> {
    /// Integer power, slope `n·aⁿ⁻¹`.
    #[inline]
    pub fn powi(self, n: i32) -> Self {
        self.chain(self.a.powi(n), F::from(n).unwrap() * self.a.powi(n - 1))
    }

    /// `x^y` with both base and exponent differentiated:
    /// `d(x^y) = x^y·(y/x)·dx + x^y·ln(x)·dy`.
    #[inline]
    pub fn powf(self, rhs: Self) -> Self {
        let v = self.a.powf(rhs.a);
        self.combine(rhs, v, v * rhs.a / self.a, v * self.a.ln())
    }

    /// Logarithm in an arbitrary (dual) base.
    #[inline]
    pub fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    /// Sine and cosine from one platform call.
    #[inline]
    pub fn sin_cos(self) -> (Self, Self) {
        let (s, c) = self.a.sin_cos();
        (self.chain(s, c), self.chain(c, -s))
    }

    /// Four-quadrant arctangent of `self/rhs`.
    #[inline]
    pub fn atan2(self, rhs: Self) -> Self {
        let r2 = self.a * self.a + rhs.a * rhs.a;
        self.combine(rhs, self.a.atan2(rhs.a), rhs.a / r2, -self.a / r2)
    }

    #[inline]
    pub fn hypot(self, rhs: Self) -> Self {
        let h = self.a.hypot(rhs.a);
        self.combine(rhs, h, self.a / h, rhs.a / h)
    }

    /// Fused `self·m + b`, fused in the tangents too.
    #[inline]
    pub fn mul_add(self, m: Self, b: Self) -> Self {
        Var {
            a: self.a.mul_add(m.a, b.a),
            d: std::array::from_fn(|k| self.d[k].mul_add(m.a, self.a.mul_add(m.d[k], b.d[k]))),
        }
    }

    /// `|x|`, slope `sign(a)`.
    #[inline]
    pub fn abs(self) -> Self {
        self.chain(self.a.abs(), self.a.signum())
    }

    /// Fractional part; unit slope between the jumps.
    #[inline]
    pub fn fract(self) -> Self {
        Var {
            a: self.a.fract(),
            d: self.d,
        }
    }

    /// The larger by value, carrying the winner's gradient. Ties keep `self`.
    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        if rhs.a > self.a {
            rhs
        } else {
            self
        }
    }

    /// The smaller by value, carrying the winner's gradient. Ties keep `self`.
    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        if rhs.a < self.a {
            rhs
        } else {
            self
        }
    }

    #[inline]
    pub fn to_degrees(self) -> Self {
        self.chain(self.a.to_degrees(), F::from(180.0).unwrap() / F::PI())
    }

    #[inline]
    pub fn to_radians(self) -> Self {
        self.chain(self.a.to_radians(), F::PI() / F::from(180.0).unwrap())
    }
}

// ── Operators ──
//
// The four arithmetic ops are weighted gradient sums; their weights are
// exactly the partial derivatives of the op with respect to each operand.

impl<F: Float, const N: usize> Add for Var<F, N> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.combine(rhs, self.a + rhs.a, F::one(), F::one())
    }
}

impl<F: Float, const N: usize> Sub for Var<F, N> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.combine(rhs, self.a - rhs.a, F::one(), -F::one())
    }
}

impl<F: Float, const N: usize> Mul for Var<F, N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.combine(rhs, self.a * rhs.a, rhs.a, self.a)
    }
}

impl<F: Float, const N: usize> Div for Var<F, N> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        // Quotient rule as weights: 1/b on the left, −a/b² on the right.
        let i = rhs.a.recip();
        self.combine(rhs, self.a * i, i, -self.a * i * i)
    }
}

impl<F: Float, const N: usize> Neg for Var<F, N> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.chain(-self.a, -F::one())
    }
}

// Remainder subtracts a locally constant multiple of `rhs`, so the left
// gradient passes through.
impl<F: Float, const N: usize> Rem for Var<F, N> {
    type Output = Self;
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        Var {
            a: self.a % rhs.a,
            d: self.d,
        }
    }
}

macro_rules! compound_assign {
    ($($trait_:ident, $method:ident, $op:tt);+ $(;)?) => {
        $(
            impl<F: Float, const N: usize> $trait_ for Var<F, N> {
                #[inline]
                fn $method(&mut self, rhs: Self) {
                    *self = *self $op rhs;
                }
            }
        )+
    };
}

compound_assign! {
    AddAssign, add_assign, +;
    SubAssign, sub_assign, -;
    MulAssign, mul_assign, *;
    DivAssign, div_assign, /;
    RemAssign, rem_assign, %;
}

// Mixed arithmetic with the matching primitive float. The dual-on-the-left
// forms are primitive; the scalar-on-the-left forms delegate to them where
// the operation commutes (or anti-commutes), and division gets its own rule.
macro_rules! scalar_ops {
    ($($f:ty),+) => {
        $(
            impl<const N: usize> Add<$f> for Var<$f, N> {
                type Output = Self;
                #[inline]
                fn add(self, rhs: $f) -> Self {
                    Var { a: self.a + rhs, d: self.d }
                }
            }

            impl<const N: usize> Sub<$f> for Var<$f, N> {
                type Output = Self;
                #[inline]
                fn sub(self, rhs: $f) -> Self {
                    Var { a: self.a - rhs, d: self.d }
                }
            }

            impl<const N: usize> Mul<$f> for Var<$f, N> {
                type Output = Self;
                #[inline]
                fn mul(self, rhs: $f) -> Self {
                    self.chain(self.a * rhs, rhs)
                }
            }

            impl<const N: usize> Div<$f> for Var<$f, N> {
                type Output = Self;
                #[inline]
                fn div(self, rhs: $f) -> Self {
                    let i = rhs.recip();
                    self.chain(self.a * i, i)
                }
            }

            impl<const N: usize> Rem<$f> for Var<$f, N> {
                type Output = Self;
                #[inline]
                fn rem(self, rhs: $f) -> Self {
                    Var { a: self.a % rhs, d: self.d }
                }
            }

            impl<const N: usize> Add<Var<$f, N>> for $f {
                type Output = Var<$f, N>;
                #[inline]
                fn add(self, rhs: Var<$f, N>) -> Var<$f, N> {
                    rhs + self
                }
            }

            impl<const N: usize> Sub<Var<$f, N>> for $f {
                type Output = Var<$f, N>;
                #[inline]
                fn sub(self, rhs: Var<$f, N>) -> Var<$f, N> {
                    -(rhs - self)
                }
            }

            impl<const N: usize> Mul<Var<$f, N>> for $f {
                type Output = Var<$f, N>;
                #[inline]
                fn mul(self, rhs: Var<$f, N>) -> Var<$f, N> {
                    rhs * self
                }
            }

            impl<const N: usize> Div<Var<$f, N>> for $f {
                type Output = Var<$f, N>;
                #[inline]
                fn div(self, rhs: Var<$f, N>) -> Var<$f, N> {
                    // d(c/x) = −c·dx/x²
                    let i = rhs.a.recip();
                    rhs.chain(self * i, -self * i * i)
                }
            }

            impl<const N: usize> Rem<Var<$f, N>> for $f {
                type Output = Var<$f, N>;
                #[inline]
                fn rem(self, rhs: Var<$f, N>) -> Var<$f, N> {
                    Var::constant(self % rhs.a)
                }
            }

            impl<const N: usize> AddAssign<$f> for Var<$f, N> {
                #[inline]
                fn add_assign(&mut self, rhs: $f) {
                    self.a += rhs;
                }
            }

            impl<const N: usize> SubAssign<$f> for Var<$f, N> {
                #[inline]
                fn sub_assign(&mut self, rhs: $f) {
                    self.a -= rhs;
                }
            }

            impl<const N: usize> MulAssign<$f> for Var<$f, N> {
                #[inline]
                fn mul_assign(&mut self, rhs: $f) {
                    *self = *self * rhs;
                }
            }

            impl<const N: usize> DivAssign<$f> for Var<$f, N> {
                #[inline]
                fn div_assign(&mut self, rhs: $f) {
                    *self = *self / rhs;
                }
            }
        )+
    };
}

scalar_ops!(f32, f64);

// Equality and ordering look at the value only; tangents are bookkeeping.
impl<F: Float, const N: usize> PartialEq for Var<F, N> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a
    }
}

impl<F: Float, const N: usize> PartialOrd for Var<F, N> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.a.partial_cmp(&other.a)
    }
}

impl<F: Float, const N: usize> Default for Var<F, N> {
    fn default() -> Self {
        Var::constant(F::zero())
    }
}

impl<F: Float, const N: usize> From<F> for Var<F, N> {
    /// Lift a plain scalar: the value is kept, the gradient resets to zero.
    #[inline]
    fn from(val: F) -> Self {
        Var::constant(val)
    }
}

impl<F: Float, const N: usize> Display for Var<F, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.a)?;
        for (i, g) in self.d.iter().enumerate() {
            write!(f, " + {}\u{2202}{}", g, i)?;
        }
        Ok(())
    }
}

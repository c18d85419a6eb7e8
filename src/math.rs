//! Aggregate math generic over plain and dual element types.
//!
//! The reductions here accept any mix of [`Var`](crate::Var) and primitive
//! floats that the operator overloads allow, so the same call site serves
//! the AD path and the plain-scalar path.

use std::ops::{Add, Mul};

use num_traits::Zero;

/// `x²` for anything multipliable.
#[inline]
pub fn square<T>(x: T) -> T
where
    T: Mul<Output = T> + Copy,
{
    x * x
}

/// Left-to-right sum of a non-empty slice.
///
/// # Panics
///
/// Panics when `xs` is empty.
#[inline]
pub fn sum<T>(xs: &[T]) -> T
where
    T: Add<Output = T> + Copy,
{
    assert!(!xs.is_empty(), "sum requires a non-empty slice");
    xs[1..].iter().fold(xs[0], |acc, &x| acc + x)
}

/// Sum of squares of a non-empty slice.
///
/// # Panics
///
/// Panics when `xs` is empty.
#[inline]
pub fn sumsq<T>(xs: &[T]) -> T
where
    T: Add<Output = T> + Mul<Output = T> + Copy,
{
    assert!(!xs.is_empty(), "sumsq requires a non-empty slice");
    xs[1..].iter().fold(square(xs[0]), |acc, &x| acc + square(x))
}

/// Inner product `Σ xs[i]·ys[i]`.
///
/// The element types may differ, so duals pair with plain scalars on either
/// side. Accumulation runs over blocks of 16, then 4, then a scalar tail,
/// split across two independent partial sums; the dual path has enough work
/// per element that the split is what keeps its dependency chain short.
///
/// # Panics
///
/// Panics when the slices differ in length.
pub fn dot<L, R, O>(xs: &[L], ys: &[R]) -> O
where
    L: Mul<R, Output = O> + Copy,
    R: Copy,
    O: Zero + Copy,
{
    assert_eq!(
        xs.len(),
        ys.len(),
        "dot requires equally long slices ({} vs {})",
        xs.len(),
        ys.len()
    );
    let n = xs.len();
    let mut s0 = O::zero();
    let mut s1 = O::zero();
    let mut i = 0;

    while n - i >= 16 {
        let mut j = 0;
        while j < 16 {
            s0 = s0 + xs[i + j] * ys[i + j];
            s1 = s1 + xs[i + j + 1] * ys[i + j + 1];
            j += 2;
        }
        i += 16;
    }

    while n - i >= 4 {
        s0 = s0 + xs[i] * ys[i] + xs[i + 2] * ys[i + 2];
        s1 = s1 + xs[i + 1] * ys[i + 1] + xs[i + 3] * ys[i + 3];
        i += 4;
    }

    while i < n {
        s0 = s0 + xs[i] * ys[i];
        i += 1;
    }

    s0 + s1
}

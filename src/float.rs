use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for the primitive floats (`f32`, `f64`) that can carry a
/// gradient.
///
/// Bundles every numeric and utility bound the crate needs so generic code
/// states a single constraint. AD wrapper types never implement this; they
/// sit on top of it.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
}

impl Float for f32 {}
impl Float for f64 {}

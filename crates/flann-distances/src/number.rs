//! Numeric trait bounds shared by the distance functions in this crate.

/// A trait for the element type of a point (a coordinate, a histogram bin, a packed bit-vector word).
///
/// Blanket-implemented for the numeric primitives. Unlike a floating-point bound, this trait does
/// not require the type to support square roots or other transcendental functions, so it is also
/// satisfied by the integer and unsigned types used for Hamming distance over packed bit vectors.
pub trait Number:
    num_traits::NumAssign + num_traits::Bounded + num_traits::ToPrimitive + num_traits::FromPrimitive + PartialOrd + Copy + Send + Sync + 'static
{
    /// Returns `self - other` if `self >= other`, else `other - self`.
    fn abs_diff(self, other: Self) -> Self {
        if self >= other {
            self - other
        } else {
            other - self
        }
    }

    /// Converts this value to an `f64`, saturating to `0.0` if the conversion fails.
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

impl<T> Number for T where
    T: num_traits::NumAssign + num_traits::Bounded + num_traits::ToPrimitive + num_traits::FromPrimitive + PartialOrd + Copy + Send + Sync + 'static
{
}

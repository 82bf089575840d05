use num::{Float, NumCast};
use rand::distributions::uniform::SampleUniform;
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{AddAssign, SubAssign},
};

/// Floating point type a clustering can be calculated with.
pub trait Primitive: Float + NumCast + AddAssign + SubAssign + Sum + SampleUniform
                + Copy + Default + Display + Debug + LowerExp + Send + Sync + 'static
                + for<'a> AddAssign<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}


/// A sample in the plane.
///
/// Two points are equal if both of their coordinates are exactly equal. The clustering itself
/// never relies on this, it only compares distances.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point<T: Primitive> {
    pub x: T,
    pub y: T,
}
impl<T: Primitive> Point<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between `self` and `other`, without squaring overflow for large coordinates.
    #[inline(always)]
    pub fn distance(&self, other: &Self) -> T {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Arithmetic mean of `points`, or [`None`] if there are none.
    pub(crate) fn mean<'a>(points: impl ExactSizeIterator<Item = &'a Self>) -> Option<Self> {
        let cnt = T::from(points.len())?;
        if cnt.is_zero() {
            return None;
        }
        // Terms are scaled before summing, so the sum stays within the range of the coordinates
        let (x, y) = points.fold((T::zero(), T::zero()), |(xs, ys), p| (xs + p.x / cnt, ys + p.y / cnt));
        Some(Self::new(x, y))
    }
}
impl<T: Primitive> From<(T, T)> for Point<T> {
    fn from((x, y): (T, T)) -> Self {
        Self::new(x, y)
    }
}

use crate::{DistanceFunction, Point, Primitive};

/// Straight-line distance in the plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct EuclideanDistance;

impl<T: Primitive> DistanceFunction<T> for EuclideanDistance {
    #[inline(always)]
    fn distance(&self, a: &Point<T>, b: &Point<T>) -> T {
        a.distance(b)
    }
}

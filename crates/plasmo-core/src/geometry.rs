//! Geometry utilities — points, distances and interpolation.

use serde::{Deserialize, Serialize};

/// A position in the network's 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Point3) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Point3) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)
    }

    /// Linear interpolation toward `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Point3, t: f64) -> Point3 {
        Point3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Point3 {
        Point3::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn scale(&self, factor: f64) -> Point3 {
        Point3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Euclidean distance between two points.
pub fn distance(a: &Point3, b: &Point3) -> f64 {
    a.distance_to(b)
}

/// Interpolate between two points.
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a.lerp(b, t)
}

/// Mean position of a set of points. Returns the origin for an empty set.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Point3 {
    let mut sum = Point3::ORIGIN;
    let mut count = 0usize;
    for p in points {
        sum = sum.offset(p.x, p.y, p.z);
        count += 1;
    }
    if count == 0 {
        return Point3::ORIGIN;
    }
    sum.scale(1.0 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean_and_symmetric() {
        let a = Point3::new(1.0, 2.0, 2.0);
        let b = Point3::ORIGIN;
        assert!((distance(&a, &b) - 3.0).abs() < 1e-12);
        assert_eq!(distance(&a, &b), distance(&b, &a));
        assert_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, -4.0, 6.0);
        assert_eq!(lerp(&a, &b, 0.0), a);
        assert_eq!(lerp(&a, &b, 1.0), b);
        assert_eq!(lerp(&a, &b, 0.5), Point3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn centroid_of_empty_set_is_origin() {
        let none: Vec<Point3> = Vec::new();
        assert_eq!(centroid(&none), Point3::ORIGIN);

        let pts = [Point3::new(1.0, 0.0, 0.0), Point3::new(-1.0, 2.0, 4.0)];
        assert_eq!(centroid(&pts), Point3::new(0.0, 1.0, 2.0));
    }
}

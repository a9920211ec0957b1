// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric tolerance utilities
//!
//! Every geometric comparison in the crate goes through these helpers. Exact
//! floating point equality is never used for coordinates.

use crate::{Point2, Point3, Vector3};

/// Default vertex tolerance in host length units (metres)
pub const DEFAULT_VERTEX_TOLERANCE: f64 = 1e-5;

/// Default angular tolerance in radians
pub const DEFAULT_ANGLE_TOLERANCE: f64 = 1e-6;

#[inline]
pub fn almost_equal(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[inline]
pub fn almost_zero(a: f64, eps: f64) -> bool {
    a.abs() <= eps
}

/// `acos` with the argument clamped to [-1, 1]
#[inline]
pub fn safe_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// `asin` with the argument clamped to [-1, 1]
#[inline]
pub fn safe_asin(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}

/// Map a periodic parameter into `[start, start + period)`
#[inline]
pub fn put_in_range(value: f64, start: f64, period: f64) -> f64 {
    let offset = (value - start).rem_euclid(period);
    // rem_euclid can round up to exactly `period` for tiny negative inputs
    if offset >= period {
        start
    } else {
        start + offset
    }
}

/// Comparison tolerances of one export session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Distance below which two points are the same point
    pub vertex: f64,
    /// Angle (radians) below which two directions are the same direction
    pub angle: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            vertex: DEFAULT_VERTEX_TOLERANCE,
            angle: DEFAULT_ANGLE_TOLERANCE,
        }
    }
}

impl Tolerance {
    pub fn new(vertex: f64, angle: f64) -> Self {
        Self { vertex, angle }
    }

    #[inline]
    pub fn equal(&self, a: f64, b: f64) -> bool {
        almost_equal(a, b, self.vertex)
    }

    #[inline]
    pub fn is_zero(&self, a: f64) -> bool {
        almost_zero(a, self.vertex)
    }

    #[inline]
    pub fn points_equal(&self, a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() <= self.vertex
    }

    #[inline]
    pub fn points2_equal(&self, a: &Point2<f64>, b: &Point2<f64>) -> bool {
        (a - b).norm() <= self.vertex
    }

    #[inline]
    pub fn vectors_equal(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        (a - b).norm() <= self.vertex
    }

    /// Whether two directions are parallel or anti-parallel
    pub fn is_parallel(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        match (a.try_normalize(f64::EPSILON), b.try_normalize(f64::EPSILON)) {
            (Some(a), Some(b)) => a.cross(&b).norm() <= self.angle.sin().max(self.angle),
            _ => false,
        }
    }

    /// Whether two directions point the same way
    pub fn is_same_direction(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        self.is_parallel(a, b) && a.dot(b) > 0.0
    }

    /// Whether two directions are perpendicular
    pub fn is_perpendicular(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        match (a.try_normalize(f64::EPSILON), b.try_normalize(f64::EPSILON)) {
            (Some(a), Some(b)) => a.dot(&b).abs() <= self.angle.sin().max(self.angle),
            _ => false,
        }
    }
}

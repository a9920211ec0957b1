// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planes and local coordinate systems

use crate::tolerance::Tolerance;
use crate::{Point2, Point3, Vector2, Vector3};
use nalgebra::Matrix4;

/// An oriented plane with an orthonormal in-plane frame.
///
/// Also used as the local coordinate system for 2D output: `to_local` maps
/// world points into the (x_axis, y_axis) frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Plane through `origin` with an automatically chosen in-plane frame
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        let normal = normal.normalize();
        // Least parallel world axis gives a stable reference direction
        let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
        let reference = if ax <= ay && ax <= az {
            Vector3::x()
        } else if ay <= az {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let x_axis = (reference - normal * reference.dot(&normal)).normalize();
        Self::from_axes(origin, x_axis, normal)
    }

    /// Plane with an explicit x direction; `x_axis` is orthogonalized
    /// against `normal`
    pub fn from_axes(origin: Point3<f64>, x_axis: Vector3<f64>, normal: Vector3<f64>) -> Self {
        let normal = normal.normalize();
        let x_axis = (x_axis - normal * x_axis.dot(&normal)).normalize();
        let y_axis = normal.cross(&x_axis);
        Self {
            origin,
            x_axis,
            y_axis,
            normal,
        }
    }

    /// The world XY plane
    pub fn xy() -> Self {
        Self {
            origin: Point3::origin(),
            x_axis: Vector3::x(),
            y_axis: Vector3::y(),
            normal: Vector3::z(),
        }
    }

    #[inline]
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        (p - self.origin).dot(&self.normal)
    }

    #[inline]
    pub fn project_point(&self, p: &Point3<f64>) -> Point3<f64> {
        p - self.normal * self.signed_distance(p)
    }

    #[inline]
    pub fn to_local(&self, p: &Point3<f64>) -> Point2<f64> {
        let v = p - self.origin;
        Point2::new(v.dot(&self.x_axis), v.dot(&self.y_axis))
    }

    /// Local coordinates including the height above the plane
    #[inline]
    pub fn to_local3(&self, p: &Point3<f64>) -> Point3<f64> {
        let v = p - self.origin;
        Point3::new(v.dot(&self.x_axis), v.dot(&self.y_axis), v.dot(&self.normal))
    }

    #[inline]
    pub fn vector_to_local(&self, v: &Vector3<f64>) -> Vector2<f64> {
        Vector2::new(v.dot(&self.x_axis), v.dot(&self.y_axis))
    }

    #[inline]
    pub fn to_world(&self, p: &Point2<f64>) -> Point3<f64> {
        self.origin + self.x_axis * p.x + self.y_axis * p.y
    }

    pub fn contains(&self, p: &Point3<f64>, tol: &Tolerance) -> bool {
        tol.is_zero(self.signed_distance(p))
    }

    /// Same plane regardless of orientation
    pub fn is_coplanar(&self, other: &Plane, tol: &Tolerance) -> bool {
        tol.is_parallel(&self.normal, &other.normal) && self.contains(&other.origin, tol)
    }

    /// Plane moved along its normal
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.normal * distance,
            ..*self
        }
    }

    /// Same plane with the opposite normal (frame stays right-handed)
    pub fn flipped(&self) -> Self {
        Self {
            origin: self.origin,
            x_axis: self.x_axis,
            y_axis: -self.y_axis,
            normal: -self.normal,
        }
    }

    /// Local-to-world transform
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        for r in 0..3 {
            m[(r, 0)] = self.x_axis[r];
            m[(r, 1)] = self.y_axis[r];
            m[(r, 2)] = self.normal[r];
            m[(r, 3)] = self.origin[r];
        }
        m
    }
}

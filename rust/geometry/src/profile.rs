// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Profile definitions

use crate::curve::CurveLoop;
use crate::plane::Plane;
use crate::tolerance::Tolerance;
use crate::triangulation::{signed_area_2d, triangulate_polygon_with_holes};
use crate::{Point2, Result};

/// 2D Profile with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Sample curve loops into `plane` coordinates, normalizing the winding
    pub fn from_loops(outer: &CurveLoop, inner: &[CurveLoop], plane: &Plane, tol: &Tolerance) -> Self {
        let sample = |lp: &CurveLoop| -> Vec<Point2<f64>> {
            lp.tessellate(tol).iter().map(|p| plane.to_local(p)).collect()
        };
        let mut profile = Self::new(sample(outer));
        if signed_area_2d(&profile.outer) < 0.0 {
            profile.outer.reverse();
        }
        for lp in inner {
            let mut hole = sample(lp);
            if signed_area_2d(&hole) > 0.0 {
                hole.reverse();
            }
            profile.add_hole(hole);
        }
        profile
    }

    /// Add a hole to the profile
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Enclosed area (outer minus holes)
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.outer).abs()
            - self
                .holes
                .iter()
                .map(|h| signed_area_2d(h).abs())
                .sum::<f64>()
    }

    /// Number of vertices on the outer boundary
    pub fn vertex_count(&self) -> usize {
        self.outer.len()
    }

    /// Triangle indices into the outer-then-holes vertex sequence
    pub fn triangulate(&self) -> Result<Vec<usize>> {
        triangulate_polygon_with_holes(&self.outer, &self.holes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn winding_is_normalized() {
        let tol = Tolerance::default();
        let clockwise = CurveLoop::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        let hole = CurveLoop::from_points(&[
            Point3::new(0.5, 0.25, 0.0),
            Point3::new(1.0, 0.25, 0.0),
            Point3::new(1.0, 0.75, 0.0),
            Point3::new(0.5, 0.75, 0.0),
        ]);
        let profile = Profile2D::from_loops(&clockwise, &[hole], &Plane::xy(), &tol);
        assert!(signed_area_2d(&profile.outer) > 0.0);
        assert!(signed_area_2d(&profile.holes[0]) < 0.0);
        assert_relative_eq!(profile.area(), 1.75);
        assert_eq!(profile.vertex_count(), 4);
        assert_eq!(profile.triangulate().unwrap().len() % 3, 0);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction of common solids.

use super::{BrepSolid, EdgeKey};
use crate::curve::{Curve, CurveLoop};
use crate::plane::Plane;
use crate::source::{FaceSurface, OrientedEdge};
use crate::tolerance::Tolerance;
use crate::triangulation::polygon_normal;
use crate::{Error, Point3, Result, Vector3};
use rustc_hash::FxHashMap;

impl BrepSolid {
    /// Sweep planar profile loops along `direction` by `depth`.
    ///
    /// Loops are re-oriented as needed: the outer loop runs counter-clockwise
    /// and holes clockwise when viewed against the sweep direction.
    pub fn extrude(
        outer: &CurveLoop,
        inner: &[CurveLoop],
        direction: &Vector3<f64>,
        depth: f64,
        tolerance: Tolerance,
    ) -> Result<Self> {
        let plane = outer
            .plane(&tolerance)
            .ok_or_else(|| Error::unsupported("extrusion profile is not planar"))?;
        let dir = direction
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| Error::InvariantViolation("zero extrusion direction".into()))?;
        if tolerance.is_perpendicular(&dir, &plane.normal) || depth <= tolerance.vertex {
            return Err(Error::InvariantViolation(
                "extrusion does not leave the profile plane".into(),
            ));
        }

        let mut loops: Vec<CurveLoop> = Vec::with_capacity(inner.len() + 1);
        loops.push(if outer.signed_area(&dir, &tolerance) < 0.0 {
            outer.reversed()
        } else {
            outer.clone()
        });
        for hole in inner {
            loops.push(if hole.signed_area(&dir, &tolerance) > 0.0 {
                hole.reversed()
            } else {
                hole.clone()
            });
        }

        let offset = dir * depth;
        let mut solid = BrepSolid::new(tolerance);
        let mut bottom_loops = Vec::with_capacity(loops.len());
        let mut top_loops = Vec::with_capacity(loops.len());

        for lp in &loops {
            let curves = lp.curves();
            let n = curves.len();
            let bottom: Vec<EdgeKey> = curves.iter().map(|c| solid.add_edge(c.clone())).collect();
            let top: Vec<EdgeKey> = curves
                .iter()
                .map(|c| solid.add_edge(c.translated(&offset)))
                .collect();
            let vertical: Vec<EdgeKey> = curves
                .iter()
                .map(|c| {
                    let p = c.start_point();
                    solid.add_edge(Curve::line(p, p + offset))
                })
                .collect();

            for (i, curve) in curves.iter().enumerate() {
                let side = vec![
                    OrientedEdge::forward(bottom[i]),
                    OrientedEdge::forward(vertical[(i + 1) % n]),
                    OrientedEdge::backward(top[i]),
                    OrientedEdge::backward(vertical[i]),
                ];
                solid.add_face(side_surface(curve, &dir), vec![side])?;
            }

            bottom_loops.push(bottom.iter().rev().map(|e| OrientedEdge::backward(*e)).collect());
            top_loops.push(top.iter().map(|e| OrientedEdge::forward(*e)).collect());
        }

        let normal = if plane.normal.dot(&dir) > 0.0 {
            plane.normal
        } else {
            -plane.normal
        };
        let base = Plane::from_axes(plane.origin, plane.x_axis, normal);
        let top = Plane {
            origin: base.origin + offset,
            ..base
        };
        solid.add_face(FaceSurface::Plane(base.flipped()), bottom_loops)?;
        solid.add_face(FaceSurface::Plane(top), top_loops)?;
        Ok(solid)
    }

    /// Axis-aligned box
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>, tolerance: Tolerance) -> Result<Self> {
        let profile = CurveLoop::from_points(&[
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
        ]);
        Self::extrude(&profile, &[], &Vector3::z(), max.z - min.z, tolerance)
    }

    /// Polyhedron from indexed polygon faces. Each face is a list of vertex
    /// loops (outer first) wound counter-clockwise about the outward normal.
    pub fn from_polyhedron(
        vertices: &[Point3<f64>],
        faces: &[Vec<Vec<usize>>],
        tolerance: Tolerance,
    ) -> Result<Self> {
        let mut solid = BrepSolid::new(tolerance);
        let mut edge_map: FxHashMap<(usize, usize), EdgeKey> = FxHashMap::default();

        for face in faces {
            let Some(outer) = face.first() else {
                return Err(Error::InvariantViolation("face without loops".into()));
            };
            let vertex = |i: usize| {
                vertices
                    .get(i)
                    .copied()
                    .ok_or_else(|| Error::InvariantViolation(format!("vertex index {} out of range", i)))
            };
            let outer_points = outer.iter().map(|i| vertex(*i)).collect::<Result<Vec<_>>>()?;
            let normal = polygon_normal(&outer_points)
                .ok_or_else(|| Error::InvariantViolation("degenerate polyhedron face".into()))?;
            let x_dir = outer_points[1] - outer_points[0];
            let surface = FaceSurface::Plane(Plane::from_axes(outer_points[0], x_dir, normal));

            let mut loops = Vec::with_capacity(face.len());
            for indices in face {
                let n = indices.len();
                let mut edges = Vec::with_capacity(n);
                for k in 0..n {
                    let (a, b) = (indices[k], indices[(k + 1) % n]);
                    let key = (a.min(b), a.max(b));
                    let edge = match edge_map.get(&key) {
                        Some(e) => *e,
                        None => {
                            let e = solid.add_edge(Curve::line(vertex(key.0)?, vertex(key.1)?));
                            edge_map.insert(key, e);
                            e
                        }
                    };
                    edges.push(OrientedEdge {
                        edge,
                        reversed: a > b,
                    });
                }
                loops.push(edges);
            }
            solid.add_face(surface, loops)?;
        }
        Ok(solid)
    }
}

/// Surface swept by one profile curve
fn side_surface(curve: &Curve, dir: &Vector3<f64>) -> FaceSurface {
    match curve {
        Curve::Line(line) => {
            let tangent = line.direction();
            match tangent.cross(dir).try_normalize(f64::EPSILON) {
                Some(normal) => FaceSurface::Plane(Plane::from_axes(line.start, tangent, normal)),
                None => FaceSurface::Extruded { direction: *dir },
            }
        }
        Curve::Arc(arc) if arc.normal.cross(dir).norm() < 1e-9 => {
            let mid = 0.5 * (arc.start_param + arc.end_param);
            let tangent = -arc.x_axis * mid.sin() + arc.y_axis() * mid.cos();
            let radial = arc.point_at(mid) - arc.center;
            FaceSurface::Cylinder {
                origin: arc.center,
                axis: *dir,
                radius: arc.radius,
                outward: radial.dot(&tangent.cross(dir)) > 0.0,
            }
        }
        _ => FaceSurface::Extruded { direction: *dir },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GeometrySource;
    use approx::assert_relative_eq;

    #[test]
    fn extrusion_orients_loops() {
        let tol = Tolerance::default();
        // Clockwise outer loop gets reversed
        let outer = CurveLoop::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        let solid = BrepSolid::extrude(&outer, &[], &Vector3::z(), 3.0, tol).unwrap();
        assert_eq!(solid.face_count(), 6);
        assert!(solid.is_closed());
        let normals: Vec<Vector3<f64>> = solid
            .faces()
            .into_iter()
            .map(|f| solid.face_plane(f).unwrap().unwrap().normal)
            .collect();
        assert_eq!(normals.iter().filter(|n| n.z > 0.9).count(), 1);
        assert_eq!(normals.iter().filter(|n| n.z < -0.9).count(), 1);
        let center = Point3::new(1.0, 0.5, 1.5);
        for face in solid.faces() {
            let plane = solid.face_plane(face).unwrap().unwrap();
            assert!(plane.signed_distance(&center) < 0.0);
        }
    }

    #[test]
    fn extrusion_with_hole() {
        let tol = Tolerance::default();
        let outer = CurveLoop::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 4.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ]);
        let hole = CurveLoop::from_points(&[
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(3.0, 1.0, 0.0),
            Point3::new(3.0, 3.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
        ]);
        let solid = BrepSolid::extrude(&outer, &[hole], &Vector3::z(), 1.0, tol).unwrap();
        assert_eq!(solid.face_count(), 10);
        assert!(solid.is_closed());
        let top = solid
            .faces()
            .into_iter()
            .find(|f| solid.face_plane(*f).unwrap().unwrap().normal.z > 0.9)
            .unwrap();
        assert_relative_eq!(solid.face_area(top).unwrap(), 12.0, epsilon = 1e-9);
        assert!(!solid.face_contains(top, &Point3::new(2.0, 2.0, 1.0)).unwrap());
        assert!(solid.face_contains(top, &Point3::new(0.5, 2.0, 1.0)).unwrap());
    }

    #[test]
    fn polyhedron_shares_edges() {
        let v = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![
            vec![vec![0, 2, 1]],
            vec![vec![0, 1, 3]],
            vec![vec![1, 2, 3]],
            vec![vec![0, 3, 2]],
        ];
        let solid = BrepSolid::from_polyhedron(&v, &faces, Tolerance::default()).unwrap();
        assert_eq!(solid.edge_count(), 6);
        assert!(solid.is_closed());
    }

    #[test]
    fn degenerate_inputs_fail() {
        let tol = Tolerance::default();
        let outer = CurveLoop::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ]);
        assert!(BrepSolid::extrude(&outer, &[], &Vector3::x(), 1.0, tol).is_err());
        assert!(BrepSolid::extrude(&outer, &[], &Vector3::z(), 0.0, tol).is_err());
        assert!(BrepSolid::from_polyhedron(&[], &[vec![vec![0, 1, 2]]], tol).is_err());
    }
}

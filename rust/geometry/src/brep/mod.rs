// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory reference B-rep kernel
//!
//! [`BrepSolid`] implements [`GeometrySource`] over slot-map arenas of edges
//! and faces. It backs headless exports and the test-suite; a real host
//! plugs its own kernel in through the same trait.

mod builders;
mod keys;

pub use keys::{EdgeKey, FaceKey};

use crate::curve::{Curve, CurveLoop};
use crate::source::{FaceMesh, FaceSurface, GeometrySource, OrientedEdge};
use crate::tolerance::Tolerance;
use crate::triangulation::{newell_vector, triangulate_planar_loops, triangulate_polygon_with_holes};
use crate::boundary::point_in_polygon;
use crate::plane::Plane;
use crate::{Error, Point2, Point3, Result, Vector3};
use nalgebra::Matrix4;
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::f64::consts::{PI, TAU};

/// Data stored for an edge
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub curve: Curve,
    /// Faces using the edge, in insertion order
    pub faces: SmallVec<[FaceKey; 2]>,
}

/// Data stored for a face
#[derive(Debug, Clone)]
pub struct FaceData {
    pub surface: FaceSurface,
    pub loops: Vec<Vec<OrientedEdge<EdgeKey>>>,
}

/// A solid stored as edge and face arenas
#[derive(Debug, Clone, Default)]
pub struct BrepSolid {
    edges: SlotMap<EdgeKey, EdgeData>,
    faces: SlotMap<FaceKey, FaceData>,
    tolerance: Tolerance,
}

impl BrepSolid {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            edges: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    pub fn add_edge(&mut self, curve: Curve) -> EdgeKey {
        self.edges.insert(EdgeData {
            curve,
            faces: SmallVec::new(),
        })
    }

    /// Add a face. Every loop must be continuous and closed.
    pub fn add_face(
        &mut self,
        surface: FaceSurface,
        loops: Vec<Vec<OrientedEdge<EdgeKey>>>,
    ) -> Result<FaceKey> {
        for edges in &loops {
            let curves = edges
                .iter()
                .map(|e| self.oriented_curve(*e))
                .collect::<Result<Vec<_>>>()?;
            let lp = CurveLoop::new(curves);
            if let Some(gap) = lp.first_gap(&self.tolerance) {
                return Err(Error::DisconnectedLoop(gap));
            }
            if !lp.is_closed(&self.tolerance) {
                return Err(Error::DisconnectedLoop(lp.len().saturating_sub(1)));
            }
        }

        let face = self.faces.insert(FaceData {
            surface,
            loops: loops.clone(),
        });
        for e in loops.iter().flatten() {
            if let Some(edge) = self.edges.get_mut(e.edge) {
                edge.faces.push(face);
            }
        }
        Ok(face)
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&EdgeData> {
        self.edges.get(key)
    }

    pub fn face(&self, key: FaceKey) -> Option<&FaceData> {
        self.faces.get(key)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether every edge is shared by exactly two face uses
    pub fn is_closed(&self) -> bool {
        self.edges.values().all(|e| e.faces.len() == 2)
    }

    /// Copy of the solid under a rigid or uniformly scaling transform.
    /// Keys stay valid for the copy.
    pub fn transformed(&self, m: &Matrix4<f64>) -> Self {
        let mut copy = self.clone();
        for edge in copy.edges.values_mut() {
            edge.curve = edge.curve.transformed(m);
        }
        for face in copy.faces.values_mut() {
            face.surface = match &face.surface {
                FaceSurface::Plane(p) => FaceSurface::Plane(Plane::from_axes(
                    m.transform_point(&p.origin),
                    m.transform_vector(&p.x_axis),
                    m.transform_vector(&p.x_axis).cross(&m.transform_vector(&p.y_axis)),
                )),
                FaceSurface::Cylinder {
                    origin,
                    axis,
                    radius,
                    outward,
                } => FaceSurface::Cylinder {
                    origin: m.transform_point(origin),
                    axis: m.transform_vector(axis).normalize(),
                    radius: radius * m.transform_vector(axis).norm(),
                    outward: *outward,
                },
                FaceSurface::Extruded { direction } => FaceSurface::Extruded {
                    direction: m.transform_vector(direction).normalize(),
                },
                FaceSurface::Other => FaceSurface::Other,
            };
        }
        copy
    }

    fn face_data(&self, face: FaceKey) -> Result<&FaceData> {
        self.faces
            .get(face)
            .ok_or_else(|| Error::kernel(format!("face {:?} not found", face)))
    }

    fn loop_points(&self, face: FaceKey) -> Result<Vec<Vec<Point3<f64>>>> {
        Ok(self
            .face_curve_loops(face)?
            .iter()
            .map(|lp| lp.tessellate(&self.tolerance))
            .collect())
    }

    /// Outer loop index of a planar face: the loop with the largest area
    fn split_outer(plane: &Plane, loops: Vec<Vec<Point3<f64>>>) -> (Vec<Point3<f64>>, Vec<Vec<Point3<f64>>>) {
        let mut loops = loops;
        let outer_idx = loops
            .iter()
            .enumerate()
            .map(|(i, l)| (i, newell_vector(l).dot(&plane.normal).abs()))
            .fold((0, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
            .0;
        let outer = loops.swap_remove(outer_idx);
        (outer, loops)
    }

    fn tessellate_cylinder(
        &self,
        origin: &Point3<f64>,
        axis: &Vector3<f64>,
        radius: f64,
        outward: bool,
        loops: &[Vec<Point3<f64>>],
    ) -> Result<FaceMesh> {
        let frame = Plane::new(*origin, *axis);
        let Some(outer) = loops.first() else {
            return Ok(FaceMesh::default());
        };

        // Unwrap angles along the loop so seams map to both ends of the strip
        let mut uv: Vec<Point2<f64>> = Vec::with_capacity(outer.len());
        let mut previous: Option<f64> = None;
        for p in outer {
            let local = frame.to_local3(p);
            let mut angle = local.y.atan2(local.x);
            if let Some(prev) = previous {
                while angle - prev > PI {
                    angle -= TAU;
                }
                while angle - prev < -PI {
                    angle += TAU;
                }
            }
            previous = Some(angle);
            uv.push(Point2::new(angle * radius, local.z));
        }

        let indices = triangulate_polygon_with_holes(&uv, &[])?;
        let mut mesh = FaceMesh {
            positions: outer.clone(),
            indices: indices.iter().map(|i| *i as u32).collect(),
        };
        let sense = if outward { 1.0 } else { -1.0 };
        for tri in mesh.indices.chunks_exact_mut(3) {
            let a = mesh.positions[tri[0] as usize];
            let b = mesh.positions[tri[1] as usize];
            let c = mesh.positions[tri[2] as usize];
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            let radial = frame.project_point(&centroid) - origin;
            if (b - a).cross(&(c - a)).dot(&radial) * sense < 0.0 {
                tri.swap(1, 2);
            }
        }
        Ok(mesh)
    }
}

impl GeometrySource for BrepSolid {
    type Face = FaceKey;
    type Edge = EdgeKey;

    fn faces(&self) -> Vec<FaceKey> {
        self.faces.keys().collect()
    }

    fn face_surface(&self, face: FaceKey) -> Result<FaceSurface> {
        Ok(self.face_data(face)?.surface.clone())
    }

    fn face_loops(&self, face: FaceKey) -> Result<Vec<Vec<OrientedEdge<EdgeKey>>>> {
        Ok(self.face_data(face)?.loops.clone())
    }

    fn edge_curve(&self, edge: EdgeKey) -> Result<Curve> {
        self.edges
            .get(edge)
            .map(|e| e.curve.clone())
            .ok_or_else(|| Error::kernel(format!("edge {:?} not found", edge)))
    }

    fn edge_faces(&self, edge: EdgeKey) -> Result<SmallVec<[FaceKey; 2]>> {
        self.edges
            .get(edge)
            .map(|e| e.faces.clone())
            .ok_or_else(|| Error::kernel(format!("edge {:?} not found", edge)))
    }

    fn face_normal(&self, face: FaceKey, uv: &Point2<f64>) -> Result<Vector3<f64>> {
        match &self.face_data(face)?.surface {
            FaceSurface::Plane(p) => Ok(p.normal),
            FaceSurface::Cylinder {
                origin,
                axis,
                outward,
                ..
            } => {
                let frame = Plane::new(*origin, *axis);
                let radial = frame.x_axis * uv.x.cos() + frame.y_axis * uv.x.sin();
                Ok(if *outward { radial } else { -radial })
            }
            FaceSurface::Extruded { .. } | FaceSurface::Other => {
                Err(Error::unsupported("normal of free-form face"))
            }
        }
    }

    fn face_area(&self, face: FaceKey) -> Result<f64> {
        Ok(self.tessellate_face(face)?.area())
    }

    fn face_contains(&self, face: FaceKey, point: &Point3<f64>) -> Result<bool> {
        let plane = match &self.face_data(face)?.surface {
            FaceSurface::Plane(p) => *p,
            _ => return Err(Error::unsupported("containment test on non-planar face")),
        };
        if !plane.contains(point, &self.tolerance) {
            return Ok(false);
        }
        let (outer, holes) = Self::split_outer(&plane, self.loop_points(face)?);
        let to_2d = |pts: &[Point3<f64>]| pts.iter().map(|p| plane.to_local(p)).collect::<Vec<_>>();
        let p = plane.to_local(point);
        Ok(point_in_polygon(&p, &to_2d(&outer)) && !holes.iter().any(|h| point_in_polygon(&p, &to_2d(h))))
    }

    fn tessellate_face(&self, face: FaceKey) -> Result<FaceMesh> {
        let loops = self.loop_points(face)?;
        match &self.face_data(face)?.surface {
            FaceSurface::Plane(plane) => {
                let (outer, holes) = Self::split_outer(plane, loops);
                let (positions, indices) = triangulate_planar_loops(plane, &outer, &holes)?;
                Ok(FaceMesh {
                    positions,
                    indices: indices.into_iter().map(|i| i as u32).collect(),
                })
            }
            FaceSurface::Cylinder {
                origin,
                axis,
                radius,
                outward,
            } => self.tessellate_cylinder(origin, axis, *radius, *outward, &loops),
            FaceSurface::Extruded { .. } | FaceSurface::Other => {
                let Some(outer) = loops.into_iter().next() else {
                    return Ok(FaceMesh::default());
                };
                let normal = newell_vector(&outer)
                    .try_normalize(1e-12)
                    .ok_or_else(|| Error::kernel("degenerate face loop"))?;
                let plane = Plane::new(outer[0], normal);
                let (positions, indices) = triangulate_planar_loops(&plane, &outer, &[])?;
                Ok(FaceMesh {
                    positions,
                    indices: indices.into_iter().map(|i| i as u32).collect(),
                })
            }
        }
    }
}

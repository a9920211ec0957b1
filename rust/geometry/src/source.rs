// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host geometry kernel interface
//!
//! The exporter never owns the host's B-rep. It walks one solid at a time
//! through [`GeometrySource`]: faces, their loops of oriented edges, the
//! curve under each edge and the faces meeting at an edge.

use crate::curve::{Curve, CurveLoop};
use crate::plane::Plane;
use crate::{Point2, Point3, Result, Vector3};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt::Debug;
use std::hash::Hash;

/// Use of an edge inside a face loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrientedEdge<E> {
    pub edge: E,
    /// Whether the loop traverses the edge against its curve direction
    pub reversed: bool,
}

impl<E> OrientedEdge<E> {
    pub fn forward(edge: E) -> Self {
        Self { edge, reversed: false }
    }

    pub fn backward(edge: E) -> Self {
        Self { edge, reversed: true }
    }
}

/// Surface underlying a face
#[derive(Debug, Clone, PartialEq)]
pub enum FaceSurface {
    /// Plane whose normal points out of the solid
    Plane(Plane),
    /// Cylinder patch; `outward` is false when the solid lies outside
    /// the cylinder
    Cylinder {
        origin: Point3<f64>,
        axis: Vector3<f64>,
        radius: f64,
        outward: bool,
    },
    /// General curve swept along a fixed direction
    Extruded { direction: Vector3<f64> },
    Other,
}

impl FaceSurface {
    pub fn as_plane(&self) -> Option<&Plane> {
        match self {
            FaceSurface::Plane(p) => Some(p),
            _ => None,
        }
    }
}

/// Triangulated face or solid
#[derive(Debug, Clone, Default)]
pub struct FaceMesh {
    pub positions: Vec<Point3<f64>>,
    /// Triangle indices, counter-clockwise about the outward normal
    pub indices: Vec<u32>,
}

impl FaceMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Sum of triangle areas
    pub fn area(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|t| {
                let a = self.positions[t[0] as usize];
                let b = self.positions[t[1] as usize];
                let c = self.positions[t[2] as usize];
                0.5 * (b - a).cross(&(c - a)).norm()
            })
            .sum()
    }

    /// Append another mesh, offsetting its indices
    pub fn merge(&mut self, other: &FaceMesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

/// One host solid, seen through the kernel
pub trait GeometrySource {
    type Face: Copy + Eq + Hash + Debug;
    type Edge: Copy + Eq + Hash + Debug;

    /// All faces of the solid
    fn faces(&self) -> Vec<Self::Face>;

    fn face_surface(&self, face: Self::Face) -> Result<FaceSurface>;

    /// Edge loops of a face; each runs counter-clockwise about the outward
    /// normal when it is an outer boundary. The order of loops carries no
    /// meaning.
    fn face_loops(&self, face: Self::Face) -> Result<Vec<Vec<OrientedEdge<Self::Edge>>>>;

    /// Curve of an edge in the edge's own direction
    fn edge_curve(&self, edge: Self::Edge) -> Result<Curve>;

    /// Faces using an edge (two for a closed manifold solid)
    fn edge_faces(&self, edge: Self::Edge) -> Result<SmallVec<[Self::Face; 2]>>;

    /// Outward normal at a surface parameter
    fn face_normal(&self, face: Self::Face, uv: &Point2<f64>) -> Result<Vector3<f64>>;

    fn face_area(&self, face: Self::Face) -> Result<f64>;

    /// Whether a point lies on the face (inside its outer loop, outside holes)
    fn face_contains(&self, face: Self::Face, point: &Point3<f64>) -> Result<bool>;

    fn tessellate_face(&self, face: Self::Face) -> Result<FaceMesh>;

    /// The other face across `edge`
    fn adjoining_face(&self, edge: Self::Edge, face: Self::Face) -> Result<Option<Self::Face>> {
        Ok(self.edge_faces(edge)?.into_iter().find(|f| *f != face))
    }

    /// Curve of an edge use, in loop direction
    fn oriented_curve(&self, edge: OrientedEdge<Self::Edge>) -> Result<Curve> {
        let curve = self.edge_curve(edge.edge)?;
        Ok(if edge.reversed { curve.reversed() } else { curve })
    }

    /// Face loops as curve loops
    fn face_curve_loops(&self, face: Self::Face) -> Result<Vec<CurveLoop>> {
        self.face_loops(face)?
            .into_iter()
            .map(|edges| {
                edges
                    .into_iter()
                    .map(|e| self.oriented_curve(e))
                    .collect::<Result<Vec<_>>>()
                    .map(CurveLoop::new)
            })
            .collect()
    }

    fn face_plane(&self, face: Self::Face) -> Result<Option<Plane>> {
        Ok(self.face_surface(face)?.as_plane().copied())
    }

    /// Total length of all loops of a face
    fn face_perimeter(&self, face: Self::Face) -> Result<f64> {
        Ok(self.face_curve_loops(face)?.iter().map(CurveLoop::length).sum())
    }

    /// Faces sharing an edge with `face`
    fn adjoining_faces(&self, face: Self::Face) -> Result<FxHashSet<Self::Face>> {
        let mut result = FxHashSet::default();
        for edges in self.face_loops(face)? {
            for e in edges {
                if let Some(other) = self.adjoining_face(e.edge, face)? {
                    result.insert(other);
                }
            }
        }
        Ok(result)
    }

    /// Triangulation of the whole solid
    fn tessellate(&self) -> Result<FaceMesh> {
        let mut mesh = FaceMesh::default();
        for face in self.faces() {
            mesh.merge(&self.tessellate_face(face)?);
        }
        Ok(mesh)
    }

    /// Axis-aligned bounds of the solid's triangulation
    fn bounds(&self) -> Result<Option<(Point3<f64>, Point3<f64>)>> {
        let mesh = self.tessellate()?;
        let mut iter = mesh.positions.iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        let (min, max) = iter.fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        Ok(Some((min, max)))
    }
}

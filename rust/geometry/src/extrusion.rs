// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion recovery
//!
//! Decides whether an opaque solid is a straight extrusion perpendicular to
//! a base plane and, if so, recovers its profile, depth and end faces.

use crate::boundary::{get_face_boundaries, BoundaryComplexity};
use crate::curve::CurveLoop;
use crate::plane::Plane;
use crate::profile::Profile2D;
use crate::source::{FaceSurface, GeometrySource};
use crate::tolerance::Tolerance;
use crate::{Error, Result, Vector3};
use smallvec::SmallVec;

/// A solid recognized as an extrusion
#[derive(Debug, Clone)]
pub struct ExtrusionAnalysis<F> {
    /// End face closest to the base plane
    pub start_face: F,
    pub end_face: F,
    /// Profile loops moved onto the base plane
    pub outer: CurveLoop,
    pub inner: Vec<CurveLoop>,
    pub complexity: BoundaryComplexity,
    /// Profile in base plane coordinates
    pub profile: Profile2D,
    pub base_plane: Plane,
    /// Signed distance from the base plane to the start face
    pub start_offset: f64,
    /// Unit extrusion direction (the base plane normal)
    pub direction: Vector3<f64>,
    pub depth: f64,
}

impl<F> ExtrusionAnalysis<F> {
    /// Placement of the profile: the base plane moved onto the start face
    pub fn position(&self) -> Plane {
        self.base_plane.offset(self.start_offset)
    }
}

/// Recover an extrusion along the normal of `base_plane`.
///
/// Every face must be either an end face parallel to the base plane or a
/// side face running along the axis; there must be exactly two end faces
/// with equal area and perimeter bounded by the same side faces. Profiles
/// needing complex boundary curves fail when `allow_complex` is false.
pub fn analyze_extrusion<S: GeometrySource>(
    source: &S,
    base_plane: &Plane,
    allow_complex: bool,
    tol: &Tolerance,
) -> Result<ExtrusionAnalysis<S::Face>> {
    let axis = base_plane.normal;

    let mut end_faces: SmallVec<[(S::Face, Plane); 2]> = SmallVec::new();
    for face in source.faces() {
        match source.face_surface(face)? {
            FaceSurface::Plane(plane) => {
                if tol.is_parallel(&plane.normal, &axis) {
                    end_faces.push((face, plane));
                } else if !tol.is_perpendicular(&plane.normal, &axis) {
                    return Err(Error::unsupported(format!(
                        "face {:?} is not aligned with the extrusion axis",
                        face
                    )));
                }
            }
            FaceSurface::Cylinder { axis: c_axis, .. } => {
                if !tol.is_parallel(&c_axis, &axis) {
                    return Err(Error::unsupported("cylindrical face not along the axis"));
                }
            }
            FaceSurface::Extruded { direction } => {
                if !tol.is_parallel(&direction, &axis) {
                    return Err(Error::unsupported("swept face not along the axis"));
                }
            }
            FaceSurface::Other => {
                return Err(Error::unsupported("free-form face"));
            }
        }
    }

    let [(face_a, plane_a), (face_b, plane_b)] = match end_faces.as_slice() {
        [a, b] => [*a, *b],
        _ => {
            return Err(Error::unsupported(format!(
                "expected two end faces, found {}",
                end_faces.len()
            )))
        }
    };

    let perimeter_a = source.face_perimeter(face_a)?;
    let perimeter_b = source.face_perimeter(face_b)?;
    if (perimeter_a - perimeter_b).abs() > tol.vertex + 1e-9 * perimeter_a.max(perimeter_b) {
        return Err(Error::unsupported("end face perimeters differ"));
    }

    let area_a = source.face_area(face_a)?;
    let area_b = source.face_area(face_b)?;
    if (area_a - area_b).abs() > tol.vertex * perimeter_a.max(perimeter_b) {
        return Err(Error::unsupported("end face areas differ"));
    }

    let adjoining_a = source.adjoining_faces(face_a)?;
    let adjoining_b = source.adjoining_faces(face_b)?;
    if adjoining_a.symmetric_difference(&adjoining_b).next().is_some() {
        return Err(Error::unsupported("end faces are bounded by different side faces"));
    }

    let dist_a = base_plane.signed_distance(&plane_a.origin);
    let dist_b = base_plane.signed_distance(&plane_b.origin);
    let (start_face, end_face, start_offset, end_offset) = if dist_a <= dist_b {
        (face_a, face_b, dist_a, dist_b)
    } else {
        (face_b, face_a, dist_b, dist_a)
    };
    let depth = end_offset - start_offset;
    if depth <= tol.vertex {
        return Err(Error::unsupported("end faces coincide"));
    }

    let boundaries = get_face_boundaries(source, start_face, tol)?;
    let complexity = boundaries.max_complexity();
    if complexity == BoundaryComplexity::Complex && !allow_complex {
        return Err(Error::unsupported(
            "profile needs complex boundary curves the model view does not allow",
        ));
    }

    let shift = -axis * start_offset;
    let outer = boundaries.outer.translated(&shift);
    let inner: Vec<CurveLoop> = boundaries.inner.iter().map(|lp| lp.translated(&shift)).collect();
    let profile = Profile2D::from_loops(&outer, &inner, base_plane, tol);

    Ok(ExtrusionAnalysis {
        start_face,
        end_face,
        outer,
        inner,
        complexity,
        profile,
        base_plane: *base_plane,
        start_offset,
        direction: axis,
        depth,
    })
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Half-space clipping of extrusions
//!
//! Plans how a set of planar cut faces trims a straight extrusion. Each
//! accepted face becomes one half-space (bounded by the face outline when
//! the face does not span the whole cross-section) subtracted in order.

use crate::boundary::{get_face_boundaries, point_in_polygon};
use crate::extrusion::ExtrusionAnalysis;
use crate::plane::Plane;
use crate::profile::Profile2D;
use crate::range::IfcRange;
use crate::source::GeometrySource;
use crate::tolerance::Tolerance;
use crate::triangulation::newell_vector;
use crate::{Error, Point2, Point3, Result};
use tracing::debug;

/// Which ends of an extrusion a set of cut faces removes material from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipEnd {
    Start,
    End,
    Both,
    Neither,
}

impl ClipEnd {
    fn combine(self, other: ClipEnd) -> ClipEnd {
        match (self, other) {
            (ClipEnd::Neither, x) | (x, ClipEnd::Neither) => x,
            (a, b) if a == b => a,
            _ => ClipEnd::Both,
        }
    }
}

/// Unclipped extrusion seen in its own frame: the frame normal is the
/// extrusion axis and its origin lies on the start cap.
#[derive(Debug, Clone)]
pub struct ClipBody {
    pub frame: Plane,
    pub depth: f64,
    /// Outer profile in frame coordinates
    pub cross_section: Vec<Point2<f64>>,
}

impl ClipBody {
    pub fn new(frame: Plane, depth: f64, cross_section: Vec<Point2<f64>>) -> Self {
        Self {
            frame,
            depth,
            cross_section,
        }
    }

    pub fn from_extrusion<F>(extrusion: &ExtrusionAnalysis<F>) -> Self {
        Self::new(
            extrusion.position(),
            extrusion.depth,
            extrusion.profile.outer.clone(),
        )
    }

    pub fn range(&self) -> IfcRange {
        IfcRange::new(0.0, self.depth)
    }

    /// Corners of both caps
    fn vertices(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        let up = self.frame.normal * self.depth;
        self.cross_section.iter().flat_map(move |p| {
            let base = self.frame.to_world(p);
            [base, base + up]
        })
    }

    /// The body as convex prisms over the triangulated cross-section
    fn cells(&self) -> Vec<Cell> {
        let cs = &self.cross_section;
        match Profile2D::new(cs.clone()).triangulate() {
            Ok(indices) if !indices.is_empty() => indices
                .chunks_exact(3)
                .map(|t| Cell::prism(&self.frame, self.depth, &[cs[t[0]], cs[t[1]], cs[t[2]]]))
                .collect(),
            _ => vec![Cell::prism(&self.frame, self.depth, cs)],
        }
    }
}

/// Convex piece of what is left of the body, as face polygons
#[derive(Debug, Clone)]
struct Cell {
    faces: Vec<Vec<Point3<f64>>>,
}

impl Cell {
    fn prism(frame: &Plane, depth: f64, base: &[Point2<f64>]) -> Self {
        let up = frame.normal * depth;
        let bottom: Vec<Point3<f64>> = base.iter().map(|p| frame.to_world(p)).collect();
        let top: Vec<Point3<f64>> = bottom.iter().map(|p| p + up).collect();
        let n = bottom.len();
        let mut faces = Vec::with_capacity(n + 2);
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push(vec![bottom[i], bottom[j], top[j], top[i]]);
        }
        faces.push(bottom);
        faces.push(top);
        Self { faces }
    }

    /// Keep the part on the negative side of `plane`
    fn clip(&mut self, plane: &Plane, eps: f64) {
        let mut cut: Vec<Point3<f64>> = Vec::new();
        let mut faces = Vec::with_capacity(self.faces.len() + 1);
        for face in &self.faces {
            let mut kept = Vec::with_capacity(face.len() + 1);
            for i in 0..face.len() {
                let a = face[i];
                let b = face[(i + 1) % face.len()];
                let da = plane.signed_distance(&a);
                let db = plane.signed_distance(&b);
                if da <= eps {
                    kept.push(a);
                    if da >= -eps {
                        cut.push(a);
                    }
                }
                if (da < -eps && db > eps) || (da > eps && db < -eps) {
                    let p = a + (b - a) * (da / (da - db));
                    kept.push(p);
                    cut.push(p);
                }
            }
            if kept.len() >= 3 {
                faces.push(kept);
            }
        }
        if let Some(cap) = order_on_plane(plane, &cut, eps) {
            faces.push(cap);
        }
        self.faces = faces;
    }

    /// Nothing thicker than `eps` is left
    fn is_empty(&self, eps: f64) -> bool {
        let count: usize = self.faces.iter().map(Vec::len).sum();
        if count == 0 {
            return true;
        }
        let centroid = self
            .faces
            .iter()
            .flatten()
            .fold(Point3::origin(), |acc, p| acc + p.coords / count as f64);
        let mut volume = 0.0;
        let mut largest_face = 0.0_f64;
        for face in &self.faces {
            largest_face = largest_face.max(0.5 * newell_vector(face).norm());
            for k in 1..face.len().saturating_sub(1) {
                let a = face[0] - centroid;
                let b = face[k] - centroid;
                let c = face[k + 1] - centroid;
                volume += a.dot(&b.cross(&c)).abs() / 6.0;
            }
        }
        largest_face <= eps * eps || volume <= eps * largest_face
    }
}

/// Points on `plane` as a convex polygon, `None` when fewer than three
/// distinct points remain
fn order_on_plane(plane: &Plane, points: &[Point3<f64>], eps: f64) -> Option<Vec<Point3<f64>>> {
    let mut distinct: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if distinct.iter().all(|q| (q - p).norm() > eps) {
            distinct.push(*p);
        }
    }
    if distinct.len() < 3 {
        return None;
    }
    let local: Vec<Point2<f64>> = distinct.iter().map(|p| plane.to_local(p)).collect();
    let n = local.len() as f64;
    let cx = local.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = local.iter().map(|p| p.y).sum::<f64>() / n;
    let mut order: Vec<(f64, usize)> = local
        .iter()
        .enumerate()
        .map(|(i, p)| ((p.y - cy).atan2(p.x - cx), i))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));
    Some(order.into_iter().map(|(_, i)| distinct[i]).collect())
}

/// Planar cut face; the plane normal points out of the kept material
#[derive(Debug, Clone)]
pub struct ClipFace {
    pub plane: Plane,
    pub boundary: Vec<Point3<f64>>,
}

impl ClipFace {
    pub fn new(plane: Plane, boundary: Vec<Point3<f64>>) -> Self {
        Self { plane, boundary }
    }

    /// Plane and sampled outer boundary of a host face
    pub fn from_face<S: GeometrySource>(source: &S, face: S::Face, tol: &Tolerance) -> Result<Self> {
        let boundaries = get_face_boundaries(source, face, tol)?;
        Ok(Self::new(boundaries.plane, boundaries.outer.tessellate(tol)))
    }
}

/// One half-space subtraction
#[derive(Debug, Clone)]
pub struct ClipStep {
    /// Index into the input faces
    pub face: usize,
    pub plane: Plane,
    /// `Start` or `End`
    pub end: ClipEnd,
    /// Face outline in body frame coordinates, when the half-space must be
    /// bounded
    pub boundary: Option<Vec<Point2<f64>>>,
}

#[derive(Debug, Clone)]
pub struct ClipPlan {
    pub location: ClipEnd,
    pub steps: Vec<ClipStep>,
}

struct Candidate {
    index: usize,
    sign: f64,
    location: ClipEnd,
}

/// Plan the subtraction of `faces` from `body`.
///
/// Returns `Ok(None)` when a step removes whatever the previous steps left
/// of the body. A single face
/// lying along the axis fails with [`Error::ClipPlanePerpendicular`]; in a
/// collection such faces are skipped. Faces that disagree with the end they
/// cut fail with [`Error::InconsistentClipOrientation`].
pub fn plan_clipping(body: &ClipBody, faces: &[ClipFace], tol: &Tolerance) -> Result<Option<ClipPlan>> {
    if faces.is_empty() {
        return Err(Error::InvariantViolation("no clip faces".into()));
    }
    let axis = body.frame.normal;
    let single = faces.len() == 1;
    let range = body.range();

    let mut candidates = Vec::with_capacity(faces.len());
    for (index, face) in faces.iter().enumerate() {
        if tol.is_perpendicular(&face.plane.normal, &axis) {
            if single {
                return Err(Error::ClipPlanePerpendicular);
            }
            debug!(face = index, "skipping clip face along the extrusion axis");
            continue;
        }
        let face_range = IfcRange::from_values(face.boundary.iter().map(|p| body.frame.signed_distance(p)))
            .ok_or_else(|| Error::InvariantViolation(format!("clip face {} has no boundary", index)))?;
        let location = match (
            face_range.start <= range.start + tol.vertex,
            face_range.end >= range.end - tol.vertex,
        ) {
            (true, true) => ClipEnd::Both,
            (true, false) => ClipEnd::Start,
            (false, true) => ClipEnd::End,
            // Interior faces belong to the nearer end
            (false, false) if 0.5 * (face_range.start + face_range.end) < 0.5 * range.end => ClipEnd::Start,
            (false, false) => ClipEnd::End,
        };
        candidates.push(Candidate {
            index,
            sign: face.plane.normal.dot(&axis),
            location,
        });
    }

    let location = candidates
        .iter()
        .fold(ClipEnd::Neither, |acc, c| acc.combine(c.location));

    if !single {
        match location {
            ClipEnd::Neither => {}
            ClipEnd::Start | ClipEnd::End => {
                let expected = if location == ClipEnd::End { 1.0 } else { -1.0 };
                if let Some(c) = candidates.iter().find(|c| c.sign * expected < 0.0) {
                    return Err(Error::InconsistentClipOrientation(format!(
                        "face {} is oriented against the clipped {:?} end",
                        c.index, location
                    )));
                }
            }
            ClipEnd::Both => {
                if let Some(c) = candidates.iter().find(|c| {
                    (c.location == ClipEnd::Start && c.sign > 0.0)
                        || (c.location == ClipEnd::End && c.sign < 0.0)
                }) {
                    return Err(Error::InconsistentClipOrientation(format!(
                        "face {} at the {:?} end faces the other end",
                        c.index, c.location
                    )));
                }
            }
        }
    }

    let mut remaining = body.cells();
    let mut steps = Vec::with_capacity(candidates.len());
    for c in &candidates {
        let face = &faces[c.index];
        let distances: Vec<f64> = body.vertices().map(|v| face.plane.signed_distance(&v)).collect();
        let removes_something = distances.iter().any(|d| *d > tol.vertex);
        let keeps_something = distances.iter().any(|d| *d < -tol.vertex);

        let outline: Vec<Point2<f64>> = face.boundary.iter().map(|p| body.frame.to_local(p)).collect();
        let covered = body
            .cross_section
            .iter()
            .all(|p| point_in_polygon(p, &outline) || distance_to_outline(p, &outline) <= tol.vertex);

        if !removes_something {
            debug!(face = c.index, "clip face removes nothing");
            continue;
        }
        if covered && !keeps_something {
            debug!(face = c.index, "clip face removes the whole body");
            return Ok(None);
        }
        if covered {
            for cell in &mut remaining {
                cell.clip(&face.plane, tol.vertex);
            }
            remaining.retain(|cell| !cell.is_empty(tol.vertex));
            if remaining.is_empty() {
                debug!(face = c.index, "clip face removes what is left of the body");
                return Ok(None);
            }
        }
        steps.push(ClipStep {
            face: c.index,
            plane: face.plane,
            end: if c.sign > 0.0 { ClipEnd::End } else { ClipEnd::Start },
            boundary: if covered { None } else { Some(outline) },
        });
    }

    Ok(Some(ClipPlan { location, steps }))
}

fn distance_to_outline(p: &Point2<f64>, outline: &[Point2<f64>]) -> f64 {
    let n = outline.len();
    (0..n)
        .map(|i| {
            let a = outline[i];
            let b = outline[(i + 1) % n];
            let ab = b - a;
            let len2 = ab.norm_squared();
            let t = if len2 > 0.0 {
                ((p - a).dot(&ab) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (p - (a + ab * t)).norm()
        })
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector3;

    /// 2 x 1 cross-section extruded 3 along z
    fn body() -> ClipBody {
        ClipBody::new(
            Plane::xy(),
            3.0,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
        )
    }

    /// Face on the plane through `point` with `normal`, spanning `x`/`y`
    fn face(point: Point3<f64>, normal: Vector3<f64>, x: (f64, f64), y: (f64, f64)) -> ClipFace {
        let n = normal.normalize();
        let z = |px: f64, py: f64| point.z - (n.x * (px - point.x) + n.y * (py - point.y)) / n.z;
        let boundary = vec![
            Point3::new(x.0, y.0, z(x.0, y.0)),
            Point3::new(x.1, y.0, z(x.1, y.0)),
            Point3::new(x.1, y.1, z(x.1, y.1)),
            Point3::new(x.0, y.1, z(x.0, y.1)),
        ];
        ClipFace::new(Plane::new(point, n), boundary)
    }

    const FULL: ((f64, f64), (f64, f64)) = ((-1.0, 3.0), (-1.0, 2.0));

    #[test]
    fn two_faces_at_the_same_end() {
        let tol = Tolerance::default();
        let faces = [
            face(Point3::new(1.0, 0.5, 2.8), Vector3::new(0.0, -0.1, 1.0), FULL.0, (-1.0, 2.0)),
            face(Point3::new(1.0, 0.5, 2.7), Vector3::new(0.1, 0.0, 1.0), FULL.0, FULL.1),
        ];
        let plan = plan_clipping(&body(), &faces, &tol).unwrap().unwrap();
        assert_eq!(plan.location, ClipEnd::End);
        assert_eq!(plan.steps.len(), 2);
        assert!(plan.steps.iter().all(|s| s.end == ClipEnd::End && s.boundary.is_none()));
    }

    #[test]
    fn inconsistent_orientation_fails() {
        let tol = Tolerance::default();
        let faces = [
            face(Point3::new(1.0, 0.5, 2.8), Vector3::new(0.0, -0.1, 1.0), FULL.0, FULL.1),
            face(Point3::new(1.0, 0.5, 2.7), Vector3::new(0.1, 0.0, -1.0), FULL.0, FULL.1),
        ];
        assert!(matches!(
            plan_clipping(&body(), &faces, &tol),
            Err(Error::InconsistentClipOrientation(_))
        ));
    }

    #[test]
    fn both_ends() {
        let tol = Tolerance::default();
        let faces = [
            face(Point3::new(1.0, 0.5, 0.2), Vector3::new(0.1, 0.0, -1.0), FULL.0, FULL.1),
            face(Point3::new(1.0, 0.5, 2.8), Vector3::new(0.1, 0.0, 1.0), FULL.0, FULL.1),
        ];
        let plan = plan_clipping(&body(), &faces, &tol).unwrap().unwrap();
        assert_eq!(plan.location, ClipEnd::Both);
        assert_eq!(plan.steps[0].end, ClipEnd::Start);
        assert_eq!(plan.steps[1].end, ClipEnd::End);

        let swapped = [
            face(Point3::new(1.0, 0.5, 0.2), Vector3::new(0.1, 0.0, 1.0), FULL.0, FULL.1),
            face(Point3::new(1.0, 0.5, 2.8), Vector3::new(0.1, 0.0, 1.0), FULL.0, FULL.1),
        ];
        assert!(matches!(
            plan_clipping(&body(), &swapped, &tol),
            Err(Error::InconsistentClipOrientation(_))
        ));
    }

    #[test]
    fn perpendicular_face() {
        let tol = Tolerance::default();
        let side = ClipFace::new(
            Plane::new(Point3::new(2.0, 0.0, 0.0), Vector3::x()),
            vec![
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
                Point3::new(2.0, 1.0, 3.0),
                Point3::new(2.0, 0.0, 3.0),
            ],
        );
        assert!(matches!(
            plan_clipping(&body(), &[side.clone()], &tol),
            Err(Error::ClipPlanePerpendicular)
        ));

        let end = face(Point3::new(1.0, 0.5, 2.8), Vector3::new(0.1, 0.0, 1.0), FULL.0, FULL.1);
        let plan = plan_clipping(&body(), &[side, end], &tol).unwrap().unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].face, 1);
    }

    #[test]
    fn partial_face_is_bounded() {
        let tol = Tolerance::default();
        let notch = face(Point3::new(0.5, 0.5, 2.5), Vector3::new(0.0, 0.0, 1.0), (-1.0, 1.0), (-1.0, 2.0));
        let plan = plan_clipping(&body(), &[notch], &tol).unwrap().unwrap();
        assert_eq!(plan.location, ClipEnd::End);
        let outline = plan.steps[0].boundary.as_ref().unwrap();
        assert_eq!(outline.len(), 4);
    }

    #[test]
    fn complete_removal_yields_none() {
        let tol = Tolerance::default();
        let everything = face(Point3::new(1.0, 0.5, 3.5), Vector3::new(0.0, 0.0, -1.0), FULL.0, FULL.1);
        assert!(plan_clipping(&body(), &[everything], &tol).unwrap().is_none());
    }

    #[test]
    fn faces_removing_everything_together_yield_none() {
        let tol = Tolerance::default();
        let center = Point3::new(1.0, 0.5, 1.5);
        let faces = [
            face(center, Vector3::new(1.6, 0.0, 1.0), FULL.0, FULL.1),
            face(center, Vector3::new(-1.6, 0.0, -1.0), FULL.0, FULL.1),
        ];
        assert!(plan_clipping(&body(), &faces, &tol).unwrap().is_none());

        // Overlapping but not complementary half-spaces leave a wedge
        let wedge = [
            face(center, Vector3::new(1.6, 0.0, 1.0), FULL.0, FULL.1),
            face(Point3::new(1.0, 0.5, 0.5), Vector3::new(-1.6, 0.0, -1.0), FULL.0, FULL.1),
        ];
        let plan = plan_clipping(&body(), &wedge, &tol).unwrap().unwrap();
        assert_eq!(plan.steps.len(), 2);
    }

    #[test]
    fn noop_face_is_skipped() {
        let tol = Tolerance::default();
        let below = face(Point3::new(1.0, 0.5, -0.5), Vector3::new(0.0, 0.0, -1.0), FULL.0, FULL.1);
        let plan = plan_clipping(&body(), &[below], &tol).unwrap().unwrap();
        assert!(plan.steps.is_empty());
    }
}

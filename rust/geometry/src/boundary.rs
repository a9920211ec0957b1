// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face boundaries and loop nesting
//!
//! Planar loops are sorted into outer loops and the holes they own by
//! containment depth: a loop enclosed by an even number of other loops is an
//! outer loop, an odd number makes it a hole of its innermost container.
//! Nesting is computed on indices only, the input loops are never mutated.

use crate::curve::{CurveKind, CurveLoop};
use crate::plane::Plane;
use crate::source::GeometrySource;
use crate::tolerance::Tolerance;
use crate::{Error, Point2, Result};
use smallvec::SmallVec;

/// Curve content of a boundary loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoundaryComplexity {
    /// Straight segments only
    Polygonal,
    /// Straight segments and circular arcs
    LinesAndArcs,
    /// Anything else (ellipses, splines, sampled curves)
    Complex,
}

impl BoundaryComplexity {
    pub fn of_loop(lp: &CurveLoop) -> Self {
        lp.iter()
            .map(|c| match c.kind() {
                CurveKind::Line => BoundaryComplexity::Polygonal,
                CurveKind::Arc => BoundaryComplexity::LinesAndArcs,
                _ => BoundaryComplexity::Complex,
            })
            .max()
            .unwrap_or(BoundaryComplexity::Polygonal)
    }
}

/// Outer loop of a nest together with the holes it owns (loop indices)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopNest {
    pub outer: usize,
    pub inner: SmallVec<[usize; 4]>,
}

/// Boundary loops of one planar face
#[derive(Debug, Clone)]
pub struct FaceBoundaries {
    pub plane: Plane,
    pub outer: CurveLoop,
    pub inner: Vec<CurveLoop>,
    /// Complexity of the outer loop followed by each inner loop
    pub complexity: Vec<BoundaryComplexity>,
}

impl FaceBoundaries {
    /// Worst complexity over all loops
    pub fn max_complexity(&self) -> BoundaryComplexity {
        self.complexity
            .iter()
            .copied()
            .max()
            .unwrap_or(BoundaryComplexity::Polygonal)
    }
}

/// Odd-crossing test with a ray running from `point` towards -x
pub fn point_in_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x < point.x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Sort planar loops into outer loops and their holes.
///
/// Nests are returned in order of their outer loop index; holes in index
/// order. Loops that degenerate to fewer than three points in the plane are
/// dropped.
pub fn sort_edge_loops(loops: &[CurveLoop], plane: &Plane, tol: &Tolerance) -> Vec<LoopNest> {
    let polygons: Vec<Vec<Point2<f64>>> = loops
        .iter()
        .map(|lp| lp.tessellate(tol).iter().map(|p| plane.to_local(p)).collect())
        .collect();

    let valid: Vec<usize> = (0..loops.len()).filter(|i| polygons[*i].len() >= 3).collect();

    // containers[i] = loops enclosing loop i
    let containers: Vec<SmallVec<[usize; 4]>> = valid
        .iter()
        .map(|&i| {
            let probe = polygons[i][0];
            valid
                .iter()
                .copied()
                .filter(|&j| j != i && point_in_polygon(&probe, &polygons[j]))
                .collect()
        })
        .collect();
    let depth = |k: usize| containers[k].len();

    let mut nests: Vec<LoopNest> = Vec::new();
    for (k, &i) in valid.iter().enumerate() {
        if depth(k) % 2 == 0 {
            nests.push(LoopNest {
                outer: i,
                inner: SmallVec::new(),
            });
        }
    }

    for (k, &i) in valid.iter().enumerate() {
        if depth(k) % 2 == 0 {
            continue;
        }
        // The innermost container sits exactly one level up
        let parent = containers[k].iter().copied().find(|j| {
            valid
                .iter()
                .position(|v| v == j)
                .map_or(false, |kj| depth(kj) + 1 == depth(k))
        });
        if let Some(nest) = parent.and_then(|p| nests.iter_mut().find(|n| n.outer == p)) {
            nest.inner.push(i);
        }
    }

    nests
}

/// Outer and inner boundaries of a planar face
pub fn get_face_boundaries<S: GeometrySource>(
    source: &S,
    face: S::Face,
    tol: &Tolerance,
) -> Result<FaceBoundaries> {
    let plane = source
        .face_plane(face)?
        .ok_or_else(|| Error::unsupported("face is not planar"))?;
    let loops = source.face_curve_loops(face)?;
    for lp in &loops {
        if let Some(gap) = lp.first_gap(tol) {
            return Err(Error::DisconnectedLoop(gap));
        }
        if !lp.is_closed(tol) {
            return Err(Error::DisconnectedLoop(lp.len().saturating_sub(1)));
        }
    }

    let nests = sort_edge_loops(&loops, &plane, tol);
    let nest = match nests.as_slice() {
        [single] => single,
        [] => return Err(Error::UnsupportedTopology("face has no boundary".into())),
        _ => {
            return Err(Error::UnsupportedTopology(format!(
                "face has {} disjoint outer boundaries",
                nests.len()
            )))
        }
    };

    let outer = loops[nest.outer].clone();
    let inner: Vec<CurveLoop> = nest.inner.iter().map(|i| loops[*i].clone()).collect();
    let complexity = std::iter::once(&outer)
        .chain(inner.iter())
        .map(BoundaryComplexity::of_loop)
        .collect();

    Ok(FaceBoundaries {
        plane,
        outer,
        inner,
        complexity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brep::BrepSolid;
    use crate::curve::{Arc, Curve};
    use crate::{Point3, Vector3};

    fn square(center: (f64, f64), half: f64) -> CurveLoop {
        let (cx, cy) = center;
        CurveLoop::from_points(&[
            Point3::new(cx - half, cy - half, 0.0),
            Point3::new(cx + half, cy - half, 0.0),
            Point3::new(cx + half, cy + half, 0.0),
            Point3::new(cx - half, cy + half, 0.0),
        ])
    }

    #[test]
    fn ray_casting() {
        let poly = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        assert!(point_in_polygon(&Point2::new(2.0, 2.0), &poly));
        assert!(!point_in_polygon(&Point2::new(5.0, 2.0), &poly));
        assert!(!point_in_polygon(&Point2::new(-1.0, 2.0), &poly));
        assert!(!point_in_polygon(&Point2::new(2.0, 2.0), &poly[..2]));
    }

    #[test]
    fn nested_squares_alternate() {
        let tol = Tolerance::default();
        // 0 contains 1 contains 2 contains 3; 4 is a separate island
        let loops = vec![
            square((0.0, 0.0), 10.0),
            square((0.0, 0.0), 7.0),
            square((0.0, 0.0), 4.0),
            square((0.0, 0.0), 1.0),
            square((30.0, 0.0), 2.0),
        ];
        let nests = sort_edge_loops(&loops, &Plane::xy(), &tol);
        assert_eq!(
            nests,
            vec![
                LoopNest { outer: 0, inner: SmallVec::from_slice(&[1]) },
                LoopNest { outer: 2, inner: SmallVec::from_slice(&[3]) },
                LoopNest { outer: 4, inner: SmallVec::new() },
            ]
        );
    }

    #[test]
    fn sibling_holes_share_outer() {
        let tol = Tolerance::default();
        let loops = vec![
            square((-3.0, 0.0), 1.0),
            square((0.0, 0.0), 10.0),
            square((3.0, 0.0), 1.0),
        ];
        let nests = sort_edge_loops(&loops, &Plane::xy(), &tol);
        assert_eq!(nests.len(), 1);
        assert_eq!(nests[0].outer, 1);
        assert_eq!(nests[0].inner.as_slice(), &[0, 2]);
    }

    #[test]
    fn boundary_coincident_probe_is_deterministic() {
        let tol = Tolerance::default();
        // Inner loop shares its first vertex with the outer boundary
        let outer = square((0.0, 0.0), 2.0);
        let touching = CurveLoop::from_points(&[
            Point3::new(-2.0, -2.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        ]);
        let loops = vec![outer, touching];
        let first = sort_edge_loops(&loops, &Plane::xy(), &tol);
        for _ in 0..5 {
            assert_eq!(sort_edge_loops(&loops, &Plane::xy(), &tol), first);
        }
    }

    #[test]
    fn complexity_classification() {
        let tol = Tolerance::default();
        assert_eq!(BoundaryComplexity::of_loop(&square((0.0, 0.0), 1.0)), BoundaryComplexity::Polygonal);
        let circle = CurveLoop::new(vec![Curve::Arc(Arc::circle(Point3::origin(), Vector3::z(), 1.0))]);
        assert_eq!(BoundaryComplexity::of_loop(&circle), BoundaryComplexity::LinesAndArcs);
        assert!(circle.is_closed(&tol));
        let sampled = CurveLoop::new(vec![Curve::Generic(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)])]);
        assert_eq!(BoundaryComplexity::of_loop(&sampled), BoundaryComplexity::Complex);
    }

    #[test]
    fn face_with_hole_boundaries() {
        let tol = Tolerance::default();
        let solid = BrepSolid::extrude(
            &square((0.0, 0.0), 4.0),
            &[square((0.0, 0.0), 1.0)],
            &Vector3::z(),
            1.0,
            tol,
        )
        .unwrap();
        let top = solid
            .faces()
            .into_iter()
            .find(|f| solid.face_plane(*f).unwrap().map_or(false, |p| p.normal.z > 0.9))
            .unwrap();
        let b = get_face_boundaries(&solid, top, &tol).unwrap();
        assert_eq!(b.inner.len(), 1);
        assert_eq!(b.complexity, vec![BoundaryComplexity::Polygonal; 2]);
        assert!(b.outer.signed_area(&b.plane.normal, &tol) > 15.9);
        assert!(b.inner[0].signed_area(&b.plane.normal, &tol) < 0.0);
    }

    #[test]
    fn curved_face_is_unsupported() {
        let tol = Tolerance::default();
        let circle = CurveLoop::new(vec![Curve::Arc(Arc::circle(Point3::origin(), Vector3::z(), 1.0))]);
        let solid = BrepSolid::extrude(&circle, &[], &Vector3::z(), 1.0, tol).unwrap();
        let side = solid
            .faces()
            .into_iter()
            .find(|f| solid.face_plane(*f).unwrap().is_none())
            .unwrap();
        assert!(matches!(
            get_face_boundaries(&solid, side, &tol),
            Err(Error::Unsupported(_))
        ));
    }
}

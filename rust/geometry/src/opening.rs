// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Openings and recesses from cavity faces
//!
//! The faces lining a cavity are reduced to two matching profiles and the
//! straight extrusion between them. The boundary of the face set is split
//! into groups by the surrounding face each edge borders:
//!
//! - one group is a recess, closed by a parallel bottom face in the set;
//! - two groups are the two mouths of a through opening;
//! - three groups are an opening cut through an edge of the host; the two
//!   most nearly parallel groups are kept and their open chains closed.
//!
//! Every mismatch is an error. A wrong opening is worse than none.

use crate::boundary::get_face_boundaries;
use crate::curve::{Curve, CurveLoop, NurbsCurve};
use crate::plane::Plane;
use crate::profile::Profile2D;
use crate::source::GeometrySource;
use crate::tolerance::Tolerance;
use crate::{Error, Result, Vector3};
use rustc_hash::{FxHashMap, FxHashSet};

/// Straight extrusion filling a cavity
#[derive(Debug, Clone)]
pub struct OpeningExtrusion {
    /// Start profile in world coordinates
    pub outer: CurveLoop,
    /// Profile frame; its normal is the extrusion direction
    pub plane: Plane,
    pub profile: Profile2D,
    pub direction: Vector3<f64>,
    pub depth: f64,
    /// Number of boundary groups found
    pub groups: usize,
}

#[derive(Debug)]
struct BoundaryGroup {
    plane: Option<Plane>,
    curves: Vec<Curve>,
}

/// Recover the extrusion lining the cavity bounded by `faces`
pub fn analyze_opening<S: GeometrySource>(
    source: &S,
    faces: &[S::Face],
    tol: &Tolerance,
) -> Result<OpeningExtrusion> {
    let groups = group_boundary_edges(source, faces, tol)?;

    let (first, second) = match groups.len() {
        1 => recess_profiles(source, faces, &groups[0], tol)?,
        2 => (
            chain_curves(&groups[0].curves, false, tol)?,
            chain_curves(&groups[1].curves, false, tol)?,
        ),
        3 => straddling_profiles(&groups, tol)?,
        n => {
            return Err(Error::UnsupportedTopology(format!(
                "opening boundary forms {} groups",
                n
            )))
        }
    };

    let plane_a = first
        .plane(tol)
        .ok_or_else(|| Error::MismatchedProfiles("first profile is not planar".into()))?;
    let plane_b = second
        .plane(tol)
        .ok_or_else(|| Error::MismatchedProfiles("second profile is not planar".into()))?;
    if !tol.is_parallel(&plane_a.normal, &plane_b.normal) {
        return Err(Error::MismatchedProfiles("profile planes are not parallel".into()));
    }

    let separation = plane_a.signed_distance(&plane_b.origin);
    if separation.abs() <= tol.vertex {
        return Err(Error::MismatchedProfiles("profiles are coplanar".into()));
    }
    if second
        .tessellate(tol)
        .iter()
        .any(|p| (plane_a.signed_distance(p) - separation).abs() > tol.vertex)
    {
        return Err(Error::MismatchedProfiles("profile separation is not constant".into()));
    }

    let direction = plane_a.normal * separation.signum();
    let depth = separation.abs();
    match_profiles(&first.translated(&(direction * depth)), &second, tol)?;

    let plane = Plane::from_axes(plane_a.origin, plane_a.x_axis, direction);
    let profile = Profile2D::from_loops(&first, &[], &plane, tol);
    Ok(OpeningExtrusion {
        outer: first,
        plane,
        profile,
        direction,
        depth,
        groups: groups.len(),
    })
}

/// Boundary edges of the face set keyed by the outside face they border.
/// Coplanar outside faces share a group.
fn group_boundary_edges<S: GeometrySource>(
    source: &S,
    faces: &[S::Face],
    tol: &Tolerance,
) -> Result<Vec<BoundaryGroup>> {
    let members: FxHashSet<S::Face> = faces.iter().copied().collect();
    let mut groups: Vec<BoundaryGroup> = Vec::new();
    let mut group_of: FxHashMap<Option<S::Face>, usize> = FxHashMap::default();

    for &face in faces {
        for edges in source.face_loops(face)? {
            for edge in edges {
                let other = source.adjoining_face(edge.edge, face)?;
                if other.map_or(false, |o| members.contains(&o)) {
                    continue;
                }
                let index = match group_of.get(&other) {
                    Some(i) => *i,
                    None => {
                        let plane = match other {
                            Some(o) => source.face_plane(o)?,
                            None => None,
                        };
                        let existing = plane.and_then(|p| {
                            groups
                                .iter()
                                .position(|g| g.plane.map_or(false, |gp| gp.is_coplanar(&p, tol)))
                        });
                        let i = existing.unwrap_or_else(|| {
                            groups.push(BoundaryGroup {
                                plane,
                                curves: Vec::new(),
                            });
                            groups.len() - 1
                        });
                        group_of.insert(other, i);
                        i
                    }
                };
                groups[index].curves.push(source.oriented_curve(edge)?);
            }
        }
    }
    Ok(groups)
}

/// Mouth of a recess and the bottom face parallel to it
fn recess_profiles<S: GeometrySource>(
    source: &S,
    faces: &[S::Face],
    mouth: &BoundaryGroup,
    tol: &Tolerance,
) -> Result<(CurveLoop, CurveLoop)> {
    let mouth_loop = chain_curves(&mouth.curves, false, tol)?;
    let mouth_plane = match mouth.plane {
        Some(p) => p,
        None => mouth_loop
            .plane(tol)
            .ok_or_else(|| Error::UnsupportedTopology("recess mouth is not planar".into()))?,
    };

    for &face in faces {
        let Some(plane) = source.face_plane(face)? else {
            continue;
        };
        if tol.is_parallel(&plane.normal, &mouth_plane.normal) && !plane.is_coplanar(&mouth_plane, tol) {
            let bottom = get_face_boundaries(source, face, tol)?;
            return Ok((mouth_loop, bottom.outer));
        }
    }
    Err(Error::UnsupportedTopology(
        "recess has no bottom face parallel to its mouth".into(),
    ))
}

/// Two most nearly parallel groups of an opening through a host edge
fn straddling_profiles(groups: &[BoundaryGroup], tol: &Tolerance) -> Result<(CurveLoop, CurveLoop)> {
    let normals = groups
        .iter()
        .map(|g| {
            g.plane
                .map(|p| p.normal)
                .ok_or_else(|| Error::UnsupportedTopology("boundary group without a plane".into()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut best = (0, 1, f64::MIN);
    for i in 0..normals.len() {
        for j in (i + 1)..normals.len() {
            let alignment = normals[i].dot(&normals[j]).abs();
            if alignment > best.2 {
                best = (i, j, alignment);
            }
        }
    }

    Ok((
        chain_curves(&groups[best.0].curves, true, tol)?,
        chain_curves(&groups[best.1].curves, true, tol)?,
    ))
}

/// Join curves end to start, reversing them where needed. With
/// `close_open` an open chain is closed by a straight segment.
fn chain_curves(curves: &[Curve], close_open: bool, tol: &Tolerance) -> Result<CurveLoop> {
    let mut remaining: Vec<Curve> = curves.to_vec();
    if remaining.is_empty() {
        return Err(Error::UnsupportedTopology("empty boundary group".into()));
    }
    let mut chain = vec![remaining.remove(0)];

    while !remaining.is_empty() {
        let head = chain[0].start_point();
        let tail = chain[chain.len() - 1].end_point();

        if let Some(i) = remaining.iter().position(|c| tol.points_equal(&c.start_point(), &tail)) {
            chain.push(remaining.remove(i));
        } else if let Some(i) = remaining.iter().position(|c| tol.points_equal(&c.end_point(), &tail)) {
            chain.push(remaining.remove(i).reversed());
        } else if let Some(i) = remaining.iter().position(|c| tol.points_equal(&c.end_point(), &head)) {
            chain.insert(0, remaining.remove(i));
        } else if let Some(i) = remaining.iter().position(|c| tol.points_equal(&c.start_point(), &head)) {
            chain.insert(0, remaining.remove(i).reversed());
        } else {
            return Err(Error::DisconnectedLoop(chain.len()));
        }
    }

    let mut lp = CurveLoop::new(chain);
    if lp.is_closed(tol) {
        return Ok(lp);
    }
    if !close_open {
        return Err(Error::DisconnectedLoop(lp.len() - 1));
    }
    let head = lp.curves()[0].start_point();
    let tail = lp.curves()[lp.len() - 1].end_point();
    lp.push(Curve::line(tail, head));
    Ok(lp)
}

/// Pair every curve of `a` with a distinct, equal curve of `b`
fn match_profiles(a: &CurveLoop, b: &CurveLoop, tol: &Tolerance) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::MismatchedProfiles(format!(
            "profiles have {} and {} curves",
            a.len(),
            b.len()
        )));
    }
    let mut used = vec![false; b.len()];
    for (i, curve) in a.iter().enumerate() {
        let j = (0..b.len())
            .find(|&j| !used[j] && curves_match(curve, &b.curves()[j], tol))
            .ok_or_else(|| {
                Error::MismatchedProfiles(format!("no counterpart for {:?} curve {}", curve.kind(), i))
            })?;
        used[j] = true;
    }
    Ok(())
}

fn curves_match(a: &Curve, b: &Curve, tol: &Tolerance) -> bool {
    let ends = (tol.points_equal(&a.start_point(), &b.start_point())
        && tol.points_equal(&a.end_point(), &b.end_point()))
        || (tol.points_equal(&a.start_point(), &b.end_point())
            && tol.points_equal(&a.end_point(), &b.start_point()));

    match (a, b) {
        (Curve::Line(_), Curve::Line(_)) => ends,
        (Curve::Arc(x), Curve::Arc(y)) => {
            ends && tol.equal(x.radius, y.radius) && tol.points_equal(&x.center, &y.center)
        }
        (Curve::Ellipse(x), Curve::Ellipse(y)) => {
            ends && tol.equal(x.radius_x, y.radius_x)
                && tol.equal(x.radius_y, y.radius_y)
                && tol.points_equal(&x.center, &y.center)
        }
        (Curve::Spline(x), Curve::Spline(y)) => splines_equal(x, y, tol) || splines_equal(&x.reversed(), y, tol),
        (Curve::Generic(x), Curve::Generic(y)) => {
            x.len() == y.len()
                && (x.iter().zip(y).all(|(p, q)| tol.points_equal(p, q))
                    || x.iter().rev().zip(y).all(|(p, q)| tol.points_equal(p, q)))
        }
        _ => false,
    }
}

fn splines_equal(x: &NurbsCurve, y: &NurbsCurve, tol: &Tolerance) -> bool {
    let weights_equal = match (&x.weights, &y.weights) {
        (None, None) => true,
        (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b).all(|(p, q)| tol.equal(*p, *q)),
        _ => !x.is_rational() && !y.is_rational(),
    };
    x.degree == y.degree
        && x.control_points.len() == y.control_points.len()
        && x.knots.len() == y.knots.len()
        && x.control_points
            .iter()
            .zip(&y.control_points)
            .all(|(p, q)| tol.points_equal(p, q))
        && x.knots.iter().zip(&y.knots).all(|(p, q)| tol.equal(*p, *q))
        && weights_equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brep::BrepSolid;
    use crate::source::FaceSurface;
    use crate::Point3;
    use approx::assert_relative_eq;

    fn faces_where(solid: &BrepSolid, pred: impl Fn(&Plane) -> bool) -> Vec<crate::brep::FaceKey> {
        solid
            .faces()
            .into_iter()
            .filter(|f| match solid.face_surface(*f).unwrap() {
                FaceSurface::Plane(p) => pred(&p),
                _ => false,
            })
            .collect()
    }

    #[test]
    fn through_opening() {
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
        let wall = BrepSolid::extrude(&outer, &[hole], &Vector3::z(), 2.0, tol).unwrap();
        let reveals = faces_where(&wall, |p| {
            p.normal.z.abs() < 0.5 && (1.0..=3.0).contains(&p.origin.x) && (1.0..=3.0).contains(&p.origin.y)
        });
        assert_eq!(reveals.len(), 4);

        let opening = analyze_opening(&wall, &reveals, &tol).unwrap();
        assert_eq!(opening.groups, 2);
        assert_relative_eq!(opening.depth, 2.0, epsilon = 1e-9);
        assert_relative_eq!(opening.direction.z.abs(), 1.0, epsilon = 1e-9);
        assert_eq!(opening.outer.len(), 4);
        assert_relative_eq!(opening.profile.area(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn recess_uses_bottom_face() {
        let tol = Tolerance::default();
        let pocket = BrepSolid::cuboid(Point3::origin(), Point3::new(2.0, 1.0, 3.0), tol).unwrap();
        let lining = faces_where(&pocket, |p| p.normal.z < 0.5);
        assert_eq!(lining.len(), 5);

        let recess = analyze_opening(&pocket, &lining, &tol).unwrap();
        assert_eq!(recess.groups, 1);
        assert_relative_eq!(recess.depth, 3.0, epsilon = 1e-9);
        assert!(recess.direction.z < 0.0);
        assert_relative_eq!(recess.profile.area(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn opening_through_an_edge() {
        let tol = Tolerance::default();
        let cut = BrepSolid::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0), tol).unwrap();
        let lining = faces_where(&cut, |p| p.normal.x.abs() > 0.5 || p.normal.z < -0.5);
        assert_eq!(lining.len(), 3);

        let opening = analyze_opening(&cut, &lining, &tol).unwrap();
        assert_eq!(opening.groups, 3);
        assert_relative_eq!(opening.direction.y.abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(opening.depth, 1.0, epsilon = 1e-9);
        assert_eq!(opening.outer.len(), 4);
        assert!(opening.outer.is_closed(&tol));
    }

    #[test]
    fn tapered_opening_is_rejected() {
        let tol = Tolerance::default();
        let v = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 4.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(4.0, 0.0, 2.0),
            Point3::new(4.0, 4.0, 2.0),
            Point3::new(0.0, 4.0, 2.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(3.0, 1.0, 0.0),
            Point3::new(3.0, 3.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
            Point3::new(1.5, 1.5, 2.0),
            Point3::new(2.5, 1.5, 2.0),
            Point3::new(2.5, 2.5, 2.0),
            Point3::new(1.5, 2.5, 2.0),
        ];
        let faces = vec![
            vec![vec![0, 3, 2, 1], vec![8, 9, 10, 11]],
            vec![vec![4, 5, 6, 7], vec![12, 15, 14, 13]],
            vec![vec![0, 1, 5, 4]],
            vec![vec![1, 2, 6, 5]],
            vec![vec![2, 3, 7, 6]],
            vec![vec![3, 0, 4, 7]],
            vec![vec![8, 12, 13, 9]],
            vec![vec![9, 13, 14, 10]],
            vec![vec![10, 14, 15, 11]],
            vec![vec![11, 15, 12, 8]],
        ];
        let solid = BrepSolid::from_polyhedron(&v, &faces, tol).unwrap();
        assert!(solid.is_closed());
        let reveals: Vec<_> = solid.faces().into_iter().skip(6).collect();
        assert!(matches!(
            analyze_opening(&solid, &reveals, &tol),
            Err(Error::MismatchedProfiles(_))
        ));
    }

    #[test]
    fn single_side_face_has_too_many_groups() {
        let tol = Tolerance::default();
        let cut = BrepSolid::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0), tol).unwrap();
        let side = faces_where(&cut, |p| p.normal.x > 0.5);
        assert!(matches!(
            analyze_opening(&cut, &side, &tol),
            Err(Error::UnsupportedTopology(_))
        ));
    }

    #[test]
    fn chaining_reverses_and_closes() {
        let tol = Tolerance::default();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let d = Point3::new(0.0, 1.0, 0.0);
        let curves = vec![Curve::line(a, b), Curve::line(c, b), Curve::line(c, d)];
        assert!(matches!(chain_curves(&curves, false, &tol), Err(Error::DisconnectedLoop(_))));
        let closed = chain_curves(&curves, true, &tol).unwrap();
        assert_eq!(closed.len(), 4);
        assert!(closed.is_closed(&tol));

        let broken = vec![Curve::line(a, b), Curve::line(c, d)];
        assert!(matches!(chain_curves(&broken, true, &tol), Err(Error::DisconnectedLoop(1))));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon utilities
//!
//! Newell normals, shoelace areas and an earcutr wrapper for planar polygons
//! with holes.

use crate::plane::Plane;
use crate::{Error, Point2, Point3, Result, Vector3};

/// Unnormalized Newell vector of a polygon.
///
/// Its length is twice the polygon area and it points along the normal for
/// which the polygon winds counter-clockwise.
pub fn newell_vector(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}

/// Unit normal of a polygon, `None` when the polygon is degenerate
pub fn polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 3 {
        return None;
    }
    newell_vector(points).try_normalize(1e-12)
}

/// Signed shoelace area, positive for counter-clockwise polygons
pub fn signed_area_2d(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

/// Perimeter of a closed polygon
pub fn polygon_perimeter(points: &[Point3<f64>]) -> f64 {
    let n = points.len();
    (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum()
}

/// Triangulate a polygon with holes.
/// Returns triangle indices into the combined vertex array (outer + all holes)
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points in outer boundary".to_string(),
        ));
    }

    if outer.len() == 3 && holes.is_empty() {
        return Ok(vec![0, 1, 2]);
    }

    let total_points = outer.len() + holes.iter().map(|h| h.len()).sum::<usize>();
    let mut vertices = Vec::with_capacity(total_points * 2);
    for p in outer {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(vertices.len() / 2);
        for p in hole {
            vertices.push(p.x);
            vertices.push(p.y);
        }
    }

    earcutr::earcut(&vertices, &hole_indices, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

/// Triangulate planar 3D loops lying in `plane`.
///
/// Returns the combined vertex list and triangle indices wound
/// counter-clockwise about the plane normal.
pub fn triangulate_planar_loops(
    plane: &Plane,
    outer: &[Point3<f64>],
    holes: &[Vec<Point3<f64>>],
) -> Result<(Vec<Point3<f64>>, Vec<usize>)> {
    let outer_2d: Vec<Point2<f64>> = outer.iter().map(|p| plane.to_local(p)).collect();
    let holes_2d: Vec<Vec<Point2<f64>>> = holes
        .iter()
        .filter(|h| h.len() >= 3)
        .map(|h| h.iter().map(|p| plane.to_local(p)).collect())
        .collect();

    let mut indices = triangulate_polygon_with_holes(&outer_2d, &holes_2d)?;

    let mut positions: Vec<Point3<f64>> = outer.to_vec();
    for hole in holes.iter().filter(|h| h.len() >= 3) {
        positions.extend_from_slice(hole);
    }

    // earcutr output winding follows the input; normalize to the plane normal
    for tri in indices.chunks_exact_mut(3) {
        let a = positions[tri[0]];
        let b = positions[tri[1]];
        let c = positions[tri[2]];
        if (b - a).cross(&(c - a)).dot(&plane.normal) < 0.0 {
            tri.swap(1, 2);
        }
    }

    Ok((positions, indices))
}

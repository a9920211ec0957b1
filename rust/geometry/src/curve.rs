// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host curve model
//!
//! Curves are a closed tagged union. Consumers match on [`Curve`] instead of
//! probing a type hierarchy, and [`CurveKind`] is the plain discriminant used
//! for classification.

use crate::plane::Plane;
use crate::tolerance::Tolerance;
use crate::triangulation::newell_vector;
use crate::{Point3, Vector3};
use nalgebra::{Matrix4, Vector4};
use std::f64::consts::{PI, TAU};

/// Maximum angular step when tessellating conics
const CONIC_STEP: f64 = PI / 12.0;

/// Samples per control point when tessellating splines
const SPLINE_SAMPLES_PER_POINT: usize = 4;

/// Curve discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveKind {
    Line,
    Arc,
    Ellipse,
    Spline,
    Generic,
}

/// Straight segment
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Line {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.end - self.start
    }
}

/// Circular arc.
///
/// `point_at(t) = center + radius * (cos t * x_axis + sin t * y_axis)` with
/// `y_axis = normal x x_axis`; the parameter runs from `start_param` to
/// `end_param` counter-clockwise about `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub normal: Vector3<f64>,
    pub radius: f64,
    pub start_param: f64,
    pub end_param: f64,
    /// Parameter period of the underlying circle (2π for host circles)
    pub period: f64,
}

impl Arc {
    pub fn new(
        center: Point3<f64>,
        x_axis: Vector3<f64>,
        normal: Vector3<f64>,
        radius: f64,
        start_param: f64,
        end_param: f64,
    ) -> Self {
        let frame = Plane::from_axes(center, x_axis, normal);
        Self {
            center,
            x_axis: frame.x_axis,
            normal: frame.normal,
            radius,
            start_param,
            end_param,
            period: TAU,
        }
    }

    /// Full circle starting on the frame's x axis
    pub fn circle(center: Point3<f64>, normal: Vector3<f64>, radius: f64) -> Self {
        let frame = Plane::new(center, normal);
        Self::new(center, frame.x_axis, frame.normal, radius, 0.0, TAU)
    }

    #[inline]
    pub fn y_axis(&self) -> Vector3<f64> {
        self.normal.cross(&self.x_axis)
    }

    #[inline]
    pub fn sweep(&self) -> f64 {
        self.end_param - self.start_param
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.center + (self.x_axis * t.cos() + self.y_axis() * t.sin()) * self.radius
    }

    pub fn mid_point(&self) -> Point3<f64> {
        self.point_at(0.5 * (self.start_param + self.end_param))
    }

    pub fn is_full(&self, tol: &Tolerance) -> bool {
        self.sweep() >= self.period - tol.angle
    }

    pub fn reversed(&self) -> Self {
        Self {
            normal: -self.normal,
            start_param: -self.end_param,
            end_param: -self.start_param,
            ..self.clone()
        }
    }
}

/// Elliptical arc with the same parameterization as [`Arc`]
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub center: Point3<f64>,
    pub x_axis: Vector3<f64>,
    pub normal: Vector3<f64>,
    pub radius_x: f64,
    pub radius_y: f64,
    pub start_param: f64,
    pub end_param: f64,
    pub period: f64,
}

impl Ellipse {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        center: Point3<f64>,
        x_axis: Vector3<f64>,
        normal: Vector3<f64>,
        radius_x: f64,
        radius_y: f64,
        start_param: f64,
        end_param: f64,
    ) -> Self {
        let frame = Plane::from_axes(center, x_axis, normal);
        Self {
            center,
            x_axis: frame.x_axis,
            normal: frame.normal,
            radius_x,
            radius_y,
            start_param,
            end_param,
            period: TAU,
        }
    }

    #[inline]
    pub fn y_axis(&self) -> Vector3<f64> {
        self.normal.cross(&self.x_axis)
    }

    #[inline]
    pub fn sweep(&self) -> f64 {
        self.end_param - self.start_param
    }

    pub fn is_full(&self, tol: &Tolerance) -> bool {
        self.sweep() >= self.period - tol.angle
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.center + self.x_axis * (self.radius_x * t.cos()) + self.y_axis() * (self.radius_y * t.sin())
    }

    pub fn reversed(&self) -> Self {
        Self {
            normal: -self.normal,
            start_param: -self.end_param,
            end_param: -self.start_param,
            ..self.clone()
        }
    }
}

/// Non-uniform rational B-spline
#[derive(Debug, Clone, PartialEq)]
pub struct NurbsCurve {
    pub degree: usize,
    pub control_points: Vec<Point3<f64>>,
    /// `None` for non-rational splines
    pub weights: Option<Vec<f64>>,
    /// Full knot vector, `control_points.len() + degree + 1` values
    pub knots: Vec<f64>,
}

impl NurbsCurve {
    /// Clamped uniform spline through the given control points
    pub fn clamped(degree: usize, control_points: Vec<Point3<f64>>) -> Self {
        let n = control_points.len();
        let spans = n.saturating_sub(degree).max(1);
        let mut knots = Vec::with_capacity(n + degree + 1);
        knots.extend(std::iter::repeat(0.0).take(degree + 1));
        for i in 1..spans {
            knots.push(i as f64 / spans as f64);
        }
        knots.extend(std::iter::repeat(1.0).take(degree + 1));
        Self {
            degree,
            control_points,
            weights: None,
            knots,
        }
    }

    /// Whether the knot vector and weights fit the control points
    pub fn is_valid(&self) -> bool {
        let n = self.control_points.len();
        n > self.degree
            && self.knots.len() == n + self.degree + 1
            && self.knots.windows(2).all(|w| w[0] <= w[1])
            && self.weights.as_ref().map_or(true, |w| w.len() == n && w.iter().all(|x| *x > 0.0))
    }

    /// Rational only when the weights actually differ
    pub fn is_rational(&self) -> bool {
        match &self.weights {
            Some(w) => w.windows(2).any(|p| (p[0] - p[1]).abs() > f64::EPSILON),
            None => false,
        }
    }

    #[inline]
    fn weight(&self, i: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[i])
    }

    /// Parameter range; `None` for a malformed spline
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.is_valid()
            .then(|| (self.knots[self.degree], self.knots[self.control_points.len()]))
    }

    /// Evaluate with de Boor's algorithm in homogeneous coordinates.
    /// `None` for a malformed spline.
    pub fn point_at(&self, u: f64) -> Option<Point3<f64>> {
        let p = self.degree;
        let n = self.control_points.len();
        let (lo, hi) = self.domain()?;
        let u = u.clamp(lo, hi);

        let mut k = p;
        while k + 1 < n && self.knots[k + 1] <= u {
            k += 1;
        }

        let mut d: Vec<Vector4<f64>> = (0..=p)
            .map(|j| {
                let i = j + k - p;
                let w = self.weight(i);
                let c = self.control_points[i];
                Vector4::new(c.x * w, c.y * w, c.z * w, w)
            })
            .collect();

        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = j + k - p;
                let denom = self.knots[j + 1 + k - r] - self.knots[i];
                let alpha = if denom.abs() < f64::EPSILON {
                    0.0
                } else {
                    (u - self.knots[i]) / denom
                };
                d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
            }
        }

        let h = d[p];
        Some(Point3::new(h.x / h.w, h.y / h.w, h.z / h.w))
    }

    /// Distinct knot values with their multiplicities
    pub fn compressed_knots(&self, eps: f64) -> (Vec<f64>, Vec<i64>) {
        let mut values: Vec<f64> = Vec::new();
        let mut multiplicities: Vec<i64> = Vec::new();
        for &k in &self.knots {
            match values.last() {
                Some(last) if (k - last).abs() <= eps => {
                    if let Some(m) = multiplicities.last_mut() {
                        *m += 1;
                    }
                }
                _ => {
                    values.push(k);
                    multiplicities.push(1);
                }
            }
        }
        (values, multiplicities)
    }

    pub fn reversed(&self) -> Self {
        let (lo, hi) = self.domain().unwrap_or_else(|| {
            let first = self.knots.first().copied().unwrap_or(0.0);
            (first, self.knots.last().copied().unwrap_or(first))
        });
        let mut control_points = self.control_points.clone();
        control_points.reverse();
        let weights = self.weights.as_ref().map(|w| w.iter().rev().copied().collect());
        let knots = self.knots.iter().rev().map(|k| lo + hi - k).collect();
        Self {
            degree: self.degree,
            control_points,
            weights,
            knots,
        }
    }
}

/// A host curve
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Line(Line),
    Arc(Arc),
    Ellipse(Ellipse),
    Spline(NurbsCurve),
    /// A curve the kernel can only sample; points in curve direction
    Generic(Vec<Point3<f64>>),
}

impl Curve {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        Curve::Line(Line::new(start, end))
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            Curve::Line(_) => CurveKind::Line,
            Curve::Arc(_) => CurveKind::Arc,
            Curve::Ellipse(_) => CurveKind::Ellipse,
            Curve::Spline(_) => CurveKind::Spline,
            Curve::Generic(_) => CurveKind::Generic,
        }
    }

    pub fn start_point(&self) -> Point3<f64> {
        match self {
            Curve::Line(l) => l.start,
            Curve::Arc(a) => a.point_at(a.start_param),
            Curve::Ellipse(e) => e.point_at(e.start_param),
            Curve::Spline(s) => s
                .domain()
                .and_then(|(lo, _)| s.point_at(lo))
                .or_else(|| s.control_points.first().copied())
                .unwrap_or_else(Point3::origin),
            Curve::Generic(pts) => pts.first().copied().unwrap_or_else(Point3::origin),
        }
    }

    pub fn end_point(&self) -> Point3<f64> {
        match self {
            Curve::Line(l) => l.end,
            Curve::Arc(a) => a.point_at(a.end_param),
            Curve::Ellipse(e) => e.point_at(e.end_param),
            Curve::Spline(s) => s
                .domain()
                .and_then(|(_, hi)| s.point_at(hi))
                .or_else(|| s.control_points.last().copied())
                .unwrap_or_else(Point3::origin),
            Curve::Generic(pts) => pts.last().copied().unwrap_or_else(Point3::origin),
        }
    }

    /// Sample the curve; first and last samples are the curve endpoints.
    /// A malformed spline yields its control polygon.
    pub fn tessellate(&self) -> Vec<Point3<f64>> {
        match self {
            Curve::Line(l) => vec![l.start, l.end],
            Curve::Arc(a) => sample_param(a.start_param, a.end_param, |t| a.point_at(t)),
            Curve::Ellipse(e) => sample_param(e.start_param, e.end_param, |t| e.point_at(t)),
            Curve::Spline(s) => {
                let Some((lo, hi)) = s.domain() else {
                    return s.control_points.clone();
                };
                let count = (s.control_points.len() * SPLINE_SAMPLES_PER_POINT).max(8);
                (0..=count)
                    .filter_map(|i| s.point_at(lo + (hi - lo) * i as f64 / count as f64))
                    .collect()
            }
            Curve::Generic(pts) => pts.clone(),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Curve::Line(l) => l.direction().norm(),
            Curve::Arc(a) => a.radius * a.sweep().abs(),
            _ => self.tessellate().windows(2).map(|w| (w[1] - w[0]).norm()).sum(),
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Curve::Line(l) => Curve::line(l.end, l.start),
            Curve::Arc(a) => Curve::Arc(a.reversed()),
            Curve::Ellipse(e) => Curve::Ellipse(e.reversed()),
            Curve::Spline(s) => Curve::Spline(s.reversed()),
            Curve::Generic(pts) => Curve::Generic(pts.iter().rev().copied().collect()),
        }
    }

    /// Apply a rigid or uniformly scaling transform
    pub fn transformed(&self, m: &Matrix4<f64>) -> Self {
        let tp = |p: &Point3<f64>| m.transform_point(p);
        match self {
            Curve::Line(l) => Curve::line(tp(&l.start), tp(&l.end)),
            Curve::Arc(a) => {
                let x = m.transform_vector(&a.x_axis);
                let y = m.transform_vector(&a.y_axis());
                Curve::Arc(Arc {
                    center: tp(&a.center),
                    x_axis: x.normalize(),
                    normal: x.cross(&y).normalize(),
                    radius: a.radius * x.norm(),
                    ..a.clone()
                })
            }
            Curve::Ellipse(e) => {
                let x = m.transform_vector(&e.x_axis);
                let y = m.transform_vector(&e.y_axis());
                Curve::Ellipse(Ellipse {
                    center: tp(&e.center),
                    x_axis: x.normalize(),
                    normal: x.cross(&y).normalize(),
                    radius_x: e.radius_x * x.norm(),
                    radius_y: e.radius_y * y.norm(),
                    ..e.clone()
                })
            }
            Curve::Spline(s) => Curve::Spline(NurbsCurve {
                control_points: s.control_points.iter().map(tp).collect(),
                ..s.clone()
            }),
            Curve::Generic(pts) => Curve::Generic(pts.iter().map(tp).collect()),
        }
    }

    pub fn translated(&self, v: &Vector3<f64>) -> Self {
        self.transformed(&Matrix4::new_translation(v))
    }

    /// Normal of the plane the curve lies in, for planar curve kinds
    pub fn plane_normal(&self) -> Option<Vector3<f64>> {
        match self {
            Curve::Arc(a) => Some(a.normal),
            Curve::Ellipse(e) => Some(e.normal),
            _ => None,
        }
    }
}

fn sample_param(start: f64, end: f64, eval: impl Fn(f64) -> Point3<f64>) -> Vec<Point3<f64>> {
    let sweep = end - start;
    let segments = ((sweep.abs() / CONIC_STEP).ceil() as usize).max(1);
    (0..=segments)
        .map(|i| eval(start + sweep * i as f64 / segments as f64))
        .collect()
}

/// Ordered sequence of curves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveLoop {
    curves: Vec<Curve>,
}

impl CurveLoop {
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves }
    }

    /// Closed polygon of line segments
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let n = points.len();
        let curves = (0..n)
            .map(|i| Curve::line(points[i], points[(i + 1) % n]))
            .collect();
        Self { curves }
    }

    pub fn push(&mut self, curve: Curve) {
        self.curves.push(curve);
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn into_curves(self) -> Vec<Curve> {
        self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Curve> {
        self.curves.iter()
    }

    /// Index of the first curve whose end does not meet the next curve's start
    pub fn first_gap(&self, tol: &Tolerance) -> Option<usize> {
        self.curves
            .windows(2)
            .position(|w| !tol.points_equal(&w[0].end_point(), &w[1].start_point()))
    }

    pub fn is_continuous(&self, tol: &Tolerance) -> bool {
        self.first_gap(tol).is_none()
    }

    pub fn is_closed(&self, tol: &Tolerance) -> bool {
        match (self.curves.first(), self.curves.last()) {
            (Some(first), Some(last)) => {
                self.is_continuous(tol) && tol.points_equal(&last.end_point(), &first.start_point())
            }
            _ => false,
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            curves: self.curves.iter().rev().map(Curve::reversed).collect(),
        }
    }

    pub fn transformed(&self, m: &Matrix4<f64>) -> Self {
        Self {
            curves: self.curves.iter().map(|c| c.transformed(m)).collect(),
        }
    }

    pub fn translated(&self, v: &Vector3<f64>) -> Self {
        self.transformed(&Matrix4::new_translation(v))
    }

    /// Sample the loop. Shared joints appear once; a closed loop does not
    /// repeat its first point at the end.
    pub fn tessellate(&self, tol: &Tolerance) -> Vec<Point3<f64>> {
        let mut points: Vec<Point3<f64>> = Vec::new();
        for curve in &self.curves {
            for p in curve.tessellate() {
                if points.last().map_or(true, |last| !tol.points_equal(last, &p)) {
                    points.push(p);
                }
            }
        }
        if points.len() > 1 && tol.points_equal(&points[0], &points[points.len() - 1]) {
            points.pop();
        }
        points
    }

    pub fn length(&self) -> f64 {
        self.curves.iter().map(Curve::length).sum()
    }

    /// Plane of the loop oriented so the loop runs counter-clockwise about
    /// its normal; `None` for degenerate or non-planar loops
    pub fn plane(&self, tol: &Tolerance) -> Option<Plane> {
        let points = self.tessellate(tol);
        if points.len() < 3 {
            return None;
        }
        let normal = newell_vector(&points).try_normalize(1e-12)?;
        let x_dir = self
            .curves
            .first()
            .map(|c| c.tessellate())
            .filter(|s| s.len() >= 2)
            .and_then(|s| (s[1] - s[0]).try_normalize(1e-12))
            .filter(|x| !tol.is_parallel(x, &normal))
            .unwrap_or_else(|| Plane::new(points[0], normal).x_axis);
        let plane = Plane::from_axes(points[0], x_dir, normal);
        points
            .iter()
            .all(|p| plane.contains(p, tol))
            .then_some(plane)
    }

    /// Enclosed area measured about `normal`, positive when counter-clockwise
    pub fn signed_area(&self, normal: &Vector3<f64>, tol: &Tolerance) -> f64 {
        0.5 * newell_vector(&self.tessellate(tol)).dot(normal)
    }
}

impl<'a> IntoIterator for &'a CurveLoop {
    type Item = &'a Curve;
    type IntoIter = std::slice::Iter<'a, Curve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rectangle(w: f64, h: f64) -> CurveLoop {
        CurveLoop::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(w, 0.0, 0.0),
            Point3::new(w, h, 0.0),
            Point3::new(0.0, h, 0.0),
        ])
    }

    #[test]
    fn arc_reversal_swaps_endpoints() {
        let arc = Arc::new(Point3::origin(), Vector3::x(), Vector3::z(), 2.0, 0.0, PI / 2.0);
        let rev = arc.reversed();
        assert_relative_eq!(rev.point_at(rev.start_param), arc.point_at(arc.end_param), epsilon = 1e-12);
        assert_relative_eq!(rev.point_at(rev.end_param), arc.point_at(arc.start_param), epsilon = 1e-12);
        assert_relative_eq!(arc.mid_point(), Point3::new(2.0_f64.sqrt(), 2.0_f64.sqrt(), 0.0), epsilon = 1e-12);
    }

    #[test]
    fn spline_evaluation_hits_clamped_endpoints() {
        let spline = NurbsCurve::clamped(
            2,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(3.0, 2.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
            ],
        );
        assert!(spline.is_valid());
        let curve = Curve::Spline(spline.clone());
        assert_relative_eq!(curve.start_point(), Point3::new(0.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(curve.end_point(), Point3::new(4.0, 0.0, 0.0), epsilon = 1e-12);
        let rev = curve.reversed();
        assert_relative_eq!(rev.start_point(), curve.end_point(), epsilon = 1e-12);
        let (values, mults) = spline.compressed_knots(1e-9);
        assert_eq!(values, vec![0.0, 0.5, 1.0]);
        assert_eq!(mults, vec![3, 1, 3]);
    }

    #[test]
    fn rational_weights_pull_towards_control_point() {
        let mut spline = NurbsCurve::clamped(
            2,
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0), Point3::new(2.0, 0.0, 0.0)],
        );
        let plain_mid = spline.point_at(0.5).unwrap();
        spline.weights = Some(vec![1.0, 4.0, 1.0]);
        assert!(spline.is_rational());
        assert!(spline.point_at(0.5).unwrap().y > plain_mid.y);
    }

    #[test]
    fn malformed_spline_does_not_evaluate() {
        let spline = NurbsCurve {
            degree: 3,
            control_points: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            weights: None,
            knots: vec![0.0, 1.0],
        };
        assert!(!spline.is_valid());
        assert_eq!(spline.domain(), None);
        assert_eq!(spline.point_at(0.5), None);
        let curve = Curve::Spline(spline);
        assert_eq!(curve.start_point(), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(curve.end_point(), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(curve.tessellate().len(), 2);
        assert_eq!(curve.reversed().start_point(), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn loop_closure_and_plane() {
        let tol = Tolerance::default();
        let lp = rectangle(2.0, 1.0);
        assert!(lp.is_closed(&tol));
        assert_eq!(lp.tessellate(&tol).len(), 4);
        let plane = lp.plane(&tol).unwrap();
        assert_relative_eq!(plane.normal, Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(lp.signed_area(&Vector3::z(), &tol), 2.0, epsilon = 1e-12);
        assert_relative_eq!(lp.length(), 6.0);

        let rev = lp.reversed();
        assert!(rev.is_closed(&tol));
        assert_relative_eq!(rev.plane(&tol).unwrap().normal, -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn gap_is_reported_at_segment() {
        let tol = Tolerance::default();
        let lp = CurveLoop::new(vec![
            Curve::line(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)),
            Curve::line(Point3::new(1.5, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0)),
        ]);
        assert_eq!(lp.first_gap(&tol), Some(0));
        assert!(!lp.is_closed(&tol));
    }

    #[test]
    fn non_planar_loop_has_no_plane() {
        let tol = Tolerance::default();
        let lp = CurveLoop::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.5),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        assert!(lp.plane(&tol).is_none());
    }

    #[test]
    fn mirrored_arc_keeps_parameter_sense() {
        let arc = Curve::Arc(Arc::new(Point3::origin(), Vector3::x(), Vector3::z(), 1.0, 0.0, PI / 2.0));
        let mirror = Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0));
        let m = arc.transformed(&mirror);
        assert_relative_eq!(m.start_point(), Point3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(m.end_point(), Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }
}

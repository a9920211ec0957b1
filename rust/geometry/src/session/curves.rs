// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve and curve loop translation
//!
//! Host curves become trimmed conics, B-splines or polylines; loops become
//! a polyline, an indexed poly-curve or a composite curve depending on their
//! content, the schema and the model view.

use super::ExportSession;
use crate::boundary::BoundaryComplexity;
use crate::curve::{Arc, Curve, CurveLoop, Ellipse, Line, NurbsCurve};
use crate::plane::Plane;
use crate::tolerance::{put_in_range, Tolerance};
use crate::{Error, Point3, Result, Vector3};
use ifc_export_core::{AttributeValue, EntityFactory, EntityHandle, IfcSchemaVersion, IfcType};
use std::f64::consts::TAU;

const PERIOD_EPSILON: f64 = 1e-9;
const KNOT_EPSILON: f64 = 1e-12;

/// Drop points closer than the vertex tolerance to their predecessor.
/// For closed input the trailing points that repeat the first are dropped
/// too, so the result never lists the closing point twice.
pub fn merge_degenerate_points(points: &[Point3<f64>], closed: bool, tol: &Tolerance) -> Vec<Point3<f64>> {
    let mut merged: Vec<Point3<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if merged.last().map_or(true, |last| !tol.points_equal(last, p)) {
            merged.push(*p);
        }
    }
    if closed {
        while merged.len() > 1 && tol.points_equal(&merged[0], &merged[merged.len() - 1]) {
            merged.pop();
        }
    }
    merged
}

/// 1-based index of `p` in `points`, reusing the last point when they coincide
fn push_index(points: &mut Vec<Point3<f64>>, p: Point3<f64>, tol: &Tolerance) -> i64 {
    if points.last().map_or(true, |last| !tol.points_equal(last, &p)) {
        points.push(p);
    }
    points.len() as i64
}

impl<F: EntityFactory> ExportSession<F> {
    /// Whether a curve must be written as a flat polyline
    pub fn use_simple_boundary(&self, normal: Option<Vector3<f64>>, projection: Option<&Vector3<f64>>) -> bool {
        if self.options.force_simple_boundary || !self.options.view.allows_complex_boundaries() {
            return true;
        }
        match (normal, projection) {
            (Some(n), Some(dir)) => !self.options.tolerance.is_parallel(&n, dir),
            _ => false,
        }
    }

    /// Translate one host curve. With `lcs` the result is 2D in that frame.
    pub fn translate_curve(
        &mut self,
        curve: &Curve,
        lcs: Option<&Plane>,
        projection: Option<&Vector3<f64>>,
    ) -> Result<EntityHandle> {
        if let Curve::Spline(spline) = curve {
            if !spline.is_valid() {
                return Err(Error::unsupported("malformed B-spline knot vector"));
            }
        }
        if self.use_simple_boundary(curve.plane_normal(), projection) {
            let points = curve.tessellate();
            return self.create_polyline(&points, false, lcs);
        }
        match curve {
            Curve::Line(line) => self.create_trimmed_line(line, lcs),
            Curve::Arc(arc) => self.create_trimmed_arc(arc, lcs),
            Curve::Ellipse(ellipse) => self.create_trimmed_ellipse(ellipse, lcs),
            Curve::Spline(spline) => {
                if self.options.view.allows_advanced_curves(self.schema()) {
                    self.create_bspline(spline, lcs)
                } else {
                    self.create_polyline(&curve.tessellate(), false, lcs)
                }
            }
            Curve::Generic(points) => self.create_polyline(points, false, lcs),
        }
    }

    /// Translate a closed or open curve loop
    pub fn translate_curve_loop(
        &mut self,
        lp: &CurveLoop,
        lcs: Option<&Plane>,
        projection: Option<&Vector3<f64>>,
    ) -> Result<EntityHandle> {
        if lp.is_empty() {
            return Err(Error::InvariantViolation("empty curve loop".into()));
        }
        let tol = self.options.tolerance;
        let closed = lp.is_closed(&tol);
        let normal = lp.plane(&tol).map(|p| p.normal);
        let complexity = BoundaryComplexity::of_loop(lp);

        if complexity == BoundaryComplexity::Polygonal || self.use_simple_boundary(normal, projection) {
            let points = lp.tessellate(&tol);
            return self.create_polyline(&points, closed, lcs);
        }

        // A lone full conic is written closed and untrimmed
        if let [single] = lp.curves() {
            match single {
                Curve::Arc(arc) if arc.is_full(&tol) => return self.create_circle(arc, lcs),
                Curve::Ellipse(ellipse) if ellipse.is_full(&tol) => return self.create_ellipse(ellipse, lcs),
                _ => {}
            }
        }

        if complexity == BoundaryComplexity::LinesAndArcs && self.schema() >= IfcSchemaVersion::Ifc4 {
            return self.create_indexed_poly_curve(lp, closed, lcs);
        }

        let mut segments = Vec::with_capacity(lp.len());
        for curve in lp.iter() {
            let parent = self.translate_curve(curve, lcs, None)?;
            segments.push(self.create(
                IfcType::IfcCompositeCurveSegment,
                vec![
                    AttributeValue::enumeration("CONTINUOUS"),
                    AttributeValue::Boolean(true),
                    parent.into(),
                ],
            )?);
        }
        self.create(
            IfcType::IfcCompositeCurve,
            vec![AttributeValue::refs(&segments), AttributeValue::Boolean(false)],
        )
    }

    /// IfcPolyline through `points`. A closed polyline ends on the handle
    /// of its first point.
    pub fn create_polyline(&mut self, points: &[Point3<f64>], closed: bool, lcs: Option<&Plane>) -> Result<EntityHandle> {
        let tol = self.options.tolerance;
        let merged = merge_degenerate_points(points, closed, &tol);
        let min = if closed { 3 } else { 2 };
        if merged.len() < min {
            return Err(Error::InvariantViolation(format!(
                "polyline needs {} distinct points, got {}",
                min,
                merged.len()
            )));
        }
        let mut handles = Vec::with_capacity(merged.len() + 1);
        for p in &merged {
            handles.push(self.point_in_frame(p, lcs)?);
        }
        if closed {
            handles.push(handles[0]);
        }
        self.create(IfcType::IfcPolyline, vec![AttributeValue::refs(&handles)])
    }

    fn point_in_frame(&mut self, p: &Point3<f64>, lcs: Option<&Plane>) -> Result<EntityHandle> {
        match lcs {
            Some(frame) => self.create_point_2d(&frame.to_local(p)),
            None => self.create_point(p),
        }
    }

    fn create_trimmed_line(&mut self, line: &Line, lcs: Option<&Plane>) -> Result<EntityHandle> {
        let direction = line.direction();
        let length = direction.norm();
        if length <= self.options.tolerance.vertex {
            return Err(Error::InvariantViolation("zero-length line".into()));
        }
        let start = self.point_in_frame(&line.start, lcs)?;
        let end = self.point_in_frame(&line.end, lcs)?;
        let orientation = match lcs {
            Some(frame) => self.create_direction_2d(&frame.vector_to_local(&direction))?,
            None => self.create_direction(&direction)?,
        };
        let vector = self.create(
            IfcType::IfcVector,
            vec![orientation.into(), AttributeValue::Float(self.scale_length(length))],
        )?;
        let basis = self.create(IfcType::IfcLine, vec![start.into(), vector.into()])?;
        self.create(
            IfcType::IfcTrimmedCurve,
            vec![
                basis.into(),
                AttributeValue::List(vec![start.into()]),
                AttributeValue::List(vec![end.into()]),
                AttributeValue::Boolean(true),
                AttributeValue::enumeration("CARTESIAN"),
            ],
        )
    }

    fn check_period(period: f64) -> Result<()> {
        if (period - TAU).abs() > PERIOD_EPSILON {
            return Err(Error::InvariantViolation(format!(
                "conic parameter period {} is not 2π",
                period
            )));
        }
        Ok(())
    }

    /// Trim parameters normalized into `[0, 2π)`
    fn conic_trims(&self, start: f64, end: f64, period: f64) -> Result<(f64, f64)> {
        Self::check_period(period)?;
        let angle_tol = self.options.tolerance.angle;
        let normalize = |t: f64| {
            let v = put_in_range(t, 0.0, TAU);
            if TAU - v < angle_tol {
                0.0
            } else {
                v
            }
        };
        Ok((normalize(start), normalize(end)))
    }

    /// Placement of a conic and whether its sense agrees with the host curve.
    /// In a 2D frame a conic turning clockwise is written reversed.
    fn conic_placement(
        &mut self,
        center: &Point3<f64>,
        x_axis: &Vector3<f64>,
        normal: &Vector3<f64>,
        lcs: Option<&Plane>,
    ) -> Result<(EntityHandle, bool)> {
        match lcs {
            Some(frame) => {
                let sense = normal.dot(&frame.normal) >= 0.0;
                let x = frame.vector_to_local(x_axis);
                let placement = self.create_axis_placement_2d(&frame.to_local(center), &x)?;
                Ok((placement, sense))
            }
            None => {
                let placement = self.create_axis_placement(&Plane::from_axes(*center, *x_axis, *normal))?;
                Ok((placement, true))
            }
        }
    }

    fn create_trimmed_conic(
        &mut self,
        basis: EntityHandle,
        sense: bool,
        start: f64,
        end: f64,
        period: f64,
    ) -> Result<EntityHandle> {
        // A clockwise conic runs through the negated parameters of its mirror
        let (start, end) = if sense { (start, end) } else { (-start, -end) };
        let (trim1, trim2) = self.conic_trims(start, end, period)?;
        let parameter = |t: f64| AttributeValue::List(vec![AttributeValue::typed("IFCPARAMETERVALUE", AttributeValue::Float(t))]);
        self.create(
            IfcType::IfcTrimmedCurve,
            vec![
                basis.into(),
                parameter(self.scale_angle(trim1)),
                parameter(self.scale_angle(trim2)),
                AttributeValue::Boolean(sense),
                AttributeValue::enumeration("PARAMETER"),
            ],
        )
    }

    fn create_circle_basis(&mut self, arc: &Arc, lcs: Option<&Plane>) -> Result<(EntityHandle, bool)> {
        Self::check_period(arc.period)?;
        let (placement, sense) = self.conic_placement(&arc.center, &arc.x_axis, &arc.normal, lcs)?;
        let circle = self.create(
            IfcType::IfcCircle,
            vec![placement.into(), AttributeValue::Float(self.scale_length(arc.radius))],
        )?;
        Ok((circle, sense))
    }

    fn create_ellipse_basis(&mut self, ellipse: &Ellipse, lcs: Option<&Plane>) -> Result<(EntityHandle, bool)> {
        Self::check_period(ellipse.period)?;
        let (placement, sense) = self.conic_placement(&ellipse.center, &ellipse.x_axis, &ellipse.normal, lcs)?;
        let basis = self.create(
            IfcType::IfcEllipse,
            vec![
                placement.into(),
                AttributeValue::Float(self.scale_length(ellipse.radius_x)),
                AttributeValue::Float(self.scale_length(ellipse.radius_y)),
            ],
        )?;
        Ok((basis, sense))
    }

    fn create_circle(&mut self, arc: &Arc, lcs: Option<&Plane>) -> Result<EntityHandle> {
        Ok(self.create_circle_basis(arc, lcs)?.0)
    }

    fn create_ellipse(&mut self, ellipse: &Ellipse, lcs: Option<&Plane>) -> Result<EntityHandle> {
        Ok(self.create_ellipse_basis(ellipse, lcs)?.0)
    }

    fn create_trimmed_arc(&mut self, arc: &Arc, lcs: Option<&Plane>) -> Result<EntityHandle> {
        let (circle, sense) = self.create_circle_basis(arc, lcs)?;
        self.create_trimmed_conic(circle, sense, arc.start_param, arc.end_param, arc.period)
    }

    fn create_trimmed_ellipse(&mut self, ellipse: &Ellipse, lcs: Option<&Plane>) -> Result<EntityHandle> {
        let (basis, sense) = self.create_ellipse_basis(ellipse, lcs)?;
        self.create_trimmed_conic(basis, sense, ellipse.start_param, ellipse.end_param, ellipse.period)
    }

    fn create_bspline(&mut self, spline: &NurbsCurve, lcs: Option<&Plane>) -> Result<EntityHandle> {
        let mut control_points = Vec::with_capacity(spline.control_points.len());
        for p in &spline.control_points {
            control_points.push(self.point_in_frame(p, lcs)?);
        }
        let (knots, multiplicities) = spline.compressed_knots(KNOT_EPSILON);
        let mut attributes = vec![
            AttributeValue::Integer(spline.degree as i64),
            AttributeValue::refs(&control_points),
            AttributeValue::enumeration("UNSPECIFIED"),
            AttributeValue::enumeration("U"),
            AttributeValue::enumeration("U"),
            AttributeValue::integers(&multiplicities),
            AttributeValue::floats(&knots),
            AttributeValue::enumeration("UNSPECIFIED"),
        ];
        match &spline.weights {
            Some(weights) if spline.is_rational() => {
                attributes.push(AttributeValue::floats(weights));
                self.create(IfcType::IfcRationalBSplineCurveWithKnots, attributes)
            }
            _ => self.create(IfcType::IfcBSplineCurveWithKnots, attributes),
        }
    }

    fn create_indexed_poly_curve(&mut self, lp: &CurveLoop, closed: bool, lcs: Option<&Plane>) -> Result<EntityHandle> {
        let tol = self.options.tolerance;
        let mut points: Vec<Point3<f64>> = Vec::new();
        let mut segments: Vec<AttributeValue> = Vec::with_capacity(lp.len());

        let count = lp.len();
        for (i, curve) in lp.iter().enumerate() {
            let start = push_index(&mut points, curve.start_point(), &tol);
            let closing = closed && i + 1 == count;
            match curve {
                Curve::Arc(arc) => {
                    let mid = push_index(&mut points, arc.mid_point(), &tol);
                    let end = if closing { 1 } else { push_index(&mut points, curve.end_point(), &tol) };
                    segments.push(AttributeValue::typed("IFCARCINDEX", AttributeValue::integers(&[start, mid, end])));
                }
                Curve::Line(_) => {
                    let end = if closing { 1 } else { push_index(&mut points, curve.end_point(), &tol) };
                    segments.push(AttributeValue::typed("IFCLINEINDEX", AttributeValue::integers(&[start, end])));
                }
                other => {
                    return Err(Error::InvariantViolation(format!(
                        "{:?} segment in an indexed poly-curve",
                        other.kind()
                    )))
                }
            }
        }

        let coordinates: Vec<AttributeValue> = points
            .iter()
            .map(|p| match lcs {
                Some(frame) => {
                    let q = frame.to_local(p);
                    AttributeValue::floats(&[self.scale_length(q.x), self.scale_length(q.y)])
                }
                None => AttributeValue::floats(&[
                    self.scale_length(p.x),
                    self.scale_length(p.y),
                    self.scale_length(p.z),
                ]),
            })
            .collect();
        let list_type = if lcs.is_some() {
            IfcType::IfcCartesianPointList2D
        } else {
            IfcType::IfcCartesianPointList3D
        };
        let mut list_attributes = vec![AttributeValue::List(coordinates)];
        if self.schema() >= IfcSchemaVersion::Ifc4x3 {
            list_attributes.push(AttributeValue::Null);
        }
        let point_list = self.create(list_type, list_attributes)?;
        self.create(
            IfcType::IfcIndexedPolyCurve,
            vec![
                point_list.into(),
                AttributeValue::List(segments),
                AttributeValue::Boolean(false),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::GeometryOptions;
    use super::*;
    use approx::assert_relative_eq;
    use ifc_export_core::{AngleUnit, Entity, EntityStore, LengthUnit, ModelView};

    fn session_with(schema: IfcSchemaVersion, view: ModelView) -> ExportSession {
        let options = GeometryOptions {
            view,
            length_unit: LengthUnit::Metre,
            angle_unit: AngleUnit::Radian,
            ..GeometryOptions::default()
        };
        ExportSession::new(EntityStore::new(schema), options)
    }

    fn session() -> ExportSession {
        session_with(IfcSchemaVersion::Ifc4, ModelView::DesignTransferView)
    }

    fn entity(s: &ExportSession, h: EntityHandle) -> &Entity {
        s.factory().entity(h).unwrap()
    }

    fn trim_parameter(e: &Entity, index: usize) -> f64 {
        match &e.get_list(index).unwrap()[0] {
            AttributeValue::Typed(name, inner) => {
                assert_eq!(name, "IFCPARAMETERVALUE");
                inner.as_float().unwrap()
            }
            other => panic!("unexpected trim {:?}", other),
        }
    }

    #[test]
    fn merge_is_idempotent_and_drops_closure() {
        let tol = Tolerance::default();
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1e-9, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let once = merge_degenerate_points(&pts, true, &tol);
        assert_eq!(once.len(), 3);
        assert_eq!(merge_degenerate_points(&once, true, &tol), once);
        assert_eq!(merge_degenerate_points(&pts, false, &tol).len(), 4);
    }

    #[test]
    fn closed_polyline_reuses_first_point() {
        let mut s = session();
        let square = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let h = s.create_polyline(&square, true, None).unwrap();
        let refs = entity(&s, h).get_refs(0);
        assert_eq!(refs.len(), 5);
        assert_eq!(refs[0], refs[4]);
        assert!(s.create_polyline(&square[..2], true, None).is_err());
    }

    #[test]
    fn line_becomes_trimmed_line() {
        let mut s = session();
        let h = s
            .translate_curve(&Curve::line(Point3::origin(), Point3::new(3.0, 0.0, 0.0)), None, None)
            .unwrap();
        let trimmed = entity(&s, h);
        assert_eq!(trimmed.ifc_type, IfcType::IfcTrimmedCurve);
        assert_eq!(trimmed.get(4).and_then(|v| v.as_enum()), Some("CARTESIAN"));
        let basis = entity(&s, trimmed.get_ref(0).unwrap());
        assert_eq!(basis.ifc_type, IfcType::IfcLine);
        let vector = entity(&s, basis.get_ref(1).unwrap());
        assert_relative_eq!(vector.get_float(1).unwrap(), 3.0);
    }

    #[test]
    fn full_circle_trims_stay_in_range() {
        let mut s = session();
        let circle = Curve::Arc(Arc::circle(Point3::origin(), Vector3::z(), 2.0));
        let h = s.translate_curve(&circle, None, None).unwrap();
        let e = entity(&s, h);
        for index in [1, 2] {
            let t = trim_parameter(e, index);
            assert!((0.0..TAU).contains(&t), "trim {} out of range", t);
        }
        assert_eq!(entity(&s, e.get_ref(0).unwrap()).ifc_type, IfcType::IfcCircle);
    }

    #[test]
    fn lone_full_circle_loop_is_an_untrimmed_circle() {
        let mut s = session();
        let lp = CurveLoop::new(vec![Curve::Arc(Arc::circle(Point3::origin(), Vector3::z(), 2.0))]);
        let h = s.translate_curve_loop(&lp, Some(&Plane::xy()), None).unwrap();
        assert_eq!(entity(&s, h).ifc_type, IfcType::IfcCircle);
        assert!(s.factory().handles_of_type(IfcType::IfcTrimmedCurve).is_empty());

        let mut old = session_with(IfcSchemaVersion::Ifc2x3, ModelView::CoordinationView);
        let h = old.translate_curve_loop(&lp, Some(&Plane::xy()), None).unwrap();
        assert_eq!(entity(&old, h).ifc_type, IfcType::IfcCircle);
    }

    #[test]
    fn negative_trims_are_normalized() {
        let mut s = session();
        let arc = Arc::new(Point3::origin(), Vector3::x(), Vector3::z(), 1.0, -std::f64::consts::FRAC_PI_2, 0.5);
        let h = s.translate_curve(&Curve::Arc(arc), None, None).unwrap();
        let e = entity(&s, h);
        assert_relative_eq!(trim_parameter(e, 1), 1.5 * std::f64::consts::PI, epsilon = 1e-12);
        assert_relative_eq!(trim_parameter(e, 2), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn non_standard_period_is_an_error() {
        let mut s = session();
        let mut arc = Arc::circle(Point3::origin(), Vector3::z(), 1.0);
        arc.period = 360.0;
        assert!(matches!(
            s.translate_curve(&Curve::Arc(arc), None, None),
            Err(Error::InvariantViolation(_))
        ));
    }

    #[test]
    fn clockwise_arc_in_plane_frame_disagrees_in_sense() {
        let mut s = session();
        let arc = Arc::new(Point3::origin(), Vector3::x(), -Vector3::z(), 1.0, 0.0, 1.0);
        let h = s.translate_curve(&Curve::Arc(arc), Some(&Plane::xy()), None).unwrap();
        let e = entity(&s, h);
        assert_eq!(e.get(3).and_then(|v| v.as_bool()), Some(false));
        assert_relative_eq!(trim_parameter(e, 1), 0.0, epsilon = 1e-12);
        assert_relative_eq!(trim_parameter(e, 2), TAU - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn spline_follows_view() {
        let spline = Curve::Spline(NurbsCurve::clamped(
            3,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(2.0, -1.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(4.0, 1.0, 0.0),
            ],
        ));
        let mut design = session();
        let h = design.translate_curve(&spline, None, None).unwrap();
        let e = entity(&design, h);
        assert_eq!(e.ifc_type, IfcType::IfcBSplineCurveWithKnots);
        let multiplicities: Vec<i64> = e.get_list(5).unwrap().iter().filter_map(|v| v.as_int()).collect();
        assert_eq!(multiplicities, vec![4, 1, 4]);

        let mut coordination = session_with(IfcSchemaVersion::Ifc4, ModelView::CoordinationView);
        let h = coordination.translate_curve(&spline, None, None).unwrap();
        assert_eq!(entity(&coordination, h).ifc_type, IfcType::IfcPolyline);
    }

    #[test]
    fn malformed_spline_is_unsupported() {
        let spline = Curve::Spline(NurbsCurve {
            degree: 3,
            control_points: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            weights: None,
            knots: vec![0.0, 1.0],
        });
        for view in [ModelView::DesignTransferView, ModelView::ReferenceView] {
            let mut s = session_with(IfcSchemaVersion::Ifc4, view);
            let err = s.translate_curve(&spline, None, None).unwrap_err();
            assert!(err.is_soft());
            assert_eq!(s.factory().len(), 0);
        }
    }

    fn slot() -> CurveLoop {
        CurveLoop::new(vec![
            Curve::line(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0)),
            Curve::Arc(Arc::new(Point3::new(4.0, 1.0, 0.0), -Vector3::y(), Vector3::z(), 1.0, 0.0, std::f64::consts::PI)),
            Curve::line(Point3::new(4.0, 2.0, 0.0), Point3::new(0.0, 2.0, 0.0)),
            Curve::line(Point3::new(0.0, 2.0, 0.0), Point3::new(0.0, 0.0, 0.0)),
        ])
    }

    #[test]
    fn lines_and_arcs_use_indexed_poly_curve() {
        let mut s = session();
        let h = s.translate_curve_loop(&slot(), None, None).unwrap();
        let e = entity(&s, h);
        assert_eq!(e.ifc_type, IfcType::IfcIndexedPolyCurve);
        let segments = e.get_list(1).unwrap();
        assert_eq!(segments.len(), 4);
        match &segments[1] {
            AttributeValue::Typed(name, inner) => {
                assert_eq!(name, "IFCARCINDEX");
                assert_eq!(inner.as_list().unwrap().len(), 3);
            }
            other => panic!("unexpected segment {:?}", other),
        }
        match &segments[3] {
            AttributeValue::Typed(_, inner) => {
                assert_eq!(inner.as_list().unwrap()[1].as_int(), Some(1));
            }
            other => panic!("unexpected segment {:?}", other),
        }
        let points = entity(&s, e.get_ref(0).unwrap());
        assert_eq!(points.get_list(0).unwrap().len(), 5);
    }

    #[test]
    fn older_schema_uses_composite_curve() {
        let mut s = session_with(IfcSchemaVersion::Ifc2x3, ModelView::CoordinationView);
        let h = s.translate_curve_loop(&slot(), None, None).unwrap();
        let e = entity(&s, h);
        assert_eq!(e.ifc_type, IfcType::IfcCompositeCurve);
        assert_eq!(e.get_refs(0).len(), 4);
    }

    #[test]
    fn simple_boundary_flattens_everything() {
        let mut s = session_with(IfcSchemaVersion::Ifc4, ModelView::ReferenceView);
        let h = s.translate_curve_loop(&slot(), None, None).unwrap();
        let e = entity(&s, h);
        assert_eq!(e.ifc_type, IfcType::IfcPolyline);
        let refs = e.get_refs(0);
        assert_eq!(refs.first(), refs.last());

        // A loop seen edge-on along the projection is flattened as well
        let mut s = session();
        assert!(s.use_simple_boundary(Some(Vector3::z()), Some(&Vector3::x())));
        assert!(!s.use_simple_boundary(Some(Vector3::z()), Some(&-Vector3::z())));
        let h = s.translate_curve_loop(&slot(), None, Some(&Vector3::x())).unwrap();
        assert_eq!(entity(&s, h).ifc_type, IfcType::IfcPolyline);
    }
}

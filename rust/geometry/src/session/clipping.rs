// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean clipping and opening results

use super::ExportSession;
use crate::clipping::{plan_clipping, ClipBody, ClipFace, ClipStep};
use crate::opening::analyze_opening;
use crate::source::GeometrySource;
use crate::{Error, Point3, Result};
use ifc_export_core::{AttributeValue, EntityFactory, EntityHandle, IfcType};
use tracing::debug;

impl<F: EntityFactory> ExportSession<F> {
    /// Subtract the half-spaces of `faces` from the extruded `body_solid`.
    ///
    /// Returns the final IfcBooleanClippingResult (or `body_solid` itself
    /// when no face removes anything), and `None` when the clipping removes
    /// the whole body. Failures leave nothing behind in the file.
    pub fn create_clipping_from_planar_faces(
        &mut self,
        body_solid: EntityHandle,
        body: &ClipBody,
        faces: &[ClipFace],
    ) -> Result<Option<EntityHandle>> {
        if !self.options.view.allows_boolean_results() {
            return Err(Error::unsupported("model view does not allow boolean results"));
        }
        let tol = self.options.tolerance;
        let Some(plan) = plan_clipping(body, faces, &tol)? else {
            return Ok(None);
        };

        let mark = self.begin_transaction();
        let mut current = body_solid;
        for step in &plan.steps {
            let result = self
                .create_half_space(step, body)
                .and_then(|half_space| self.create_boolean(IfcType::IfcBooleanClippingResult, current, half_space));
            match result {
                Ok(handle) => current = handle,
                Err(e) => {
                    self.rollback(&mark);
                    return Err(e);
                }
            }
        }
        debug!(steps = plan.steps.len(), location = ?plan.location, "clipped extrusion");
        Ok(Some(current))
    }

    /// Subtract the cavity bounded by `faces` from `body_solid`
    pub fn create_opening_from_faces<S: GeometrySource>(
        &mut self,
        body_solid: EntityHandle,
        source: &S,
        faces: &[S::Face],
    ) -> Result<EntityHandle> {
        if !self.options.view.allows_boolean_results() {
            return Err(Error::unsupported("model view does not allow boolean results"));
        }
        let tol = self.options.tolerance;
        let opening = analyze_opening(source, faces, &tol)?;

        let mark = self.begin_transaction();
        let result = self
            .create_profile_def(&opening.outer, &[], &opening.plane, None)
            .and_then(|profile| self.create_extruded_area_solid(profile, &opening.plane, opening.depth))
            .and_then(|cavity| self.create_boolean(IfcType::IfcBooleanResult, body_solid, cavity));
        if result.is_err() {
            self.rollback(&mark);
        }
        result
    }

    fn create_boolean(&mut self, ifc_type: IfcType, first: EntityHandle, second: EntityHandle) -> Result<EntityHandle> {
        self.create(
            ifc_type,
            vec![AttributeValue::enumeration("DIFFERENCE"), first.into(), second.into()],
        )
    }

    /// Half-space on the removed side of the step plane, bounded by the
    /// face outline when the face does not span the body
    fn create_half_space(&mut self, step: &ClipStep, body: &ClipBody) -> Result<EntityHandle> {
        let placement = self.create_axis_placement(&step.plane)?;
        let surface = self.create(IfcType::IfcPlane, vec![placement.into()])?;
        let Some(outline) = &step.boundary else {
            return self.create(
                IfcType::IfcHalfSpaceSolid,
                vec![surface.into(), AttributeValue::Boolean(false)],
            );
        };
        let position = self.create_axis_placement(&body.frame)?;
        let world: Vec<Point3<f64>> = outline.iter().map(|p| body.frame.to_world(p)).collect();
        let boundary = self.create_polyline(&world, true, Some(&body.frame))?;
        self.create(
            IfcType::IfcPolygonalBoundedHalfSpace,
            vec![
                surface.into(),
                AttributeValue::Boolean(false),
                position.into(),
                boundary.into(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::GeometryOptions;
    use super::*;
    use crate::brep::BrepSolid;
    use crate::curve::CurveLoop;
    use crate::plane::Plane;
    use crate::source::FaceSurface;
    use crate::tolerance::Tolerance;
    use crate::{Point2, Vector3};
    use ifc_export_core::{AngleUnit, EntityStore, IfcSchemaVersion, LengthUnit, ModelView};

    fn session(view: ModelView) -> ExportSession {
        let options = GeometryOptions {
            view,
            length_unit: LengthUnit::Metre,
            angle_unit: AngleUnit::Radian,
            ..GeometryOptions::default()
        };
        ExportSession::new(EntityStore::new(IfcSchemaVersion::Ifc4), options)
    }

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

    fn flat_face(z: f64, normal_z: f64, x: (f64, f64)) -> ClipFace {
        ClipFace::new(
            Plane::new(Point3::new(0.0, 0.0, z), Vector3::new(0.0, 0.0, normal_z)),
            vec![
                Point3::new(x.0, -1.0, z),
                Point3::new(x.1, -1.0, z),
                Point3::new(x.1, 2.0, z),
                Point3::new(x.0, 2.0, z),
            ],
        )
    }

    fn placeholder_body(s: &mut ExportSession) -> EntityHandle {
        s.create_point(&Point3::origin()).unwrap()
    }

    #[test]
    fn full_face_becomes_half_space() {
        let mut s = session(ModelView::CoordinationView);
        let solid = placeholder_body(&mut s);
        let clipped = s
            .create_clipping_from_planar_faces(solid, &body(), &[flat_face(2.5, 1.0, (-1.0, 3.0))])
            .unwrap()
            .unwrap();
        let result = s.factory().entity(clipped).unwrap();
        assert_eq!(result.ifc_type, IfcType::IfcBooleanClippingResult);
        assert_eq!(result.get(0).and_then(|v| v.as_enum()), Some("DIFFERENCE"));
        assert_eq!(result.get_ref(1), Some(solid));
        let half_space = s.factory().entity(result.get_ref(2).unwrap()).unwrap();
        assert_eq!(half_space.ifc_type, IfcType::IfcHalfSpaceSolid);
        assert_eq!(half_space.get(1).and_then(|v| v.as_bool()), Some(false));
    }

    #[test]
    fn partial_face_is_polygon_bounded() {
        let mut s = session(ModelView::DesignTransferView);
        let solid = placeholder_body(&mut s);
        let clipped = s
            .create_clipping_from_planar_faces(solid, &body(), &[flat_face(2.5, 1.0, (-1.0, 1.0))])
            .unwrap()
            .unwrap();
        let result = s.factory().entity(clipped).unwrap();
        let half_space = s.factory().entity(result.get_ref(2).unwrap()).unwrap();
        assert_eq!(half_space.ifc_type, IfcType::IfcPolygonalBoundedHalfSpace);
        let boundary = s.factory().entity(half_space.get_ref(3).unwrap()).unwrap();
        let points = boundary.get_refs(0);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], points[4]);
    }

    #[test]
    fn clipping_chains_in_order() {
        let mut s = session(ModelView::CoordinationView);
        let solid = placeholder_body(&mut s);
        let faces = [flat_face(0.5, -1.0, (-1.0, 3.0)), flat_face(2.5, 1.0, (-1.0, 3.0))];
        let clipped = s
            .create_clipping_from_planar_faces(solid, &body(), &faces)
            .unwrap()
            .unwrap();
        let outer = s.factory().entity(clipped).unwrap();
        let inner = s.factory().entity(outer.get_ref(1).unwrap()).unwrap();
        assert_eq!(inner.ifc_type, IfcType::IfcBooleanClippingResult);
        assert_eq!(inner.get_ref(1), Some(solid));
    }

    #[test]
    fn reference_view_and_total_removal() {
        let mut reference = session(ModelView::ReferenceView);
        let solid = placeholder_body(&mut reference);
        assert!(matches!(
            reference.create_clipping_from_planar_faces(solid, &body(), &[flat_face(2.5, 1.0, (-1.0, 3.0))]),
            Err(Error::Unsupported(_))
        ));

        let mut s = session(ModelView::CoordinationView);
        let solid = placeholder_body(&mut s);
        let count = s.factory().len();
        assert!(s
            .create_clipping_from_planar_faces(solid, &body(), &[flat_face(3.5, -1.0, (-1.0, 3.0))])
            .unwrap()
            .is_none());
        assert_eq!(s.factory().len(), count);
    }

    #[test]
    fn opening_becomes_boolean_result() {
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
        let reveals: Vec<_> = wall
            .faces()
            .into_iter()
            .filter(|f| match wall.face_surface(*f).unwrap() {
                FaceSurface::Plane(p) => {
                    p.normal.z.abs() < 0.5 && (1.0..=3.0).contains(&p.origin.x) && (1.0..=3.0).contains(&p.origin.y)
                }
                _ => false,
            })
            .collect();

        let mut s = session(ModelView::CoordinationView);
        let solid = placeholder_body(&mut s);
        let result = s.create_opening_from_faces(solid, &wall, &reveals).unwrap();
        let e = s.factory().entity(result).unwrap();
        assert_eq!(e.ifc_type, IfcType::IfcBooleanResult);
        let cavity = s.factory().entity(e.get_ref(2).unwrap()).unwrap();
        assert_eq!(cavity.ifc_type, IfcType::IfcExtrudedAreaSolid);
        assert!((cavity.get_float(3).unwrap() - 2.0).abs() < 1e-9);

        // A lone reveal face cannot bound an opening
        let count = s.factory().len();
        assert!(s.create_opening_from_faces(solid, &wall, &reveals[..1]).is_err());
        assert_eq!(s.factory().len(), count);
    }
}

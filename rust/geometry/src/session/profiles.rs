// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile definitions and extruded area solids

use super::ExportSession;
use crate::curve::CurveLoop;
use crate::extrusion::{analyze_extrusion, ExtrusionAnalysis};
use crate::plane::Plane;
use crate::source::GeometrySource;
use crate::{Point3, Result, Vector3};
use ifc_export_core::{AttributeValue, EntityFactory, EntityHandle, IfcType};
use tracing::debug;

/// Profile entity recovered from a solid, with the analysis behind it
#[derive(Debug, Clone)]
pub struct ExtrusionProfile<Fc> {
    pub profile: EntityHandle,
    pub analysis: ExtrusionAnalysis<Fc>,
}

/// An IfcExtrudedAreaSolid written for a host solid
#[derive(Debug, Clone)]
pub struct ExtrudedSolid<Fc> {
    pub solid: EntityHandle,
    pub profile: ExtrusionProfile<Fc>,
}

impl<Fc> ExtrudedSolid<Fc> {
    pub fn depth(&self) -> f64 {
        self.profile.analysis.depth
    }

    /// The two end faces, start first
    pub fn end_faces(&self) -> [&Fc; 2] {
        [&self.profile.analysis.start_face, &self.profile.analysis.end_face]
    }
}

impl<F: EntityFactory> ExportSession<F> {
    /// IfcArbitraryClosedProfileDef, or the variant with voids when there
    /// are inner loops. Curves are written in the 2D frame of `lcs`.
    pub fn create_profile_def(
        &mut self,
        outer: &CurveLoop,
        inner: &[CurveLoop],
        lcs: &Plane,
        name: Option<&str>,
    ) -> Result<EntityHandle> {
        let projection = lcs.normal;
        let outer_curve = self.translate_curve_loop(outer, Some(lcs), Some(&projection))?;
        if inner.is_empty() {
            return self.create(
                IfcType::IfcArbitraryClosedProfileDef,
                vec![
                    AttributeValue::enumeration("AREA"),
                    AttributeValue::opt_string(name),
                    outer_curve.into(),
                ],
            );
        }
        let mut inner_curves = Vec::with_capacity(inner.len());
        for lp in inner {
            inner_curves.push(self.translate_curve_loop(lp, Some(lcs), Some(&projection))?);
        }
        self.create(
            IfcType::IfcArbitraryProfileDefWithVoids,
            vec![
                AttributeValue::enumeration("AREA"),
                AttributeValue::opt_string(name),
                outer_curve.into(),
                AttributeValue::refs(&inner_curves),
            ],
        )
    }

    /// Recover the profile of `source` extruded along the normal of
    /// `base_plane`, with the profile frame centred on the projection of
    /// `origin`.
    ///
    /// Solids that are not straight extrusions, and profiles the model view
    /// cannot express, give `Ok(None)` with nothing left in the file. Only
    /// fatal errors propagate.
    pub fn get_extrusion_base_profile<S: GeometrySource>(
        &mut self,
        source: &S,
        base_plane: &Plane,
        origin: &Point3<f64>,
    ) -> Result<Option<ExtrusionProfile<S::Face>>> {
        let frame = Plane::from_axes(base_plane.project_point(origin), base_plane.x_axis, base_plane.normal);
        let mark = self.begin_transaction();
        let allow_complex = self.options.view.allows_complex_boundaries();
        let tol = self.options.tolerance;

        let result = analyze_extrusion(source, &frame, allow_complex, &tol).and_then(|analysis| {
            let profile = self.create_profile_def(&analysis.outer, &analysis.inner, &frame, None)?;
            Ok(ExtrusionProfile { profile, analysis })
        });

        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!(error = %e, "no extrusion profile");
                self.rollback(&mark);
                Ok(None)
            }
        }
    }

    /// Write `source` as an IfcExtrudedAreaSolid when it is a straight
    /// extrusion along the normal of `base_plane`
    pub fn create_extrusion_from_solid<S: GeometrySource>(
        &mut self,
        source: &S,
        base_plane: &Plane,
        origin: &Point3<f64>,
    ) -> Result<Option<ExtrudedSolid<S::Face>>> {
        let mark = self.begin_transaction();
        let Some(profile) = self.get_extrusion_base_profile(source, base_plane, origin)? else {
            return Ok(None);
        };
        let position = profile.analysis.position();
        let depth = profile.analysis.depth;

        let solid = self.create_extruded_area_solid(profile.profile, &position, depth);
        match solid {
            Ok(solid) => Ok(Some(ExtrudedSolid { solid, profile })),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                debug!(error = %e, "extruded solid rejected");
                self.rollback(&mark);
                Ok(None)
            }
        }
    }

    /// IfcExtrudedAreaSolid of `profile` placed at `position`, extruded
    /// along the position's normal
    pub fn create_extruded_area_solid(
        &mut self,
        profile: EntityHandle,
        position: &Plane,
        depth: f64,
    ) -> Result<EntityHandle> {
        let placement = self.create_axis_placement(position)?;
        let direction = self.create_direction(&Vector3::z())?;
        self.create(
            IfcType::IfcExtrudedAreaSolid,
            vec![
                profile.into(),
                placement.into(),
                direction.into(),
                AttributeValue::Float(self.scale_length(depth)),
            ],
        )
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export options loaded from environment variables or JSON.

use crate::error::{ProcessingError, Result};
use ifc_export_core::{AngleUnit, IfcSchemaVersion, LengthUnit, ModelView};
use ifc_export_geometry::{GeometryOptions, Tolerance};
use serde::{Deserialize, Serialize};

/// Export options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Target schema version.
    pub schema: IfcSchemaVersion,
    /// Model view definition restricting the geometry written.
    pub view: ModelView,
    /// Distance below which two points are the same, in metres.
    pub vertex_tolerance: f64,
    /// Angle below which two directions are parallel, in radians.
    pub angle_tolerance: f64,
    /// Project length unit.
    pub length_unit: LengthUnit,
    /// Project plane angle unit.
    pub angle_unit: AngleUnit,
    /// Write a triangulated body when no swept solid can be recovered.
    pub tessellation_fallback: bool,
    /// Append a bounding box representation next to each body.
    pub export_bounding_box: bool,
    /// Write every profile boundary as a polyline.
    pub force_simple_boundary: bool,
    /// Export linked documents into the same file.
    pub export_linked_documents: bool,
    /// Create the plan context for 2D representations.
    pub export_plan_representations: bool,
    /// Name of the IfcProject.
    pub project_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        let tolerance = Tolerance::default();
        Self {
            schema: IfcSchemaVersion::Ifc4,
            view: ModelView::DesignTransferView,
            vertex_tolerance: tolerance.vertex,
            angle_tolerance: tolerance.angle,
            length_unit: LengthUnit::Millimetre,
            angle_unit: AngleUnit::Degree,
            tessellation_fallback: true,
            export_bounding_box: true,
            force_simple_boundary: false,
            export_linked_documents: true,
            export_plan_representations: false,
            project_name: "Project".into(),
        }
    }
}

impl ExportOptions {
    /// Load options from `IFC_EXPORT_*` environment variables, falling
    /// back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse options from a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(default)
        };
        let number = |key: &str, default: f64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(default)
        };

        Self {
            schema: lookup("IFC_EXPORT_SCHEMA")
                .and_then(|v| IfcSchemaVersion::parse(v.trim()))
                .unwrap_or(defaults.schema),
            view: lookup("IFC_EXPORT_VIEW")
                .and_then(|v| parse_view(&v))
                .unwrap_or(defaults.view),
            vertex_tolerance: number("IFC_EXPORT_VERTEX_TOLERANCE", defaults.vertex_tolerance),
            angle_tolerance: number("IFC_EXPORT_ANGLE_TOLERANCE", defaults.angle_tolerance),
            length_unit: lookup("IFC_EXPORT_LENGTH_UNIT")
                .and_then(|v| parse_length_unit(&v))
                .unwrap_or(defaults.length_unit),
            angle_unit: lookup("IFC_EXPORT_ANGLE_UNIT")
                .and_then(|v| parse_angle_unit(&v))
                .unwrap_or(defaults.angle_unit),
            tessellation_fallback: flag("IFC_EXPORT_TESSELLATION_FALLBACK", defaults.tessellation_fallback),
            export_bounding_box: flag("IFC_EXPORT_BOUNDING_BOX", defaults.export_bounding_box),
            force_simple_boundary: flag("IFC_EXPORT_FORCE_SIMPLE_BOUNDARY", defaults.force_simple_boundary),
            export_linked_documents: flag("IFC_EXPORT_LINKED_DOCUMENTS", defaults.export_linked_documents),
            export_plan_representations: flag("IFC_EXPORT_PLAN_REPRESENTATIONS", defaults.export_plan_representations),
            project_name: lookup("IFC_EXPORT_PROJECT_NAME").unwrap_or(defaults.project_name),
        }
    }

    /// Reject option combinations the exporter cannot honour
    pub fn validate(&self) -> Result<()> {
        if !(self.vertex_tolerance.is_finite() && self.vertex_tolerance > 0.0) {
            return Err(ProcessingError::Config(format!(
                "vertex tolerance must be positive, got {}",
                self.vertex_tolerance
            )));
        }
        if !(self.angle_tolerance.is_finite() && self.angle_tolerance > 0.0) {
            return Err(ProcessingError::Config(format!(
                "angle tolerance must be positive, got {}",
                self.angle_tolerance
            )));
        }
        if self.schema == IfcSchemaVersion::Ifc2x3 && self.view != ModelView::CoordinationView {
            return Err(ProcessingError::Config(format!(
                "{:?} is not defined for IFC2X3",
                self.view
            )));
        }
        Ok(())
    }

    /// The subset of options the geometry pipeline reads
    pub fn geometry_options(&self) -> GeometryOptions {
        GeometryOptions {
            view: self.view,
            tolerance: Tolerance::new(self.vertex_tolerance, self.angle_tolerance),
            length_unit: self.length_unit,
            angle_unit: self.angle_unit,
            force_simple_boundary: self.force_simple_boundary,
            export_bounding_box: self.export_bounding_box,
            export_plan_representations: self.export_plan_representations,
        }
    }
}

fn parse_view(s: &str) -> Option<ModelView> {
    match s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
        "coordinationview" | "cv2" | "cv" => Some(ModelView::CoordinationView),
        "referenceview" | "rv" => Some(ModelView::ReferenceView),
        "designtransferview" | "dtv" => Some(ModelView::DesignTransferView),
        _ => None,
    }
}

fn parse_length_unit(s: &str) -> Option<LengthUnit> {
    match s.trim().to_ascii_lowercase().as_str() {
        "m" | "metre" | "meter" => Some(LengthUnit::Metre),
        "cm" | "centimetre" | "centimeter" => Some(LengthUnit::Centimetre),
        "mm" | "millimetre" | "millimeter" => Some(LengthUnit::Millimetre),
        "ft" | "foot" | "feet" => Some(LengthUnit::Foot),
        "in" | "inch" => Some(LengthUnit::Inch),
        _ => None,
    }
}

fn parse_angle_unit(s: &str) -> Option<AngleUnit> {
    match s.trim().to_ascii_lowercase().as_str() {
        "rad" | "radian" => Some(AngleUnit::Radian),
        "deg" | "degree" => Some(AngleUnit::Degree),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: FxHashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn environment_overrides_defaults() {
        let options = ExportOptions::from_lookup(lookup(&[
            ("IFC_EXPORT_SCHEMA", "ifc2x3"),
            ("IFC_EXPORT_VIEW", "Coordination_View"),
            ("IFC_EXPORT_LENGTH_UNIT", "ft"),
            ("IFC_EXPORT_BOUNDING_BOX", "false"),
            ("IFC_EXPORT_VERTEX_TOLERANCE", "not a number"),
        ]));
        assert_eq!(options.schema, IfcSchemaVersion::Ifc2x3);
        assert_eq!(options.view, ModelView::CoordinationView);
        assert_eq!(options.length_unit, LengthUnit::Foot);
        assert!(!options.export_bounding_box);
        assert_eq!(options.vertex_tolerance, ExportOptions::default().vertex_tolerance);
        assert_eq!(options.angle_unit, AngleUnit::Degree);
    }

    #[test]
    fn json_fills_missing_fields() {
        let options = ExportOptions::from_json(r#"{ "view": "ReferenceView", "tessellation_fallback": false }"#).unwrap();
        assert_eq!(options.view, ModelView::ReferenceView);
        assert!(!options.tessellation_fallback);
        assert_eq!(options.schema, IfcSchemaVersion::Ifc4);
        assert_eq!(options.project_name, "Project");
    }

    #[test]
    fn invalid_json_options_are_rejected() {
        assert!(matches!(
            ExportOptions::from_json(r#"{ "vertex_tolerance": -1.0 }"#),
            Err(ProcessingError::Config(_))
        ));
        assert!(matches!(
            ExportOptions::from_json(r#"{ "schema": "Ifc2x3", "view": "ReferenceView" }"#),
            Err(ProcessingError::Config(_))
        ));
        assert!(matches!(ExportOptions::from_json("{"), Err(ProcessingError::Json(_))));
    }

    #[test]
    fn geometry_options_carry_tolerances() {
        let options = ExportOptions {
            vertex_tolerance: 1e-4,
            force_simple_boundary: true,
            ..ExportOptions::default()
        };
        let geometry = options.geometry_options();
        assert_eq!(geometry.tolerance.vertex, 1e-4);
        assert!(geometry.force_simple_boundary);
        assert_eq!(geometry.view, options.view);
    }
}

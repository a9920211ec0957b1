// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema Types
//!
//! The entity types the exporter constructs, plus schema version and model
//! view selection. Entity availability differs per schema version; the
//! factory consults [`IfcType::is_available_in`] before constructing.

use std::fmt;

/// IFC schema version of the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IfcSchemaVersion {
    Ifc2x3,
    Ifc4,
    Ifc4x3,
}

impl IfcSchemaVersion {
    /// Schema identifier used in FILE_SCHEMA
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ifc2x3 => "IFC2X3",
            Self::Ifc4 => "IFC4",
            Self::Ifc4x3 => "IFC4X3_ADD2",
        }
    }

    /// Parse a schema identifier (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "IFC2X3" => Some(Self::Ifc2x3),
            "IFC4" => Some(Self::Ifc4),
            "IFC4X3" | "IFC4X3_ADD2" => Some(Self::Ifc4x3),
            _ => None,
        }
    }
}

impl fmt::Display for IfcSchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model view definition the export targets.
///
/// The view restricts which geometric constructs are permitted on top of
/// the schema version itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelView {
    /// IFC2x3 Coordination View 2.0
    CoordinationView,
    /// IFC4 Reference View: tessellated and simple swept geometry only
    ReferenceView,
    /// IFC4 Design Transfer View: full parametric geometry
    DesignTransferView,
}

impl ModelView {
    /// Whether B-spline curves may be written
    pub fn allows_advanced_curves(&self, schema: IfcSchemaVersion) -> bool {
        schema >= IfcSchemaVersion::Ifc4 && *self == ModelView::DesignTransferView
    }

    /// Whether profile boundaries may contain arcs and composite curves.
    /// When false, every boundary is tessellated into a polyline.
    pub fn allows_complex_boundaries(&self) -> bool {
        *self != ModelView::ReferenceView
    }

    /// Whether boolean clipping results may be written
    pub fn allows_boolean_results(&self) -> bool {
        *self != ModelView::ReferenceView
    }
}

/// IFC entity types constructed by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IfcType {
    // Points, directions, placements
    IfcCartesianPoint,
    IfcDirection,
    IfcVector,
    IfcAxis2Placement2D,
    IfcAxis2Placement3D,
    IfcLocalPlacement,
    IfcCartesianPointList2D,
    IfcCartesianPointList3D,

    // Curves
    IfcPolyline,
    IfcLine,
    IfcCircle,
    IfcEllipse,
    IfcTrimmedCurve,
    IfcBSplineCurveWithKnots,
    IfcRationalBSplineCurveWithKnots,
    IfcCompositeCurve,
    IfcCompositeCurveSegment,
    IfcIndexedPolyCurve,

    // Profiles and solids
    IfcArbitraryClosedProfileDef,
    IfcArbitraryProfileDefWithVoids,
    IfcExtrudedAreaSolid,
    IfcPlane,
    IfcHalfSpaceSolid,
    IfcPolygonalBoundedHalfSpace,
    IfcBooleanClippingResult,
    IfcBooleanResult,
    IfcBoundingBox,

    // Tessellation and B-rep
    IfcTriangulatedFaceSet,
    IfcFacetedBrep,
    IfcClosedShell,
    IfcFace,
    IfcFaceOuterBound,
    IfcFaceBound,
    IfcPolyLoop,

    // Representation
    IfcGeometricRepresentationContext,
    IfcGeometricRepresentationSubContext,
    IfcShapeRepresentation,
    IfcProductDefinitionShape,
    IfcPresentationLayerAssignment,
    IfcStyledItem,
    IfcPresentationStyleAssignment,
    IfcSurfaceStyle,
    IfcSurfaceStyleRendering,
    IfcColourRgb,

    // Units
    IfcSIUnit,
    IfcDimensionalExponents,
    IfcConversionBasedUnit,
    IfcMeasureWithUnit,
    IfcDerivedUnit,
    IfcDerivedUnitElement,
    IfcUnitAssignment,

    // Materials
    IfcMaterial,
    IfcRelAssociatesMaterial,

    // Properties
    IfcPropertySet,
    IfcPropertySingleValue,
    IfcRelDefinesByProperties,

    // Ownership
    IfcPerson,
    IfcOrganization,
    IfcPersonAndOrganization,
    IfcApplication,
    IfcOwnerHistory,

    // Spatial structure
    IfcProject,
    IfcSite,
    IfcBuilding,
    IfcBuildingStorey,
    IfcRelAggregates,
    IfcRelContainedInSpatialStructure,

    // Products
    IfcBuildingElementProxy,
    IfcWall,
    IfcSlab,
    IfcBeam,
    IfcColumn,
    IfcRoof,
    IfcRailing,
    IfcGroup,
    IfcRelAssignsToGroup,
}

impl IfcType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IfcCartesianPoint => "IFCCARTESIANPOINT",
            Self::IfcDirection => "IFCDIRECTION",
            Self::IfcVector => "IFCVECTOR",
            Self::IfcAxis2Placement2D => "IFCAXIS2PLACEMENT2D",
            Self::IfcAxis2Placement3D => "IFCAXIS2PLACEMENT3D",
            Self::IfcLocalPlacement => "IFCLOCALPLACEMENT",
            Self::IfcCartesianPointList2D => "IFCCARTESIANPOINTLIST2D",
            Self::IfcCartesianPointList3D => "IFCCARTESIANPOINTLIST3D",

            Self::IfcPolyline => "IFCPOLYLINE",
            Self::IfcLine => "IFCLINE",
            Self::IfcCircle => "IFCCIRCLE",
            Self::IfcEllipse => "IFCELLIPSE",
            Self::IfcTrimmedCurve => "IFCTRIMMEDCURVE",
            Self::IfcBSplineCurveWithKnots => "IFCBSPLINECURVEWITHKNOTS",
            Self::IfcRationalBSplineCurveWithKnots => "IFCRATIONALBSPLINECURVEWITHKNOTS",
            Self::IfcCompositeCurve => "IFCCOMPOSITECURVE",
            Self::IfcCompositeCurveSegment => "IFCCOMPOSITECURVESEGMENT",
            Self::IfcIndexedPolyCurve => "IFCINDEXEDPOLYCURVE",

            Self::IfcArbitraryClosedProfileDef => "IFCARBITRARYCLOSEDPROFILEDEF",
            Self::IfcArbitraryProfileDefWithVoids => "IFCARBITRARYPROFILEDEFWITHVOIDS",
            Self::IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",
            Self::IfcPlane => "IFCPLANE",
            Self::IfcHalfSpaceSolid => "IFCHALFSPACESOLID",
            Self::IfcPolygonalBoundedHalfSpace => "IFCPOLYGONALBOUNDEDHALFSPACE",
            Self::IfcBooleanClippingResult => "IFCBOOLEANCLIPPINGRESULT",
            Self::IfcBooleanResult => "IFCBOOLEANRESULT",
            Self::IfcBoundingBox => "IFCBOUNDINGBOX",

            Self::IfcTriangulatedFaceSet => "IFCTRIANGULATEDFACESET",
            Self::IfcFacetedBrep => "IFCFACETEDBREP",
            Self::IfcClosedShell => "IFCCLOSEDSHELL",
            Self::IfcFace => "IFCFACE",
            Self::IfcFaceOuterBound => "IFCFACEOUTERBOUND",
            Self::IfcFaceBound => "IFCFACEBOUND",
            Self::IfcPolyLoop => "IFCPOLYLOOP",

            Self::IfcGeometricRepresentationContext => "IFCGEOMETRICREPRESENTATIONCONTEXT",
            Self::IfcGeometricRepresentationSubContext => "IFCGEOMETRICREPRESENTATIONSUBCONTEXT",
            Self::IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
            Self::IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",
            Self::IfcPresentationLayerAssignment => "IFCPRESENTATIONLAYERASSIGNMENT",
            Self::IfcStyledItem => "IFCSTYLEDITEM",
            Self::IfcPresentationStyleAssignment => "IFCPRESENTATIONSTYLEASSIGNMENT",
            Self::IfcSurfaceStyle => "IFCSURFACESTYLE",
            Self::IfcSurfaceStyleRendering => "IFCSURFACESTYLERENDERING",
            Self::IfcColourRgb => "IFCCOLOURRGB",

            Self::IfcSIUnit => "IFCSIUNIT",
            Self::IfcDimensionalExponents => "IFCDIMENSIONALEXPONENTS",
            Self::IfcConversionBasedUnit => "IFCCONVERSIONBASEDUNIT",
            Self::IfcMeasureWithUnit => "IFCMEASUREWITHUNIT",
            Self::IfcDerivedUnit => "IFCDERIVEDUNIT",
            Self::IfcDerivedUnitElement => "IFCDERIVEDUNITELEMENT",
            Self::IfcUnitAssignment => "IFCUNITASSIGNMENT",

            Self::IfcMaterial => "IFCMATERIAL",
            Self::IfcRelAssociatesMaterial => "IFCRELASSOCIATESMATERIAL",

            Self::IfcPropertySet => "IFCPROPERTYSET",
            Self::IfcPropertySingleValue => "IFCPROPERTYSINGLEVALUE",
            Self::IfcRelDefinesByProperties => "IFCRELDEFINESBYPROPERTIES",

            Self::IfcPerson => "IFCPERSON",
            Self::IfcOrganization => "IFCORGANIZATION",
            Self::IfcPersonAndOrganization => "IFCPERSONANDORGANIZATION",
            Self::IfcApplication => "IFCAPPLICATION",
            Self::IfcOwnerHistory => "IFCOWNERHISTORY",

            Self::IfcProject => "IFCPROJECT",
            Self::IfcSite => "IFCSITE",
            Self::IfcBuilding => "IFCBUILDING",
            Self::IfcBuildingStorey => "IFCBUILDINGSTOREY",
            Self::IfcRelAggregates => "IFCRELAGGREGATES",
            Self::IfcRelContainedInSpatialStructure => "IFCRELCONTAINEDINSPATIALSTRUCTURE",

            Self::IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",
            Self::IfcWall => "IFCWALL",
            Self::IfcSlab => "IFCSLAB",
            Self::IfcBeam => "IFCBEAM",
            Self::IfcColumn => "IFCCOLUMN",
            Self::IfcRoof => "IFCROOF",
            Self::IfcRailing => "IFCRAILING",
            Self::IfcGroup => "IFCGROUP",
            Self::IfcRelAssignsToGroup => "IFCRELASSIGNSTOGROUP",
        }
    }

    /// Earliest schema version that defines the entity
    pub fn min_schema(&self) -> IfcSchemaVersion {
        match self {
            Self::IfcCartesianPointList2D
            | Self::IfcCartesianPointList3D
            | Self::IfcIndexedPolyCurve
            | Self::IfcTriangulatedFaceSet => IfcSchemaVersion::Ifc4,
            _ => IfcSchemaVersion::Ifc2x3,
        }
    }

    /// Whether the entity exists in the given schema version
    pub fn is_available_in(&self, schema: IfcSchemaVersion) -> bool {
        match self {
            // Deprecated in IFC4, removed in IFC4x3
            Self::IfcPresentationStyleAssignment => schema < IfcSchemaVersion::Ifc4x3,
            _ => schema >= self.min_schema(),
        }
    }

    /// Whether the entity derives from IfcRoot and therefore carries a GlobalId
    pub fn is_rooted(&self) -> bool {
        matches!(
            self,
            Self::IfcPropertySet
                | Self::IfcRelDefinesByProperties
                | Self::IfcRelAssociatesMaterial
                | Self::IfcProject
                | Self::IfcSite
                | Self::IfcBuilding
                | Self::IfcBuildingStorey
                | Self::IfcRelAggregates
                | Self::IfcRelContainedInSpatialStructure
                | Self::IfcBuildingElementProxy
                | Self::IfcWall
                | Self::IfcSlab
                | Self::IfcBeam
                | Self::IfcColumn
                | Self::IfcRoof
                | Self::IfcRailing
                | Self::IfcGroup
                | Self::IfcRelAssignsToGroup
        )
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_ordering_drives_availability() {
        assert!(!IfcType::IfcIndexedPolyCurve.is_available_in(IfcSchemaVersion::Ifc2x3));
        assert!(IfcType::IfcIndexedPolyCurve.is_available_in(IfcSchemaVersion::Ifc4));
        assert!(IfcType::IfcPresentationStyleAssignment.is_available_in(IfcSchemaVersion::Ifc2x3));
        assert!(!IfcType::IfcPresentationStyleAssignment.is_available_in(IfcSchemaVersion::Ifc4x3));
        assert!(IfcType::IfcExtrudedAreaSolid.is_available_in(IfcSchemaVersion::Ifc2x3));
    }

    #[test]
    fn view_restrictions() {
        assert!(!ModelView::ReferenceView.allows_advanced_curves(IfcSchemaVersion::Ifc4));
        assert!(!ModelView::DesignTransferView.allows_advanced_curves(IfcSchemaVersion::Ifc2x3));
        assert!(ModelView::DesignTransferView.allows_advanced_curves(IfcSchemaVersion::Ifc4x3));
        assert!(!ModelView::ReferenceView.allows_complex_boundaries());
        assert!(ModelView::CoordinationView.allows_complex_boundaries());
    }

    #[test]
    fn schema_names_round_trip() {
        for schema in [IfcSchemaVersion::Ifc2x3, IfcSchemaVersion::Ifc4, IfcSchemaVersion::Ifc4x3] {
            assert_eq!(IfcSchemaVersion::parse(schema.as_str()), Some(schema));
        }
        assert_eq!(IfcType::IfcTrimmedCurve.to_string(), "IFCTRIMMEDCURVE");
    }
}

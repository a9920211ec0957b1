// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Representation contexts, shape representations and layers

use super::ExportSession;
use crate::plane::Plane;
use crate::source::{FaceMesh, GeometrySource};
use crate::{Error, Point3, Result, Vector2};
use ifc_export_core::{AttributeValue, EntityFactory, EntityHandle, IfcSchemaVersion, IfcType};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Context precision written into the model and plan contexts
const CONTEXT_PRECISION: f64 = 1e-5;

/// Index list attribute of IfcShapeRepresentation.Items
const REPRESENTATION_ITEMS: usize = 3;
/// Index list attribute of IfcPresentationLayerAssignment.AssignedItems
const LAYER_ITEMS: usize = 2;

/// Kind of shape representation, fixing identifier and type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepresentationKind {
    SweptSolid,
    Tessellation,
    Brep,
    AdvancedBrep,
    SurfaceModel,
    Clipping,
    Csg,
    BoundingBox,
    MappedRepresentation,
    Annotation2D,
    FootPrint,
    Axis2D,
    Axis3D,
}

impl RepresentationKind {
    /// RepresentationIdentifier
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::SweptSolid
            | Self::Tessellation
            | Self::Brep
            | Self::AdvancedBrep
            | Self::SurfaceModel
            | Self::Clipping
            | Self::Csg
            | Self::MappedRepresentation => "Body",
            Self::BoundingBox => "Box",
            Self::Annotation2D => "Annotation",
            Self::FootPrint => "FootPrint",
            Self::Axis2D | Self::Axis3D => "Axis",
        }
    }

    /// RepresentationType
    pub fn representation_type(&self) -> &'static str {
        match self {
            Self::SweptSolid => "SweptSolid",
            Self::Tessellation => "Tessellation",
            Self::Brep => "Brep",
            Self::AdvancedBrep => "AdvancedBrep",
            Self::SurfaceModel => "SurfaceModel",
            Self::Clipping => "Clipping",
            Self::Csg => "CSG",
            Self::BoundingBox => "BoundingBox",
            Self::MappedRepresentation => "MappedRepresentation",
            Self::Annotation2D => "Annotation2D",
            Self::FootPrint | Self::Axis2D => "Curve2D",
            Self::Axis3D => "Curve3D",
        }
    }

    /// Whether the representation lives in the 2D plan context
    pub fn is_plan(&self) -> bool {
        matches!(self, Self::Annotation2D | Self::Axis2D)
    }

    fn target_view(&self) -> &'static str {
        match self {
            Self::Annotation2D | Self::FootPrint => "PLAN_VIEW",
            Self::Axis2D | Self::Axis3D => "GRAPH_VIEW",
            _ => "MODEL_VIEW",
        }
    }
}

/// Body written from the host triangulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellatedBody {
    pub item: EntityHandle,
    /// `Tessellation` or, for IFC2x3, `Brep`
    pub kind: RepresentationKind,
    pub triangles: usize,
}

impl<F: EntityFactory> ExportSession<F> {
    /// Top-level model (3D) or plan (2D) context. The plan context is only
    /// written when plan representations are enabled.
    pub fn representation_context(&mut self, plan: bool) -> Result<Option<EntityHandle>> {
        if plan && !self.options.export_plan_representations {
            return Ok(None);
        }
        let context_type = if plan { "Plan" } else { "Model" };
        let key = (String::new(), context_type.to_string());
        if let Some(handle) = self.cache.contexts.find(&key) {
            return Ok(Some(handle));
        }
        let origin = self.create_axis_placement(&Plane::xy())?;
        let north = self.create_direction_2d(&Vector2::y())?;
        let handle = self.create(
            IfcType::IfcGeometricRepresentationContext,
            vec![
                AttributeValue::Null,
                AttributeValue::string(context_type),
                AttributeValue::Integer(if plan { 2 } else { 3 }),
                AttributeValue::Float(CONTEXT_PRECISION),
                origin.into(),
                north.into(),
            ],
        )?;
        self.cache.contexts.register(key, handle);
        Ok(Some(handle))
    }

    /// Sub-context for a representation kind, shared per identifier and
    /// context type
    pub fn representation_sub_context(&mut self, kind: RepresentationKind) -> Result<Option<EntityHandle>> {
        let Some(parent) = self.representation_context(kind.is_plan())? else {
            return Ok(None);
        };
        let context_type = if kind.is_plan() { "Plan" } else { "Model" };
        let key = (kind.identifier().to_string(), context_type.to_string());
        if let Some(handle) = self.cache.contexts.find(&key) {
            return Ok(Some(handle));
        }
        let handle = self.create(
            IfcType::IfcGeometricRepresentationSubContext,
            vec![
                AttributeValue::string(kind.identifier()),
                AttributeValue::string(context_type),
                AttributeValue::Derived,
                AttributeValue::Derived,
                AttributeValue::Derived,
                AttributeValue::Derived,
                parent.into(),
                AttributeValue::Null,
                AttributeValue::enumeration(kind.target_view()),
                AttributeValue::Null,
            ],
        )?;
        self.cache.contexts.register(key, handle);
        Ok(Some(handle))
    }

    /// IfcShapeRepresentation holding `items`; `None` when there is nothing
    /// to hold or the context is disabled
    pub fn create_shape_representation(
        &mut self,
        kind: RepresentationKind,
        items: &[EntityHandle],
    ) -> Result<Option<EntityHandle>> {
        if items.is_empty() {
            return Ok(None);
        }
        let Some(context) = self.representation_sub_context(kind)? else {
            return Ok(None);
        };
        let handle = self.create(
            IfcType::IfcShapeRepresentation,
            vec![
                context.into(),
                AttributeValue::string(kind.identifier()),
                AttributeValue::string(kind.representation_type()),
                AttributeValue::refs(items),
            ],
        )?;
        Ok(Some(handle))
    }

    /// Add items to an existing shape representation
    pub fn append_to_representation(&mut self, representation: EntityHandle, items: &[EntityHandle]) -> Result<()> {
        let values = items.iter().copied().map(AttributeValue::from).collect();
        self.factory
            .append_to_list(representation, REPRESENTATION_ITEMS, values)?;
        Ok(())
    }

    /// Put representations on the named layer, creating it on first use
    pub fn assign_layer(&mut self, name: &str, items: &[EntityHandle]) -> Result<EntityHandle> {
        if let Some(layer) = self.cache.presentation_layers.find(name) {
            let values = items.iter().copied().map(AttributeValue::from).collect();
            self.factory.append_to_list(layer, LAYER_ITEMS, values)?;
            return Ok(layer);
        }
        let layer = self.create(
            IfcType::IfcPresentationLayerAssignment,
            vec![
                AttributeValue::string(name),
                AttributeValue::Null,
                AttributeValue::refs(items),
                AttributeValue::Null,
            ],
        )?;
        self.cache.presentation_layers.register(name.to_string(), layer);
        Ok(layer)
    }

    /// Box representation of the axis-aligned bounds of `source`
    pub fn create_bounding_box_representation<S: GeometrySource>(&mut self, source: &S) -> Result<Option<EntityHandle>> {
        if !self.options.export_bounding_box {
            return Ok(None);
        }
        let Some((min, max)) = source.bounds()? else {
            return Ok(None);
        };
        let corner = self.create_point(&min)?;
        let size = max - min;
        let bounding_box = self.create(
            IfcType::IfcBoundingBox,
            vec![
                corner.into(),
                AttributeValue::Float(self.scale_length(size.x)),
                AttributeValue::Float(self.scale_length(size.y)),
                AttributeValue::Float(self.scale_length(size.z)),
            ],
        )?;
        self.create_shape_representation(RepresentationKind::BoundingBox, &[bounding_box])
    }

    /// Body item built from the host triangulation: a triangulated face set,
    /// or a faceted B-rep where the schema has no tessellated items
    pub fn create_tessellated_body<S: GeometrySource>(&mut self, source: &S) -> Result<Option<TessellatedBody>> {
        let mesh = source.tessellate()?;
        if mesh.is_empty() {
            return Ok(None);
        }
        let (positions, indices) = weld(&mesh, self.options.tolerance.vertex);
        let triangles = indices.len() / 3;
        debug!(triangles, vertices = positions.len(), "tessellated body");

        let body = if IfcType::IfcTriangulatedFaceSet.is_available_in(self.schema()) {
            let item = self.create_triangulated_face_set(&positions, &indices)?;
            TessellatedBody {
                item,
                kind: RepresentationKind::Tessellation,
                triangles,
            }
        } else {
            let item = self.create_faceted_brep(&positions, &indices)?;
            TessellatedBody {
                item,
                kind: RepresentationKind::Brep,
                triangles,
            }
        };
        Ok(Some(body))
    }

    fn create_triangulated_face_set(&mut self, positions: &[Point3<f64>], indices: &[u32]) -> Result<EntityHandle> {
        let coordinates: Vec<AttributeValue> = positions
            .iter()
            .map(|p| AttributeValue::floats(&[self.scale_length(p.x), self.scale_length(p.y), self.scale_length(p.z)]))
            .collect();
        let mut list_attributes = vec![AttributeValue::List(coordinates)];
        if self.schema() >= IfcSchemaVersion::Ifc4x3 {
            list_attributes.push(AttributeValue::Null);
        }
        let points = self.create(IfcType::IfcCartesianPointList3D, list_attributes)?;
        let coord_index = AttributeValue::List(
            indices
                .chunks_exact(3)
                .map(|t| AttributeValue::integers(&[t[0] as i64 + 1, t[1] as i64 + 1, t[2] as i64 + 1]))
                .collect(),
        );
        // Closed moved ahead of Normals in IFC4X3
        let attributes = if self.schema() >= IfcSchemaVersion::Ifc4x3 {
            vec![
                points.into(),
                AttributeValue::Boolean(true),
                AttributeValue::Null,
                coord_index,
                AttributeValue::Null,
            ]
        } else {
            vec![
                points.into(),
                AttributeValue::Null,
                AttributeValue::Boolean(true),
                coord_index,
                AttributeValue::Null,
            ]
        };
        self.create(IfcType::IfcTriangulatedFaceSet, attributes)
    }

    fn create_faceted_brep(&mut self, positions: &[Point3<f64>], indices: &[u32]) -> Result<EntityHandle> {
        let mut points = Vec::with_capacity(positions.len());
        for p in positions {
            points.push(self.create_point(p)?);
        }
        let mut faces = Vec::with_capacity(indices.len() / 3);
        for t in indices.chunks_exact(3) {
            let corners: Vec<EntityHandle> = t.iter().map(|i| points[*i as usize]).collect();
            let polyloop = self.create(IfcType::IfcPolyLoop, vec![AttributeValue::refs(&corners)])?;
            let bound = self.create(
                IfcType::IfcFaceOuterBound,
                vec![polyloop.into(), AttributeValue::Boolean(true)],
            )?;
            faces.push(self.create(IfcType::IfcFace, vec![AttributeValue::refs(&[bound])])?);
        }
        let shell = self.create(IfcType::IfcClosedShell, vec![AttributeValue::refs(&faces)])?;
        self.create(IfcType::IfcFacetedBrep, vec![shell.into()])
    }

    /// IfcProductDefinitionShape over the given representations
    pub fn create_product_definition_shape(&mut self, representations: &[EntityHandle]) -> Result<EntityHandle> {
        if representations.is_empty() {
            return Err(Error::InvariantViolation("product shape without representations".into()));
        }
        self.create(
            IfcType::IfcProductDefinitionShape,
            vec![
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::refs(representations),
            ],
        )
    }
}

/// Merge coincident mesh vertices and drop triangles they collapse
fn weld(mesh: &FaceMesh, tolerance: f64) -> (Vec<Point3<f64>>, Vec<u32>) {
    let grid = tolerance.max(f64::EPSILON);
    let mut lookup: FxHashMap<[i64; 3], u32> = FxHashMap::default();
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let remap: Vec<u32> = mesh
        .positions
        .iter()
        .map(|p| {
            let key = [
                (p.x / grid).round() as i64,
                (p.y / grid).round() as i64,
                (p.z / grid).round() as i64,
            ];
            *lookup.entry(key).or_insert_with(|| {
                positions.push(*p);
                (positions.len() - 1) as u32
            })
        })
        .collect();
    let indices = mesh
        .indices
        .chunks_exact(3)
        .map(|t| [remap[t[0] as usize], remap[t[1] as usize], remap[t[2] as usize]])
        .filter(|t| t[0] != t[1] && t[1] != t[2] && t[0] != t[2])
        .flatten()
        .collect();
    (positions, indices)
}

#[cfg(test)]
mod tests {
    use super::super::GeometryOptions;
    use super::*;
    use crate::brep::BrepSolid;
    use crate::tolerance::Tolerance;
    use approx::assert_relative_eq;
    use ifc_export_core::{AngleUnit, EntityStore, LengthUnit};

    fn session(schema: IfcSchemaVersion) -> ExportSession {
        let options = GeometryOptions {
            length_unit: LengthUnit::Metre,
            angle_unit: AngleUnit::Radian,
            ..GeometryOptions::default()
        };
        ExportSession::new(EntityStore::new(schema), options)
    }

    fn cube() -> BrepSolid {
        BrepSolid::cuboid(Point3::origin(), Point3::new(2.0, 1.0, 3.0), Tolerance::default()).unwrap()
    }

    #[test]
    fn representation_table() {
        assert_eq!(RepresentationKind::SweptSolid.identifier(), "Body");
        assert_eq!(RepresentationKind::Csg.representation_type(), "CSG");
        assert_eq!(RepresentationKind::BoundingBox.identifier(), "Box");
        assert_eq!(RepresentationKind::FootPrint.representation_type(), "Curve2D");
        assert_eq!(RepresentationKind::Axis3D.representation_type(), "Curve3D");
        assert_eq!(RepresentationKind::Annotation2D.identifier(), "Annotation");
    }

    #[test]
    fn contexts_are_shared() {
        let mut s = session(IfcSchemaVersion::Ifc4);
        let body = s.representation_sub_context(RepresentationKind::SweptSolid).unwrap();
        let clipping = s.representation_sub_context(RepresentationKind::Clipping).unwrap();
        let bbox = s.representation_sub_context(RepresentationKind::BoundingBox).unwrap();
        assert_eq!(body, clipping);
        assert_ne!(body, bbox);
        // Plan context is disabled by default
        assert!(s.representation_sub_context(RepresentationKind::Annotation2D).unwrap().is_none());
        assert_eq!(s.cache().contexts.len(), 3);
    }

    #[test]
    fn empty_representation_is_none_and_append_extends() {
        let mut s = session(IfcSchemaVersion::Ifc4);
        assert!(s.create_shape_representation(RepresentationKind::SweptSolid, &[]).unwrap().is_none());
        let a = s.create_point(&Point3::origin()).unwrap();
        let b = s.create_point(&Point3::new(1.0, 0.0, 0.0)).unwrap();
        let rep = s
            .create_shape_representation(RepresentationKind::SweptSolid, &[a])
            .unwrap()
            .unwrap();
        s.append_to_representation(rep, &[b]).unwrap();
        assert_eq!(s.factory().entity(rep).unwrap().get_refs(3), vec![a, b]);
    }

    #[test]
    fn layers_are_shared_by_name() {
        let mut s = session(IfcSchemaVersion::Ifc4);
        let a = s.create_point(&Point3::origin()).unwrap();
        let b = s.create_point(&Point3::new(1.0, 0.0, 0.0)).unwrap();
        let first = s.assign_layer("A-WALL", &[a]).unwrap();
        let second = s.assign_layer("A-WALL", &[b]).unwrap();
        assert_eq!(first, second);
        assert_eq!(s.factory().entity(first).unwrap().get_refs(2), vec![a, b]);
    }

    #[test]
    fn bounding_box_matches_solid() {
        let mut s = session(IfcSchemaVersion::Ifc4);
        let rep = s.create_bounding_box_representation(&cube()).unwrap().unwrap();
        let item = s.factory().entity(rep).unwrap().get_refs(3)[0];
        let bbox = s.factory().entity(item).unwrap();
        assert_eq!(bbox.ifc_type, IfcType::IfcBoundingBox);
        assert_relative_eq!(bbox.get_float(1).unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.get_float(3).unwrap(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn tessellated_body_follows_schema() {
        let mut ifc4 = session(IfcSchemaVersion::Ifc4);
        let body = ifc4.create_tessellated_body(&cube()).unwrap().unwrap();
        assert_eq!(body.kind, RepresentationKind::Tessellation);
        assert_eq!(body.triangles, 12);
        let set = ifc4.factory().entity(body.item).unwrap();
        assert_eq!(set.ifc_type, IfcType::IfcTriangulatedFaceSet);
        let points = ifc4.factory().entity(set.get_ref(0).unwrap()).unwrap();
        assert_eq!(points.get_list(0).unwrap().len(), 8);

        let mut ifc2x3 = session(IfcSchemaVersion::Ifc2x3);
        let body = ifc2x3.create_tessellated_body(&cube()).unwrap().unwrap();
        assert_eq!(body.kind, RepresentationKind::Brep);
        let brep = ifc2x3.factory().entity(body.item).unwrap();
        assert_eq!(brep.ifc_type, IfcType::IfcFacetedBrep);
        let shell = ifc2x3.factory().entity(brep.get_ref(0).unwrap()).unwrap();
        assert_eq!(shell.get_refs(0).len(), 12);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host elements as handed to the exporter

use crate::properties::PropertySetDescriptor;
use ifc_export_core::{IfcSchemaVersion, IfcType};
use ifc_export_geometry::{ClipFace, GeometrySource, MaterialInfo, Plane, Point3};
use serde::{Deserialize, Serialize};

/// Element category, deciding the product entity and export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementCategory {
    Wall,
    Slab,
    Beam,
    Column,
    Roof,
    Railing,
    Proxy,
}

impl ElementCategory {
    pub fn ifc_type(&self) -> IfcType {
        match self {
            Self::Wall => IfcType::IfcWall,
            Self::Slab => IfcType::IfcSlab,
            Self::Beam => IfcType::IfcBeam,
            Self::Column => IfcType::IfcColumn,
            Self::Roof => IfcType::IfcRoof,
            Self::Railing => IfcType::IfcRailing,
            Self::Proxy => IfcType::IfcBuildingElementProxy,
        }
    }

    /// Railings reference their hosts, so they are written after every
    /// ordinary element
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Railing)
    }

    /// Attributes after `Tag` in the product entity
    pub(crate) fn trailing_attributes(&self, schema: IfcSchemaVersion) -> usize {
        if schema >= IfcSchemaVersion::Ifc4 {
            return 1;
        }
        match self {
            Self::Wall | Self::Beam | Self::Column => 0,
            Self::Slab | Self::Roof | Self::Railing | Self::Proxy => 1,
        }
    }
}

/// One host element: a solid plus everything that hangs off its product
#[derive(Debug, Clone)]
pub struct ExportElement<S: GeometrySource> {
    /// Host id, unique within a document
    pub id: String,
    /// GlobalId to keep, when the host already has one
    pub guid: Option<String>,
    pub category: ElementCategory,
    pub name: Option<String>,
    pub solid: S,
    /// Plane the body is extruded from
    pub base_plane: Plane,
    /// Origin of the profile frame, projected onto `base_plane`
    pub origin: Point3<f64>,
    /// Faces cutting the extruded body at its ends
    pub clip_faces: Vec<ClipFace>,
    /// Each entry bounds one opening cut into the body
    pub openings: Vec<Vec<S::Face>>,
    pub material: Option<MaterialInfo>,
    pub layer: Option<String>,
    pub property_sets: Vec<PropertySetDescriptor>,
}

impl<S: GeometrySource> ExportElement<S> {
    pub fn new(id: impl Into<String>, category: ElementCategory, solid: S, base_plane: Plane) -> Self {
        let origin = base_plane.origin;
        Self {
            id: id.into(),
            guid: None,
            category,
            name: None,
            solid,
            base_plane,
            origin,
            clip_faces: Vec::new(),
            openings: Vec::new(),
            material: None,
            layer: None,
            property_sets: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    pub fn with_material(mut self, material: MaterialInfo) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    pub fn with_property_set(mut self, set: PropertySetDescriptor) -> Self {
        self.property_sets.push(set);
        self
    }

    pub fn with_clip_faces(mut self, faces: Vec<ClipFace>) -> Self {
        self.clip_faces = faces;
        self
    }

    pub fn with_opening(mut self, faces: Vec<S::Face>) -> Self {
        self.openings.push(faces);
        self
    }
}

/// A host group, written after all elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    pub id: String,
    pub name: String,
    /// Host ids of the member elements
    pub members: Vec<String>,
}

impl GroupDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members,
        }
    }
}

/// Elements and groups of one host document
#[derive(Debug, Clone)]
pub struct Document<S: GeometrySource> {
    pub name: String,
    pub elements: Vec<ExportElement<S>>,
    pub groups: Vec<GroupDescriptor>,
}

impl<S: GeometrySource> Document<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Ordinary elements in host order, then the deferred ones
    pub fn export_order(&self) -> impl Iterator<Item = &ExportElement<S>> {
        let ordinary = self.elements.iter().filter(|e| !e.category.is_deferred());
        let deferred = self.elements.iter().filter(|e| e.category.is_deferred());
        ordinary.chain(deferred)
    }
}

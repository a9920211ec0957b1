// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Materials and surface styles

use super::ExportSession;
use crate::Result;
use ifc_export_core::{AttributeValue, EntityFactory, EntityHandle, IfcSchemaVersion, IfcType};

/// Index of IfcRelAssociatesMaterial.RelatedObjects
const RELATED_OBJECTS: usize = 4;

/// Host material as seen by the exporter
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialInfo {
    /// Host id, the cache key
    pub id: String,
    pub name: String,
    /// Surface colour, components in `[0, 1]`
    pub color: Option<[f64; 3]>,
    /// 0 is opaque
    pub transparency: f64,
}

impl MaterialInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            transparency: 0.0,
        }
    }

    pub fn with_color(mut self, color: [f64; 3]) -> Self {
        self.color = Some(color);
        self
    }
}

impl<F: EntityFactory> ExportSession<F> {
    /// IfcMaterial for a host material, one per material id
    pub fn material(&mut self, info: &MaterialInfo) -> Result<EntityHandle> {
        if let Some(handle) = self.cache.materials.find(info.id.as_str()) {
            return Ok(handle);
        }
        let attributes = if self.schema() == IfcSchemaVersion::Ifc2x3 {
            vec![AttributeValue::string(&info.name)]
        } else {
            vec![AttributeValue::string(&info.name), AttributeValue::Null, AttributeValue::Null]
        };
        let handle = self.create(IfcType::IfcMaterial, attributes)?;
        self.cache.materials.register(info.id.clone(), handle);
        Ok(handle)
    }

    /// Relate `product` to `material`. All products of one material share a
    /// single relationship.
    pub fn associate_material(&mut self, material: EntityHandle, product: EntityHandle) -> Result<EntityHandle> {
        if let Some(relation) = self.cache.material_relations.find(&material) {
            self.factory
                .append_to_list(relation, RELATED_OBJECTS, vec![product.into()])?;
            return Ok(relation);
        }
        let guid = self.new_guid(None);
        let owner_history = self.owner_history();
        let relation = self.create(
            IfcType::IfcRelAssociatesMaterial,
            vec![
                AttributeValue::string(guid),
                owner_history,
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::refs(&[product]),
                material.into(),
            ],
        )?;
        self.cache.material_relations.register(material, relation);
        Ok(relation)
    }

    /// IfcSurfaceStyle for a coloured material, one per material id
    pub fn surface_style(&mut self, info: &MaterialInfo) -> Result<Option<EntityHandle>> {
        let Some([r, g, b]) = info.color else {
            return Ok(None);
        };
        if let Some(handle) = self.cache.surface_styles.find(info.id.as_str()) {
            return Ok(Some(handle));
        }
        let colour = self.create(
            IfcType::IfcColourRgb,
            vec![
                AttributeValue::Null,
                AttributeValue::Float(r),
                AttributeValue::Float(g),
                AttributeValue::Float(b),
            ],
        )?;
        let transparency = if info.transparency > 0.0 {
            AttributeValue::Float(info.transparency.min(1.0))
        } else {
            AttributeValue::Null
        };
        let mut rendering_attributes = vec![colour.into(), transparency];
        rendering_attributes.extend(std::iter::repeat(AttributeValue::Null).take(6));
        rendering_attributes.push(AttributeValue::enumeration("NOTDEFINED"));
        let rendering = self.create(IfcType::IfcSurfaceStyleRendering, rendering_attributes)?;
        let style = self.create(
            IfcType::IfcSurfaceStyle,
            vec![
                AttributeValue::string(&info.name),
                AttributeValue::enumeration("BOTH"),
                AttributeValue::refs(&[rendering]),
            ],
        )?;
        self.cache.surface_styles.register(info.id.clone(), style);
        Ok(Some(style))
    }

    /// Attach the material's surface style to a representation item
    pub fn style_item(&mut self, item: EntityHandle, info: &MaterialInfo) -> Result<Option<EntityHandle>> {
        let Some(style) = self.surface_style(info)? else {
            return Ok(None);
        };
        let styles = if self.schema() == IfcSchemaVersion::Ifc2x3 {
            let assignment = self.create(IfcType::IfcPresentationStyleAssignment, vec![AttributeValue::refs(&[style])])?;
            AttributeValue::refs(&[assignment])
        } else {
            AttributeValue::refs(&[style])
        };
        let styled = self.create(IfcType::IfcStyledItem, vec![item.into(), styles, AttributeValue::Null])?;
        Ok(Some(styled))
    }
}

#[cfg(test)]
mod tests {
    use super::super::GeometryOptions;
    use super::*;
    use crate::Point3;
    use ifc_export_core::EntityStore;

    fn session(schema: IfcSchemaVersion) -> ExportSession {
        ExportSession::new(EntityStore::new(schema), GeometryOptions::default())
    }

    #[test]
    fn materials_are_cached_by_id() {
        let mut s = session(IfcSchemaVersion::Ifc4);
        let concrete = MaterialInfo::new("m1", "Concrete");
        let a = s.material(&concrete).unwrap();
        let b = s.material(&concrete).unwrap();
        assert_eq!(a, b);
        assert_eq!(s.factory().entity(a).unwrap().attributes.len(), 3);

        let mut old = session(IfcSchemaVersion::Ifc2x3);
        let h = old.material(&concrete).unwrap();
        assert_eq!(old.factory().entity(h).unwrap().attributes.len(), 1);
    }

    #[test]
    fn products_share_material_relation() {
        let mut s = session(IfcSchemaVersion::Ifc4);
        let material = s.material(&MaterialInfo::new("m1", "Steel")).unwrap();
        let p1 = s.create_point(&Point3::origin()).unwrap();
        let p2 = s.create_point(&Point3::new(1.0, 0.0, 0.0)).unwrap();
        let r1 = s.associate_material(material, p1).unwrap();
        let r2 = s.associate_material(material, p2).unwrap();
        assert_eq!(r1, r2);
        assert_eq!(s.factory().entity(r1).unwrap().get_refs(RELATED_OBJECTS), vec![p1, p2]);
    }

    #[test]
    fn uncoloured_material_has_no_style() {
        let mut s = session(IfcSchemaVersion::Ifc4);
        let item = s.create_point(&Point3::origin()).unwrap();
        assert!(s.style_item(item, &MaterialInfo::new("m1", "Plain")).unwrap().is_none());
    }

    #[test]
    fn styled_item_wraps_assignment_in_ifc2x3() {
        let brick = MaterialInfo::new("m2", "Brick").with_color([0.6, 0.2, 0.1]);

        let mut s = session(IfcSchemaVersion::Ifc4);
        let item = s.create_point(&Point3::origin()).unwrap();
        let styled = s.style_item(item, &brick).unwrap().unwrap();
        let style = s.factory().entity(styled).unwrap().get_refs(1)[0];
        assert_eq!(s.factory().entity(style).unwrap().ifc_type, IfcType::IfcSurfaceStyle);
        assert_eq!(s.surface_style(&brick).unwrap(), Some(style));

        let mut old = session(IfcSchemaVersion::Ifc2x3);
        let item = old.create_point(&Point3::origin()).unwrap();
        let styled = old.style_item(item, &brick).unwrap().unwrap();
        let assignment = old.factory().entity(styled).unwrap().get_refs(1)[0];
        assert_eq!(
            old.factory().entity(assignment).unwrap().ifc_type,
            IfcType::IfcPresentationStyleAssignment
        );
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property sets
//!
//! Host property values become `IfcPropertySingleValue`s with typed
//! measures in project units. Property sets with identical content are
//! written once and shared through a single `IfcRelDefinesByProperties`.

use crate::error::Result;
use ifc_export_core::{AttributeValue, EntityFactory, EntityHandle, IfcType, UnitType};
use ifc_export_geometry::ExportSession;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Index of IfcRelDefinesByProperties.RelatedObjects
const RELATED_OBJECTS: usize = 4;

/// A host property value. Measures are in internal units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Label(String),
    Text(String),
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// Metres
    Length(f64),
    /// Square metres
    Area(f64),
    /// Cubic metres
    Volume(f64),
    /// Radians
    PlaneAngle(f64),
}

impl PropertyValue {
    /// Typed nominal value in project units
    fn to_attribute<F: EntityFactory>(&self, session: &mut ExportSession<F>) -> Result<AttributeValue> {
        let value = match self {
            Self::Label(s) => AttributeValue::typed("IFCLABEL", AttributeValue::string(s)),
            Self::Text(s) => AttributeValue::typed("IFCTEXT", AttributeValue::string(s)),
            Self::Boolean(b) => AttributeValue::typed("IFCBOOLEAN", AttributeValue::Boolean(*b)),
            Self::Integer(i) => AttributeValue::typed("IFCINTEGER", AttributeValue::Integer(*i)),
            Self::Real(v) => AttributeValue::typed("IFCREAL", AttributeValue::Float(*v)),
            Self::Length(v) => measure(session, UnitType::Length, *v)?,
            Self::Area(v) => measure(session, UnitType::Area, *v)?,
            Self::Volume(v) => measure(session, UnitType::Volume, *v)?,
            Self::PlaneAngle(v) => measure(session, UnitType::PlaneAngle, *v)?,
        };
        Ok(value)
    }
}

fn measure<F: EntityFactory>(session: &mut ExportSession<F>, unit_type: UnitType, value: f64) -> Result<AttributeValue> {
    let converted = session.convert_to_unit(unit_type, value)?;
    Ok(AttributeValue::typed(unit_type.measure_type(), AttributeValue::Float(converted)))
}

/// Named property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub value: PropertyValue,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Named list of properties attached to an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySetDescriptor {
    pub name: String,
    pub properties: Vec<PropertyDescriptor>,
}

impl PropertySetDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.push(PropertyDescriptor::new(name, value));
        self
    }
}

/// Cache key of a property set: its name and converted values
fn content_key(name: &str, values: &[(String, AttributeValue)]) -> String {
    let mut key = String::from(name);
    for (property, value) in values {
        let _ = write!(key, "\u{1f}{}={:?}", property, value);
    }
    key
}

/// IfcPropertySet for `set`, shared with any earlier set of equal content.
/// Returns `None` for an empty set.
pub fn create_property_set<F: EntityFactory>(
    session: &mut ExportSession<F>,
    set: &PropertySetDescriptor,
) -> Result<Option<EntityHandle>> {
    if set.properties.is_empty() {
        return Ok(None);
    }
    let mut values = Vec::with_capacity(set.properties.len());
    for property in &set.properties {
        values.push((property.name.clone(), property.value.to_attribute(session)?));
    }
    let key = content_key(&set.name, &values);
    if let Some(handle) = session.cache().property_sets.find(key.as_str()) {
        return Ok(Some(handle));
    }

    let mut properties = Vec::with_capacity(values.len());
    for (name, value) in values {
        properties.push(session.create(
            IfcType::IfcPropertySingleValue,
            vec![AttributeValue::string(name), AttributeValue::Null, value, AttributeValue::Null],
        )?);
    }
    let guid = session.new_guid(None);
    let owner_history = session.owner_history();
    let handle = session.create(
        IfcType::IfcPropertySet,
        vec![
            AttributeValue::string(guid),
            owner_history,
            AttributeValue::string(&set.name),
            AttributeValue::Null,
            AttributeValue::refs(&properties),
        ],
    )?;
    session.cache_mut().property_sets.register(key, handle);
    Ok(Some(handle))
}

/// Relate `product` to `property_set`, extending the existing relation
/// when the set is already in use
pub fn attach_property_set<F: EntityFactory>(
    session: &mut ExportSession<F>,
    property_set: EntityHandle,
    product: EntityHandle,
) -> Result<EntityHandle> {
    if let Some(relation) = session.cache().property_relations.find(&property_set) {
        session
            .factory_mut()
            .append_to_list(relation, RELATED_OBJECTS, vec![product.into()])?;
        return Ok(relation);
    }
    let guid = session.new_guid(None);
    let owner_history = session.owner_history();
    let relation = session.create(
        IfcType::IfcRelDefinesByProperties,
        vec![
            AttributeValue::string(guid),
            owner_history,
            AttributeValue::Null,
            AttributeValue::Null,
            AttributeValue::refs(&[product]),
            property_set.into(),
        ],
    )?;
    session.cache_mut().property_relations.register(property_set, relation);
    Ok(relation)
}

/// Write every non-empty set and attach it to `product`
pub fn export_property_sets<F: EntityFactory>(
    session: &mut ExportSession<F>,
    sets: &[PropertySetDescriptor],
    product: EntityHandle,
) -> Result<usize> {
    let mut attached = 0;
    for set in sets {
        if let Some(property_set) = create_property_set(session, set)? {
            attach_property_set(session, property_set, product)?;
            attached += 1;
        }
    }
    Ok(attached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ifc_export_core::{AngleUnit, EntityStore, IfcSchemaVersion, LengthUnit};
    use ifc_export_geometry::{GeometryOptions, Point3};

    fn session() -> ExportSession {
        let options = GeometryOptions {
            length_unit: LengthUnit::Millimetre,
            angle_unit: AngleUnit::Degree,
            ..GeometryOptions::default()
        };
        ExportSession::new(EntityStore::new(IfcSchemaVersion::Ifc4), options)
    }

    fn dimensions(width: f64) -> PropertySetDescriptor {
        PropertySetDescriptor::new("Pset_Dimensions")
            .with("Width", PropertyValue::Length(width))
            .with("IsExternal", PropertyValue::Boolean(true))
    }

    #[test]
    fn measures_are_converted_to_project_units() {
        let mut s = session();
        let pset = create_property_set(&mut s, &dimensions(0.25)).unwrap().unwrap();
        let properties = s.factory().entity(pset).unwrap().get_refs(4);
        assert_eq!(properties.len(), 2);
        let width = s.factory().entity(properties[0]).unwrap();
        match width.get(2).unwrap() {
            AttributeValue::Typed(name, inner) => {
                assert_eq!(name, "IFCLENGTHMEASURE");
                assert_relative_eq!(inner.as_float().unwrap(), 250.0, epsilon = 1e-9);
            }
            other => panic!("unexpected nominal value {:?}", other),
        }
    }

    #[test]
    fn equal_sets_share_one_relation() {
        let mut s = session();
        let a = s.create_point(&Point3::origin()).unwrap();
        let b = s.create_point(&Point3::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(export_property_sets(&mut s, &[dimensions(0.25)], a).unwrap(), 1);
        let count = s.factory().len();
        assert_eq!(export_property_sets(&mut s, &[dimensions(0.25)], b).unwrap(), 1);
        assert_eq!(s.factory().len(), count);

        let pset = create_property_set(&mut s, &dimensions(0.25)).unwrap().unwrap();
        let relation = s.cache().property_relations.find(&pset).unwrap();
        assert_eq!(s.factory().entity(relation).unwrap().get_refs(RELATED_OBJECTS), vec![a, b]);

        let other = create_property_set(&mut s, &dimensions(0.3)).unwrap().unwrap();
        assert_ne!(other, pset);
    }

    #[test]
    fn empty_sets_are_skipped() {
        let mut s = session();
        let product = s.create_point(&Point3::origin()).unwrap();
        let empty = PropertySetDescriptor::new("Pset_Empty");
        assert_eq!(export_property_sets(&mut s, &[empty], product).unwrap(), 0);
        assert!(s.cache().property_relations.is_empty());
    }
}

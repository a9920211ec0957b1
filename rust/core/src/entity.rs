// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constructed schema entities and the handles that refer to them.

use crate::schema::IfcType;
use crate::value::AttributeValue;
use std::fmt;

/// Opaque reference to a constructed schema entity.
///
/// Handles are unique within one output file and are written as `#id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(u32);

impl EntityHandle {
    /// Wrap a raw entity id
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw entity id (the number after `#`)
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A schema entity instance: its type and positional attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub ifc_type: IfcType,
    pub attributes: Vec<AttributeValue>,
}

impl Entity {
    /// Create a new entity
    pub fn new(ifc_type: IfcType, attributes: Vec<AttributeValue>) -> Self {
        Self {
            ifc_type,
            attributes,
        }
    }

    /// Get attribute by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference attribute
    #[inline]
    pub fn get_ref(&self, index: usize) -> Option<EntityHandle> {
        self.get(index).and_then(|a| a.as_entity_ref())
    }

    /// Get float attribute
    #[inline]
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|a| a.as_float())
    }

    /// Get string attribute
    #[inline]
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|a| a.as_string())
    }

    /// Get list attribute
    #[inline]
    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(|a| a.as_list())
    }

    /// Get the entity references of a list attribute
    pub fn get_refs(&self, index: usize) -> Vec<EntityHandle> {
        self.get_list(index)
            .map(|items| items.iter().filter_map(|v| v.as_entity_ref()).collect())
            .unwrap_or_default()
    }

    /// Visit every entity reference held by this entity, including nested lists
    pub fn for_each_ref(&self, mut f: impl FnMut(EntityHandle)) {
        for attr in &self.attributes {
            attr.for_each_ref(&mut f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_display() {
        assert_eq!(EntityHandle::new(42).to_string(), "#42");
    }

    #[test]
    fn nested_refs_are_visited() {
        let entity = Entity::new(
            IfcType::IfcPolyline,
            vec![AttributeValue::refs(&[
                EntityHandle::new(1),
                EntityHandle::new(2),
                EntityHandle::new(1),
            ])],
        );
        let mut seen = Vec::new();
        entity.for_each_ref(|h| seen.push(h.id()));
        assert_eq!(seen, vec![1, 2, 1]);
        assert_eq!(entity.get_refs(0).len(), 3);
    }
}

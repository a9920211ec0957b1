// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC entity attribute values

use crate::entity::EntityHandle;

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Entity reference: #123
    EntityRef(EntityHandle),
    /// String value: 'text'
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Boolean: .T. / .F.
    Boolean(bool),
    /// Enum value, stored without the surrounding dots
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value: IFCLENGTHMEASURE(2.5)
    Typed(String, Box<AttributeValue>),
    /// Null/undefined: $
    Null,
    /// Derived value: *
    Derived,
}

impl AttributeValue {
    /// String attribute
    pub fn string(s: impl Into<String>) -> Self {
        AttributeValue::String(s.into())
    }

    /// Optional string attribute, `$` when absent
    pub fn opt_string(s: Option<&str>) -> Self {
        s.map(Self::string).unwrap_or(AttributeValue::Null)
    }

    /// Enumeration attribute (dots are added on output)
    pub fn enumeration(s: impl Into<String>) -> Self {
        AttributeValue::Enum(s.into())
    }

    /// Typed value such as `IFCLABEL('x')`
    pub fn typed(type_name: impl Into<String>, value: AttributeValue) -> Self {
        AttributeValue::Typed(type_name.into(), Box::new(value))
    }

    /// Optional entity reference, `$` when absent
    pub fn opt_ref(handle: Option<EntityHandle>) -> Self {
        handle.map(AttributeValue::EntityRef).unwrap_or(AttributeValue::Null)
    }

    /// List of entity references
    pub fn refs(handles: &[EntityHandle]) -> Self {
        AttributeValue::List(handles.iter().copied().map(AttributeValue::EntityRef).collect())
    }

    /// List of floats
    pub fn floats(values: &[f64]) -> Self {
        AttributeValue::List(values.iter().copied().map(AttributeValue::Float).collect())
    }

    /// List of integers
    pub fn integers(values: &[i64]) -> Self {
        AttributeValue::List(values.iter().copied().map(AttributeValue::Integer).collect())
    }

    /// Get as entity reference
    #[inline]
    pub fn as_entity_ref(&self) -> Option<EntityHandle> {
        match self {
            AttributeValue::EntityRef(h) => Some(*h),
            _ => None,
        }
    }

    /// Get as string
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as enum value
    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Get as float (integers widen, typed values unwrap)
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Typed(_, inner) => inner.as_float(),
            _ => None,
        }
    }

    /// Get as integer
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as boolean
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as list
    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }

    /// Visit every entity reference contained in this value
    pub fn for_each_ref(&self, f: &mut impl FnMut(EntityHandle)) {
        match self {
            AttributeValue::EntityRef(h) => f(*h),
            AttributeValue::List(items) => {
                for item in items {
                    item.for_each_ref(f);
                }
            }
            AttributeValue::Typed(_, inner) => inner.for_each_ref(f),
            _ => {}
        }
    }
}

impl From<EntityHandle> for AttributeValue {
    fn from(h: EntityHandle) -> Self {
        AttributeValue::EntityRef(h)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Boolean(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_unwrap_to_float() {
        let v = AttributeValue::typed("IFCLENGTHMEASURE", AttributeValue::Float(2.5));
        assert_eq!(v.as_float(), Some(2.5));
        assert!(v.as_string().is_none());
    }

    #[test]
    fn optional_helpers() {
        assert!(AttributeValue::opt_ref(None).is_null());
        assert!(AttributeValue::opt_string(None).is_null());
        assert_eq!(
            AttributeValue::opt_string(Some("Body")).as_string(),
            Some("Body")
        );
    }
}

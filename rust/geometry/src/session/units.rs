// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit entities and the project unit assignment

use super::ExportSession;
use crate::cache::UnitInfo;
use crate::{Error, Result};
use ifc_export_core::{
    unit_descriptor, AngleUnit, AttributeValue, DimensionalExponents, EntityFactory, EntityHandle,
    IfcType, LengthUnit, SiPrefix, SiUnitName, UnitDefinition, UnitType,
};
use tracing::debug;

/// Unit types written into every project unit assignment
pub const PROJECT_UNIT_TYPES: [UnitType; 10] = [
    UnitType::Length,
    UnitType::Area,
    UnitType::Volume,
    UnitType::PlaneAngle,
    UnitType::Mass,
    UnitType::Time,
    UnitType::ThermodynamicTemperature,
    UnitType::LinearVelocity,
    UnitType::VolumetricFlowRate,
    UnitType::MassDensity,
];

impl<F: EntityFactory> ExportSession<F> {
    /// Unit entity for `unit_type`, created on first use
    pub fn unit(&mut self, unit_type: UnitType) -> Result<UnitInfo> {
        if let Some(info) = self.cache.unit(unit_type) {
            return Ok(info);
        }

        let descriptor = unit_descriptor(unit_type, self.options.length_unit, self.options.angle_unit);
        let handle = match &descriptor.definition {
            UnitDefinition::Si { prefix, name } => self.create_si_unit(unit_type, *prefix, *name)?,
            UnitDefinition::ConversionBased {
                name,
                exponents,
                factor,
                base,
            } => {
                let dimensions = self.dimensional_exponents(exponents)?;
                let si = self.si_base_unit(*base)?;
                let measure = self.create(
                    IfcType::IfcMeasureWithUnit,
                    vec![
                        AttributeValue::typed(base.measure_type(), AttributeValue::Float(*factor)),
                        si.into(),
                    ],
                )?;
                self.create(
                    IfcType::IfcConversionBasedUnit,
                    vec![
                        dimensions.into(),
                        AttributeValue::enumeration(unit_type.ifc_name()),
                        AttributeValue::string(*name),
                        measure.into(),
                    ],
                )?
            }
            UnitDefinition::Derived { elements } => {
                let mut parts = Vec::with_capacity(elements.len());
                for (element_type, exponent) in elements {
                    let base = self.unit(*element_type)?.handle;
                    parts.push(self.derived_unit_element(base, *exponent)?);
                }
                self.create(
                    IfcType::IfcDerivedUnit,
                    vec![
                        AttributeValue::refs(&parts),
                        AttributeValue::enumeration(unit_type.ifc_name()),
                        AttributeValue::Null,
                    ],
                )?
            }
        };

        debug!(?unit_type, %handle, "created unit");
        let info = UnitInfo::new(handle, descriptor.scale, descriptor.offset);
        self.cache.units.insert(unit_type, info);
        Ok(info)
    }

    /// Internal value expressed in the project unit of `unit_type`
    pub fn convert_to_unit(&mut self, unit_type: UnitType, value: f64) -> Result<f64> {
        Ok(self.unit(unit_type)?.convert(value))
    }

    /// IfcUnitAssignment holding every project unit
    pub fn unit_assignment(&mut self) -> Result<EntityHandle> {
        if let Some(handle) = self.cache.unit_assignment {
            return Ok(handle);
        }
        let mut units = Vec::with_capacity(PROJECT_UNIT_TYPES.len());
        for unit_type in PROJECT_UNIT_TYPES {
            units.push(self.unit(unit_type)?.handle);
        }
        let handle = self.create(IfcType::IfcUnitAssignment, vec![AttributeValue::refs(&units)])?;
        self.cache.unit_assignment = Some(handle);
        Ok(handle)
    }

    fn create_si_unit(
        &mut self,
        unit_type: UnitType,
        prefix: Option<SiPrefix>,
        name: SiUnitName,
    ) -> Result<EntityHandle> {
        self.create(
            IfcType::IfcSIUnit,
            vec![
                AttributeValue::Derived,
                AttributeValue::enumeration(unit_type.ifc_name()),
                prefix
                    .map(|p| AttributeValue::enumeration(p.as_str()))
                    .unwrap_or(AttributeValue::Null),
                AttributeValue::enumeration(name.as_str()),
            ],
        )
    }

    /// Unprefixed SI unit a conversion factor is measured in
    fn si_base_unit(&mut self, unit_type: UnitType) -> Result<EntityHandle> {
        if let Some(handle) = self.cache.si_base_units.find(&unit_type) {
            return Ok(handle);
        }
        let base = unit_descriptor(unit_type, LengthUnit::Metre, AngleUnit::Radian);
        let UnitDefinition::Si { prefix, name } = base.definition else {
            return Err(Error::InvariantViolation(format!(
                "{:?} has no SI base unit",
                unit_type
            )));
        };
        let handle = self.create_si_unit(unit_type, prefix, name)?;
        self.cache.si_base_units.register(unit_type, handle);
        Ok(handle)
    }

    fn dimensional_exponents(&mut self, exponents: &DimensionalExponents) -> Result<EntityHandle> {
        let key = exponents.as_array();
        if let Some(handle) = self.cache.dimensional_exponents.find(&key) {
            return Ok(handle);
        }
        let attributes = key.iter().map(|e| AttributeValue::Integer(*e)).collect();
        let handle = self.create(IfcType::IfcDimensionalExponents, attributes)?;
        self.cache.dimensional_exponents.register(key, handle);
        Ok(handle)
    }

    fn derived_unit_element(&mut self, unit: EntityHandle, exponent: i32) -> Result<EntityHandle> {
        let key = (unit, exponent);
        if let Some(handle) = self.cache.derived_unit_elements.find(&key) {
            return Ok(handle);
        }
        let handle = self.create(
            IfcType::IfcDerivedUnitElement,
            vec![unit.into(), AttributeValue::Integer(exponent as i64)],
        )?;
        self.cache.derived_unit_elements.register(key, handle);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::super::GeometryOptions;
    use super::*;
    use approx::assert_relative_eq;
    use ifc_export_core::{EntityStore, IfcSchemaVersion};

    fn session(length_unit: LengthUnit, angle_unit: AngleUnit) -> ExportSession {
        let options = GeometryOptions {
            length_unit,
            angle_unit,
            ..GeometryOptions::default()
        };
        ExportSession::new(EntityStore::new(IfcSchemaVersion::Ifc4), options)
    }

    #[test]
    fn millimetre_is_prefixed_si_unit() {
        let mut s = session(LengthUnit::Millimetre, AngleUnit::Radian);
        let info = s.unit(UnitType::Length).unwrap();
        let e = s.factory().entity(info.handle).unwrap();
        assert_eq!(e.ifc_type, IfcType::IfcSIUnit);
        assert_eq!(e.get(2).and_then(|v| v.as_enum()), Some("MILLI"));
        assert_eq!(e.get(3).and_then(|v| v.as_enum()), Some("METRE"));
        assert_relative_eq!(info.convert(1.5), 1500.0);
    }

    #[test]
    fn imperial_units_share_exponents_and_base() {
        let mut s = session(LengthUnit::Foot, AngleUnit::Degree);
        let length = s.unit(UnitType::Length).unwrap();
        let again = s.unit(UnitType::Length).unwrap();
        assert_eq!(length, again);
        let e = s.factory().entity(length.handle).unwrap();
        assert_eq!(e.ifc_type, IfcType::IfcConversionBasedUnit);
        assert_eq!(e.get_string(2), Some("FOOT"));

        s.unit(UnitType::PlaneAngle).unwrap();
        // Length and degree each get their own SI base unit
        assert_eq!(s.cache().si_base_units.len(), 2);
        assert_eq!(s.cache().dimensional_exponents.len(), 2);
    }

    #[test]
    fn derived_units_reuse_base_units() {
        let mut s = session(LengthUnit::Metre, AngleUnit::Radian);
        let density = s.unit(UnitType::MassDensity).unwrap();
        let mass = s.unit(UnitType::Mass).unwrap();
        let e = s.factory().entity(density.handle).unwrap();
        let elements = e.get_refs(0);
        assert_eq!(elements.len(), 2);
        let first = s.factory().entity(elements[0]).unwrap();
        assert_eq!(first.get_ref(0), Some(mass.handle));
    }

    #[test]
    fn temperature_conversion_has_offset() {
        let mut s = session(LengthUnit::Metre, AngleUnit::Radian);
        assert_relative_eq!(
            s.convert_to_unit(UnitType::ThermodynamicTemperature, 273.15).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn assignment_is_created_once() {
        let mut s = session(LengthUnit::Millimetre, AngleUnit::Degree);
        let a = s.unit_assignment().unwrap();
        let count = s.factory().len();
        assert_eq!(s.unit_assignment().unwrap(), a);
        assert_eq!(s.factory().len(), count);
        assert_eq!(s.factory().entity(a).unwrap().get_refs(0).len(), PROJECT_UNIT_TYPES.len());
    }

    #[test]
    fn rollback_forgets_units() {
        let mut s = session(LengthUnit::Foot, AngleUnit::Radian);
        let mark = s.begin_transaction();
        s.unit(UnitType::Area).unwrap();
        s.rollback(&mark);
        assert!(s.unit_info(UnitType::Area).is_none());
        assert!(s.cache().si_base_units.is_empty());
        assert!(s.factory().is_empty());
    }
}

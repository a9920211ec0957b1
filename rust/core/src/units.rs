// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit descriptor tables
//!
//! Static mapping from a semantic unit type to the IFC unit that represents
//! it in the output file, together with the affine conversion from host
//! internal units (metre, radian, kilogram, second, kelvin) to that unit.
//! Entity construction from these descriptors happens in the export session.

/// SI Prefix multipliers as defined in IFC specification
/// Maps IfcSIPrefix enum values to their numeric multipliers
#[inline]
pub fn get_si_prefix_multiplier(prefix: &str) -> f64 {
    match prefix {
        "ATTO" => 1e-18,
        "FEMTO" => 1e-15,
        "PICO" => 1e-12,
        "NANO" => 1e-9,
        "MICRO" => 1e-6,
        "MILLI" => 1e-3,
        "CENTI" => 1e-2,
        "DECI" => 1e-1,
        "DECA" => 1e1,
        "HECTO" => 1e2,
        "KILO" => 1e3,
        "MEGA" => 1e6,
        "GIGA" => 1e9,
        "TERA" => 1e12,
        "PETA" => 1e15,
        "EXA" => 1e18,
        _ => 1.0,
    }
}

/// IfcSIPrefix values used by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiPrefix {
    Kilo,
    Centi,
    Milli,
}

impl SiPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kilo => "KILO",
            Self::Centi => "CENTI",
            Self::Milli => "MILLI",
        }
    }

    pub fn multiplier(&self) -> f64 {
        get_si_prefix_multiplier(self.as_str())
    }
}

/// IfcSIUnitName values used by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiUnitName {
    Metre,
    SquareMetre,
    CubicMetre,
    Radian,
    Gram,
    Second,
    DegreeCelsius,
}

impl SiUnitName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metre => "METRE",
            Self::SquareMetre => "SQUARE_METRE",
            Self::CubicMetre => "CUBIC_METRE",
            Self::Radian => "RADIAN",
            Self::Gram => "GRAM",
            Self::Second => "SECOND",
            Self::DegreeCelsius => "DEGREE_CELSIUS",
        }
    }
}

/// Semantic unit type, the key of the unit tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitType {
    Length,
    Area,
    Volume,
    PlaneAngle,
    Mass,
    Time,
    ThermodynamicTemperature,
    LinearVelocity,
    VolumetricFlowRate,
    MassDensity,
}

impl UnitType {
    /// IfcUnitEnum / IfcDerivedUnitEnum literal
    pub fn ifc_name(&self) -> &'static str {
        match self {
            Self::Length => "LENGTHUNIT",
            Self::Area => "AREAUNIT",
            Self::Volume => "VOLUMEUNIT",
            Self::PlaneAngle => "PLANEANGLEUNIT",
            Self::Mass => "MASSUNIT",
            Self::Time => "TIMEUNIT",
            Self::ThermodynamicTemperature => "THERMODYNAMICTEMPERATUREUNIT",
            Self::LinearVelocity => "LINEARVELOCITYUNIT",
            Self::VolumetricFlowRate => "VOLUMETRICFLOWRATEUNIT",
            Self::MassDensity => "MASSDENSITYUNIT",
        }
    }

    /// Measure type used for values in this unit
    pub fn measure_type(&self) -> &'static str {
        match self {
            Self::Length => "IFCLENGTHMEASURE",
            Self::Area => "IFCAREAMEASURE",
            Self::Volume => "IFCVOLUMEMEASURE",
            Self::PlaneAngle => "IFCPLANEANGLEMEASURE",
            Self::Mass => "IFCMASSMEASURE",
            Self::Time => "IFCTIMEMEASURE",
            Self::ThermodynamicTemperature => "IFCTHERMODYNAMICTEMPERATUREMEASURE",
            Self::LinearVelocity => "IFCLINEARVELOCITYMEASURE",
            Self::VolumetricFlowRate => "IFCVOLUMETRICFLOWRATEMEASURE",
            Self::MassDensity => "IFCMASSDENSITYMEASURE",
        }
    }
}

/// Project length unit selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthUnit {
    Metre,
    Centimetre,
    Millimetre,
    Foot,
    Inch,
}

impl LengthUnit {
    /// Size of one unit in metres
    pub fn metres(&self) -> f64 {
        match self {
            Self::Metre => 1.0,
            Self::Centimetre => SiPrefix::Centi.multiplier(),
            Self::Millimetre => SiPrefix::Milli.multiplier(),
            Self::Foot => 0.3048,
            Self::Inch => 0.0254,
        }
    }

    fn is_imperial(&self) -> bool {
        matches!(self, Self::Foot | Self::Inch)
    }
}

/// Project angle unit selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AngleUnit {
    Radian,
    Degree,
}

/// Exponents of the seven SI base quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DimensionalExponents {
    pub length: i32,
    pub mass: i32,
    pub time: i32,
    pub electric_current: i32,
    pub temperature: i32,
    pub substance: i32,
    pub luminous_intensity: i32,
}

impl DimensionalExponents {
    pub const DIMENSIONLESS: Self = Self::length_power(0);
    pub const LENGTH: Self = Self::length_power(1);
    pub const AREA: Self = Self::length_power(2);
    pub const VOLUME: Self = Self::length_power(3);

    const fn length_power(length: i32) -> Self {
        Self {
            length,
            mass: 0,
            time: 0,
            electric_current: 0,
            temperature: 0,
            substance: 0,
            luminous_intensity: 0,
        }
    }

    /// Attribute order of IfcDimensionalExponents
    pub fn as_array(&self) -> [i64; 7] {
        [
            self.length as i64,
            self.mass as i64,
            self.time as i64,
            self.electric_current as i64,
            self.temperature as i64,
            self.substance as i64,
            self.luminous_intensity as i64,
        ]
    }
}

/// How a unit is expressed in the schema
#[derive(Debug, Clone, PartialEq)]
pub enum UnitDefinition {
    /// IfcSIUnit
    Si {
        prefix: Option<SiPrefix>,
        name: SiUnitName,
    },
    /// IfcConversionBasedUnit over an SI unit
    ConversionBased {
        name: &'static str,
        exponents: DimensionalExponents,
        /// Size of one unit expressed in the SI base unit
        factor: f64,
        base: UnitType,
    },
    /// IfcDerivedUnit built from other unit types raised to exponents
    Derived { elements: Vec<(UnitType, i32)> },
}

/// One row of the unit table
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDescriptor {
    pub unit_type: UnitType,
    pub definition: UnitDefinition,
    /// Multiplier from host internal units to this unit
    pub scale: f64,
    /// Offset added after scaling (temperature scales)
    pub offset: f64,
}

/// Look up the unit table row for a unit type under the project unit settings
pub fn unit_descriptor(unit_type: UnitType, length: LengthUnit, angle: AngleUnit) -> UnitDescriptor {
    let si = |prefix: Option<SiPrefix>, name: SiUnitName| UnitDefinition::Si { prefix, name };

    let (definition, scale, offset) = match unit_type {
        UnitType::Length => match length {
            LengthUnit::Metre => (si(None, SiUnitName::Metre), 1.0, 0.0),
            LengthUnit::Centimetre => (si(Some(SiPrefix::Centi), SiUnitName::Metre), 100.0, 0.0),
            LengthUnit::Millimetre => (si(Some(SiPrefix::Milli), SiUnitName::Metre), 1000.0, 0.0),
            LengthUnit::Foot | LengthUnit::Inch => (
                UnitDefinition::ConversionBased {
                    name: if length == LengthUnit::Foot { "FOOT" } else { "INCH" },
                    exponents: DimensionalExponents::LENGTH,
                    factor: length.metres(),
                    base: UnitType::Length,
                },
                1.0 / length.metres(),
                0.0,
            ),
        },
        UnitType::Area if length.is_imperial() => {
            let factor = length.metres().powi(2);
            (
                UnitDefinition::ConversionBased {
                    name: if length == LengthUnit::Foot { "SQUARE FOOT" } else { "SQUARE INCH" },
                    exponents: DimensionalExponents::AREA,
                    factor,
                    base: UnitType::Area,
                },
                1.0 / factor,
                0.0,
            )
        }
        UnitType::Area => (si(None, SiUnitName::SquareMetre), 1.0, 0.0),
        UnitType::Volume if length.is_imperial() => {
            let factor = length.metres().powi(3);
            (
                UnitDefinition::ConversionBased {
                    name: if length == LengthUnit::Foot { "CUBIC FOOT" } else { "CUBIC INCH" },
                    exponents: DimensionalExponents::VOLUME,
                    factor,
                    base: UnitType::Volume,
                },
                1.0 / factor,
                0.0,
            )
        }
        UnitType::Volume => (si(None, SiUnitName::CubicMetre), 1.0, 0.0),
        UnitType::PlaneAngle => match angle {
            AngleUnit::Radian => (si(None, SiUnitName::Radian), 1.0, 0.0),
            AngleUnit::Degree => (
                UnitDefinition::ConversionBased {
                    name: "DEGREE",
                    exponents: DimensionalExponents::DIMENSIONLESS,
                    factor: std::f64::consts::PI / 180.0,
                    base: UnitType::PlaneAngle,
                },
                180.0 / std::f64::consts::PI,
                0.0,
            ),
        },
        UnitType::Mass => (si(Some(SiPrefix::Kilo), SiUnitName::Gram), 1.0, 0.0),
        UnitType::Time => (si(None, SiUnitName::Second), 1.0, 0.0),
        UnitType::ThermodynamicTemperature => {
            (si(None, SiUnitName::DegreeCelsius), 1.0, -273.15)
        }
        UnitType::LinearVelocity => {
            derived(&[(UnitType::Length, 1), (UnitType::Time, -1)], length, angle)
        }
        UnitType::VolumetricFlowRate => {
            derived(&[(UnitType::Volume, 1), (UnitType::Time, -1)], length, angle)
        }
        UnitType::MassDensity => {
            derived(&[(UnitType::Mass, 1), (UnitType::Volume, -1)], length, angle)
        }
    };

    UnitDescriptor {
        unit_type,
        definition,
        scale,
        offset,
    }
}

fn derived(
    elements: &[(UnitType, i32)],
    length: LengthUnit,
    angle: AngleUnit,
) -> (UnitDefinition, f64, f64) {
    let scale = elements
        .iter()
        .map(|(t, exp)| unit_descriptor(*t, length, angle).scale.powi(*exp))
        .product();
    (
        UnitDefinition::Derived {
            elements: elements.to_vec(),
        },
        scale,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn prefix_multipliers() {
        assert_eq!(get_si_prefix_multiplier("MILLI"), 1e-3);
        assert_eq!(get_si_prefix_multiplier("KILO"), 1e3);
        assert_eq!(get_si_prefix_multiplier(""), 1.0);
    }

    #[test]
    fn millimetre_project() {
        let d = unit_descriptor(UnitType::Length, LengthUnit::Millimetre, AngleUnit::Radian);
        assert_relative_eq!(d.scale, 1000.0);
        assert_eq!(
            d.definition,
            UnitDefinition::Si {
                prefix: Some(SiPrefix::Milli),
                name: SiUnitName::Metre
            }
        );
        // Areas stay in square metres for metric projects
        let a = unit_descriptor(UnitType::Area, LengthUnit::Millimetre, AngleUnit::Radian);
        assert_relative_eq!(a.scale, 1.0);
    }

    #[test]
    fn imperial_and_degree_conversions() {
        let ft = unit_descriptor(UnitType::Length, LengthUnit::Foot, AngleUnit::Degree);
        assert_relative_eq!(ft.scale * 0.3048, 1.0, epsilon = 1e-12);
        let vol = unit_descriptor(UnitType::Volume, LengthUnit::Foot, AngleUnit::Degree);
        assert_relative_eq!(vol.scale, 35.314666721488585, epsilon = 1e-9);
        let deg = unit_descriptor(UnitType::PlaneAngle, LengthUnit::Foot, AngleUnit::Degree);
        assert_relative_eq!(deg.scale * std::f64::consts::PI, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn derived_scales_compose() {
        let d = unit_descriptor(UnitType::MassDensity, LengthUnit::Foot, AngleUnit::Radian);
        let vol = unit_descriptor(UnitType::Volume, LengthUnit::Foot, AngleUnit::Radian);
        assert_relative_eq!(d.scale, 1.0 / vol.scale, epsilon = 1e-12);
        assert!(matches!(d.definition, UnitDefinition::Derived { .. }));
    }

    #[test]
    fn temperature_has_offset() {
        let t = unit_descriptor(
            UnitType::ThermodynamicTemperature,
            LengthUnit::Metre,
            AngleUnit::Radian,
        );
        assert_relative_eq!(273.15 * t.scale + t.offset, 0.0, epsilon = 1e-12);
    }
}

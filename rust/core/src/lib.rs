// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Export Core
//!
//! Schema entity model for the IFC exporter. This crate is the output side of
//! the export pipeline: geometry code asks an [`EntityFactory`] to construct
//! schema entities and receives opaque [`EntityHandle`]s back.
//!
//! ## Overview
//!
//! - **Entity model**: [`IfcType`], [`AttributeValue`], [`Entity`]
//! - **Entity factory**: the [`EntityFactory`] trait and the in-memory
//!   [`EntityStore`] with checkpoint/rollback for per-element transactions
//! - **STEP emission**: ISO-10303-21 text output from an [`EntityStore`]
//! - **GUIDs**: IFC 22-character compressed GUIDs
//! - **Units**: unit descriptor tables keyed by [`UnitType`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ifc_export_core::{AttributeValue, EntityFactory, EntityStore, IfcSchemaVersion, IfcType};
//!
//! let mut store = EntityStore::new(IfcSchemaVersion::Ifc4);
//! let point = store
//!     .create(IfcType::IfcCartesianPoint, vec![AttributeValue::floats(&[0.0, 0.0, 0.0])])
//!     .unwrap();
//! assert_eq!(point.to_string(), "#1");
//! ```

pub mod entity;
pub mod error;
pub mod factory;
pub mod guid;
pub mod schema;
pub mod step;
pub mod store;
pub mod units;
pub mod value;

pub use entity::{Entity, EntityHandle};
pub use error::{Error, Result};
pub use factory::{Checkpoint, EntityFactory};
pub use guid::{compress_guid, expand_guid, is_valid_guid, new_guid};
pub use schema::{IfcSchemaVersion, IfcType, ModelView};
pub use step::StepHeader;
pub use store::EntityStore;
pub use units::{
    get_si_prefix_multiplier, unit_descriptor, AngleUnit, DimensionalExponents, LengthUnit,
    SiPrefix, SiUnitName, UnitDefinition, UnitDescriptor, UnitType,
};
pub use value::AttributeValue;

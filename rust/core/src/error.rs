// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::entity::EntityHandle;
use crate::schema::{IfcSchemaVersion, IfcType};
use thiserror::Error;

/// Result type for entity construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the entity factory
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{ifc_type} is not available in schema {schema}")]
    NotInSchema {
        ifc_type: IfcType,
        schema: IfcSchemaVersion,
    },

    #[error("{ifc_type} references {target}, which does not exist")]
    DanglingReference {
        ifc_type: IfcType,
        target: EntityHandle,
    },

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityHandle),

    #[error("Attribute {index} of {handle} is out of range")]
    AttributeOutOfRange { handle: EntityHandle, index: usize },

    #[error("Attribute {index} of {handle} is not a list")]
    NotAList { handle: EntityHandle, index: usize },

    #[error("Invalid GUID: {0}")]
    InvalidGuid(String),
}

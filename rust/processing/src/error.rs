// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for the export driver
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Errors raised while exporting elements
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error(transparent)]
    Geometry(#[from] ifc_export_geometry::Error),

    #[error("Schema entity error: {0}")]
    Schema(#[from] ifc_export_core::Error),

    #[error("Element {0} has no exportable body")]
    NoRepresentation(String),

    #[error("Element {0} has clip faces but its clipped body cannot be written")]
    ClippingNotRepresentable(String),

    #[error("Spatial structure has not been created")]
    MissingSpatialStructure,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProcessingError {
    /// Whether the error aborts the export session
    pub fn is_fatal(&self) -> bool {
        match self {
            ProcessingError::Geometry(e) => e.is_fatal(),
            ProcessingError::MissingSpatialStructure => true,
            _ => false,
        }
    }
}

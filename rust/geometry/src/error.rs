// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while translating geometry.
///
/// The variant decides how the exporter reacts: [`Error::Unsupported`] asks
/// the caller to try a fallback representation, the topology and profile
/// variants fail the current element, and [`Error::Fatal`] aborts the whole
/// session.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported geometry: {0}")]
    Unsupported(String),

    #[error("Clip plane is perpendicular to the extrusion axis")]
    ClipPlanePerpendicular,

    #[error("Inconsistent clip orientation: {0}")]
    InconsistentClipOrientation(String),

    #[error("Unsupported topology: {0}")]
    UnsupportedTopology(String),

    #[error("Mismatched opening profiles: {0}")]
    MismatchedProfiles(String),

    #[error("Curve loop is not connected after segment {0}")]
    DisconnectedLoop(usize),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Geometry kernel error: {0}")]
    Kernel(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Fatal export error: {0}")]
    Fatal(String),

    #[error("Schema entity error: {0}")]
    Schema(#[from] ifc_export_core::Error),
}

impl Error {
    /// Whether the error aborts the export session
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Fatal(_))
    }

    /// Whether a fallback representation should be attempted
    pub fn is_soft(&self) -> bool {
        matches!(self, Error::Unsupported(_) | Error::TriangulationError(_))
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Error::Unsupported(msg.into())
    }

    pub(crate) fn kernel(msg: impl Into<String>) -> Self {
        Error::Kernel(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_is_decided_by_variant() {
        assert!(Error::Fatal("out of memory".into()).is_fatal());
        assert!(!Error::ClipPlanePerpendicular.is_fatal());
        assert!(Error::unsupported("spline").is_soft());
        assert!(!Error::MismatchedProfiles("radius".into()).is_soft());
        let schema: Error = ifc_export_core::Error::InvalidGuid("x".into()).into();
        assert!(!schema.is_fatal() && !schema.is_soft());
    }
}

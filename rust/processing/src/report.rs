// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export outcome counters

use crate::error::Result;
use serde::Serialize;

/// Why one element was not exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementFailure {
    pub element_id: String,
    pub reason: String,
}

/// Summary of one export session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Elements written with a product entity
    pub exported: usize,
    /// Elements with nothing to write, such as fully clipped bodies
    pub skipped: usize,
    /// Exported elements whose body fell back to a tessellation
    pub degraded: usize,
    pub groups: usize,
    pub documents: usize,
    pub failures: Vec<ElementFailure>,
}

impl ExportReport {
    pub fn record_failure(&mut self, element_id: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(ElementFailure {
            element_id: element_id.into(),
            reason: reason.into(),
        });
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_serialize_with_reason() {
        let mut report = ExportReport {
            exported: 2,
            ..ExportReport::default()
        };
        report.record_failure("w7", "Clip plane is perpendicular to the extrusion axis");
        assert_eq!(report.failed(), 1);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"element_id\": \"w7\""));
        assert!(json.contains("\"exported\": 2"));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Export Processing
//!
//! The export driver on top of the geometry pipeline: options, the host
//! element model, spatial structure, property sets and the per-element
//! transaction loop.
//!
//! ```rust
//! use ifc_export_core::EntityStore;
//! use ifc_export_geometry::{BrepSolid, Plane, Point3, Tolerance};
//! use ifc_export_processing::{Document, ElementCategory, ExportElement, ExportOptions, Exporter};
//!
//! let options = ExportOptions::default();
//! let solid = BrepSolid::cuboid(Point3::origin(), Point3::new(4.0, 0.2, 3.0), Tolerance::default()).unwrap();
//! let mut document = Document::new("Main");
//! document.elements.push(ExportElement::new("wall-1", ElementCategory::Wall, solid, Plane::xy()));
//!
//! let mut exporter = Exporter::new(EntityStore::new(options.schema), options).unwrap();
//! exporter.export_document(&document).unwrap();
//! let (store, report) = exporter.finish();
//! assert_eq!(report.exported, 1);
//! assert!(store.to_step(&Default::default()).contains("IFCWALL("));
//! ```

pub mod config;
pub mod element;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod properties;
pub mod report;
pub mod spatial;

pub use config::ExportOptions;
pub use element::{Document, ElementCategory, ExportElement, GroupDescriptor};
pub use error::{ProcessingError, Result};
pub use exporter::Exporter;
pub use logging::init_logging;
pub use properties::{
    attach_property_set, create_property_set, export_property_sets, PropertyDescriptor, PropertySetDescriptor,
    PropertyValue,
};
pub use report::{ElementFailure, ExportReport};
pub use spatial::{owner_history, SpatialStructure};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export session
//!
//! [`ExportSession`] owns the entity factory, the caches and the geometry
//! options of one export. Every translation entry point hangs off it, so no
//! state lives in globals.

mod clipping;
mod curves;
mod placement;
mod profiles;
mod representation;
mod styles;
mod units;

pub use curves::merge_degenerate_points;
pub use profiles::{ExtrudedSolid, ExtrusionProfile};
pub use representation::{RepresentationKind, TessellatedBody};
pub use styles::MaterialInfo;

use crate::cache::{CacheMark, ExporterCache, UnitInfo};
use crate::tolerance::Tolerance;
use crate::Result;
use ifc_export_core::{
    AngleUnit, AttributeValue, EntityFactory, EntityHandle, EntityStore, IfcSchemaVersion, IfcType,
    LengthUnit, ModelView, UnitType,
};

/// Options steering geometry translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryOptions {
    pub view: ModelView,
    pub tolerance: Tolerance,
    pub length_unit: LengthUnit,
    pub angle_unit: AngleUnit,
    /// Write every boundary as a flat polyline
    pub force_simple_boundary: bool,
    /// Append a bounding box representation next to each body
    pub export_bounding_box: bool,
    /// Create the plan context for footprint and annotation geometry
    pub export_plan_representations: bool,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            view: ModelView::DesignTransferView,
            tolerance: Tolerance::default(),
            length_unit: LengthUnit::Millimetre,
            angle_unit: AngleUnit::Degree,
            force_simple_boundary: false,
            export_bounding_box: true,
            export_plan_representations: false,
        }
    }
}

/// One export: factory, caches and options
#[derive(Debug)]
pub struct ExportSession<F: EntityFactory = EntityStore> {
    factory: F,
    cache: ExporterCache,
    options: GeometryOptions,
}

impl<F: EntityFactory> ExportSession<F> {
    pub fn new(factory: F, options: GeometryOptions) -> Self {
        Self {
            factory,
            cache: ExporterCache::new(),
            options,
        }
    }

    #[inline]
    pub fn schema(&self) -> IfcSchemaVersion {
        self.factory.schema()
    }

    #[inline]
    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        &self.options.tolerance
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn cache(&self) -> &ExporterCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ExporterCache {
        &mut self.cache
    }

    /// Construct an entity through the factory
    pub fn create(&mut self, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> Result<EntityHandle> {
        Ok(self.factory.create(ifc_type, attributes)?)
    }

    /// Start of a unit of work that may be rolled back
    pub fn begin_transaction(&self) -> CacheMark {
        self.cache.mark(self.factory.checkpoint())
    }

    /// Discard every entity, cache entry and GUID created since `mark`.
    /// Returns the number of discarded entities.
    pub fn rollback(&mut self, mark: &CacheMark) -> usize {
        self.cache.rollback(mark);
        self.factory.rollback(mark.checkpoint)
    }

    /// Keep everything created since `mark` and release its undo history.
    /// Only for the outermost transaction.
    pub fn commit(&mut self, mark: &CacheMark) {
        self.factory.commit(mark.checkpoint);
    }

    /// Reserve a GlobalId, repairing duplicates
    pub fn new_guid(&mut self, requested: Option<&str>) -> String {
        self.cache.guids.register(requested)
    }

    /// Owner history reference for rooted entities
    pub fn owner_history(&self) -> AttributeValue {
        AttributeValue::opt_ref(self.cache.owner_history)
    }

    /// Internal length (metres) in project units
    #[inline]
    pub fn scale_length(&self, value: f64) -> f64 {
        value / self.options.length_unit.metres()
    }

    /// Internal angle (radians) in project units
    #[inline]
    pub fn scale_angle(&self, value: f64) -> f64 {
        match self.options.angle_unit {
            AngleUnit::Radian => value,
            AngleUnit::Degree => value.to_degrees(),
        }
    }

    /// Registered unit, if any
    pub fn unit_info(&self, unit_type: UnitType) -> Option<UnitInfo> {
        self.cache.unit(unit_type)
    }

    /// Reset per-document caches before exporting a linked document
    pub fn clear_for_linked_document(&mut self) {
        self.cache.clear_for_linked_document();
    }

    /// End the session and hand back the factory
    pub fn finish(mut self) -> F {
        self.cache.clear();
        self.factory
    }
}

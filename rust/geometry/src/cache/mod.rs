// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export session caches
//!
//! Every cache maps a key to the handle of an entity already written, so the
//! session creates at most one entity per distinct key. All caches can drop
//! the entries created after a factory checkpoint; a rolled-back element
//! leaves nothing behind.

mod allocated;
mod guid;

pub use allocated::{AllocatedGeometryCache, AllocatedId};
pub use guid::GuidRegistry;

use ifc_export_core::{Checkpoint, EntityHandle, UnitType};
use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::hash::Hash;

/// Handles keyed by value
#[derive(Debug, Clone)]
pub struct EntityCache<K> {
    map: FxHashMap<K, EntityHandle>,
}

impl<K> Default for EntityCache<K> {
    fn default() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash> EntityCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find<Q>(&self, key: &Q) -> Option<EntityHandle>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.get(key).copied()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Record a handle, replacing any earlier one for the key
    pub fn register(&mut self, key: K, handle: EntityHandle) {
        self.map.insert(key, handle);
    }

    /// Cached handle for `key`, or the result of `create`.
    ///
    /// `create` runs only on a miss. A `None` result (nothing could be
    /// built) is passed through without being cached.
    pub fn get_or_create<E>(
        &mut self,
        key: K,
        create: impl FnOnce() -> Result<Option<EntityHandle>, E>,
    ) -> Result<Option<EntityHandle>, E> {
        if let Some(handle) = self.map.get(&key) {
            return Ok(Some(*handle));
        }
        let created = create()?;
        if let Some(handle) = created {
            self.map.insert(key, handle);
        }
        Ok(created)
    }

    /// Drop entries whose entity was created after `checkpoint`
    pub fn retain_before(&mut self, checkpoint: &Checkpoint) {
        self.map.retain(|_, h| !checkpoint.is_after(*h));
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, EntityHandle)> {
        self.map.iter().map(|(k, h)| (k, *h))
    }
}

/// A written unit and its conversion from internal values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitInfo {
    pub handle: EntityHandle,
    pub scale: f64,
    pub offset: f64,
}

impl UnitInfo {
    pub fn new(handle: EntityHandle, scale: f64, offset: f64) -> Self {
        Self {
            handle,
            scale,
            offset,
        }
    }

    /// Internal value in this unit
    #[inline]
    pub fn convert(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }
}

/// Host element ids and the products written for them, both ways
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    by_element: FxHashMap<String, EntityHandle>,
    by_handle: FxHashMap<EntityHandle, String>,
}

impl ElementRegistry {
    pub fn register(&mut self, element_id: impl Into<String>, handle: EntityHandle) {
        let element_id = element_id.into();
        if let Some(old) = self.by_element.insert(element_id.clone(), handle) {
            self.by_handle.remove(&old);
        }
        self.by_handle.insert(handle, element_id);
    }

    pub fn handle_of(&self, element_id: &str) -> Option<EntityHandle> {
        self.by_element.get(element_id).copied()
    }

    pub fn element_of(&self, handle: EntityHandle) -> Option<&str> {
        self.by_handle.get(&handle).map(String::as_str)
    }

    pub fn retain_before(&mut self, checkpoint: &Checkpoint) {
        self.by_element.retain(|_, h| !checkpoint.is_after(*h));
        self.by_handle.retain(|h, _| !checkpoint.is_after(*h));
    }

    pub fn clear(&mut self) {
        self.by_element.clear();
        self.by_handle.clear();
    }

    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }
}

/// Quantized direction used as a cache key
pub type DirectionKey = [i64; 3];

/// Direction components rounded to 1e-9
pub fn direction_key(x: f64, y: f64, z: f64) -> DirectionKey {
    let q = |v: f64| (v * 1e9).round() as i64;
    [q(x), q(y), q(z)]
}

/// All caches of one export session
#[derive(Debug, Default)]
pub struct ExporterCache {
    /// Representation contexts by (identifier, type)
    pub contexts: EntityCache<(String, String)>,
    pub units: FxHashMap<UnitType, UnitInfo>,
    pub unit_assignment: Option<EntityHandle>,
    /// Derived unit elements by (base unit, exponent)
    pub derived_unit_elements: EntityCache<(EntityHandle, i32)>,
    /// SI units conversion-based units are defined over
    pub si_base_units: EntityCache<UnitType>,
    pub dimensional_exponents: EntityCache<[i64; 7]>,
    /// Materials by host material id
    pub materials: EntityCache<String>,
    /// Material association relation by material
    pub material_relations: EntityCache<EntityHandle>,
    /// Surface styles by host material id
    pub surface_styles: EntityCache<String>,
    pub presentation_layers: EntityCache<String>,
    /// Property sets by content key
    pub property_sets: EntityCache<String>,
    /// Defining relation by property set
    pub property_relations: EntityCache<EntityHandle>,
    pub directions: EntityCache<DirectionKey>,
    pub elements: ElementRegistry,
    pub guids: GuidRegistry,
    pub owner_history: Option<EntityHandle>,
    /// Shared site, kept across linked documents
    pub site: Option<EntityHandle>,
    pub allocated: AllocatedGeometryCache,
}

/// State of the caches at the start of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMark {
    pub checkpoint: Checkpoint,
    guids: usize,
    allocated: usize,
}

impl ExporterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(&self, unit_type: UnitType) -> Option<UnitInfo> {
        self.units.get(&unit_type).copied()
    }

    /// Mark the caches together with the factory checkpoint
    pub fn mark(&self, checkpoint: Checkpoint) -> CacheMark {
        CacheMark {
            checkpoint,
            guids: self.guids.mark(),
            allocated: self.allocated.mark(),
        }
    }

    /// Forget everything created after `mark`
    pub fn rollback(&mut self, mark: &CacheMark) {
        let checkpoint = &mark.checkpoint;
        self.contexts.retain_before(checkpoint);
        self.units.retain(|_, u| !checkpoint.is_after(u.handle));
        if self.unit_assignment.map_or(false, |h| checkpoint.is_after(h)) {
            self.unit_assignment = None;
        }
        self.derived_unit_elements
            .map
            .retain(|(base, _), h| !checkpoint.is_after(*base) && !checkpoint.is_after(*h));
        self.dimensional_exponents.retain_before(checkpoint);
        self.si_base_units.retain_before(checkpoint);
        self.materials.retain_before(checkpoint);
        self.material_relations.retain_before(checkpoint);
        self.surface_styles.retain_before(checkpoint);
        self.presentation_layers.retain_before(checkpoint);
        self.property_sets.retain_before(checkpoint);
        self.property_relations.retain_before(checkpoint);
        self.directions.retain_before(checkpoint);
        self.elements.retain_before(checkpoint);
        self.guids.truncate(mark.guids);
        self.allocated.truncate(mark.allocated);
        if self.owner_history.map_or(false, |h| checkpoint.is_after(h)) {
            self.owner_history = None;
        }
        if self.site.map_or(false, |h| checkpoint.is_after(h)) {
            self.site = None;
        }
    }

    /// Reset for the next document of the same output. Contexts, units,
    /// directions, GUIDs and the site stay; per-document entries go.
    pub fn clear_for_linked_document(&mut self) {
        self.materials.clear();
        self.material_relations.clear();
        self.surface_styles.clear();
        self.presentation_layers.clear();
        self.property_sets.clear();
        self.property_relations.clear();
        self.elements.clear();
        self.allocated.clear();
    }

    /// Reset at session end
    pub fn clear(&mut self) {
        self.clear_for_linked_document();
        self.contexts.clear();
        self.units.clear();
        self.unit_assignment = None;
        self.derived_unit_elements.clear();
        self.dimensional_exponents.clear();
        self.si_base_units.clear();
        self.directions.clear();
        self.guids.clear();
        self.owner_history = None;
        self.site = None;
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory entity store
//!
//! Entities are numbered densely from `#1`. Creation validates schema
//! availability and referential integrity, so a store can never hold a
//! dangling reference. Modifications of existing entities are journaled so
//! that [`EntityFactory::rollback`] restores them together with discarding
//! newer entities.

use crate::entity::{Entity, EntityHandle};
use crate::error::{Error, Result};
use crate::factory::{Checkpoint, EntityFactory};
use crate::schema::{IfcSchemaVersion, IfcType};
use crate::step::{encode_entity, StepHeader};
use crate::value::AttributeValue;
use rustc_hash::FxHashMap;

/// Undo record of one modification
#[derive(Debug, Clone)]
enum JournalEntry {
    /// Items appended to a list; `previous_len` is `None` when the
    /// attribute was `$` before the append
    Appended {
        handle: EntityHandle,
        index: usize,
        previous_len: Option<usize>,
    },
    Replaced {
        handle: EntityHandle,
        index: usize,
        previous: AttributeValue,
    },
}

impl JournalEntry {
    fn handle(&self) -> EntityHandle {
        match self {
            Self::Appended { handle, .. } | Self::Replaced { handle, .. } => *handle,
        }
    }
}

/// In-memory [`EntityFactory`] implementation
#[derive(Debug, Clone)]
pub struct EntityStore {
    schema: IfcSchemaVersion,
    entities: Vec<Entity>,
    journal: Vec<JournalEntry>,
}

impl EntityStore {
    /// Create an empty store for the given schema
    pub fn new(schema: IfcSchemaVersion) -> Self {
        Self {
            schema,
            entities: Vec::new(),
            journal: Vec::new(),
        }
    }

    #[inline]
    fn next_id(&self) -> u32 {
        self.entities.len() as u32 + 1
    }

    #[inline]
    fn slot(&self, handle: EntityHandle) -> Option<usize> {
        let id = handle.id() as usize;
        (id >= 1 && id <= self.entities.len()).then(|| id - 1)
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut Entity> {
        let slot = self.slot(handle).ok_or(Error::EntityNotFound(handle))?;
        Ok(&mut self.entities[slot])
    }

    fn check_refs(&self, ifc_type: IfcType, value: &AttributeValue) -> Result<()> {
        let next = self.next_id();
        let mut dangling = None;
        value.for_each_ref(&mut |h| {
            if dangling.is_none() && (h.id() == 0 || h.id() >= next) {
                dangling = Some(h);
            }
        });
        match dangling {
            Some(target) => Err(Error::DanglingReference { ifc_type, target }),
            None => Ok(()),
        }
    }

    /// Iterate over all entities with their handles
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityHandle::new(i as u32 + 1), e))
    }

    /// Handles of all entities of one type, in creation order
    pub fn handles_of_type(&self, ifc_type: IfcType) -> Vec<EntityHandle> {
        self.iter()
            .filter(|(_, e)| e.ifc_type == ifc_type)
            .map(|(h, _)| h)
            .collect()
    }

    /// Number of entities per type
    pub fn count_by_type(&self) -> FxHashMap<IfcType, usize> {
        let mut counts = FxHashMap::default();
        for entity in &self.entities {
            *counts.entry(entity.ifc_type).or_insert(0) += 1;
        }
        counts
    }

    /// Write the complete ISO-10303-21 document
    pub fn to_step(&self, header: &StepHeader) -> String {
        // Rough guess of 64 bytes per instance line
        let mut out = String::with_capacity(256 + self.entities.len() * 64);
        out.push_str("ISO-10303-21;\n");
        header.write(self.schema, &mut out);
        out.push_str("DATA;\n");
        for (handle, entity) in self.iter() {
            encode_entity(handle, entity, &mut out);
        }
        out.push_str("ENDSEC;\n");
        out.push_str("END-ISO-10303-21;\n");
        out
    }
}

impl EntityFactory for EntityStore {
    fn schema(&self) -> IfcSchemaVersion {
        self.schema
    }

    fn create(
        &mut self,
        ifc_type: IfcType,
        attributes: Vec<AttributeValue>,
    ) -> Result<EntityHandle> {
        if !ifc_type.is_available_in(self.schema) {
            return Err(Error::NotInSchema {
                ifc_type,
                schema: self.schema,
            });
        }
        for attr in &attributes {
            self.check_refs(ifc_type, attr)?;
        }
        let handle = EntityHandle::new(self.next_id());
        self.entities.push(Entity::new(ifc_type, attributes));
        Ok(handle)
    }

    fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.slot(handle).map(|i| &self.entities[i])
    }

    fn append_to_list(
        &mut self,
        handle: EntityHandle,
        index: usize,
        items: Vec<AttributeValue>,
    ) -> Result<()> {
        let ifc_type = self
            .entity(handle)
            .ok_or(Error::EntityNotFound(handle))?
            .ifc_type;
        for item in &items {
            self.check_refs(ifc_type, item)?;
        }

        let entity = self.entity_mut(handle)?;
        let attr = entity
            .attributes
            .get_mut(index)
            .ok_or(Error::AttributeOutOfRange { handle, index })?;
        let previous_len = match attr {
            AttributeValue::List(list) => {
                let len = list.len();
                list.extend(items);
                Some(len)
            }
            AttributeValue::Null => {
                *attr = AttributeValue::List(items);
                None
            }
            _ => return Err(Error::NotAList { handle, index }),
        };
        self.journal.push(JournalEntry::Appended {
            handle,
            index,
            previous_len,
        });
        Ok(())
    }

    fn set_attribute(
        &mut self,
        handle: EntityHandle,
        index: usize,
        value: AttributeValue,
    ) -> Result<()> {
        let ifc_type = self
            .entity(handle)
            .ok_or(Error::EntityNotFound(handle))?
            .ifc_type;
        self.check_refs(ifc_type, &value)?;

        let entity = self.entity_mut(handle)?;
        let attr = entity
            .attributes
            .get_mut(index)
            .ok_or(Error::AttributeOutOfRange { handle, index })?;
        let previous = std::mem::replace(attr, value);
        self.journal.push(JournalEntry::Replaced {
            handle,
            index,
            previous,
        });
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.next_id(), self.journal.len())
    }

    fn rollback(&mut self, checkpoint: Checkpoint) -> usize {
        // Undo modifications newest first so repeated edits restore correctly
        while self.journal.len() > checkpoint.journal_len() {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            if checkpoint.is_after(entry.handle()) {
                continue;
            }
            let Some(slot) = self.slot(entry.handle()) else {
                continue;
            };
            let attributes = &mut self.entities[slot].attributes;
            match entry {
                JournalEntry::Appended {
                    index,
                    previous_len,
                    ..
                } => match (attributes.get_mut(index), previous_len) {
                    (Some(AttributeValue::List(list)), Some(len)) => list.truncate(len),
                    (Some(attr), None) => *attr = AttributeValue::Null,
                    _ => {}
                },
                JournalEntry::Replaced {
                    index, previous, ..
                } => {
                    if let Some(attr) = attributes.get_mut(index) {
                        *attr = previous;
                    }
                }
            }
        }

        let keep = (checkpoint.next_id().saturating_sub(1) as usize).min(self.entities.len());
        let discarded = self.entities.len() - keep;
        self.entities.truncate(keep);
        discarded
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.journal.truncate(checkpoint.journal_len());
    }

    fn len(&self) -> usize {
        self.entities.len()
    }
}

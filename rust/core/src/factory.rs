// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The schema-entity construction interface the export pipeline calls into.

use crate::entity::{Entity, EntityHandle};
use crate::error::Result;
use crate::schema::{IfcSchemaVersion, IfcType};
use crate::value::AttributeValue;

/// A point in the construction history that a factory can roll back to.
///
/// Everything created or modified after the checkpoint is discarded by
/// [`EntityFactory::rollback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) next_id: u32,
    pub(crate) journal_len: usize,
}

impl Checkpoint {
    /// Create a checkpoint from raw parts (for factories outside this crate)
    pub fn new(next_id: u32, journal_len: usize) -> Self {
        Self {
            next_id,
            journal_len,
        }
    }

    /// Whether `handle` was created after this checkpoint
    #[inline]
    pub fn is_after(&self, handle: EntityHandle) -> bool {
        handle.id() >= self.next_id
    }

    /// First entity id handed out after the checkpoint
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Length of the modification journal at checkpoint time
    pub fn journal_len(&self) -> usize {
        self.journal_len
    }
}

/// Schema entity factory.
///
/// Implementations construct entities and hand back opaque handles. Final
/// serialization is the implementation's business; the exporter never writes
/// files itself.
pub trait EntityFactory {
    /// Schema version entities are constructed for
    fn schema(&self) -> IfcSchemaVersion;

    /// Construct an entity. Fails when the type is not part of the schema or
    /// an attribute references a handle that does not exist.
    fn create(&mut self, ifc_type: IfcType, attributes: Vec<AttributeValue>)
        -> Result<EntityHandle>;

    /// Look up a constructed entity
    fn entity(&self, handle: EntityHandle) -> Option<&Entity>;

    /// Append values to a list attribute of an existing entity
    fn append_to_list(
        &mut self,
        handle: EntityHandle,
        index: usize,
        items: Vec<AttributeValue>,
    ) -> Result<()>;

    /// Replace one attribute of an existing entity
    fn set_attribute(
        &mut self,
        handle: EntityHandle,
        index: usize,
        value: AttributeValue,
    ) -> Result<()>;

    /// Mark the current construction state
    fn checkpoint(&self) -> Checkpoint;

    /// Discard everything created or modified after `checkpoint`.
    /// Returns the number of discarded entities.
    fn rollback(&mut self, checkpoint: Checkpoint) -> usize;

    /// Make every modification since `checkpoint` permanent, releasing
    /// its undo history. Only valid for the outermost open checkpoint.
    fn commit(&mut self, _checkpoint: Checkpoint) {}

    /// Number of constructed entities
    fn len(&self) -> usize;

    /// Whether nothing has been constructed yet
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ownership of geometry created mid-export
//!
//! Transformed copies of host solids are made while translating an element
//! (for example to bring a solid into its placement's frame). They are owned
//! here and released when the session ends.

use crate::brep::BrepSolid;
use nalgebra::Matrix4;
use tracing::debug;

/// Index of an owned solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocatedId(usize);

/// Owner of derived geometry copies
#[derive(Debug, Default)]
pub struct AllocatedGeometryCache {
    solids: Vec<BrepSolid>,
}

impl AllocatedGeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a solid
    pub fn insert(&mut self, solid: BrepSolid) -> AllocatedId {
        self.solids.push(solid);
        AllocatedId(self.solids.len() - 1)
    }

    /// Own a transformed copy of `solid`
    pub fn transformed_copy(&mut self, solid: &BrepSolid, transform: &Matrix4<f64>) -> AllocatedId {
        self.insert(solid.transformed(transform))
    }

    pub fn get(&self, id: AllocatedId) -> Option<&BrepSolid> {
        self.solids.get(id.0)
    }

    /// Position to truncate back to
    pub fn mark(&self) -> usize {
        self.solids.len()
    }

    /// Release solids allocated after `mark`
    pub fn truncate(&mut self, mark: usize) {
        self.solids.truncate(mark);
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Release everything
    pub fn clear(&mut self) {
        if !self.solids.is_empty() {
            debug!(count = self.solids.len(), "releasing allocated geometry");
        }
        self.solids.clear();
    }
}

impl Drop for AllocatedGeometryCache {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GeometrySource;
    use crate::tolerance::Tolerance;
    use crate::{Point3, Vector3};

    #[test]
    fn owns_transformed_copies() {
        let mut cache = AllocatedGeometryCache::new();
        let solid = BrepSolid::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0), Tolerance::default()).unwrap();
        let mark = cache.mark();
        let id = cache.transformed_copy(&solid, &Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0)));
        let (min, _) = cache.get(id).unwrap().bounds().unwrap().unwrap();
        assert!((min.x - 5.0).abs() < 1e-12);

        cache.truncate(mark);
        assert!(cache.get(id).is_none());
        cache.insert(solid);
        cache.clear();
        assert!(cache.is_empty());
    }
}

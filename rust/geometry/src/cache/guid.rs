// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GUIDs handed out during a session

use ifc_export_core::{is_valid_guid, new_guid};
use rustc_hash::FxHashSet;
use tracing::warn;

/// Registry of every GlobalId written so far.
///
/// Requested GUIDs that are malformed or already taken are replaced by fresh
/// ones; the output never contains a duplicate.
#[derive(Debug, Clone, Default)]
pub struct GuidRegistry {
    used: FxHashSet<String>,
    order: Vec<String>,
}

impl GuidRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `requested` if it is usable, otherwise a new GUID
    pub fn register(&mut self, requested: Option<&str>) -> String {
        let guid = match requested {
            Some(g) if !is_valid_guid(g) => {
                warn!(guid = g, "malformed GUID replaced");
                self.fresh()
            }
            Some(g) if self.used.contains(g) => {
                warn!(guid = g, "duplicate GUID replaced");
                self.fresh()
            }
            Some(g) => g.to_string(),
            None => self.fresh(),
        };
        self.used.insert(guid.clone());
        self.order.push(guid.clone());
        guid
    }

    fn fresh(&self) -> String {
        loop {
            let guid = new_guid();
            if !self.used.contains(&guid) {
                return guid;
            }
        }
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.used.contains(guid)
    }

    /// Position to truncate back to
    pub fn mark(&self) -> usize {
        self.order.len()
    }

    /// Release every GUID registered after `mark`
    pub fn truncate(&mut self, mark: usize) {
        for guid in self.order.drain(mark.min(self.order.len())..) {
            self.used.remove(&guid);
        }
    }

    pub fn clear(&mut self) {
        self.used.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_regenerated() {
        let mut registry = GuidRegistry::new();
        let first = registry.register(Some("2VsRXA0bz0hBPw3QCJZmvU"));
        assert_eq!(first, "2VsRXA0bz0hBPw3QCJZmvU");
        let second = registry.register(Some("2VsRXA0bz0hBPw3QCJZmvU"));
        assert_ne!(second, first);
        assert!(is_valid_guid(&second));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn malformed_guids_are_replaced() {
        let mut registry = GuidRegistry::new();
        let guid = registry.register(Some("not-a-guid"));
        assert!(is_valid_guid(&guid));
    }

    #[test]
    fn many_fresh_guids_are_unique() {
        let mut registry = GuidRegistry::new();
        let all: FxHashSet<String> = (0..500).map(|_| registry.register(None)).collect();
        assert_eq!(all.len(), 500);
    }

    #[test]
    fn truncate_releases_guids() {
        let mut registry = GuidRegistry::new();
        registry.register(Some("0YvctVUKr0kugbFTf53O9L"));
        let mark = registry.mark();
        registry.register(Some("3ZYW59sxj8lei475l7EhLU"));
        registry.truncate(mark);
        assert!(!registry.contains("3ZYW59sxj8lei475l7EhLU"));
        assert_eq!(registry.register(Some("3ZYW59sxj8lei475l7EhLU")), "3ZYW59sxj8lei475l7EhLU");
    }
}

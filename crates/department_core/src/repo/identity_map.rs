//! Identity map for live department instances.
//!
//! # Responsibility
//! - Map each persisted department id to the one live instance for that row.
//! - Offer an explicit insert/lookup/evict API so the store never mutates the
//!   cache implicitly.
//!
//! # Invariants
//! - At most one handle per id.
//! - The map is owned by a single store; independent stores never share it.

use crate::model::department::{DepartmentId, DepartmentRef};
use std::collections::HashMap;
use std::rc::Rc;

/// Cache from primary key to the live shared instance.
#[derive(Debug, Default)]
pub struct IdentityMap {
    entries: HashMap<DepartmentId, DepartmentRef>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new handle to the instance tracked under `id`.
    pub fn get(&self, id: DepartmentId) -> Option<DepartmentRef> {
        self.entries.get(&id).map(Rc::clone)
    }

    /// Tracks `department` under `id`, returning the handle it replaced.
    pub fn insert(&mut self, id: DepartmentId, department: DepartmentRef) -> Option<DepartmentRef> {
        self.entries.insert(id, department)
    }

    /// Stops tracking `id` and returns the evicted handle.
    pub fn evict(&mut self, id: DepartmentId) -> Option<DepartmentRef> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: DepartmentId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns whether `department` is the exact instance tracked under `id`.
    pub fn tracks(&self, id: DepartmentId, department: &DepartmentRef) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|tracked| Rc::ptr_eq(tracked, department))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evicts every entry, yielding the handles that were tracked.
    pub fn clear(&mut self) -> Vec<DepartmentRef> {
        self.entries.drain().map(|(_, department)| department).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::IdentityMap;
    use crate::model::department::Department;
    use std::rc::Rc;

    #[test]
    fn get_returns_the_tracked_instance() {
        let mut map = IdentityMap::new();
        let department = Department::new("Payroll", "Building A").into_ref();
        map.insert(1, Rc::clone(&department));

        let found = map.get(1).unwrap();
        assert!(Rc::ptr_eq(&found, &department));
        assert!(map.contains(1));
        assert!(map.get(2).is_none());
    }

    #[test]
    fn tracks_requires_reference_identity() {
        let mut map = IdentityMap::new();
        let tracked = Department::new("Payroll", "Building A").into_ref();
        let lookalike = Department::new("Payroll", "Building A").into_ref();
        map.insert(1, Rc::clone(&tracked));

        assert!(map.tracks(1, &tracked));
        assert!(!map.tracks(1, &lookalike));
        assert!(!map.tracks(2, &tracked));
    }

    #[test]
    fn evict_and_clear_remove_entries() {
        let mut map = IdentityMap::new();
        map.insert(1, Department::new("A", "x").into_ref());
        map.insert(2, Department::new("B", "y").into_ref());
        assert_eq!(map.len(), 2);

        assert!(map.evict(1).is_some());
        assert!(map.evict(1).is_none());
        assert_eq!(map.len(), 1);

        let cleared = map.clear();
        assert_eq!(cleared.len(), 1);
        assert!(map.is_empty());
    }
}

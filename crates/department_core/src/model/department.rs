//! Department entity.
//!
//! # Responsibility
//! - Hold the in-memory state of one `departments` row.
//! - Track transient vs persistent lifecycle through the optional id.
//!
//! # Invariants
//! - `id` is `None` until the store saves or loads the instance.
//! - `id` is read-only outside the crate.

use serde::Serialize;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Primary key of a `departments` row.
pub type DepartmentId = i64;

/// Shared, mutable handle to a live department.
///
/// The identity map and every caller holding a handle for the same id point
/// at one allocation; compare handles with `Rc::ptr_eq`.
///
/// # Panics
/// - Store operations borrow the handle mutably (save, delete, and any query
///   that reconciles it). Keeping a `borrow()` alive across such a call panics
///   with "already borrowed"; drop the guard first.
pub type DepartmentRef = Rc<RefCell<Department>>;

/// In-memory representation of a department row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    id: Option<DepartmentId>,
    pub name: String,
    pub location: String,
}

impl Department {
    /// Creates a transient department (no id, not tracked by any store).
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: location.into(),
        }
    }

    /// Wraps this department into a shared handle.
    pub fn into_ref(self) -> DepartmentRef {
        Rc::new(RefCell::new(self))
    }

    /// Store-assigned primary key, `None` while transient.
    pub fn id(&self) -> Option<DepartmentId> {
        self.id
    }

    /// Returns whether this instance is linked to a persisted row.
    pub fn is_persistent(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn assign_id(&mut self, id: DepartmentId) {
        self.id = Some(id);
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Department {id}: {}, {}>", self.name, self.location),
            None => write!(f, "<Department None: {}, {}>", self.name, self.location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Department;

    #[test]
    fn new_department_is_transient() {
        let department = Department::new("Payroll", "Building A");
        assert_eq!(department.id(), None);
        assert!(!department.is_persistent());
        assert_eq!(department.name, "Payroll");
        assert_eq!(department.location, "Building A");
    }

    #[test]
    fn assign_and_clear_id_toggle_persistence() {
        let mut department = Department::new("Payroll", "Building A");
        department.assign_id(7);
        assert_eq!(department.id(), Some(7));
        assert!(department.is_persistent());

        department.clear_id();
        assert_eq!(department.id(), None);
    }

    #[test]
    fn display_matches_repr_format() {
        let mut department = Department::new("Payroll", "Building A, 5th Floor");
        assert_eq!(
            department.to_string(),
            "<Department None: Payroll, Building A, 5th Floor>"
        );

        department.assign_id(1);
        assert_eq!(
            department.to_string(),
            "<Department 1: Payroll, Building A, 5th Floor>"
        );
    }
}

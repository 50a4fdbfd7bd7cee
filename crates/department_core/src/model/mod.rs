//! Domain model for the departments store.
//!
//! # Responsibility
//! - Define the `Department` entity and the shared handle the store hands out.
//!
//! # Invariants
//! - Only the store assigns or clears a department id.
//! - All handles for one persisted id alias the same allocation.

pub mod department;

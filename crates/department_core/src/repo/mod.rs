//! Persistence layer for departments.
//!
//! # Responsibility
//! - Define the department repository contract and its SQLite implementation.
//! - Own the identity map that keeps rows and live instances in sync.
//!
//! # Invariants
//! - Query results always pass through the identity map.
//! - Repository APIs report "no row" as `None`, never as an error.

pub mod department_repo;
pub mod identity_map;

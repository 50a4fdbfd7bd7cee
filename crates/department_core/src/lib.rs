//! Core of the departments store.
//! Maps `Department` instances onto rows of one SQLite table through an
//! identity map.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentId, DepartmentRef};
pub use repo::department_repo::{
    DepartmentRepository, DepartmentRow, DepartmentStore, RepoError, RepoResult,
};
pub use repo::identity_map::IdentityMap;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! SQLite connection bootstrap for the departments store.
//!
//! # Responsibility
//! - Open and configure the single local SQLite connection the store runs on.
//! - Surface SQLite failures through one crate-level error type.
//!
//! # Invariants
//! - The store never opens connections itself; callers hand one in.
//! - No schema is created here. Table lifecycle belongs to
//!   `DepartmentStore::create_table` / `drop_table`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

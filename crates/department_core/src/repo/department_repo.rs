//! Department repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own the `departments` table lifecycle and its CRUD statements.
//! - Keep the identity map and the table in sync: every row read goes through
//!   `DepartmentStore::instance_from_row`.
//!
//! # Invariants
//! - At most one live `Department` per persisted id, per store.
//! - Rows are authoritative: reading a tracked id overwrites unsaved local edits.
//! - Every statement auto-commits; there are no multi-statement transactions.
//! - Lifecycle preconditions are checked before any SQL runs.

use crate::db::DbError;
use crate::model::department::{Department, DepartmentId, DepartmentRef};
use crate::repo::identity_map::IdentityMap;
use log::{debug, info, warn};
use rusqlite::{params, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    location
FROM departments";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by department persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// `save` was called on an instance that already has an id.
    AlreadyPersisted(DepartmentId),
    /// `update`/`delete` was called on an instance without an id.
    Transient,
    /// `delete` was called on an instance this store does not track.
    NotTracked(DepartmentId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyPersisted(id) => {
                write!(f, "department is already persisted with id {id}")
            }
            Self::Transient => write!(f, "department has not been saved yet"),
            Self::NotTracked(id) => {
                write!(f, "department {id} is not currently tracked by this store")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::AlreadyPersisted(_) | Self::Transient | Self::NotTracked(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One `departments` row, decoded by column name.
///
/// NULL `name`/`location` (possible in tables not created by
/// `create_table`) decode to empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRow {
    pub id: DepartmentId,
    pub name: String,
    pub location: String,
}

impl DepartmentRow {
    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row
                .get::<_, Option<String>>("name")?
                .unwrap_or_default(),
            location: row
                .get::<_, Option<String>>("location")?
                .unwrap_or_default(),
        })
    }
}

/// Repository interface for department persistence and queries.
///
/// # Panics
/// - Methods that touch a `DepartmentRef` (including every query, which may
///   reconcile an already tracked instance) borrow it mutably. Holding a
///   `borrow()`/`borrow_mut()` of a handle across one of these calls panics
///   with "already borrowed".
pub trait DepartmentRepository {
    /// Creates the `departments` table if it does not exist.
    fn create_table(&self) -> RepoResult<()>;

    /// Drops the `departments` table if it exists.
    ///
    /// # Side effects
    /// - Clears the identity map and resets the id of every evicted instance.
    fn drop_table(&mut self) -> RepoResult<()>;

    /// Inserts a transient department and starts tracking it.
    ///
    /// # Errors
    /// - `AlreadyPersisted` when the instance already has an id.
    ///
    /// # Side effects
    /// - An instance previously tracked under the new id (possible once the
    ///   table was recreated elsewhere) is detached: its id becomes `None`.
    ///
    /// # Panics
    /// - When `department` is borrowed by the caller.
    fn save(&mut self, department: &DepartmentRef) -> RepoResult<()>;

    /// Writes name/location of a persistent department to its row.
    ///
    /// # Errors
    /// - `Transient` when the instance has no id. A missing row is not an error.
    ///
    /// # Panics
    /// - When `department` is mutably borrowed by the caller.
    fn update(&self, department: &DepartmentRef) -> RepoResult<()>;

    /// Deletes the row of a tracked department and detaches the instance.
    ///
    /// # Errors
    /// - `Transient` when the instance has no id.
    /// - `NotTracked` when this store does not track this exact instance.
    ///
    /// # Panics
    /// - When `department` is borrowed by the caller.
    fn delete(&mut self, department: &DepartmentRef) -> RepoResult<()>;

    /// Returns one instance per row, in table order.
    ///
    /// # Panics
    /// - When a tracked instance returned by the query is borrowed by the caller.
    fn get_all(&mut self) -> RepoResult<Vec<DepartmentRef>>;

    /// Returns the instance for `id`, or `None` when no row matches.
    ///
    /// # Panics
    /// - When the tracked instance for `id` is borrowed by the caller.
    fn find_by_id(&mut self, id: DepartmentId) -> RepoResult<Option<DepartmentRef>>;

    /// Returns the first row in table order whose name equals `name`.
    ///
    /// # Panics
    /// - When the tracked instance of the matching row is borrowed by the caller.
    fn find_by_name(&mut self, name: &str) -> RepoResult<Option<DepartmentRef>>;

    /// Builds a transient department and saves it.
    fn create(&mut self, name: &str, location: &str) -> RepoResult<DepartmentRef> {
        let department = Department::new(name, location).into_ref();
        self.save(&department)?;
        Ok(department)
    }
}

/// SQLite-backed department store with its own identity map.
pub struct DepartmentStore<'conn> {
    conn: &'conn Connection,
    identity_map: IdentityMap,
}

impl<'conn> DepartmentStore<'conn> {
    /// Creates a store with an empty identity map over `conn`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            identity_map: IdentityMap::new(),
        }
    }

    /// Reconciles a row with the identity map.
    ///
    /// A tracked instance gets its fields overwritten in place and is
    /// returned; otherwise a new instance is built and tracked.
    ///
    /// # Panics
    /// - When the tracked instance for `row.id` is borrowed by the caller.
    pub fn instance_from_row(&mut self, row: DepartmentRow) -> DepartmentRef {
        if let Some(department) = self.identity_map.get(row.id) {
            {
                let mut tracked = department.borrow_mut();
                tracked.name = row.name;
                tracked.location = row.location;
            }
            return department;
        }

        let mut department = Department::new(row.name, row.location);
        department.assign_id(row.id);
        let department = department.into_ref();
        self.track(row.id, &department);
        department
    }

    // One live instance per id: a displaced handle loses its id.
    fn track(&mut self, id: DepartmentId, department: &DepartmentRef) {
        if let Some(previous) = self.identity_map.insert(id, Rc::clone(department)) {
            if !Rc::ptr_eq(&previous, department) {
                previous.borrow_mut().clear_id();
                warn!("event=identity_map_replace module=repo status=ok id={id}");
            }
        }
    }

    /// Returns whether an instance is tracked under `id`.
    pub fn is_tracked(&self, id: DepartmentId) -> bool {
        self.identity_map.contains(id)
    }

    /// Number of instances currently tracked.
    pub fn tracked_len(&self) -> usize {
        self.identity_map.len()
    }

    fn fetch_rows<P: Params>(&self, sql: &str, params: P) -> RepoResult<Vec<DepartmentRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut decoded = Vec::new();

        while let Some(row) = rows.next()? {
            decoded.push(DepartmentRow::from_sql_row(row)?);
        }

        Ok(decoded)
    }

    fn fetch_first<P: Params>(&self, sql: &str, params: P) -> RepoResult<Option<DepartmentRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        if let Some(row) = rows.next()? {
            return Ok(Some(DepartmentRow::from_sql_row(row)?));
        }

        Ok(None)
    }
}

impl DepartmentRepository for DepartmentStore<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS departments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                location TEXT NOT NULL
            );",
        )?;
        info!("event=table_create module=repo status=ok table=departments");
        Ok(())
    }

    fn drop_table(&mut self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS departments;")?;

        // Rows are gone; detach every cached instance so none can be resurrected.
        let evicted = self.identity_map.clear();
        for department in &evicted {
            department.borrow_mut().clear_id();
        }
        info!(
            "event=table_drop module=repo status=ok table=departments evicted={}",
            evicted.len()
        );
        Ok(())
    }

    fn save(&mut self, department: &DepartmentRef) -> RepoResult<()> {
        {
            let current = department.borrow();
            if let Some(id) = current.id() {
                return Err(RepoError::AlreadyPersisted(id));
            }

            self.conn.execute(
                "INSERT INTO departments (name, location) VALUES (?1, ?2);",
                params![current.name.as_str(), current.location.as_str()],
            )?;
        }

        let id = self.conn.last_insert_rowid();
        department.borrow_mut().assign_id(id);
        self.track(id, department);
        debug!("event=department_save module=repo status=ok id={id}");
        Ok(())
    }

    fn update(&self, department: &DepartmentRef) -> RepoResult<()> {
        let current = department.borrow();
        let id = current.id().ok_or(RepoError::Transient)?;

        let changed = self.conn.execute(
            "UPDATE departments
             SET
                name = ?1,
                location = ?2
             WHERE id = ?3;",
            params![current.name.as_str(), current.location.as_str(), id],
        )?;

        if changed == 0 {
            warn!("event=department_update module=repo status=noop id={id} rows=0");
        } else {
            debug!("event=department_update module=repo status=ok id={id}");
        }
        Ok(())
    }

    fn delete(&mut self, department: &DepartmentRef) -> RepoResult<()> {
        let id = department.borrow().id().ok_or(RepoError::Transient)?;
        if !self.identity_map.tracks(id, department) {
            return Err(RepoError::NotTracked(id));
        }

        let changed = self
            .conn
            .execute("DELETE FROM departments WHERE id = ?1;", [id])?;

        self.identity_map.evict(id);
        department.borrow_mut().clear_id();
        debug!("event=department_delete module=repo status=ok id={id} rows={changed}");
        Ok(())
    }

    fn get_all(&mut self) -> RepoResult<Vec<DepartmentRef>> {
        let rows = self.fetch_rows(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY id;"), params![])?;
        Ok(rows
            .into_iter()
            .map(|row| self.instance_from_row(row))
            .collect())
    }

    fn find_by_id(&mut self, id: DepartmentId) -> RepoResult<Option<DepartmentRef>> {
        let row = self.fetch_first(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(row.map(|row| self.instance_from_row(row)))
    }

    fn find_by_name(&mut self, name: &str) -> RepoResult<Option<DepartmentRef>> {
        let row = self.fetch_first(
            &format!("{DEPARTMENT_SELECT_SQL} WHERE name IS ?1 ORDER BY id LIMIT 1;"),
            [name],
        )?;
        Ok(row.map(|row| self.instance_from_row(row)))
    }
}

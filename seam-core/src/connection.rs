use crate::backend::Database;
use crate::error::{Error, QueryResult};
use crate::query::{Binds, ResultSet};
use crate::values::Row;
use parking_lot::Mutex;

mod session;
mod transaction;

#[doc(inline)]
pub use self::session::Session;

/// A shareable handle to a [`Database`] engine.
///
/// The engine sits behind a single serialization guard. Every method of this type
/// holds the guard for one call only; use [`Connection::lock`] to run a sequence
/// of calls that must not interleave with other callers, or
/// [`Connection::transaction`] when the sequence must also commit or roll back as
/// a unit.
///
/// The connection remembers the diagnostic of the last failing call made through
/// it, see [`Connection::last_error`].
pub struct Connection<Db>
where
    Db: Database,
{
    state: Mutex<State<Db>>,
}

pub(crate) struct State<Db> {
    pub(crate) db: Db,
    pub(crate) last_error: Option<String>,
}

impl<Db> Connection<Db>
where
    Db: Database,
{
    /// Wraps `db`. The engine is not connected by this call.
    pub fn new(db: Db) -> Self {
        Self {
            state: Mutex::new(State {
                db,
                last_error: None,
            }),
        }
    }

    /// Acquire the serialization guard.
    ///
    /// Other callers block until the returned [`Session`] is dropped.
    pub fn lock(&self) -> Session<'_, Db> {
        Session::new(self.state.lock())
    }

    /// Returns the engine, dropping the connection.
    pub fn into_inner(self) -> Db {
        self.state.into_inner().db
    }

    /// Diagnostic of the most recent failing call made through this connection.
    ///
    /// Successful calls leave it untouched, so a value here is only evidence of a
    /// failure when the caller just observed an `Err`.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.state.lock().last_error = None;
    }

    pub fn connect(&self) -> QueryResult<()> {
        self.lock().connect()
    }

    pub fn disconnect(&self) {
        self.lock().disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.lock().is_connected()
    }

    pub fn escape_input(&self, data: &str) -> String {
        self.lock().escape_input(data).into_owned()
    }

    pub fn execute_non_query(&self, sql: &str, binds: &Binds) -> QueryResult<()> {
        self.lock().execute_non_query(sql, binds)
    }

    pub fn insert_row(&self, table: &str, row: &Row) -> QueryResult<()> {
        self.lock().insert_row(table, row)
    }

    pub fn select(&self, table: &str, columns: &str, condition: &str) -> QueryResult<ResultSet> {
        self.lock().select(table, columns, condition)
    }

    pub fn select_raw(&self, sql: &str, binds: &Binds) -> QueryResult<ResultSet> {
        self.lock().select_raw(sql, binds)
    }

    pub fn delete(&self, table: &str, condition: &str) -> QueryResult<u64> {
        self.lock().delete(table, condition)
    }

    pub fn commit(&self) -> QueryResult<()> {
        self.lock().commit()
    }

    pub fn rollback(&self) -> QueryResult<()> {
        self.lock().rollback()
    }

    pub fn cache_size(&self) -> usize {
        self.lock().cache_size()
    }

    /// Runs `f` inside a transaction while holding the serialization guard.
    ///
    /// See [`Session::transaction`].
    pub fn transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Session<'_, Db>) -> Result<T, E>,
        E: From<Error>,
    {
        self.lock().transaction(f)
    }
}

impl<Db> From<Db> for Connection<Db>
where
    Db: Database,
{
    fn from(db: Db) -> Self {
        Self::new(db)
    }
}

impl<Db> Default for Connection<Db>
where
    Db: Database + Default,
{
    fn default() -> Self {
        Self::new(Db::default())
    }
}

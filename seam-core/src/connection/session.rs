use super::State;
use crate::backend::Database;
use crate::error::QueryResult;
use crate::query::{Binds, ResultSet};
use crate::values::Row;
use parking_lot::MutexGuard;
use std::borrow::Cow;

/// Exclusive access to the engine of a [`Connection`](super::Connection).
///
/// Holds the serialization guard until dropped, so calls made through a session
/// never interleave with other callers.
pub struct Session<'c, Db>
where
    Db: Database,
{
    state: MutexGuard<'c, State<Db>>,
}

impl<'c, Db> Session<'c, Db>
where
    Db: Database,
{
    pub(super) fn new(state: MutexGuard<'c, State<Db>>) -> Self {
        Self { state }
    }

    /// Records the diagnostic of a failed call.
    fn record<T>(&mut self, result: QueryResult<T>) -> QueryResult<T> {
        if let Err(err) = &result {
            log::debug!("database call failed: {}", err);
            self.state.last_error = Some(err.to_string());
        }
        result
    }

    /// The engine itself.
    ///
    /// Failures of calls made directly on the engine are not recorded in
    /// [`Session::last_error`].
    pub fn engine(&mut self) -> &mut Db {
        &mut self.state.db
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    pub fn connect(&mut self) -> QueryResult<()> {
        let res = self.state.db.connect();
        self.record(res)
    }

    pub fn disconnect(&mut self) {
        self.state.db.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.state.db.is_connected()
    }

    pub fn escape_input<'a>(&self, data: &'a str) -> Cow<'a, str> {
        self.state.db.escape_input(data)
    }

    pub fn execute_non_query(&mut self, sql: &str, binds: &Binds) -> QueryResult<()> {
        let res = self.state.db.execute_non_query(sql, binds);
        self.record(res)
    }

    pub fn insert_row(&mut self, table: &str, row: &Row) -> QueryResult<()> {
        let res = self.state.db.insert_row(table, row);
        self.record(res)
    }

    pub fn select(&mut self, table: &str, columns: &str, condition: &str) -> QueryResult<ResultSet> {
        let res = self.state.db.select(table, columns, condition);
        self.record(res)
    }

    pub fn select_raw(&mut self, sql: &str, binds: &Binds) -> QueryResult<ResultSet> {
        let res = self.state.db.select_raw(sql, binds);
        self.record(res)
    }

    pub fn delete(&mut self, table: &str, condition: &str) -> QueryResult<u64> {
        let res = self.state.db.delete(table, condition);
        self.record(res)
    }

    pub fn commit(&mut self) -> QueryResult<()> {
        let res = self.state.db.commit();
        self.record(res)
    }

    pub fn rollback(&mut self) -> QueryResult<()> {
        let res = self.state.db.rollback();
        self.record(res)
    }

    pub fn cache_size(&self) -> usize {
        self.state.db.cache_size()
    }
}

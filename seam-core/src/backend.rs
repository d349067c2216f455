use crate::error::{Error, QueryResult};
use crate::query::{Binds, ResultSet};
use crate::values::Row;
use std::borrow::Cow;

/// A storage engine.
///
/// This trait is the whole access contract between application code and a backing
/// store, be it a relational server, a flat file or anything else. There are no
/// default implementations: an engine either implements an operation or declines
/// it explicitly, e.g. by delegating to [`Unimplemented`](crate::Unimplemented).
///
/// All operations are blocking. Exclusive access (`&mut self`) is what serializes
/// calls; wrap the engine in a [`Connection`](crate::connection::Connection) to
/// share it between threads.
///
/// # Disconnected engines
///
/// Data operations ([`execute_non_query`], [`insert_row`], [`select`],
/// [`select_raw`], [`delete`], [`commit`] and [`rollback`]) issued while
/// [`is_connected`] is false must fail with
/// [`ErrorKind::NotConnected`](crate::error::ErrorKind::NotConnected). See
/// [`ensure_connected`].
///
/// [`execute_non_query`]: Database::execute_non_query
/// [`insert_row`]: Database::insert_row
/// [`select`]: Database::select
/// [`select_raw`]: Database::select_raw
/// [`delete`]: Database::delete
/// [`commit`]: Database::commit
/// [`rollback`]: Database::rollback
/// [`is_connected`]: Database::is_connected
pub trait Database: Send {
    /// Establish connectivity using the configuration the engine was built with.
    fn connect(&mut self) -> QueryResult<()>;

    /// Release connectivity, discarding uncommitted work.
    ///
    /// Calling this on a disconnected engine does nothing.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Make `data` safe to embed literally in a statement of this engine.
    fn escape_input<'a>(&self, data: &'a str) -> Cow<'a, str>;

    /// Execute a statement without a tabular result.
    fn execute_non_query(&mut self, sql: &str, binds: &Binds) -> QueryResult<()>;

    /// Persist `row` as a new record of `table`.
    fn insert_row(&mut self, table: &str, row: &Row) -> QueryResult<()>;

    /// Select `columns` (comma separated) from the rows of `table` matching
    /// `condition`, written in the engine's own syntax.
    fn select(&mut self, table: &str, columns: &str, condition: &str) -> QueryResult<ResultSet>;

    /// Execute a complete query statement.
    fn select_raw(&mut self, sql: &str, binds: &Binds) -> QueryResult<ResultSet>;

    /// Remove the rows of `table` matching `condition`, returning how many were removed.
    fn delete(&mut self, table: &str, condition: &str) -> QueryResult<u64>;

    /// Durably apply the current transaction.
    fn commit(&mut self) -> QueryResult<()>;

    /// Discard the current transaction.
    fn rollback(&mut self) -> QueryResult<()>;

    /// Number of resources the engine keeps cached, e.g. pooled connections.
    fn cache_size(&self) -> usize;
}

/// Fails with [`ErrorKind::NotConnected`](crate::error::ErrorKind::NotConnected)
/// unless `db` is connected.
pub fn ensure_connected<Db>(db: &Db) -> QueryResult<()>
where
    Db: Database + ?Sized,
{
    if db.is_connected() {
        Ok(())
    } else {
        Err(Error::not_connected())
    }
}

macro_rules! forward_database {
    ($($ty: ty),+) => {$(
        impl<Db: Database + ?Sized> Database for $ty {
            fn connect(&mut self) -> QueryResult<()> {
                (**self).connect()
            }

            fn disconnect(&mut self) {
                (**self).disconnect()
            }

            fn is_connected(&self) -> bool {
                (**self).is_connected()
            }

            fn escape_input<'a>(&self, data: &'a str) -> Cow<'a, str> {
                (**self).escape_input(data)
            }

            fn execute_non_query(&mut self, sql: &str, binds: &Binds) -> QueryResult<()> {
                (**self).execute_non_query(sql, binds)
            }

            fn insert_row(&mut self, table: &str, row: &Row) -> QueryResult<()> {
                (**self).insert_row(table, row)
            }

            fn select(
                &mut self,
                table: &str,
                columns: &str,
                condition: &str,
            ) -> QueryResult<ResultSet> {
                (**self).select(table, columns, condition)
            }

            fn select_raw(&mut self, sql: &str, binds: &Binds) -> QueryResult<ResultSet> {
                (**self).select_raw(sql, binds)
            }

            fn delete(&mut self, table: &str, condition: &str) -> QueryResult<u64> {
                (**self).delete(table, condition)
            }

            fn commit(&mut self) -> QueryResult<()> {
                (**self).commit()
            }

            fn rollback(&mut self) -> QueryResult<()> {
                (**self).rollback()
            }

            fn cache_size(&self) -> usize {
                (**self).cache_size()
            }
        }
    )+};
}

forward_database!(Box<Db>, &mut Db);

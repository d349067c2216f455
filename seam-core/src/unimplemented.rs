use crate::backend::Database;
use crate::error::{Error, QueryResult};
use crate::query::{Binds, ResultSet};
use crate::values::Row;
use std::borrow::Cow;

/// A [`Database`] with no backing engine.
///
/// It never connects. Every data operation fails with
/// [`ErrorKind::Unsupported`](crate::error::ErrorKind::Unsupported), except for
/// [`commit`](Database::commit) and [`rollback`](Database::rollback) which do
/// nothing. [`escape_input`](Database::escape_input) returns its input unchanged,
/// which is NOT safe to embed in a statement.
///
/// Engines supporting only part of the contract can hold one and delegate the
/// operations they decline to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unimplemented;

impl Database for Unimplemented {
    fn connect(&mut self) -> QueryResult<()> {
        log::debug!("connect requested on an engine without backing storage");
        Ok(())
    }

    fn disconnect(&mut self) {}

    fn is_connected(&self) -> bool {
        false
    }

    fn escape_input<'a>(&self, data: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(data)
    }

    fn execute_non_query(&mut self, _sql: &str, _binds: &Binds) -> QueryResult<()> {
        Err(Error::unsupported("EXECUTE"))
    }

    fn insert_row(&mut self, _table: &str, _row: &Row) -> QueryResult<()> {
        Err(Error::unsupported("INSERT"))
    }

    fn select(&mut self, _table: &str, _columns: &str, _condition: &str) -> QueryResult<ResultSet> {
        Err(Error::unsupported("SELECT"))
    }

    fn select_raw(&mut self, _sql: &str, _binds: &Binds) -> QueryResult<ResultSet> {
        Err(Error::unsupported("SELECT"))
    }

    fn delete(&mut self, _table: &str, _condition: &str) -> QueryResult<u64> {
        Err(Error::unsupported("DELETE"))
    }

    fn commit(&mut self) -> QueryResult<()> {
        Ok(())
    }

    fn rollback(&mut self) -> QueryResult<()> {
        Ok(())
    }

    fn cache_size(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn never_connects() {
        let mut db = Unimplemented;
        assert!(!db.is_connected());

        db.connect().unwrap();
        assert!(!db.is_connected());

        db.disconnect();
        db.disconnect();
        assert!(!db.is_connected());
    }

    #[test]
    fn data_operations_are_unsupported() {
        let mut db = Unimplemented;

        let err = db.insert_row("users", &row![1]).unwrap_err();
        assert_eq!(err.to_string(), "INSERT: function is not implemented");

        assert!(db.select("users", "*", "").unwrap_err().is_unsupported());
        assert!(db.select_raw("SELECT 1", &Binds::new()).unwrap_err().is_unsupported());
        assert!(db.execute_non_query("DROP TABLE users", &Binds::new()).unwrap_err().is_unsupported());

        let deleted = db.delete("users", "id = 1");
        assert!(deleted.as_ref().unwrap_err().is_unsupported());
        assert_eq!(deleted.unwrap_or(0), 0);
    }

    #[test]
    fn transaction_control_is_a_noop() {
        let mut db = Unimplemented;
        db.commit().unwrap();
        db.rollback().unwrap();
        assert_eq!(db.cache_size(), 0);
    }

    #[test]
    fn escape_is_the_identity() {
        let db = Unimplemented;
        assert_eq!(db.escape_input("x"), "x");
        assert!(matches!(db.escape_input("it's"), Cow::Borrowed("it's")));
    }
}

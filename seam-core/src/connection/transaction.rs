use super::Session;
use crate::backend::Database;
use crate::error::Error;
use std::panic::{self, AssertUnwindSafe};

impl<Db> Session<'_, Db>
where
    Db: Database,
{
    /// Runs `f` as one transaction.
    ///
    /// The contract has no explicit `BEGIN`: the transaction is whatever the engine
    /// accumulated since its last commit or rollback, so uncommitted work issued
    /// before this call becomes part of it.
    ///
    /// * `f` returns `Ok`: the transaction is committed. If the commit fails a
    ///   rollback is attempted and the commit error is returned.
    /// * `f` returns `Err`: the transaction is rolled back and the error of `f` is
    ///   returned. If the rollback fails, its error is returned instead, and the
    ///   engine should be considered broken.
    ///
    /// # Panics
    ///
    /// If `f` panics, the transaction is rolled back before resuming the panic.
    pub fn transaction<F, T, E>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<Error>,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| f(&mut *self))) {
            // The closure didn't panic and resolved correctly, commit the transaction.
            Ok(Ok(output)) => match self.commit() {
                Ok(()) => Ok(output),
                Err(err) => {
                    if let Err(rollback) = self.rollback() {
                        log::error!("rollback after failed commit failed: {}", rollback);
                    }
                    Err(err.into())
                }
            },
            // The closure resolved to an error, rollback the transaction.
            Ok(Err(err)) => match self.rollback() {
                Ok(()) => Err(err),
                Err(rollback) => Err(rollback.into()),
            },
            // The closure panicked, rollback the transaction and resume unwind.
            Err(payload) => {
                if let Err(rollback) = self.rollback() {
                    log::error!("rollback after panic failed: {}", rollback);
                }
                panic::resume_unwind(payload)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::Database;
    use crate::connection::Connection;
    use crate::error::{Error, QueryResult};
    use crate::query::{Binds, ResultSet};
    use crate::values::Row;
    use std::borrow::Cow;

    /// Records the transaction control calls it receives.
    #[derive(Default)]
    struct Journal {
        calls: Vec<&'static str>,
        fail_commit: bool,
    }

    impl Database for Journal {
        fn connect(&mut self) -> QueryResult<()> {
            Ok(())
        }

        fn disconnect(&mut self) {}

        fn is_connected(&self) -> bool {
            true
        }

        fn escape_input<'a>(&self, data: &'a str) -> Cow<'a, str> {
            Cow::Borrowed(data)
        }

        fn execute_non_query(&mut self, _sql: &str, _binds: &Binds) -> QueryResult<()> {
            self.calls.push("execute");
            Ok(())
        }

        fn insert_row(&mut self, _table: &str, _row: &Row) -> QueryResult<()> {
            self.calls.push("insert");
            Ok(())
        }

        fn select(&mut self, _: &str, _: &str, _: &str) -> QueryResult<ResultSet> {
            Ok(ResultSet::new())
        }

        fn select_raw(&mut self, _sql: &str, _binds: &Binds) -> QueryResult<ResultSet> {
            Ok(ResultSet::new())
        }

        fn delete(&mut self, _table: &str, _condition: &str) -> QueryResult<u64> {
            Ok(0)
        }

        fn commit(&mut self) -> QueryResult<()> {
            self.calls.push("commit");
            if self.fail_commit {
                Err(Error::invalid_statement("commit refused"))
            } else {
                Ok(())
            }
        }

        fn rollback(&mut self) -> QueryResult<()> {
            self.calls.push("rollback");
            Ok(())
        }

        fn cache_size(&self) -> usize {
            0
        }
    }

    #[test]
    fn commits_on_success() {
        let conn = Connection::new(Journal::default());

        let out = conn.transaction(|tx| -> QueryResult<u32> {
            tx.insert_row("t", &Row::new())?;
            Ok(7)
        });

        assert_eq!(out.unwrap(), 7);
        assert_eq!(conn.into_inner().calls, ["insert", "commit"]);
    }

    #[test]
    fn rolls_back_on_error() {
        let conn = Connection::new(Journal::default());

        let out: QueryResult<()> = conn.transaction(|tx| {
            tx.insert_row("t", &Row::new())?;
            Err(Error::invalid_statement("nope"))
        });

        assert_eq!(out.unwrap_err().to_string(), "invalid statement: nope");
        assert_eq!(conn.into_inner().calls, ["insert", "rollback"]);
    }

    #[test]
    fn rolls_back_when_commit_fails() {
        let conn = Connection::new(Journal {
            fail_commit: true,
            ..Journal::default()
        });

        let out = conn.transaction(|tx| tx.execute_non_query("UPDATE t SET a = 1", &Binds::new()));

        assert!(out.is_err());
        assert_eq!(conn.last_error().as_deref(), Some("invalid statement: commit refused"));
        assert_eq!(conn.into_inner().calls, ["execute", "commit", "rollback"]);
    }

    #[test]
    fn rolls_back_on_panic() {
        let conn = Connection::new(Journal::default());

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: QueryResult<()> = conn.transaction(|tx| {
                tx.insert_row("t", &Row::new())?;
                panic!("boom");
            });
        }));

        assert!(res.is_err());
        assert_eq!(conn.into_inner().calls, ["insert", "rollback"]);
    }
}

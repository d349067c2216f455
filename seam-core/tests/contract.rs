use seam_core::error::{Error, ErrorKind, QueryResult};
use seam_core::{
    ensure_connected, row, Binds, Connection, DataType, Database, ResultSet, Row, Unimplemented,
    Value,
};
use std::borrow::Cow;

/// An engine that keeps rows of a single table in memory, and declines raw
/// statements through [`Unimplemented`].
#[derive(Default)]
struct Scratch {
    connected: bool,
    committed: Vec<Row>,
    pending: Vec<Row>,
}

impl Database for Scratch {
    fn connect(&mut self) -> QueryResult<()> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.pending.clear();
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn escape_input<'a>(&self, data: &'a str) -> Cow<'a, str> {
        Cow::Owned(data.replace('\'', "''"))
    }

    fn execute_non_query(&mut self, sql: &str, binds: &Binds) -> QueryResult<()> {
        ensure_connected(self)?;
        Unimplemented.execute_non_query(sql, binds)
    }

    fn insert_row(&mut self, _table: &str, row: &Row) -> QueryResult<()> {
        ensure_connected(self)?;
        self.pending.push(row.clone());
        Ok(())
    }

    fn select(&mut self, _table: &str, _columns: &str, _condition: &str) -> QueryResult<ResultSet> {
        ensure_connected(self)?;
        Ok(self
            .committed
            .iter()
            .chain(&self.pending)
            .map(|row| row.iter().map(|v| v.data().to_owned()).collect())
            .collect())
    }

    fn select_raw(&mut self, sql: &str, binds: &Binds) -> QueryResult<ResultSet> {
        ensure_connected(self)?;
        Unimplemented.select_raw(sql, binds)
    }

    fn delete(&mut self, _table: &str, _condition: &str) -> QueryResult<u64> {
        ensure_connected(self)?;
        let removed = self.committed.len() + self.pending.len();
        self.committed.clear();
        self.pending.clear();
        Ok(removed as u64)
    }

    fn commit(&mut self) -> QueryResult<()> {
        ensure_connected(self)?;
        self.committed.append(&mut self.pending);
        Ok(())
    }

    fn rollback(&mut self) -> QueryResult<()> {
        ensure_connected(self)?;
        self.pending.clear();
        Ok(())
    }

    fn cache_size(&self) -> usize {
        0
    }
}

#[test]
fn engine_without_backing_storage_through_a_trait_object() {
    let conn: Connection<Box<dyn Database>> = Connection::new(Box::new(Unimplemented));

    assert!(!conn.is_connected());
    conn.connect().unwrap();
    assert!(!conn.is_connected());

    assert!(conn.insert_row("t", &Row::new()).is_err());
    assert!(conn.last_error().is_some());
    assert!(conn.select("t", "a,b", "a = 1").is_err());
    assert!(conn.select_raw("SELECT a FROM t", &Binds::new()).is_err());
    assert_eq!(conn.delete("t", "a = 1").unwrap_or(0), 0);

    conn.commit().unwrap();
    conn.rollback().unwrap();
    conn.disconnect();
    conn.disconnect();

    assert_eq!(conn.escape_input("x"), "x");
    assert_eq!(conn.cache_size(), 0);
    assert!(!conn.is_connected());
}

#[test]
fn disconnected_engines_refuse_data_operations() {
    let conn = Connection::new(Scratch::default());

    let err = conn.insert_row("t", &row![1]).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NotConnected));
    assert_eq!(conn.last_error().as_deref(), Some("not connected to the database"));
    assert!(conn.commit().unwrap_err().is_not_connected());

    conn.connect().unwrap();
    conn.insert_row("t", &row![1]).unwrap();
    assert_eq!(conn.select("t", "*", "").unwrap(), [["1"]]);
}

#[test]
fn declined_operations_are_delegated() {
    let conn = Connection::new(Scratch::default());
    conn.connect().unwrap();

    let err = conn
        .execute_non_query("CREATE TABLE t (a)", &Binds::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "EXECUTE: function is not implemented");
}

#[test]
fn empty_rows_are_passed_through() {
    let conn = Connection::new(Scratch::default());
    conn.connect().unwrap();

    conn.insert_row("t", &Row::new()).unwrap();
    assert_eq!(conn.select("t", "*", "").unwrap(), vec![Vec::<String>::new()]);
}

#[test]
fn transaction_scope() {
    let conn = Connection::new(Scratch::default());
    conn.connect().unwrap();

    let res: QueryResult<()> = conn.transaction(|tx| {
        tx.insert_row("t", &row![Value::text("2024-03-05 09:07:03", DataType::Date)])?;
        Err(Error::invalid_statement("abort"))
    });
    assert!(res.is_err());
    assert!(conn.select("t", "*", "").unwrap().is_empty());

    let inserted = conn
        .transaction(|tx| -> QueryResult<usize> {
            tx.insert_row("t", &row![1, 2.5, false])?;
            tx.insert_row("t", &row!["x"])?;
            Ok(2)
        })
        .unwrap();
    assert_eq!(inserted, 2);

    // Committed work survives a disconnect.
    conn.disconnect();
    conn.connect().unwrap();
    assert_eq!(
        conn.select("t", "*", "").unwrap(),
        vec![
            vec!["1".to_string(), "2.5".to_string(), "False".to_string()],
            vec!["x".to_string()],
        ]
    );
    assert_eq!(conn.delete("t", "").unwrap(), 2);
}

#[test]
fn sessions_hold_the_guard_for_a_sequence() {
    let conn = std::sync::Arc::new(Connection::new(Scratch::default()));
    conn.connect().unwrap();

    let threads: Vec<_> = (0..8)
        .map(|i| {
            let conn = conn.clone();
            std::thread::spawn(move || {
                let mut session = conn.lock();
                let before = session.select("t", "*", "").unwrap().len();
                session.insert_row("t", &row![i]).unwrap();
                session.commit().unwrap();
                assert_eq!(session.select("t", "*", "").unwrap().len(), before + 1);
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }
    assert_eq!(conn.select("t", "*", "").unwrap().len(), 8);
}

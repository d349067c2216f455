use crate::ast::Statement;
use crate::config::Config;
use crate::encode::escape;
use crate::parser;
use crate::storage::{Cell, Document};
use seam_core::error::{Error, QueryResult};
use seam_core::{Binds, Database, ResultSet, Row};
use std::borrow::Cow;

/// A [`Database`] engine storing every table in one JSON file.
///
/// Work is kept in memory until [`commit`](Database::commit), which rewrites the
/// whole file. Reads see uncommitted work.
pub struct FlatFile {
    config: Config,
    state: Option<Loaded>,
}

/// State of a connected engine.
struct Loaded {
    committed: Document,
    working: Document,
    dirty: bool,
}

impl FlatFile {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Config::in_memory())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn load(&self) -> QueryResult<Document> {
        let path = match self.config.path() {
            Some(path) => path,
            None => return Ok(Document::default()),
        };

        if path.exists() {
            Document::load(path)
        } else if self.config.create_if_missing {
            log::debug!("{} doesn't exist, starting empty", path.display());
            Ok(Document::default())
        } else {
            Err(Error::connection_failure(format!(
                "{} doesn't exist",
                path.display()
            )))
        }
    }

    fn loaded(&mut self) -> QueryResult<&mut Loaded> {
        self.state.as_mut().ok_or_else(Error::not_connected)
    }

    /// The document mutations go to. Marks the transaction dirty.
    fn working(&mut self) -> QueryResult<&mut Document> {
        let loaded = self.loaded()?;
        loaded.dirty = true;
        Ok(&mut loaded.working)
    }

    fn execute(&mut self, statement: Statement) -> QueryResult<()> {
        match statement {
            Statement::CreateTable(create) => {
                let created = self.working()?.create_table(
                    &create.name,
                    &create.columns,
                    create.if_not_exists,
                )?;
                log::debug!("CREATE TABLE {}: created={}", create.name, created);
            }
            Statement::DropTable { name, if_exists } => {
                let dropped = self.working()?.drop_table(&name, if_exists)?;
                log::debug!("DROP TABLE {}: dropped={}", name, dropped);
            }
            Statement::Insert(insert) => {
                let table = self.working()?.table_mut(&insert.table)?;
                // Validate every row before touching the table.
                let mut staged = table.clone();
                for literals in &insert.rows {
                    if let Some(columns) = &insert.columns {
                        if literals.len() != columns.len() {
                            return Err(Error::invalid_statement(format!(
                                "{} columns named but {} values supplied",
                                columns.len(),
                                literals.len()
                            )));
                        }
                    }

                    let cells = literals.iter().enumerate().map(|(i, literal)| Cell {
                        column: insert
                            .columns
                            .as_ref()
                            .and_then(|columns| columns.get(i))
                            .map(String::as_str),
                        ..Cell::from(literal)
                    });
                    staged.insert(&insert.table, cells)?;
                }
                *table = staged;
                log::debug!("INSERT INTO {}: {} rows", insert.table, insert.rows.len());
            }
            Statement::Update(update) => {
                let changed = self.working()?.table_mut(&update.table)?.update(
                    &update.table,
                    &update.assignments,
                    update.condition.as_ref(),
                )?;
                log::debug!("UPDATE {}: {} rows", update.table, changed);
            }
            Statement::Delete { table, condition } => {
                let removed = self
                    .working()?
                    .table_mut(&table)?
                    .delete(&table, condition.as_ref())?;
                log::debug!("DELETE FROM {}: {} rows", table, removed);
            }
            Statement::Select(_) => {
                return Err(Error::invalid_statement(
                    "SELECT returns rows, use select_raw",
                ))
            }
            Statement::Begin => {
                self.loaded()?;
            }
            Statement::Commit => self.commit()?,
            Statement::Rollback => self.rollback()?,
        }

        Ok(())
    }
}

impl Database for FlatFile {
    fn connect(&mut self) -> QueryResult<()> {
        if self.state.is_some() {
            return Ok(());
        }

        let document = self.load().map_err(|err| {
            log::warn!("unable to load flat-file database: {}", err);
            err
        })?;
        log::debug!("connected, {} tables loaded", document.len());

        self.state = Some(Loaded {
            committed: document.clone(),
            working: document,
            dirty: false,
        });
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(loaded) = self.state.take() {
            if loaded.dirty {
                log::debug!("disconnecting, uncommitted changes discarded");
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.state.is_some()
    }

    fn escape_input<'a>(&self, data: &'a str) -> Cow<'a, str> {
        escape(data)
    }

    fn execute_non_query(&mut self, sql: &str, binds: &Binds) -> QueryResult<()> {
        self.loaded()?;
        let statement = parser::statement(sql, binds)?;
        self.execute(statement)
    }

    fn insert_row(&mut self, table: &str, row: &Row) -> QueryResult<()> {
        let target = self.loaded()?.working.table_mut(table)?;

        let cells = row.iter().map(|value| Cell {
            column: value.column(),
            data: value.data(),
            data_type: Some(value.data_type()),
        });
        target.insert(table, cells)?;

        self.loaded()?.dirty = true;
        Ok(())
    }

    fn select(&mut self, table: &str, columns: &str, condition: &str) -> QueryResult<ResultSet> {
        let loaded = self.loaded()?;
        let columns = parser::columns(columns)?;
        let condition = parser::condition(condition)?;

        loaded
            .working
            .table(table)?
            .select(table, &columns, condition.as_ref(), None, None)
    }

    fn select_raw(&mut self, sql: &str, binds: &Binds) -> QueryResult<ResultSet> {
        let loaded = self.loaded()?;

        let select = match parser::statement(sql, binds)? {
            Statement::Select(select) => select,
            _ => {
                return Err(Error::invalid_statement(
                    "only SELECT statements return rows",
                ))
            }
        };

        loaded.working.table(&select.table)?.select(
            &select.table,
            &select.columns,
            select.condition.as_ref(),
            select.order_by.as_ref(),
            select.limit,
        )
    }

    fn delete(&mut self, table: &str, condition: &str) -> QueryResult<u64> {
        let condition = parser::condition(condition)?;
        let target = self.loaded()?.working.table_mut(table)?;

        let removed = target.delete(table, condition.as_ref())?;
        if removed > 0 {
            self.loaded()?.dirty = true;
        }
        Ok(removed)
    }

    fn commit(&mut self) -> QueryResult<()> {
        let path = self.config.path.clone();
        let pretty = self.config.pretty;
        let loaded = self.loaded()?;

        if !loaded.dirty {
            return Ok(());
        }

        if let Some(path) = path {
            loaded.working.save(&path, pretty).map_err(|err| {
                log::warn!("unable to persist {}: {}", path.display(), err);
                err
            })?;
        }

        loaded.committed = loaded.working.clone();
        loaded.dirty = false;
        log::debug!("committed");
        Ok(())
    }

    fn rollback(&mut self) -> QueryResult<()> {
        let loaded = self.loaded()?;

        if loaded.dirty {
            loaded.working = loaded.committed.clone();
            loaded.dirty = false;
            log::debug!("rolled back");
        }
        Ok(())
    }

    fn cache_size(&self) -> usize {
        self.state
            .as_ref()
            .map_or(0, |loaded| loaded.working.len())
    }
}

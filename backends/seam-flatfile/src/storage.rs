use crate::ast::{ColumnDef, Columns, CompareOp, Condition, Literal, OrderBy};
use crate::encode::{compare, encode, like};
use crate::{duplicate_table, undefined_column, undefined_table};
use seam_core::error::{Error, QueryResult};
use seam_core::{DataType, ResultSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Every table of a flat-file database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(default)]
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Table {
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Column {
    name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    data_type: Option<DataType>,
}

/// One value to insert: its destination column (positional when `None`), its
/// rendered data and its type when known.
pub(crate) struct Cell<'a> {
    pub column: Option<&'a str>,
    pub data: &'a str,
    pub data_type: Option<DataType>,
}

impl<'a> From<&'a Literal> for Cell<'a> {
    fn from(literal: &'a Literal) -> Self {
        Cell {
            column: None,
            data: &literal.text,
            data_type: literal.data_type,
        }
    }
}

impl Document {
    /// Reads a document from `path`.
    pub(crate) fn load(path: &Path) -> QueryResult<Self> {
        let content = fs::read(path).map_err(Error::connection_failure)?;
        let document: Self =
            serde_json::from_slice(&content).map_err(Error::connection_failure)?;
        document.check().map_err(Error::connection_failure)?;
        Ok(document)
    }

    /// Rejects documents no statement could have produced.
    fn check(&self) -> Result<(), String> {
        for (name, table) in &self.tables {
            for (i, column) in table.columns.iter().enumerate() {
                if table.columns[..i].iter().any(|c| c.name == column.name) {
                    return Err(format!(
                        "table `{}` declares column `{}` more than once",
                        name, column.name
                    ));
                }
            }

            if let Some(row) = table.rows.iter().position(|r| r.len() != table.columns.len()) {
                return Err(format!(
                    "row {} of table `{}` has {} cells, expected {}",
                    row,
                    name,
                    table.rows[row].len(),
                    table.columns.len()
                ));
            }
        }
        Ok(())
    }

    /// Writes the document to a sibling temporary file, then moves it over `path`.
    pub(crate) fn save(&self, path: &Path, pretty: bool) -> QueryResult<()> {
        let content = if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        }
        .map_err(Error::serialization_failure)?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");

        let mut file = fs::File::create(&tmp)?;
        file.write_all(&content)?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;

        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.tables.len()
    }

    pub(crate) fn table(&self, name: &str) -> QueryResult<&Table> {
        self.tables.get(name).ok_or_else(|| undefined_table(name))
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> QueryResult<&mut Table> {
        self.tables.get_mut(name).ok_or_else(|| undefined_table(name))
    }

    /// Returns whether the table was created.
    pub(crate) fn create_table(
        &mut self,
        name: &str,
        columns: &[ColumnDef],
        if_not_exists: bool,
    ) -> QueryResult<bool> {
        if self.tables.contains_key(name) {
            return if if_not_exists {
                Ok(false)
            } else {
                Err(duplicate_table(name))
            };
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::invalid_statement(format!(
                    "column `{}` specified more than once",
                    column.name
                )));
            }
        }

        let columns = columns
            .iter()
            .map(|def| Column {
                name: def.name.clone(),
                data_type: def.data_type,
            })
            .collect();

        self.tables.insert(
            name.to_owned(),
            Table {
                columns,
                rows: Vec::new(),
            },
        );
        Ok(true)
    }

    /// Returns whether the table existed.
    pub(crate) fn drop_table(&mut self, name: &str, if_exists: bool) -> QueryResult<bool> {
        match self.tables.remove(name) {
            Some(_) => Ok(true),
            None if if_exists => Ok(false),
            None => Err(undefined_table(name)),
        }
    }
}

impl Table {
    fn column_index(&self, table: &str, column: &str) -> QueryResult<usize> {
        self.columns
            .iter()
            .position(|c| c.name == column)
            .ok_or_else(|| undefined_column(table, column))
    }

    /// Encodes `data` for the column at `idx`, checking it against both its own
    /// type and the column's.
    fn encode_for(&self, idx: usize, data: &str, data_type: Option<DataType>) -> QueryResult<String> {
        let data = match data_type {
            Some(ty) => encode(data, ty)?,
            None => data.to_owned(),
        };

        match self.columns[idx].data_type {
            Some(ty) => encode(&data, ty),
            None => Ok(data),
        }
    }

    /// Appends one row.
    ///
    /// Cells without a column fill the table columns in order; named cells go to
    /// their column. Unfilled columns hold the empty string.
    pub(crate) fn insert<'a>(
        &mut self,
        table: &str,
        cells: impl IntoIterator<Item = Cell<'a>>,
    ) -> QueryResult<()> {
        let mut row: Vec<Option<String>> = vec![None; self.columns.len()];
        let mut next_positional = 0;

        for cell in cells {
            let idx = match cell.column {
                Some(column) => self.column_index(table, column)?,
                None => {
                    let idx = next_positional;
                    next_positional += 1;
                    if idx >= self.columns.len() {
                        return Err(Error::invalid_statement(format!(
                            "table `{}` has {} columns but more values were supplied",
                            table,
                            self.columns.len()
                        )));
                    }
                    idx
                }
            };

            if row[idx].is_some() {
                return Err(Error::invalid_statement(format!(
                    "column `{}` specified more than once",
                    self.columns[idx].name
                )));
            }
            row[idx] = Some(self.encode_for(idx, cell.data, cell.data_type)?);
        }

        self.rows
            .push(row.into_iter().map(Option::unwrap_or_default).collect());
        Ok(())
    }

    /// Binds every column named by `condition` to its index.
    fn predicate<'c>(&self, table: &str, condition: &'c Condition) -> QueryResult<Predicate<'c>> {
        Ok(match condition {
            Condition::Compare { column, op, value } => Predicate::Compare {
                idx: self.column_index(table, column)?,
                op: *op,
                value: value.as_str(),
            },
            Condition::Like {
                column,
                pattern,
                negated,
            } => Predicate::Like {
                idx: self.column_index(table, column)?,
                pattern: pattern.as_str(),
                negated: *negated,
            },
            Condition::Not(inner) => Predicate::Not(Box::new(self.predicate(table, inner)?)),
            Condition::And(left, right) => Predicate::And(
                Box::new(self.predicate(table, left)?),
                Box::new(self.predicate(table, right)?),
            ),
            Condition::Or(left, right) => Predicate::Or(
                Box::new(self.predicate(table, left)?),
                Box::new(self.predicate(table, right)?),
            ),
        })
    }

    /// Indices of the rows matching `condition`, all of them when it is `None`.
    ///
    /// Unknown columns fail even when the table is empty.
    fn matching(&self, table: &str, condition: Option<&Condition>) -> QueryResult<Vec<usize>> {
        let predicate = match condition {
            Some(condition) => self.predicate(table, condition)?,
            None => return Ok((0..self.rows.len()).collect()),
        };

        Ok(self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| predicate.matches(row))
            .map(|(i, _)| i)
            .collect())
    }

    pub(crate) fn select(
        &self,
        table: &str,
        columns: &Columns,
        condition: Option<&Condition>,
        order_by: Option<&OrderBy>,
        limit: Option<usize>,
    ) -> QueryResult<ResultSet> {
        let projection = match columns {
            Columns::All => (0..self.columns.len()).collect(),
            Columns::Named(names) => names
                .iter()
                .map(|name| self.column_index(table, name))
                .collect::<QueryResult<Vec<_>>>()?,
        };

        let mut matched = self.matching(table, condition)?;
        if let Some(order) = order_by {
            let idx = self.column_index(table, &order.column)?;
            matched.sort_by(|&a, &b| {
                let ordering = compare(&self.rows[a][idx], &self.rows[b][idx]);
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(matched
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|i| {
                projection
                    .iter()
                    .map(|&col| self.rows[i][col].clone())
                    .collect()
            })
            .collect())
    }

    /// Returns the number of rows removed.
    pub(crate) fn delete(&mut self, table: &str, condition: Option<&Condition>) -> QueryResult<u64> {
        let matched = self.matching(table, condition)?;

        let mut current = 0;
        let mut next = matched.iter().peekable();
        self.rows.retain(|_| {
            let remove = next.peek() == Some(&&current);
            if remove {
                next.next();
            }
            current += 1;
            !remove
        });

        Ok(matched.len() as u64)
    }

    /// Returns the number of rows changed.
    pub(crate) fn update(
        &mut self,
        table: &str,
        assignments: &[(String, Literal)],
        condition: Option<&Condition>,
    ) -> QueryResult<u64> {
        let assignments = assignments
            .iter()
            .map(|(column, literal)| {
                let idx = self.column_index(table, column)?;
                Ok((idx, self.encode_for(idx, &literal.text, literal.data_type)?))
            })
            .collect::<QueryResult<Vec<_>>>()?;

        let matched = self.matching(table, condition)?;
        for &i in &matched {
            for (idx, data) in &assignments {
                self.rows[i][*idx] = data.clone();
            }
        }

        Ok(matched.len() as u64)
    }
}

/// A [`Condition`] with its columns resolved against one table.
enum Predicate<'c> {
    Compare {
        idx: usize,
        op: CompareOp,
        value: &'c str,
    },
    Like {
        idx: usize,
        pattern: &'c str,
        negated: bool,
    },
    Not(Box<Predicate<'c>>),
    And(Box<Predicate<'c>>, Box<Predicate<'c>>),
    Or(Box<Predicate<'c>>, Box<Predicate<'c>>),
}

impl Predicate<'_> {
    fn matches(&self, row: &[String]) -> bool {
        match self {
            Predicate::Compare { idx, op, value } => {
                let ordering = compare(&row[*idx], value);
                match op {
                    CompareOp::Equal => ordering == Ordering::Equal,
                    CompareOp::NotEqual => ordering != Ordering::Equal,
                    CompareOp::Less => ordering == Ordering::Less,
                    CompareOp::LessEqual => ordering != Ordering::Greater,
                    CompareOp::Greater => ordering == Ordering::Greater,
                    CompareOp::GreaterEqual => ordering != Ordering::Less,
                }
            }
            Predicate::Like {
                idx,
                pattern,
                negated,
            } => like(&row[*idx], pattern) != *negated,
            Predicate::Not(inner) => !inner.matches(row),
            Predicate::And(left, right) => left.matches(row) && right.matches(row),
            Predicate::Or(left, right) => left.matches(row) || right.matches(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use seam_core::error::{DatabaseErrorKind, ErrorKind};

    fn users() -> (Document, Table) {
        let mut doc = Document::default();
        let defs = [
            ColumnDef {
                name: "id".into(),
                data_type: Some(DataType::Integer),
            },
            ColumnDef {
                name: "name".into(),
                data_type: None,
            },
        ];
        assert!(doc.create_table("users", &defs, false).unwrap());

        let mut table = doc.table("users").unwrap().clone();
        for (id, name) in [("1", "ada"), ("2", "bob"), ("10", "cyd")] {
            let cells = [
                Cell {
                    column: None,
                    data: id,
                    data_type: None,
                },
                Cell {
                    column: None,
                    data: name,
                    data_type: None,
                },
            ];
            table.insert("users", cells).unwrap();
        }

        (doc, table)
    }

    fn select_where(table: &Table, condition: &str) -> ResultSet {
        let condition = parser::condition(condition).unwrap();
        table
            .select("users", &Columns::All, condition.as_ref(), None, None)
            .unwrap()
    }

    #[test]
    fn create_and_drop() {
        let (mut doc, _) = users();
        assert!(!doc.create_table("users", &[], true).unwrap());
        assert_eq!(
            doc.create_table("users", &[], false)
                .unwrap_err()
                .database_error_kind(),
            Some(DatabaseErrorKind::DuplicateTable)
        );

        assert!(doc.drop_table("users", false).unwrap());
        assert!(!doc.drop_table("users", true).unwrap());
        assert!(doc.drop_table("users", false).is_err());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn numeric_comparison() {
        let (_, table) = users();
        assert_eq!(
            select_where(&table, "id > 2"),
            vec![vec!["10".to_string(), "cyd".to_string()]]
        );
        assert_eq!(select_where(&table, "name LIKE '_o%' OR id = 1").len(), 2);
    }

    #[test]
    fn named_cells_and_typed_columns() {
        let (_, mut table) = users();

        let cells = [Cell {
            column: Some("name"),
            data: "eve",
            data_type: None,
        }];
        table.insert("users", cells).unwrap();
        assert_eq!(select_where(&table, "name = 'eve'"), vec![vec![String::new(), "eve".into()]]);

        let cells = [Cell {
            column: Some("id"),
            data: "x",
            data_type: Some(DataType::Text),
        }];
        assert!(table.insert("users", cells).is_err());

        let cells = [Cell {
            column: Some("age"),
            data: "3",
            data_type: None,
        }];
        assert_eq!(
            table.insert("users", cells).unwrap_err().database_error_kind(),
            Some(DatabaseErrorKind::UndefinedColumn)
        );
    }

    #[test]
    fn unknown_condition_columns_fail_on_empty_tables() {
        let (doc, _) = users();
        let table = doc.table("users").unwrap();
        let condition = parser::condition("bogus = 1 OR id = 1").unwrap();

        let err = table
            .select("users", &Columns::All, condition.as_ref(), None, None)
            .unwrap_err();
        assert_eq!(err.database_error_kind(), Some(DatabaseErrorKind::UndefinedColumn));

        let mut table = table.clone();
        assert_eq!(
            table
                .delete("users", condition.as_ref())
                .unwrap_err()
                .database_error_kind(),
            Some(DatabaseErrorKind::UndefinedColumn)
        );
    }

    #[test]
    fn delete_and_update() {
        let (_, mut table) = users();

        let condition = parser::condition("id <= 2").unwrap();
        assert_eq!(table.delete("users", condition.as_ref()).unwrap(), 2);
        assert_eq!(table.rows.len(), 1);

        let assignments = [("name".to_string(), Literal::untyped("zed"))];
        assert_eq!(table.update("users", &assignments, None).unwrap(), 1);
        assert_eq!(select_where(&table, ""), vec![vec!["10".to_string(), "zed".to_string()]]);
    }

    #[test]
    fn order_and_limit() {
        let (_, table) = users();
        let order = OrderBy {
            column: "id".into(),
            descending: true,
        };
        let names = Columns::Named(vec!["name".into()]);

        let rows = table.select("users", &names, None, Some(&order), Some(2)).unwrap();
        assert_eq!(rows, vec![vec!["cyd".to_string()], vec!["bob".to_string()]]);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let (mut doc, table) = users();
        *doc.table_mut("users").unwrap() = table;
        doc.save(&path, true).unwrap();

        assert_eq!(Document::load(&path).unwrap(), doc);
    }

    #[test]
    fn load_rejects_malformed_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        for content in [
            r#"{"tables":{"t":{"columns":[{"name":"a"},{"name":"b"}],"rows":[["x"]]}}}"#,
            r#"{"tables":{"t":{"columns":[{"name":"a"},{"name":"a"}],"rows":[]}}}"#,
        ] {
            fs::write(&path, content).unwrap();
            let err = Document::load(&path).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::Connection(_)));
        }
    }
}

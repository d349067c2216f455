//! A flat-file engine for the `seam` access contract.
//!
//! Every table lives in a single JSON document, rewritten atomically on commit.
//! Conditions and raw statements use a small SQL subset; bind placeholders are
//! written `@name` or `:name`.
use seam_core::error::{DatabaseErrorInformation, DatabaseErrorKind, Error};

mod ast;
mod config;
mod connection;
mod encode;
mod parser;
mod storage;
mod tokenizer;

#[doc(inline)]
pub use self::config::Config;
#[doc(inline)]
pub use self::connection::FlatFile;

pub(crate) fn undefined_table(table: &str) -> Error {
    Error::database_error(
        DatabaseErrorKind::UndefinedTable,
        FlatFileErrorInfo {
            message: format!("table `{}` does not exist", table),
            table: Some(table.to_owned()),
            column: None,
        },
    )
}

pub(crate) fn duplicate_table(table: &str) -> Error {
    Error::database_error(
        DatabaseErrorKind::DuplicateTable,
        FlatFileErrorInfo {
            message: format!("table `{}` already exists", table),
            table: Some(table.to_owned()),
            column: None,
        },
    )
}

pub(crate) fn undefined_column(table: &str, column: &str) -> Error {
    Error::database_error(
        DatabaseErrorKind::UndefinedColumn,
        FlatFileErrorInfo {
            message: format!("column `{}` does not exist in `{}`", column, table),
            table: Some(table.to_owned()),
            column: Some(column.to_owned()),
        },
    )
}

/// Detail of a flat-file schema error.
#[derive(Debug, Clone)]
pub struct FlatFileErrorInfo {
    message: String,
    table: Option<String>,
    column: Option<String>,
}

impl DatabaseErrorInformation for FlatFileErrorInfo {
    fn message(&self) -> &str {
        &self.message
    }

    fn details(&self) -> Option<&str> {
        None
    }

    fn hint(&self) -> Option<&str> {
        None
    }

    fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    fn constraint(&self) -> Option<&str> {
        None
    }
}

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// A generic error.
pub type AnyError = Box<dyn StdError + Send + Sync + 'static>;

/// Result from a database operation.
pub type QueryResult<T> = Result<T, Error>;

/// An error returned by a [`Database`](crate::backend::Database) operation.
///
/// The `Display` implementation is the human readable diagnostic of the failure.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// The operation `op` is not supported by the engine.
    ///
    /// `op` names the operation, e.g. `"INSERT"`.
    pub fn unsupported(op: &'static str) -> Self {
        ErrorKind::Unsupported(op).into()
    }

    pub fn not_connected() -> Self {
        ErrorKind::NotConnected.into()
    }

    pub fn connection_failure(error: impl Into<AnyError>) -> Self {
        ErrorKind::Connection(error.into()).into()
    }

    pub fn database_error<Info>(kind: DatabaseErrorKind, info: Info) -> Self
    where
        Info: DatabaseErrorInformation + Send + Sync + 'static,
    {
        ErrorKind::DatabaseError(kind, Box::new(info)).into()
    }

    pub fn invalid_statement(message: impl Into<String>) -> Self {
        ErrorKind::InvalidStatement(message.into()).into()
    }

    pub fn serialization_failure(error: impl Into<AnyError>) -> Self {
        ErrorKind::SerializationError(error.into()).into()
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, ErrorKind::Unsupported(_))
    }

    pub fn is_not_connected(&self) -> bool {
        matches!(self.kind, ErrorKind::NotConnected)
    }

    /// Returns the kind of database error, if this is one.
    pub fn database_error_kind(&self) -> Option<DatabaseErrorKind> {
        match &self.kind {
            ErrorKind::DatabaseError(kind, _) => Some(*kind),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        ErrorKind::Io(err).into()
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The engine doesn't implement the operation.
    #[error("{0}: function is not implemented")]
    Unsupported(&'static str),
    /// A data operation was issued while the engine was disconnected.
    #[error("not connected to the database")]
    NotConnected,
    #[error("unable to connect: {0}")]
    Connection(#[source] AnyError),
    #[error("{0}: {}", .1.message())]
    DatabaseError(
        DatabaseErrorKind,
        Box<dyn DatabaseErrorInformation + Send + Sync>,
    ),
    #[error("invalid statement: {0}")]
    InvalidStatement(String),
    #[error("error while serializing value: {0}")]
    SerializationError(#[source] AnyError),
    #[error("storage error: {0}")]
    Io(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub enum DatabaseErrorKind {
    UniqueViolation,
    ForeignKeyViolation,
    UndefinedTable,
    UndefinedColumn,
    DuplicateTable,
    SerializationFailure,
    Unknown,
}

impl fmt::Display for DatabaseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UniqueViolation => "Unique violation",
            Self::ForeignKeyViolation => "Foreign key violation",
            Self::UndefinedTable => "Undefined table",
            Self::UndefinedColumn => "Undefined column",
            Self::DuplicateTable => "Duplicate table",
            Self::SerializationFailure => "Serialization failure",
            Self::Unknown => "Unknown error",
        })
    }
}

/// Engine supplied detail about a [`ErrorKind::DatabaseError`].
pub trait DatabaseErrorInformation {
    fn message(&self) -> &str;
    fn details(&self) -> Option<&str>;
    fn hint(&self) -> Option<&str>;
    fn table(&self) -> Option<&str>;
    fn column(&self) -> Option<&str>;
    fn constraint(&self) -> Option<&str>;
}

impl fmt::Debug for dyn DatabaseErrorInformation + Send + Sync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl DatabaseErrorInformation for String {
    fn message(&self) -> &str {
        self
    }

    fn details(&self) -> Option<&str> {
        None
    }

    fn hint(&self) -> Option<&str> {
        None
    }

    fn table(&self) -> Option<&str> {
        None
    }

    fn column(&self) -> Option<&str> {
        None
    }

    fn constraint(&self) -> Option<&str> {
        None
    }
}

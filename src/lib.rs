//! Engine agnostic data access.
//!
//! Re-exports the contract of `seam-core` and, with the `flatfile` feature, the
//! flat-file engine.
//!
//! ```
//! use seam::flatfile::FlatFile;
//! use seam::{row, Binds, Connection, DataType};
//!
//! let conn = Connection::new(FlatFile::in_memory());
//! conn.connect()?;
//! conn.execute_non_query("CREATE TABLE seen (nick VARCHAR, at DATE)", &Binds::new())?;
//! conn.insert_row("seen", &row!["petan", seam::Value::text("2024-03-05 09:07:03", DataType::Date)])?;
//!
//! let binds = Binds::new().with("@nick", "petan", DataType::Varchar);
//! let rows = conn.select_raw("SELECT at FROM seen WHERE nick = @nick", &binds)?;
//! assert_eq!(rows, [["2024-03-05 09:07:03"]]);
//! # Ok::<(), seam::Error>(())
//! ```

pub use seam_core::*;

#[cfg(feature = "flatfile")]
pub use seam_flatfile as flatfile;

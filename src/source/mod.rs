//! Row sources.
//!
//! A [`DataSource`] runs a [`CompiledQuery`] and hands back plain rows keyed
//! by column name. Rows keep the order the query produced.

mod sqlite;

pub use sqlite::SqliteSource;

use crate::compile::CompiledQuery;
use crate::model::Row;

/// Errors from fetching rows.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Executes compiled report queries.
pub trait DataSource {
    fn fetch(&self, query: &CompiledQuery) -> SourceResult<Vec<Row>>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn fetch(&self, query: &CompiledQuery) -> SourceResult<Vec<Row>> {
        (**self).fetch(query)
    }
}

/// Rows held in memory, returned as-is whatever the query.
impl DataSource for Vec<Row> {
    fn fetch(&self, _query: &CompiledQuery) -> SourceResult<Vec<Row>> {
        Ok(self.clone())
    }
}

//! SQLite-backed data source.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::{DataSource, SourceResult};
use crate::compile::CompiledQuery;
use crate::model::{Row, Value};
use crate::sql::Dialect;

/// Runs report queries against a SQLite database.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open an existing database read-only.
    pub fn open(path: &Path) -> SourceResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Open an empty in-memory database (for testing).
    pub fn open_in_memory() -> SourceResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DataSource for SqliteSource {
    fn fetch(&self, query: &CompiledQuery) -> SourceResult<Vec<Row>> {
        let sql = query.to_sql(Dialect::Sqlite);
        tracing::debug!(%sql, "fetching report rows");

        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let rows = stmt
            .query_map([], |row| {
                let mut out = Row::new();
                for (i, name) in columns.iter().enumerate() {
                    out.insert(name, to_value(row.get_ref(i)?));
                }
                Ok(out)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = rows.len(), "fetched report rows");
        Ok(rows)
    }
}

fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Int(n),
        ValueRef::Real(x) => Value::Float(x),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

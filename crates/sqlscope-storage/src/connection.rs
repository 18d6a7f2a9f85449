//! SQLite connection that traces every statement.
//!
//! This is the boundary with the data access layer: bind parameters are
//! captured as [`ScalarValue`](sqlscope_core::ScalarValue)s here and every
//! call is reported to the logger as a typed [`SqlEvent`]. Logging never
//! changes the outcome of the database call.

use anyhow::{Context, Result};
use rusqlite::{Connection, Row, ToSql};
use sqlscope_core::SqlEvent;
use sqlscope_logging::Logger;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::bind::{to_scalars, trace_template};

/// SQLite connection wrapper with SQL trace logging.
pub struct TracedConnection {
    conn: Connection,
    logger: Arc<Logger>,
}

impl TracedConnection {
    /// Open a database at the given path.
    ///
    /// If the database doesn't exist, it will be created.
    pub fn open(path: &Path, logger: Arc<Logger>) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;

        // Enable foreign keys
        conn.pragma_update(None, "foreign_keys", "ON")?;

        debug!("Opened database at {:?}", path);

        Ok(Self { conn, logger })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory(logger: Arc<Logger>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        // Enable foreign keys
        conn.pragma_update(None, "foreign_keys", "ON")?;

        debug!("Opened in-memory database");

        Ok(Self { conn, logger })
    }

    /// Get a reference to the underlying connection. Calls made on it are not traced.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Execute one statement, returning the number of changed rows.
    #[track_caller]
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> rusqlite::Result<usize> {
        let start = Instant::now();
        let result = self.conn.execute(sql, params);
        let rows = result.as_ref().ok().map(|n| *n as i64);
        self.trace(sql, params, start, rows, Location::caller());
        result
    }

    /// Execute several `;`-separated statements without parameters.
    #[track_caller]
    pub fn execute_batch(&self, sql: &str) -> rusqlite::Result<()> {
        let start = Instant::now();
        let result = self.conn.execute_batch(sql);
        self.trace(sql, &[], start, None, Location::caller());
        result
    }

    /// Run a query expected to return exactly one row.
    #[track_caller]
    pub fn query_row<T, F>(&self, sql: &str, params: &[&dyn ToSql], f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let start = Instant::now();
        let result = self.conn.query_row(sql, params, f);
        let rows = result.as_ref().ok().map(|_| 1);
        self.trace(sql, params, start, rows, Location::caller());
        result
    }

    /// Run a query and map every returned row.
    #[track_caller]
    pub fn query_map<T, F>(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        f: F,
    ) -> rusqlite::Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let start = Instant::now();
        let result = self.conn.prepare(sql).and_then(|mut stmt| {
            let rows = stmt.query_map(params, f)?;
            rows.collect::<rusqlite::Result<Vec<T>>>()
        });
        let rows = result.as_ref().ok().map(|rows| rows.len() as i64);
        self.trace(sql, params, start, rows, Location::caller());
        result
    }

    fn trace(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
        start: Instant,
        rows: Option<i64>,
        location: &Location<'_>,
    ) {
        let mut event = SqlEvent::new(trace_template(sql), to_scalars(params))
            .with_source(format!("{}:{}", location.file(), location.line()))
            .with_elapsed(start.elapsed());
        event.rows = rows;
        self.logger.trace_sql(&event);
    }
}

//! The SQLite-backed [`DataSource`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rowscope_core::{ColumnMetadata, DataSource, FetchError, PageRequest, PageResult};
use rowscope_filter::ColumnDescriptor;
use rusqlite::{params, Connection, InterruptHandle, OpenFlags};
use serde::Serialize;

use crate::error::SourceError;
use crate::value::cell_to_json;

/// A table and its total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub name: String,
    pub row_count: u64,
}

/// A SQLite database served page by page.
pub struct SqliteSource {
    conn: Arc<Mutex<Connection>>,
    interrupt: InterruptHandle,
}

impl SqliteSource {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open an existing database without write access.
    pub fn open_read_only(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::from_connection(conn))
    }

    /// Create a private in-memory database.
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        let interrupt = conn.get_interrupt_handle();
        Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
        }
    }

    /// Run `f` against the connection on the calling thread.
    ///
    /// Used for setup work such as seeding; page fetches go through
    /// [`DataSource::fetch_page`].
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> rusqlite::Result<T> {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// User tables with their row counts, sorted by name. The counts scan
    /// every table, so the whole listing runs under `timeout_seconds`.
    pub async fn list_tables(
        &self,
        timeout_seconds: Option<u64>,
    ) -> Result<Vec<TableSummary>, FetchError> {
        self.run_blocking(timeout_seconds, |conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
                 ORDER BY name",
            )?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            let mut tables = Vec::with_capacity(names.len());
            for name in names {
                let row_count = count_rows(conn, &name, None)?;
                tables.push(TableSummary { name, row_count });
            }
            Ok(tables)
        })
        .await
    }

    /// Whether `table` names a table or view.
    pub async fn has_table(&self, table: &str) -> Result<bool, FetchError> {
        let table = table.to_string();
        self.run_blocking(None, move |conn| table_exists(conn, &table))
            .await
    }

    /// Run a query on the blocking pool under `timeout_seconds`.
    ///
    /// Queries share one connection, so a timed-out query that is still
    /// waiting for the connection is abandoned instead of interrupted, and
    /// the interrupt is only sent while this query's own statements run.
    async fn run_blocking<T, F>(&self, timeout_seconds: Option<u64>, f: F) -> Result<T, FetchError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, SourceError> + Send + 'static,
    {
        let conn = self.conn.clone();
        let ticket = Arc::new(Mutex::new(QueryState::Queued));
        let task_ticket = ticket.clone();
        let task = tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            {
                let mut state = task_ticket.lock();
                if *state == QueryState::Abandoned {
                    return Err(SourceError::Abandoned);
                }
                *state = QueryState::Running;
            }
            let result = f(&conn);
            *task_ticket.lock() = QueryState::Finished;
            result
        });

        let joined = match timeout_seconds {
            Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), task).await {
                Ok(joined) => joined,
                Err(_) => {
                    // held across the interrupt so the query cannot finish
                    // and hand the connection on in between
                    let mut state = ticket.lock();
                    match *state {
                        QueryState::Queued => {
                            tracing::warn!(timeout_secs = secs, "abandoning queued query");
                            *state = QueryState::Abandoned;
                        }
                        QueryState::Running => {
                            tracing::warn!(timeout_secs = secs, "interrupting slow query");
                            self.interrupt.interrupt();
                        }
                        QueryState::Finished | QueryState::Abandoned => {}
                    }
                    return Err(FetchError::Timeout(secs));
                }
            },
            None => task.await,
        };

        joined
            .map_err(|e| FetchError::TransportFailure(format!("query task failed: {}", e)))?
            .map_err(FetchError::from)
    }
}

/// Progress of one query through the shared connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryState {
    Queued,
    Running,
    Finished,
    Abandoned,
}

#[async_trait]
impl DataSource for SqliteSource {
    async fn fetch_page(
        &self,
        table: &str,
        request: &PageRequest,
    ) -> Result<PageResult, FetchError> {
        let table = table.to_string();
        let request = request.clone();
        let timeout = request.timeout_seconds;

        tracing::trace!(
            table = %table,
            offset = request.offset,
            limit = request.limit,
            "sqlite fetch"
        );
        self.run_blocking(timeout, move |conn| query_page(conn, &table, &request))
            .await
    }
}

#[async_trait]
impl ColumnMetadata for SqliteSource {
    async fn get_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, FetchError> {
        let table = table.to_string();
        self.run_blocking(None, move |conn| {
            ensure_table(conn, &table)?;
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(&table)))?;
            let columns = stmt
                .query_map([], |row| {
                    Ok(ColumnDescriptor::new(
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(columns)
        })
        .await
    }
}

fn query_page(
    conn: &Connection,
    table: &str,
    request: &PageRequest,
) -> Result<PageResult, SourceError> {
    ensure_table(conn, table)?;

    let where_sql = request
        .where_clause
        .as_deref()
        .map(|clause| format!(" WHERE {}", clause))
        .unwrap_or_default();
    let order_sql = request
        .order_by
        .as_deref()
        .map(|column| {
            let direction = request.order_direction.unwrap_or_default();
            format!(" ORDER BY {} {}", quote_ident(column), direction.as_sql())
        })
        .unwrap_or_default();

    let total_count = count_rows(conn, table, request.where_clause.as_deref())?;

    let sql = format!(
        "SELECT * FROM {}{}{} LIMIT ?1 OFFSET ?2",
        quote_ident(table),
        where_sql,
        order_sql
    );
    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let offset = i64::try_from(request.offset).unwrap_or(i64::MAX);
    let mut rows = Vec::new();
    let mut cursor = stmt.query(params![i64::from(request.limit), offset])?;
    while let Some(row) = cursor.next()? {
        let mut record = Vec::with_capacity(width);
        for i in 0..width {
            record.push(cell_to_json(row.get_ref(i)?));
        }
        rows.push(record);
    }

    let has_more = request.offset + (rows.len() as u64) < total_count;
    Ok(PageResult {
        columns,
        rows,
        total_count,
        has_more,
    })
}

fn count_rows(
    conn: &Connection,
    table: &str,
    where_clause: Option<&str>,
) -> Result<u64, SourceError> {
    let mut sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
    if let Some(clause) = where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, SourceError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn ensure_table(conn: &Connection, table: &str) -> Result<(), SourceError> {
    if !table_exists(conn, table)? {
        return Err(SourceError::NoSuchTable(table.to_string()));
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

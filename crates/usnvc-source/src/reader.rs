//! SQLite source reader

use rusqlite::{Connection, OpenFlags, Params, params};
use tracing::{debug, info, instrument, warn};
use usnvc_core::UnitId;

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::row::{FieldValue, Row};

/// Read-only handle on a relational snapshot
///
/// Each reader owns its connection. Concurrent builds must each open their
/// own reader; a reader is `Send` but not `Sync`.
pub struct SourceReader {
    conn: Connection,
    config: SourceConfig,
}

impl SourceReader {
    /// Open a snapshot file read-only
    #[instrument(skip(config), fields(path = %config.db_path.display(), version = %config.version))]
    pub fn open(config: SourceConfig) -> Result<Self, SourceError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&config.db_path, flags).map_err(|e| {
            SourceError::Open {
                path: config.db_path.clone(),
                message: e.to_string(),
            }
        })?;

        info!("Opened source database");

        Ok(Self { conn, config })
    }

    /// Open an empty in-memory database (fixtures and tests)
    pub fn open_in_memory(config: SourceConfig) -> Result<Self, SourceError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run a query and collect every row
    pub fn query_rows<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Row>, SourceError> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params)?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                let value = FieldValue::from(row.get_ref(index)?);
                columns.push((name.clone(), value));
            }
            result.push(Row::new(columns));
        }

        debug!(rows = result.len(), "Query complete");
        Ok(result)
    }

    /// Run a query expected to return at most one row of interest
    pub fn query_optional<P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Option<Row>, SourceError> {
        Ok(self.query_rows(sql, params)?.into_iter().next())
    }

    /// Run a single-row lookup; zero rows is a `NotFound` error naming `what`
    pub fn query_one<P: Params>(
        &self,
        sql: &str,
        params: P,
        what: &str,
    ) -> Result<Row, SourceError> {
        self.query_optional(sql, params)?
            .ok_or_else(|| SourceError::not_found(what))
    }

    /// Run a query whose first column is a unit identifier
    ///
    /// Identifiers convert the same way as [`Row::unit_id`]; rows that
    /// cannot be converted are logged and left out.
    pub fn query_ids<P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<UnitId>, SourceError> {
        let rows = self.query_rows(sql, params)?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in &rows {
            let Some(column) = row.column_names().next() else {
                continue;
            };
            match row.unit_id(column) {
                Some(id) => ids.push(id),
                None => warn!(
                    column,
                    value = ?row.get(column),
                    "Skipping unconvertible unit identifier"
                ),
            }
        }
        Ok(ids)
    }

    /// Whether a table or view exists in the snapshot
    pub fn table_exists(&self, table: &str) -> Result<bool, SourceError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
            params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Run a cross-reference query only if every table it reads exists
    ///
    /// Snapshots of different schema versions carry different optional
    /// tables; a missing table yields no rows instead of an error.
    pub fn query_rows_if_tables<P: Params>(
        &self,
        tables: &[&str],
        sql: &str,
        params: P,
    ) -> Result<Vec<Row>, SourceError> {
        for table in tables {
            if !self.table_exists(table)? {
                debug!(table, "Optional table absent from snapshot");
                return Ok(Vec::new());
            }
        }
        self.query_rows(sql, params)
    }
}

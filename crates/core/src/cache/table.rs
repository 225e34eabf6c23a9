//! Flat, positional table storage.
//!
//! The result cache only needs what a spreadsheet worksheet offers: read every
//! row, append rows at the end, delete a row by its 1-based index (row 1 is the
//! header). Deleting a row shifts every later row up by one.

use async_trait::async_trait;
use tokio_rusqlite::params;

use super::connection::CacheDb;
use crate::Error;

/// A flat table addressed by 1-based row index.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Every row in table order, header included.
    async fn read_all(&self) -> Result<Vec<Vec<String>>, Error>;

    /// Append rows after the last row.
    async fn append(&self, rows: Vec<Vec<String>>) -> Result<(), Error>;

    /// Delete the row at `row_index` (1-based), shifting later rows up.
    async fn delete(&self, row_index: usize) -> Result<(), Error>;

    /// Delete rows `start..=end` (1-based).
    async fn delete_range(&self, start: usize, end: usize) -> Result<(), Error> {
        for row_index in (start..=end).rev() {
            self.delete(row_index).await?;
        }
        Ok(())
    }
}

/// A named worksheet stored in the SQLite cache database.
#[derive(Clone, Debug)]
pub struct SqliteTable {
    db: CacheDb,
    sheet: String,
}

impl SqliteTable {
    pub fn new(db: CacheDb, sheet: impl Into<String>) -> Self {
        Self { db, sheet: sheet.into() }
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }
}

#[async_trait]
impl TableStore for SqliteTable {
    async fn read_all(&self) -> Result<Vec<Vec<String>>, Error> {
        let sheet = self.sheet.clone();
        self.db
            .conn
            .call(move |conn| -> Result<Vec<Vec<String>>, Error> {
                let mut stmt =
                    conn.prepare("SELECT position, cells_json FROM sheet_rows WHERE sheet = ?1 ORDER BY position")?;
                let raw = stmt
                    .query_map(params![sheet], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;

                let rows = raw
                    .into_iter()
                    .map(|(position, json)| {
                        serde_json::from_str::<Vec<String>>(&json).unwrap_or_else(|e| {
                            tracing::warn!(sheet = %sheet, position, error = %e, "unreadable row, treating as blank");
                            Vec::new()
                        })
                    })
                    .collect();
                Ok(rows)
            })
            .await
            .map_err(Error::from)
    }

    async fn append(&self, rows: Vec<Vec<String>>) -> Result<(), Error> {
        if rows.is_empty() {
            return Ok(());
        }
        let sheet = self.sheet.clone();
        let written_at = chrono::Utc::now().to_rfc3339();
        let encoded = rows
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidInput(format!("failed to encode row: {e}")))?;

        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                let last: i64 = tx.query_row(
                    "SELECT COALESCE(MAX(position), 0) FROM sheet_rows WHERE sheet = ?1",
                    params![sheet],
                    |row| row.get(0),
                )?;
                {
                    let mut insert = tx.prepare(
                        "INSERT INTO sheet_rows (sheet, position, cells_json, written_at) VALUES (?1, ?2, ?3, ?4)",
                    )?;
                    for (offset, cells_json) in encoded.iter().enumerate() {
                        insert.execute(params![sheet, last + 1 + offset as i64, cells_json, written_at])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, row_index: usize) -> Result<(), Error> {
        self.delete_range(row_index, row_index).await
    }

    async fn delete_range(&self, start: usize, end: usize) -> Result<(), Error> {
        if start == 0 || end < start {
            return Err(Error::InvalidInput(format!("invalid row range {start}..={end}")));
        }
        let sheet = self.sheet.clone();
        let (start, end) = (start as i64, end as i64);

        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                let len: i64 = tx.query_row(
                    "SELECT COUNT(*) FROM sheet_rows WHERE sheet = ?1",
                    params![sheet],
                    |row| row.get(0),
                )?;
                if end > len {
                    return Err(Error::RowOutOfRange { index: end as usize, len: len as usize });
                }

                tx.execute(
                    "DELETE FROM sheet_rows WHERE sheet = ?1 AND position BETWEEN ?2 AND ?3",
                    params![sheet, start, end],
                )?;
                // Two passes through negative positions keep the primary key unique while shifting.
                let removed = end - start + 1;
                tx.execute(
                    "UPDATE sheet_rows SET position = -(position - ?3) WHERE sheet = ?1 AND position > ?2",
                    params![sheet, end, removed],
                )?;
                tx.execute(
                    "UPDATE sheet_rows SET position = -position WHERE sheet = ?1 AND position < 0",
                    params![sheet],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

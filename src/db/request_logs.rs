use anyhow::Result;
use rusqlite::{params, Connection};

const INSERT_REQUEST_LOG: &str = "INSERT INTO request_logs (method, path, status, latency_ms) VALUES (?1, ?2, ?3, ?4)";
const COUNT_REQUEST_LOGS: &str = "SELECT COUNT(*) FROM request_logs";
const TRUNCATE_REQUEST_LOGS: &str = "DELETE FROM request_logs";

/// Access log of API requests.
pub struct RequestLogs<'a> {
    conn: &'a Connection,
}

impl<'a> RequestLogs<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        RequestLogs { conn }
    }

    pub fn insert(&self, method: &str, path: &str, status: u16, latency_ms: i64) -> Result<()> {
        self.conn.execute(INSERT_REQUEST_LOG, params![method, path, status, latency_ms])?;
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self.conn.query_row(COUNT_REQUEST_LOGS, [], |row| row.get(0))?)
    }

    /// Deletes every row and returns how many were removed.
    pub fn truncate(&self) -> Result<usize> {
        Ok(self.conn.execute(TRUNCATE_REQUEST_LOGS, [])?)
    }
}

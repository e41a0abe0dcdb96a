use super::migrations::init_with_migrations;
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Connection shared between request handlers and scheduled jobs.
///
/// The guard is not `Send`; never hold it across an `.await`.
pub type SharedDb = Arc<Mutex<Db>>;

/// Owned SQLite connection with the schema migrated to the latest version.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    pub fn open(path: &Path) -> Result<Db> {
        let conn = Connection::open(path)?;
        Self::prepare(conn)
    }

    /// Private database that disappears with the connection. Used by tests.
    pub fn in_memory() -> Result<Db> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(conn)
    }

    fn prepare(mut conn: Connection) -> Result<Db> {
        // Sub-tasks and list members rely on ON DELETE CASCADE.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_functions(&conn)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    pub fn shared(self) -> SharedDb {
        Arc::new(Mutex::new(self))
    }

    /// Cheap round trip used by the `/healthz` probe.
    pub fn ping(&self) -> Result<()> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

/// Name of the Unicode-aware lowercase function; SQLite's own `lower` only
/// folds ASCII.
pub const UNICODE_LOWER: &str = "unicode_lower";

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|value| value.to_lowercase())),
    )?;
    Ok(())
}

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const UPSERT_URL_TITLE: &str = "INSERT INTO url_titles (title, url, is_valid)
    VALUES (?1, ?2, ?3)
    ON CONFLICT (url) DO UPDATE SET
        title = excluded.title,
        is_valid = excluded.is_valid,
        updated_at = CURRENT_TIMESTAMP";
const SELECT_URL_TITLES: &str = "SELECT title, is_valid, url FROM url_titles";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlTitle {
    pub title: String,
    pub is_valid: bool,
    pub url: String,
}

/// Cache of page titles keyed by URL.
pub struct UrlTitles<'a> {
    conn: &'a Connection,
}

impl<'a> UrlTitles<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        UrlTitles { conn }
    }

    pub fn save_or_update(&self, title: &str, url: &str, is_valid: bool) -> Result<()> {
        self.conn.execute(UPSERT_URL_TITLE, params![title, url, is_valid])?;
        Ok(())
    }

    pub fn get(&self, url: &str) -> Result<Option<UrlTitle>> {
        let sql = format!("{} WHERE url = ?1", SELECT_URL_TITLES);
        Ok(self.conn.query_row(&sql, params![url], url_title_from_row).optional()?)
    }

    pub fn all(&self) -> Result<Vec<UrlTitle>> {
        let sql = format!("{} ORDER BY id", SELECT_URL_TITLES);
        let mut stmt = self.conn.prepare(&sql)?;
        let titles = stmt.query_map([], url_title_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }
}

fn url_title_from_row(row: &Row) -> rusqlite::Result<UrlTitle> {
    Ok(UrlTitle {
        title: row.get(0)?,
        is_valid: row.get(1)?,
        url: row.get(2)?,
    })
}

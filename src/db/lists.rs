use crate::libs::task::TaskList;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_LIST: &str = "INSERT INTO lists (name) VALUES (?1)";
const SELECT_LISTS: &str = "SELECT l.id, l.name, l.created_at, COUNT(t.id) AS task_count
    FROM lists l
    LEFT JOIN tasks t ON t.list_id = l.id";
const UPDATE_NAME: &str = "UPDATE lists SET name = ?2 WHERE id = ?1";
const DELETE_LIST: &str = "DELETE FROM lists WHERE id = ?1";

/// Named groups of tasks. Deleting a list deletes its tasks.
pub struct Lists<'a> {
    conn: &'a Connection,
}

impl<'a> Lists<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Lists { conn }
    }

    pub fn insert(&self, name: &str) -> Result<i64> {
        self.conn.execute(INSERT_LIST, params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list(&self) -> Result<Vec<TaskList>> {
        let sql = format!("{} GROUP BY l.id ORDER BY l.created_at, l.id", SELECT_LISTS);
        let mut stmt = self.conn.prepare(&sql)?;
        let lists = stmt.query_map([], list_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    pub fn get(&self, id: i64) -> Result<Option<TaskList>> {
        let sql = format!("{} WHERE l.id = ?1 GROUP BY l.id", SELECT_LISTS);
        Ok(self.conn.query_row(&sql, params![id], list_from_row).optional()?)
    }

    pub fn rename(&self, id: i64, name: &str) -> Result<bool> {
        Ok(self.conn.execute(UPDATE_NAME, params![id, name])? == 1)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute(DELETE_LIST, params![id])? == 1)
    }
}

fn list_from_row(row: &Row) -> rusqlite::Result<TaskList> {
    Ok(TaskList {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        task_count: row.get(3)?,
    })
}

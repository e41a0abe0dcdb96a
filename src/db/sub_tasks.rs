use super::tasks::TIMESTAMP_FORMAT;
use crate::libs::task::SubTask;
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_SUB_TASK: &str = "INSERT INTO sub_tasks (task_id, name) VALUES (?1, ?2)";
const SELECT_SUB_TASKS: &str = "SELECT id, task_id, name, completed, completed_on, created_at FROM sub_tasks";
const UPDATE_NAME: &str = "UPDATE sub_tasks SET name = ?2 WHERE id = ?1";
const TOGGLE_COMPLETED: &str = "UPDATE sub_tasks
    SET completed = NOT completed,
        completed_on = CASE WHEN completed = 0 THEN ?2 ELSE '' END
    WHERE id = ?1";
const DELETE_SUB_TASK: &str = "DELETE FROM sub_tasks WHERE id = ?1";
const TASK_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)";

pub struct SubTasks<'a> {
    conn: &'a Connection,
}

impl<'a> SubTasks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        SubTasks { conn }
    }

    /// Adds a sub-task; `Ok(None)` when the parent task does not exist.
    pub fn insert(&self, task_id: i64, name: &str) -> Result<Option<i64>> {
        let exists: bool = self.conn.query_row(TASK_EXISTS, params![task_id], |row| row.get(0))?;
        if !exists {
            return Ok(None);
        }
        self.conn.execute(INSERT_SUB_TASK, params![task_id, name])?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    pub fn list_for_task(&self, task_id: i64) -> Result<Vec<SubTask>> {
        let sql = format!("{} WHERE task_id = ?1 ORDER BY created_at, id", SELECT_SUB_TASKS);
        let mut stmt = self.conn.prepare(&sql)?;
        let sub_tasks = stmt
            .query_map(params![task_id], sub_task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sub_tasks)
    }

    pub fn get(&self, id: i64) -> Result<Option<SubTask>> {
        let sql = format!("{} WHERE id = ?1", SELECT_SUB_TASKS);
        Ok(self.conn.query_row(&sql, params![id], sub_task_from_row).optional()?)
    }

    pub fn rename(&self, id: i64, name: &str) -> Result<bool> {
        Ok(self.conn.execute(UPDATE_NAME, params![id, name])? == 1)
    }

    pub fn toggle_completed(&self, id: i64, now: NaiveDateTime) -> Result<bool> {
        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        Ok(self.conn.execute(TOGGLE_COMPLETED, params![id, stamp])? == 1)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute(DELETE_SUB_TASK, params![id])? == 1)
    }
}

fn sub_task_from_row(row: &Row) -> rusqlite::Result<SubTask> {
    Ok(SubTask {
        id: row.get(0)?,
        task_id: row.get(1)?,
        name: row.get(2)?,
        completed: row.get(3)?,
        completed_on: row.get(4)?,
        created_at: row.get(5)?,
    })
}

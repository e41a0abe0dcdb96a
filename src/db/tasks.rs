use crate::libs::messages::Message;
use crate::libs::query::{build_tasks_query, SELECT_TASKS};
use crate::libs::recurrence::next_occurrence;
use crate::libs::task::{NewTask, RecurrencePattern, Task, TaskQuery};
use crate::msg_info;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::ValueRef;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const INSERT_TASK: &str = "INSERT INTO tasks
    (name, completed, completed_on, marked_today, is_important, due_date, metadata, list_id, profile_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const INSERT_RECURRING_TASK: &str = "INSERT INTO tasks
    (name, start_date, due_date, recurrence_pattern, recurrence_interval, list_id, profile_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const UPDATE_NAME: &str = "UPDATE tasks SET name = ?2 WHERE id = ?1";
const UPDATE_METADATA: &str = "UPDATE tasks SET metadata = ?2 WHERE id = ?1";
const UPDATE_DUE_DATE: &str = "UPDATE tasks SET due_date = ?2 WHERE id = ?1";
const UPDATE_RECURRENCE: &str = "UPDATE tasks SET recurrence_pattern = ?2, recurrence_interval = ?3 WHERE id = ?1";
const UPDATE_LIST: &str = "UPDATE tasks SET list_id = ?2 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const TOGGLE_COMPLETED: &str = "UPDATE tasks
    SET completed = NOT completed,
        completed_on = CASE WHEN completed = 0 THEN ?2 ELSE '' END
    WHERE id = ?1
    RETURNING name, completed, list_id, profile_id, recurrence_pattern, recurrence_interval";
const TOGGLE_IMPORTANT: &str = "UPDATE tasks SET is_important = NOT is_important WHERE id = ?1";
const TOGGLE_MY_DAY: &str = "UPDATE tasks
    SET marked_today = CASE
        WHEN marked_today = '' THEN ?2
        WHEN DATE(marked_today) != DATE(?2) THEN ?2
        ELSE ''
    END
    WHERE id = ?1";
const WHERE_ID: &str = "WHERE t.id = ?1 GROUP BY t.id";
const WHERE_DUE_ON: &str = "WHERE t.completed = 0 AND t.due_date != '' AND DATE(t.due_date) = ?1
    GROUP BY t.id ORDER BY t.created_at DESC, t.id DESC";
const WHERE_COMPLETED_ON: &str = "WHERE t.completed = 1 AND t.completed_on != '' AND DATE(t.completed_on) = ?1
    GROUP BY t.id ORDER BY t.completed_on, t.id";
const SELECT_ALL_ROWS: &str = "SELECT * FROM tasks ORDER BY id";
const COUNT_ALL: &str = "SELECT COUNT(*) FROM tasks";
const COUNT_COMPLETED: &str = "SELECT COUNT(*) FROM tasks WHERE completed = 1";

/// Outcome of flipping a task's completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    pub completed: bool,
    /// Id of the follow-up task inserted for a completed recurring task.
    pub next_task_id: Option<i64>,
}

/// Raw table dump: column names and every row rendered as text.
#[derive(Debug, Clone, Default)]
pub struct TableRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Task repository over a borrowed connection.
///
/// Mutations return `Ok(false)` when no row has the given id.
pub struct Tasks<'a> {
    conn: &'a Connection,
}

impl<'a> Tasks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Tasks { conn }
    }

    pub fn insert(&self, task: &NewTask) -> Result<i64> {
        self.conn.execute(
            INSERT_TASK,
            params![
                task.name,
                task.completed,
                task.completed_on,
                task.marked_today,
                task.is_important,
                task.due_date,
                task.metadata,
                task.list_id,
                task.profile_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get(&self, id: i64) -> Result<Option<Task>> {
        let sql = format!("{} {}", SELECT_TASKS, WHERE_ID);
        let task = self.conn.query_row(&sql, params![id], task_from_row).optional()?;
        Ok(task)
    }

    pub fn fetch(&self, query: &TaskQuery, today: NaiveDate) -> Result<Vec<Task>> {
        let (sql, args) = build_tasks_query(query, today);
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params_from_iter(args.iter()), task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn update_name(&self, id: i64, name: &str) -> Result<bool> {
        Ok(self.conn.execute(UPDATE_NAME, params![id, name])? == 1)
    }

    pub fn update_metadata(&self, id: i64, metadata: &str) -> Result<bool> {
        Ok(self.conn.execute(UPDATE_METADATA, params![id, metadata])? == 1)
    }

    /// Sets the due date; an empty string clears it.
    pub fn set_due_date(&self, id: i64, due_date: &str) -> Result<bool> {
        Ok(self.conn.execute(UPDATE_DUE_DATE, params![id, due_date])? == 1)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute(DELETE_TASK, params![id])? == 1)
    }

    pub fn toggle_important(&self, id: i64) -> Result<bool> {
        Ok(self.conn.execute(TOGGLE_IMPORTANT, params![id])? == 1)
    }

    /// Marks the task for `now`'s day, or clears a mark already made today.
    /// A mark left over from an earlier day is replaced rather than cleared.
    pub fn toggle_my_day(&self, id: i64, now: NaiveDateTime) -> Result<bool> {
        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        Ok(self.conn.execute(TOGGLE_MY_DAY, params![id, stamp])? == 1)
    }

    pub fn set_recurrence(&self, id: i64, pattern: Option<RecurrencePattern>, interval: Option<i64>) -> Result<bool> {
        let pattern = pattern.map(|p| p.as_str());
        Ok(self.conn.execute(UPDATE_RECURRENCE, params![id, pattern, interval])? == 1)
    }

    /// Moves the task into `list_id`, or out of every list for `None`.
    pub fn move_to_list(&self, id: i64, list_id: Option<i64>) -> Result<bool> {
        Ok(self.conn.execute(UPDATE_LIST, params![id, list_id])? == 1)
    }

    /// Flips completion and, for a recurring task that just got completed,
    /// inserts its next occurrence. Both happen in one transaction.
    pub fn toggle_completed(&self, id: i64, now: NaiveDateTime) -> Result<Option<Toggled>> {
        let tx = self.conn.unchecked_transaction()?;
        let stamp = now.format(TIMESTAMP_FORMAT).to_string();

        let updated = tx
            .query_row(TOGGLE_COMPLETED, params![id, stamp], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, bool>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                ))
            })
            .optional()?;

        let Some((name, completed, list_id, profile_id, pattern, interval)) = updated else {
            return Ok(None);
        };

        let mut next_task_id = None;
        if completed {
            let pattern = pattern.and_then(|p| p.parse::<RecurrencePattern>().ok());
            if let (Some(pattern), Some(interval)) = (pattern, interval) {
                if let Some(next) = next_occurrence(now.date(), pattern, interval) {
                    let next = next.format(DATE_FORMAT).to_string();
                    tx.execute(
                        INSERT_RECURRING_TASK,
                        params![name, next, next, pattern.as_str(), interval, list_id, profile_id],
                    )?;
                    let next_id = tx.last_insert_rowid();
                    msg_info!(Message::RecurringTaskCreated(id, next_id));
                    next_task_id = Some(next_id);
                }
            }
        }

        tx.commit()?;
        Ok(Some(Toggled { completed, next_task_id }))
    }

    /// Incomplete tasks due on `date`, newest first.
    pub fn due_on(&self, date: NaiveDate) -> Result<Vec<Task>> {
        self.select_by_date(WHERE_DUE_ON, date)
    }

    /// Tasks completed on `date`, in completion order.
    pub fn completed_on(&self, date: NaiveDate) -> Result<Vec<Task>> {
        self.select_by_date(WHERE_COMPLETED_ON, date)
    }

    fn select_by_date(&self, clause: &str, date: NaiveDate) -> Result<Vec<Task>> {
        let sql = format!("{} {}", SELECT_TASKS, clause);
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params![date.format(DATE_FORMAT).to_string()], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn count_all(&self) -> Result<i64> {
        Ok(self.conn.query_row(COUNT_ALL, [], |row| row.get(0))?)
    }

    pub fn count_completed(&self) -> Result<i64> {
        Ok(self.conn.query_row(COUNT_COMPLETED, [], |row| row.get(0))?)
    }

    /// Every column of every task, for backups. NULL becomes an empty string.
    pub fn all_rows_for_backup(&self) -> Result<TableRows> {
        let mut stmt = self.conn.prepare(SELECT_ALL_ROWS)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| (0..width).map(|i| row.get_ref(i).map(render_value)).collect::<Result<Vec<_>, _>>())?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TableRows { columns, rows })
    }
}

fn render_value(value: ValueRef) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

/// Maps a row shaped like [`SELECT_TASKS`] into a [`Task`].
pub fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let pattern: Option<String> = row.get(11)?;

    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        completed: row.get(2)?,
        completed_on: row.get(3)?,
        created_at: row.get(4)?,
        marked_today: row.get(5)?,
        is_important: row.get(6)?,
        due_date: row.get(7)?,
        metadata: row.get(8)?,
        list_id: row.get(9)?,
        profile_id: row.get(10)?,
        recurrence_pattern: pattern.and_then(|p| p.parse().ok()),
        recurrence_interval: row.get(12)?,
        start_date: row.get(13)?,
        sub_task_count: row.get(14)?,
        incomplete_sub_task_count: row.get(15)?,
    })
}

//! Dynamic SQL for the task listing.
//!
//! [`build_tasks_query`] turns a [`TaskQuery`] into a `SELECT` over `tasks`
//! joined with `sub_tasks`, plus the positional parameters it binds. Every
//! placeholder is numbered after the value it refers to, so `?n` always names
//! `params[n - 1]`.

use crate::db::db::UNICODE_LOWER;
use crate::libs::task::TaskQuery;
use chrono::NaiveDate;
use rusqlite::types::Value;

/// Column list shared by every query that materializes a [`Task`](crate::libs::task::Task).
pub const SELECT_TASKS: &str = "SELECT
    t.id,
    t.name,
    t.completed,
    t.completed_on,
    t.created_at,
    t.marked_today,
    t.is_important,
    t.due_date,
    t.metadata,
    t.list_id,
    t.profile_id,
    t.recurrence_pattern,
    t.recurrence_interval,
    t.start_date,
    COUNT(st.id) AS sub_task_count,
    COUNT(CASE WHEN st.completed = 0 THEN 1 END) AS incomplete_sub_task_count
FROM tasks t
LEFT JOIN sub_tasks st ON st.task_id = t.id";

pub const FILTER_MY_DAY: &str = "my-day";
pub const FILTER_IMPORTANT: &str = "important";

struct QueryBuilder {
    sql: String,
    params: Vec<Value>,
    has_where: bool,
}

impl QueryBuilder {
    fn new(select: &str) -> Self {
        QueryBuilder {
            sql: select.to_string(),
            params: Vec::new(),
            has_where: false,
        }
    }

    /// Registers a parameter and returns its 1-based placeholder index.
    fn bind(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }

    fn condition(&mut self, clause: &str) {
        self.sql.push_str(if self.has_where { " AND " } else { " WHERE " });
        self.sql.push_str(clause);
        self.has_where = true;
    }

    fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

pub fn build_tasks_query(query: &TaskQuery, today: NaiveDate) -> (String, Vec<Value>) {
    let mut builder = QueryBuilder::new(SELECT_TASKS);

    match query.filter.as_str() {
        FILTER_MY_DAY => {
            let n = builder.bind(Value::Text(today.format("%Y-%m-%d").to_string()));
            builder.condition(&format!(
                "((t.marked_today != '' AND DATE(t.marked_today) = ?{n}) OR (t.due_date != '' AND DATE(t.due_date) = ?{n}))"
            ));
        }
        FILTER_IMPORTANT => builder.condition("t.is_important = 1"),
        _ => {}
    }

    if let Some(profile_id) = query.profile_id {
        let n = builder.bind(Value::Integer(profile_id));
        builder.condition(&format!("t.profile_id = ?{n}"));
    }

    if query.show_completed == "false" {
        builder.condition("t.completed = 0");
    }

    if !query.search.is_empty() {
        let n = builder.bind(Value::Text(query.search.to_lowercase()));
        builder.condition(&format!("{UNICODE_LOWER}(t.name) LIKE '%' || ?{n} || '%'"));
    }

    match query.list_id {
        Some(list_id) => {
            let n = builder.bind(Value::Integer(list_id));
            builder.condition(&format!("t.list_id = ?{n}"));
        }
        None => {
            let spans_lists = query.filter == FILTER_IMPORTANT || query.filter == FILTER_MY_DAY || query.show_all_tasks == "true";
            if !spans_lists {
                builder.condition("t.list_id IS NULL");
            }
        }
    }

    builder.sql.push_str(" GROUP BY t.id ORDER BY t.created_at DESC, t.id DESC");

    if query.size > 0 {
        let n = builder.bind(Value::Integer(query.size));
        builder.sql.push_str(&format!(" LIMIT ?{n}"));

        if query.offset > 0 {
            let n = builder.bind(Value::Integer(query.offset));
            builder.sql.push_str(&format!(" OFFSET ?{n}"));
        }
    } else if query.offset > 0 {
        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
        let n = builder.bind(Value::Integer(query.offset));
        builder.sql.push_str(&format!(" LIMIT -1 OFFSET ?{n}"));
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn where_clause(sql: &str) -> &str {
        let start = sql.find(" WHERE ").map(|i| i + 7).unwrap_or(sql.len());
        let end = sql.find(" GROUP BY").unwrap();
        if start >= end {
            ""
        } else {
            &sql[start..end]
        }
    }

    #[test]
    fn default_query_lists_tasks_outside_lists() {
        let (sql, params) = build_tasks_query(&TaskQuery::default(), today());

        assert_eq!(where_clause(&sql), "t.list_id IS NULL");
        assert!(sql.ends_with("GROUP BY t.id ORDER BY t.created_at DESC, t.id DESC"));
        assert!(params.is_empty());
    }

    #[test]
    fn my_day_binds_today_once_and_reuses_the_placeholder() {
        let query = TaskQuery {
            filter: "my-day".into(),
            ..Default::default()
        };
        let (sql, params) = build_tasks_query(&query, today());

        assert_eq!(
            where_clause(&sql),
            "((t.marked_today != '' AND DATE(t.marked_today) = ?1) OR (t.due_date != '' AND DATE(t.due_date) = ?1))"
        );
        assert_eq!(params, vec![Value::Text("2024-03-15".into())]);
    }

    #[test]
    fn important_filter_spans_all_lists() {
        let query = TaskQuery {
            filter: "important".into(),
            show_completed: "false".into(),
            ..Default::default()
        };
        let (sql, params) = build_tasks_query(&query, today());

        assert_eq!(where_clause(&sql), "t.is_important = 1 AND t.completed = 0");
        assert!(params.is_empty());
    }

    #[test]
    fn show_completed_true_adds_no_condition() {
        let query = TaskQuery {
            show_completed: "true".into(),
            show_all_tasks: "true".into(),
            ..Default::default()
        };
        let (sql, _) = build_tasks_query(&query, today());

        assert_eq!(where_clause(&sql), "");
        assert!(!sql.contains(" WHERE "));
    }

    #[test]
    fn placeholders_follow_parameter_positions() {
        let query = TaskQuery {
            filter: "my-day".into(),
            search: "milk".into(),
            show_completed: "false".into(),
            size: 10,
            list_id: Some(4),
            profile_id: Some(2),
            ..Default::default()
        };
        let (sql, params) = build_tasks_query(&query, today());

        assert_eq!(
            where_clause(&sql),
            "((t.marked_today != '' AND DATE(t.marked_today) = ?1) OR (t.due_date != '' AND DATE(t.due_date) = ?1)) \
             AND t.profile_id = ?2 AND t.completed = 0 AND unicode_lower(t.name) LIKE '%' || ?3 || '%' AND t.list_id = ?4"
        );
        assert!(sql.ends_with(" LIMIT ?5"));
        assert_eq!(
            params,
            vec![
                Value::Text("2024-03-15".into()),
                Value::Integer(2),
                Value::Text("milk".into()),
                Value::Integer(4),
                Value::Integer(10),
            ]
        );
    }

    #[test]
    fn search_without_filter_starts_at_first_placeholder() {
        let query = TaskQuery {
            search: "report".into(),
            ..Default::default()
        };
        let (sql, params) = build_tasks_query(&query, today());

        assert_eq!(where_clause(&sql), "unicode_lower(t.name) LIKE '%' || ?1 || '%' AND t.list_id IS NULL");
        assert_eq!(params, vec![Value::Text("report".into())]);
    }

    #[test]
    fn unknown_filter_behaves_like_no_filter() {
        let query = TaskQuery {
            filter: "someday".into(),
            ..Default::default()
        };
        let (sql, _) = build_tasks_query(&query, today());

        assert_eq!(where_clause(&sql), "t.list_id IS NULL");
    }

    #[test]
    fn offset_follows_limit() {
        let query = TaskQuery {
            size: 20,
            offset: 40,
            ..Default::default()
        };
        let (sql, params) = build_tasks_query(&query, today());

        assert!(sql.ends_with(" LIMIT ?1 OFFSET ?2"));
        assert_eq!(params, vec![Value::Integer(20), Value::Integer(40)]);
    }

    #[test]
    fn zero_size_means_no_limit() {
        let (sql, params) = build_tasks_query(&TaskQuery::default(), today());

        assert!(!sql.contains("LIMIT"));
        assert!(params.is_empty());
    }
}

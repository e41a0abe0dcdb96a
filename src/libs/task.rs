use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A to-do item as stored in the `tasks` table.
///
/// Text date columns use an empty string for "unset", which is also what the
/// JSON API exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub completed: bool,
    pub completed_on: String,
    pub created_at: String,
    pub marked_today: String,
    pub is_important: bool,
    pub due_date: String,
    pub metadata: String,
    pub list_id: Option<i64>,
    pub profile_id: Option<i64>,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_interval: Option<i64>,
    pub start_date: Option<String>,
    pub sub_task_count: i64,
    pub incomplete_sub_task_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: i64,
    pub task_id: i64,
    pub name: String,
    pub completed: bool,
    pub completed_on: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub task_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrencePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily => "daily",
            RecurrencePattern::Weekly => "weekly",
            RecurrencePattern::Monthly => "monthly",
            RecurrencePattern::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrencePattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(RecurrencePattern::Daily),
            "weekly" => Ok(RecurrencePattern::Weekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            "yearly" => Ok(RecurrencePattern::Yearly),
            other => Err(format!("unknown recurrence pattern '{}'", other)),
        }
    }
}

/// Body of `POST /api/v1/task/create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_on: String,
    #[serde(default)]
    pub marked_today: String,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub list_id: Option<i64>,
    #[serde(default)]
    pub profile_id: Option<i64>,
}

impl NewTask {
    pub fn new(name: &str) -> Self {
        NewTask {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskName {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskMetadata {
    #[serde(default)]
    pub metadata: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DueDate {
    #[serde(default)]
    pub due_date: String,
}

/// Body of `POST /api/v1/task/{id}/recurrence`. A missing pattern clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(default)]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default)]
    pub recurrence_interval: Option<i64>,
}

/// Body of `POST /api/v1/task/{id}/list`. `null` moves the task out of all lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveToList {
    #[serde(default)]
    pub list_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSubTask {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewList {
    #[serde(default)]
    pub name: String,
}

/// Filter, search and pagination parameters of the task listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub filter: String,
    pub search: String,
    pub show_completed: String,
    pub size: i64,
    pub offset: i64,
    pub list_id: Option<i64>,
    pub show_all_tasks: String,
    pub profile_id: Option<i64>,
}

/// Raw query string of `GET /api/v1/tasks`, before any parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQueryParams {
    pub filter: Option<String>,
    pub query: Option<String>,
    #[serde(rename = "showCompleted")]
    pub show_completed: Option<String>,
    pub size: Option<String>,
    pub offset: Option<String>,
    #[serde(rename = "listId")]
    pub list_id: Option<String>,
    #[serde(rename = "showAllTasks")]
    pub show_all_tasks: Option<String>,
    #[serde(rename = "profileId")]
    pub profile_id: Option<String>,
}

impl From<TaskQueryParams> for TaskQuery {
    fn from(params: TaskQueryParams) -> Self {
        TaskQuery {
            filter: params.filter.unwrap_or_default(),
            search: params.query.unwrap_or_default(),
            show_completed: params.show_completed.unwrap_or_default(),
            size: parse_size(params.size.as_deref().unwrap_or("")),
            offset: parse_size(params.offset.as_deref().unwrap_or("")),
            list_id: parse_id(params.list_id.as_deref()),
            show_all_tasks: params.show_all_tasks.unwrap_or_default(),
            profile_id: parse_id(params.profile_id.as_deref()),
        }
    }
}

/// Page size from a query string value. Anything that is not a non-negative
/// integer means "no limit".
pub fn parse_size(value: &str) -> i64 {
    value.trim().parse::<i64>().map(|n| n.max(0)).unwrap_or(0)
}

fn parse_id(value: Option<&str>) -> Option<i64> {
    value.map(str::trim).filter(|v| !v.is_empty()).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing_never_goes_negative() {
        assert_eq!(parse_size("25"), 25);
        assert_eq!(parse_size("-4"), 0);
        assert_eq!(parse_size("abc"), 0);
        assert_eq!(parse_size(""), 0);
    }

    #[test]
    fn query_params_use_camel_case_names() {
        let params: TaskQueryParams =
            serde_json::from_str(r#"{"filter":"my-day","query":"milk","showCompleted":"false","size":"10","listId":"3","showAllTasks":"true","profileId":"x"}"#)
                .unwrap();
        let query = TaskQuery::from(params);

        assert_eq!(query.filter, "my-day");
        assert_eq!(query.search, "milk");
        assert_eq!(query.show_completed, "false");
        assert_eq!(query.size, 10);
        assert_eq!(query.list_id, Some(3));
        assert_eq!(query.show_all_tasks, "true");
        assert_eq!(query.profile_id, None);
    }

    #[test]
    fn recurrence_pattern_is_lowercase_on_the_wire() {
        let json = serde_json::to_string(&RecurrencePattern::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
        assert_eq!("Weekly".parse::<RecurrencePattern>(), Ok(RecurrencePattern::Weekly));
        assert!("hourly".parse::<RecurrencePattern>().is_err());
    }
}

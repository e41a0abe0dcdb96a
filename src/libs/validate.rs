use crate::libs::messages::Message;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 1000;

/// One failed field in a `validation_failed` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidField {
    pub is_valid: bool,
    pub field: String,
    pub error_message: String,
}

impl InvalidField {
    fn new(field: &str, message: Message) -> Self {
        InvalidField {
            is_valid: false,
            field: field.to_string(),
            error_message: message.to_string(),
        }
    }
}

/// Checks a task, sub-task or list name. Lengths are counted in characters.
pub fn validate_name(name: &str) -> Vec<InvalidField> {
    let field = "Name";
    let length = name.trim().chars().count();

    if length == 0 {
        vec![InvalidField::new(field, Message::FieldRequired(field.into()))]
    } else if length < NAME_MIN_CHARS {
        vec![InvalidField::new(field, Message::FieldTooShort(field.into(), NAME_MIN_CHARS))]
    } else if name.chars().count() > NAME_MAX_CHARS {
        vec![InvalidField::new(field, Message::FieldTooLong(field.into(), NAME_MAX_CHARS))]
    } else {
        Vec::new()
    }
}

/// A due date is either empty (cleared) or a `YYYY-MM-DD` calendar date.
pub fn is_valid_due_date(value: &str) -> bool {
    value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

pub fn is_valid_recurrence_interval(interval: i64) -> bool {
    interval >= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_required() {
        let errors = validate_name("   ");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Name");
        assert_eq!(errors[0].error_message, "The Name field is required.");
    }

    #[test]
    fn short_and_long_names_are_rejected() {
        assert_eq!(validate_name("ab")[0].error_message, "The Name field must be at least 3 characters long.");
        let long = "x".repeat(NAME_MAX_CHARS + 1);
        assert_eq!(validate_name(&long)[0].error_message, "The Name field must be less than 1000 characters long.");
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        assert!(validate_name("ñañ").is_empty());
        assert!(validate_name(&"é".repeat(NAME_MAX_CHARS)).is_empty());
    }

    #[test]
    fn due_dates() {
        assert!(is_valid_due_date(""));
        assert!(is_valid_due_date("2024-02-29"));
        assert!(!is_valid_due_date("2023-02-29"));
        assert!(!is_valid_due_date("tomorrow"));
    }
}

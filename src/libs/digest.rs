//! Daily digest emails: quotes, today's open tasks and today's completions.

use crate::db::db::SharedDb;
use crate::db::tasks::Tasks;
use crate::libs::email::{Email, EmailBody};
use crate::libs::quotes::QuoteBook;
use crate::libs::task::Task;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{row, Table};
use std::str::FromStr;

pub const QUOTES_PER_DIGEST: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestKind {
    Quotes,
    Today,
    Completed,
}

impl FromStr for DigestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quotes" => Ok(DigestKind::Quotes),
            "today" => Ok(DigestKind::Today),
            "completed" => Ok(DigestKind::Completed),
            other => Err(format!("unknown digest '{}'", other)),
        }
    }
}

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d %Y").to_string()
}

pub fn quotes_email(to: &str, quotes: &QuoteBook, now: NaiveDateTime) -> Email {
    let mut body = format!("Quotes of the day: {}\n\n", long_date(now.date()));
    for (idx, quote) in quotes.random(QUOTES_PER_DIGEST).iter().enumerate() {
        body.push_str(&format!("{}. {}\n\n", idx + 1, quote));
    }

    Email {
        to: to.to_string(),
        subject: "Quotes of the day".to_string(),
        body: EmailBody::Text(body),
        attachment: None,
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn today_tasks_html(tasks: &[Task], today: NaiveDate) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"UTF-8\" /><title>Today's Task List</title></head>\n\
         <body style=\"font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif;\">\n",
    );
    html.push_str(&format!("<h2>Today's Task List</h2>\n<p>{}</p>\n", escape_html(&long_date(today))));

    if tasks.is_empty() {
        html.push_str("<p>Nothing is due today.</p>\n");
    } else {
        html.push_str("<ol>\n");
        for task in tasks {
            html.push_str(&format!("  <li>{}</li>\n", escape_html(&task.name)));
        }
        html.push_str("</ol>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub fn today_tasks_email(to: &str, tasks: &[Task], today: NaiveDate) -> Email {
    Email {
        to: to.to_string(),
        subject: "Today's Task List".to_string(),
        body: EmailBody::Html(today_tasks_html(tasks, today)),
        attachment: None,
    }
}

/// Plain-text table with the overall task counts.
pub fn counts_table(total: i64, completed: i64) -> String {
    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);
    table.set_titles(row!["ID", "Title", "Count"]);
    table.add_row(row![1, "Total Tasks", total]);
    table.add_row(row![2, "Total Completed Tasks", completed]);
    table.to_string()
}

pub fn completed_email(to: &str, completed: &[Task], total: i64, total_completed: i64, today: NaiveDate) -> Email {
    let mut body = format!("Tasks completed Today: {}\n\n", long_date(today));
    for (idx, task) in completed.iter().enumerate() {
        body.push_str(&format!("{}. {}\n", idx + 1, task.name));
    }
    body.push('\n');
    body.push_str(&counts_table(total, total_completed));

    Email {
        to: to.to_string(),
        subject: "Tasks completed Today".to_string(),
        body: EmailBody::Text(body),
        attachment: None,
    }
}

/// Builds the requested digest from the current database state.
pub fn build_digest(kind: DigestKind, db: &SharedDb, quotes: &QuoteBook, to: &str, now: NaiveDateTime) -> Result<Email> {
    let today = now.date();
    let email = match kind {
        DigestKind::Quotes => quotes_email(to, quotes, now),
        DigestKind::Today => {
            let db = db.lock();
            let tasks = Tasks::new(&db.conn).due_on(today)?;
            today_tasks_email(to, &tasks, today)
        }
        DigestKind::Completed => {
            let db = db.lock();
            let store = Tasks::new(&db.conn);
            let completed = store.completed_on(today)?;
            completed_email(to, &completed, store.count_all()?, store.count_completed()?, today)
        }
    };
    Ok(email)
}

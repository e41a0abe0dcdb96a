use crate::db::db::{Db, SharedDb};
use crate::db::tasks::Tasks;
use crate::libs::config::EmailConfig;
use crate::libs::email::{send_logged, Email, EmailAttachment, EmailBody, Mailer};
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;
use chrono::NaiveDateTime;
use std::path::Path;

pub const BACKUP_FILE_NAME: &str = "backup.csv";
const BACKUP_BODY: &str = "Attached is the backup CSV file you requested.";

/// Every task row as CSV, header first. NULL columns are empty fields.
pub fn tasks_csv(db: &Db) -> Result<Vec<u8>> {
    let table = Tasks::new(&db.conn).all_rows_for_backup()?;

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }

    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}

/// "Backup file generated on Monday, January 2, 2006 3:04 PM"
pub fn backup_subject(now: NaiveDateTime) -> String {
    format!("Backup file generated on {}", now.format("%A, %B %-d, %Y %-I:%M %p"))
}

pub fn write_backup(db: &Db, path: &Path) -> Result<()> {
    std::fs::write(path, tasks_csv(db)?)?;
    msg_success!(Message::BackupWritten(path.display().to_string()));
    Ok(())
}

/// Mails the CSV dump of `tasks` to the configured recipient.
pub async fn backup_tasks(db: &SharedDb, mailer: &dyn Mailer, email: &EmailConfig, now: NaiveDateTime) -> Result<()> {
    let content = {
        let db = db.lock();
        tasks_csv(&db)?
    };

    let message = Email {
        to: email.to_email.clone(),
        subject: backup_subject(now),
        body: EmailBody::Text(BACKUP_BODY.to_string()),
        attachment: Some(EmailAttachment {
            filename: BACKUP_FILE_NAME.to_string(),
            content_type: "text/csv".to_string(),
            content,
        }),
    };

    send_logged(mailer, &message).await?;
    msg_success!(Message::BackupSent);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn subject_uses_twelve_hour_clock() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(15, 4, 0).unwrap();
        assert_eq!(backup_subject(now), "Backup file generated on Monday, March 4, 2024 3:04 PM");
    }
}

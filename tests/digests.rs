#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use test_context::{test_context, AsyncTestContext};
    use todo_server::db::db::{Db, SharedDb};
    use todo_server::db::request_logs::RequestLogs;
    use todo_server::db::tasks::Tasks;
    use todo_server::libs::backup::{backup_tasks, write_backup, BACKUP_FILE_NAME};
    use todo_server::libs::config::{Config, EmailConfig};
    use todo_server::libs::digest::{build_digest, DigestKind};
    use todo_server::libs::email::{Email, EmailBody, Mailer};
    use todo_server::libs::quotes::QuoteBook;
    use todo_server::libs::scheduler::{JobContext, ScheduledJob};
    use todo_server::libs::task::NewTask;
    use todo_server::libs::title::TitleFetcher;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<Email>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &Email) -> anyhow::Result<()> {
            self.sent.lock().push(email.clone());
            Ok(())
        }
    }

    struct DigestTestContext {
        db: SharedDb,
        mailer: Arc<RecordingMailer>,
        email: EmailConfig,
    }

    impl AsyncTestContext for DigestTestContext {
        async fn setup() -> Self {
            DigestTestContext {
                db: Db::in_memory().unwrap().shared(),
                mailer: Arc::new(RecordingMailer::default()),
                email: EmailConfig {
                    from_email: "robot@example.com".into(),
                    password: "pw".into(),
                    to_email: "owner@example.com".into(),
                    ..EmailConfig::default()
                },
            }
        }
    }

    impl DigestTestContext {
        fn job_context(&self, with_mailer: bool) -> JobContext {
            let mut config = Config::default();
            config.email = Some(self.email.clone());
            let mailer: Option<Arc<dyn Mailer>> = if with_mailer { Some(self.mailer.clone()) } else { None };
            JobContext {
                db: self.db.clone(),
                config: Arc::new(config),
                mailer,
                quotes: Arc::new(QuoteBook::builtin()),
                fetcher: Arc::new(TitleFetcher::without_browser()),
            }
        }

        fn seed(&self) {
            let db = self.db.lock();
            let tasks = Tasks::new(&db.conn);
            tasks
                .insert(&NewTask {
                    due_date: "2024-03-15".into(),
                    ..NewTask::new("Pay <bills> & rent")
                })
                .unwrap();
            let done = tasks.insert(&NewTask::new("Walk the dog")).unwrap();
            tasks.toggle_completed(done, now()).unwrap();
            tasks.insert(&NewTask::new("Someday task")).unwrap();
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-03-15 15:04:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test_context(DigestTestContext)]
    #[tokio::test]
    async fn test_backup_mails_csv_attachment(ctx: &mut DigestTestContext) {
        ctx.seed();
        backup_tasks(&ctx.db, ctx.mailer.as_ref(), &ctx.email, now()).await.unwrap();

        let sent = ctx.mailer.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].subject, "Backup file generated on Friday, March 15, 2024 3:04 PM");

        let attachment = sent[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.filename, BACKUP_FILE_NAME);
        assert_eq!(attachment.content_type, "text/csv");

        let mut reader = csv::Reader::from_reader(attachment.content.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "id");
        assert!(headers.iter().any(|h| h == "recurrence_pattern"));
        assert_eq!(reader.records().count(), 3);
    }

    #[test_context(DigestTestContext)]
    #[tokio::test]
    async fn test_backup_to_file(ctx: &mut DigestTestContext) {
        ctx.seed();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        {
            let db = ctx.db.lock();
            write_backup(&db, &path).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,name,"));
        assert!(content.contains("Walk the dog"));
    }

    #[test_context(DigestTestContext)]
    #[tokio::test]
    async fn test_today_digest_escapes_names(ctx: &mut DigestTestContext) {
        ctx.seed();
        let email = build_digest(DigestKind::Today, &ctx.db, &QuoteBook::builtin(), "owner@example.com", now()).unwrap();

        assert_eq!(email.subject, "Today's Task List");
        let EmailBody::Html(html) = email.body else {
            panic!("today digest must be HTML");
        };
        assert!(html.contains("Pay &lt;bills&gt; &amp; rent"));
        assert!(!html.contains("Walk the dog"));
        assert!(!html.contains("Someday task"));
    }

    #[test_context(DigestTestContext)]
    #[tokio::test]
    async fn test_completed_digest_lists_counts(ctx: &mut DigestTestContext) {
        ctx.seed();
        let email = build_digest(DigestKind::Completed, &ctx.db, &QuoteBook::builtin(), "owner@example.com", now()).unwrap();

        assert_eq!(email.subject, "Tasks completed Today");
        let EmailBody::Text(text) = email.body else {
            panic!("completed digest must be plain text");
        };
        assert!(text.contains("1. Walk the dog"));
        assert!(text.contains("Total Tasks"));
        assert!(text.contains("Total Completed Tasks"));
    }

    #[test_context(DigestTestContext)]
    #[tokio::test]
    async fn test_quotes_digest_has_two_quotes(ctx: &mut DigestTestContext) {
        let book = QuoteBook::from_quotes(["Only quote".to_string()]);
        let email = build_digest(DigestKind::Quotes, &ctx.db, &book, "owner@example.com", now()).unwrap();

        let EmailBody::Text(text) = email.body else {
            panic!("quotes digest must be plain text");
        };
        assert!(text.starts_with("Quotes of the day: Friday, March 15 2024"));
        assert!(text.contains("1. Only quote"));
        assert!(text.contains("2. Only quote"));
    }

    #[test_context(DigestTestContext)]
    #[tokio::test]
    async fn test_email_jobs_skip_without_mailer(ctx: &mut DigestTestContext) {
        ctx.job_context(false).run(ScheduledJob::Backup).await.unwrap();
        assert!(ctx.mailer.sent.lock().is_empty());

        ctx.job_context(true).run(ScheduledJob::QuotesDigest).await.unwrap();
        assert_eq!(ctx.mailer.sent.lock().len(), 1);
    }

    #[test_context(DigestTestContext)]
    #[tokio::test]
    async fn test_truncate_job_clears_request_logs(ctx: &mut DigestTestContext) {
        {
            let db = ctx.db.lock();
            let logs = RequestLogs::new(&db.conn);
            logs.insert("GET", "/api/v1/tasks", 200, 3).unwrap();
            logs.insert("POST", "/api/v1/task/create", 201, 5).unwrap();
        }

        ctx.job_context(false).run(ScheduledJob::TruncateRequestLogs).await.unwrap();

        let db = ctx.db.lock();
        assert_eq!(RequestLogs::new(&db.conn).count().unwrap(), 0);
    }
}

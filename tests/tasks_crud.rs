#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use test_context::{test_context, TestContext};
    use todo_server::db::db::Db;
    use todo_server::db::lists::Lists;
    use todo_server::db::tasks::Tasks;
    use todo_server::libs::task::{NewTask, TaskQuery};

    struct TaskTestContext {
        db: Db,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            TaskTestContext {
                db: Db::in_memory().unwrap(),
            }
        }
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    fn names(tasks: &[todo_server::libs::task::Task]) -> Vec<String> {
        tasks.iter().map(|t| t.name.clone()).collect()
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_insert_and_get(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks.insert(&NewTask::new("Buy milk")).unwrap();

        let task = tasks.get(id).unwrap().unwrap();
        assert_eq!(task.name, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.completed_on, "");
        assert_eq!(task.due_date, "");
        assert_eq!(task.list_id, None);
        assert_eq!(task.sub_task_count, 0);
        assert!(!task.created_at.is_empty());

        assert!(tasks.get(id + 100).unwrap().is_none());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_update_and_delete(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks.insert(&NewTask::new("Draft")).unwrap();

        assert!(tasks.update_name(id, "Final").unwrap());
        assert!(tasks.update_metadata(id, r#"{"color":"red"}"#).unwrap());
        assert!(tasks.set_due_date(id, "2024-03-15").unwrap());

        let task = tasks.get(id).unwrap().unwrap();
        assert_eq!(task.name, "Final");
        assert_eq!(task.metadata, r#"{"color":"red"}"#);
        assert_eq!(task.due_date, "2024-03-15");

        assert!(tasks.delete(id).unwrap());
        assert!(!tasks.delete(id).unwrap());
        assert!(!tasks.update_name(id, "Gone").unwrap());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_toggle_important_twice_restores(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks.insert(&NewTask::new("Call mom")).unwrap();

        tasks.toggle_important(id).unwrap();
        assert!(tasks.get(id).unwrap().unwrap().is_important);
        tasks.toggle_important(id).unwrap();
        assert!(!tasks.get(id).unwrap().unwrap().is_important);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_toggle_completed_sets_and_clears_timestamp(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks.insert(&NewTask::new("Water plants")).unwrap();
        let now = at("2024-03-15", "10:30:00");

        let toggled = tasks.toggle_completed(id, now).unwrap().unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.next_task_id, None);
        assert_eq!(tasks.get(id).unwrap().unwrap().completed_on, "2024-03-15 10:30:00");

        let toggled = tasks.toggle_completed(id, now).unwrap().unwrap();
        assert!(!toggled.completed);
        assert_eq!(tasks.get(id).unwrap().unwrap().completed_on, "");

        assert!(tasks.toggle_completed(id + 1, now).unwrap().is_none());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_my_day_toggles_within_a_day(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks.insert(&NewTask::new("Plan the week")).unwrap();

        tasks.toggle_my_day(id, at("2024-03-14", "09:00:00")).unwrap();
        assert_eq!(tasks.get(id).unwrap().unwrap().marked_today, "2024-03-14 09:00:00");

        // Yesterday's mark is replaced, not cleared.
        tasks.toggle_my_day(id, at("2024-03-15", "08:00:00")).unwrap();
        assert_eq!(tasks.get(id).unwrap().unwrap().marked_today, "2024-03-15 08:00:00");

        tasks.toggle_my_day(id, at("2024-03-15", "18:00:00")).unwrap();
        assert_eq!(tasks.get(id).unwrap().unwrap().marked_today, "");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_my_day_filter_matches_mark_or_due_date(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let marked = tasks.insert(&NewTask::new("Marked today")).unwrap();
        let due = tasks
            .insert(&NewTask {
                due_date: "2024-03-15".into(),
                ..NewTask::new("Due today")
            })
            .unwrap();
        let stale = tasks.insert(&NewTask::new("Marked yesterday")).unwrap();
        tasks.insert(&NewTask::new("Unrelated")).unwrap();

        tasks.toggle_my_day(marked, at("2024-03-15", "07:00:00")).unwrap();
        tasks.toggle_my_day(stale, at("2024-03-14", "07:00:00")).unwrap();

        let query = TaskQuery {
            filter: "my-day".into(),
            ..Default::default()
        };
        let found = tasks.fetch(&query, day("2024-03-15")).unwrap();
        let ids: Vec<i64> = found.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&marked));
        assert!(ids.contains(&due));
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_default_listing_hides_list_tasks(ctx: &mut TaskTestContext) {
        let list_id = Lists::new(&ctx.db.conn).insert("Work").unwrap();
        let tasks = Tasks::new(&ctx.db.conn);
        tasks.insert(&NewTask::new("Inbox task")).unwrap();
        tasks
            .insert(&NewTask {
                list_id: Some(list_id),
                is_important: true,
                ..NewTask::new("Work task")
            })
            .unwrap();
        let today = day("2024-03-15");

        let inbox = tasks.fetch(&TaskQuery::default(), today).unwrap();
        assert_eq!(names(&inbox), vec!["Inbox task"]);

        let in_list = tasks
            .fetch(
                &TaskQuery {
                    list_id: Some(list_id),
                    ..Default::default()
                },
                today,
            )
            .unwrap();
        assert_eq!(names(&in_list), vec!["Work task"]);

        let everything = tasks
            .fetch(
                &TaskQuery {
                    show_all_tasks: "true".into(),
                    ..Default::default()
                },
                today,
            )
            .unwrap();
        assert_eq!(everything.len(), 2);

        // The important view spans every list.
        let important = tasks
            .fetch(
                &TaskQuery {
                    filter: "important".into(),
                    ..Default::default()
                },
                today,
            )
            .unwrap();
        assert_eq!(names(&important), vec!["Work task"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_search_completed_and_profile_filters(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let milk = tasks.insert(&NewTask::new("Buy MILK")).unwrap();
        tasks.insert(&NewTask::new("Buy bread")).unwrap();
        tasks
            .insert(&NewTask {
                profile_id: Some(7),
                ..NewTask::new("Profile task")
            })
            .unwrap();
        tasks.toggle_completed(milk, at("2024-03-15", "10:00:00")).unwrap();
        let today = day("2024-03-15");

        let search = TaskQuery {
            search: "milk".into(),
            ..Default::default()
        };
        assert_eq!(names(&tasks.fetch(&search, today).unwrap()), vec!["Buy MILK"]);

        let open_only = TaskQuery {
            search: "buy".into(),
            show_completed: "false".into(),
            ..Default::default()
        };
        assert_eq!(names(&tasks.fetch(&open_only, today).unwrap()), vec!["Buy bread"]);

        let profile = TaskQuery {
            profile_id: Some(7),
            ..Default::default()
        };
        assert_eq!(names(&tasks.fetch(&profile, today).unwrap()), vec!["Profile task"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_search_folds_non_ascii_case(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        tasks.insert(&NewTask::new("Éclair recipe")).unwrap();
        tasks.insert(&NewTask::new("ÜBUNG machen")).unwrap();
        let today = day("2024-03-15");

        let search = |text: &str| {
            let query = TaskQuery {
                search: text.into(),
                ..Default::default()
            };
            names(&tasks.fetch(&query, today).unwrap())
        };

        assert_eq!(search("éclair"), vec!["Éclair recipe"]);
        assert_eq!(search("übung"), vec!["ÜBUNG machen"]);
        assert_eq!(search("ÉCLAIR REC"), vec!["Éclair recipe"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_pagination_newest_first(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        for n in 1..=5 {
            tasks.insert(&NewTask::new(&format!("Task {}", n))).unwrap();
        }
        let today = day("2024-03-15");

        let first_page = tasks
            .fetch(
                &TaskQuery {
                    size: 2,
                    ..Default::default()
                },
                today,
            )
            .unwrap();
        assert_eq!(names(&first_page), vec!["Task 5", "Task 4"]);

        let second_page = tasks
            .fetch(
                &TaskQuery {
                    size: 2,
                    offset: 2,
                    ..Default::default()
                },
                today,
            )
            .unwrap();
        assert_eq!(names(&second_page), vec!["Task 3", "Task 2"]);

        let skip_only = tasks
            .fetch(
                &TaskQuery {
                    offset: 4,
                    ..Default::default()
                },
                today,
            )
            .unwrap();
        assert_eq!(names(&skip_only), vec!["Task 1"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_due_and_completed_on_day(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        tasks
            .insert(&NewTask {
                due_date: "2024-03-15".into(),
                ..NewTask::new("Due")
            })
            .unwrap();
        let done = tasks
            .insert(&NewTask {
                due_date: "2024-03-15".into(),
                ..NewTask::new("Done early")
            })
            .unwrap();
        tasks.toggle_completed(done, at("2024-03-15", "12:00:00")).unwrap();

        assert_eq!(names(&tasks.due_on(day("2024-03-15")).unwrap()), vec!["Due"]);
        assert_eq!(names(&tasks.completed_on(day("2024-03-15")).unwrap()), vec!["Done early"]);
        assert!(tasks.completed_on(day("2024-03-16")).unwrap().is_empty());
        assert_eq!(tasks.count_all().unwrap(), 2);
        assert_eq!(tasks.count_completed().unwrap(), 1);
    }
}

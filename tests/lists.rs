#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use test_context::{test_context, TestContext};
    use todo_server::db::db::Db;
    use todo_server::db::lists::Lists;
    use todo_server::db::sub_tasks::SubTasks;
    use todo_server::db::tasks::Tasks;
    use todo_server::libs::task::NewTask;

    struct ListTestContext {
        db: Db,
    }

    impl TestContext for ListTestContext {
        fn setup() -> Self {
            ListTestContext {
                db: Db::in_memory().unwrap(),
            }
        }
    }

    #[test_context(ListTestContext)]
    #[test]
    fn test_list_counts_tasks(ctx: &mut ListTestContext) {
        let lists = Lists::new(&ctx.db.conn);
        let work = lists.insert("Work").unwrap();
        let home = lists.insert("Home").unwrap();

        let tasks = Tasks::new(&ctx.db.conn);
        for name in ["Report", "Review"] {
            tasks
                .insert(&NewTask {
                    list_id: Some(work),
                    ..NewTask::new(name)
                })
                .unwrap();
        }

        let all = lists.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!((all[0].name.as_str(), all[0].task_count), ("Work", 2));
        assert_eq!((all[1].name.as_str(), all[1].task_count), ("Home", 0));

        assert!(lists.rename(home, "House").unwrap());
        assert_eq!(lists.get(home).unwrap().unwrap().name, "House");
        assert!(lists.get(home + 10).unwrap().is_none());
    }

    #[test_context(ListTestContext)]
    #[test]
    fn test_deleting_list_deletes_its_tasks(ctx: &mut ListTestContext) {
        let lists = Lists::new(&ctx.db.conn);
        let tasks = Tasks::new(&ctx.db.conn);
        let list_id = lists.insert("Trip").unwrap();
        let task_id = tasks
            .insert(&NewTask {
                list_id: Some(list_id),
                ..NewTask::new("Pack bags")
            })
            .unwrap();
        let loose = tasks.insert(&NewTask::new("Stay home")).unwrap();

        assert!(lists.delete(list_id).unwrap());
        assert!(!lists.delete(list_id).unwrap());
        assert!(tasks.get(task_id).unwrap().is_none());
        assert!(tasks.get(loose).unwrap().is_some());
    }

    #[test_context(ListTestContext)]
    #[test]
    fn test_move_between_lists(ctx: &mut ListTestContext) {
        let lists = Lists::new(&ctx.db.conn);
        let tasks = Tasks::new(&ctx.db.conn);
        let list_id = lists.insert("Someday").unwrap();
        let id = tasks.insert(&NewTask::new("Learn piano")).unwrap();

        assert!(tasks.move_to_list(id, Some(list_id)).unwrap());
        assert_eq!(tasks.get(id).unwrap().unwrap().list_id, Some(list_id));

        assert!(tasks.move_to_list(id, None).unwrap());
        assert_eq!(tasks.get(id).unwrap().unwrap().list_id, None);
    }

    #[test_context(ListTestContext)]
    #[test]
    fn test_sub_task_lifecycle(ctx: &mut ListTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let sub_tasks = SubTasks::new(&ctx.db.conn);
        let task_id = tasks.insert(&NewTask::new("Move house")).unwrap();

        let boxes = sub_tasks.insert(task_id, "Buy boxes").unwrap().unwrap();
        let movers = sub_tasks.insert(task_id, "Book movers").unwrap().unwrap();
        assert!(sub_tasks.insert(task_id + 99, "Orphan").unwrap().is_none());

        let now = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert!(sub_tasks.toggle_completed(boxes, now).unwrap());
        assert_eq!(sub_tasks.get(boxes).unwrap().unwrap().completed_on, "2024-03-15 09:00:00");

        let task = tasks.get(task_id).unwrap().unwrap();
        assert_eq!(task.sub_task_count, 2);
        assert_eq!(task.incomplete_sub_task_count, 1);

        assert!(sub_tasks.rename(movers, "Book cheap movers").unwrap());
        let names: Vec<String> = sub_tasks.list_for_task(task_id).unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Buy boxes", "Book cheap movers"]);

        assert!(sub_tasks.delete(movers).unwrap());
        assert!(!sub_tasks.delete(movers).unwrap());
    }

    #[test_context(ListTestContext)]
    #[test]
    fn test_deleting_task_deletes_sub_tasks(ctx: &mut ListTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let sub_tasks = SubTasks::new(&ctx.db.conn);
        let task_id = tasks.insert(&NewTask::new("Party")).unwrap();
        let sub_id = sub_tasks.insert(task_id, "Invite friends").unwrap().unwrap();

        tasks.delete(task_id).unwrap();
        assert!(sub_tasks.get(sub_id).unwrap().is_none());
        assert!(sub_tasks.list_for_task(task_id).unwrap().is_empty());
    }
}

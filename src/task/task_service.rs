use crate::error::Result;
use crate::task::task_filter::RetrievalSpec;
use crate::task::task_models::{NewTask, Task, TaskChanges};
use crate::task::task_repository::TaskRepository;
use validator::Validate;

/// The task store: trims and validates writes before they reach SQL.
///
/// An empty title is not an error. The write is skipped and the caller
/// carries on as if it had succeeded.
#[derive(Clone)]
pub struct TaskService {
    repo: TaskRepository,
}

impl TaskService {
    pub fn new(repo: TaskRepository) -> Self {
        Self { repo }
    }

    pub async fn list_tasks(&self, spec: &RetrievalSpec) -> Result<Vec<Task>> {
        self.repo.find_all(spec).await
    }

    pub async fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        self.repo.find_by_id(task_id).await
    }

    pub async fn count_tasks(&self) -> Result<i64> {
        self.repo.count().await
    }

    /// Returns the new id, or `None` when the title is blank.
    pub async fn create_task(&self, mut task: NewTask) -> Result<Option<i64>> {
        task.title = task.title.trim().to_string();
        if let Err(e) = task.validate() {
            tracing::debug!("Skipping task creation: {}", e);
            return Ok(None);
        }

        let id = self.repo.create(&task).await?;
        tracing::debug!(task_id = id, "Created task");
        Ok(Some(id))
    }

    /// Overwrites every mutable field. Unknown ids and blank titles are no-ops.
    pub async fn update_task(&self, task_id: i64, mut changes: TaskChanges) -> Result<()> {
        changes.title = changes.title.trim().to_string();
        if let Err(e) = changes.validate() {
            tracing::debug!(task_id, "Skipping task update: {}", e);
            return Ok(());
        }

        let rows_affected = self.repo.update(task_id, &changes).await?;
        if rows_affected == 0 {
            tracing::debug!(task_id, "Update matched no task");
        }
        Ok(())
    }

    pub async fn toggle_completed(&self, task_id: i64) -> Result<Option<bool>> {
        self.repo.toggle_completed(task_id).await
    }

    pub async fn delete_task(&self, task_id: i64) -> Result<u64> {
        let rows_affected = self.repo.delete(task_id).await?;
        if rows_affected == 0 {
            tracing::debug!(task_id, "Delete matched no task");
        }
        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, DbPool};
    use crate::task::task_filter::{Predicate, SortKey, TaskQueryParams};
    use chrono::{Duration, Local, NaiveDate};

    async fn service() -> (TaskService, DbPool) {
        let pool = test_pool().await;
        (TaskService::new(TaskRepository::new(pool.clone())), pool)
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    async fn add(service: &TaskService, task: NewTask) -> i64 {
        service.create_task(task).await.unwrap().expect("task created")
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    fn changes_from(task: &Task) -> TaskChanges {
        TaskChanges {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date,
            status: task.status.clone(),
            completed: task.completed,
        }
    }

    #[tokio::test]
    async fn test_create_trims_title_and_applies_defaults() {
        let (service, _pool) = service().await;

        let id = add(&service, NewTask::titled(" Buy milk ")).await;
        let task = service.get_task(id).await.unwrap().unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert_eq!(task.priority, 1);
        assert_eq!(task.status, "todo");
        assert!(task.due_date.is_none());
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn test_blank_title_is_silently_skipped() {
        let (service, _pool) = service().await;

        assert_eq!(service.create_task(NewTask::titled("   ")).await.unwrap(), None);
        assert_eq!(service.create_task(NewTask::titled("")).await.unwrap(), None);
        assert_eq!(service.count_tasks().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_task_is_none() {
        let (service, _pool) = service().await;
        assert!(service.get_task(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_original_value() {
        let (service, _pool) = service().await;
        let id = add(&service, NewTask::titled("Walk dog")).await;

        assert_eq!(service.toggle_completed(id).await.unwrap(), Some(true));
        assert_eq!(service.toggle_completed(id).await.unwrap(), Some(false));
        assert!(!service.get_task(id).await.unwrap().unwrap().completed);
    }

    #[tokio::test]
    async fn test_toggle_missing_task_is_none() {
        let (service, _pool) = service().await;
        assert_eq!(service.toggle_completed(7).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_toggle_leaves_status_alone() {
        let (service, _pool) = service().await;
        let id = add(&service, NewTask::titled("Independent flags")).await;

        service.toggle_completed(id).await.unwrap();
        let task = service.get_task(id).await.unwrap().unwrap();
        assert!(task.completed);
        assert_eq!(task.status, "todo");
    }

    #[tokio::test]
    async fn test_delete_missing_task_changes_nothing() {
        let (service, _pool) = service().await;
        add(&service, NewTask::titled("Keep me")).await;

        assert_eq!(service.delete_task(999).await.unwrap(), 0);
        assert_eq!(service.count_tasks().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let (service, _pool) = service().await;
        let id = add(&service, NewTask::titled("Remove me")).await;

        assert_eq!(service.delete_task(id).await.unwrap(), 1);
        assert!(service.get_task(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let (service, _pool) = service().await;
        let id = add(&service, NewTask::titled("Draft")).await;
        let due = NaiveDate::from_ymd_opt(2030, 1, 2).unwrap();

        service
            .update_task(
                id,
                TaskChanges {
                    title: "  Final  ".into(),
                    description: "ship it".into(),
                    priority: 5,
                    due_date: Some(due),
                    status: "done".into(),
                    completed: true,
                },
            )
            .await
            .unwrap();

        let task = service.get_task(id).await.unwrap().unwrap();
        assert_eq!(task.title, "Final");
        assert_eq!(task.description, "ship it");
        assert_eq!(task.priority, 5);
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.status, "done");
        assert!(task.completed);
    }

    #[tokio::test]
    async fn test_update_missing_task_is_noop() {
        let (service, _pool) = service().await;
        let changes = TaskChanges {
            title: "Ghost".into(),
            description: String::new(),
            priority: 1,
            due_date: None,
            status: "todo".into(),
            completed: false,
        };

        service.update_task(404, changes).await.unwrap();
        assert_eq!(service.count_tasks().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_with_blank_title_is_skipped() {
        let (service, _pool) = service().await;
        let id = add(&service, NewTask::titled("Original")).await;
        let mut changes = changes_from(&service.get_task(id).await.unwrap().unwrap());
        changes.title = "  ".into();
        changes.priority = 9;

        service.update_task(id, changes).await.unwrap();

        let task = service.get_task(id).await.unwrap().unwrap();
        assert_eq!(task.title, "Original");
        assert_eq!(task.priority, 1);
    }

    // Edits keep the insert-time `updated_at`. Pinned here so that changing
    // it is a deliberate decision.
    #[tokio::test]
    async fn test_update_does_not_refresh_updated_at() {
        let (service, pool) = service().await;
        let id = add(&service, NewTask::titled("Stamp")).await;
        sqlx::query("UPDATE tasks SET updated_at = '2000-01-01 00:00:00' WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();
        let before = service.get_task(id).await.unwrap().unwrap();

        let mut changes = changes_from(&before);
        changes.description = "edited".into();
        service.update_task(id, changes).await.unwrap();

        let after = service.get_task(id).await.unwrap().unwrap();
        assert_eq!(after.description, "edited");
        assert_eq!(after.updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn test_list_defaults_to_newest_first() {
        let (service, _pool) = service().await;
        add(&service, NewTask::titled("first")).await;
        add(&service, NewTask::titled("second")).await;
        add(&service, NewTask::titled("third")).await;

        let tasks = service.list_tasks(&RetrievalSpec::all()).await.unwrap();
        assert_eq!(titles(&tasks), vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_sort_by_priority_highest_first() {
        let (service, _pool) = service().await;
        add(&service, NewTask { priority: 1, ..NewTask::titled("low") }).await;
        add(&service, NewTask { priority: 3, ..NewTask::titled("high") }).await;

        let spec = RetrievalSpec::all().sorted_by(SortKey::Priority);
        let tasks = service.list_tasks(&spec).await.unwrap();
        assert_eq!(titles(&tasks), vec!["high", "low"]);
    }

    #[tokio::test]
    async fn test_sort_by_title_ascending() {
        let (service, _pool) = service().await;
        for title in ["pear", "apple", "fig"] {
            add(&service, NewTask::titled(title)).await;
        }

        let spec = RetrievalSpec::all().sorted_by(SortKey::Title);
        let tasks = service.list_tasks(&spec).await.unwrap();
        assert_eq!(titles(&tasks), vec!["apple", "fig", "pear"]);
    }

    #[tokio::test]
    async fn test_sort_by_due_date_puts_undated_last() {
        let (service, _pool) = service().await;
        let day = |d| NaiveDate::from_ymd_opt(2030, 5, d).unwrap();
        add(&service, NewTask::titled("undated a")).await;
        add(&service, NewTask { due_date: Some(day(20)), ..NewTask::titled("late") }).await;
        add(&service, NewTask::titled("undated b")).await;
        add(&service, NewTask { due_date: Some(day(1)), ..NewTask::titled("early") }).await;

        let spec = RetrievalSpec::all().sorted_by(SortKey::DueDate);
        let tasks = service.list_tasks(&spec).await.unwrap();

        assert_eq!(titles(&tasks[..2]), vec!["early", "late"]);
        assert!(tasks[2..].iter().all(|t| t.due_date.is_none()));
    }

    #[tokio::test]
    async fn test_overdue_excludes_done_tasks() {
        let (service, _pool) = service().await;
        let yesterday = today() - Duration::days(1);
        add(&service, NewTask { due_date: Some(yesterday), ..NewTask::titled("late") }).await;
        add(
            &service,
            NewTask {
                due_date: Some(yesterday),
                status: "done".into(),
                ..NewTask::titled("finished")
            },
        )
        .await;
        add(&service, NewTask { due_date: Some(today()), ..NewTask::titled("on time") }).await;
        add(&service, NewTask::titled("undated")).await;

        let spec = RetrievalSpec::all().with_predicate(Predicate::Overdue { today: today() });
        let tasks = service.list_tasks(&spec).await.unwrap();
        assert_eq!(titles(&tasks), vec!["late"]);
    }

    #[tokio::test]
    async fn test_due_today_ignores_time_of_day() {
        let (service, pool) = service().await;
        sqlx::query("INSERT INTO tasks (title, due_date) VALUES ('stamped', ?)")
            .bind(format!("{} 15:30:00", today().format("%Y-%m-%d")))
            .execute(&pool)
            .await
            .unwrap();
        add(&service, NewTask { due_date: Some(today()), ..NewTask::titled("plain") }).await;
        add(
            &service,
            NewTask {
                due_date: Some(today() + Duration::days(1)),
                ..NewTask::titled("tomorrow")
            },
        )
        .await;

        let spec = RetrievalSpec::all()
            .with_predicate(Predicate::DueOn(today()))
            .sorted_by(SortKey::Title);
        let tasks = service.list_tasks(&spec).await.unwrap();

        assert_eq!(titles(&tasks), vec!["plain", "stamped"]);
        assert!(tasks.iter().all(|t| t.due_date == Some(today())));
    }

    #[tokio::test]
    async fn test_due_week_is_inclusive() {
        let (service, _pool) = service().await;
        for (title, offset) in [("yesterday", -1), ("today", 0), ("in a week", 7), ("in eight days", 8)] {
            add(
                &service,
                NewTask {
                    due_date: Some(today() + Duration::days(offset)),
                    ..NewTask::titled(title)
                },
            )
            .await;
        }

        let params = TaskQueryParams {
            due: Some("week".into()),
            sort: Some("due_date".into()),
            ..Default::default()
        };
        let tasks = service
            .list_tasks(&RetrievalSpec::compile(&params, today()))
            .await
            .unwrap();
        assert_eq!(titles(&tasks), vec!["today", "in a week"]);
    }

    #[tokio::test]
    async fn test_search_matches_title_or_description() {
        let (service, _pool) = service().await;
        add(&service, NewTask::titled("Buy MILK")).await;
        add(
            &service,
            NewTask {
                description: "remember the milk".into(),
                ..NewTask::titled("Groceries")
            },
        )
        .await;
        add(&service, NewTask::titled("Call mum")).await;

        let spec = RetrievalSpec::all()
            .with_predicate(Predicate::Search("milk".into()))
            .sorted_by(SortKey::Title);
        let tasks = service.list_tasks(&spec).await.unwrap();
        assert_eq!(titles(&tasks), vec!["Buy MILK", "Groceries"]);
    }

    #[tokio::test]
    async fn test_search_wildcards_match_literally() {
        let (service, _pool) = service().await;
        add(&service, NewTask::titled("100% done")).await;
        add(&service, NewTask::titled("100 percent")).await;

        let spec = RetrievalSpec::all().with_predicate(Predicate::Search("0%".into()));
        let tasks = service.list_tasks(&spec).await.unwrap();
        assert_eq!(titles(&tasks), vec!["100% done"]);
    }

    #[tokio::test]
    async fn test_filters_combine_conjunctively() {
        let (service, _pool) = service().await;
        add(&service, NewTask { priority: 2, ..NewTask::titled("report draft") }).await;
        add(
            &service,
            NewTask {
                priority: 2,
                status: "doing".into(),
                ..NewTask::titled("report review")
            },
        )
        .await;
        add(&service, NewTask { priority: 3, ..NewTask::titled("report final") }).await;

        let params = TaskQueryParams {
            q: Some("report".into()),
            status: Some("todo".into()),
            priority: Some("2".into()),
            sort: Some("nonsense".into()),
            ..Default::default()
        };
        let tasks = service
            .list_tasks(&RetrievalSpec::compile(&params, today()))
            .await
            .unwrap();
        assert_eq!(titles(&tasks), vec!["report draft"]);
    }
}

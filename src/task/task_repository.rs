use crate::{db::DbPool, error::Result};
use sqlx::{QueryBuilder, Sqlite};

use super::{
    task_filter::{Predicate, RetrievalSpec},
    task_models::{NewTask, Task, TaskChanges, DONE_STATUS},
};

/// `due_date` is read back as a bare calendar date even when a row carries a
/// time of day.
const TASK_COLUMNS: &str = "id, title, description, priority, date(due_date) AS due_date, \
                            status, completed, created_at, updated_at";

#[derive(Clone)]
pub struct TaskRepository {
    pool: DbPool,
}

impl TaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, spec: &RetrievalSpec) -> Result<Vec<Task>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));

        for (i, predicate) in spec.predicates.iter().enumerate() {
            query.push(if i == 0 { " WHERE " } else { " AND " });
            push_predicate(&mut query, predicate);
        }

        query.push(spec.sort.order_by());

        let tasks = query.build_query_as::<Task>().fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn create(&self, task: &NewTask) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, priority, due_date, status)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(&task.status)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Leaves `updated_at` as it was at insert time.
    pub async fn update(&self, id: i64, changes: &TaskChanges) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tasks SET
                title = ?,
                description = ?,
                priority = ?,
                due_date = ?,
                status = ?,
                completed = ?
             WHERE id = ?",
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.priority)
        .bind(changes.due_date)
        .bind(&changes.status)
        .bind(changes.completed)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn toggle_completed(&self, id: i64) -> Result<Option<bool>> {
        let completed = sqlx::query_scalar::<_, bool>(
            "UPDATE tasks SET completed = NOT completed WHERE id = ? RETURNING completed",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(completed)
    }

    pub async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn push_predicate(query: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::Search(text) => {
            let pattern = format!("%{}%", escape_like(text));
            query
                .push("(title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        Predicate::Status(status) => {
            query.push("status = ").push_bind(status.clone());
        }
        Predicate::Priority(priority) => {
            query.push("priority = ").push_bind(*priority);
        }
        Predicate::Overdue { today } => {
            query
                .push("date(due_date) < date(")
                .push_bind(*today)
                .push(") AND status != ")
                .push_bind(DONE_STATUS.to_string());
        }
        Predicate::DueOn(day) => {
            query.push("date(due_date) = date(").push_bind(*day).push(")");
        }
        Predicate::DueBetween { from, to } => {
            query
                .push("date(due_date) BETWEEN date(")
                .push_bind(*from)
                .push(") AND date(")
                .push_bind(*to)
                .push(")");
        }
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("milk"), "milk");
        assert_eq!(escape_like("50%"), "50\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_STATUS: &str = "todo";
pub const DONE_STATUS: &str = "done";
pub const DEFAULT_PRIORITY: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.completed || self.status == DONE_STATUS
    }
}

/// Fields supplied when a task is added.
#[derive(Debug, Clone, Validate)]
pub struct NewTask {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub due_date: Option<NaiveDate>,
    pub status: String,
}

#[cfg(test)]
impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            due_date: None,
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

/// Full replacement of a task's mutable fields.
#[derive(Debug, Clone, Validate)]
pub struct TaskChanges {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub completed: bool,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    task_filter::keep_first,
    task_models::{NewTask, TaskChanges, DEFAULT_PRIORITY, DEFAULT_STATUS},
};

/// Body of `POST /add`. Every field is optional on the wire; missing or
/// unparseable values fall back to the column defaults.
#[derive(Debug, Default)]
pub struct AddTaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

impl AddTaskForm {
    /// A repeated field keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "title" => &mut form.title,
                "description" => &mut form.description,
                "priority" => &mut form.priority,
                "due_date" => &mut form.due_date,
                "status" => &mut form.status,
                _ => continue,
            };
            keep_first(slot, value);
        }
        form
    }
}

impl From<AddTaskForm> for NewTask {
    fn from(form: AddTaskForm) -> Self {
        NewTask {
            title: form.title.unwrap_or_default(),
            description: form.description.unwrap_or_default(),
            priority: parse_priority(form.priority.as_deref()),
            due_date: parse_due_date(form.due_date.as_deref()),
            status: parse_status(form.status.as_deref()),
        }
    }
}

/// Body of `POST /edit/{id}`. `completed` is a checkbox: present means true.
#[derive(Debug, Default)]
pub struct EditTaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub completed: Option<String>,
}

impl EditTaskForm {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "title" => &mut form.title,
                "description" => &mut form.description,
                "priority" => &mut form.priority,
                "due_date" => &mut form.due_date,
                "status" => &mut form.status,
                "completed" => &mut form.completed,
                _ => continue,
            };
            keep_first(slot, value);
        }
        form
    }
}

impl From<EditTaskForm> for TaskChanges {
    fn from(form: EditTaskForm) -> Self {
        TaskChanges {
            title: form.title.unwrap_or_default(),
            description: form.description.unwrap_or_default(),
            priority: parse_priority(form.priority.as_deref()),
            due_date: parse_due_date(form.due_date.as_deref()),
            status: parse_status(form.status.as_deref()),
            completed: form.completed.is_some(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleResponse {
    pub success: bool,
    /// `1` or `0` after the toggle, `null` when the task does not exist
    pub completed: Option<u8>,
}

impl ToggleResponse {
    pub fn new(completed: Option<bool>) -> Self {
        Self {
            success: true,
            completed: completed.map(u8::from),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    pub version: String,
    pub status: String,
}

fn parse_priority(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_PRIORITY)
}

fn parse_due_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

fn parse_status(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STATUS)
        .to_string()
}

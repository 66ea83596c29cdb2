//! Compiles raw listing parameters into a [`RetrievalSpec`].
//!
//! Compilation is total: unknown or malformed parameters never produce an
//! error, they simply contribute no predicate (or the default sort).

use chrono::{Duration, NaiveDate};
use utoipa::IntoParams;

/// Listing parameters exactly as they arrive on the query string.
#[derive(Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskQueryParams {
    /// Substring searched in title and description
    pub q: Option<String>,
    /// Exact status tag
    pub status: Option<String>,
    /// Exact priority; ignored when not an integer
    pub priority: Option<String>,
    /// One of `overdue`, `today`, `week`
    pub due: Option<String>,
    /// One of `created_at`, `due_date`, `priority`, `title`
    pub sort: Option<String>,
}

impl TaskQueryParams {
    /// Builds the parameters from decoded query pairs. A repeated key keeps
    /// its first value; unknown keys are dropped.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "status" => &mut params.status,
                "priority" => &mut params.priority,
                "due" => &mut params.due,
                "sort" => &mut params.sort,
                _ => continue,
            };
            keep_first(slot, value);
        }
        params
    }
}

pub(crate) fn keep_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `title` or `description` contains the text.
    Search(String),
    Status(String),
    Priority(i64),
    /// Due before `today` and status is not `done`.
    Overdue { today: NaiveDate },
    DueOn(NaiveDate),
    /// Due date within `[from, to]`, both ends inclusive.
    DueBetween { from: NaiveDate, to: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recent first.
    #[default]
    CreatedAt,
    /// Undated tasks last, then earliest first.
    DueDate,
    /// Highest first.
    Priority,
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::CreatedAt,
        SortKey::DueDate,
        SortKey::Priority,
        SortKey::Title,
    ];

    /// Whitelist lookup; anything unrecognised sorts by creation time.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("due_date") => SortKey::DueDate,
            Some("priority") => SortKey::Priority,
            Some("title") => SortKey::Title,
            _ => SortKey::CreatedAt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::DueDate => "due_date",
            SortKey::Priority => "priority",
            SortKey::Title => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "Newest",
            SortKey::DueDate => "Due date",
            SortKey::Priority => "Priority",
            SortKey::Title => "Title",
        }
    }

    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => " ORDER BY created_at DESC, id DESC",
            SortKey::DueDate => " ORDER BY due_date IS NULL, date(due_date) ASC, id ASC",
            SortKey::Priority => " ORDER BY priority DESC, id ASC",
            SortKey::Title => " ORDER BY title ASC, id ASC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueWindow {
    Overdue,
    Today,
    Week,
}

impl DueWindow {
    pub const ALL: [DueWindow; 3] = [DueWindow::Overdue, DueWindow::Today, DueWindow::Week];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "overdue" => Some(DueWindow::Overdue),
            "today" => Some(DueWindow::Today),
            "week" => Some(DueWindow::Week),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DueWindow::Overdue => "overdue",
            DueWindow::Today => "today",
            DueWindow::Week => "week",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DueWindow::Overdue => "Overdue",
            DueWindow::Today => "Due today",
            DueWindow::Week => "Due this week",
        }
    }

    fn predicate(&self, today: NaiveDate) -> Predicate {
        match self {
            DueWindow::Overdue => Predicate::Overdue { today },
            DueWindow::Today => Predicate::DueOn(today),
            DueWindow::Week => Predicate::DueBetween {
                from: today,
                to: today + Duration::days(7),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetrievalSpec {
    pub predicates: Vec<Predicate>,
    pub sort: SortKey,
}

impl RetrievalSpec {
    pub fn compile(params: &TaskQueryParams, today: NaiveDate) -> Self {
        let mut predicates = Vec::new();

        if let Some(q) = non_empty(&params.q) {
            predicates.push(Predicate::Search(q.to_string()));
        }

        if let Some(status) = non_empty(&params.status) {
            predicates.push(Predicate::Status(status.to_string()));
        }

        if let Some(priority) = non_empty(&params.priority).and_then(|p| p.parse::<i64>().ok()) {
            predicates.push(Predicate::Priority(priority));
        }

        if let Some(window) = non_empty(&params.due).and_then(DueWindow::parse) {
            predicates.push(window.predicate(today));
        }

        Self {
            predicates,
            sort: SortKey::parse(params.sort.as_deref()),
        }
    }
}

#[cfg(test)]
impl RetrievalSpec {
    /// Every task, newest first.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

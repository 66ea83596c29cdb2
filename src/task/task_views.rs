//! Server-rendered pages for the task list and edit form.

use super::{
    task_filter::{DueWindow, SortKey, TaskQueryParams},
    task_models::Task,
};

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn layout(title: &str, version: &str, body: &str) -> String {
    let title = html_escape(title);
    let version = html_escape(version);
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }}
        form.filters, form.add-task {{ display: flex; flex-wrap: wrap; gap: .5rem; margin-bottom: 1rem; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ text-align: left; padding: .4rem; border-bottom: 1px solid #ddd; }}
        tr.completed .task-title {{ text-decoration: line-through; color: #888; }}
        .empty-state {{ color: #666; padding: 2rem 0; text-align: center; }}
        footer {{ margin-top: 2rem; color: #999; font-size: .8rem; }}
    </style>
</head>
<body>
{body}
<footer>taskboard {version}</footer>
</body>
</html>"##
    )
}

fn option(value: &str, label: &str, selected: bool) -> String {
    let value = html_escape(value);
    let label = html_escape(label);
    let selected = if selected { " selected" } else { "" };
    format!(r#"<option value="{value}"{selected}>{label}</option>"#)
}

fn render_filters(params: &TaskQueryParams) -> String {
    let q = html_escape(params.q.as_deref().unwrap_or(""));
    let status = html_escape(params.status.as_deref().unwrap_or(""));
    let priority = html_escape(params.priority.as_deref().unwrap_or(""));

    let current_due = params.due.as_deref().and_then(DueWindow::parse);
    let mut due_options = option("", "Any due date", current_due.is_none());
    for window in DueWindow::ALL {
        due_options.push_str(&option(window.as_str(), window.label(), current_due == Some(window)));
    }

    let current_sort = SortKey::parse(params.sort.as_deref());
    let mut sort_options = String::new();
    for key in SortKey::ALL {
        sort_options.push_str(&option(key.as_str(), key.label(), current_sort == key));
    }

    format!(
        r##"<form class="filters" method="get" action="/">
    <input type="search" name="q" value="{q}" placeholder="Search tasks">
    <input type="text" name="status" value="{status}" placeholder="Status">
    <input type="number" name="priority" value="{priority}" placeholder="Priority">
    <select name="due">{due_options}</select>
    <select name="sort">{sort_options}</select>
    <button type="submit">Filter</button>
    <a href="/">Clear</a>
</form>"##
    )
}

fn render_add_form() -> String {
    r##"<form class="add-task" method="post" action="/add">
    <input type="text" name="title" placeholder="New task" required>
    <input type="text" name="description" placeholder="Description">
    <input type="number" name="priority" value="1">
    <input type="date" name="due_date">
    <select name="status">
        <option value="todo" selected>todo</option>
        <option value="doing">doing</option>
        <option value="done">done</option>
    </select>
    <button type="submit">Add</button>
</form>"##
        .to_string()
}

fn render_task_row(task: &Task) -> String {
    let id = task.id;
    let title = html_escape(&task.title);
    let description = html_escape(&task.description);
    let status = html_escape(&task.status);
    let priority = task.priority;
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let created = task.created_at.format("%Y-%m-%d %H:%M").to_string();
    let row_class = if task.is_done() { "task-row completed" } else { "task-row" };
    let checked = if task.completed { " checked" } else { "" };

    format!(
        r##"<tr class="{row_class}" data-id="{id}">
    <td><input type="checkbox" class="toggle" data-id="{id}"{checked}></td>
    <td class="task-title">{title}<div class="task-description">{description}</div></td>
    <td class="task-status">{status}</td>
    <td class="task-priority">{priority}</td>
    <td class="task-due">{due}</td>
    <td class="task-created">{created}</td>
    <td class="task-actions">
        <a href="/edit/{id}">Edit</a>
        <a href="/delete/{id}" onclick="return confirm('Delete this task?')">Delete</a>
    </td>
</tr>"##
    )
}

const TOGGLE_SCRIPT: &str = r##"<script>
document.querySelectorAll("input.toggle").forEach(function (box) {
    box.addEventListener("change", function () {
        fetch("/toggle/" + box.dataset.id, { method: "POST" })
            .then(function (res) { return res.json(); })
            .then(function (data) {
                if (data.completed === null) { window.location.reload(); return; }
                box.checked = data.completed === 1;
                box.closest("tr").classList.toggle("completed", box.checked);
            });
    });
});
</script>"##;

pub fn render_index(tasks: &[Task], total: i64, params: &TaskQueryParams, version: &str) -> String {
    let mut body = String::from("<h1>Tasks</h1>\n");
    body.push_str(&render_add_form());
    body.push_str(&render_filters(params));

    if tasks.is_empty() {
        body.push_str(r#"<div class="empty-state">No tasks match.</div>"#);
    } else {
        body.push_str(&format!(
            r#"<p class="task-count">Showing {} of {} tasks</p>"#,
            tasks.len(),
            total
        ));
        body.push_str(
            "<table class=\"tasks\">\n<thead><tr><th></th><th>Title</th><th>Status</th>\
             <th>Priority</th><th>Due</th><th>Created</th><th></th></tr></thead>\n<tbody>\n",
        );
        for task in tasks {
            body.push_str(&render_task_row(task));
            body.push('\n');
        }
        body.push_str("</tbody>\n</table>\n");
        body.push_str(TOGGLE_SCRIPT);
    }

    layout("Tasks", version, &body)
}

pub fn render_edit(task: &Task, version: &str) -> String {
    let id = task.id;
    let title = html_escape(&task.title);
    let description = html_escape(&task.description);
    let status = html_escape(&task.status);
    let priority = task.priority;
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let checked = if task.completed { " checked" } else { "" };

    let body = format!(
        r##"<h1>Edit task</h1>
<form class="edit-task" method="post" action="/edit/{id}">
    <label>Title <input type="text" name="title" value="{title}" required></label>
    <label>Description <textarea name="description">{description}</textarea></label>
    <label>Priority <input type="number" name="priority" value="{priority}"></label>
    <label>Due date <input type="date" name="due_date" value="{due}"></label>
    <label>Status <input type="text" name="status" value="{status}"></label>
    <label><input type="checkbox" name="completed"{checked}> Completed</label>
    <button type="submit">Save</button>
    <a href="/">Cancel</a>
</form>"##
    );

    layout("Edit task", version, &body)
}

pub fn render_not_found(version: &str) -> String {
    let body = r##"<div class="empty-state">
    <h3>Task not found</h3>
    <p><a href="/">Back to tasks</a></p>
</div>"##;
    layout("Task not found", version, body)
}

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use super::task_handlers;

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(task_handlers::list_tasks))
        .route("/add", post(task_handlers::add_task))
        .route(
            "/edit/:id",
            get(task_handlers::edit_task_page).post(task_handlers::update_task),
        )
        .route("/delete/:id", get(task_handlers::delete_task))
        .route("/toggle/:id", post(task_handlers::toggle_task))
        .route("/api/version", get(task_handlers::version))
        .route("/api/tasks", get(task_handlers::list_tasks_json))
        .route("/api/tasks/:id", get(task_handlers::get_task_json))
}

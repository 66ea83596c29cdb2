use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use chrono::Local;

use crate::{
    error::{AppError, Result},
    state::AppState,
};
use super::{
    task_dto::{AddTaskForm, EditTaskForm, ToggleResponse, VersionResponse},
    task_filter::{RetrievalSpec, TaskQueryParams},
    task_models::Task,
    task_views,
};

fn compile(params: &TaskQueryParams) -> RetrievalSpec {
    RetrievalSpec::compile(params, Local::now().date_naive())
}

/// Task list page
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>> {
    let params = TaskQueryParams::from_pairs(pairs);
    let spec = compile(&params);
    tracing::debug!(?spec, "Listing tasks");

    let tasks = state.task_service.list_tasks(&spec).await?;
    let total = state.task_service.count_tasks().await?;

    Ok(Html(task_views::render_index(
        &tasks,
        total,
        &params,
        &state.config.app_version,
    )))
}

/// List tasks as JSON
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TaskQueryParams),
    responses(
        (status = 200, description = "Matching tasks", body = Vec<Task>)
    ),
    tag = "tasks"
)]
pub async fn list_tasks_json(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Task>>> {
    let params = TaskQueryParams::from_pairs(pairs);
    let tasks = state.task_service.list_tasks(&compile(&params)).await?;
    Ok(Json(tasks))
}

/// Get a single task as JSON
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks"
)]
pub async fn get_task_json(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Json<Task>> {
    let task = state
        .task_service
        .get_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

pub async fn add_task(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let form = AddTaskForm::from_pairs(pairs);
    state.task_service.create_task(form.into()).await?;
    Ok(Redirect::to("/"))
}

pub async fn edit_task_page(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let version = &state.config.app_version;

    let response = match state.task_service.get_task(task_id).await? {
        Some(task) => (StatusCode::OK, Html(task_views::render_edit(&task, version))),
        None => (StatusCode::NOT_FOUND, Html(task_views::render_not_found(version))),
    };

    Ok(response)
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    let form = EditTaskForm::from_pairs(pairs);
    state.task_service.update_task(task_id, form.into()).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Redirect> {
    state.task_service.delete_task(task_id).await?;
    Ok(Redirect::to("/"))
}

/// Flip a task's completed flag
#[utoipa::path(
    post,
    path = "/toggle/{id}",
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "New completed value, null for unknown tasks", body = ToggleResponse)
    ),
    tag = "tasks"
)]
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Json<ToggleResponse>> {
    let completed = state.task_service.toggle_completed(task_id).await?;
    Ok(Json(ToggleResponse::new(completed)))
}

/// Application version and liveness
#[utoipa::path(
    get,
    path = "/api/version",
    responses(
        (status = 200, description = "Service is up", body = VersionResponse)
    ),
    tag = "meta"
)]
pub async fn version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.config.app_version.clone(),
        status: "ok".to_string(),
    })
}

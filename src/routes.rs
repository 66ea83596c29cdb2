use crate::{
    state::AppState,
    task::{
        self,
        task_dto::{ToggleResponse, VersionResponse},
        task_handlers,
        task_models::Task,
    },
};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        task_handlers::list_tasks_json,
        task_handlers::get_task_json,
        task_handlers::toggle_task,
        task_handlers::version,
    ),
    components(
        schemas(
            Task,
            ToggleResponse,
            VersionResponse,
        )
    ),
    tags(
        (name = "tasks", description = "Task endpoints"),
        (name = "meta", description = "Service information")
    )
)]
struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(task::task_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

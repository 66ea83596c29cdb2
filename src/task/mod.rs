pub mod routes;
pub mod task_dto;
pub mod task_filter;
pub mod task_handlers;
pub mod task_models;
pub mod task_repository;
pub mod task_service;
pub mod task_views;

pub use routes::task_routes;
pub use task_repository::TaskRepository;
pub use task_service::TaskService;

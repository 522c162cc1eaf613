use axum::{Router, routing::{delete, get}};
use crate::{app_state::SharedState, todo_controller::TodoController};

pub const ROUTER_PATH: &str = "/api/todos";

pub fn get_router(app_state: SharedState) -> Router {
    Router::new()
        .route(ROUTER_PATH, get(TodoController::list).post(TodoController::create))
        .route(format!("{}/:id", ROUTER_PATH).as_str(), delete(TodoController::delete))
        .with_state(app_state)
}

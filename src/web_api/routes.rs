pub mod health_routes;
pub mod todo_routes;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::app_state::SharedState;

pub const IMAGES_PATH: &str = "/images";

pub fn map_routes(app_state: SharedState) -> Router {
    Router::new()
        .merge(health_routes::get_router())
        .merge(todo_routes::get_router(app_state))
}

/// API routes plus static files: generated images under `/images`, the rest
/// of the public directory (index page, assets) as the fallback.
pub fn build_router(app_state: SharedState) -> Router {
    let image_dir = app_state.image_dir();
    let public_dir = app_state.public_dir.clone();

    map_routes(app_state)
        .nest_service(IMAGES_PATH, ServeDir::new(image_dir))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

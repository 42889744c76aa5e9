use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Create the router for the supported W3C `WebDriver` endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Status
        .route("/status", get(handlers::status))
        // Session management
        .route("/session", post(handlers::session::create))
        .route(
            "/session/{session_id}",
            delete(handlers::session::delete),
        )
        // Timeouts
        .route(
            "/session/{session_id}/timeouts",
            get(handlers::timeouts::get).post(handlers::timeouts::set),
        )
        // Navigation
        .route(
            "/session/{session_id}/url",
            get(handlers::navigation::get_url).post(handlers::navigation::navigate),
        )
        // Windows
        .route(
            "/session/{session_id}/window",
            get(handlers::window::get_window_handle)
                .post(handlers::window::switch_to_window)
                .delete(handlers::window::close_window),
        )
        .route(
            "/session/{session_id}/window/handles",
            get(handlers::window::get_window_handles),
        )
        // Frames
        .route(
            "/session/{session_id}/frame",
            post(handlers::frame::switch_to_frame),
        )
        .route(
            "/session/{session_id}/frame/parent",
            post(handlers::frame::switch_to_parent_frame),
        )
        // Elements
        .route("/session/{session_id}/element", post(handlers::element::find))
        .with_state(state)
}

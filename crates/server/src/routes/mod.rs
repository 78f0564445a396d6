pub mod auth;
pub mod gate;
pub mod messages;
pub mod rooms;

use crate::ws;
use crate::AppState;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/get-session", get(auth::get_session));

    let api_routes = Router::new()
        // Per-user room store
        .route("/rooms", get(rooms::list_rooms))
        .route(
            "/rooms/{room}/messages",
            get(rooms::get_messages).delete(rooms::clear_messages),
        )
        // Remote message collection
        .route(
            "/messages",
            get(messages::list_messages).post(messages::create_message),
        );

    Router::new()
        .route("/", get(gate::landing))
        .route("/chat", get(gate::chat_view))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .route("/gateway", get(ws::handler::ws_handler))
        .with_state(state)
}

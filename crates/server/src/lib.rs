pub mod chat;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;
pub mod ws;

use config::Config;
use std::sync::Arc;

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Config,
    pub gateway: Arc<ws::gateway::GatewayState>,
}

pub mod config;
pub mod error;
pub mod observability;
pub mod server;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use observability::LogConfig;
pub use server::{create_router, serve, spawn_hub, AppState, HubHandle, Server};

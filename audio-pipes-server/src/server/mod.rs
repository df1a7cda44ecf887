mod actor;
mod channel;
mod route;
pub mod websocket_listener;

pub use actor::{spawn_hub, HubHandle};
pub use channel::OutboundChannel;
pub use route::create_router;

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Shared by every connection
#[derive(Debug, Clone)]
pub struct AppState {
    pub hub: HubHandle,
    /// Capacity of each connection's outbound queue
    pub channel_capacity: usize,
}

impl AppState {
    pub fn new(hub: HubHandle, channel_capacity: usize) -> Self {
        Self {
            hub,
            channel_capacity,
        }
    }
}

/// A bound listener with its hub task running
pub struct Server {
    listener: TcpListener,
    app: Router,
    hub_task: JoinHandle<()>,
}

impl Server {
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(config.bind)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.bind,
                source,
            })?;

        let (hub, hub_task) = spawn_hub(
            config.hub_config(),
            config.command_capacity,
            config.deadline_check_interval(),
        );
        let app = create_router(AppState::new(hub, config.channel_capacity));

        Ok(Self {
            listener,
            app,
            hub_task,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %self.local_addr()?, "Audio pipes hub listening");

        let result = axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await;

        // Upgraded sockets may still hold handles; stop the hub regardless
        self.hub_task.abort();
        info!("Server stopped");

        Ok(result?)
    }
}

/// Bind and serve until Ctrl+C
pub async fn serve(config: ServerConfig) -> Result<()> {
    Server::bind(&config).await?.run(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

use std::net::SocketAddr;

use tokio::signal;
use tracing::info;

use house_rank_core::{Config, Result};

use crate::{create_router, AppState};

pub struct Server {
    state: AppState,
    addr: SocketAddr,
}

impl Server {
    pub async fn new(addr: SocketAddr, config: Config) -> Result<Self> {
        let state = AppState::new(config).await?;
        Ok(Self { state, addr })
    }

    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state);

        info!("Starting house-rank API server on {}", self.addr);
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("GraphQL endpoint available at http://{}/graphql", self.addr);
        info!("GraphiQL UI available at http://{}/graphql", self.addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

use std::net::{IpAddr, SocketAddr};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use house_rank_api::Server;
use house_rank_core::{Config, Error};

#[tokio::main]
async fn main() -> house_rank_core::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "house_rank_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let host: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|_| Error::Config(format!("Invalid host {:?}", config.server.host)))?;
    let addr = SocketAddr::new(host, config.server.port);

    let server = Server::new(addr, config).await?;
    server.run().await
}

use customer_core::RemoteApi;
use customer_gateway::{AppState, GatewayConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("customer_gateway=info,customer_core=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;
    tracing::info!(upstream = %config.client.base_url, "using customer API");

    let state = AppState::new(RemoteApi::new(&config.client));
    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!("customer gateway running at http://{}", listener.local_addr()?);

    customer_gateway::run(listener, state).await?;
    Ok(())
}

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use employee_portal::api::{AppState, create_router};
use employee_portal::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "employee_portal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = ConfigLoader::from_env()?;
    let bind_addr = config.bind_addr().to_string();
    tracing::info!(
        leave_types = config.leave_types().len(),
        net_pay_policy = ?config.net_pay_policy(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("HTTP server listening on {}", bind_addr);
    axum::serve(listener, router).await?;

    Ok(())
}

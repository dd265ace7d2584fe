use std::{net::SocketAddr, path::PathBuf};

use factory::factories::observability::Observability;
use spawnr_api::{app, config::Config};
use tracing::info;
use utility::{get_optional_env_value::get_optional_env_value, shutdown_signal::shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // These are baked at COMPILE time
    let cargo_manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cargo_crate_name = env!("CARGO_CRATE_NAME");
    let cargo_pkg_name = env!("CARGO_PKG_NAME");
    let cargo_pkg_version = env!("CARGO_PKG_VERSION");

    let env_path = cargo_manifest_dir.join(".env");

    // Load service-specific .env
    dotenvy::from_path(&env_path).ok();
    // Load workspace root .env as fallback
    dotenvy::dotenv().ok();

    let config_path = get_optional_env_value::<PathBuf>("CONFIG")
        .unwrap_or_else(|| cargo_manifest_dir.join("config.json"));

    let config = Config::init(config_path).await?;
    let _guard = Observability::init(cargo_crate_name, cargo_pkg_version, &config.observability).await;

    let app = app::app(cargo_pkg_name, cargo_pkg_version, &config).await?;
    let listener = tokio::net::TcpListener::bind(config.server_address).await?;

    info!(
        "🚀 {} service running at {:#?}",
        cargo_pkg_name, config.server_address
    );
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("👋 Shutting down gracefully...");

    Ok(())
}

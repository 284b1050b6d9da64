use anyhow::Context;
use bridge_desktop::ReqwestHttpClient;
use core_library::db::{create_pool, DatabaseConfig};
use core_metadata::GutendexClient;
use core_runtime::config::CatalogConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use core_service::CatalogService;
use literalura::menu::Menu;
use std::io;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CatalogConfig::from_env().context("Failed to load configuration")?;

    init_logging(
        LoggingConfig::default()
            .with_level(config.log_level)
            .with_format(config.log_format),
    )
    .context("Failed to initialize logging")?;

    info!(
        database = %config.database_path.display(),
        search_url = %config.search.base_url,
        "Starting literalura"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_path))
        .await
        .with_context(|| {
            format!(
                "Failed to open catalog database at {}",
                config.database_path.display()
            )
        })?;

    let http_client = ReqwestHttpClient::new(
        &config.search.user_agent,
        config.search.request_timeout(),
    )
    .context("Failed to create HTTP client")?;
    let search = GutendexClient::from_config(Arc::new(http_client), &config.search);
    let service = CatalogService::new(pool.clone(), Arc::new(search));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = Menu::new(&service, stdin.lock(), stdout.lock()).run().await;

    pool.close().await;
    info!("Catalog closed");
    result
}

//! subkv Server - Headless Daemon
//!
//! Serves stored subscription configurations to token-holding clients:
//! - `GET /<name>?token=...` delivers a configuration
//! - `GET /api/configs` lists stored names
//! - `GET /api/convert-param` shows the decoded conversion parameter
//!
//! The same binary doubles as an operator CLI against the configured store.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod server_utils;

use cli::{Cli, Commands};
use subkv_core::{build_router, build_store, AppState, KvStore};
use subkv_types::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.settings.to_server_config()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Get { name, headers } => {
            let store = open_store(&config)?;
            commands::handle_get(&config, store, &name, headers).await
        },
        Commands::List { json } => {
            let store = open_store(&config)?;
            commands::handle_list(store.as_ref(), json).await
        },
        Commands::ConvertParam => {
            let store = open_store(&config)?;
            commands::handle_convert_param(store.as_ref()).await
        },
        Commands::Config { json } => commands::handle_config(&config, json),
    }
}

fn open_store(config: &ServerConfig) -> Result<Arc<dyn KvStore>> {
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("subkv/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(build_store(&config.store, http_client)?)
}

async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;

    info!("🚀 subkv v{} starting on {}...", env!("CARGO_PKG_VERSION"), config.bind_address());

    let store = open_store(&config)?;
    info!("🗄️ Store backend: {}", store.backend_name());

    let config = Arc::new(config);
    let app = build_router(AppState::new(config.clone(), store));

    let listener = server_utils::create_listener(&config).await?;
    let addr = listener.local_addr()?;

    info!("🌐 Server listening on http://{}", addr);
    info!("🔑 Requests must carry ?token=<SUBKV_TOKEN>");

    axum::serve(listener, app)
        .with_graceful_shutdown(server_utils::shutdown_signal())
        .await?;

    info!("👋 Server shut down gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use subkv_types::StoreBackend;

    #[tokio::test]
    async fn test_open_store_from_seed_file() {
        let mut seed = tempfile::NamedTempFile::new().unwrap();
        write!(seed, r#"{{"myconf": {{"myconf": "aGVsbG8="}}}}"#).unwrap();

        let config = ServerConfig::new(
            "t",
            StoreBackend::Memory { seed_file: Some(seed.path().to_path_buf()) },
        );
        let store = open_store(&config).unwrap();

        assert_eq!(store.backend_name(), "memory");
        let raw = store.get("myconf").await.unwrap();
        assert_eq!(raw.as_deref(), Some(r#"{"myconf":"aGVsbG8="}"#));
    }

    #[test]
    fn test_open_store_missing_seed_file_fails() {
        let config = ServerConfig::new(
            "t",
            StoreBackend::Memory { seed_file: Some("/nonexistent/seed.json".into()) },
        );
        assert!(open_store(&config).is_err());
    }
}

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use subkv_types::models::DEFAULT_CLOUDFLARE_API_BASE;
use subkv_types::{ConfigError, ServerConfig, StoreBackend};

#[derive(Parser)]
#[command(
    name = "subkv",
    about = "subkv - token-protected subscription configuration delivery",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub settings: Settings,

    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the delivery server (default if no command specified)")]
    Serve,

    #[command(about = "Resolve a configuration from the store and print it")]
    Get {
        #[arg(help = "Configuration name (not percent-encoded)")]
        name: String,

        #[arg(long, help = "Also print the composed delivery headers")]
        headers: bool,
    },

    #[command(about = "List stored configuration names")]
    List {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Show the decoded CONVERT_PARAM entry")]
    ConvertParam,

    #[command(about = "Show the effective configuration (secrets masked)")]
    Config {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}

/// Startup settings shared by every subcommand.
#[derive(Args, Clone, Default)]
pub struct Settings {
    #[arg(long, env = "SUBKV_HOST", default_value = "127.0.0.1", global = true)]
    pub host: String,

    #[arg(short, long, env = "SUBKV_PORT", default_value = "8787", global = true)]
    pub port: u16,

    #[arg(long, env = "SUBKV_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    #[arg(
        long,
        env = "SUBKV_SEED_FILE",
        global = true,
        help = "JSON file seeding the memory store"
    )]
    pub seed_file: Option<PathBuf>,

    #[arg(long, env = "CF_ACCOUNT_ID", global = true)]
    pub cf_account_id: Option<String>,

    #[arg(long, env = "CF_KV_ID", global = true)]
    pub cf_namespace_id: Option<String>,

    #[arg(long, env = "CF_API_TOKEN", hide_env_values = true, global = true)]
    pub cf_api_token: Option<String>,

    #[arg(
        long,
        env = "CF_API_BASE",
        default_value = DEFAULT_CLOUDFLARE_API_BASE,
        global = true
    )]
    pub cf_api_base: String,
}

impl Settings {
    /// Assemble the process configuration. The Cloudflare backend is chosen
    /// when all three Cloudflare values are present; a partial set is an error.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let store = match (&self.cf_account_id, &self.cf_namespace_id, &self.cf_api_token) {
            (Some(account_id), Some(namespace_id), Some(api_token)) => StoreBackend::Cloudflare {
                account_id: account_id.clone(),
                namespace_id: namespace_id.clone(),
                api_token: api_token.clone(),
                base_url: self.cf_api_base.clone(),
            },
            (None, None, None) => StoreBackend::Memory { seed_file: self.seed_file.clone() },
            _ => {
                return Err(ConfigError::validation(
                    "store",
                    "CF_ACCOUNT_ID, CF_KV_ID and CF_API_TOKEN must be set together",
                ))
            },
        };

        Ok(ServerConfig {
            host: self.host.clone(),
            port: self.port,
            token: self.token.clone().unwrap_or_default(),
            store,
        })
    }
}

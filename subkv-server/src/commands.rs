use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use subkv_core::auth::require;
use subkv_core::console::{convert_param_text, list_config_names};
use subkv_core::{DeliveryPipeline, KvStore};
use subkv_types::{ConfigName, ServerConfig, StoreBackend};

/// Run the delivery pipeline for `name` as the server would and print the body.
pub async fn handle_get(
    config: &ServerConfig,
    store: Arc<dyn KvStore>,
    name: &str,
    show_headers: bool,
) -> Result<()> {
    let auth = require(Some(config.token.as_str()), &config.token)
        .map_err(|_| anyhow::anyhow!("SUBKV_TOKEN must be set"))?;
    let name = ConfigName::new(name);

    let delivery = DeliveryPipeline::new(store)
        .deliver(auth, &name)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", e.public_message(), e))?;

    if show_headers {
        eprintln!("{} {}", "Resolved key:".cyan().bold(), delivery.resolved_key);
        for (key, value) in &delivery.headers {
            eprintln!("  {}: {}", key.as_str().dimmed(), value.to_str().unwrap_or("<binary>"));
        }
        eprintln!();
    }

    print!("{}", delivery.body);
    Ok(())
}

pub async fn handle_list(store: &dyn KvStore, json: bool) -> Result<()> {
    let names = list_config_names(store).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if names.is_empty() {
        println!("{}", "No configurations stored".yellow());
        return Ok(());
    }

    println!("{} ({})", "Configurations".cyan().bold(), store.backend_name());
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}

pub async fn handle_convert_param(store: &dyn KvStore) -> Result<()> {
    println!("{}", convert_param_text(store).await?);
    Ok(())
}

/// Print the effective configuration, then fail if it would not start a server.
pub fn handle_config(config: &ServerConfig, json: bool) -> Result<()> {
    let validation = config.validate();

    if json {
        let mut view = masked_view(config);
        view["valid"] = serde_json::Value::Bool(validation.is_ok());
        if let Err(e) = &validation {
            view["error"] = serde_json::Value::String(e.to_string());
        }
        println!("{}", serde_json::to_string_pretty(&view)?);
        return validation.map_err(anyhow::Error::from);
    }

    println!("{}", "Server Configuration:".cyan().bold());
    println!("  Listen: {}", config.bind_address());
    println!("  Token: {}", mask_key(&config.token));
    match &config.store {
        StoreBackend::Memory { seed_file } => {
            println!("  Store: memory");
            if let Some(path) = seed_file {
                println!("  Seed file: {}", path.display());
            }
        },
        StoreBackend::Cloudflare { account_id, namespace_id, api_token, base_url } => {
            println!("  Store: cloudflare");
            println!("  Account: {}", account_id);
            println!("  Namespace: {}", namespace_id);
            println!("  API token: {}", mask_key(api_token));
            println!("  API base: {}", base_url);
        },
    }
    match &validation {
        Ok(()) => println!("  Status: {}", "valid".green()),
        Err(e) => println!("  Status: {} ({})", "invalid".red().bold(), e),
    }
    validation.map_err(anyhow::Error::from)
}

fn masked_view(config: &ServerConfig) -> serde_json::Value {
    let store = match &config.store {
        StoreBackend::Memory { seed_file } => serde_json::json!({
            "kind": "memory",
            "seed_file": seed_file,
        }),
        StoreBackend::Cloudflare { account_id, namespace_id, api_token, base_url } => {
            serde_json::json!({
                "kind": "cloudflare",
                "account_id": account_id,
                "namespace_id": namespace_id,
                "api_token": mask_key(api_token),
                "base_url": base_url,
            })
        },
    };

    serde_json::json!({
        "host": config.host,
        "port": config.port,
        "token": mask_key(&config.token),
        "store": store,
    })
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

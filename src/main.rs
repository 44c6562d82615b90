//! Entry point. Wires Public.com auth -> portfolio fetch -> HTML report -> output file.

mod config;
mod error;
mod output;
mod public_client;
mod report;
mod types;
mod utils;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Credentials};
use crate::public_client::{HttpPublicApi, PublicApi};
use crate::report::Report;
use crate::types::PortfolioSnapshot;

const CONFIG_PATH_VAR: &str = "PAGE_CONFIG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    // Load config; secrets are checked before any network call
    let cfg_path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.yaml".to_string());
    let credentials =
        Credentials::from_env().inspect_err(|e| error!("Configuration error: {}", e))?;
    let cfg = AppConfig::load(&cfg_path)
        .with_context(|| format!("load config {}", cfg_path))?
        .with_credentials(credentials);

    let api = HttpPublicApi::new(&cfg.api)?;
    let report = generate(&cfg, &api).await?;
    output::write_report(&cfg.output.path, &report)?;
    Ok(())
}

/// One full fetch + render. Nothing is written unless every stage succeeds.
async fn generate(cfg: &AppConfig, api: &dyn PublicApi) -> anyhow::Result<Report> {
    let token = public_client::obtain_token(
        api,
        cfg.credentials.secret(),
        cfg.api.token_validity_minutes,
    )
    .await
    .context("authenticate")?;

    let raw = public_client::fetch_portfolio(api, &token, cfg.credentials.account_id())
        .await
        .context("fetch portfolio")?;

    let snapshot = PortfolioSnapshot::from_response(raw).context("normalize portfolio")?;
    info!(
        "Rendering {} positions, stock equity {}",
        snapshot.positions.len(),
        utils::format_currency(snapshot.total_equity)
    );
    Ok(report::render(&snapshot, &cfg.output.favicon))
}

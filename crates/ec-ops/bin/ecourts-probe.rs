//! Smoke test against a live eCourts deployment.
//!
//! Reads configuration from environment variables, bootstraps a session and prints the
//! state list (or a case history when `CNR` is set) as JSON.
//!
//! - `ECOURTS_CONFIG`: optional path to a JSON `ClientConfig`
//! - `COURT_TYPE`: `DC` (default) or `HC`
//! - `CNR`: optional case number to look up

use ec_ops::{ClientConfig, CourtType, CourtsClient};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match env::var("ECOURTS_CONFIG") {
        Ok(path) => serde_json::from_str::<ClientConfig>(&std::fs::read_to_string(path)?)?,
        Err(_) => ClientConfig::default(),
    };
    let court: CourtType = env::var("COURT_TYPE")
        .unwrap_or_else(|_| "DC".to_string())
        .parse()?;

    eprintln!("eCourts probe starting:");
    eprintln!("   Court: {}", court);
    eprintln!("   Base URL: {}", config.base_urls.get(court));

    let client = CourtsClient::new(config)?;
    let output = match env::var("CNR") {
        Ok(cnr) => client.case_history(court, &cnr).await?.into_value(),
        Err(_) => client.states(court).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    eprintln!("{}", serde_json::to_string(&client.health().await)?);
    Ok(())
}

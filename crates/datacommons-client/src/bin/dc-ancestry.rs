//! Prints the ancestry of one or more entities as JSON
//!
//! Usage: `dc-ancestry [--tree] <dcid>...`
//!
//! Reads `DC_BASE_URL`, `DC_TIMEOUT_SECS` and `DC_MAX_CONCURRENCY` from the
//! environment or a `.env` file.

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use datacommons_client::{init_tracing, ClientConfig, DataCommonsClient, DataCommonsError};

const USAGE: &str = "Usage: dc-ancestry [--tree] <dcid>...";

/// Rejected input gets the usage line, service failures keep their context
fn lookup_failure(error: DataCommonsError) -> anyhow::Error {
    if error.is_caller_error() {
        anyhow!("{}\n{}", error, USAGE)
    } else {
        anyhow::Error::new(error).context("Ancestry lookup failed")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut as_tree = false;
    let mut dcids = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--tree" => as_tree = true,
            flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
            _ => dcids.push(arg),
        }
    }
    if dcids.is_empty() {
        bail!(USAGE);
    }

    let config = ClientConfig::from_env().context("Invalid client configuration")?;
    info!(base_url = %config.base_url, entities = dcids.len(), as_tree, "Fetching ancestry");

    let client = DataCommonsClient::new(config).context("Failed to create client")?;
    let ancestry = client
        .node
        .fetch_entity_ancestry(dcids, as_tree)
        .await
        .map_err(lookup_failure)?;

    println!("{}", serde_json::to_string_pretty(&ancestry)?);
    Ok(())
}

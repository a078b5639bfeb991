//! Fetch the raw /movies response with the persisted token and print each
//! entry as pretty JSON. Uses CINELIST_API_BASE and CINELIST_STORAGE_PATH
//! from the environment (.env supported).

use anyhow::{Context, Result};
use cinelist::config::Config;
use cinelist::token::{FileTokenStore, TokenStore, TOKEN_KEY};
use dotenvy::dotenv;
use reqwest::Client;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present for local runs.
    dotenv().ok();

    let config = Config::from_env();
    let token = FileTokenStore::new(&config.storage_path)
        .get(TOKEN_KEY)?
        .context("No persisted token; log in with `cinelist login` first")?;

    let url = format!("{}/movies", config.api_base.trim_end_matches('/'));
    let response = Client::new()
        .get(&url)
        .bearer_auth(&token)
        .send()
        .await
        .context("Failed to call watchlist API")?
        .error_for_status()
        .context("Watchlist API returned an error status")?;

    let body: Value = response
        .json()
        .await
        .context("Failed to parse watchlist response")?;
    let movies = body
        .as_array()
        .context("Expected a JSON array of movies")?;

    for movie in movies {
        println!("{}", serde_json::to_string_pretty(movie)?);
    }

    Ok(())
}

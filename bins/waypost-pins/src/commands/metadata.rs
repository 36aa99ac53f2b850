//! Fetch the metadata document for a meta id

use anyhow::Result;
use owo_colors::OwoColorize;
use waypost_api_client::WaypostClient;

pub async fn run(client: &WaypostClient, meta_id: &str, format: &str) -> Result<()> {
    let document = client.get_metadata(meta_id).await?;

    if format != "json" {
        println!("metadata for {}", meta_id.bold());
    }
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

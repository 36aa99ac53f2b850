//! Delete pins by id

use anyhow::Result;
use owo_colors::OwoColorize;
use waypost_api_client::WaypostClient;

pub async fn run(client: &WaypostClient, ids: &[String], format: &str) -> Result<()> {
    let summary = client.delete_pins(ids).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} deleted {} pin(s)", "✓".green(), summary.deleted);
    Ok(())
}

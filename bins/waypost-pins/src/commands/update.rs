//! Apply partial updates from a JSON payload

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use waypost_api_client::{UpdatePin, WaypostClient};

pub async fn run(client: &WaypostClient, input: &str, format: &str) -> Result<()> {
    let payload = super::read_payload(input)?;
    let updates: Vec<UpdatePin> =
        serde_json::from_str(&payload).context("parsing update payload")?;
    let updated = client.update_pins(&updates).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&updated)?);
        return Ok(());
    }

    println!("{} updated {} pin(s)", "✓".green(), updated.len());
    for pin in &updated {
        println!("  {}  {}", pin.id.dimmed(), pin.meta_id);
    }
    Ok(())
}

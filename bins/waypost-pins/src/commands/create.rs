//! Create pins from a JSON payload

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use waypost_api_client::{CreatePin, WaypostClient};

pub async fn run(client: &WaypostClient, input: &str, format: &str) -> Result<()> {
    let payload = super::read_payload(input)?;
    let pins: Vec<CreatePin> =
        serde_json::from_str(&payload).context("parsing create payload")?;
    let created = client.create_pins(&pins).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&created)?);
        return Ok(());
    }

    println!("{} created {} pin(s)", "✓".green(), created.len());
    for pin in &created {
        println!("  {}  {}", pin.id.dimmed(), pin.meta_id);
    }
    Ok(())
}

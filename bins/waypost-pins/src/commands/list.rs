//! List pins for a meta id

use anyhow::Result;
use owo_colors::OwoColorize;
use waypost_api_client::WaypostClient;

pub async fn run(client: &WaypostClient, meta_id: &str, format: &str) -> Result<()> {
    let pins = client.get_pins(meta_id).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&pins)?);
        return Ok(());
    }

    println!("{} pin(s) for {}", pins.len(), meta_id.bold());
    for pin in &pins {
        let alert = if pin.alert {
            "!".red().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "  {alert} {}  ({:.2}, {:.2}, {:.2})  {}",
            pin.id.dimmed(),
            pin.position.x,
            pin.position.y,
            pin.position.z,
            pin.html
        );
    }
    Ok(())
}

//! CLI subcommands

pub mod create;
pub mod delete;
pub mod list;
pub mod metadata;
pub mod update;

use anyhow::Context;
use std::io::Read;

/// Read a JSON payload from a file path, or stdin when the path is "-"
pub fn read_payload(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))
    }
}

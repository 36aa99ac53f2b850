//! Typed client for the Waypost pin annotation API
//!
//! This crate provides a thin, authenticated HTTP client for the Waypost
//! pin service: create, read, update, and delete positioned annotation
//! pins, and fetch the opaque metadata document associated with a meta id.
//!
//! # Features
//!
//! - **Bearer-key authentication**: `Authorization` and `Content-Type` are
//!   forced onto every request and always win over configured headers
//! - **Typed operations**: pin CRUD and metadata lookup with serde types
//! - **Extension registry**: third-party modules receive the client's bound
//!   operations at construction and expose namespaced functionality
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//!   for tracing
//!
//! The client is deliberately thin: no caching, no retry, no pagination.
//! Every operation is a single round trip and every failure surfaces
//! directly to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use waypost_api_client::{CreatePin, Vector3, WaypostClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WaypostClient::builder("https://api.waypost.dev/v1", "aaa.bbb.ccc").build()?;
//!
//!     let created = client
//!         .create_pins(&[CreatePin::new(
//!             "floor-2",
//!             Vector3::new(1.0, 0.5, -3.2),
//!             "<b>Fire exit</b>",
//!         )])
//!         .await?;
//!     println!("created pin {}", created[0].id);
//!
//!     let pins = client.get_pins("floor-2").await?;
//!     println!("floor-2 has {} pins", pins.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod extensions;
pub mod types;

pub use client::{ClientBuilder, PinOperations, WaypostClient};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use extensions::{Capability, ExtensionDescriptor, ExtensionRegistry};
pub use types::{CreatePin, DeleteSummary, Metadata, Pin, UpdatePin, Vector3};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::{ClientBuilder, PinOperations, WaypostClient};
    pub use crate::config::ClientConfig;
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::extensions::{ExtensionDescriptor, ExtensionRegistry};
    pub use crate::types::{CreatePin, DeleteSummary, Metadata, Pin, UpdatePin, Vector3};
}

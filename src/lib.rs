//! Embed SDK library crate
//!
//! Typed client for the Embed recommendation API: personalized and public
//! feeds, stored feed configurations, semantic search, AI labels and custom
//! datasource ingestion. Calls are validated locally against declarative
//! endpoint schemas, then executed with bounded retries under one deadline.
//!
//! ```no_run
//! use embed_sdk::{EmbedClient, ForYouRequest};
//!
//! # async fn run() -> embed_sdk::Result<()> {
//! let client = EmbedClient::from_env()?;
//! let feed = client
//!     .feed()
//!     .by_user_id(ForYouRequest::for_user("16085").top_k(10))
//!     .await?;
//! println!("{} items", feed.items.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod labels;
pub mod namespaces;
pub mod registry;
pub mod schema;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::EmbedClient;
pub use config::{ClientConfig, ClientConfigBuilder, RetryPolicy};
pub use error::{Error, Result};
pub use labels::LabelCategory;
pub use schema::{ValidationError, Violation};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::*;

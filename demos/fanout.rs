//! Fetch a personalized feed, trending and popular concurrently.
//!
//! ```text
//! EMBED_API_KEY=... cargo run --example fanout -- 16085
//! ```

use anyhow::{Context, Result};
use embed_sdk::{EmbedClient, ForYouRequest, PublicFeedRequest};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let user_id = std::env::args().nth(1).unwrap_or_else(|| "16085".to_string());
    let client = EmbedClient::from_env().context("failed to configure client")?;
    info!("Fetching feeds for user {}", user_id);

    let feed = client.feed();
    let (for_you, trending, popular) = tokio::join!(
        feed.by_user_id(ForYouRequest::for_user(&user_id).top_k(10)),
        feed.trending(PublicFeedRequest {
            top_k: Some(10),
            ..Default::default()
        }),
        feed.popular(PublicFeedRequest {
            top_k: Some(10),
            ..Default::default()
        }),
    );

    for (name, result) in [("for-you", for_you), ("trending", trending), ("popular", popular)] {
        match result {
            Ok(page) => {
                info!("{}: {} items", name, page.items.len());
                for item in page.items.iter().take(3) {
                    info!("  {} (score {:?})", item.item_id, item.score);
                }
            }
            Err(e) => warn!("{} failed [{}]: {}", name, e.error_code(), e),
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("embed_sdk=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .init();
}

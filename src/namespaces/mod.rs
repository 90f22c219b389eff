//! Namespaced entry points
//!
//! Each facade borrows the client and adds per-operation defaults on top of
//! the registered endpoint schemas:
//!
//! ```no_run
//! # async fn demo(client: embed_sdk::EmbedClient) -> embed_sdk::Result<()> {
//! let trending = client.feed().trending(Default::default()).await?;
//! let labels = client.search().users().get_labels(["16085"], None).await?;
//! # Ok(())
//! # }
//! ```

mod datasource;
mod feed;
mod labels;
mod search;

pub use datasource::DatasourceApi;
pub use feed::{merge_feed_config, FeedApi};
pub use labels::LabelsApi;
pub use search::{PostSearchApi, SearchApi, UserSearchApi};

fn to_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

//! Feeds and stored feed configurations

use crate::client::EmbedClient;
use crate::error::Result;
use crate::registry::{lookup, names, DEFAULT_TOP_K};
use crate::types::{
    CreatedFeedConfig, FeedConfig, FeedConfigUpdate, FeedResponse, ForYouRequest, NewFeedConfig,
    PublicFeedRequest,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

/// Feeds and stored feed configurations
pub struct FeedApi<'a> {
    client: &'a EmbedClient,
}

impl<'a> FeedApi<'a> {
    pub(crate) fn new(client: &'a EmbedClient) -> Self {
        Self { client }
    }

    /// Personalized feed for one user.
    ///
    /// `top_k` defaults to 25 and `impression_count` to `top_k`. When both
    /// `user_id` and `wallet_address` are set, the wallet is ignored.
    pub async fn by_user_id(&self, mut request: ForYouRequest) -> Result<FeedResponse> {
        if request.user_id.is_some() && request.wallet_address.take().is_some() {
            debug!("wallet_address ignored in favour of user_id");
        }
        let top_k = *request.top_k.get_or_insert(DEFAULT_TOP_K);
        request.impression_count.get_or_insert(top_k);
        self.client.send(names::FEED_FOR_YOU, &request).await
    }

    pub async fn trending(&self, request: PublicFeedRequest) -> Result<FeedResponse> {
        self.client.send(names::FEED_TRENDING, &request).await
    }

    pub async fn popular(&self, request: PublicFeedRequest) -> Result<FeedResponse> {
        self.client.send(names::FEED_POPULAR, &request).await
    }

    pub async fn create_config(&self, config: NewFeedConfig) -> Result<CreatedFeedConfig> {
        self.client.send(names::FEED_CONFIG_CREATE, &config).await
    }

    pub async fn list_configs(&self) -> Result<Vec<FeedConfig>> {
        // The listing comes back either bare or wrapped in `configs`
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Listing {
            Bare(Vec<FeedConfig>),
            Wrapped {
                #[serde(default)]
                configs: Vec<FeedConfig>,
            },
        }

        let listing: Listing = self.client.send(names::FEED_CONFIG_LIST, &json!({})).await?;
        Ok(match listing {
            Listing::Bare(configs) | Listing::Wrapped { configs } => configs,
        })
    }

    pub async fn get_config(&self, config_id: &str) -> Result<FeedConfig> {
        self.client
            .send(names::FEED_CONFIG_GET, &json!({ "config_id": config_id }))
            .await
    }

    /// Apply a partial update to a stored feed configuration.
    ///
    /// Fetches the current configuration, merges `update` into it (see
    /// [`merge_feed_config`]) and writes the result back. The fetch and the
    /// write are not atomic: a concurrent update between the two is lost.
    #[instrument(skip(self, update))]
    pub async fn update_config(&self, config_id: &str, update: FeedConfigUpdate) -> Result<Value> {
        let current: Value = self
            .client
            .send(names::FEED_CONFIG_GET, &json!({ "config_id": config_id }))
            .await?;

        let mut merged = merge_feed_config(&current, &serde_json::to_value(&update)?);
        merged.insert("config_id".to_string(), Value::from(config_id));

        let endpoint = lookup(names::FEED_CONFIG_UPDATE)?;
        merged.retain(|key, _| endpoint.schema.get(key).is_some());
        debug!(fields = merged.len(), "writing merged feed configuration");

        self.client
            .execute_endpoint(endpoint, &Value::Object(merged))
            .await
    }
}

/// Merge a partial feed-configuration update into the current one.
///
/// Top-level fields are replaced. Inside `config`, keys are replaced one by
/// one, except `filters`, which is merged recursively so filter fields the
/// update does not mention survive. Nulls in the update are ignored.
pub fn merge_feed_config(current: &Value, update: &Value) -> Map<String, Value> {
    let mut merged = current.as_object().cloned().unwrap_or_default();
    let Some(update) = update.as_object() else {
        return merged;
    };

    for (key, value) in update {
        match (key.as_str(), value) {
            (_, Value::Null) => {}
            ("config", Value::Object(patch)) => {
                let config = merged
                    .entry("config")
                    .or_insert_with(|| Value::Object(Map::new()));
                if !config.is_object() {
                    *config = Value::Object(Map::new());
                }
                if let Value::Object(config) = config {
                    for (inner, value) in patch {
                        if value.is_null() {
                            continue;
                        }
                        match config.get_mut(inner) {
                            Some(existing) if inner == "filters" => deep_merge(existing, value),
                            _ => {
                                config.insert(inner.clone(), value.clone());
                            }
                        }
                    }
                }
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

fn deep_merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    continue;
                }
                match target.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value)
                    }
                    _ => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

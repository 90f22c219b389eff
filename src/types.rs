//! Request parameters and decoded response entities
//!
//! Request types serialize to the service's parameter names and omit unset
//! fields, leaving defaults to the endpoint schemas. Response types are
//! plain values decoded from JSON; fields the service may omit default.

use crate::labels::LabelCategory;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Feeds
// ============================================================================

/// Content filters shared by feed calls and stored feed configurations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_ai_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo_locations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_channels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,
}

/// Parameters of a personalized ("for you") feed.
///
/// Identify the user by `user_id` or `wallet_address`; when both are set,
/// `user_id` is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForYouRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impression_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FeedFilters>,
}

impl ForYouRequest {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn for_wallet(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: Some(wallet_address.into()),
            ..Self::default()
        }
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn impression_count(mut self, count: u32) -> Self {
        self.impression_count = Some(count);
        self
    }

    pub fn feed_id(mut self, feed_id: impl Into<String>) -> Self {
        self.feed_id = Some(feed_id.into());
        self
    }

    pub fn filters(mut self, filters: FeedFilters) -> Self {
        self.filters = Some(filters);
        self
    }
}

/// Parameters of the trending and popular feeds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PublicFeedRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_metadata: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FeedFilters>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedItem {
    pub item_id: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub source_feed: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub items: Vec<FeedItem>,
}

// ============================================================================
// Feed configurations
// ============================================================================

/// Algorithm and filters of a stored feed; unknown knobs are kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedConfigBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FeedFilters>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stored feed configuration as returned by the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedConfig {
    pub config_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub config: FeedConfigBody,
    /// Server-managed fields (timestamps, owner, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFeedConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    pub config: FeedConfigBody,
}

/// Partial update of a feed configuration; unset fields are preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<FeedConfigBody>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedFeedConfig {
    pub config_id: String,
}

// ============================================================================
// Search and labels
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserSearchResult {
    pub user_id: String,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserSearchResponse {
    #[serde(default)]
    pub users: Vec<UserSearchResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostSearchResult {
    pub item_id: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ai_labels: Option<Vec<LabelScore>>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostSearchResponse {
    #[serde(default)]
    pub items: Vec<PostSearchResult>,
}

/// Options for semantic post search
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostSearchOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_ai_labels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_metadata: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserLabelResult {
    pub user_id: String,
    #[serde(default)]
    pub labels: Vec<LabelScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserLabelsResponse {
    #[serde(default)]
    pub users: Vec<UserLabelResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostLabelResult {
    pub item_id: String,
    #[serde(default)]
    pub labels: Vec<LabelScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostLabelsResponse {
    #[serde(default)]
    pub items: Vec<PostLabelResult>,
}

/// Labels of one text input, in input order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextLabelResult {
    #[serde(default)]
    pub labels: Vec<LabelScore>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextLabelsResponse {
    #[serde(default)]
    pub results: Vec<TextLabelResult>,
}

/// Parameters of a labels lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct LabelsRequest {
    #[serde(flatten)]
    pub list: Map<String, Value>,
    pub label_category: &'static str,
}

impl LabelsRequest {
    pub(crate) fn new(
        list_field: &str,
        entries: Vec<String>,
        category: Option<LabelCategory>,
    ) -> Self {
        let mut list = Map::new();
        list.insert(list_field.to_string(), Value::from(entries));
        Self {
            list,
            label_category: category.unwrap_or_default().as_str(),
        }
    }
}

/// Thresholds for "top users by label"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopUsersOptions {
    pub top_k: u32,
    pub minimum_activity_count: u32,
    pub ratio_min: f64,
    pub conf_min: f64,
}

impl Default for TopUsersOptions {
    fn default() -> Self {
        Self {
            top_k: 100,
            minimum_activity_count: 10,
            ratio_min: 0.75,
            conf_min: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopUser {
    pub user_id: String,
    #[serde(default)]
    pub ratio: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub activity_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TopUsersResponse {
    #[serde(default)]
    pub users: Vec<TopUser>,
}

// ============================================================================
// Datasource
// ============================================================================

/// One item pushed into a custom datasource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestItem {
    /// `protocol.localId`, e.g. `farcaster.0x1a2b`
    pub item_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl IngestItem {
    pub fn new(item_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            text: text.into(),
            author_id: None,
            timestamp: None,
            url: None,
            embed_urls: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RejectedItem {
    pub item_id: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IngestResponse {
    #[serde(default)]
    pub accepted: u32,
    #[serde(default)]
    pub rejected: Vec<RejectedItem>,
}

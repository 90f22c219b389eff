//! Endpoint registry
//!
//! A static catalogue mapping logical operation names to the REST contract
//! of the external service: path, method, auth requirement and parameter
//! schema. Built once on first use and read-only afterwards.
//!
//! Categories exist for documentation and introspection only. Entries
//! marked `internal` have a convenience wrapper callers should prefer
//! (e.g. `feed.config.update` is driven by `FeedApi::update_config`).

use crate::error::{Error, Result};
use crate::labels::{ALL_LABELS, LABEL_CATEGORIES};
use crate::schema::{Field, FieldType, Schema};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Logical endpoint names
pub mod names {
    pub const FEED_FOR_YOU: &str = "feed.for_you";
    pub const FEED_TRENDING: &str = "feed.trending";
    pub const FEED_POPULAR: &str = "feed.popular";
    pub const FEED_CONFIG_CREATE: &str = "feed.config.create";
    pub const FEED_CONFIG_LIST: &str = "feed.config.list";
    pub const FEED_CONFIG_GET: &str = "feed.config.get";
    pub const FEED_CONFIG_UPDATE: &str = "feed.config.update";
    pub const POSTS_SEMANTIC: &str = "search.posts.semantic";
    pub const POSTS_SIMILAR: &str = "search.posts.similar";
    pub const POSTS_LABELS: &str = "search.posts.labels";
    pub const POSTS_TOP_BY_LABEL: &str = "search.posts.top_by_label";
    pub const LABELS_FOR_TEXT: &str = "labels.for_text";
    pub const USERS_SEMANTIC: &str = "search.users.semantic";
    pub const USERS_SIMILAR: &str = "search.users.similar";
    pub const USERS_LABELS: &str = "search.users.labels";
    pub const USERS_TOP_BY_LABEL: &str = "search.users.top_by_label";
    pub const DATASOURCE_INGEST: &str = "datasource.ingest";
}

/// Default page size for feeds and searches
pub const DEFAULT_TOP_K: u32 = 25;

/// Maximum entries in one labels or ingest batch
pub const MAX_BATCH: usize = 100;

/// `protocol.localId`, e.g. `farcaster.0x1a2b`
pub static COMPOSITE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*\.[A-Za-z0-9_:\-]+$").expect("valid pattern"));

/// Feed configuration ids are substituted into URL paths
pub static CONFIG_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_\-]{1,128}$").expect("valid pattern"));

pub static WALLET_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid pattern"));

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::builtin);

/// The process-wide endpoint catalogue
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Shorthand for `registry().lookup(name)`
pub fn lookup(name: &str) -> Result<&'static EndpointConfig> {
    registry().lookup(name)
}

/// HTTP method of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }

    /// Whether parameters travel as a JSON body
    pub fn has_body(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Feeds,
    Search,
    Users,
    AiLabels,
    Similarity,
    Datasource,
}

/// One operation of the external REST contract
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub name: &'static str,
    /// Path relative to the base URL; may contain `{param}` placeholders
    pub path: &'static str,
    pub method: Method,
    pub schema: Schema,
    pub requires_auth: bool,
    pub category: Category,
    pub internal: bool,
}

impl EndpointConfig {
    fn new(
        name: &'static str,
        method: Method,
        path: &'static str,
        category: Category,
        schema: Schema,
    ) -> Self {
        Self {
            name,
            path,
            method,
            schema,
            requires_auth: true,
            category,
            internal: false,
        }
    }

    fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Names of `{param}` placeholders in the path
    pub fn path_params(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        let mut rest = self.path;
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else { break };
            out.push(&rest[start + 1..start + len]);
            rest = &rest[start + len + 1..];
        }
        out
    }
}

/// Read-only lookup table of endpoint configurations
#[derive(Debug)]
pub struct Registry {
    endpoints: BTreeMap<&'static str, EndpointConfig>,
}

impl Registry {
    fn from_entries(entries: Vec<EndpointConfig>) -> Self {
        Self {
            endpoints: entries.into_iter().map(|e| (e.name, e)).collect(),
        }
    }

    /// Unknown names are programming errors in the caller
    pub fn lookup(&self, name: &str) -> Result<&EndpointConfig> {
        self.endpoints.get(name).ok_or_else(|| Error::UnknownEndpoint {
            name: name.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointConfig> {
        self.endpoints.values()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &EndpointConfig> {
        self.iter().filter(move |e| e.category == category)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    fn builtin() -> Self {
        use names::*;
        use Category::*;
        use Method::*;

        Self::from_entries(vec![
            // Feeds
            EndpointConfig::new(
                FEED_FOR_YOU,
                Post,
                "/v2/farcaster/casts/feed/for-you",
                Feeds,
                personalized_feed_schema(),
            ),
            EndpointConfig::new(
                FEED_TRENDING,
                Post,
                "/v2/farcaster/casts/feed/trending",
                Feeds,
                public_feed_schema(),
            ),
            EndpointConfig::new(
                FEED_POPULAR,
                Post,
                "/v2/farcaster/casts/feed/popular",
                Feeds,
                public_feed_schema(),
            ),
            EndpointConfig::new(
                FEED_CONFIG_CREATE,
                Post,
                "/v2/feed/create",
                Feeds,
                Schema::new()
                    .field(name_field(true))
                    .field(Field::optional("description", FieldType::String).max_len(1000))
                    .field(visibility_field())
                    .field(Field::required("config", FieldType::Object(feed_config_body()))),
            ),
            EndpointConfig::new(FEED_CONFIG_LIST, Get, "/v2/feed/list", Feeds, Schema::new()),
            EndpointConfig::new(
                FEED_CONFIG_GET,
                Get,
                "/v2/feed/{config_id}",
                Feeds,
                Schema::new().field(config_id_field()),
            ),
            EndpointConfig::new(
                FEED_CONFIG_UPDATE,
                Patch,
                "/v2/feed/update",
                Feeds,
                Schema::new()
                    .field(config_id_field())
                    .field(name_field(false))
                    .field(Field::optional("description", FieldType::String).max_len(1000))
                    .field(visibility_field())
                    .field(Field::optional("config", FieldType::Object(feed_config_body()))),
            )
            .internal(),
            // Post search
            EndpointConfig::new(
                POSTS_SEMANTIC,
                Post,
                "/v2/farcaster/casts/search/semantic",
                Search,
                query_schema()
                    .field(Field::optional("return_ai_labels", FieldType::Boolean))
                    .field(Field::optional("return_metadata", FieldType::Boolean)),
            ),
            EndpointConfig::new(
                POSTS_SIMILAR,
                Post,
                "/v2/farcaster/casts/feed/similar",
                Similarity,
                Schema::new()
                    .field(Field::required("item_id", FieldType::String).min_len(1))
                    .field(top_k_field(DEFAULT_TOP_K, 100))
                    .field(Field::optional("filters", FieldType::Any)),
            ),
            EndpointConfig::new(
                POSTS_LABELS,
                Post,
                "/v2/farcaster/casts/labels/for-items",
                AiLabels,
                labels_schema("items_list"),
            ),
            EndpointConfig::new(
                POSTS_TOP_BY_LABEL,
                Post,
                "/v2/farcaster/casts/labels/top-items",
                AiLabels,
                Schema::new()
                    .field(label_field())
                    .field(top_k_field(DEFAULT_TOP_K, 100))
                    .field(Field::optional("filters", FieldType::Any)),
            ),
            EndpointConfig::new(
                LABELS_FOR_TEXT,
                Post,
                "/v2/farcaster/casts/labels/for-text",
                AiLabels,
                labels_schema("text_inputs"),
            ),
            // User search
            EndpointConfig::new(
                USERS_SEMANTIC,
                Post,
                "/v2/farcaster/users/search/semantic",
                Users,
                query_schema(),
            ),
            EndpointConfig::new(
                USERS_SIMILAR,
                Post,
                "/v2/farcaster/users/feed/similar",
                Similarity,
                Schema::new()
                    .field(Field::required("user_id", FieldType::String).min_len(1))
                    .field(top_k_field(DEFAULT_TOP_K, 100)),
            ),
            EndpointConfig::new(
                USERS_LABELS,
                Post,
                "/v2/farcaster/users/labels/for-users",
                AiLabels,
                labels_schema("users_list"),
            ),
            EndpointConfig::new(
                USERS_TOP_BY_LABEL,
                Post,
                "/v2/farcaster/users/labels/top-users",
                AiLabels,
                Schema::new()
                    .field(label_field())
                    .field(top_k_field(100, 1000))
                    .field(
                        Field::optional("minimum_activity_count", FieldType::Integer)
                            .default(10)
                            .min(0.0),
                    )
                    .field(
                        Field::optional("ratio_min", FieldType::Number)
                            .default(0.75)
                            .range(0.0, 1.0),
                    )
                    .field(
                        Field::optional("conf_min", FieldType::Number)
                            .default(0.6)
                            .range(0.0, 1.0),
                    ),
            ),
            // Datasource
            EndpointConfig::new(
                DATASOURCE_INGEST,
                Post,
                "/v2/datasource/items/ingest",
                Datasource,
                Schema::new().field(
                    Field::required("items", FieldType::array(FieldType::Object(ingest_item())))
                        .min_len(1)
                        .max_len(MAX_BATCH),
                ),
            ),
        ])
    }
}

// ============================================================================
// Shared schema fragments
// ============================================================================

fn top_k_field(default: u32, max: u32) -> Field {
    Field::optional("top_k", FieldType::Integer)
        .default(default)
        .range(1.0, f64::from(max))
}

fn personalized_feed_schema() -> Schema {
    Schema::new()
        .field(Field::optional("user_id", FieldType::String).min_len(1))
        .field(Field::optional("wallet_address", FieldType::String).pattern(&WALLET_ADDRESS))
        .field(top_k_field(DEFAULT_TOP_K, 500))
        .field(Field::optional("impression_count", FieldType::Integer).range(1.0, 500.0))
        .field(Field::optional("feed_id", FieldType::String).pattern(&CONFIG_ID))
        .field(Field::optional("return_metadata", FieldType::Boolean))
        .field(Field::optional("filters", FieldType::Object(feed_filters())))
        .require_any(&["user_id", "wallet_address"])
}

fn public_feed_schema() -> Schema {
    Schema::new()
        .field(top_k_field(DEFAULT_TOP_K, 500))
        .field(Field::optional("user_id", FieldType::String).min_len(1))
        .field(Field::optional("feed_id", FieldType::String).pattern(&CONFIG_ID))
        .field(Field::optional("return_metadata", FieldType::Boolean))
        .field(Field::optional("filters", FieldType::Object(feed_filters())))
}

fn query_schema() -> Schema {
    Schema::new()
        .field(
            Field::required("query", FieldType::String)
                .min_len(1)
                .max_len(1000),
        )
        .field(top_k_field(DEFAULT_TOP_K, 100))
        .field(Field::optional("filters", FieldType::Any))
}

fn labels_schema(list: &'static str) -> Schema {
    Schema::new()
        .field(
            Field::required(list, FieldType::array(FieldType::String))
                .min_len(1)
                .max_len(MAX_BATCH),
        )
        .field(
            Field::optional("label_category", FieldType::String)
                .default("all")
                .one_of(LABEL_CATEGORIES),
        )
}

fn label_field() -> Field {
    Field::required("label", FieldType::String).one_of(&ALL_LABELS)
}

fn config_id_field() -> Field {
    Field::required("config_id", FieldType::String).pattern(&CONFIG_ID)
}

fn name_field(required: bool) -> Field {
    let field = if required {
        Field::required("name", FieldType::String)
    } else {
        Field::optional("name", FieldType::String)
    };
    field.min_len(1).max_len(100)
}

fn visibility_field() -> Field {
    Field::optional("visibility", FieldType::String).one_of(&["private", "public"])
}

/// Filters shared by feed calls and stored feed configurations
pub fn feed_filters() -> Schema {
    let strings = || FieldType::array(FieldType::String);
    Schema::new()
        .field(Field::optional("ai_labels", strings()).one_of(&ALL_LABELS))
        .field(Field::optional("remove_ai_labels", strings()).one_of(&ALL_LABELS))
        .field(Field::optional("geo_locations", strings()))
        .field(Field::optional("languages", strings()))
        .field(Field::optional("channels", strings()))
        .field(Field::optional("remove_channels", strings()))
        .field(Field::optional("authors", strings()))
        .field(Field::optional("remove_authors", strings()))
        .field(Field::optional("start_timestamp", FieldType::String))
}

fn feed_config_body() -> Schema {
    Schema::new()
        .field(Field::optional("algo", FieldType::String).one_of(&["for-you", "trending", "popular"]))
        .field(Field::optional(
            "filters",
            // Stored configs may carry filters this client does not model
            FieldType::Object(feed_filters().allow_unknown()),
        ))
        .allow_unknown()
}

fn ingest_item() -> Schema {
    Schema::new()
        .field(Field::required("item_id", FieldType::String).pattern(&COMPOSITE_ID))
        .field(
            Field::required("text", FieldType::String)
                .min_len(1)
                .max_len(10_000),
        )
        .field(Field::optional("author_id", FieldType::String))
        .field(Field::optional("timestamp", FieldType::Integer).min(0.0))
        .field(Field::optional("url", FieldType::String))
        .field(Field::optional("embed_urls", FieldType::array(FieldType::String)))
        .field(Field::optional("metadata", FieldType::Any))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_known_endpoint() {
        let ep = lookup(names::FEED_FOR_YOU).unwrap();
        assert_eq!(ep.method, Method::Post);
        assert_eq!(ep.path, "/v2/farcaster/casts/feed/for-you");
        assert!(ep.requires_auth);
        assert!(!ep.internal);
    }

    #[test]
    fn test_lookup_unknown_endpoint() {
        let err = lookup("feed.nope").unwrap_err();
        assert!(matches!(err, Error::UnknownEndpoint { ref name } if name == "feed.nope"));
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_get_endpoints_have_no_body() {
        for ep in registry().iter().filter(|e| e.method == Method::Get) {
            assert!(!ep.method.has_body());
            for field in ep.schema.fields() {
                assert!(
                    ep.path_params().contains(&field.name()),
                    "{} declares non-path parameter {}",
                    ep.name,
                    field.name()
                );
            }
        }
    }

    #[test]
    fn test_internal_entries() {
        let internal: Vec<_> = registry().iter().filter(|e| e.internal).map(|e| e.name).collect();
        assert_eq!(internal, vec![names::FEED_CONFIG_UPDATE]);
    }

    #[test]
    fn test_by_category() {
        let labels: Vec<_> = registry().by_category(Category::AiLabels).map(|e| e.name).collect();
        assert!(labels.contains(&names::USERS_LABELS));
        assert!(labels.contains(&names::LABELS_FOR_TEXT));
        assert_eq!(registry().by_category(Category::Datasource).count(), 1);
        assert_eq!(registry().iter().count(), registry().len());
    }

    #[test]
    fn test_stored_config_filters_keep_unmodelled_keys() {
        let params = json!({
            "config_id": "cfg_1",
            "config": {"filters": {"geo_locations": ["US"], "end_timestamp": "1700000000"}}
        });
        let validated = lookup(names::FEED_CONFIG_UPDATE)
            .unwrap()
            .schema
            .validate(&params)
            .unwrap();
        assert_eq!(validated["config"]["filters"]["end_timestamp"], "1700000000");

        // Per-call feed filters stay strict
        let err = lookup(names::FEED_TRENDING)
            .unwrap()
            .schema
            .validate(&json!({"filters": {"end_timestamp": "1700000000"}}))
            .unwrap_err();
        assert!(err.has_path("filters.end_timestamp"));
    }

    #[test]
    fn test_path_params() {
        assert_eq!(lookup(names::FEED_CONFIG_GET).unwrap().path_params(), vec!["config_id"]);
        assert!(lookup(names::FEED_CONFIG_LIST).unwrap().path_params().is_empty());
    }

    #[test]
    fn test_top_users_defaults() {
        let ep = lookup(names::USERS_TOP_BY_LABEL).unwrap();
        let out = ep.schema.validate(&json!({"label": "web3_defi"})).unwrap();
        assert_eq!(
            out,
            json!({
                "label": "web3_defi",
                "top_k": 100,
                "minimum_activity_count": 10,
                "ratio_min": 0.75,
                "conf_min": 0.6
            })
        );
    }

    #[test]
    fn test_labels_default_category() {
        let ep = lookup(names::USERS_LABELS).unwrap();
        let out = ep.schema.validate(&json!({"users_list": ["16085"]})).unwrap();
        assert_eq!(out["label_category"], "all");
    }

    #[test]
    fn test_ingest_item_id_pattern() {
        let ep = lookup(names::DATASOURCE_INGEST).unwrap();
        assert!(ep
            .schema
            .validate(&json!({"items": [{"item_id": "farcaster.0xabc", "text": "gm"}]}))
            .is_ok());
        let err = ep
            .schema
            .validate(&json!({"items": [{"item_id": "0xabc", "text": "gm"}]}))
            .unwrap_err();
        assert!(err.has_path("items[0].item_id"));
    }

    #[test]
    fn test_composite_id_pattern() {
        assert!(COMPOSITE_ID.is_match("farcaster.16085"));
        assert!(COMPOSITE_ID.is_match("lens.0x01-0x02"));
        assert!(!COMPOSITE_ID.is_match("farcaster."));
        assert!(!COMPOSITE_ID.is_match(".16085"));
        assert!(!COMPOSITE_ID.is_match("16085"));
    }
}

//! Client configuration
//!
//! A [`ClientConfig`] is built once per client and never mutated; to change
//! the token or retry policy, build a new client. Values come from the
//! builder, falling back to environment variables (a `.env` file is loaded
//! by [`ClientConfig::from_env`]).
//!
//! # Example
//! ```no_run
//! use embed_sdk::{ClientConfig, RetryPolicy};
//! let config = ClientConfig::builder()
//!     .api_key("mbd-xxxx")
//!     .title("my-app")
//!     .retry_policy(RetryPolicy::fast_fail())
//!     .build()
//!     .expect("valid config");
//! ```

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Production endpoint of the recommendation service
pub const DEFAULT_BASE_URL: &str = "https://api.mbd.xyz";

/// Environment variable holding the bearer token
pub const API_KEY_VAR: &str = "EMBED_API_KEY";

/// Header identifying the calling application's URL
pub const REFERER_HEADER: &str = "HTTP-Referer";

/// Header identifying the calling application's name
pub const TITLE_HEADER: &str = "X-Title";

/// Headers the request builder owns; custom headers may not override them
const RESERVED_HEADERS: &[&str] = &["authorization", "accept", "content-type"];

/// Status codes retried by [`RetryPolicy::default`]
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

// ============================================================================
// Retry policy
// ============================================================================

/// How the executor retries one logical call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; 0 means exactly one attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay_ms: u64,
    /// Double the delay on each further retry
    pub exponential_backoff: bool,
    /// Cap for exponential delays
    pub max_delay_ms: u64,
    pub retryable_status_codes: BTreeSet<u16>,
    /// Deadline for the whole call, retries and sleeps included
    pub timeout_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            exponential_backoff: true,
            max_delay_ms: 10_000,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
            timeout_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Short budget for test suites and interactive tools
    pub fn fast_fail() -> Self {
        Self {
            max_retries: 1,
            initial_delay_ms: 100,
            max_delay_ms: 500,
            timeout_ms: 5_000,
            ..Self::default()
        }
    }

    /// Exactly one attempt
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Sleep before retry number `retry` (1-based).
    ///
    /// Fixed policies always wait `initial_delay_ms`; exponential policies
    /// wait `min(initial_delay_ms * 2^(retry-1), max_delay_ms)`.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if !self.exponential_backoff {
            return Duration::from_millis(self.initial_delay_ms);
        }
        let factor = 1u64.checked_shl(retry.saturating_sub(1)).unwrap_or(u64::MAX);
        let delay = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfig {
                key: "timeout_ms",
                message: "timeout must be greater than zero".into(),
            });
        }
        if self.exponential_backoff && self.max_delay_ms < self.initial_delay_ms {
            return Err(Error::InvalidConfig {
                key: "max_delay_ms",
                message: format!(
                    "max delay {}ms is below initial delay {}ms",
                    self.max_delay_ms, self.initial_delay_ms
                )
                .into(),
            });
        }
        if let Some(code) = self
            .retryable_status_codes
            .iter()
            .find(|c| !(100..=599).contains(*c))
        {
            return Err(Error::InvalidConfig {
                key: "retryable_status_codes",
                message: format!("{code} is not an HTTP status code").into(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Client configuration
// ============================================================================

/// Immutable configuration shared by every call of one client
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: Option<String>,
    referer: Option<String>,
    title: Option<String>,
    custom_headers: BTreeMap<String, String>,
    retry_policy: RetryPolicy,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore if not found)
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_summary();
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = RetryPolicy::default();
        let retry_policy = RetryPolicy {
            max_retries: parsed_or(&lookup, "EMBED_MAX_RETRIES", defaults.max_retries)?,
            initial_delay_ms: parsed_or(&lookup, "EMBED_RETRY_DELAY_MS", defaults.initial_delay_ms)?,
            exponential_backoff: parsed_or(
                &lookup,
                "EMBED_EXPONENTIAL_BACKOFF",
                defaults.exponential_backoff,
            )?,
            max_delay_ms: parsed_or(&lookup, "EMBED_MAX_RETRY_DELAY_MS", defaults.max_delay_ms)?,
            timeout_ms: parsed_or(&lookup, "EMBED_TIMEOUT_MS", defaults.timeout_ms)?,
            ..defaults
        };

        let mut builder = ClientConfigBuilder {
            env_fallback: false,
            ..ClientConfigBuilder::default()
        }
        .base_url(lookup("EMBED_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
        .retry_policy(retry_policy);

        if let Some(key) = lookup(API_KEY_VAR) {
            builder = builder.api_key(key);
        }
        if let Some(referer) = lookup("EMBED_REFERER") {
            builder = builder.referer(referer);
        }
        if let Some(title) = lookup("EMBED_TITLE") {
            builder = builder.title(title);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn custom_headers(&self) -> &BTreeMap<String, String> {
        &self.custom_headers
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Log configuration summary (without sensitive data)
    pub fn log_summary(&self) {
        info!("Embed client configuration:");
        info!("  Base URL: {}", self.base_url);
        info!(
            "  API key: {}",
            self.api_key.as_deref().map(mask_token).unwrap_or_else(|| "<none>".into())
        );
        info!(
            "  Retries: {} (initial {}ms, exponential={}, max {}ms)",
            self.retry_policy.max_retries,
            self.retry_policy.initial_delay_ms,
            self.retry_policy.exponential_backoff,
            self.retry_policy.max_delay_ms
        );
        info!("  Timeout: {}ms", self.retry_policy.timeout_ms);
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(mask_token))
            .field("referer", &self.referer)
            .field("title", &self.title)
            .field("custom_headers", &self.custom_headers)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    api_key: Option<String>,
    referer: Option<String>,
    title: Option<String>,
    custom_headers: BTreeMap<String, String>,
    retry_policy: RetryPolicy,
    env_fallback: bool,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            referer: None,
            title: None,
            custom_headers: BTreeMap::new(),
            retry_policy: RetryPolicy::default(),
            env_fallback: true,
        }
    }
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Do not read `EMBED_API_KEY` when no key was passed
    pub fn without_env_api_key(mut self) -> Self {
        self.env_fallback = false;
        self
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| Error::InvalidConfig {
            key: "base_url",
            message: format!("Invalid URL '{}': {}", base_url, e).into(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig {
                key: "base_url",
                message: format!("Unsupported scheme '{}'", parsed.scheme()).into(),
            });
        }

        for name in self.custom_headers.keys() {
            if RESERVED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                return Err(Error::InvalidConfig {
                    key: "custom_headers",
                    message: format!("header '{}' is set by the client", name).into(),
                });
            }
        }

        self.retry_policy.validate()?;

        let api_key = self
            .api_key
            .or_else(|| {
                if self.env_fallback {
                    std::env::var(API_KEY_VAR).ok()
                } else {
                    None
                }
            })
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(ClientConfig {
            base_url,
            api_key,
            referer: self.referer,
            title: self.title,
            custom_headers: self.custom_headers,
            retry_policy: self.retry_policy,
        })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse a variable if present, falling back to `default` when absent
fn parsed_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| Error::InvalidConfig {
            key,
            message: format!("Invalid value '{}': {}", value, e).into(),
        }),
        None => Ok(default),
    }
}

/// Mask a secret for logs
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 8 {
        return "****".to_string();
    }
    let prefix: String = token.chars().take(4).collect();
    format!("{}****", prefix)
}

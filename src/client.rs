//! Client entry point
//!
//! [`EmbedClient`] owns the immutable configuration and the executor, and is
//! cheap to clone. Every call, typed or generic, goes through the same path:
//! look up the endpoint, validate and default the parameters, build the
//! request, execute it under the retry policy, decode.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::executor::Executor;
use crate::http::build_request;
use crate::namespaces::{DatasourceApi, FeedApi, LabelsApi, SearchApi};
use crate::registry::{lookup, EndpointConfig};
use crate::transport::{ReqwestTransport, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

#[derive(Clone)]
pub struct EmbedClient {
    config: Arc<ClientConfig>,
    executor: Arc<Executor>,
}

impl EmbedClient {
    /// Create a client talking to the network through reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client from `EMBED_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let executor = Executor::new(transport, config.retry_policy().clone());
        Self {
            config: Arc::new(config),
            executor: Arc::new(executor),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn feed(&self) -> FeedApi<'_> {
        FeedApi::new(self)
    }

    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    pub fn labels(&self) -> LabelsApi<'_> {
        LabelsApi::new(self)
    }

    pub fn datasource(&self) -> DatasourceApi<'_> {
        DatasourceApi::new(self)
    }

    /// Call any registered endpoint by name with raw JSON parameters
    pub async fn call(&self, name: &str, params: Value) -> Result<Value> {
        self.call_typed(name, params).await
    }

    /// Call any registered endpoint by name and decode the response as `T`
    pub async fn call_typed<T: DeserializeOwned>(&self, name: &str, params: Value) -> Result<T> {
        let endpoint = lookup(name)?;
        self.execute_endpoint(endpoint, &params).await
    }

    /// Serialize `params` and call the endpoint
    pub(crate) async fn send<P, T>(&self, name: &str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = lookup(name)?;
        let params = serde_json::to_value(params)?;
        self.execute_endpoint(endpoint, &params).await
    }

    #[instrument(skip(self, endpoint, params), fields(endpoint = endpoint.name))]
    pub(crate) async fn execute_endpoint<T: DeserializeOwned>(
        &self,
        endpoint: &EndpointConfig,
        params: &Value,
    ) -> Result<T> {
        let params = endpoint.schema.validate(params).map_err(|e| {
            debug!("Rejected before sending: {}", e);
            e
        })?;
        let request = build_request(endpoint, &params, &self.config)?;

        match self.executor.execute(&request).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_error_level() => {
                error!("{} failed: {}", endpoint.name, e);
                Err(e)
            }
            Err(e) => {
                warn!("{} failed: {}", endpoint.name, e);
                Err(e)
            }
        }
    }
}

impl fmt::Debug for EmbedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbedClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::error::Error;
    use crate::executor::tests::{ScriptedTransport, Step};
    use crate::registry::names;
    use serde_json::json;

    pub(crate) fn client(transport: Arc<ScriptedTransport>) -> EmbedClient {
        let config = ClientConfig::builder()
            .base_url("http://svc")
            .api_key("mbd-test-token")
            .retry_policy(RetryPolicy::none())
            .build()
            .unwrap();
        EmbedClient::with_transport(config, transport)
    }

    #[tokio::test]
    async fn test_call_applies_schema_defaults() {
        let transport = ScriptedTransport::new(vec![Step::Status(200, r#"{"items":[]}"#)]);
        let client = client(transport.clone());

        let resp = client
            .call(names::FEED_TRENDING, json!({}))
            .await
            .unwrap();

        assert_eq!(resp, json!({"items": []}));
        let sent = transport.requests();
        let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"top_k": 25}));
    }

    #[tokio::test]
    async fn test_unknown_endpoint() {
        let transport = ScriptedTransport::new(vec![Step::Status(200, "{}")]);
        let client = client(transport.clone());

        let err = client.call("feed.nope", json!({})).await.unwrap_err();

        assert!(matches!(err, Error::UnknownEndpoint { .. }));
        assert_eq!(transport.attempts(), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let transport = ScriptedTransport::new(vec![Step::Status(200, "{}")]);
        let client = client(transport.clone());

        let err = client
            .call(names::USERS_LABELS, json!({"users_list": [], "label_category": "nope"}))
            .await
            .unwrap_err();

        match err {
            Error::Validation(v) => assert_eq!(v.violations().len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.attempts(), 0);
    }

    #[tokio::test]
    async fn test_debug_masks_token() {
        let client = client(ScriptedTransport::new(vec![Step::Status(200, "{}")]));
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("mbd-test-token"));
    }
}

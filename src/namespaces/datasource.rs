//! Ingestion into custom datasources

use crate::client::EmbedClient;
use crate::error::Result;
use crate::registry::names;
use crate::types::{IngestItem, IngestResponse};
use serde::Serialize;

/// Custom datasource ingestion
pub struct DatasourceApi<'a> {
    client: &'a EmbedClient,
}

#[derive(Serialize)]
struct IngestRequest<'i> {
    items: &'i [IngestItem],
}

impl<'a> DatasourceApi<'a> {
    pub(crate) fn new(client: &'a EmbedClient) -> Self {
        Self { client }
    }

    /// Push between 1 and 100 items.
    ///
    /// Every `item_id` must be a composite `protocol.localId` identifier;
    /// one malformed id rejects the whole batch before anything is sent.
    pub async fn ingest_items(&self, items: &[IngestItem]) -> Result<IngestResponse> {
        self.client
            .send(names::DATASOURCE_INGEST, &IngestRequest { items })
            .await
    }
}

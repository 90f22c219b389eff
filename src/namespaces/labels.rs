//! AI labels for free text

use super::to_strings;
use crate::client::EmbedClient;
use crate::error::Result;
use crate::labels::LabelCategory;
use crate::registry::names;
use crate::types::{LabelsRequest, TextLabelsResponse};

/// Labels for free text
pub struct LabelsApi<'a> {
    client: &'a EmbedClient,
}

impl<'a> LabelsApi<'a> {
    pub(crate) fn new(client: &'a EmbedClient) -> Self {
        Self { client }
    }

    /// Label up to 100 texts; results come back in input order
    pub async fn for_text<I, S>(
        &self,
        texts: I,
        category: Option<LabelCategory>,
    ) -> Result<TextLabelsResponse>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = LabelsRequest::new("text_inputs", to_strings(texts), category);
        self.client.send(names::LABELS_FOR_TEXT, &request).await
    }
}

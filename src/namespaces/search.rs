//! Semantic search, similarity and AI labels for users and posts

use super::to_strings;
use crate::client::EmbedClient;
use crate::error::Result;
use crate::labels::LabelCategory;
use crate::registry::names;
use crate::types::{
    FeedResponse, LabelsRequest, PostLabelsResponse, PostSearchOptions, PostSearchResponse,
    TopUsersOptions, TopUsersResponse, UserLabelsResponse, UserSearchResponse,
};
use serde_json::{json, Value};

/// Semantic search, similarity and labels, split by entity
pub struct SearchApi<'a> {
    client: &'a EmbedClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a EmbedClient) -> Self {
        Self { client }
    }

    pub fn users(&self) -> UserSearchApi<'a> {
        UserSearchApi {
            client: self.client,
        }
    }

    pub fn posts(&self) -> PostSearchApi<'a> {
        PostSearchApi {
            client: self.client,
        }
    }
}

pub struct UserSearchApi<'a> {
    client: &'a EmbedClient,
}

impl UserSearchApi<'_> {
    pub async fn by_query(&self, query: &str, top_k: Option<u32>) -> Result<UserSearchResponse> {
        self.client
            .send(
                names::USERS_SEMANTIC,
                &json!({ "query": query, "top_k": top_k }),
            )
            .await
    }

    /// Users similar to `user_id`
    pub async fn similar(&self, user_id: &str, top_k: Option<u32>) -> Result<UserSearchResponse> {
        self.client
            .send(
                names::USERS_SIMILAR,
                &json!({ "user_id": user_id, "top_k": top_k }),
            )
            .await
    }

    /// AI labels of up to 100 users; `category` defaults to all
    pub async fn get_labels<I, S>(
        &self,
        user_ids: I,
        category: Option<LabelCategory>,
    ) -> Result<UserLabelsResponse>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = LabelsRequest::new("users_list", to_strings(user_ids), category);
        self.client.send(names::USERS_LABELS, &request).await
    }

    pub async fn top_by_label(
        &self,
        label: &str,
        options: TopUsersOptions,
    ) -> Result<TopUsersResponse> {
        let mut params = serde_json::to_value(&options)?;
        params["label"] = Value::from(label);
        self.client.send(names::USERS_TOP_BY_LABEL, &params).await
    }
}

pub struct PostSearchApi<'a> {
    client: &'a EmbedClient,
}

impl PostSearchApi<'_> {
    pub async fn by_query(
        &self,
        query: &str,
        options: PostSearchOptions,
    ) -> Result<PostSearchResponse> {
        let mut params = serde_json::to_value(&options)?;
        params["query"] = Value::from(query);
        self.client.send(names::POSTS_SEMANTIC, &params).await
    }

    /// Posts similar to `item_id`
    pub async fn similar(&self, item_id: &str, top_k: Option<u32>) -> Result<FeedResponse> {
        self.client
            .send(
                names::POSTS_SIMILAR,
                &json!({ "item_id": item_id, "top_k": top_k }),
            )
            .await
    }

    /// AI labels of up to 100 posts; `category` defaults to all
    pub async fn get_labels<I, S>(
        &self,
        item_ids: I,
        category: Option<LabelCategory>,
    ) -> Result<PostLabelsResponse>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = LabelsRequest::new("items_list", to_strings(item_ids), category);
        self.client.send(names::POSTS_LABELS, &request).await
    }

    pub async fn top_by_label(&self, label: &str, top_k: Option<u32>) -> Result<FeedResponse> {
        self.client
            .send(
                names::POSTS_TOP_BY_LABEL,
                &json!({ "label": label, "top_k": top_k }),
            )
            .await
    }
}

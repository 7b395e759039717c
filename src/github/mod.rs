mod client;

pub use client::GithubClient;

use crate::contributions::model::Member;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The slice of the GitHub API the contributions aggregator needs.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Opaque GraphQL node id of the organization.
    async fn organization_node_id(&self, org: &str) -> Result<String>;

    /// Every member of the organization, across all pages.
    async fn list_members(&self, org: &str) -> Result<Vec<Member>>;

    /// Executes a GraphQL document and returns its `data` object.
    async fn graphql(&self, document: &str) -> Result<Value>;
}

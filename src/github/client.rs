use crate::contributions::model::Member;
use crate::error::{GhcontribError, Result};
use crate::github::GithubApi;
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, trace};

const MEMBERS_PER_PAGE: usize = 100;

pub struct GithubClient {
    octocrab: Octocrab,
}

#[derive(Debug, Deserialize)]
struct OrgInfo {
    node_id: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GithubClient {
    pub fn new(token: &str, base_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(url) = base_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| GhcontribError::Config(format!("Invalid base URL {url}: {e}")))?;
        }
        let octocrab = builder
            .build()
            .map_err(|e| GhcontribError::GitHub(e.to_string()))?;
        Ok(Self { octocrab })
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn organization_node_id(&self, org: &str) -> Result<String> {
        let info: OrgInfo = match self.octocrab.get(format!("/orgs/{org}"), None::<&()>).await {
            Ok(info) => info,
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                return Err(GhcontribError::OrgNotFound(org.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!(org, node_id = %info.node_id, "resolved organization");
        Ok(info.node_id)
    }

    async fn list_members(&self, org: &str) -> Result<Vec<Member>> {
        let route = format!("/orgs/{org}/members");
        let per_page = MEMBERS_PER_PAGE.to_string();
        let mut all_members = Vec::new();
        let mut page = 1u32;
        loop {
            let page_param = page.to_string();
            let members: Vec<Member> = self
                .octocrab
                .get(
                    &route,
                    Some(&[("per_page", per_page.as_str()), ("page", page_param.as_str())]),
                )
                .await?;
            trace!(org, page, count = members.len(), "fetched members page");
            let is_last_page = members.len() < MEMBERS_PER_PAGE;
            all_members.extend(members);
            if is_last_page {
                break;
            }
            page += 1;
        }
        Ok(all_members)
    }

    async fn graphql(&self, document: &str) -> Result<Value> {
        // Raw envelope so `errors` can be reported alongside `data`.
        let mut response: Value = self
            .octocrab
            .post("/graphql", Some(&json!({ "query": document })))
            .await?;

        if let Some(errors) = response.get("errors").filter(|e| !e.is_null()) {
            let errors: Vec<GraphQlError> = serde_json::from_value(errors.clone())?;
            if !errors.is_empty() {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                return Err(GhcontribError::GraphQl(messages.join("; ")));
            }
        }

        match response.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(GhcontribError::GraphQl("response carried no data".into())),
        }
    }
}

use crate::config::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::contributions::model::{
    sort_by_total, ContributionSummary, ContributionsCollection, ContributionsResponse,
    ReviewBreakdown, ReviewEdge,
};
use crate::contributions::query::{contributions_query, DateRange, QueryVars};
use crate::error::{GhcontribError, Result};
use crate::github::GithubApi;
use crate::progress::Progress;
use tracing::{debug, info, instrument};

/// Builds one `ContributionSummary` per organization member.
pub struct Aggregator<'a> {
    api: &'a dyn GithubApi,
    progress: &'a dyn Progress,
    page_size: u32,
    max_pages: u32,
    range: Option<DateRange>,
}

impl<'a> Aggregator<'a> {
    pub fn new(api: &'a dyn GithubApi, progress: &'a dyn Progress) -> Self {
        Self {
            api,
            progress,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            range: None,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn range(mut self, range: Option<DateRange>) -> Self {
        self.range = range;
        self
    }

    /// Summaries for every member of `org`, highest `total` first. Any failed
    /// request aborts the whole run.
    #[instrument(skip(self))]
    pub async fn aggregate(&self, org: &str) -> Result<Vec<ContributionSummary>> {
        let organization_id = self.api.organization_node_id(org).await?;

        debug!("getting github contributions for {org} users");
        let members = self.api.list_members(org).await?;
        debug!("{org} has a total of {} users", members.len());
        self.progress.organization(org, members.len());

        let mut summaries = Vec::with_capacity(members.len());
        for member in &members {
            debug!("getting contributions for user {}", member.login);
            self.progress.member(&member.login);
            summaries.push(self.member_summary(&member.login, &organization_id).await?);
        }
        self.progress.finish();

        sort_by_total(&mut summaries);
        info!(org, members = summaries.len(), "contributions aggregated");
        Ok(summaries)
    }

    async fn member_summary(
        &self,
        login: &str,
        organization_id: &str,
    ) -> Result<ContributionSummary> {
        let mut cursor = String::new();
        let mut edges: Vec<ReviewEdge> = Vec::new();
        let mut pages = 0u32;

        let last = loop {
            if pages == self.max_pages {
                return Err(GhcontribError::PageLimitExceeded {
                    login: login.to_string(),
                    pages,
                });
            }
            let mut collection = self.fetch_page(login, organization_id, &cursor).await?;
            pages += 1;

            let connection = &mut collection.pull_request_review_contributions;
            let page_info = connection.page_info.clone();
            // Only this page's edges may stand in for a missing end cursor.
            let page_last_cursor = connection
                .edges
                .iter()
                .flatten()
                .last()
                .map(|edge| edge.cursor.clone());
            edges.extend(connection.edges.drain(..).flatten());

            if !page_info.has_next_page {
                break collection;
            }
            cursor = page_info
                .end_cursor
                .or(page_last_cursor)
                .ok_or_else(|| GhcontribError::MissingCursor(login.to_string()))?;
        };

        let reviews = ReviewBreakdown::tally(login, &edges)?;
        debug!(
            login,
            pages,
            edges = edges.len(),
            reviews = reviews.sum(),
            "tallied review contributions"
        );
        Ok(ContributionSummary::new(last.user.login, last.counts, reviews))
    }

    async fn fetch_page(
        &self,
        login: &str,
        organization_id: &str,
        cursor: &str,
    ) -> Result<ContributionsCollection> {
        let document = contributions_query(&QueryVars {
            login,
            organization_id,
            size: self.page_size,
            cursor,
            range: self.range.as_ref(),
        })?;
        let data = self.api.graphql(&document).await?;
        let response: ContributionsResponse = serde_json::from_value(data)?;
        response
            .user
            .map(|user| user.contributions_collection)
            .ok_or_else(|| GhcontribError::GraphQl(format!("no user with login {login}")))
    }
}

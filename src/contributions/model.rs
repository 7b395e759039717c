//! Contribution records and the GraphQL response shapes they are built from.

use crate::error::{GhcontribError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    pub login: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Approved,
    Dismissed,
    ChangesRequested,
    Commented,
}

impl FromStr for ReviewState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "APPROVED" => Ok(ReviewState::Approved),
            "DISMISSED" => Ok(ReviewState::Dismissed),
            "CHANGES_REQUESTED" => Ok(ReviewState::ChangesRequested),
            "COMMENTED" => Ok(ReviewState::Commented),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributionsResponse {
    pub user: Option<UserContributions>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContributions {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub user: UserRef,
    #[serde(flatten)]
    pub counts: ContributionCounts,
    pub pull_request_review_contributions: ReviewConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewConnection {
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<Option<ReviewEdge>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewEdge {
    pub cursor: String,
    pub node: Option<ReviewNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewNode {
    pub pull_request_review: Option<Review>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub state: String,
}

impl ReviewEdge {
    /// Raw state string, if the review is visible to the token.
    pub fn state(&self) -> Option<&str> {
        self.node
            .as_ref()
            .and_then(|node| node.pull_request_review.as_ref())
            .map(|review| review.state.as_str())
    }
}

/// Headline totals of a contributions collection. These are scalars for the
/// whole collection, so every page of the review connection repeats them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCounts {
    pub total_commit_contributions: u64,
    pub total_issue_contributions: u64,
    pub total_pull_request_contributions: u64,
    pub total_pull_request_review_contributions: u64,
}

impl ContributionCounts {
    pub fn total(&self) -> u64 {
        self.total_commit_contributions
            + self.total_issue_contributions
            + self.total_pull_request_contributions
            + self.total_pull_request_review_contributions
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewBreakdown {
    pub approved: u64,
    pub dismissed: u64,
    pub changes_requested: u64,
    pub commented: u64,
}

impl ReviewBreakdown {
    pub fn record(&mut self, state: ReviewState) {
        match state {
            ReviewState::Approved => self.approved += 1,
            ReviewState::Dismissed => self.dismissed += 1,
            ReviewState::ChangesRequested => self.changes_requested += 1,
            ReviewState::Commented => self.commented += 1,
        }
    }

    /// Counts review states across `edges`. Null edges and reviews hidden from
    /// the token are skipped; an unrecognised state fails the whole tally.
    pub fn tally<'a, I>(login: &str, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ReviewEdge>,
    {
        let mut breakdown = Self::default();
        for raw in edges.into_iter().filter_map(ReviewEdge::state) {
            let state = raw
                .parse::<ReviewState>()
                .map_err(|state| GhcontribError::UnknownReviewState {
                    login: login.to_string(),
                    state,
                })?;
            breakdown.record(state);
        }
        Ok(breakdown)
    }

    pub fn sum(&self) -> u64 {
        self.approved + self.dismissed + self.changes_requested + self.commented
    }
}

/// One row of the contributions report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionSummary {
    pub login: String,
    #[serde(rename = "totalCommitContributions")]
    pub total_commit_contributions: u64,
    #[serde(rename = "totalIssueContributions")]
    pub total_issue_contributions: u64,
    #[serde(rename = "totalPullRequestContributions")]
    pub total_pull_request_contributions: u64,
    #[serde(rename = "totalPullRequestReviewContributions")]
    pub total_pull_request_review_contributions: u64,
    pub total: u64,
    #[serde(rename = "totalPullRequestReviewContributions_Approved")]
    pub reviews_approved: u64,
    #[serde(rename = "totalPullRequestReviewContributions_Dismissed")]
    pub reviews_dismissed: u64,
    #[serde(rename = "totalPullRequestReviewContributions_Changes_Requested")]
    pub reviews_changes_requested: u64,
    #[serde(rename = "totalPullRequestReviewContributions_Commented")]
    pub reviews_commented: u64,
}

impl ContributionSummary {
    pub const HEADERS: [&'static str; 10] = [
        "login",
        "totalCommitContributions",
        "totalIssueContributions",
        "totalPullRequestContributions",
        "totalPullRequestReviewContributions",
        "total",
        "totalPullRequestReviewContributions_Approved",
        "totalPullRequestReviewContributions_Dismissed",
        "totalPullRequestReviewContributions_Changes_Requested",
        "totalPullRequestReviewContributions_Commented",
    ];

    pub fn new(login: String, counts: ContributionCounts, reviews: ReviewBreakdown) -> Self {
        Self {
            login,
            total_commit_contributions: counts.total_commit_contributions,
            total_issue_contributions: counts.total_issue_contributions,
            total_pull_request_contributions: counts.total_pull_request_contributions,
            total_pull_request_review_contributions: counts.total_pull_request_review_contributions,
            total: counts.total(),
            reviews_approved: reviews.approved,
            reviews_dismissed: reviews.dismissed,
            reviews_changes_requested: reviews.changes_requested,
            reviews_commented: reviews.commented,
        }
    }
}

/// Orders summaries by `total`, highest first. `sort_by` is stable, so members
/// with equal totals stay in the order they were enumerated.
pub fn sort_by_total(summaries: &mut [ContributionSummary]) {
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
}

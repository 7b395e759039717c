//! GraphQL documents for the contributions collection, rendered from
//! `$placeholder` templates.

use crate::error::{GhcontribError, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub const CONTRIBUTIONS_QUERY: &str = r#"
    {
        user(login: "$login") {
            contributionsCollection(organizationID: "$organizationID"$range) {
                user {
                    login
                }
                totalCommitContributions
                totalIssueContributions
                totalPullRequestContributions
                totalPullRequestReviewContributions
                pullRequestReviewContributions(first: $size, after: "$cursor") {
                    totalCount
                    pageInfo {
                        endCursor
                        hasNextPage
                    }
                    edges {
                        cursor
                        node {
                            pullRequestReview {
                                state
                            }
                        }
                    }
                }
            }
        }
    }
"#;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$|[A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern"));

/// Collapses every run of whitespace to a single space.
pub fn sanitize(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Substitutes `$name` placeholders from `variables`. `$$` is a literal `$`.
pub fn render(template: &str, variables: &HashMap<&str, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let name = &caps[1];
        out.push_str(&template[last..whole.start()]);
        if name == "$" {
            out.push('$');
        } else {
            let value = variables.get(name).ok_or_else(|| {
                GhcontribError::Template(format!("no value for placeholder ${name}"))
            })?;
            out.push_str(value);
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Window passed as `from`/`to` to `contributionsCollection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    fn argument(range: Option<&DateRange>) -> String {
        match range {
            Some(r) => format!(
                ", from: \"{}\", to: \"{}\"",
                r.from.format("%Y-%m-%dT%H:%M:%SZ"),
                r.to.format("%Y-%m-%dT%H:%M:%SZ")
            ),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryVars<'a> {
    pub login: &'a str,
    pub organization_id: &'a str,
    pub size: u32,
    pub cursor: &'a str,
    pub range: Option<&'a DateRange>,
}

pub fn contributions_query(vars: &QueryVars<'_>) -> Result<String> {
    let variables = HashMap::from([
        ("login", vars.login.to_string()),
        ("organizationID", vars.organization_id.to_string()),
        ("size", vars.size.to_string()),
        ("cursor", vars.cursor.to_string()),
        ("range", DateRange::argument(vars.range)),
    ]);
    render(&sanitize(CONTRIBUTIONS_QUERY), &variables)
}

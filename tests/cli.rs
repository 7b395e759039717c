use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ghcontrib(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ghcontrib").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("GH_ORG")
        .env_remove("GH_TOKEN_PSW")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn contributions_page(login: &str, states: &[&str], counts: [u64; 4], next: Option<&str>) -> Value {
    let edges: Vec<Value> = states
        .iter()
        .enumerate()
        .map(|(i, state)| {
            json!({
                "cursor": format!("{login}:{i}"),
                "node": { "pullRequestReview": { "state": state } }
            })
        })
        .collect();
    json!({
        "data": {
            "user": {
                "contributionsCollection": {
                    "user": { "login": login },
                    "totalCommitContributions": counts[0],
                    "totalIssueContributions": counts[1],
                    "totalPullRequestContributions": counts[2],
                    "totalPullRequestReviewContributions": counts[3],
                    "pullRequestReviewContributions": {
                        "totalCount": states.len(),
                        "pageInfo": { "endCursor": next, "hasNextPage": next.is_some() },
                        "edges": edges
                    }
                }
            }
        }
    })
}

#[test]
fn help_shows_all_commands() {
    let home = tempfile::tempdir().unwrap();
    ghcontrib(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("contributions"))
        .stdout(predicate::str::contains("members"));
}

#[test]
fn version_flag() {
    let home = tempfile::tempdir().unwrap();
    ghcontrib(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ghcontrib"));
}

#[test]
fn contributions_help_shows_options() {
    let home = tempfile::tempdir().unwrap();
    ghcontrib(home.path())
        .args(["contributions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--org"))
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--max-pages"));
}

#[test]
fn no_subcommand_shows_help() {
    let home = tempfile::tempdir().unwrap();
    ghcontrib(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn contributions_without_org_fails() {
    let home = tempfile::tempdir().unwrap();
    ghcontrib(home.path())
        .env("GH_TOKEN_PSW", "ghp_test")
        .arg("contributions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No organization given"));
}

#[test]
fn contributions_without_token_fails() {
    let home = tempfile::tempdir().unwrap();
    ghcontrib(home.path())
        .args(["contributions", "--org", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not authenticated"));
}

#[test]
fn failed_run_reports_the_error_once() {
    let home = tempfile::tempdir().unwrap();
    ghcontrib(home.path())
        .args(["contributions", "--org", "acme"])
        .assert()
        .failure()
        .stderr(predicate::function(|stderr: &str| {
            stderr.matches("Not authenticated").count() == 1
        }))
        .stderr(predicate::str::contains("run failed").not());
}

#[test]
fn from_without_to_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    ghcontrib(home.path())
        .args(["contributions", "--org", "acme", "--from", "2022-06-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn contributions_writes_sorted_reports() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "acme",
            "id": 1,
            "node_id": "O_kgDOacme"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "bob", "id": 2 },
            { "login": "alice", "id": 1 }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contributions_page(
            "alice",
            &["APPROVED", "APPROVED", "COMMENTED"],
            [3, 1, 2, 3],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contributions_page(
            "bob",
            &[],
            [0, 0, 0, 1],
            Some("Ym9iOjE"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("Ym9iOjE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(contributions_page(
            "bob",
            &["DISMISSED"],
            [0, 0, 0, 1],
            None,
        )))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    ghcontrib(home.path())
        .env("GH_TOKEN_PSW", "ghp_test")
        .env("GH_BASE_URL", server.uri())
        .args(["contributions", "--org", "acme", "--no-progress", "--dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("contributions report written to"));

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(out.path().join("contributions.json"))?)?;
    let rows = report.as_array().expect("report is an array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["login"], "alice");
    assert_eq!(rows[0]["total"], 9);
    assert_eq!(rows[0]["totalPullRequestReviewContributions_Approved"], 2);
    assert_eq!(rows[0]["totalPullRequestReviewContributions_Commented"], 1);
    assert_eq!(rows[1]["login"], "bob");
    assert_eq!(rows[1]["total"], 1);
    assert_eq!(rows[1]["totalPullRequestReviewContributions_Dismissed"], 1);

    let csv = std::fs::read_to_string(out.path().join("contributions.csv"))?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("login,totalCommitContributions"));
    assert_eq!(lines[1], "alice,3,1,2,3,9,2,0,0,1");
    assert_eq!(lines[2], "bob,0,0,0,1,1,0,1,0,0");

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn graphql_error_fails_without_reports() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "node_id": "O_1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/members"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "login": "ghost", "id": 9 }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Could not resolve to a User with the login of 'ghost'." }]
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    ghcontrib(home.path())
        .env("GH_TOKEN_PSW", "ghp_test")
        .env("GH_BASE_URL", server.uri())
        .args(["contributions", "--org", "acme", "--no-progress", "--dir"])
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "GraphQL error: Could not resolve to a User",
        ));

    assert!(!out.path().join("contributions.json").exists());
    assert!(!out.path().join("contributions.csv").exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn members_lists_logins_as_json() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/acme/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "alice", "id": 1 },
            { "login": "bob", "id": 2 }
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir()?;
    let output = ghcontrib(home.path())
        .env("GH_TOKEN_PSW", "ghp_test")
        .env("GH_BASE_URL", server.uri())
        .env("GH_ORG", "acme")
        .args(["members", "--json"])
        .output()?;
    assert!(output.status.success());

    let members: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(members, json!([{ "login": "alice" }, { "login": "bob" }]));
    Ok(())
}

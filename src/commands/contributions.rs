use crate::commands::connect;
use crate::config::load_config;
use crate::contributions::model::ContributionSummary;
use crate::contributions::{Aggregator, DateRange};
use crate::display;
use crate::error::{GhcontribError, Result};
use crate::progress::{Progress, ProgressBarReporter, Silent};
use crate::report;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use owo_colors::OwoColorize;
use std::path::PathBuf;

const TABLE_ROWS: usize = 20;

pub struct Options {
    pub org: Option<String>,
    pub output: String,
    pub dir: Option<PathBuf>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page_size: Option<u32>,
    pub max_pages: Option<u32>,
    pub json: bool,
    pub no_progress: bool,
}

pub async fn run(opts: &Options) -> Result<()> {
    let config = load_config()?;
    let org = config.resolve_org(&opts.org)?;
    let range = parse_range(opts.from.as_deref(), opts.to.as_deref())?;
    let page_size = config.page_size(opts.page_size)?;
    let max_pages = config.max_pages(opts.max_pages)?;
    let dir = config.output_dir(&opts.dir);
    let client = connect(&config)?;

    if !opts.json {
        println!("Getting user contribution data for {org} ...");
    }

    let progress: Box<dyn Progress> = if opts.no_progress || opts.json {
        Box::new(Silent)
    } else {
        Box::new(ProgressBarReporter::new())
    };

    let summaries = Aggregator::new(&client, progress.as_ref())
        .page_size(page_size)
        .max_pages(max_pages)
        .range(range)
        .aggregate(&org)
        .await?;

    let json_path = report::write_json(&dir, &opts.output, &summaries)?;
    let csv_path = report::write_csv(&dir, &opts.output, &summaries)?;

    display::output(opts.json, summaries.as_slice(), |data| {
        display::success(&format!(
            "{} report written to {}",
            opts.output,
            json_path.display()
        ));
        display::success(&format!(
            "{} report written to {}",
            opts.output,
            csv_path.display()
        ));
        render_contributors(&org, data);
    });

    Ok(())
}

fn parse_date(value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        GhcontribError::Config(format!(
            "Invalid date {value:?}; expected YYYY-MM-DD or RFC 3339"
        ))
    })?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|t| t.and_utc())
        .ok_or_else(|| GhcontribError::Config(format!("Invalid date {value:?}")))
}

/// GitHub rejects contribution windows longer than a year.
fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<Option<DateRange>> {
    let (from, to) = match (from, to) {
        (None, None) => return Ok(None),
        (Some(from), Some(to)) => (parse_date(from, false)?, parse_date(to, true)?),
        _ => {
            return Err(GhcontribError::Config(
                "--from and --to must be given together".into(),
            ))
        }
    };
    if to <= from {
        return Err(GhcontribError::Config(
            "--to must be later than --from".into(),
        ));
    }
    if to - from > Duration::days(366) {
        return Err(GhcontribError::Config(
            "contribution window cannot exceed one year".into(),
        ));
    }
    Ok(Some(DateRange { from, to }))
}

fn render_contributors(org: &str, summaries: &[ContributionSummary]) {
    if summaries.is_empty() {
        display::warn(&format!("No members found in {org}."));
        return;
    }

    display::heading(&format!("Top contributors in {org}"));

    let mut table = display::counts_table(
        &[
            "Login", "Total", "Commits", "Issues", "PRs", "Reviews", "Approved", "Changes",
            "Commented", "Dismissed",
        ],
        1,
    );
    for s in summaries.iter().take(TABLE_ROWS) {
        table.add_row(vec![
            s.login.clone(),
            s.total.to_string(),
            s.total_commit_contributions.to_string(),
            s.total_issue_contributions.to_string(),
            s.total_pull_request_contributions.to_string(),
            s.total_pull_request_review_contributions.to_string(),
            s.reviews_approved.to_string(),
            s.reviews_changes_requested.to_string(),
            s.reviews_commented.to_string(),
            s.reviews_dismissed.to_string(),
        ]);
    }
    println!("{table}");

    if summaries.len() > TABLE_ROWS {
        println!(
            "  {} more member(s) in the report.",
            (summaries.len() - TABLE_ROWS).bold()
        );
    }
    println!("\n{} member(s) processed.", summaries.len());
}

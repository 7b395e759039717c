use crate::commands::connect;
use crate::config::load_config;
use crate::contributions::model::Member;
use crate::display;
use crate::error::Result;
use crate::github::GithubApi;

pub async fn run(org: &Option<String>, json: bool) -> Result<()> {
    let config = load_config()?;
    let org = config.resolve_org(org)?;
    let client = connect(&config)?;

    let members = client.list_members(&org).await?;

    display::output(json, members.as_slice(), |data| {
        render_members(&org, data);
    });

    Ok(())
}

fn render_members(org: &str, members: &[Member]) {
    if members.is_empty() {
        display::warn(&format!("{org} has no visible members."));
        return;
    }

    display::heading(&format!("Members of {org}"));
    for member in members {
        println!("  {}", member.login);
    }
    println!("\n{} member(s) found.", members.len());
}

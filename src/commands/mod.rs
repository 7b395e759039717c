pub mod contributions;
pub mod members;

use crate::config::Config;
use crate::error::Result;
use crate::github::GithubClient;

pub fn connect(config: &Config) -> Result<GithubClient> {
    let token = config.token()?;
    GithubClient::new(&token, config.base_url().as_deref())
}

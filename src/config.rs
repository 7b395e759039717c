use crate::error::{GhcontribError, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 1000;

const TOKEN_VARS: [&str; 2] = ["GH_TOKEN_PSW", "GITHUB_TOKEN"];

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DefaultsConfig {
    pub org: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub page_size: Option<u32>,
    pub max_pages: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GithubConfig {
    pub base_url: Option<String>,
}

impl Config {
    /// Token from the environment first, then the config file.
    pub fn token(&self) -> Result<String> {
        TOKEN_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .or_else(|| self.auth.token.clone())
            .map(|token| token.trim().to_string())
            .ok_or(GhcontribError::NotAuthenticated)
    }

    pub fn base_url(&self) -> Option<String> {
        std::env::var("GH_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.github.base_url.clone())
    }

    pub fn resolve_org(&self, org_flag: &Option<String>) -> Result<String> {
        org_flag
            .clone()
            .or_else(|| self.defaults.org.clone())
            .filter(|org| !org.trim().is_empty())
            .ok_or_else(|| {
                GhcontribError::Config(
                    "No organization given. Pass --org, set GH_ORG, or set defaults.org".into(),
                )
            })
    }

    pub fn page_size(&self, flag: Option<u32>) -> Result<u32> {
        let size = flag
            .or(self.defaults.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=100).contains(&size) {
            return Err(GhcontribError::Config(format!(
                "page size must be between 1 and 100, got {size}"
            )));
        }
        Ok(size)
    }

    pub fn max_pages(&self, flag: Option<u32>) -> Result<u32> {
        let pages = flag
            .or(self.defaults.max_pages)
            .unwrap_or(DEFAULT_MAX_PAGES);
        if pages == 0 {
            return Err(GhcontribError::Config("max pages must be at least 1".into()));
        }
        Ok(pages)
    }

    pub fn output_dir(&self, flag: &Option<PathBuf>) -> PathBuf {
        flag.clone()
            .or_else(|| self.defaults.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn config_path() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("ghcontrib").join("config.toml");
        return Ok(path);
    }

    let home = dirs::home_dir()
        .ok_or_else(|| GhcontribError::Config("Cannot find home directory".into()))?;
    Ok(home.join(".config").join("ghcontrib").join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_all_sections() {
        let config: Config = toml::from_str(
            r#"
            [auth]
            token = "ghp_test123"

            [defaults]
            org = "edgexfoundry"
            output_dir = "reports"
            page_size = 50
            max_pages = 20

            [github]
            base_url = "https://github.example.com/api/v3"
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.token.as_deref(), Some("ghp_test123"));
        assert_eq!(config.defaults.org.as_deref(), Some("edgexfoundry"));
        assert_eq!(config.output_dir(&None), PathBuf::from("reports"));
        assert_eq!(config.page_size(None).unwrap(), 50);
        assert_eq!(config.max_pages(None).unwrap(), 20);
        assert_eq!(
            config.github.base_url.as_deref(),
            Some("https://github.example.com/api/v3")
        );
    }

    #[test]
    fn config_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.auth.token.is_none());
        assert!(config.defaults.org.is_none());
        assert_eq!(config.page_size(None).unwrap(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.max_pages(None).unwrap(), DEFAULT_MAX_PAGES);
        assert_eq!(config.output_dir(&None), PathBuf::from("."));
    }

    #[test]
    fn org_flag_wins_over_defaults() {
        let config = Config {
            defaults: DefaultsConfig {
                org: Some("from-config".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.resolve_org(&Some("cli".into())).unwrap(), "cli");
        assert_eq!(config.resolve_org(&None).unwrap(), "from-config");
    }

    #[test]
    fn missing_org_is_config_error() {
        let config = Config::default();
        assert!(matches!(
            config.resolve_org(&None),
            Err(GhcontribError::Config(_))
        ));
    }

    #[test]
    fn page_size_out_of_range_rejected() {
        let config = Config::default();
        assert!(config.page_size(Some(0)).is_err());
        assert!(config.page_size(Some(101)).is_err());
        assert_eq!(config.page_size(Some(25)).unwrap(), 25);
    }

    #[test]
    fn zero_max_pages_rejected() {
        let config = Config::default();
        assert!(config.max_pages(Some(0)).is_err());
    }

    #[test]
    fn config_path_uses_xdg() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/test_xdg");
        let path = config_path().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/test_xdg/ghcontrib/config.toml"));
        std::env::remove_var("XDG_CONFIG_HOME");
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhcontribError {
    #[error("Not authenticated. Set GH_TOKEN_PSW or add a token to the config file.")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Organization not found: {0}")]
    OrgNotFound(String),

    #[error("Unknown pull request review state {state:?} for user {login}")]
    UnknownReviewState { login: String, state: String },

    #[error("Gave up on review contributions for user {login} after {pages} pages")]
    PageLimitExceeded { login: String, pages: u32 },

    #[error("Response for user {0} signalled another page but carried no end cursor")]
    MissingCursor(String),

    #[error("Query template error: {0}")]
    Template(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}

impl From<octocrab::Error> for GhcontribError {
    fn from(err: octocrab::Error) -> Self {
        GhcontribError::GitHub(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GhcontribError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaxError {
    #[error("not initialized: run 'laxhq init'")]
    NotInitialized,

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("member already exists: {0}")]
    MemberExists(String),

    #[error("team not found: {0}")]
    TeamNotFound(String),

    #[error("team already exists: {0}")]
    TeamExists(String),

    #[error("club not found: {0}")]
    ClubNotFound(String),

    #[error("club already exists: {0}")]
    ClubExists(String),

    #[error("entitlement not found: {0}")]
    EntitlementNotFound(String),

    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("invalid id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidId(String),

    #[error("invalid team role: {0}")]
    InvalidRole(String),

    #[error("invalid capability: {0}")]
    InvalidCapability(String),

    #[error("'{member}' is already on team '{team}'")]
    AlreadyOnRoster { member: String, team: String },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("sync failed: {0}")]
    Sync(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, LaxError>;

use crate::error::{LaxError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const LAXHQ_DIR: &str = ".laxhq";
pub const MEMBERS_DIR: &str = ".laxhq/members";
pub const TEAMS_DIR: &str = ".laxhq/teams";
pub const CLUBS_DIR: &str = ".laxhq/clubs";

pub const CATALOG_FILE: &str = ".laxhq/catalog.yaml";
pub const ENTITLEMENTS_FILE: &str = ".laxhq/entitlements.yaml";
pub const PARENTS_FILE: &str = ".laxhq/parents.yaml";
pub const SYNC_LOG_FILE: &str = ".laxhq/sync-log.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn laxhq_dir(root: &Path) -> PathBuf {
    root.join(LAXHQ_DIR)
}

pub fn member_file(root: &Path, id: &str) -> PathBuf {
    root.join(MEMBERS_DIR).join(format!("{id}.yaml"))
}

pub fn team_file(root: &Path, id: &str) -> PathBuf {
    root.join(TEAMS_DIR).join(format!("{id}.yaml"))
}

pub fn club_file(root: &Path, id: &str) -> PathBuf {
    root.join(CLUBS_DIR).join(format!("{id}.yaml"))
}

pub fn catalog_file(root: &Path) -> PathBuf {
    root.join(CATALOG_FILE)
}

pub fn entitlements_file(root: &Path) -> PathBuf {
    root.join(ENTITLEMENTS_FILE)
}

pub fn parents_file(root: &Path) -> PathBuf {
    root.join(PARENTS_FILE)
}

pub fn sync_log_file(root: &Path) -> PathBuf {
    root.join(SYNC_LOG_FILE)
}

pub fn is_initialized(root: &Path) -> bool {
    laxhq_dir(root).is_dir()
}

pub fn require_initialized(root: &Path) -> Result<()> {
    if !is_initialized(root) {
        return Err(LaxError::NotInitialized);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

/// Validate a record id: lowercase alphanumeric segments joined by single
/// hyphens, e.g. `varsity-2027` or `jane-doe`.
pub fn validate_id(id: &str) -> Result<()> {
    let re = ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());
    if re.is_match(id) {
        Ok(())
    } else {
        Err(LaxError::InvalidId(id.to_string()))
    }
}

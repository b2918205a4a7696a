use crate::error::{LaxError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// WordPress user id this member was imported from, if any. Upsert key
    /// for the roster sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wordpress_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            display_name: None,
            wordpress_id: None,
            created_at: Utc::now(),
        }
    }

    /// Display label: display name when set, email otherwise.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, id: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let id = id.into();
        paths::validate_id(&id)?;

        let file = paths::member_file(root, &id);
        if file.exists() {
            return Err(LaxError::MemberExists(id));
        }

        let member = Self::new(id, email);
        member.save(root)?;
        Ok(member)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let file = paths::member_file(root, id);
        if !file.exists() {
            return Err(LaxError::MemberNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&file)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::member_file(root, &self.id), data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = root.join(paths::MEMBERS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut members = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "yaml") {
                let data = std::fs::read_to_string(&path)?;
                members.push(serde_yaml::from_str::<Member>(&data)?);
            }
        }
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(members)
    }

    pub fn find_by_wordpress_id(root: &Path, wp_id: u64) -> Result<Option<Self>> {
        Ok(Self::list(root)?
            .into_iter()
            .find(|m| m.wordpress_id == Some(wp_id)))
    }
}

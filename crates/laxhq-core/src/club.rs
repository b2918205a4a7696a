use crate::error::{LaxError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Club {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn create(root: &Path, id: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let id = id.into();
        paths::validate_id(&id)?;

        let file = paths::club_file(root, &id);
        if file.exists() {
            return Err(LaxError::ClubExists(id));
        }

        let club = Self::new(id, name);
        club.save(root)?;
        Ok(club)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let file = paths::club_file(root, id);
        if !file.exists() {
            return Err(LaxError::ClubNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&file)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::club_file(root, &self.id), data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = root.join(paths::CLUBS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut clubs = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "yaml") {
                let data = std::fs::read_to_string(&path)?;
                clubs.push(serde_yaml::from_str::<Club>(&data)?);
            }
        }
        clubs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(clubs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let created = Club::create(dir.path(), "riverside", "Riverside Lacrosse Club").unwrap();
        let loaded = Club::load(dir.path(), "riverside").unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn duplicate_rejected() {
        let dir = TempDir::new().unwrap();
        Club::create(dir.path(), "riverside", "Riverside").unwrap();
        assert!(matches!(
            Club::create(dir.path(), "riverside", "Riverside Again"),
            Err(LaxError::ClubExists(_))
        ));
    }
}

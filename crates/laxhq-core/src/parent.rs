use crate::error::Result;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ParentLink
// ---------------------------------------------------------------------------

/// A parent/child account link. Shareable products the parent holds flow to
/// the child as `parent`-kind capability sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentLink {
    pub parent: String,
    pub child: String,
    #[serde(default = "default_relationship")]
    pub relationship: String,
    pub linked_at: DateTime<Utc>,
}

fn default_relationship() -> String {
    "parent".to_string()
}

// ---------------------------------------------------------------------------
// ParentLinks
// ---------------------------------------------------------------------------

/// All parent/child links, persisted at `.laxhq/parents.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParentLinks {
    #[serde(default)]
    pub links: Vec<ParentLink>,
}

impl ParentLinks {
    pub fn load(root: &Path) -> Result<Self> {
        let file = paths::parents_file(root);
        if !file.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&file)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::parents_file(root), data.as_bytes())
    }

    /// Link a parent to a child. Re-linking an existing pair is a no-op.
    pub fn link(&mut self, parent: &str, child: &str, relationship: &str) -> bool {
        if self
            .links
            .iter()
            .any(|l| l.parent == parent && l.child == child)
        {
            return false;
        }
        self.links.push(ParentLink {
            parent: parent.to_string(),
            child: child.to_string(),
            relationship: relationship.to_string(),
            linked_at: Utc::now(),
        });
        true
    }

    /// Parents linked to the given child.
    pub fn parents_of<'a>(&'a self, child: &'a str) -> impl Iterator<Item = &'a ParentLink> {
        self.links.iter().filter(move |l| l.child == child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn link_and_query() {
        let mut links = ParentLinks::default();
        assert!(links.link("pat", "jane", "parent"));
        assert!(links.link("sam", "jane", "guardian"));
        assert!(links.link("pat", "timmy", "parent"));
        // Duplicate pair is a no-op
        assert!(!links.link("pat", "jane", "parent"));

        let parents: Vec<&str> = links.parents_of("jane").map(|l| l.parent.as_str()).collect();
        assert_eq!(parents, vec!["pat", "sam"]);
    }

    #[test]
    fn persistence_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut links = ParentLinks::default();
        links.link("pat", "jane", "parent");
        links.save(dir.path()).unwrap();

        let loaded = ParentLinks::load(dir.path()).unwrap();
        assert_eq!(loaded.links, links.links);
    }
}

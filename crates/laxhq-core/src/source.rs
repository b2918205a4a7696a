use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// SourceKind
// ---------------------------------------------------------------------------

/// Why a member holds a product: bought it, inherited it from a team roster
/// spot, received it through a club cascade, or shares a parent's purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Direct,
    Team,
    Club,
    Parent,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Direct => "direct",
            SourceKind::Team => "team",
            SourceKind::Club => "club",
            SourceKind::Parent => "parent",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntitlementSource
// ---------------------------------------------------------------------------

/// One reason a member holds a product. Read-only input to the capability
/// engine; assembled by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitlementSource {
    pub kind: SourceKind,
    pub product: String,
    /// Team, club, or parent-member id this source came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Display label for the source (team name, parent display name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

impl EntitlementSource {
    pub fn direct(product: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Direct,
            product: product.into(),
            source_id: None,
            source_name: None,
        }
    }

    pub fn team(product: impl Into<String>, team_id: &str, team_name: &str) -> Self {
        Self {
            kind: SourceKind::Team,
            product: product.into(),
            source_id: Some(team_id.to_string()),
            source_name: Some(team_name.to_string()),
        }
    }

    pub fn club(product: impl Into<String>, club_id: &str, club_name: &str) -> Self {
        Self {
            kind: SourceKind::Club,
            product: product.into(),
            source_id: Some(club_id.to_string()),
            source_name: Some(club_name.to_string()),
        }
    }

    pub fn parent(product: impl Into<String>, parent_id: &str, parent_name: &str) -> Self {
        Self {
            kind: SourceKind::Parent,
            product: product.into(),
            source_id: Some(parent_id.to_string()),
            source_name: Some(parent_name.to_string()),
        }
    }
}

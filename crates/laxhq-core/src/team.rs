use crate::error::{LaxError, Result};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// TeamRole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    HeadCoach,
    AssistantCoach,
    Player,
}

impl TeamRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamRole::HeadCoach => "head_coach",
            TeamRole::AssistantCoach => "assistant_coach",
            TeamRole::Player => "player",
        }
    }

    /// Coaching roles inherit the team's bundled coach kit.
    pub fn is_coach(self) -> bool {
        matches!(self, TeamRole::HeadCoach | TeamRole::AssistantCoach)
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TeamRole {
    type Err = LaxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "head_coach" => Ok(TeamRole::HeadCoach),
            "assistant_coach" => Ok(TeamRole::AssistantCoach),
            "player" => Ok(TeamRole::Player),
            _ => Err(LaxError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RosterEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub member: String,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    /// WordPress/LearnDash group id this team was imported from, if any.
    /// Upsert key for the team sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wp_group_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            club: None,
            wp_group_id: None,
            created_at: Utc::now(),
            roster: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Roster
    // ---------------------------------------------------------------------------

    /// Add a member to the roster. A member appears at most once per team.
    pub fn add_member(&mut self, member: &str, role: TeamRole) -> Result<()> {
        self.add_member_at(member, role, Utc::now())
    }

    /// Add a member with an explicit join timestamp (used by the import sync
    /// to keep positions stable across runs).
    pub fn add_member_at(
        &mut self,
        member: &str,
        role: TeamRole,
        joined_at: DateTime<Utc>,
    ) -> Result<()> {
        if self.roster.iter().any(|e| e.member == member) {
            return Err(LaxError::AlreadyOnRoster {
                member: member.to_string(),
                team: self.id.clone(),
            });
        }
        self.roster.push(RosterEntry {
            member: member.to_string(),
            role,
            joined_at,
        });
        Ok(())
    }

    pub fn entry(&self, member: &str) -> Option<&RosterEntry> {
        self.roster.iter().find(|e| e.member == member)
    }

    /// Players in roster-position order. The ordering is a documented
    /// contract: `joined_at` ascending, member id ascending as tie-break.
    /// Positions 1..=TEAM_PLAYER_LIMIT inherit the team's player product.
    pub fn players(&self) -> Vec<&RosterEntry> {
        let mut players: Vec<&RosterEntry> = self
            .roster
            .iter()
            .filter(|e| e.role == TeamRole::Player)
            .collect();
        players.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.member.cmp(&b.member))
        });
        players
    }

    pub fn player_count(&self) -> u32 {
        self.roster
            .iter()
            .filter(|e| e.role == TeamRole::Player)
            .count() as u32
    }

    /// 1-based roster position of a player, `None` if the member is not a
    /// player on this team.
    pub fn player_position(&self, member: &str) -> Option<u32> {
        self.players()
            .iter()
            .position(|e| e.member == member)
            .map(|i| i as u32 + 1)
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, id: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let id = id.into();
        paths::validate_id(&id)?;

        let file = paths::team_file(root, &id);
        if file.exists() {
            return Err(LaxError::TeamExists(id));
        }

        let team = Self::new(id, name);
        team.save(root)?;
        Ok(team)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        let file = paths::team_file(root, id);
        if !file.exists() {
            return Err(LaxError::TeamNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&file)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::team_file(root, &self.id), data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = root.join(paths::TEAMS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut teams = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "yaml") {
                let data = std::fs::read_to_string(&path)?;
                teams.push(serde_yaml::from_str::<Team>(&data)?);
            }
        }
        teams.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(teams)
    }

    /// Teams whose roster includes the given member.
    pub fn list_for_member(root: &Path, member: &str) -> Result<Vec<Self>> {
        Ok(Self::list(root)?
            .into_iter()
            .filter(|t| t.entry(member).is_some())
            .collect())
    }

    pub fn find_by_wp_group(root: &Path, wp_group_id: u64) -> Result<Option<Self>> {
        Ok(Self::list(root)?
            .into_iter()
            .find(|t| t.wp_group_id == Some(wp_group_id)))
    }
}

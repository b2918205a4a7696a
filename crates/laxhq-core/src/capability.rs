use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// A named permission/feature flag granted by a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    // Academy access
    FullAcademy,
    BasicAcademy,
    LimitedDrills,
    Drills,
    Workouts,
    // Coach features
    PracticePlanner,
    Resources,
    CustomContent,
    Training,
    // Team features
    TeamManagement,
    Roster,
    Playbook,
    Analytics,
    // Basic
    PlatformAccess,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::FullAcademy => "full_academy",
            Capability::BasicAcademy => "basic_academy",
            Capability::LimitedDrills => "limited_drills",
            Capability::Drills => "drills",
            Capability::Workouts => "workouts",
            Capability::PracticePlanner => "practice_planner",
            Capability::Resources => "resources",
            Capability::CustomContent => "custom_content",
            Capability::Training => "training",
            Capability::TeamManagement => "team_management",
            Capability::Roster => "roster",
            Capability::Playbook => "playbook",
            Capability::Analytics => "analytics",
            Capability::PlatformAccess => "platform_access",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = crate::error::LaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_academy" => Ok(Capability::FullAcademy),
            "basic_academy" => Ok(Capability::BasicAcademy),
            "limited_drills" => Ok(Capability::LimitedDrills),
            "drills" => Ok(Capability::Drills),
            "workouts" => Ok(Capability::Workouts),
            "practice_planner" => Ok(Capability::PracticePlanner),
            "resources" => Ok(Capability::Resources),
            "custom_content" => Ok(Capability::CustomContent),
            "training" => Ok(Capability::Training),
            "team_management" => Ok(Capability::TeamManagement),
            "roster" => Ok(Capability::Roster),
            "playbook" => Ok(Capability::Playbook),
            "analytics" => Ok(Capability::Analytics),
            "platform_access" => Ok(Capability::PlatformAccess),
            _ => Err(crate::error::LaxError::InvalidCapability(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AcademyTier
// ---------------------------------------------------------------------------

/// Coarse label summarizing a member's academy-related capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcademyTier {
    Full,
    Basic,
    Limited,
    None,
}

impl AcademyTier {
    pub fn as_str(self) -> &'static str {
        match self {
            AcademyTier::Full => "full",
            AcademyTier::Basic => "basic",
            AcademyTier::Limited => "limited",
            AcademyTier::None => "none",
        }
    }
}

impl fmt::Display for AcademyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_str_roundtrip() {
        for cap in [
            Capability::FullAcademy,
            Capability::BasicAcademy,
            Capability::LimitedDrills,
            Capability::Drills,
            Capability::Workouts,
            Capability::PracticePlanner,
            Capability::Resources,
            Capability::CustomContent,
            Capability::Training,
            Capability::TeamManagement,
            Capability::Roster,
            Capability::Playbook,
            Capability::Analytics,
            Capability::PlatformAccess,
        ] {
            let parsed: Capability = cap.as_str().parse().unwrap();
            assert_eq!(parsed, cap);
        }
    }

    #[test]
    fn capability_serde_uses_snake_case() {
        let yaml = serde_yaml::to_string(&Capability::PracticePlanner).unwrap();
        assert_eq!(yaml.trim(), "practice_planner");
        let cap: Capability = serde_yaml::from_str("full_academy").unwrap();
        assert_eq!(cap, Capability::FullAcademy);
    }

    #[test]
    fn unknown_capability_rejected() {
        assert!("superpowers".parse::<Capability>().is_err());
    }

    #[test]
    fn tier_display() {
        assert_eq!(AcademyTier::Full.to_string(), "full");
        assert_eq!(AcademyTier::None.to_string(), "none");
    }
}

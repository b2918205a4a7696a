use serde::{Deserialize, Serialize};

/// Roster spots per team that inherit the team's player product. Fixed by
/// the product line, not configurable.
pub const TEAM_PLAYER_LIMIT: u32 = 25;

// ---------------------------------------------------------------------------
// LimitCheck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitCheck {
    pub within_limit: bool,
    pub remaining: u32,
    pub limit: u32,
}

/// Whether a team with `current_players` players can still seat another
/// academy-eligible player.
pub fn check_academy_limit(current_players: u32) -> LimitCheck {
    LimitCheck {
        within_limit: current_players < TEAM_PLAYER_LIMIT,
        remaining: TEAM_PLAYER_LIMIT.saturating_sub(current_players),
        limit: TEAM_PLAYER_LIMIT,
    }
}

// ---------------------------------------------------------------------------
// TeamLimitInfo
// ---------------------------------------------------------------------------

/// A player's standing against the team's academy seat limit. Attached to
/// the capability result when the member is a player on an entitled team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLimitInfo {
    pub team: String,
    pub team_name: String,
    pub player_limit: u32,
    pub current_players: u32,
    pub available_slots: u32,
    pub is_eligible: bool,
    /// 1-based roster position (joined_at ascending, member id tie-break).
    pub position: u32,
}

impl TeamLimitInfo {
    pub fn new(
        team: &str,
        team_name: &str,
        player_limit: u32,
        current_players: u32,
        position: u32,
    ) -> Self {
        Self {
            team: team.to_string(),
            team_name: team_name.to_string(),
            player_limit,
            current_players,
            available_slots: player_limit.saturating_sub(current_players),
            is_eligible: position <= player_limit,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_check_below_at_and_above() {
        let below = check_academy_limit(24);
        assert!(below.within_limit);
        assert_eq!(below.remaining, 1);
        assert_eq!(below.limit, 25);

        let at = check_academy_limit(25);
        assert!(!at.within_limit);
        assert_eq!(at.remaining, 0);

        // Never negative, even over-subscribed
        let over = check_academy_limit(30);
        assert!(!over.within_limit);
        assert_eq!(over.remaining, 0);
    }

    #[test]
    fn limit_check_empty_team() {
        let check = check_academy_limit(0);
        assert!(check.within_limit);
        assert_eq!(check.remaining, 25);
    }

    #[test]
    fn eligibility_boundary() {
        let p25 = TeamLimitInfo::new("varsity", "Varsity", TEAM_PLAYER_LIMIT, 26, 25);
        assert!(p25.is_eligible);
        assert_eq!(p25.available_slots, 0);

        let p26 = TeamLimitInfo::new("varsity", "Varsity", TEAM_PLAYER_LIMIT, 26, 26);
        assert!(!p26.is_eligible);
    }
}

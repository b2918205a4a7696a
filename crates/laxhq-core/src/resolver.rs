//! Assembles the entitlement sources for a member from the store: direct
//! purchases, team-inherited products, club cascades, and parent-shared
//! purchases. The capability engine itself never touches the store.

use crate::catalog::Catalog;
use crate::club::Club;
use crate::engine::{self, CapabilityResult};
use crate::entitlement::{Holder, Ledger};
use crate::error::Result;
use crate::limits::TeamLimitInfo;
use crate::member::Member;
use crate::parent::ParentLinks;
use crate::source::EntitlementSource;
use crate::team::{Team, TeamRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// MemberCapabilities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberCapabilities {
    pub member: String,
    #[serde(flatten)]
    pub result: CapabilityResult,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Full capability report for a member: resolve sources, run the engine,
/// attach the player-limit standing.
pub fn member_capabilities(
    root: &Path,
    catalog: &Catalog,
    member_id: &str,
) -> Result<MemberCapabilities> {
    let member = Member::load(root, member_id)?;
    let now = Utc::now();
    let ledger = Ledger::load(root)?;

    let (sources, team_limits) = resolve_sources(root, catalog, &ledger, &member, now)?;
    let mut result = engine::compute(catalog, sources);
    result.team_limits = team_limits;

    Ok(MemberCapabilities {
        member: member.id,
        result,
    })
}

/// Resolve every entitlement source for a member, plus the player-limit
/// standing for the first entitled team the member plays on.
pub fn resolve_sources(
    root: &Path,
    catalog: &Catalog,
    ledger: &Ledger,
    member: &Member,
    now: DateTime<Utc>,
) -> Result<(Vec<EntitlementSource>, Option<TeamLimitInfo>)> {
    let mut sources = Vec::new();
    let mut team_limits: Option<TeamLimitInfo> = None;

    // Direct purchases
    let holder = Holder::Member(member.id.clone());
    for ent in ledger.active_for_holder(&holder, now) {
        sources.push(EntitlementSource::direct(&ent.product));
    }

    // Team-inherited
    let teams = Team::list_for_member(root, &member.id)?;
    for team in &teams {
        let team_holder = Holder::Team(team.id.clone());
        let Some(team_product) = ledger.active_product(&team_holder, now) else {
            continue;
        };
        sources.push(EntitlementSource::team(team_product, &team.id, &team.name));

        let Some(entry) = team.entry(&member.id) else {
            continue;
        };
        if entry.role.is_coach() {
            if let Some(coach_product) = catalog.coach_product_of(team_product) {
                sources.push(EntitlementSource::team(coach_product, &team.id, &team.name));
            }
        }
        if entry.role == TeamRole::Player {
            if let Some(position) = team.player_position(&member.id) {
                let limit = catalog
                    .get(team_product)
                    .and_then(|p| match &p.kind {
                        crate::catalog::ProductKind::Team { player_limit, .. } => {
                            Some(*player_limit)
                        }
                        _ => None,
                    })
                    .unwrap_or(crate::limits::TEAM_PLAYER_LIMIT);
                let info =
                    TeamLimitInfo::new(&team.id, &team.name, limit, team.player_count(), position);
                let eligible = info.is_eligible;
                if team_limits.is_none() {
                    team_limits = Some(info);
                }
                if eligible {
                    if let Some(player_product) = catalog.player_product_of(team_product) {
                        sources.push(EntitlementSource::team(
                            player_product,
                            &team.id,
                            &team.name,
                        ));
                    }
                }
            }
        }
    }

    // Club cascade: each distinct club contributes once, however many of its
    // teams the member is on.
    let mut seen_clubs: BTreeSet<String> = BTreeSet::new();
    for team in &teams {
        let Some(club_id) = &team.club else { continue };
        if !seen_clubs.insert(club_id.clone()) {
            continue;
        }
        let club = Club::load(root, club_id)?;
        let club_holder = Holder::Club(club.id.clone());
        let Some(club_product) = ledger.active_product(&club_holder, now) else {
            continue;
        };
        sources.push(EntitlementSource::club(club_product, &club.id, &club.name));
        if let Some(team_tier) = catalog.team_tier_of(club_product) {
            sources.push(EntitlementSource::club(team_tier, &club.id, &club.name));
        }
    }

    // Parent-shared purchases
    let links = ParentLinks::load(root)?;
    for link in links.parents_of(&member.id) {
        let parent = Member::load(root, &link.parent)?;
        let parent_holder = Holder::Member(parent.id.clone());
        for ent in ledger.active_for_holder(&parent_holder, now) {
            let shareable = catalog.get(&ent.product).is_some_and(|p| p.is_shareable());
            if shareable {
                sources.push(EntitlementSource::parent(
                    &ent.product,
                    &parent.id,
                    parent.label(),
                ));
            }
        }
    }

    Ok((sources, team_limits))
}

// ---------------------------------------------------------------------------
// Team overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamOverview {
    pub team: String,
    pub team_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    pub player_limit: u32,
    pub current_players: u32,
    pub available_slots: u32,
    pub players: Vec<PlayerStanding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub member: String,
    pub position: u32,
    pub academy_eligible: bool,
}

/// Roster standing against the academy seat limit for a whole team.
pub fn team_overview(root: &Path, catalog: &Catalog, team_id: &str) -> Result<TeamOverview> {
    let team = Team::load(root, team_id)?;
    let ledger = Ledger::load(root)?;
    let now = Utc::now();

    let holder = Holder::Team(team.id.clone());
    let product = ledger.active_product(&holder, now).map(str::to_string);

    let limit = product
        .as_deref()
        .and_then(|p| catalog.get(p))
        .and_then(|p| match &p.kind {
            crate::catalog::ProductKind::Team { player_limit, .. } => Some(*player_limit),
            _ => None,
        })
        .unwrap_or(0);

    let players: Vec<PlayerStanding> = team
        .players()
        .iter()
        .enumerate()
        .map(|(i, entry)| PlayerStanding {
            member: entry.member.clone(),
            position: i as u32 + 1,
            academy_eligible: limit > 0 && (i as u32) < limit,
        })
        .collect();

    let current_players = players.len() as u32;
    Ok(TeamOverview {
        team: team.id,
        team_name: team.name,
        product,
        player_limit: limit,
        current_players,
        available_slots: limit.saturating_sub(current_players),
        players,
    })
}

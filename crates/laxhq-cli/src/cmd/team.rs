use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use laxhq_core::{
    catalog::Catalog,
    member::Member,
    paths, resolver,
    team::{Team, TeamRole},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum TeamSubcommand {
    /// Create a team
    Create {
        /// Team id (lowercase, hyphens)
        id: String,
        /// Team name
        #[arg(long)]
        name: String,
        /// Club this team belongs to
        #[arg(long)]
        club: Option<String>,
    },
    /// List teams
    List,
    /// Add a member to a team roster
    AddMember {
        /// Team id
        id: String,
        /// Member id
        member: String,
        /// Roster role: head_coach | assistant_coach | player
        #[arg(long, default_value = "player")]
        role: String,
    },
    /// Show a team roster with player positions
    Roster { id: String },
    /// Show academy seat usage for a team
    Overview { id: String },
}

pub fn run(root: &Path, subcmd: TeamSubcommand, json: bool) -> anyhow::Result<()> {
    paths::require_initialized(root)?;
    match subcmd {
        TeamSubcommand::Create { id, name, club } => create(root, &id, &name, club, json),
        TeamSubcommand::List => list(root, json),
        TeamSubcommand::AddMember { id, member, role } => add_member(root, &id, &member, &role, json),
        TeamSubcommand::Roster { id } => roster(root, &id, json),
        TeamSubcommand::Overview { id } => overview(root, &id, json),
    }
}

fn create(root: &Path, id: &str, name: &str, club: Option<String>, json: bool) -> anyhow::Result<()> {
    if let Some(club_id) = &club {
        laxhq_core::club::Club::load(root, club_id)
            .with_context(|| format!("club '{club_id}' does not exist"))?;
    }
    let mut team =
        Team::create(root, id, name).with_context(|| format!("failed to create team '{id}'"))?;
    if club.is_some() {
        team.club = club;
        team.save(root)?;
    }

    if json {
        print_json(&team)?;
    } else {
        println!("Created team '{}'", team.id);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let teams = Team::list(root)?;
    if json {
        print_json(&teams)?;
    } else {
        let rows: Vec<Vec<String>> = teams
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.name.clone(),
                    t.club.clone().unwrap_or_default(),
                    t.player_count().to_string(),
                ]
            })
            .collect();
        print_table(&["ID", "NAME", "CLUB", "PLAYERS"], &rows);
    }
    Ok(())
}

fn add_member(root: &Path, id: &str, member: &str, role: &str, json: bool) -> anyhow::Result<()> {
    let role: TeamRole = role.parse()?;
    // The member must exist before joining a roster
    Member::load(root, member)?;

    let mut team = Team::load(root, id)?;
    team.add_member(member, role)?;
    team.save(root)?;

    if json {
        print_json(&team)?;
    } else {
        println!("Added '{member}' to '{id}' as {role}");
        if role == TeamRole::Player {
            let check = laxhq_core::limits::check_academy_limit(team.player_count());
            if !check.within_limit {
                println!(
                    "note: roster now has {} players; academy seats are capped at {}",
                    team.player_count(),
                    check.limit
                );
            }
        }
    }
    Ok(())
}

fn roster(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let team = Team::load(root, id)?;
    if json {
        print_json(&team)?;
        return Ok(());
    }

    println!("{} ({})", team.name, team.id);
    let coaches: Vec<Vec<String>> = team
        .roster
        .iter()
        .filter(|e| e.role.is_coach())
        .map(|e| vec![e.member.clone(), e.role.to_string()])
        .collect();
    if !coaches.is_empty() {
        print_table(&["COACH", "ROLE"], &coaches);
        println!();
    }
    let players: Vec<Vec<String>> = team
        .players()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let position = i as u32 + 1;
            vec![
                position.to_string(),
                e.member.clone(),
                e.joined_at.format("%Y-%m-%d").to_string(),
                if position <= laxhq_core::limits::TEAM_PLAYER_LIMIT {
                    "yes".to_string()
                } else {
                    "no".to_string()
                },
            ]
        })
        .collect();
    print_table(&["POS", "PLAYER", "JOINED", "ACADEMY"], &players);
    Ok(())
}

fn overview(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::load(root)?;
    let overview = resolver::team_overview(root, &catalog, id)?;
    if json {
        print_json(&overview)?;
        return Ok(());
    }

    println!("{} ({})", overview.team_name, overview.team);
    match &overview.product {
        Some(p) => println!("  product:         {p}"),
        None => println!("  product:         (none)"),
    }
    println!("  players:         {}", overview.current_players);
    println!("  academy seats:   {}", overview.player_limit);
    println!("  available slots: {}", overview.available_slots);
    Ok(())
}

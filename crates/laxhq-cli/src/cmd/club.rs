use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use laxhq_core::{club::Club, paths, team::Team};
use std::path::Path;

#[derive(Subcommand)]
pub enum ClubSubcommand {
    /// Create a club
    Create {
        /// Club id (lowercase, hyphens)
        id: String,
        /// Club name
        #[arg(long)]
        name: String,
    },
    /// List clubs with their team counts
    List,
}

pub fn run(root: &Path, subcmd: ClubSubcommand, json: bool) -> anyhow::Result<()> {
    paths::require_initialized(root)?;
    match subcmd {
        ClubSubcommand::Create { id, name } => create(root, &id, &name, json),
        ClubSubcommand::List => list(root, json),
    }
}

fn create(root: &Path, id: &str, name: &str, json: bool) -> anyhow::Result<()> {
    let club =
        Club::create(root, id, name).with_context(|| format!("failed to create club '{id}'"))?;
    if json {
        print_json(&club)?;
    } else {
        println!("Created club '{}'", club.id);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let clubs = Club::list(root)?;
    let teams = Team::list(root)?;
    if json {
        print_json(&clubs)?;
    } else {
        let rows: Vec<Vec<String>> = clubs
            .iter()
            .map(|c| {
                let team_count = teams
                    .iter()
                    .filter(|t| t.club.as_deref() == Some(c.id.as_str()))
                    .count();
                vec![c.id.clone(), c.name.clone(), team_count.to_string()]
            })
            .collect();
        print_table(&["ID", "NAME", "TEAMS"], &rows);
    }
    Ok(())
}

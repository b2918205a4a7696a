use crate::output::{print_json, print_table};
use clap::Subcommand;
use laxhq_core::{paths, sync};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ImportSubcommand {
    /// Upsert teams from a LearnDash group export or the WordPress API
    Teams {
        /// LearnDash group export CSV
        #[arg(long, conflicts_with = "url")]
        csv: Option<PathBuf>,
        /// WordPress site base URL, e.g. https://example.com
        #[arg(long)]
        url: Option<String>,
        /// Club to place newly imported teams under
        #[arg(long)]
        club: Option<String>,
    },
    /// Attach imported members to team rosters from a group export CSV
    Rosters {
        /// LearnDash group export CSV
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show the import history
    Log,
}

pub fn run(root: &Path, subcmd: ImportSubcommand, json: bool) -> anyhow::Result<()> {
    paths::require_initialized(root)?;
    match subcmd {
        ImportSubcommand::Teams { csv, url, club } => {
            let report = match (csv, url) {
                (Some(csv), None) => {
                    sync::sync_teams_from_csv(root, &csv, club.as_deref())?
                }
                (None, Some(url)) => sync::sync_teams_from_api(root, &url, club.as_deref())?,
                _ => anyhow::bail!("pass exactly one of --csv or --url"),
            };
            print_report(&report, json)
        }
        ImportSubcommand::Rosters { csv } => {
            let report = sync::sync_rosters_from_csv(root, &csv)?;
            print_report(&report, json)
        }
        ImportSubcommand::Log => log(root, json),
    }
}

fn print_report(report: &sync::SyncReport, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(report)?;
    } else {
        println!(
            "processed {}, created {}, updated {}, skipped {}",
            report.processed, report.created, report.updated, report.skipped
        );
        for err in &report.errors {
            eprintln!("  error: {err}");
        }
    }
    if !report.success() {
        anyhow::bail!("{} row(s) failed", report.errors.len());
    }
    Ok(())
}

fn log(root: &Path, json: bool) -> anyhow::Result<()> {
    let log = sync::SyncLog::load(root)?;
    if json {
        print_json(&log)?;
        return Ok(());
    }
    let rows: Vec<Vec<String>> = log
        .entries
        .iter()
        .map(|e| {
            vec![
                e.started_at.format("%Y-%m-%d %H:%M").to_string(),
                e.sync_type.to_string(),
                format!("{:?}", e.status).to_lowercase(),
                format!("+{} ~{}", e.created, e.updated),
                e.error_message.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["STARTED", "TYPE", "STATUS", "CHANGES", "ERRORS"], &rows);
    Ok(())
}

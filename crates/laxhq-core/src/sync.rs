//! WordPress/LearnDash import sync.
//!
//! Teams arrive either as a LearnDash group export CSV (`ID`, `Title`,
//! `Slug`, plus `learndash_group_users_*` columns holding PHP-serialized
//! user-id arrays) or from the LearnDash REST API. Rows upsert by the
//! WordPress group id stored on each local team. Failures are collected
//! per row; a bad row never aborts the batch. Every run appends an entry
//! to `.laxhq/sync-log.yaml`.

use crate::error::{LaxError, Result};
use crate::member::Member;
use crate::paths;
use crate::team::{Team, TeamRole};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// SyncReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub processed: u32,
    pub created: u32,
    pub updated: u32,
    /// Rows or users passed over without error (no WordPress id, member not
    /// imported yet).
    pub skipped: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Sync log
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    Teams,
    Rosters,
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncType::Teams => "teams",
            SyncType::Rosters => "rosters",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub id: String,
    pub sync_type: SyncType,
    pub status: SyncStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub processed: u32,
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncLog {
    #[serde(default)]
    pub entries: Vec<SyncLogEntry>,
}

impl SyncLog {
    pub fn load(root: &Path) -> Result<Self> {
        let file = paths::sync_log_file(root);
        if !file.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&file)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::sync_log_file(root), data.as_bytes())
    }
}

fn record_run(
    root: &Path,
    sync_type: SyncType,
    started_at: DateTime<Utc>,
    report: &SyncReport,
) -> Result<()> {
    let mut log = SyncLog::load(root)?;
    log.entries.push(SyncLogEntry {
        id: uuid::Uuid::new_v4().to_string(),
        sync_type,
        status: if report.success() {
            SyncStatus::Completed
        } else {
            SyncStatus::Failed
        },
        started_at,
        completed_at: Utc::now(),
        processed: report.processed,
        created: report.created,
        updated: report.updated,
        skipped: report.skipped,
        error_message: if report.errors.is_empty() {
            None
        } else {
            Some(report.errors.join("; "))
        },
    });
    log.save(root)
}

// ---------------------------------------------------------------------------
// PHP-serialized arrays
// ---------------------------------------------------------------------------

static SERIALIZED_INT_RE: OnceLock<Regex> = OnceLock::new();

/// Extract the user ids from a LearnDash PHP-serialized integer array,
/// e.g. `a:2:{i:0;i:4821;i:1;i:4822;}` -> `[4821, 4822]`. Duplicates are
/// dropped, order preserved. Unparseable input yields an empty list.
pub fn parse_serialized_user_ids(raw: &str) -> Vec<u64> {
    let re = SERIALIZED_INT_RE.get_or_init(|| Regex::new(r"i:\d+;i:(\d+);").unwrap());
    let cleaned = raw.trim().trim_matches('"').replace("\\\"", "\"");

    let mut ids = Vec::new();
    for cap in re.captures_iter(&cleaned) {
        if let Ok(id) = cap[1].parse::<u64>() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

// ---------------------------------------------------------------------------
// Team rows
// ---------------------------------------------------------------------------

/// One WordPress team, whichever transport it arrived by.
#[derive(Debug, Clone, PartialEq)]
pub struct WpTeamRow {
    pub wp_group_id: u64,
    pub name: String,
    pub slug: String,
    /// User ids from every `learndash_group_users_*` column, deduplicated.
    pub user_ids: Vec<u64>,
}

fn read_team_rows_csv(csv_path: &Path) -> Result<(Vec<WpTeamRow>, SyncReport)> {
    let mut report = SyncReport::default();
    let mut rows = Vec::new();

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)?;
    let headers = reader.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let id_col = col("ID");
    let title_col = col("Title");
    let slug_col = col("Slug");
    let user_cols: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.starts_with("learndash_group_users_"))
        .map(|(i, _)| i)
        .collect();

    for (row_num, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                report.errors.push(format!("row {}: {e}", row_num + 2));
                continue;
            }
        };
        let raw_id = id_col.and_then(|i| record.get(i)).unwrap_or("").trim();
        if raw_id.is_empty() {
            report.skipped += 1;
            continue;
        }
        let Ok(wp_group_id) = raw_id.parse::<u64>() else {
            report
                .errors
                .push(format!("row {}: invalid ID '{raw_id}'", row_num + 2));
            continue;
        };
        let name = title_col
            .and_then(|i| record.get(i))
            .unwrap_or_default()
            .trim()
            .to_string();
        let slug = slug_col
            .and_then(|i| record.get(i))
            .unwrap_or_default()
            .trim()
            .to_string();

        let mut user_ids = Vec::new();
        for &i in &user_cols {
            for id in parse_serialized_user_ids(record.get(i).unwrap_or_default()) {
                if !user_ids.contains(&id) {
                    user_ids.push(id);
                }
            }
        }

        rows.push(WpTeamRow {
            wp_group_id,
            name,
            slug,
            user_ids,
        });
    }

    Ok((rows, report))
}

// ---------------------------------------------------------------------------
// Team sync
// ---------------------------------------------------------------------------

fn upsert_team(
    root: &Path,
    row: &WpTeamRow,
    default_club: Option<&str>,
    report: &mut SyncReport,
) {
    report.processed += 1;
    match Team::find_by_wp_group(root, row.wp_group_id) {
        Ok(Some(mut team)) => {
            team.name = row.name.clone();
            match team.save(root) {
                Ok(()) => report.updated += 1,
                Err(e) => report
                    .errors
                    .push(format!("failed to update team '{}': {e}", row.name)),
            }
        }
        Ok(None) => {
            if paths::validate_id(&row.slug).is_err() {
                report
                    .errors
                    .push(format!("team '{}': invalid slug '{}'", row.name, row.slug));
                return;
            }
            match Team::create(root, &row.slug, &row.name) {
                Ok(mut team) => {
                    team.wp_group_id = Some(row.wp_group_id);
                    team.club = default_club.map(str::to_string);
                    match team.save(root) {
                        Ok(()) => report.created += 1,
                        Err(e) => report
                            .errors
                            .push(format!("failed to save team '{}': {e}", row.name)),
                    }
                }
                Err(e) => report
                    .errors
                    .push(format!("failed to create team '{}': {e}", row.name)),
            }
        }
        Err(e) => report
            .errors
            .push(format!("lookup failed for WP group {}: {e}", row.wp_group_id)),
    }
}

fn sync_teams(
    root: &Path,
    rows: &[WpTeamRow],
    default_club: Option<&str>,
    mut report: SyncReport,
    started_at: DateTime<Utc>,
) -> Result<SyncReport> {
    for row in rows {
        upsert_team(root, row, default_club, &mut report);
    }
    tracing::info!(
        processed = report.processed,
        created = report.created,
        updated = report.updated,
        errors = report.errors.len(),
        "team sync finished"
    );
    record_run(root, SyncType::Teams, started_at, &report)?;
    Ok(report)
}

/// Upsert teams from a LearnDash group export CSV.
pub fn sync_teams_from_csv(
    root: &Path,
    csv_path: &Path,
    default_club: Option<&str>,
) -> Result<SyncReport> {
    let started_at = Utc::now();
    let (rows, report) = read_team_rows_csv(csv_path)?;
    sync_teams(root, &rows, default_club, report, started_at)
}

/// Upsert teams fetched from the LearnDash REST API.
pub fn sync_teams_from_api(
    root: &Path,
    base_url: &str,
    default_club: Option<&str>,
) -> Result<SyncReport> {
    let started_at = Utc::now();
    let rows = fetch_teams(base_url)?;
    sync_teams(root, &rows, default_club, SyncReport::default(), started_at)
}

// ---------------------------------------------------------------------------
// Roster sync
// ---------------------------------------------------------------------------

/// Attach imported members to their teams as players, matching on
/// `wordpress_id`. Users without a matching member record are skipped, not
/// errors; a re-run leaves existing roster entries untouched.
pub fn sync_rosters_from_csv(root: &Path, csv_path: &Path) -> Result<SyncReport> {
    let started_at = Utc::now();
    let (rows, mut report) = read_team_rows_csv(csv_path)?;

    for row in &rows {
        report.processed += 1;
        let mut team = match Team::find_by_wp_group(root, row.wp_group_id) {
            Ok(Some(t)) => t,
            Ok(None) => {
                report
                    .errors
                    .push(format!("team not found for WP group {}", row.wp_group_id));
                continue;
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("lookup failed for WP group {}: {e}", row.wp_group_id));
                continue;
            }
        };

        let mut changed = false;
        for &wp_user_id in &row.user_ids {
            let member = match Member::find_by_wordpress_id(root, wp_user_id) {
                Ok(Some(m)) => m,
                Ok(None) => {
                    tracing::debug!(wp_user_id, team = %team.id, "member not imported yet, skipping");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    report
                        .errors
                        .push(format!("member lookup failed for WP user {wp_user_id}: {e}"));
                    continue;
                }
            };
            match team.add_member(&member.id, TeamRole::Player) {
                Ok(()) => {
                    changed = true;
                    report.created += 1;
                }
                Err(LaxError::AlreadyOnRoster { .. }) => {
                    report.updated += 1;
                }
                Err(e) => report.errors.push(format!(
                    "failed to add '{}' to team '{}': {e}",
                    member.id, team.id
                )),
            }
        }
        if changed {
            if let Err(e) = team.save(root) {
                report
                    .errors
                    .push(format!("failed to save team '{}': {e}", team.id));
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        added = report.created,
        skipped = report.skipped,
        errors = report.errors.len(),
        "roster sync finished"
    );
    record_run(root, SyncType::Rosters, started_at, &report)?;
    Ok(report)
}

// ---------------------------------------------------------------------------
// LearnDash REST API
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WpGroup {
    id: u64,
    title: WpRendered,
    slug: String,
}

#[derive(Debug, Deserialize)]
struct WpRendered {
    rendered: String,
}

/// Fetch LearnDash groups from `{base}/wp-json/ldlms/v2/groups`.
fn fetch_teams(base_url: &str) -> Result<Vec<WpTeamRow>> {
    let url = format!("{}/wp-json/ldlms/v2/groups", base_url.trim_end_matches('/'));
    tracing::info!(%url, "fetching LearnDash groups");
    let response = reqwest::blocking::get(&url)?;
    if !response.status().is_success() {
        return Err(LaxError::Sync(format!(
            "LearnDash API returned {} for {url}",
            response.status()
        )));
    }
    let groups: Vec<WpGroup> = response.json()?;
    Ok(groups
        .into_iter()
        .map(|g| WpTeamRow {
            wp_group_id: g.id,
            name: g.title.rendered,
            slug: g.slug,
            user_ids: Vec::new(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    // -----------------------------------------------------------------------
    // PHP-serialized arrays
    // -----------------------------------------------------------------------

    #[test]
    fn parse_serialized_basic() {
        let ids = parse_serialized_user_ids("a:2:{i:0;i:4821;i:1;i:4822;}");
        assert_eq!(ids, vec![4821, 4822]);
    }

    #[test]
    fn parse_serialized_dedupes_and_keeps_order() {
        let ids = parse_serialized_user_ids("a:3:{i:0;i:7;i:1;i:3;i:2;i:7;}");
        assert_eq!(ids, vec![7, 3]);
    }

    #[test]
    fn parse_serialized_handles_quoted_export() {
        let ids = parse_serialized_user_ids("\"a:1:{i:0;i:99;}\"");
        assert_eq!(ids, vec![99]);
    }

    #[test]
    fn parse_serialized_garbage_is_empty() {
        assert!(parse_serialized_user_ids("").is_empty());
        assert!(parse_serialized_user_ids("   ").is_empty());
        assert!(parse_serialized_user_ids("not serialized").is_empty());
    }

    // -----------------------------------------------------------------------
    // Team sync (CSV)
    // -----------------------------------------------------------------------

    #[test]
    fn team_sync_creates_then_updates() {
        let dir = TempDir::new().unwrap();
        let csv = write_csv(
            &dir,
            "teams.csv",
            "ID,Title,Slug\n101,Varsity,varsity\n102,Junior Varsity,junior-varsity\n",
        );

        let report = sync_teams_from_csv(dir.path(), &csv, None).unwrap();
        assert!(report.success());
        assert_eq!(report.created, 2);
        assert_eq!(report.updated, 0);

        let team = Team::find_by_wp_group(dir.path(), 101).unwrap().unwrap();
        assert_eq!(team.id, "varsity");
        assert_eq!(team.name, "Varsity");

        // Second run with a renamed team updates in place
        let csv = write_csv(
            &dir,
            "teams2.csv",
            "ID,Title,Slug\n101,Varsity Blue,varsity\n",
        );
        let report = sync_teams_from_csv(dir.path(), &csv, None).unwrap();
        assert!(report.success());
        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 1);

        let team = Team::find_by_wp_group(dir.path(), 101).unwrap().unwrap();
        assert_eq!(team.name, "Varsity Blue");
        // Still only two teams on disk
        assert_eq!(Team::list(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn team_sync_assigns_default_club() {
        let dir = TempDir::new().unwrap();
        let csv = write_csv(&dir, "teams.csv", "ID,Title,Slug\n101,Varsity,varsity\n");
        sync_teams_from_csv(dir.path(), &csv, Some("riverside")).unwrap();
        let team = Team::load(dir.path(), "varsity").unwrap();
        assert_eq!(team.club.as_deref(), Some("riverside"));
    }

    #[test]
    fn team_sync_collects_row_errors_without_aborting() {
        let dir = TempDir::new().unwrap();
        let csv = write_csv(
            &dir,
            "teams.csv",
            "ID,Title,Slug\nabc,Bad Row,bad\n101,Good Team,good-team\n102,Bad Slug,Bad Slug!\n",
        );

        let report = sync_teams_from_csv(dir.path(), &csv, None).unwrap();
        assert!(!report.success());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.created, 1);
        assert!(Team::load(dir.path(), "good-team").is_ok());
    }

    #[test]
    fn team_sync_skips_rows_without_id() {
        let dir = TempDir::new().unwrap();
        let csv = write_csv(&dir, "teams.csv", "ID,Title,Slug\n,No Id,no-id\n");
        let report = sync_teams_from_csv(dir.path(), &csv, None).unwrap();
        assert!(report.success());
        assert_eq!(report.skipped, 1);
        assert_eq!(report.processed, 0);
    }

    #[test]
    fn sync_appends_log_entries() {
        let dir = TempDir::new().unwrap();
        let csv = write_csv(&dir, "teams.csv", "ID,Title,Slug\n101,Varsity,varsity\n");
        sync_teams_from_csv(dir.path(), &csv, None).unwrap();
        let bad = write_csv(&dir, "bad.csv", "ID,Title,Slug\nxyz,Broken,broken\n");
        sync_teams_from_csv(dir.path(), &bad, None).unwrap();

        let log = SyncLog::load(dir.path()).unwrap();
        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.entries[0].status, SyncStatus::Completed);
        assert_eq!(log.entries[0].sync_type, SyncType::Teams);
        assert_eq!(log.entries[1].status, SyncStatus::Failed);
        assert!(log.entries[1].error_message.as_ref().unwrap().contains("xyz"));
    }

    // -----------------------------------------------------------------------
    // Roster sync (CSV)
    // -----------------------------------------------------------------------

    #[test]
    fn roster_sync_matches_members_by_wordpress_id() {
        let dir = TempDir::new().unwrap();
        let mut jane = Member::create(dir.path(), "jane", "jane@example.com").unwrap();
        jane.wordpress_id = Some(4821);
        jane.save(dir.path()).unwrap();

        let teams_csv = write_csv(&dir, "teams.csv", "ID,Title,Slug\n101,Varsity,varsity\n");
        sync_teams_from_csv(dir.path(), &teams_csv, None).unwrap();

        // 4822 has no member record yet: skipped, not an error
        let roster_csv = write_csv(
            &dir,
            "rosters.csv",
            "ID,Title,Slug,learndash_group_users_1\n101,Varsity,varsity,\"a:2:{i:0;i:4821;i:1;i:4822;}\"\n",
        );
        let report = sync_rosters_from_csv(dir.path(), &roster_csv).unwrap();
        assert!(report.success());
        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);

        let team = Team::load(dir.path(), "varsity").unwrap();
        assert_eq!(team.player_position("jane"), Some(1));

        // Idempotent re-run: the existing entry counts as updated
        let report = sync_rosters_from_csv(dir.path(), &roster_csv).unwrap();
        assert!(report.success());
        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 1);
        assert_eq!(Team::load(dir.path(), "varsity").unwrap().roster.len(), 1);
    }

    #[test]
    fn roster_sync_unknown_team_is_an_error() {
        let dir = TempDir::new().unwrap();
        let csv = write_csv(
            &dir,
            "rosters.csv",
            "ID,Title,Slug,learndash_group_users_1\n999,Ghost,ghost,\"a:1:{i:0;i:1;}\"\n",
        );
        let report = sync_rosters_from_csv(dir.path(), &csv).unwrap();
        assert!(!report.success());
        assert!(report.errors[0].contains("999"));
    }

    // -----------------------------------------------------------------------
    // LearnDash REST API
    // -----------------------------------------------------------------------

    #[test]
    fn api_sync_upserts_groups() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new();
        let body = serde_json::json!([
            {"id": 101, "title": {"rendered": "Varsity"}, "slug": "varsity"},
            {"id": 102, "title": {"rendered": "Junior Varsity"}, "slug": "junior-varsity"}
        ]);
        let mock = server
            .mock("GET", "/wp-json/ldlms/v2/groups")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create();

        let report = sync_teams_from_api(dir.path(), &server.url(), None).unwrap();
        mock.assert();
        assert!(report.success());
        assert_eq!(report.created, 2);
        assert_eq!(
            Team::find_by_wp_group(dir.path(), 102).unwrap().unwrap().id,
            "junior-varsity"
        );
    }

    #[test]
    fn api_error_status_is_a_sync_error() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/wp-json/ldlms/v2/groups")
            .with_status(500)
            .create();

        let err = sync_teams_from_api(dir.path(), &server.url(), None).unwrap_err();
        assert!(matches!(err, LaxError::Sync(_)));
        // A failed fetch never writes a log entry
        assert!(SyncLog::load(dir.path()).unwrap().entries.is_empty());
    }
}

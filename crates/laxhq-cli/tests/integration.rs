use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn laxhq(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("laxhq").unwrap();
    cmd.current_dir(dir.path()).env("LAXHQ_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    laxhq(dir).arg("init").assert().success();
}

// ---------------------------------------------------------------------------
// laxhq init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    laxhq(&dir).arg("init").assert().success();

    assert!(dir.path().join(".laxhq").is_dir());
    assert!(dir.path().join(".laxhq/members").is_dir());
    assert!(dir.path().join(".laxhq/teams").is_dir());
    assert!(dir.path().join(".laxhq/clubs").is_dir());
    assert!(dir.path().join(".laxhq/catalog.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    laxhq(&dir).arg("init").assert().success();
    laxhq(&dir).arg("init").assert().success();
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();
    laxhq(&dir)
        .args(["member", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// ---------------------------------------------------------------------------
// members and teams
// ---------------------------------------------------------------------------

#[test]
fn member_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["member", "add", "jane", "--email", "jane@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jane"));

    laxhq(&dir)
        .args(["member", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jane@example.com"));
}

#[test]
fn duplicate_member_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["member", "add", "jane", "--email", "jane@example.com"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["member", "add", "jane", "--email", "jane2@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn team_roster_shows_positions() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["member", "add", "jane", "--email", "jane@example.com"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["team", "create", "varsity", "--name", "Varsity"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["team", "add-member", "varsity", "jane"])
        .assert()
        .success();

    laxhq(&dir)
        .args(["team", "roster", "varsity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jane"))
        .stdout(predicate::str::contains("yes"));
}

#[test]
fn add_member_requires_existing_member() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["team", "create", "varsity", "--name", "Varsity"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["team", "add-member", "varsity", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("member not found"));
}

// ---------------------------------------------------------------------------
// grants and capabilities
// ---------------------------------------------------------------------------

#[test]
fn grant_and_capabilities_direct_purchase() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["member", "add", "jane", "--email", "jane@example.com"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["grant", "member:jane", "skills_academy_monthly"])
        .assert()
        .success();

    laxhq(&dir)
        .args(["capabilities", "jane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("academy tier: full"));

    laxhq(&dir)
        .args(["capabilities", "jane", "--check", "full_academy"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["capabilities", "jane", "--check", "practice_planner"])
        .assert()
        .failure();
}

#[test]
fn grant_rejects_unknown_product() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["member", "add", "jane", "--email", "jane@example.com"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["grant", "member:jane", "gold_plated_bundle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown product"));
}

// The coach-kit veto observed end to end: buying academy access and a coach
// kit leaves the member with no academy tier.
#[test]
fn coach_kit_strips_academy_access() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["member", "add", "casey", "--email", "casey@example.com"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["grant", "member:casey", "skills_academy_monthly"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["grant", "member:casey", "coach_essentials_kit"])
        .assert()
        .success();

    laxhq(&dir)
        .args(["capabilities", "casey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("academy tier: none"))
        .stdout(predicate::str::contains("practice_planner"));
}

#[test]
fn revoke_removes_access() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["member", "add", "jane", "--email", "jane@example.com"])
        .assert()
        .success();
    let output = laxhq(&dir)
        .args([
            "--json",
            "grant",
            "member:jane",
            "skills_academy_basic",
        ])
        .output()
        .unwrap();
    let granted: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = granted["id"].as_str().unwrap();

    laxhq(&dir).args(["revoke", id]).assert().success();
    laxhq(&dir)
        .args(["capabilities", "jane"])
        .assert()
        .success()
        .stdout(predicate::str::contains("academy tier: none"));
}

#[test]
fn capabilities_json_shape() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["member", "add", "jane", "--email", "jane@example.com"])
        .assert()
        .success();
    laxhq(&dir)
        .args(["grant", "member:jane", "skills_academy_basic"])
        .assert()
        .success();

    let output = laxhq(&dir)
        .args(["--json", "capabilities", "jane"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["member"], "jane");
    assert_eq!(json["academy_tier"], "basic");
    assert!(json["capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c == "limited_drills"));
}

// ---------------------------------------------------------------------------
// catalog
// ---------------------------------------------------------------------------

#[test]
fn catalog_list_and_validate() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args(["catalog", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("team_hq_activated"));
    laxhq(&dir)
        .args(["catalog", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12 products"));
    laxhq(&dir)
        .args(["catalog", "show", "club_os_growth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("team_hq_leadership"));
}

// ---------------------------------------------------------------------------
// import
// ---------------------------------------------------------------------------

#[test]
fn import_teams_and_rosters_from_csv() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    laxhq(&dir)
        .args([
            "member", "add", "jane",
            "--email", "jane@example.com",
            "--wordpress-id", "4821",
        ])
        .assert()
        .success();

    let csv = dir.path().join("groups.csv");
    std::fs::write(
        &csv,
        "ID,Title,Slug,learndash_group_users_1\n101,Varsity,varsity,\"a:1:{i:0;i:4821;}\"\n",
    )
    .unwrap();

    laxhq(&dir)
        .args(["import", "teams", "--csv", csv.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("created 1"));

    laxhq(&dir)
        .args(["import", "rosters", "--csv", csv.to_str().unwrap()])
        .assert()
        .success();

    laxhq(&dir)
        .args(["team", "roster", "varsity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jane"));

    laxhq(&dir)
        .args(["import", "log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("teams"))
        .stdout(predicate::str::contains("rosters"));
}

#[test]
fn import_with_bad_rows_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let csv = dir.path().join("groups.csv");
    std::fs::write(&csv, "ID,Title,Slug\nabc,Broken,broken\n").unwrap();

    laxhq(&dir)
        .args(["import", "teams", "--csv", csv.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ID"));
}

use anyhow::Context;
use laxhq_core::{catalog::Catalog, io, paths};
use std::path::Path;

/// Scaffold `.laxhq/` with its record directories and the built-in catalog.
/// Idempotent: an existing catalog.yaml is left alone.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    io::ensure_dir(&root.join(paths::MEMBERS_DIR))?;
    io::ensure_dir(&root.join(paths::TEAMS_DIR))?;
    io::ensure_dir(&root.join(paths::CLUBS_DIR))?;

    let catalog_yaml = serde_yaml::to_string(&Catalog::builtin())?;
    let written = io::write_if_missing(&paths::catalog_file(root), catalog_yaml.as_bytes())
        .context("failed to write catalog")?;

    if json {
        crate::output::print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "catalog_written": written,
        }))?;
    } else if written {
        println!("Initialized laxhq in {}", root.display());
    } else {
        println!("laxhq already initialized in {}", root.display());
    }
    Ok(())
}

use crate::output::print_json;
use laxhq_core::{capability::Capability, catalog::Catalog, paths, resolver};
use std::path::Path;

pub fn run(root: &Path, member: &str, check: Option<&str>, json: bool) -> anyhow::Result<()> {
    paths::require_initialized(root)?;
    let catalog = Catalog::load(root)?;
    let caps = resolver::member_capabilities(root, &catalog, member)?;

    if let Some(wanted) = check {
        let wanted: Capability = wanted.parse()?;
        if caps.result.has(wanted) {
            if !json {
                println!("'{member}' has {wanted}");
            }
            return Ok(());
        }
        anyhow::bail!("'{member}' does not have {wanted}");
    }

    if json {
        print_json(&caps)?;
        return Ok(());
    }

    println!("Capabilities for '{}'", caps.member);
    println!("  academy tier: {}", caps.result.academy_tier);
    if caps.result.capabilities.is_empty() {
        println!("  capabilities: (none)");
    } else {
        let list: Vec<String> = caps
            .result
            .capabilities
            .iter()
            .map(|c| c.to_string())
            .collect();
        println!("  capabilities: {}", list.join(", "));
    }
    if !caps.result.sources.is_empty() {
        println!("  sources:");
        for src in &caps.result.sources {
            match (&src.source_id, &src.source_name) {
                (Some(_), Some(name)) => {
                    println!("    {} via {} ({})", src.product, src.kind, name)
                }
                _ => println!("    {} ({})", src.product, src.kind),
            }
        }
    }
    if let Some(limits) = &caps.result.team_limits {
        println!(
            "  roster spot:  #{} of {} on '{}' ({})",
            limits.position,
            limits.current_players,
            limits.team_name,
            if limits.is_eligible {
                "academy-eligible"
            } else {
                "past academy cap"
            }
        );
    }
    for warning in &caps.result.warnings {
        println!("  warning: unknown product '{warning}'");
    }
    Ok(())
}

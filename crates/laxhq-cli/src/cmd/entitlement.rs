use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::{DateTime, Utc};
use laxhq_core::{
    catalog::Catalog,
    club::Club,
    entitlement::{Holder, Ledger},
    member::Member,
    paths,
    team::Team,
    LaxError,
};
use std::path::Path;

pub fn grant(
    root: &Path,
    holder: &str,
    product: &str,
    expires: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    paths::require_initialized(root)?;
    let holder: Holder = holder.parse()?;

    // Both ends of the grant must exist
    let catalog = Catalog::load(root)?;
    if !catalog.contains(product) {
        return Err(LaxError::UnknownProduct(product.to_string()).into());
    }
    match &holder {
        Holder::Member(id) => {
            Member::load(root, id)?;
        }
        Holder::Team(id) => {
            Team::load(root, id)?;
        }
        Holder::Club(id) => {
            Club::load(root, id)?;
        }
    }

    let expires_at = expires
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("invalid expiry timestamp '{s}'"))
        })
        .transpose()?;

    let mut ledger = Ledger::load(root)?;
    let ent = ledger.grant(holder, product, expires_at).clone();
    ledger.save(root)?;

    if json {
        print_json(&ent)?;
    } else {
        println!("Granted '{}' to {} ({})", ent.product, ent.holder, ent.id);
    }
    Ok(())
}

pub fn revoke(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    paths::require_initialized(root)?;
    let mut ledger = Ledger::load(root)?;
    let ent = ledger.revoke(id)?.clone();
    ledger.save(root)?;

    if json {
        print_json(&ent)?;
    } else {
        println!("Revoked '{}' from {}", ent.product, ent.holder);
    }
    Ok(())
}

pub fn list(root: &Path, holder: Option<&str>, json: bool) -> anyhow::Result<()> {
    paths::require_initialized(root)?;
    let ledger = Ledger::load(root)?;
    let filter = holder.map(|h| h.parse::<Holder>()).transpose()?;

    let entitlements: Vec<_> = ledger
        .entitlements
        .iter()
        .filter(|e| filter.as_ref().map_or(true, |h| &e.holder == h))
        .collect();

    if json {
        print_json(&entitlements)?;
    } else {
        let now = Utc::now();
        let rows: Vec<Vec<String>> = entitlements
            .iter()
            .map(|e| {
                vec![
                    e.id.clone(),
                    e.holder.to_string(),
                    e.product.clone(),
                    if e.is_active(now) { "active" } else { "inactive" }.to_string(),
                    e.expires_at
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ]
            })
            .collect();
        print_table(&["ID", "HOLDER", "PRODUCT", "STATUS", "EXPIRES"], &rows);
    }
    Ok(())
}

use crate::output::{print_json, print_table};
use clap::Subcommand;
use laxhq_core::{
    catalog::{Catalog, ProductKind},
    LaxError,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum CatalogSubcommand {
    /// List all products
    List,
    /// Show one product with its effective capabilities
    Show { id: String },
    /// Check catalog cross-references
    Validate,
}

pub fn run(root: &Path, subcmd: CatalogSubcommand, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::load(root)?;
    match subcmd {
        CatalogSubcommand::List => list(&catalog, json),
        CatalogSubcommand::Show { id } => show(&catalog, &id, json),
        CatalogSubcommand::Validate => validate(&catalog, json),
    }
}

fn kind_label(kind: &ProductKind) -> &'static str {
    match kind {
        ProductKind::Individual { .. } => "individual",
        ProductKind::Team { .. } => "team",
        ProductKind::Club { .. } => "club",
    }
}

fn list(catalog: &Catalog, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&catalog)?;
        return Ok(());
    }
    let rows: Vec<Vec<String>> = catalog
        .products()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                kind_label(&p.kind).to_string(),
                p.capabilities.len().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "TYPE", "CAPS"], &rows);
    Ok(())
}

fn show(catalog: &Catalog, id: &str, json: bool) -> anyhow::Result<()> {
    let product = catalog
        .get(id)
        .ok_or_else(|| LaxError::UnknownProduct(id.to_string()))?;
    if json {
        print_json(product)?;
        return Ok(());
    }

    println!("{} ({})", product.name, product.id);
    if let Some(desc) = &product.description {
        println!("  {desc}");
    }
    let caps: Vec<String> = product
        .effective_capabilities()
        .iter()
        .map(|c| c.to_string())
        .collect();
    println!("  capabilities: {}", caps.join(", "));
    match &product.kind {
        ProductKind::Individual { excludes, shareable } => {
            if !excludes.is_empty() {
                let ex: Vec<String> = excludes.iter().map(|c| c.to_string()).collect();
                println!("  excludes:     {}", ex.join(", "));
            }
            if *shareable {
                println!("  shareable with linked children");
            }
        }
        ProductKind::Team {
            coach_product,
            player_product,
            player_limit,
        } => {
            println!("  coach kit:    {coach_product}");
            println!("  player perk:  {player_product} (first {player_limit} players)");
        }
        ProductKind::Club { team_tier } => {
            println!("  cascades:     {team_tier} to every club team");
        }
    }
    Ok(())
}

fn validate(catalog: &Catalog, json: bool) -> anyhow::Result<()> {
    catalog.validate()?;
    if json {
        print_json(&serde_json::json!({ "valid": true, "products": catalog.len() }))?;
    } else {
        println!("Catalog OK ({} products)", catalog.len());
    }
    Ok(())
}

use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use laxhq_core::{member::Member, paths};
use laxhq_core::parent::ParentLinks;
use std::path::Path;

#[derive(Subcommand)]
pub enum MemberSubcommand {
    /// Add a member
    Add {
        /// Member id (lowercase, hyphens)
        id: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// WordPress user id (used by the roster import)
        #[arg(long)]
        wordpress_id: Option<u64>,
    },
    /// List members
    List,
    /// Show one member
    Show { id: String },
    /// Record a parent/child link
    LinkParent {
        /// Child member id
        child: String,
        /// Parent member id
        #[arg(long)]
        parent: String,
        /// Relationship label
        #[arg(long, default_value = "parent")]
        relationship: String,
    },
}

pub fn run(root: &Path, subcmd: MemberSubcommand, json: bool) -> anyhow::Result<()> {
    paths::require_initialized(root)?;
    match subcmd {
        MemberSubcommand::Add {
            id,
            email,
            name,
            wordpress_id,
        } => add(root, &id, &email, name, wordpress_id, json),
        MemberSubcommand::List => list(root, json),
        MemberSubcommand::Show { id } => show(root, &id, json),
        MemberSubcommand::LinkParent {
            child,
            parent,
            relationship,
        } => link_parent(root, &child, &parent, &relationship, json),
    }
}

fn add(
    root: &Path,
    id: &str,
    email: &str,
    name: Option<String>,
    wordpress_id: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let mut member = Member::create(root, id, email)
        .with_context(|| format!("failed to create member '{id}'"))?;
    if name.is_some() || wordpress_id.is_some() {
        member.display_name = name;
        member.wordpress_id = wordpress_id;
        member.save(root)?;
    }

    if json {
        print_json(&member)?;
    } else {
        println!("Added member '{}' <{}>", member.id, member.email);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let members = Member::list(root)?;
    if json {
        print_json(&members)?;
    } else {
        let rows: Vec<Vec<String>> = members
            .iter()
            .map(|m| {
                vec![
                    m.id.clone(),
                    m.email.clone(),
                    m.display_name.clone().unwrap_or_default(),
                    m.wordpress_id.map(|i| i.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        print_table(&["ID", "EMAIL", "NAME", "WP ID"], &rows);
    }
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let member = Member::load(root, id)?;
    if json {
        print_json(&member)?;
    } else {
        println!("{} <{}>", member.label(), member.email);
        println!("  id:         {}", member.id);
        if let Some(wp) = member.wordpress_id {
            println!("  wordpress:  {wp}");
        }
        println!("  created:    {}", member.created_at.to_rfc3339());
    }
    Ok(())
}

fn link_parent(
    root: &Path,
    child: &str,
    parent: &str,
    relationship: &str,
    json: bool,
) -> anyhow::Result<()> {
    // Both ends must exist before linking
    Member::load(root, child)?;
    Member::load(root, parent)?;

    let mut links = ParentLinks::load(root)?;
    let added = links.link(parent, child, relationship);
    links.save(root)?;

    if json {
        print_json(&serde_json::json!({
            "parent": parent,
            "child": child,
            "relationship": relationship,
            "added": added,
        }))?;
    } else if added {
        println!("Linked '{parent}' as {relationship} of '{child}'");
    } else {
        println!("'{parent}' is already linked to '{child}'");
    }
    Ok(())
}

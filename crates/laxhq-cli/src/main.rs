mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    catalog::CatalogSubcommand, club::ClubSubcommand, import::ImportSubcommand,
    member::MemberSubcommand, team::TeamSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "laxhq",
    about = "Membership, entitlement, and capability management for youth lacrosse clubs",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .laxhq/ or .git/)
    #[arg(long, global = true, env = "LAXHQ_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize laxhq in the current directory
    Init,

    /// Manage members
    Member {
        #[command(subcommand)]
        subcommand: MemberSubcommand,
    },

    /// Manage teams and rosters
    Team {
        #[command(subcommand)]
        subcommand: TeamSubcommand,
    },

    /// Manage clubs
    Club {
        #[command(subcommand)]
        subcommand: ClubSubcommand,
    },

    /// Grant a product to a member, team, or club
    Grant {
        /// Holder, e.g. member:jane, team:varsity, club:riverside
        holder: String,
        /// Product id from the catalog
        product: String,
        /// Expiry as RFC 3339, e.g. 2027-08-01T00:00:00Z
        #[arg(long)]
        expires: Option<String>,
    },

    /// Cancel an entitlement by id
    Revoke { id: String },

    /// List entitlements, optionally for one holder
    Entitlements {
        /// Holder filter, e.g. member:jane
        holder: Option<String>,
    },

    /// Show a member's computed capabilities
    Capabilities {
        /// Member id
        member: String,
        /// Exit non-zero unless this capability is present
        #[arg(long)]
        check: Option<String>,
    },

    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },

    /// Import teams and rosters from WordPress/LearnDash
    Import {
        #[command(subcommand)]
        subcommand: ImportSubcommand,
    },

    /// Run the JSON API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "7425")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Member { subcommand } => cmd::member::run(&root, subcommand, cli.json),
        Commands::Team { subcommand } => cmd::team::run(&root, subcommand, cli.json),
        Commands::Club { subcommand } => cmd::club::run(&root, subcommand, cli.json),
        Commands::Grant {
            holder,
            product,
            expires,
        } => cmd::entitlement::grant(&root, &holder, &product, expires.as_deref(), cli.json),
        Commands::Revoke { id } => cmd::entitlement::revoke(&root, &id, cli.json),
        Commands::Entitlements { holder } => {
            cmd::entitlement::list(&root, holder.as_deref(), cli.json)
        }
        Commands::Capabilities { member, check } => {
            cmd::capabilities::run(&root, &member, check.as_deref(), cli.json)
        }
        Commands::Catalog { subcommand } => cmd::catalog::run(&root, subcommand, cli.json),
        Commands::Import { subcommand } => cmd::import::run(&root, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

//! Point d'entrée CLI pour dzialka-export

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::{Commands, ExportArgs};
use dzialka_export::report::ExportStatus;

/// Exporter des parcelles cadastrales (ULDK) vers GeoPackage, KML ou GeoJSON
#[derive(Parser)]
#[command(name = "dzialka-export")]
#[command(author, version)]
#[command(about = "Exporter des parcelles cadastrales polonaises vers GeoPackage (défaut), KML ou GeoJSON")]
#[command(long_about = "Lit des lignes de recherche ULDK (`<wkt>|<id>`), reprojette les contours en WGS84 \
et écrit les couches demandées (contours et/ou points limites).\n\n\
Utilisez 'info' pour afficher le moteur SQLite et les projections disponibles.")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Sous-commande (défaut: export)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments de l'export (commande par défaut)
    #[command(flatten)]
    export: Option<ExportArgs>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Info) => cli::cmd_info().await?,
        None => {
            let args = cli.export.context("Export arguments required (--input)")?;
            info!(input = %args.input.display(), "Export");

            let report = cli::cmd_export(&args).await?;
            if !cli.quiet {
                report.display();
            }
            if report.status == ExportStatus::Failed {
                anyhow::bail!("Export failed: {}", report.summary());
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}

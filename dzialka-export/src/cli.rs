//! Définition et implémentation des commandes CLI
//!
//! - défaut : lignes ULDK (`<wkt>|<id>`) → GeoPackage / KML / GeoJSON
//! - `info` : moteur SQLite et projections disponibles

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use dzialka::{LookupResult, ParcelList, Project};
use tracing::{debug, info, warn};

use dzialka_export::config::ExportConfig;
use dzialka_export::export::{self, export_file_name, ExportFormat, GpkgEngine};
use dzialka_export::report::ExportReport;
use dzialka_export::reproject_lite::SmartReprojector;

#[derive(Subcommand)]
pub enum Commands {
    /// Show GeoPackage engine and projection support
    Info,
}

/// Arguments de l'export (commande par défaut)
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Text file with one lookup line per parcel: `<wkt>|<id>`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory (défaut : config, env DZIALKA_OUTPUT_DIR, puis ".")
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format, repeatable: gpkg, kml, geojson
    #[arg(short, long = "format", value_delimiter = ',')]
    pub formats: Vec<ExportFormat>,

    /// Export the parcel polygons layer
    #[arg(long)]
    pub polygons: bool,

    /// Export the boundary points layer
    #[arg(long)]
    pub points: bool,

    /// EPSG of the input coordinates (défaut : 2180)
    #[arg(long)]
    pub srid: Option<u32>,

    /// Path to a JSON config file
    #[arg(long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Config preset name (full/polygons/points)
    #[arg(long)]
    pub preset: Option<String>,

    /// Save the export report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Construit la configuration effective : fichier ou preset, env, puis arguments
pub fn resolve_config(args: &ExportArgs) -> Result<ExportConfig> {
    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => ExportConfig::load(path)?,
        (None, Some(preset)) => ExportConfig::from_preset(preset)?,
        (None, None) => ExportConfig::default(),
    };

    config.apply_env_overrides()?;

    if let Some(srid) = args.srid {
        config.source_epsg = srid;
    }
    if let Some(ref output) = args.output {
        config.output_dir = output.clone();
    }
    if !args.formats.is_empty() {
        config.formats = args.formats.clone();
    }
    // Les drapeaux de couche remplacent la config dès que l'un est présent
    if args.polygons || args.points {
        config.include_polygons = args.polygons;
        config.include_points = args.points;
    }

    if !config.include_polygons && !config.include_points {
        anyhow::bail!("No layer selected. Use --polygons and/or --points");
    }
    if config.formats.is_empty() {
        anyhow::bail!("No output format. Use --format gpkg|kml|geojson");
    }

    let mut seen = HashSet::new();
    config.formats.retain(|format| seen.insert(*format));
    Ok(config)
}

/// Exécute l'export
pub async fn cmd_export(args: &ExportArgs) -> Result<ExportReport> {
    let start = Instant::now();
    let config = resolve_config(args)?;
    let options = config.options();

    let projection = SmartReprojector::new(config.source_epsg)?;
    info!(
        source_epsg = config.source_epsg,
        reprojector = projection.description(),
        "Projection ready"
    );

    let content = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let mut report = ExportReport::new(&args.input.display().to_string());
    let parcels = select_parcels(&content, &projection, &mut report);

    println!("=== Export ===");
    println!("Input: {}", args.input.display());
    println!("Source EPSG: {}", config.source_epsg);
    println!(
        "Layers: polygons={} points={}",
        options.include_polygons, options.include_points
    );
    println!("Parcels selected: {}", parcels.len());

    if parcels.is_empty() {
        warn!("No valid parcel in input, nothing to export");
    } else {
        if let Some(bounds) = parcels.bounds() {
            debug!(
                min_x = bounds.min_x,
                min_y = bounds.min_y,
                max_x = bounds.max_x,
                max_y = bounds.max_y,
                "Selection bounds"
            );
        }
        let date = chrono::Local::now().date_naive();
        write_exports(&parcels, &config, date, &mut report).await?;
    }

    report.set_duration(start.elapsed());
    report.finalize(parcels.len());

    if let Some(ref path) = args.report {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }

    Ok(report)
}

/// Décode les lignes de recherche en sélection de parcelles
///
/// Une ligne invalide est journalisée puis ignorée ; la sélection reste cohérente.
pub fn select_parcels(content: &str, projection: &impl Project, report: &mut ExportReport) -> ParcelList {
    let mut parcels = ParcelList::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        report.record_line();

        let Some(result) = LookupResult::parse_line(line) else {
            warn!(line = line_number, "Missing '|' separator or empty field, line skipped");
            report.record_error(line_number, None, "Expected '<wkt>|<id>'");
            continue;
        };

        if parcels.get(&result.id).is_some() {
            debug!(line = line_number, parcel_id = %result.id, "Duplicate parcel id");
            report.record_duplicate();
            continue;
        }

        if let Err(e) = parcels.add(&result, projection) {
            report.record_error(line_number, Some(&result.id), e.to_string());
        }
    }

    parcels
}

/// Écrit un fichier par format demandé
async fn write_exports(
    parcels: &ParcelList,
    config: &ExportConfig,
    date: NaiveDate,
    report: &mut ExportReport,
) -> Result<()> {
    let options = config.options();
    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let engine = GpkgEngine::new();

    for &format in &config.formats {
        let bytes = match format {
            ExportFormat::Gpkg => engine.export_layers(parcels.as_slice(), options).await?,
            ExportFormat::Kml => export::kml::export_layers(parcels.as_slice(), options)?.into_bytes(),
            ExportFormat::Geojson => {
                export::geojson::export_layers(parcels.as_slice(), options)?.into_bytes()
            }
        };

        let path = config.output_dir.join(export_file_name(options, format, date));
        write_file(&path, &bytes).await?;
        report.record_file(format, &path, bytes.len());

        info!(format = %format, path = %path.display(), bytes = bytes.len(), "File written");
    }

    Ok(())
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Affiche les capacités du moteur et des projections
pub async fn cmd_info() -> Result<()> {
    let engine = GpkgEngine::new();
    let info = engine.ready().await?;

    println!("SQLite: {}", info.sqlite_version);
    println!("Grids (pure Rust): EPSG:2180, EPSG:2176-2179, EPSG:4326");
    println!(
        "PROJ fallback: {}",
        if export::reproject::is_available() {
            "enabled"
        } else {
            "disabled (build with --features reproject)"
        }
    );

    Ok(())
}

//! Configuration de l'export
//!
//! Ordre de priorité : arguments CLI > variables d'environnement > fichier JSON
//! ou preset > valeurs par défaut.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::export::{ExportFormat, ExportOptions};

/// Variable d'environnement : EPSG des coordonnées source
pub const ENV_SOURCE_EPSG: &str = "DZIALKA_SOURCE_EPSG";

/// Variable d'environnement : répertoire de sortie
pub const ENV_OUTPUT_DIR: &str = "DZIALKA_OUTPUT_DIR";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExportConfig {
    /// EPSG des WKT reçus (ULDK renvoie du PL-1992)
    #[serde(default = "default_source_epsg")]
    pub source_epsg: u32,

    /// Répertoire des fichiers produits
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_true")]
    pub include_polygons: bool,

    #[serde(default)]
    pub include_points: bool,

    /// Formats à produire
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,
}

fn default_source_epsg() -> u32 {
    2180
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_formats() -> Vec<ExportFormat> {
    vec![ExportFormat::Gpkg]
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source_epsg: default_source_epsg(),
            output_dir: default_output_dir(),
            include_polygons: true,
            include_points: false,
            formats: default_formats(),
        }
    }
}

impl ExportConfig {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "full" => Self::load_embedded(include_str!("presets/full.json")),
            "polygons" => Self::load_embedded(include_str!("presets/polygons.json")),
            "points" => Self::load_embedded(include_str!("presets/points.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: full, polygons, points", preset),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Applique `DZIALKA_SOURCE_EPSG` et `DZIALKA_OUTPUT_DIR`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(epsg) = lookup(ENV_SOURCE_EPSG) {
            self.source_epsg = epsg
                .trim()
                .parse()
                .context(format!("Invalid {}: {}", ENV_SOURCE_EPSG, epsg))?;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Couches demandées
    pub fn options(&self) -> ExportOptions {
        ExportOptions::new(self.include_polygons, self.include_points)
    }
}

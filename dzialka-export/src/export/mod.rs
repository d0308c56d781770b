//! Modules d'export (GeoPackage, KML, GeoJSON)

pub mod error;
pub mod geojson;
pub mod gpkg;
pub mod kml;
pub mod naming;
pub mod reproject;
pub mod wkb;

use serde::{Deserialize, Serialize};

pub use error::ExportError;
pub use gpkg::{GpkgEngine, Layer};
pub use naming::{export_file_name, ExportFormat};
pub use reproject::Reprojector;
pub use wkb::EncodeError;

/// Couches à exporter
///
/// Au moins une couche devrait être demandée ; ce n'est pas vérifié ici.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Contours des parcelles
    pub include_polygons: bool,

    /// Sommets des contours (points limites)
    pub include_points: bool,
}

impl ExportOptions {
    pub fn new(include_polygons: bool, include_points: bool) -> Self {
        Self {
            include_polygons,
            include_points,
        }
    }

    pub fn both() -> Self {
        Self::new(true, true)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new(true, false)
    }
}

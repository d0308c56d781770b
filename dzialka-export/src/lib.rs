//! # dzialka-export
//!
//! Export de parcelles cadastrales polonaises (réponses ULDK) vers des
//! formats SIG.
//!
//! ## Features
//!
//! - GeoPackage 1.3 (SQLite via rusqlite, en mémoire puis sérialisé)
//! - KML 2.2 (quick-xml)
//! - GeoJSON (crate geojson)
//! - Reprojection PL-1992 / PL-2000 → WGS84 en Rust pur, PROJ en option
//!
//! ## Usage CLI
//!
//! ```bash
//! # Contours et points limites, trois formats
//! dzialka-export --input parcels.txt --output ./out --polygons --points -f gpkg,kml,geojson
//!
//! # Preset embarqué
//! dzialka-export --input parcels.txt --preset points
//! ```

pub mod config;
pub mod export;
pub mod report;
pub mod reproject_lite;

pub use config::ExportConfig;
pub use export::{ExportError, ExportFormat, ExportOptions, GpkgEngine};
pub use report::{ExportReport, ExportStatus};

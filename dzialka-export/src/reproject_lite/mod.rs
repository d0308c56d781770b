//! Reprojection légère en Rust pur (sans dépendances externes)
//!
//! Supporte les grilles du cadastre polonais vers WGS84 (EPSG:4326) :
//! - PL-1992 (EPSG:2180) - grille nationale, celle des réponses ULDK
//! - PL-2000 zones 5 à 8 (EPSG:2176, 2177, 2178, 2179)
//! - WGS84 (EPSG:4326) - identité

mod ellipsoid;
mod smart;
mod tm;

pub use smart::SmartReprojector;
pub use tm::TransverseMercator;

use anyhow::{bail, Result};
use dzialka::{Coordinate, Project};

/// EPSG de la grille PL-1992
pub const EPSG_PL_1992: u32 = 2180;

/// EPSG de WGS84
pub const EPSG_WGS84: u32 = 4326;

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés (longitude, latitude)
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }
}

/// Reprojection d'une grille polonaise vers WGS84
#[derive(Debug, Clone, Copy)]
pub struct GridProjection {
    source_epsg: u32,
    /// `None` pour une source déjà en WGS84
    grid: Option<TransverseMercator>,
}

impl GridProjection {
    /// Crée la projection ; un EPSG non supporté échoue ici, jamais point par point
    pub fn new(source_epsg: u32) -> Result<Self> {
        let grid = match source_epsg {
            EPSG_WGS84 => None,
            EPSG_PL_1992 => Some(TransverseMercator::pl_1992()),
            // 2176 = zone 5 ... 2179 = zone 8
            2176..=2179 => TransverseMercator::pl_2000(source_epsg - 2171),
            _ => bail!(
                "EPSG:{} non supporté. Sources supportées: 2180, 2176, 2177, 2178, 2179, 4326",
                source_epsg
            ),
        };

        Ok(Self { source_epsg, grid })
    }

    /// Vérifie si l'EPSG source est supporté
    pub fn is_supported(epsg: u32) -> bool {
        matches!(epsg, EPSG_WGS84 | EPSG_PL_1992 | 2176..=2179)
    }

    /// Retourne le SRID source
    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    /// Transforme (easting, northing) en (longitude, latitude) en degrés
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        match &self.grid {
            Some(grid) => grid.to_geographic(x, y).to_degrees(),
            None => (x, y),
        }
    }
}

impl Project for GridProjection {
    fn project(&self, x: f64, y: f64) -> Coordinate {
        let (lng, lat) = self.transform_point(x, y);
        Coordinate { lat, lng }
    }
}

//! Reprojection intelligente : reproject_lite en priorité, fallback sur proj
//!
//! Utilise automatiquement la meilleure option disponible.

use super::GridProjection;
use anyhow::Result;
use dzialka::{Coordinate, Project};

/// Reprojection intelligente vers WGS84
///
/// Essaie d'abord reproject_lite (pure Rust), puis fallback sur proj si disponible.
pub enum SmartReprojector {
    /// Grilles polonaises (pure Rust)
    Lite(GridProjection),
    /// Reprojection via PROJ (si feature activée)
    #[cfg(feature = "reproject")]
    Proj(crate::export::reproject::Reprojector),
}

impl SmartReprojector {
    /// Crée un reprojector depuis l'EPSG source
    pub fn new(source_epsg: u32) -> Result<Self> {
        if GridProjection::is_supported(source_epsg) {
            return Ok(Self::Lite(GridProjection::new(source_epsg)?));
        }

        #[cfg(feature = "reproject")]
        {
            let proj =
                crate::export::reproject::Reprojector::new(source_epsg, super::EPSG_WGS84)?;
            return Ok(Self::Proj(proj));
        }

        #[cfg(not(feature = "reproject"))]
        anyhow::bail!(
            "Reprojection EPSG:{} → EPSG:4326 non supportée.\n\
             Projections supportées (reproject_lite) : 2180 (PL-1992), 2176-2179 (PL-2000), 4326\n\
             Pour d'autres projections, compilez avec: cargo build --features reproject",
            source_epsg
        );
    }

    /// Retourne une description du reprojector utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Lite(_) => "reproject_lite (pure Rust)",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }
}

impl Project for SmartReprojector {
    fn project(&self, x: f64, y: f64) -> Coordinate {
        match self {
            Self::Lite(grid) => grid.project(x, y),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.project(x, y),
        }
    }
}

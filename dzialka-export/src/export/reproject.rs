//! Reprojection de coordonnées avec PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.
//! Il sert de repli pour les EPSG non couverts par `reproject_lite`.

#[cfg(feature = "reproject")]
use anyhow::{Context, Result};
#[cfg(feature = "reproject")]
use dzialka::{Coordinate, Project};
#[cfg(feature = "reproject")]
use proj::Proj;
#[cfg(feature = "reproject")]
use tracing::warn;

/// Reprojection entre deux systèmes de coordonnées
#[cfg(feature = "reproject")]
pub struct Reprojector {
    proj: Proj,
    source_epsg: u32,
    target_epsg: u32,
}

#[cfg(feature = "reproject")]
impl Reprojector {
    /// Crée un nouveau reprojector entre deux EPSG
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
        let source = format!("EPSG:{}", source_epsg);
        let target = format!("EPSG:{}", target_epsg);

        // new_known_crs normalise l'ordre des axes : (easting, northing) -> (lon, lat)
        let proj = Proj::new_known_crs(&source, &target, None).context(format!(
            "Failed to create projection from {} to {}",
            source, target
        ))?;

        Ok(Self {
            proj,
            source_epsg,
            target_epsg,
        })
    }

    /// Retourne le SRID source
    pub fn source_epsg(&self) -> u32 {
        self.source_epsg
    }

    /// Retourne le SRID cible
    pub fn target_epsg(&self) -> u32 {
        self.target_epsg
    }

    /// Transforme une coordonnée unique
    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.proj
            .convert((x, y))
            .context("Coordinate transformation failed")
    }
}

/// Un échec PROJ produit une coordonnée NaN, rejetée ensuite par le décodeur
#[cfg(feature = "reproject")]
impl Project for Reprojector {
    fn project(&self, x: f64, y: f64) -> Coordinate {
        match self.transform_point(x, y) {
            Ok((lng, lat)) => Coordinate { lat, lng },
            Err(e) => {
                warn!(x, y, error = %e, "PROJ transformation failed");
                Coordinate {
                    lat: f64::NAN,
                    lng: f64::NAN,
                }
            }
        }
    }
}


/// Vérifie si la reprojection PROJ est disponible
pub fn is_available() -> bool {
    cfg!(feature = "reproject")
}

// Implémentation factice quand le feature reproject est désactivé
#[cfg(not(feature = "reproject"))]
use anyhow::{bail, Result};

/// Reprojector factice - pas de reprojection disponible
#[cfg(not(feature = "reproject"))]
pub struct Reprojector;

#[cfg(not(feature = "reproject"))]
impl Reprojector {
    /// Tente de créer un reprojector - échoue toujours sans la feature
    pub fn new(source_epsg: u32, target_epsg: u32) -> Result<Self> {
        if source_epsg == target_epsg {
            Ok(Self)
        } else {
            bail!(
                "Reprojection from EPSG:{} to EPSG:{} requires the 'reproject' feature. \
                 Build with: cargo build --features reproject",
                source_epsg,
                target_epsg
            )
        }
    }
}

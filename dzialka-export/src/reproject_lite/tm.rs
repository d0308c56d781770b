//! Transverse Mercator inverse sur GRS80
//!
//! Grilles supportées :
//! - PL-1992 (EPSG:2180) : méridien 19°E, k0 = 0.9993
//! - PL-2000 zones 5 à 8 (EPSG:2176-2179) : méridiens 15/18/21/24°E, k0 = 0.999923

use super::ellipsoid::GRS80;
use super::Geographic;

/// Paramètres d'une grille Transverse Mercator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    /// Méridien central (radians)
    lon0: f64,
    /// Facteur d'échelle sur le méridien central
    k0: f64,
    /// False easting
    x0: f64,
    /// False northing
    y0: f64,
}

impl TransverseMercator {
    /// PL-1992 (EPSG:2180)
    pub fn pl_1992() -> Self {
        Self {
            lon0: 19.0_f64.to_radians(),
            k0: 0.9993,
            x0: 500000.0,
            y0: -5300000.0,
        }
    }

    /// PL-2000, zone 5 à 8 (EPSG:2176 à 2179)
    pub fn pl_2000(zone: u32) -> Option<Self> {
        if !(5..=8).contains(&zone) {
            return None;
        }
        Some(Self {
            lon0: (zone as f64 * 3.0).to_radians(),
            k0: 0.999923,
            x0: zone as f64 * 1_000_000.0 + 500000.0,
            y0: 0.0,
        })
    }

    /// Convertit (easting, northing) en coordonnées géographiques
    pub fn to_geographic(&self, easting: f64, northing: f64) -> Geographic {
        let a = GRS80::A;
        let e2 = GRS80::E2;
        let ep2 = GRS80::EP2;

        // Coordonnées réduites
        let x = easting - self.x0;
        let y = northing - self.y0;

        // Latitude du pied de la perpendiculaire
        let m = y / self.k0;
        let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let n1 = a / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
        let t1 = tan_phi1.powi(2);
        let c1 = ep2 * cos_phi1.powi(2);
        let r1 = a * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
        let d = x / (n1 * self.k0);

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                        - 252.0 * ep2
                        - 3.0 * c1.powi(2))
                        * d.powi(6)
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                    * d.powi(5)
                    / 120.0)
                / cos_phi1;

        Geographic::new(lon, lat)
    }
}

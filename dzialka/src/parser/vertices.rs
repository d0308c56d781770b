//! Extraction des sommets du contour extérieur

use std::collections::HashSet;

use crate::types::{Coordinate, Geometry, Ring};

/// Précision de la clé de dédoublonnage (décimales)
const DEDUP_DECIMALS: i32 = 8;

/// Sommets du contour extérieur, sans le point de fermeture ni les doublons
///
/// Les trous sont ignorés. Pour un MultiPolygon, le dédoublonnage se fait par
/// sous-polygone : un sommet partagé par deux sous-polygones apparaît deux fois.
pub fn extract_vertices(geometry: &Geometry) -> Vec<Coordinate> {
    match geometry {
        Geometry::Polygon { rings } => outer_ring_vertices(rings),
        Geometry::MultiPolygon { polygons } => polygons
            .iter()
            .flat_map(|rings| outer_ring_vertices(rings))
            .collect(),
    }
}

fn outer_ring_vertices(rings: &[Ring]) -> Vec<Coordinate> {
    let Some(outer) = rings.first() else {
        return Vec::new();
    };
    let open = &outer[..outer.len().saturating_sub(1)];

    let mut seen = HashSet::with_capacity(open.len());
    open.iter()
        .filter(|c| seen.insert(dedup_key(c)))
        .copied()
        .collect()
}

fn dedup_key(coord: &Coordinate) -> (i64, i64) {
    let factor = 10f64.powi(DEDUP_DECIMALS);
    (
        (coord.lat * factor).round() as i64,
        (coord.lng * factor).round() as i64,
    )
}

//! Point d'injection de la reprojection
//!
//! Le décodeur ne connaît pas la projection source : il reçoit une fonction
//! pure `(x, y) -> Coordinate` appelée une fois par paire de coordonnées.

use crate::types::Coordinate;

/// Reprojection d'une paire (x, y) du système source vers WGS84
pub trait Project {
    fn project(&self, x: f64, y: f64) -> Coordinate;
}

impl<F> Project for F
where
    F: Fn(f64, f64) -> Coordinate,
{
    fn project(&self, x: f64, y: f64) -> Coordinate {
        self(x, y)
    }
}

/// Coordonnées déjà en WGS84 : x = longitude, y = latitude
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Project for Identity {
    fn project(&self, x: f64, y: f64) -> Coordinate {
        Coordinate { lat: y, lng: x }
    }
}

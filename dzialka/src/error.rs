//! Types d'erreurs pour le crate dzialka

use thiserror::Error;

/// Erreurs de décodage d'une géométrie textuelle (WKT)
///
/// Une parcelle est entièrement construite ou pas du tout : aucune de ces erreurs
/// ne laisse de décodage partiel.
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    /// Entrée vide
    #[error("Empty geometry text")]
    Empty,

    /// Préfixe `SRID=<n>;` mal formé
    #[error("Invalid SRID prefix: {0}")]
    InvalidSrid(String),

    /// Mot-clé de géométrie non supporté (seuls POLYGON et MULTIPOLYGON le sont)
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// Parenthésage incompatible avec le type de géométrie
    #[error("Malformed {geometry}: {reason}")]
    Malformed {
        geometry: &'static str,
        reason: String,
    },

    /// Paire de coordonnées illisible
    #[error("Invalid coordinate pair: '{0}'")]
    InvalidCoordinate(String),

    /// Ring trop court ou non fermé
    #[error("Invalid ring #{ring}: {reason}")]
    InvalidRing { ring: usize, reason: String },
}

impl FormatError {
    /// Crée une erreur de parenthésage avec contexte
    pub fn malformed(geometry: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            geometry,
            reason: reason.into(),
        }
    }

    /// Crée une erreur de ring invalide
    pub fn invalid_ring(ring: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRing {
            ring,
            reason: reason.into(),
        }
    }
}

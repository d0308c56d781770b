//! Erreurs d'export

use thiserror::Error;

use super::wkb::EncodeError;

/// Erreurs pouvant survenir pendant un export
///
/// Un export échoué ne produit aucun fichier partiel.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Erreur du moteur SQLite (création de table, insertion, sérialisation)
    #[error("GeoPackage engine error: {0}")]
    Engine(#[from] rusqlite::Error),

    /// Le moteur n'a pas pu être initialisé
    #[error("GeoPackage engine initialisation failed: {0}")]
    EngineInit(String),

    /// Géométrie refusée par l'encodeur binaire
    #[error("Geometry encoding failed for parcel {parcel_id}: {source}")]
    Encoding {
        parcel_id: String,
        #[source]
        source: EncodeError,
    },

    /// Erreur d'écriture XML
    #[error("XML write error: {0}")]
    Xml(String),

    /// Erreur de sérialisation JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn xml<E: std::fmt::Display>(e: E) -> Self {
        Self::Xml(e.to_string())
    }
}

//! Sélection de parcelles accumulée pendant la session

use tracing::{debug, warn};

use crate::parser::{vertices, wkt};
use crate::project::Project;
use crate::types::{Envelope, LookupResult, Parcel};
use crate::FormatError;

impl Parcel {
    /// Construit une parcelle depuis une réponse du service de recherche
    pub fn from_lookup(result: &LookupResult, projection: &impl Project) -> Result<Self, FormatError> {
        let geometry = wkt::decode(&result.wkt, projection)?;
        let vertices = vertices::extract_vertices(&geometry);

        Ok(Self {
            id: result.id.clone(),
            source_text: result.wkt.clone(),
            geometry,
            vertices,
        })
    }
}

/// Liste ordonnée des parcelles sélectionnées
#[derive(Debug, Clone, Default)]
pub struct ParcelList {
    parcels: Vec<Parcel>,
}

impl ParcelList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Décode et ajoute une parcelle
    ///
    /// En cas d'erreur de décodage, la liste n'est pas modifiée. Une parcelle déjà
    /// sélectionnée n'est pas dupliquée : l'entrée existante est retournée.
    pub fn add(
        &mut self,
        result: &LookupResult,
        projection: &impl Project,
    ) -> Result<&Parcel, FormatError> {
        if let Some(index) = self.position(&result.id) {
            debug!(parcel_id = %result.id, "Parcel already selected");
            return Ok(&self.parcels[index]);
        }

        let parcel = Parcel::from_lookup(result, projection).inspect_err(|e| {
            warn!(parcel_id = %result.id, error = %e, "Failed to decode parcel geometry");
        })?;

        debug!(
            parcel_id = %parcel.id,
            geometry = parcel.geometry.type_name(),
            vertices = parcel.vertices.len(),
            "Parcel added"
        );
        self.parcels.push(parcel);
        Ok(&self.parcels[self.parcels.len() - 1])
    }

    /// Retire une parcelle par identifiant
    pub fn remove(&mut self, id: &str) -> Option<Parcel> {
        let index = self.position(id)?;
        Some(self.parcels.remove(index))
    }

    pub fn clear(&mut self) {
        self.parcels.clear();
    }

    pub fn get(&self, id: &str) -> Option<&Parcel> {
        self.parcels.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parcel> {
        self.parcels.iter()
    }

    pub fn as_slice(&self) -> &[Parcel] {
        &self.parcels
    }

    /// Emprise de tous les sommets sélectionnés (cadrage de la carte)
    pub fn bounds(&self) -> Option<Envelope> {
        let envelope = Envelope::of_coords(self.parcels.iter().flat_map(|p| p.vertices.iter()));
        (!envelope.is_empty()).then_some(envelope)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.parcels.iter().position(|p| p.id == id)
    }
}

impl<'a> IntoIterator for &'a ParcelList {
    type Item = &'a Parcel;
    type IntoIter = std::slice::Iter<'a, Parcel>;

    fn into_iter(self) -> Self::IntoIter {
        self.parcels.iter()
    }
}

//! # dzialka
//!
//! Modèle géométrique et décodeur WKT pour les parcelles cadastrales polonaises
//! (réponses du service ULDK).
//!
//! ## Features
//!
//! - Décodage POLYGON / MULTIPOLYGON avec préfixe `SRID=<n>;` optionnel
//! - Reprojection injectée point par point (trait [`Project`])
//! - Extraction des sommets du contour extérieur, dédoublonnés
//! - Sélection de session atomique ([`ParcelList`])
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust
//! use dzialka::{Identity, LookupResult, ParcelList};
//!
//! let mut selection = ParcelList::new();
//! let result = LookupResult::new("POLYGON((19 50,19.1 50,19.1 50.1,19 50))", "141201_1.0001.6509");
//! let parcel = selection.add(&result, &Identity)?;
//! assert_eq!(parcel.vertices.len(), 3);
//! # Ok::<(), dzialka::FormatError>(())
//! ```

pub mod error;
pub mod parser;
pub mod project;
pub mod selection;
pub mod types;

pub use error::FormatError;
pub use parser::vertices::extract_vertices;
pub use parser::wkt::{decode, decode_with_srid};
pub use project::{Identity, Project};
pub use selection::ParcelList;
pub use types::{Coordinate, Envelope, Geometry, LookupResult, Parcel, Ring};

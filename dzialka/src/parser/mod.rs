//! Parsers : géométrie WKT et extraction des sommets

pub mod vertices;
pub mod wkt;

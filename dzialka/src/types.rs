//! Types de données pour le crate dzialka

use geo::{Coord, LineString, MultiPolygon, Polygon};

/// Coordonnée géographique WGS84 en degrés
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude (Y)
    pub lat: f64,
    /// Longitude (X)
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Ring fermé : le premier et le dernier point sont identiques
pub type Ring = Vec<Coordinate>;

/// Géométrie d'une parcelle
///
/// Le premier ring d'un polygone est le contour extérieur, les suivants sont des trous.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon { rings: Vec<Ring> },
    MultiPolygon { polygons: Vec<Vec<Ring>> },
}

impl Geometry {
    /// Nom WKT du type de géométrie
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Polygon { .. } => "POLYGON",
            Geometry::MultiPolygon { .. } => "MULTIPOLYGON",
        }
    }

    /// Ensembles de rings de chaque polygone (un seul pour un Polygon)
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Geometry::Polygon { rings } => vec![rings.as_slice()],
            Geometry::MultiPolygon { polygons } => polygons.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Itère sur toutes les coordonnées de tous les rings (trous compris)
    pub fn coords(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.polygons()
            .into_iter()
            .flat_map(|rings| rings.iter())
            .flat_map(|ring| ring.iter())
    }

    /// Conversion vers les types `geo` (x = longitude, y = latitude)
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            Geometry::Polygon { rings } => geo::Geometry::Polygon(rings_to_geo(rings)),
            Geometry::MultiPolygon { polygons } => geo::Geometry::MultiPolygon(MultiPolygon::new(
                polygons.iter().map(|rings| rings_to_geo(rings)).collect(),
            )),
        }
    }
}

fn rings_to_geo(rings: &[Ring]) -> Polygon<f64> {
    let mut line_strings = rings.iter().map(|ring| {
        LineString::new(
            ring.iter()
                .map(|c| Coord { x: c.lng, y: c.lat })
                .collect(),
        )
    });
    let exterior = line_strings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, line_strings.collect())
}

/// Une parcelle cadastrale décodée
///
/// Construite une seule fois après la réponse du service de recherche, immuable ensuite.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    /// Identifiant cadastral (ex: "141201_1.0001.6509")
    pub id: String,

    /// Géométrie textuelle d'origine
    pub source_text: String,

    /// Géométrie structurée en WGS84
    pub geometry: Geometry,

    /// Sommets du contour extérieur, dédoublonnés
    pub vertices: Vec<Coordinate>,
}

/// Réponse brute du service de recherche de parcelles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    /// Géométrie textuelle, éventuellement préfixée par `SRID=<n>;`
    pub wkt: String,

    /// Identifiant cadastral
    pub id: String,
}

impl LookupResult {
    pub fn new(wkt: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            wkt: wkt.into(),
            id: id.into(),
        }
    }

    /// Lit une ligne au format texte du service : `<wkt>|<id>`
    pub fn parse_line(line: &str) -> Option<Self> {
        let (wkt, id) = line.trim().rsplit_once('|')?;
        let (wkt, id) = (wkt.trim(), id.trim());
        if wkt.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self::new(wkt, id))
    }
}

/// Boîte englobante (X = longitude, Y = latitude)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    /// Envelope vide : neutre pour `expand` et `merge`
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Envelope dégénérée d'un point
    pub fn of_point(coord: &Coordinate) -> Self {
        Self {
            min_x: coord.lng,
            min_y: coord.lat,
            max_x: coord.lng,
            max_y: coord.lat,
        }
    }

    /// Envelope de toutes les coordonnées fournies
    pub fn of_coords<'a>(coords: impl IntoIterator<Item = &'a Coordinate>) -> Self {
        let mut envelope = Self::empty();
        for coord in coords {
            envelope.expand(coord);
        }
        envelope
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn expand(&mut self, coord: &Coordinate) {
        self.min_x = self.min_x.min(coord.lng);
        self.min_y = self.min_y.min(coord.lat);
        self.max_x = self.max_x.max(coord.lng);
        self.max_y = self.max_y.max(coord.lat);
    }

    pub fn merge(&mut self, other: &Envelope) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_envelope_expand_and_merge() {
        let mut env = Envelope::of_coords(&square());
        assert_eq!(env.min_x, 0.0);
        assert_eq!(env.max_x, 1.0);
        assert_eq!(env.max_y, 1.0);

        env.merge(&Envelope::of_point(&Coordinate::new(-2.0, 5.0)));
        assert_eq!(env.min_y, -2.0);
        assert_eq!(env.max_x, 5.0);

        let before = env;
        env.merge(&Envelope::empty());
        assert_eq!(env, before);
    }

    #[test]
    fn test_empty_envelope() {
        assert!(Envelope::empty().is_empty());
        assert!(!Envelope::of_point(&Coordinate::new(1.0, 2.0)).is_empty());
    }

    #[test]
    fn test_to_geo_swaps_axes() {
        let geom = Geometry::Polygon {
            rings: vec![square()],
        };
        let geo::Geometry::Polygon(poly) = geom.to_geo() else {
            panic!("Expected Polygon");
        };
        assert_eq!(poly.exterior().0[1], Coord { x: 0.0, y: 1.0 });
        assert!(poly.interiors().is_empty());
    }

    #[test]
    fn test_coords_include_holes() {
        let hole = vec![
            Coordinate::new(0.2, 0.2),
            Coordinate::new(0.3, 0.2),
            Coordinate::new(0.3, 0.3),
            Coordinate::new(0.2, 0.2),
        ];
        let geom = Geometry::MultiPolygon {
            polygons: vec![vec![square(), hole], vec![square()]],
        };
        assert_eq!(geom.coords().count(), 12);
        assert_eq!(geom.polygons().len(), 2);
    }

    #[test]
    fn test_lookup_line() {
        let line = "SRID=2180;POLYGON((0 0,1 0,1 1,0 0))|141201_1.0001.6509";
        let result = LookupResult::parse_line(line).unwrap();
        assert_eq!(result.id, "141201_1.0001.6509");
        assert!(result.wkt.starts_with("SRID=2180;"));

        assert!(LookupResult::parse_line("no separator").is_none());
        assert!(LookupResult::parse_line("POLYGON((0 0))|").is_none());
    }
}

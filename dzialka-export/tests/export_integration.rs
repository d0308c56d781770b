//! Tests d'intégration : lignes ULDK en PL-1992 → GeoPackage, KML, GeoJSON

use dzialka::{LookupResult, ParcelList};
use dzialka_export::export::{self, wkb, ExportOptions, GpkgEngine};
use dzialka_export::reproject_lite::GridProjection;
use rusqlite::Connection;

/// Deux parcelles à Varsovie, dont une avec un trou
const RESPONSES: &str = "\
SRID=2180;POLYGON((637000 486000,637050 486000,637050 486040,637000 486040,637000 486000))|146501_8.0101.12/3
SRID=2180;POLYGON((637100 486100,637300 486100,637300 486300,637100 486300,637100 486100),(637150 486150,637200 486150,637200 486200,637150 486150))|146501_8.0101.14
";

fn selection() -> ParcelList {
    let projection = GridProjection::new(2180).unwrap();
    let mut parcels = ParcelList::new();
    for line in RESPONSES.lines() {
        let result = LookupResult::parse_line(line).unwrap();
        parcels.add(&result, &projection).unwrap();
    }
    parcels
}

fn reopen(image: &[u8], name: &str) -> Connection {
    let path = std::env::temp_dir().join(format!("dzialka_it_{}_{}.gpkg", name, std::process::id()));
    std::fs::write(&path, image).unwrap();
    Connection::open(&path).unwrap()
}

#[tokio::test]
async fn test_gpkg_from_pl_1992_lines() {
    let parcels = selection();
    let image = GpkgEngine::new()
        .export_layers(parcels.as_slice(), ExportOptions::both())
        .await
        .unwrap();

    let conn = reopen(&image, "pl1992");
    let polygons: i64 = conn
        .query_row("SELECT COUNT(*) FROM polygons", [], |r| r.get(0))
        .unwrap();
    let points: i64 = conn
        .query_row("SELECT COUNT(*) FROM points", [], |r| r.get(0))
        .unwrap();
    assert_eq!(polygons, 2);
    assert_eq!(points, 4 + 4);

    // Les géométries sont en WGS84, autour de Varsovie
    let blob: Vec<u8> = conn
        .query_row(
            "SELECT geom FROM polygons WHERE parcel_id = '146501_8.0101.14'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    let envelope = wkb::read_envelope(&blob).unwrap();
    assert!((envelope.min_x - 21.0).abs() < 0.1, "min_x={}", envelope.min_x);
    assert!((envelope.min_y - 52.23).abs() < 0.1, "min_y={}", envelope.min_y);
    assert!(envelope.max_x > envelope.min_x);

    let (min_x, max_y): (f64, f64) = conn
        .query_row(
            "SELECT min_x, max_y FROM gpkg_contents WHERE table_name = 'points'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    let bounds = parcels.bounds().unwrap();
    assert_eq!(min_x, bounds.min_x);
    assert_eq!(max_y, bounds.max_y);
}

#[tokio::test]
async fn test_gpkg_export_is_repeatable() {
    let parcels = selection();
    let engine = GpkgEngine::new();

    let first = engine
        .export_layers(parcels.as_slice(), ExportOptions::new(true, false))
        .await
        .unwrap();
    let second = engine
        .export_layers(parcels.as_slice(), ExportOptions::new(true, false))
        .await
        .unwrap();

    // Seul last_change peut différer entre deux exports
    let rows = |conn: &Connection| -> Vec<(String, Vec<u8>)> {
        let mut stmt = conn
            .prepare("SELECT parcel_id, geom FROM polygons ORDER BY fid")
            .unwrap();
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        rows
    };
    assert_eq!(
        rows(&reopen(&first, "repeat_a")),
        rows(&reopen(&second, "repeat_b"))
    );
}

#[test]
fn test_text_exports_from_pl_1992_lines() {
    let parcels = selection();

    let kml = export::kml::export_layers(parcels.as_slice(), ExportOptions::both()).unwrap();
    assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(kml.contains("146501_8.0101.12/3 - 4"));
    assert!(kml.contains("<innerBoundaryIs>"));

    let json = export::geojson::export_layers(parcels.as_slice(), ExportOptions::both()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let features = value["features"].as_array().unwrap();
    assert_eq!(features.len(), 2 + 8);

    let lng = features[9]["geometry"]["coordinates"][0].as_f64().unwrap();
    let lat = features[9]["geometry"]["coordinates"][1].as_f64().unwrap();
    assert!((lng - 21.0).abs() < 0.1 && (lat - 52.23).abs() < 0.1);
}

#[test]
fn test_text_exports_are_repeatable() {
    let parcels = selection();
    let options = ExportOptions::both();

    assert_eq!(
        export::kml::export_layers(parcels.as_slice(), options).unwrap(),
        export::kml::export_layers(parcels.as_slice(), options).unwrap()
    );
    assert_eq!(
        export::geojson::export_layers(parcels.as_slice(), options).unwrap(),
        export::geojson::export_layers(parcels.as_slice(), options).unwrap()
    );
}

#[test]
fn test_decoded_outer_ring_survives_binary_encoding() {
    let points = [(19.125, 50.5), (19.25, 50.5), (19.25, 50.75), (19.0625, 50.875)];
    let mut pairs: Vec<String> = points.iter().map(|(x, y)| format!("{x} {y}")).collect();
    pairs.push(pairs[0].clone());
    let wkt = format!("SRID=4326;POLYGON(({}))", pairs.join(","));

    let geometry = dzialka::decode(&wkt, &dzialka::Identity).unwrap();
    let dzialka::Geometry::Polygon { rings } = &geometry else {
        panic!("Expected Polygon");
    };
    let blob = wkb::encode_polygon(&rings[..1], wkb::WGS84_SRS_ID).unwrap();

    let mut payload = &blob[wkb::header_len()..];
    let geo::Geometry::Polygon(polygon) = ::wkb::wkb_to_geom(&mut payload).unwrap() else {
        panic!("Expected Polygon");
    };
    let decoded: Vec<(f64, f64)> = polygon.exterior().coords().map(|c| (c.x, c.y)).collect();

    assert_eq!(decoded.len(), points.len() + 1);
    assert_eq!(&decoded[..points.len()], &points[..]);
    assert_eq!(decoded[0], decoded[points.len()]);
}

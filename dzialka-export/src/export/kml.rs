//! Export KML 2.2 avec quick-xml
//!
//! Un dossier « Działki » (un placemark par parcelle) et/ou un dossier
//! « Punkty graniczne » (un placemark par sommet), plus deux styles partagés.

use std::io::Cursor;

use dzialka::{Coordinate, Geometry, Parcel, Ring};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::info;

use super::{ExportError, ExportOptions};

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const DOCUMENT_NAME: &str = "Działki ewidencyjne";
const POLYGON_STYLE: &str = "parcelStyle";
const POINT_STYLE: &str = "pointStyle";
const POINT_ICON: &str = "http://maps.google.com/mapfiles/kml/shapes/placemark_circle.png";

type KmlWriter = Writer<Cursor<Vec<u8>>>;

/// Exporte les parcelles en document KML
pub fn export_layers(parcels: &[Parcel], options: ExportOptions) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(ExportError::xml)?;
    start_with(&mut writer, BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]))?;
    start(&mut writer, "Document")?;
    text_element(&mut writer, "name", DOCUMENT_NAME)?;

    write_styles(&mut writer)?;

    if options.include_polygons {
        start(&mut writer, "Folder")?;
        text_element(&mut writer, "name", "Działki")?;
        for parcel in parcels {
            write_polygon_placemark(&mut writer, parcel)?;
        }
        end(&mut writer, "Folder")?;
    }

    if options.include_points {
        start(&mut writer, "Folder")?;
        text_element(&mut writer, "name", "Punkty graniczne")?;
        for parcel in parcels {
            for (index, vertex) in parcel.vertices.iter().enumerate() {
                write_point_placemark(&mut writer, parcel, index + 1, vertex)?;
            }
        }
        end(&mut writer, "Folder")?;
    }

    end(&mut writer, "Document")?;
    end(&mut writer, "kml")?;

    let bytes = writer.into_inner().into_inner();
    let kml = String::from_utf8(bytes).map_err(ExportError::xml)?;
    info!(parcels = parcels.len(), bytes = kml.len(), "KML export complete");
    Ok(kml)
}

/// Styles partagés : contour/remplissage pour les parcelles, icône/étiquette pour les points
fn write_styles(writer: &mut KmlWriter) -> Result<(), ExportError> {
    start_with(writer, BytesStart::new("Style").with_attributes([("id", POLYGON_STYLE)]))?;
    start(writer, "LineStyle")?;
    text_element(writer, "color", "ff0000ff")?;
    text_element(writer, "width", "2")?;
    end(writer, "LineStyle")?;
    start(writer, "PolyStyle")?;
    text_element(writer, "color", "4d0000ff")?;
    end(writer, "PolyStyle")?;
    end(writer, "Style")?;

    start_with(writer, BytesStart::new("Style").with_attributes([("id", POINT_STYLE)]))?;
    start(writer, "IconStyle")?;
    text_element(writer, "color", "ff00ffff")?;
    text_element(writer, "scale", "0.6")?;
    start(writer, "Icon")?;
    text_element(writer, "href", POINT_ICON)?;
    end(writer, "Icon")?;
    end(writer, "IconStyle")?;
    start(writer, "LabelStyle")?;
    text_element(writer, "scale", "0.7")?;
    end(writer, "LabelStyle")?;
    end(writer, "Style")
}

fn write_polygon_placemark(writer: &mut KmlWriter, parcel: &Parcel) -> Result<(), ExportError> {
    start(writer, "Placemark")?;
    text_element(writer, "name", &parcel.id)?;
    text_element(writer, "description", &format!("Działka {}", parcel.id))?;
    text_element(writer, "styleUrl", &format!("#{POLYGON_STYLE}"))?;

    match &parcel.geometry {
        Geometry::Polygon { rings } => write_polygon(writer, rings)?,
        Geometry::MultiPolygon { polygons } => {
            start(writer, "MultiGeometry")?;
            for rings in polygons {
                write_polygon(writer, rings)?;
            }
            end(writer, "MultiGeometry")?;
        }
    }

    end(writer, "Placemark")
}

fn write_point_placemark(
    writer: &mut KmlWriter,
    parcel: &Parcel,
    index: usize,
    vertex: &Coordinate,
) -> Result<(), ExportError> {
    start(writer, "Placemark")?;
    text_element(writer, "name", &format!("{} - {}", parcel.id, index))?;
    text_element(
        writer,
        "description",
        &format!("Punkt {} działki {}", index, parcel.id),
    )?;
    text_element(writer, "styleUrl", &format!("#{POINT_STYLE}"))?;
    start(writer, "Point")?;
    text_element(writer, "coordinates", &coordinate_triple(vertex))?;
    end(writer, "Point")?;
    end(writer, "Placemark")
}

/// Contour extérieur puis trous
fn write_polygon(writer: &mut KmlWriter, rings: &[Ring]) -> Result<(), ExportError> {
    start(writer, "Polygon")?;
    for (index, ring) in rings.iter().enumerate() {
        let boundary = if index == 0 {
            "outerBoundaryIs"
        } else {
            "innerBoundaryIs"
        };
        start(writer, boundary)?;
        start(writer, "LinearRing")?;
        text_element(writer, "coordinates", &ring_coordinates(ring))?;
        end(writer, "LinearRing")?;
        end(writer, boundary)?;
    }
    end(writer, "Polygon")
}

fn coordinate_triple(coord: &Coordinate) -> String {
    format!("{},{},0", coord.lng, coord.lat)
}

fn ring_coordinates(ring: &Ring) -> String {
    ring.iter()
        .map(coordinate_triple)
        .collect::<Vec<_>>()
        .join(" ")
}

fn start(writer: &mut KmlWriter, name: &str) -> Result<(), ExportError> {
    start_with(writer, BytesStart::new(name))
}

fn start_with(writer: &mut KmlWriter, element: BytesStart<'_>) -> Result<(), ExportError> {
    writer
        .write_event(Event::Start(element))
        .map_err(ExportError::xml)
}

fn end(writer: &mut KmlWriter, name: &str) -> Result<(), ExportError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(ExportError::xml)
}

/// Élément texte ; `BytesText::new` échappe `& < > " '`
fn text_element(writer: &mut KmlWriter, name: &str, text: &str) -> Result<(), ExportError> {
    start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(ExportError::xml)?;
    end(writer, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng)
    }

    fn square(lng: f64, lat: f64, size: f64) -> Ring {
        vec![
            c(lat, lng),
            c(lat, lng + size),
            c(lat + size, lng + size),
            c(lat, lng),
        ]
    }

    fn parcel(id: &str, geometry: Geometry) -> Parcel {
        let vertices = dzialka::extract_vertices(&geometry);
        Parcel {
            id: id.to_string(),
            source_text: String::new(),
            geometry,
            vertices,
        }
    }

    /// Parse le document et retourne (noms d'éléments ouverts, textes décodés)
    fn parse(kml: &str) -> (Vec<String>, Vec<String>) {
        let mut reader = Reader::from_str(kml);
        let mut elements = Vec::new();
        let mut texts = Vec::new();
        loop {
            match reader.read_event().expect("well-formed XML") {
                Event::Start(e) => {
                    elements.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap())
                }
                Event::Text(t) => {
                    let text = t.unescape().unwrap();
                    if !text.trim().is_empty() {
                        texts.push(text.into_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        (elements, texts)
    }

    fn count(elements: &[String], name: &str) -> usize {
        elements.iter().filter(|e| *e == name).count()
    }

    #[test]
    fn test_escapes_parcel_id() {
        let p = parcel("A&B<C>\"'", Geometry::Polygon {
            rings: vec![square(19.0, 50.0, 0.1)],
        });
        let kml = export_layers(&[p], ExportOptions::new(true, false)).unwrap();

        assert!(kml.contains("A&amp;B&lt;C&gt;"));
        assert!(!kml.contains("A&B<C"));

        let (_, texts) = parse(&kml);
        assert!(texts.iter().any(|t| t == "A&B<C>\"'"));
    }

    #[test]
    fn test_folders_follow_options() {
        let p = parcel("P1", Geometry::Polygon {
            rings: vec![square(19.0, 50.0, 0.1)],
        });

        let (elements, _) = parse(&export_layers(&[p.clone()], ExportOptions::both()).unwrap());
        assert_eq!(count(&elements, "Folder"), 2);
        assert_eq!(count(&elements, "Style"), 2);
        assert_eq!(count(&elements, "Placemark"), 1 + 3);

        let (elements, texts) = parse(&export_layers(&[p.clone()], ExportOptions::new(false, true)).unwrap());
        assert_eq!(count(&elements, "Folder"), 1);
        assert_eq!(count(&elements, "Polygon"), 0);
        assert_eq!(count(&elements, "Point"), 3);
        assert!(texts.iter().any(|t| t == "P1 - 3"));
        assert!(texts.iter().any(|t| t == "19,50,0"));

        let (elements, _) = parse(&export_layers(&[p], ExportOptions::new(false, false)).unwrap());
        assert_eq!(count(&elements, "Folder"), 0);
        assert_eq!(count(&elements, "Style"), 2);
    }

    #[test]
    fn test_holes_and_multigeometry() {
        let with_hole = parcel("H", Geometry::Polygon {
            rings: vec![square(19.0, 50.0, 1.0), square(19.2, 50.2, 0.1)],
        });
        let multi = parcel("M", Geometry::MultiPolygon {
            polygons: vec![vec![square(19.0, 50.0, 0.1)], vec![square(20.0, 51.0, 0.1)]],
        });

        let kml = export_layers(&[with_hole, multi], ExportOptions::new(true, false)).unwrap();
        let (elements, texts) = parse(&kml);

        assert_eq!(count(&elements, "MultiGeometry"), 1);
        assert_eq!(count(&elements, "Polygon"), 3);
        assert_eq!(count(&elements, "outerBoundaryIs"), 3);
        assert_eq!(count(&elements, "innerBoundaryIs"), 1);
        assert!(texts.iter().any(|t| t == "19,50,0 20,50,0 20,51,0 19,50,0"));

        // L'ordre des sous-polygones est conservé
        let first = kml.find("19.1,50,0").unwrap();
        let second = kml.find("20.1,51,0").unwrap();
        assert!(first < second);
    }
}

//! Export GeoJSON (FeatureCollection indentée)
//!
//! Toutes les features polygones précèdent toutes les features points.

use dzialka::{Coordinate, Parcel};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use tracing::info;

use super::{ExportError, ExportOptions};

/// Exporte les parcelles en GeoJSON
pub fn export_layers(parcels: &[Parcel], options: ExportOptions) -> Result<String, ExportError> {
    let mut features = Vec::new();

    if options.include_polygons {
        features.extend(parcels.iter().map(polygon_feature));
    }

    if options.include_points {
        for parcel in parcels {
            features.extend(
                parcel
                    .vertices
                    .iter()
                    .enumerate()
                    .map(|(index, vertex)| point_feature(parcel, index + 1, vertex)),
            );
        }
    }

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let json = serde_json::to_string_pretty(&collection)?;
    info!(
        parcels = parcels.len(),
        features = collection.features.len(),
        "GeoJSON export complete"
    );
    Ok(json)
}

fn polygon_feature(parcel: &Parcel) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("parcel_id".to_string(), JsonValue::from(parcel.id.as_str()));
    properties.insert("layer".to_string(), JsonValue::from("polygons"));

    feature(Value::from(&parcel.geometry.to_geo()), properties)
}

fn point_feature(parcel: &Parcel, index: usize, vertex: &Coordinate) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("parcel_id".to_string(), JsonValue::from(parcel.id.as_str()));
    properties.insert("point_index".to_string(), JsonValue::from(index));
    properties.insert("layer".to_string(), JsonValue::from("points"));

    feature(Value::Point(vec![vertex.lng, vertex.lat]), properties)
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

//! Export GeoPackage (SQLite en mémoire, image binaire complète)
//!
//! Schéma fixe créé à chaque export :
//! - `gpkg_spatial_ref_sys` avec une seule ligne WGS84 (4326)
//! - `gpkg_contents` : une ligne par couche incluse
//! - `gpkg_geometry_columns` : une ligne par couche incluse
//!
//! Tables conditionnelles : `polygons` et/ou `points`, décrites par [`Layer`].

use dzialka::{Envelope, Parcel};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, DatabaseName, Transaction};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::wkb::{self, WGS84_SRS_ID};
use super::{ExportError, ExportOptions};

/// `GPKG` en ASCII
const APPLICATION_ID: i32 = 0x4750_4B47;

/// GeoPackage 1.3.0
const USER_VERSION: i32 = 10300;

const GEOMETRY_COLUMN: &str = "geom";

const REGISTRY_SQL: &str = r#"
CREATE TABLE gpkg_spatial_ref_sys (
    srs_name TEXT NOT NULL,
    srs_id INTEGER NOT NULL PRIMARY KEY,
    organization TEXT NOT NULL,
    organization_coordsys_id INTEGER NOT NULL,
    definition TEXT NOT NULL,
    description TEXT
);

CREATE TABLE gpkg_contents (
    table_name TEXT NOT NULL PRIMARY KEY,
    data_type TEXT NOT NULL,
    identifier TEXT UNIQUE,
    description TEXT DEFAULT '',
    last_change DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
    min_x DOUBLE,
    min_y DOUBLE,
    max_x DOUBLE,
    max_y DOUBLE,
    srs_id INTEGER,
    CONSTRAINT fk_gc_r_srs_id FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
);

CREATE TABLE gpkg_geometry_columns (
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    geometry_type_name TEXT NOT NULL,
    srs_id INTEGER NOT NULL,
    z TINYINT NOT NULL,
    m TINYINT NOT NULL,
    CONSTRAINT pk_geom_cols PRIMARY KEY (table_name, column_name),
    CONSTRAINT uk_gc_table_name UNIQUE (table_name),
    CONSTRAINT fk_gc_tn FOREIGN KEY (table_name) REFERENCES gpkg_contents(table_name),
    CONSTRAINT fk_gc_srs FOREIGN KEY (srs_id) REFERENCES gpkg_spatial_ref_sys(srs_id)
);
"#;

const WGS84_DEFINITION: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563,AUTHORITY["EPSG","7030"]],AUTHORITY["EPSG","6326"]],PRIMEM["Greenwich",0,AUTHORITY["EPSG","8901"]],UNIT["degree",0.0174532925199433,AUTHORITY["EPSG","9122"]],AXIS["Latitude",NORTH],AXIS["Longitude",EAST],AUTHORITY["EPSG","4326"]]"#;

/// Couche exportable : table, DDL, insertion et construction des lignes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Contours des parcelles
    Polygons,
    /// Sommets des contours extérieurs
    Points,
}

/// Ligne prête à insérer
struct LayerRow<'a> {
    parcel_id: &'a str,
    point_index: Option<i64>,
    geom: Vec<u8>,
    envelope: Envelope,
}

impl LayerRow<'_> {
    fn bind(&self) -> Vec<&dyn ToSql> {
        match &self.point_index {
            Some(index) => vec![&self.parcel_id as &dyn ToSql, index, &self.geom],
            None => vec![&self.parcel_id as &dyn ToSql, &self.geom],
        }
    }
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Polygons, Layer::Points];

    /// Couches demandées, dans l'ordre canonique
    pub fn selected(options: ExportOptions) -> Vec<Layer> {
        Self::ALL
            .into_iter()
            .filter(|layer| match layer {
                Layer::Polygons => options.include_polygons,
                Layer::Points => options.include_points,
            })
            .collect()
    }

    pub fn table_name(self) -> &'static str {
        match self {
            Layer::Polygons => "polygons",
            Layer::Points => "points",
        }
    }

    /// Nom affiché (`gpkg_contents.identifier`)
    pub fn identifier(self) -> &'static str {
        match self {
            Layer::Polygons => "Działki",
            Layer::Points => "Punkty graniczne",
        }
    }

    pub fn geometry_type_name(self) -> &'static str {
        match self {
            Layer::Polygons => "POLYGON",
            Layer::Points => "POINT",
        }
    }

    fn create_sql(self) -> &'static str {
        match self {
            Layer::Polygons => {
                "CREATE TABLE polygons (
                    fid INTEGER PRIMARY KEY AUTOINCREMENT,
                    parcel_id TEXT NOT NULL,
                    geom POLYGON
                )"
            }
            Layer::Points => {
                "CREATE TABLE points (
                    fid INTEGER PRIMARY KEY AUTOINCREMENT,
                    parcel_id TEXT NOT NULL,
                    point_index INTEGER NOT NULL,
                    geom POINT
                )"
            }
        }
    }

    fn insert_sql(self) -> &'static str {
        match self {
            Layer::Polygons => "INSERT INTO polygons (parcel_id, geom) VALUES (?1, ?2)",
            Layer::Points => {
                "INSERT INTO points (parcel_id, point_index, geom) VALUES (?1, ?2, ?3)"
            }
        }
    }

    /// Construit les lignes de la couche
    ///
    /// Un MultiPolygon donne une ligne par sous-polygone, avec le même `parcel_id`.
    fn rows(self, parcels: &[Parcel]) -> Result<Vec<LayerRow<'_>>, ExportError> {
        let mut rows = Vec::new();

        for parcel in parcels {
            match self {
                Layer::Polygons => {
                    for rings in parcel.geometry.polygons() {
                        let geom = wkb::encode_polygon(rings, WGS84_SRS_ID).map_err(|source| {
                            ExportError::Encoding {
                                parcel_id: parcel.id.clone(),
                                source,
                            }
                        })?;
                        rows.push(LayerRow {
                            parcel_id: &parcel.id,
                            point_index: None,
                            geom,
                            envelope: Envelope::of_coords(rings.iter().flatten()),
                        });
                    }
                }
                Layer::Points => {
                    for (index, vertex) in parcel.vertices.iter().enumerate() {
                        rows.push(LayerRow {
                            parcel_id: &parcel.id,
                            point_index: Some(index as i64 + 1),
                            geom: wkb::encode_point(vertex.lng, vertex.lat, WGS84_SRS_ID),
                            envelope: Envelope::of_point(vertex),
                        });
                    }
                }
            }
        }

        Ok(rows)
    }
}

/// Informations obtenues à l'initialisation du moteur
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub sqlite_version: String,
}

/// Moteur GeoPackage
///
/// L'initialisation est faite une seule fois, au premier appel de [`GpkgEngine::ready`] ;
/// chaque export utilise ensuite sa propre base en mémoire.
#[derive(Debug, Default)]
pub struct GpkgEngine {
    info: OnceCell<EngineInfo>,
}

impl GpkgEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attend l'initialisation du moteur (mémoïsée)
    pub async fn ready(&self) -> Result<&EngineInfo, ExportError> {
        self.info.get_or_try_init(|| async { Self::probe() }).await
    }

    /// Vérifie que SQLite sait produire une image binaire d'une base en mémoire
    fn probe() -> Result<EngineInfo, ExportError> {
        let conn = Connection::open_in_memory()?;
        let sqlite_version: String = conn.query_row("SELECT sqlite_version()", [], |r| r.get(0))?;

        conn.execute_batch("CREATE TABLE probe (id INTEGER)")?;
        let image = conn.serialize(DatabaseName::Main)?;
        if image.is_empty() {
            return Err(ExportError::EngineInit(
                "serialized database image is empty".to_string(),
            ));
        }

        info!(sqlite_version = %sqlite_version, "GeoPackage engine ready");
        Ok(EngineInfo { sqlite_version })
    }

    /// Exporte les parcelles en fichier GeoPackage complet
    ///
    /// Toutes les écritures se font dans une transaction ; l'image n'est produite
    /// qu'après commit. En cas d'erreur, rien n'est retourné.
    pub async fn export_layers(
        &self,
        parcels: &[Parcel],
        options: ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        self.ready().await?;

        let mut conn = open_database()?;
        let tx = conn.transaction()?;

        tx.execute_batch(REGISTRY_SQL)?;
        tx.execute(
            "INSERT INTO gpkg_spatial_ref_sys
                (srs_name, srs_id, organization, organization_coordsys_id, definition, description)
             VALUES ('WGS 84 geodetic', ?1, 'EPSG', ?1, ?2, ?3)",
            params![
                WGS84_SRS_ID,
                WGS84_DEFINITION,
                "longitude/latitude coordinates in decimal degrees on the WGS 84 spheroid"
            ],
        )?;

        for layer in Layer::selected(options) {
            write_layer(&tx, layer, parcels)?;
        }

        tx.commit()?;

        let image = conn.serialize(DatabaseName::Main)?.to_vec();
        info!(
            parcels = parcels.len(),
            bytes = image.len(),
            "GeoPackage export complete"
        );
        Ok(image)
    }
}

fn open_database() -> Result<Connection, ExportError> {
    let conn = Connection::open_in_memory()?;
    conn.pragma_update(None, "application_id", APPLICATION_ID)?;
    conn.pragma_update(None, "user_version", USER_VERSION)?;
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(conn)
}

/// Crée, remplit et enregistre une couche
fn write_layer(tx: &Transaction<'_>, layer: Layer, parcels: &[Parcel]) -> Result<(), ExportError> {
    let rows = layer.rows(parcels)?;

    tx.execute_batch(layer.create_sql())?;

    let mut envelope = Envelope::empty();
    {
        let mut stmt = tx.prepare(layer.insert_sql())?;
        for row in &rows {
            stmt.execute(row.bind().as_slice())?;
            envelope.merge(&row.envelope);
        }
    }

    let bounds = (!envelope.is_empty()).then_some(envelope);
    tx.execute(
        "INSERT INTO gpkg_contents
            (table_name, data_type, identifier, description, min_x, min_y, max_x, max_y, srs_id)
         VALUES (?1, 'features', ?2, '', ?3, ?4, ?5, ?6, ?7)",
        params![
            layer.table_name(),
            layer.identifier(),
            bounds.map(|e| e.min_x),
            bounds.map(|e| e.min_y),
            bounds.map(|e| e.max_x),
            bounds.map(|e| e.max_y),
            WGS84_SRS_ID,
        ],
    )?;
    tx.execute(
        "INSERT INTO gpkg_geometry_columns (table_name, column_name, geometry_type_name, srs_id, z, m)
         VALUES (?1, ?2, ?3, ?4, 0, 0)",
        params![
            layer.table_name(),
            GEOMETRY_COLUMN,
            layer.geometry_type_name(),
            WGS84_SRS_ID
        ],
    )?;

    debug!(layer = layer.table_name(), rows = rows.len(), "Layer written");
    Ok(())
}

//! Encodage binaire GeoPackage : en-tête `GP` + WKB little-endian
//!
//! Structure d'un blob :
//! - en-tête : magic `GP`, version 0, flags, srs_id (i32), envelope [minX, maxX, minY, maxY]
//! - payload WKB : byte order, type (u32), coordonnées (X = longitude, Y = latitude)

use dzialka::{Coordinate, Envelope, Ring};
use thiserror::Error;

/// Magic marker de l'en-tête GeoPackage
pub const MAGIC: [u8; 2] = *b"GP";

/// Version du format binaire GeoPackage
pub const VERSION: u8 = 0;

/// SRS par défaut (WGS84)
pub const WGS84_SRS_ID: i32 = 4326;

/// Bit 0 : little-endian ; bits 1-3 = 1 : envelope 2D [minX, maxX, minY, maxY]
const FLAGS_LE_ENVELOPE_XY: u8 = 0b0000_0011;

const HEADER_LEN: usize = 8;
const ENVELOPE_XY_LEN: usize = 32;

const WKB_LITTLE_ENDIAN: u8 = 1;
const WKB_POINT: u32 = 1;
const WKB_POLYGON: u32 = 3;

/// Erreurs de précondition de l'encodeur
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("Polygon has no rings")]
    NoRings,

    #[error("Ring #{ring} has {points} points, at least 4 required")]
    RingTooShort { ring: usize, points: usize },

    #[error("Ring #{ring} is not closed")]
    UnclosedRing { ring: usize },
}

/// Curseur d'écriture little-endian sur un buffer pré-dimensionné
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Position de la prochaine écriture
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Écrit une coordonnée en (X, Y) = (longitude, latitude)
    pub fn write_coord(&mut self, coord: &Coordinate) {
        self.write_f64(coord.lng);
        self.write_f64(coord.lat);
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Longueur d'un en-tête avec envelope 2D
pub const fn header_len() -> usize {
    HEADER_LEN + ENVELOPE_XY_LEN
}

/// Écrit l'en-tête GeoPackage avec envelope 2D
fn write_header(writer: &mut ByteWriter, srs_id: i32, envelope: &Envelope) {
    writer.write_bytes(&MAGIC);
    writer.write_u8(VERSION);
    writer.write_u8(FLAGS_LE_ENVELOPE_XY);
    writer.write_i32(srs_id);
    // Ordre imposé par le standard : minX, maxX, minY, maxY
    writer.write_f64(envelope.min_x);
    writer.write_f64(envelope.max_x);
    writer.write_f64(envelope.min_y);
    writer.write_f64(envelope.max_y);
}

/// Encode un point en blob GeoPackage
pub fn encode_point(lng: f64, lat: f64, srs_id: i32) -> Vec<u8> {
    let coord = Coordinate { lat, lng };
    let mut writer = ByteWriter::with_capacity(header_len() + 1 + 4 + 16);

    write_header(&mut writer, srs_id, &Envelope::of_point(&coord));
    writer.write_u8(WKB_LITTLE_ENDIAN);
    writer.write_u32(WKB_POINT);
    writer.write_coord(&coord);

    writer.into_inner()
}

/// Encode un polygone (contour extérieur puis trous) en blob GeoPackage
///
/// L'envelope de l'en-tête couvre toutes les coordonnées, trous compris.
/// Les rings doivent être fermés et contenir au moins 4 points.
pub fn encode_polygon(rings: &[Ring], srs_id: i32) -> Result<Vec<u8>, EncodeError> {
    check_rings(rings)?;

    let envelope = Envelope::of_coords(rings.iter().flatten());
    let points: usize = rings.iter().map(Vec::len).sum();
    let payload_len = 1 + 4 + 4 + rings.len() * 4 + points * 16;
    let mut writer = ByteWriter::with_capacity(header_len() + payload_len);

    write_header(&mut writer, srs_id, &envelope);
    writer.write_u8(WKB_LITTLE_ENDIAN);
    writer.write_u32(WKB_POLYGON);
    writer.write_u32(rings.len() as u32);
    for ring in rings {
        writer.write_u32(ring.len() as u32);
        for coord in ring {
            writer.write_coord(coord);
        }
    }

    Ok(writer.into_inner())
}

fn check_rings(rings: &[Ring]) -> Result<(), EncodeError> {
    if rings.is_empty() {
        return Err(EncodeError::NoRings);
    }
    for (index, ring) in rings.iter().enumerate() {
        if ring.len() < 4 {
            return Err(EncodeError::RingTooShort {
                ring: index,
                points: ring.len(),
            });
        }
        if ring.first() != ring.last() {
            return Err(EncodeError::UnclosedRing { ring: index });
        }
    }
    Ok(())
}

/// Lit l'envelope d'un blob produit par ce module (tests et diagnostics)
pub fn read_envelope(blob: &[u8]) -> Option<Envelope> {
    if blob.len() < header_len() || blob[..2] != MAGIC || blob[3] != FLAGS_LE_ENVELOPE_XY {
        return None;
    }
    let f = |offset: usize| -> Option<f64> {
        let bytes: [u8; 8] = blob.get(offset..offset + 8)?.try_into().ok()?;
        Some(f64::from_le_bytes(bytes))
    };
    Some(Envelope {
        min_x: f(8)?,
        max_x: f(16)?,
        min_y: f(24)?,
        max_y: f(32)?,
    })
}

//! Décodeur WKT (POLYGON / MULTIPOLYGON, préfixe `SRID=<n>;` optionnel)
//!
//! Chaque paire de coordonnées est reprojetée individuellement via [`Project`].
//! L'ordre des rings et des points est conservé tel quel.

use std::sync::OnceLock;

use regex::Regex;

use crate::project::Project;
use crate::types::{Geometry, Ring};
use crate::FormatError;

const SRID_PREFIX: &str = "SRID=";
const POLYGON: &str = "POLYGON";
const MULTIPOLYGON: &str = "MULTIPOLYGON";

/// Nombre minimal de points d'un ring fermé (triangle)
pub const MIN_RING_POINTS: usize = 4;

fn polygon_body() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^\s*\(\s*\((.*)\)\s*\)\s*$").expect("valid regex"))
}

fn multipolygon_body() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^\s*\(\s*\(\s*\((.*)\)\s*\)\s*\)\s*$").expect("valid regex")
    })
}

fn ring_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\)\s*,\s*\(").expect("valid regex"))
}

fn polygon_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\)\s*\)\s*,\s*\(\s*\(").expect("valid regex"))
}

/// Décode une géométrie WKT en reprojetant chaque point
pub fn decode(text: &str, projection: &impl Project) -> Result<Geometry, FormatError> {
    decode_with_srid(text, projection).map(|(_, geometry)| geometry)
}

/// Décode une géométrie WKT et retourne aussi le SRID déclaré, s'il y en a un
pub fn decode_with_srid(
    text: &str,
    projection: &impl Project,
) -> Result<(Option<i32>, Geometry), FormatError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FormatError::Empty);
    }

    let (srid, body) = split_srid(text)?;
    let keyword_end = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    let keyword = body[..keyword_end].to_ascii_uppercase();
    let rest = &body[keyword_end..];

    let geometry = match keyword.as_str() {
        MULTIPOLYGON => decode_multipolygon(rest, projection)?,
        POLYGON => decode_polygon(rest, projection)?,
        "" => return Err(FormatError::UnsupportedGeometry(truncate(body, 20))),
        _ => return Err(FormatError::UnsupportedGeometry(keyword)),
    };

    Ok((srid, geometry))
}

/// Sépare le préfixe `SRID=<n>;` du corps WKT
fn split_srid(text: &str) -> Result<(Option<i32>, &str), FormatError> {
    let has_prefix = text
        .get(..SRID_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(SRID_PREFIX));
    if !has_prefix {
        return Ok((None, text));
    }

    let after = &text[SRID_PREFIX.len()..];
    let Some((code, body)) = after.split_once(';') else {
        return Err(FormatError::InvalidSrid(truncate(text, 20)));
    };
    let srid = code
        .trim()
        .parse::<i32>()
        .map_err(|_| FormatError::InvalidSrid(code.trim().to_string()))?;

    Ok((Some(srid), body.trim_start()))
}

fn decode_polygon(rest: &str, projection: &impl Project) -> Result<Geometry, FormatError> {
    let content = polygon_body()
        .captures(rest)
        .and_then(|c| c.get(1))
        .ok_or_else(|| FormatError::malformed(POLYGON, "expected ((...))"))?
        .as_str();

    let rings = decode_rings(content, POLYGON, projection)?;
    Ok(Geometry::Polygon { rings })
}

fn decode_multipolygon(rest: &str, projection: &impl Project) -> Result<Geometry, FormatError> {
    let content = multipolygon_body()
        .captures(rest)
        .and_then(|c| c.get(1))
        .ok_or_else(|| FormatError::malformed(MULTIPOLYGON, "expected (((...)))"))?
        .as_str();

    let polygons = polygon_separator()
        .split(content)
        .map(|polygon| decode_rings(polygon, MULTIPOLYGON, projection))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Geometry::MultiPolygon { polygons })
}

/// Décode le contenu `x y, x y), (x y, ...` d'un polygone
fn decode_rings(
    content: &str,
    geometry: &'static str,
    projection: &impl Project,
) -> Result<Vec<Ring>, FormatError> {
    ring_separator()
        .split(content)
        .enumerate()
        .map(|(index, ring)| {
            if ring.contains(|c: char| c == '(' || c == ')') {
                return Err(FormatError::malformed(geometry, "unbalanced parentheses"));
            }
            decode_ring(index, ring, projection)
        })
        .collect()
}

fn decode_ring(index: usize, content: &str, projection: &impl Project) -> Result<Ring, FormatError> {
    let raw = content
        .split(',')
        .map(parse_pair)
        .collect::<Result<Vec<(f64, f64)>, _>>()?;

    if raw.len() < MIN_RING_POINTS {
        return Err(FormatError::invalid_ring(
            index,
            format!("{} points, at least {} required", raw.len(), MIN_RING_POINTS),
        ));
    }
    // Fermeture vérifiée sur les valeurs brutes, avant reprojection
    if raw.first() != raw.last() {
        return Err(FormatError::invalid_ring(index, "ring is not closed"));
    }

    raw.into_iter()
        .map(|(x, y)| {
            let coord = projection.project(x, y);
            if coord.lat.is_finite() && coord.lng.is_finite() {
                Ok(coord)
            } else {
                Err(FormatError::InvalidCoordinate(format!("{} {}", x, y)))
            }
        })
        .collect()
}

/// Parse une paire `x y` en deux flottants
fn parse_pair(pair: &str) -> Result<(f64, f64), FormatError> {
    let invalid = || FormatError::InvalidCoordinate(pair.trim().to_string());

    let mut tokens = pair.split_whitespace();
    let (Some(x), Some(y), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(invalid());
    };

    let x: f64 = fast_float::parse(x).map_err(|_| invalid())?;
    let y: f64 = fast_float::parse(y).map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }

    Ok((x, y))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

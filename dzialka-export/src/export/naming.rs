//! Formats de sortie et nommage des fichiers : `<préfixe>_<AAAA-MM-JJ>.<ext>`

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ExportOptions;

/// Format de fichier exporté
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Gpkg,
    Kml,
    Geojson,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Gpkg => "gpkg",
            ExportFormat::Kml => "kml",
            ExportFormat::Geojson => "geojson",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gpkg" | "geopackage" => Ok(ExportFormat::Gpkg),
            "kml" => Ok(ExportFormat::Kml),
            "geojson" | "json" => Ok(ExportFormat::Geojson),
            _ => Err(format!("Invalid format: {}. Use: gpkg, kml, geojson", s)),
        }
    }
}

/// Préfixe selon les couches demandées
pub fn file_prefix(options: ExportOptions) -> &'static str {
    match (options.include_polygons, options.include_points) {
        (true, true) => "dzialki_punkty",
        (false, true) => "punkty",
        _ => "dzialki",
    }
}

/// Nom de fichier d'export, ex: `dzialki_punkty_2024-05-17.gpkg`
pub fn export_file_name(options: ExportOptions, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        file_prefix(options),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 7).unwrap();
        assert_eq!(
            export_file_name(ExportOptions::both(), ExportFormat::Gpkg, date),
            "dzialki_punkty_2024-05-07.gpkg"
        );
        assert_eq!(
            export_file_name(ExportOptions::new(true, false), ExportFormat::Kml, date),
            "dzialki_2024-05-07.kml"
        );
        assert_eq!(
            export_file_name(ExportOptions::new(false, true), ExportFormat::Geojson, date),
            "punkty_2024-05-07.geojson"
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("GPKG".parse::<ExportFormat>(), Ok(ExportFormat::Gpkg));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Geojson));
        assert!("shp".parse::<ExportFormat>().is_err());
    }
}

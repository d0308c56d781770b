//! Rapport d'export avec graceful degradation
//!
//! Les lignes invalides sont écartées sans interrompre l'export ; le rapport
//! les conserve avec leur numéro de ligne.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::export::ExportFormat;

/// Statut global de l'export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStatus {
    /// Toutes les lignes sélectionnées et exportées
    Success,
    /// Export produit, mais des lignes ont été rejetées
    PartialSuccess,
    /// Aucune parcelle sélectionnée ou aucun fichier écrit
    Failed,
}

/// Ligne rejetée
#[derive(Debug, Clone, Serialize)]
pub struct LineError {
    /// Numéro de ligne (à partir de 1)
    pub line: usize,
    /// Identifiant de la parcelle, si la ligne a pu être découpée
    pub parcel_id: Option<String>,
    pub message: String,
}

/// Fichier produit
#[derive(Debug, Clone, Serialize)]
pub struct WrittenFile {
    pub format: ExportFormat,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Rapport complet d'un export
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Fichier d'entrée
    pub input: String,
    pub duration_secs: f64,
    pub status: ExportStatus,

    /// Lignes de données lues (hors commentaires et lignes vides)
    pub lines_read: usize,
    /// Parcelles dans la sélection finale
    pub parcels_selected: usize,
    /// Identifiants déjà sélectionnés
    pub duplicates: usize,

    pub errors: Vec<LineError>,
    pub files: Vec<WrittenFile>,
}

impl ExportReport {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            duration_secs: 0.0,
            status: ExportStatus::Success,
            lines_read: 0,
            parcels_selected: 0,
            duplicates: 0,
            errors: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn record_line(&mut self) {
        self.lines_read += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates += 1;
    }

    /// Enregistre une ligne rejetée
    pub fn record_error(&mut self, line: usize, parcel_id: Option<&str>, message: impl Into<String>) {
        self.errors.push(LineError {
            line,
            parcel_id: parcel_id.map(str::to_string),
            message: message.into(),
        });
    }

    /// Enregistre un fichier écrit
    pub fn record_file(&mut self, format: ExportFormat, path: &Path, bytes: usize) {
        self.files.push(WrittenFile {
            format,
            path: path.to_path_buf(),
            bytes,
        });
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self, parcels_selected: usize) {
        self.parcels_selected = parcels_selected;
        self.status = if parcels_selected == 0 || self.files.is_empty() {
            ExportStatus::Failed
        } else if !self.errors.is_empty() {
            ExportStatus::PartialSuccess
        } else {
            ExportStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("EXPORT REPORT - {}", self.input);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Lines: {} read, {} rejected, {} duplicates",
            self.lines_read,
            self.errors.len(),
            self.duplicates
        );
        println!("Parcels selected: {}", self.parcels_selected);

        if !self.files.is_empty() {
            println!("\n--- FILES ---");
            for f in &self.files {
                println!("  {} ({} bytes)", f.path.display(), f.bytes);
            }
        }

        if !self.errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.errors.len());
            for e in self.errors.iter().take(20) {
                match &e.parcel_id {
                    Some(id) => println!("  [line {}:{}] {}", e.line, id, e.message),
                    None => println!("  [line {}] {}", e.line, e.message),
                }
            }
            if self.errors.len() > 20 {
                println!("  ... and {} more", self.errors.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} parcels, {} files, {} errors",
            self.input,
            self.parcels_selected,
            self.files.len(),
            self.errors.len()
        )
    }
}

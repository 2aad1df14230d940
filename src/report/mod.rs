//! Reportes por archivo y su exportación.

mod export;

#[cfg(test)]
mod tests;

pub use export::{ExportFormat, export_reports, parse_export_format};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analysis::{AnalysisPipeline, AnalysisResult, RiskLevel};
use crate::extraction::{FileInfo, extract_metadata};

/// Análisis de un archivo junto con sus datos básicos.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub file: FileInfo,
    pub analysis: AnalysisResult,
    pub processing_time_ms: u64,
    pub analyzed_at: DateTime<Utc>,
}

impl FileReport {
    /// Extrae, clasifica y puntúa `bytes` como el contenido de `path`.
    pub fn analyze(
        path: &Path,
        bytes: &[u8],
        pipeline: &AnalysisPipeline,
        platform: Option<&str>,
    ) -> Self {
        let started = Instant::now();
        let file = FileInfo::from_bytes(&display_name(path), bytes);
        let raw = extract_metadata(bytes, &file.mime);
        let analysis = pipeline.analyze(&raw, platform);

        Self {
            path: path.to_path_buf(),
            file,
            analysis,
            processing_time_ms: started.elapsed().as_millis() as u64,
            analyzed_at: Utc::now(),
        }
    }
}

/// Puntuación y nivel en un momento dado.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RiskSnapshot {
    pub score: u8,
    pub level: RiskLevel,
}

impl From<&AnalysisResult> for RiskSnapshot {
    fn from(analysis: &AnalysisResult) -> Self {
        Self {
            score: analysis.score(),
            level: analysis.level(),
        }
    }
}

/// Resultado de limpiar un archivo y guardar la copia saneada.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CleanReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub mime: String,
    pub scope: String,
    pub modified: bool,
    pub before: RiskSnapshot,
    pub after: RiskSnapshot,
}

impl CleanReport {
    pub fn score_reduction(&self) -> u8 {
        self.before.score.saturating_sub(self.after.score)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

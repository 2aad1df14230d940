//! Análisis y limpieza masiva de archivos con eventos de progreso.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::analysis::AnalysisPipeline;
use crate::error::BatchError;
use crate::extraction::{FileKind, detect_mime, extract_metadata};
use crate::removal::{RemovalScope, remove_metadata};
use crate::report::{CleanReport, FileReport, RiskSnapshot, display_name};

/// Prefijo de las copias limpias que se guardan junto al original.
pub const CLEAN_PREFIX: &str = "clean_";

/// Filtros disponibles para seleccionar qué archivos se procesarán.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum DirectoryFilter {
    #[default]
    Todos,
    SoloImagenes,
    SoloPdf,
    SoloOffice,
}

impl DirectoryFilter {
    pub fn matches(self, path: &Path) -> bool {
        match (self, FileKind::from_path(path)) {
            (_, FileKind::Unsupported) => false,
            (DirectoryFilter::Todos, _) => true,
            (DirectoryFilter::SoloImagenes, kind) => kind == FileKind::Image,
            (DirectoryFilter::SoloPdf, kind) => kind == FileKind::Pdf,
            (DirectoryFilter::SoloOffice, kind) => kind == FileKind::Office,
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "" | "todos" | "todo" => Some(DirectoryFilter::Todos),
            "imagenes" | "imágenes" | "imagen" => Some(DirectoryFilter::SoloImagenes),
            "pdf" => Some(DirectoryFilter::SoloPdf),
            "office" => Some(DirectoryFilter::SoloOffice),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DirectoryFilter::Todos => "todos los formatos",
            DirectoryFilter::SoloImagenes => "solo imágenes",
            DirectoryFilter::SoloPdf => "solo PDF",
            DirectoryFilter::SoloOffice => "solo documentos Office",
        }
    }
}

/// Trabajo a aplicar sobre cada archivo del lote.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BatchJob {
    Analyze { platform: Option<String> },
    /// Sin plataforma se elimina toda la metadata.
    Clean { platform: Option<String> },
}

impl BatchJob {
    fn label(&self) -> &'static str {
        match self {
            BatchJob::Analyze { .. } => "análisis",
            BatchJob::Clean { .. } => "limpieza",
        }
    }
}

#[derive(Clone, Debug)]
pub enum BatchOutcome {
    Analyzed(Box<FileReport>),
    Cleaned(CleanReport),
}

#[derive(Clone, Debug)]
pub enum BatchEvent {
    Started { total: usize },
    Processing { index: usize, total: usize, path: PathBuf },
    Success { path: PathBuf, outcome: BatchOutcome },
    Failure { path: PathBuf, error: String },
    Finished { successes: usize, failures: usize },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchSummary {
    pub successes: usize,
    pub failures: usize,
}

/// Recorre `root` y devuelve, ordenados, los archivos cuyo formato admite el filtro.
pub fn collect_candidate_files(
    root: &Path,
    recursive: bool,
    filter: DirectoryFilter,
) -> Result<Vec<PathBuf>, BatchError> {
    if !root.is_dir() {
        return Err(BatchError::NotADirectory(root.to_path_buf()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && filter.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), recursive, found = files.len(), "archivos candidatos");
    Ok(files)
}

/// Lee y analiza un archivo del disco.
pub fn analyze_file(
    path: &Path,
    pipeline: &AnalysisPipeline,
    platform: Option<&str>,
) -> Result<FileReport, BatchError> {
    let bytes = read_file(path)?;
    Ok(FileReport::analyze(path, &bytes, pipeline, platform))
}

/// Limpia un archivo y guarda la copia como `clean_<nombre>` en el mismo directorio.
///
/// El original no se modifica. El riesgo posterior se calcula sobre la copia.
pub fn clean_file(
    path: &Path,
    pipeline: &AnalysisPipeline,
    scope: RemovalScope<'_>,
) -> Result<CleanReport, BatchError> {
    let bytes = read_file(path)?;
    let mime = detect_mime(&bytes, &display_name(path));
    if FileKind::from_mime(&mime) == FileKind::Unsupported {
        return Err(BatchError::Unsupported {
            path: path.to_path_buf(),
            mime,
        });
    }

    let before = pipeline.analyze(&extract_metadata(&bytes, &mime), None);
    let cleaned = remove_metadata(&bytes, &mime, scope)?;
    let after = pipeline.analyze(&extract_metadata(&cleaned.bytes, &mime), None);

    let output = cleaned_output_path(path);
    fs::write(&output, &cleaned.bytes).map_err(|source| BatchError::Write {
        path: output.clone(),
        source,
    })?;

    Ok(CleanReport {
        source: path.to_path_buf(),
        output,
        mime,
        scope: scope.describe(),
        modified: cleaned.modified,
        before: RiskSnapshot::from(&before),
        after: RiskSnapshot::from(&after),
    })
}

pub fn cleaned_output_path(path: &Path) -> PathBuf {
    path.with_file_name(format!("{CLEAN_PREFIX}{}", display_name(path)))
}

fn is_cleaned_output(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(CLEAN_PREFIX))
}

fn read_file(path: &Path) -> Result<Vec<u8>, BatchError> {
    fs::read(path).map_err(|source| BatchError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Procesa `files` en orden y notifica el progreso por `sender`.
///
/// Un fallo en un archivo no detiene el lote. En limpieza se omiten las
/// copias `clean_` de ejecuciones anteriores.
pub fn run_batch_with_sender(
    mut files: Vec<PathBuf>,
    pipeline: AnalysisPipeline,
    job: BatchJob,
    sender: Sender<BatchEvent>,
) -> BatchSummary {
    if matches!(job, BatchJob::Clean { .. }) {
        files.retain(|path| !is_cleaned_output(path));
    }

    let total = files.len();
    let _ = sender.send(BatchEvent::Started { total });

    let mut summary = BatchSummary::default();
    for (index, path) in files.into_iter().enumerate() {
        let _ = sender.send(BatchEvent::Processing {
            index: index + 1,
            total,
            path: path.clone(),
        });

        match process(&path, &pipeline, &job) {
            Ok(outcome) => {
                summary.successes += 1;
                let _ = sender.send(BatchEvent::Success { path, outcome });
            }
            Err(error) => {
                summary.failures += 1;
                warn!(path = %path.display(), %error, "archivo del lote con error");
                let _ = sender.send(BatchEvent::Failure {
                    path,
                    error: error.to_string(),
                });
            }
        }
    }

    info!(
        job = job.label(),
        successes = summary.successes,
        failures = summary.failures,
        "lote completado"
    );
    let _ = sender.send(BatchEvent::Finished {
        successes: summary.successes,
        failures: summary.failures,
    });
    summary
}

fn process(
    path: &Path,
    pipeline: &AnalysisPipeline,
    job: &BatchJob,
) -> Result<BatchOutcome, BatchError> {
    match job {
        BatchJob::Analyze { platform } => {
            analyze_file(path, pipeline, platform.as_deref())
                .map(|report| BatchOutcome::Analyzed(Box::new(report)))
        }
        BatchJob::Clean { platform } => {
            let scope = match platform.as_deref() {
                Some(platform) => RemovalScope::Platform {
                    rules: pipeline.platforms(),
                    platform,
                },
                None => RemovalScope::All,
            };
            clean_file(path, pipeline, scope).map(BatchOutcome::Cleaned)
        }
    }
}

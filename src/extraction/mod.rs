//! Lectura de metadata embebida por formato de archivo.
//!
//! Cualquier fallo de lectura se degrada a un mapa vacío: el análisis de
//! riesgo debe poder continuar aunque el archivo esté dañado.

mod image;
pub(crate) mod office;
pub(crate) mod pdf;


use infer::Infer;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, warn};

use crate::analysis::RawMetadata;
use crate::error::ExtractionError;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_PPTX: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// Familia de formato que determina cómo se lee y limpia un archivo.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Office,
    Unsupported,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            FileKind::Image
        } else if mime == MIME_PDF {
            FileKind::Pdf
        } else if mime.starts_with("application/vnd.openxmlformats-officedocument.") {
            FileKind::Office
        } else {
            FileKind::Unsupported
        }
    }

    /// Clasifica por extensión, sin leer el contenido.
    pub fn from_path(path: &Path) -> Self {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(mime_from_extension)
            .map_or(FileKind::Unsupported, FileKind::from_mime)
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Image => "Imagen",
            FileKind::Pdf => "PDF",
            FileKind::Office => "Documento Office",
            FileKind::Unsupported => "No soportado",
        }
    }
}

/// Devuelve los pares clave/valor de metadata, o un mapa vacío si no hay o no se pudo leer.
pub fn extract_metadata(bytes: &[u8], mime: &str) -> RawMetadata {
    match try_extract_metadata(bytes, mime) {
        Ok(metadata) => {
            debug!(mime, fields = metadata.len(), "metadata extraída");
            metadata
        }
        Err(error) => {
            warn!(mime, %error, "no se pudo leer la metadata, se continúa sin ella");
            RawMetadata::new()
        }
    }
}

/// Igual que [`extract_metadata`], pero propaga el error de lectura.
pub fn try_extract_metadata(bytes: &[u8], mime: &str) -> Result<RawMetadata, ExtractionError> {
    match FileKind::from_mime(mime) {
        FileKind::Image => image::extract_image_metadata(bytes),
        FileKind::Pdf => pdf::extract_pdf_metadata(bytes),
        FileKind::Office => office::extract_office_metadata(bytes),
        FileKind::Unsupported => Ok(RawMetadata::new()),
    }
}

/// Detecta el tipo MIME por contenido y, si no basta, por extensión.
///
/// Un ZIP genérico con extensión de Office se trata como documento Office.
pub fn detect_mime(bytes: &[u8], file_name: &str) -> String {
    let inferred = Infer::new()
        .get(bytes)
        .map(|kind| kind.mime_type().to_string());

    match inferred {
        Some(mime) if mime != "application/zip" => mime,
        inferred => mime_from_extension(file_name)
            .map(str::to_string)
            .or(inferred)
            .unwrap_or_else(|| MIME_OCTET_STREAM.to_string()),
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let mime = match extension.as_str() {
        "jpg" | "jpeg" => MIME_JPEG,
        "png" => MIME_PNG,
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "pdf" => MIME_PDF,
        "docx" => MIME_DOCX,
        "xlsx" => MIME_XLSX,
        "pptx" => MIME_PPTX,
        _ => return None,
    };
    Some(mime)
}

/// Datos básicos del archivo que acompañan a cada reporte.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub kind: FileKind,
    pub sha256: String,
    pub md5: String,
}

impl FileInfo {
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Self {
        let mime = detect_mime(bytes, name);
        let (sha256, md5) = digests(bytes);
        Self {
            name: name.to_string(),
            size: bytes.len() as u64,
            kind: FileKind::from_mime(&mime),
            mime,
            sha256,
            md5,
        }
    }
}

fn digests(bytes: &[u8]) -> (String, String) {
    let mut sha256 = Sha256::new();
    let mut md5 = Md5::new();
    sha256.update(bytes);
    md5.update(bytes);
    (
        format!("{:x}", sha256.finalize()),
        format!("{:x}", md5.finalize()),
    )
}

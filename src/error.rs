//! Errores del motor y de los colaboradores de extracción y limpieza.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::analysis::{Category, RiskLevel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No se pudo leer la configuración `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Configuración inválida: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Peso fuera de rango para `{category}`: {weight} (máximo 100)")]
    WeightOutOfRange { category: Category, weight: u8 },
    #[error("Categoría desconocida: `{0}`")]
    UnknownCategory(String),
    #[error("La política `{platform}` elimina y conserva a la vez: {categories}")]
    PolicyOverlap { platform: String, categories: String },
    #[error("Plataforma duplicada en la configuración: `{0}`")]
    DuplicatePlatform(String),
    #[error("Política de puntuación inválida: {0}")]
    InvalidScoring(String),
    #[error("La longitud máxima de los valores debe ser mayor que cero")]
    InvalidValueLength,
}

/// Entrada cuyo nivel de riesgo no coincide con el que implica su categoría.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(
    "La entrada `{key}` declara riesgo {declared} pero su categoría {category} implica {expected}"
)]
pub struct InvariantViolation {
    pub key: String,
    pub category: Category,
    pub declared: RiskLevel,
    pub expected: RiskLevel,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("EXIF ilegible: {0}")]
    Exif(#[from] exif::Error),
    #[error("PDF ilegible: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Documento Office ilegible: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("XML de metadata ilegible: {0}")]
    Xml(String),
    #[error("Error de lectura: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("No se pudo procesar la imagen: {0}")]
    Image(#[from] image::ImageError),
    #[error("No se pudo procesar el PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("No es un documento Office válido: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Error procesando XML de metadata: {0}")]
    Xml(String),
    #[error("Error de lectura/escritura: {0}")]
    Io(#[from] io::Error),
    #[error("La verificación indicó que la metadata no se eliminó correctamente: {0}")]
    VerificationFailed(String),
    #[error("Las imágenes animadas ({0}) no se limpian: se perderían fotogramas")]
    AnimatedImage(String),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("La ruta proporcionada no es un directorio: `{0}`")]
    NotADirectory(PathBuf),
    #[error("No se pudo recorrer el directorio: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("No se pudo leer `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No se pudo guardar `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{path}` ({mime}) no tiene limpiador disponible")]
    Unsupported { path: PathBuf, mime: String },
    #[error(transparent)]
    Removal(#[from] RemovalError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Formato de exportación no reconocido: `{0}`")]
    UnknownFormat(String),
    #[error("No se pudo serializar JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No se pudo escribir el CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("No se pudo escribir el XLSX: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("No se pudo guardar el reporte: {0}")]
    Io(#[from] io::Error),
}

/// Error de nivel superior del binario interactivo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("No se pudo acceder a `{path}`: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Usage(String),
}

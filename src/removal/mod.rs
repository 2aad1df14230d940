//! Limpieza de metadata por formato, total o acotada a una plataforma de destino.
//!
//! La limpieza no depende del análisis de riesgo: recibe bytes y devuelve
//! bytes con el mismo tipo MIME.

mod image;
mod office;
mod pdf;


use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::{PlatformRuleEngine, categorize};
use crate::error::RemovalError;
use crate::extraction::FileKind;

/// Qué campos se eliminan.
///
/// Las imágenes se reescriben siempre sin metadata, sea cual sea el alcance.
#[derive(Clone, Copy, Debug)]
pub enum RemovalScope<'a> {
    All,
    Platform {
        rules: &'a PlatformRuleEngine,
        platform: &'a str,
    },
}

impl RemovalScope<'_> {
    /// Indica si la clave debe eliminarse bajo este alcance.
    pub fn removes(&self, key: &str) -> bool {
        match self {
            RemovalScope::All => true,
            RemovalScope::Platform { rules, platform } => {
                rules.is_risky(categorize(key, ""), platform)
            }
        }
    }

    pub fn is_total(&self) -> bool {
        match self {
            RemovalScope::All => true,
            RemovalScope::Platform { rules, platform } => {
                rules.policy_for(platform).removes_everything()
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RemovalScope::All => "toda la metadata".to_string(),
            RemovalScope::Platform { rules, platform } => {
                format!("reglas de {}", rules.policy_for(platform).display_name)
            }
        }
    }
}

/// Resultado de la limpieza.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CleanedFile {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime: String,
    pub modified: bool,
}

impl CleanedFile {
    fn unchanged(bytes: &[u8], mime: &str) -> Self {
        Self {
            bytes: bytes.to_vec(),
            mime: mime.to_string(),
            modified: false,
        }
    }
}

/// Elimina la metadata de `bytes` conservando el tipo MIME.
///
/// Los formatos sin limpiador se devuelven intactos con `modified = false`.
pub fn remove_metadata(
    bytes: &[u8],
    mime: &str,
    scope: RemovalScope<'_>,
) -> Result<CleanedFile, RemovalError> {
    let cleaned = match FileKind::from_mime(mime) {
        FileKind::Image => image::remove_image_metadata(bytes, mime)?,
        FileKind::Pdf => pdf::remove_pdf_metadata(bytes, &scope)?,
        FileKind::Office => office::remove_office_metadata(bytes, &scope)?,
        FileKind::Unsupported => {
            debug!(mime, "formato sin limpiador, se devuelve sin cambios");
            return Ok(CleanedFile::unchanged(bytes, mime));
        }
    };

    let modified = cleaned != bytes;
    info!(
        mime,
        scope = %scope.describe(),
        modified,
        size = cleaned.len(),
        "limpieza completada"
    );
    Ok(CleanedFile {
        bytes: cleaned,
        mime: mime.to_string(),
        modified,
    })
}

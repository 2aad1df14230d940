//! Limpieza de propiedades `docProps` en paquetes OOXML.

mod archive;
mod constants;
mod sanitize;
mod verify;

use archive::rewrite_package;
use sanitize::{sanitize_custom_properties, sanitize_properties};

pub(crate) use verify::verify_office_metadata_clean;

use super::RemovalScope;
use crate::error::RemovalError;
use crate::extraction::office::{APP_PATH, CORE_PATH, CUSTOM_PATH};

/// Neutraliza la metadata del documento y deja el resto del paquete intacto.
pub(super) fn remove_office_metadata(
    bytes: &[u8],
    scope: &RemovalScope<'_>,
) -> Result<Vec<u8>, RemovalError> {
    let (output, modified) = rewrite_package(bytes, |name, contents| match name {
        CORE_PATH | APP_PATH => sanitize_properties(contents, scope),
        CUSTOM_PATH => sanitize_custom_properties(contents, scope),
        _ => Ok((contents, false)),
    })?;

    if !modified {
        return Ok(bytes.to_vec());
    }

    if !verify_office_metadata_clean(&output, scope)? {
        return Err(RemovalError::VerificationFailed(
            "el documento conserva propiedades sensibles".to_string(),
        ));
    }
    Ok(output)
}

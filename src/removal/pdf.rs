//! Limpieza del diccionario Info y del flujo XMP de documentos PDF.

use lopdf::{Document, Object};
use tracing::debug;

use super::RemovalScope;
use crate::error::RemovalError;
use crate::extraction::pdf::{deref_dictionary, has_xmp_stream};

/// El flujo XMP duplica el diccionario Info en un formato que no se filtra por campo,
/// así que se elimina con cualquier alcance.
pub(super) fn remove_pdf_metadata(
    bytes: &[u8],
    scope: &RemovalScope<'_>,
) -> Result<Vec<u8>, RemovalError> {
    let mut doc = Document::load_mem(bytes)?;

    let mut modified = strip_info(&mut doc, scope)?;
    modified |= strip_xmp(&mut doc)?;

    if !modified {
        return Ok(bytes.to_vec());
    }

    let pruned = doc.prune_objects();
    debug!(pruned = pruned.len(), "objetos huérfanos eliminados");

    let mut output = Vec::new();
    doc.save_to(&mut output)?;

    let cleaned = Document::load_mem(&output)?;
    if let Some(key) = remaining_key(&cleaned, scope) {
        return Err(RemovalError::VerificationFailed(format!(
            "el PDF conserva el campo `{key}`"
        )));
    }
    Ok(output)
}

fn strip_info(doc: &mut Document, scope: &RemovalScope<'_>) -> Result<bool, RemovalError> {
    let Ok(info) = doc.trailer.get(b"Info") else {
        return Ok(false);
    };

    if scope.is_total() {
        doc.trailer.remove(b"Info");
        return Ok(true);
    }

    let info_dict = match info {
        Object::Reference(reference) => {
            let reference = *reference;
            doc.get_object_mut(reference)?.as_dict_mut()?
        }
        Object::Dictionary(_) => doc.trailer.get_mut(b"Info")?.as_dict_mut()?,
        _ => {
            doc.trailer.remove(b"Info");
            return Ok(true);
        }
    };

    let doomed: Vec<Vec<u8>> = info_dict
        .iter()
        .map(|(key, _)| key)
        .filter(|key| scope.removes(&String::from_utf8_lossy(key)))
        .cloned()
        .collect();
    for key in &doomed {
        info_dict.remove(key);
    }
    Ok(!doomed.is_empty())
}

fn strip_xmp(doc: &mut Document) -> Result<bool, RemovalError> {
    if !has_xmp_stream(doc) {
        return Ok(false);
    }
    let root = doc.trailer.get(b"Root")?.as_reference()?;
    doc.get_object_mut(root)?.as_dict_mut()?.remove(b"Metadata");
    Ok(true)
}

fn remaining_key(doc: &Document, scope: &RemovalScope<'_>) -> Option<String> {
    if has_xmp_stream(doc) {
        return Some("Metadata".to_string());
    }
    let info = doc.trailer.get(b"Info").ok()?;
    let info = deref_dictionary(doc, info)?;
    info.iter()
        .map(|(key, _)| String::from_utf8_lossy(key).to_string())
        .find(|key| scope.removes(key))
}

//! Diccionario Info de documentos PDF.

use lopdf::{Dictionary, Document, Object};

use crate::analysis::RawMetadata;
use crate::error::ExtractionError;

pub(super) const XMP_MARKER_KEY: &str = "Metadata";
const XMP_MARKER_VALUE: &str = "XMP";

pub(super) fn extract_pdf_metadata(bytes: &[u8]) -> Result<RawMetadata, ExtractionError> {
    let doc = Document::load_mem(bytes)?;
    let mut metadata = RawMetadata::new();

    if let Ok(info) = doc.trailer.get(b"Info")
        && let Some(info) = deref_dictionary(&doc, info)
    {
        for (key, value) in info.iter() {
            let Some(value) = object_to_string(&doc, value) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            metadata.insert(String::from_utf8_lossy(key).to_string(), value);
        }
    }

    if has_xmp_stream(&doc) {
        metadata.insert(XMP_MARKER_KEY, XMP_MARKER_VALUE);
    }

    Ok(metadata)
}

pub(crate) fn deref_dictionary<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(reference) => doc.get_dictionary(*reference).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

pub(crate) fn has_xmp_stream(doc: &Document) -> bool {
    doc.trailer
        .get(b"Root")
        .ok()
        .and_then(|root| deref_dictionary(doc, root))
        .is_some_and(|catalog| catalog.has(b"Metadata"))
}

fn object_to_string(doc: &Document, obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes).trim().to_string()),
        Object::Name(name) => Some(String::from_utf8_lossy(name).trim().to_string()),
        Object::Integer(value) => Some(value.to_string()),
        Object::Real(value) => Some(value.to_string()),
        Object::Boolean(value) => Some(value.to_string()),
        Object::Reference(reference) => doc
            .get_object(*reference)
            .ok()
            .and_then(|inner| object_to_string(doc, inner)),
        _ => None,
    }
}

/// Cadenas de texto PDF: UTF-16BE con BOM o, si no, un byte por carácter.
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }
    bytes.iter().map(|byte| char::from(*byte)).collect()
}

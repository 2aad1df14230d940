//! Propiedades `docProps` de documentos OOXML (docx, xlsx, pptx).

use std::io::{Cursor, Read};
use xmltree::{Element, XMLNode};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::analysis::RawMetadata;
use crate::error::ExtractionError;

pub(crate) const CORE_PATH: &str = "docProps/core.xml";
pub(crate) const APP_PATH: &str = "docProps/app.xml";
pub(crate) const CUSTOM_PATH: &str = "docProps/custom.xml";
pub(crate) const CUSTOM_KEY_PREFIX: &str = "custom:";

/// Campos cuyo valor neutro no es vacío.
const NEUTRAL_OVERRIDES: [(&str, &str); 1] = [("cp:revision", "1")];

/// Valor que sustituye a `current` en la propiedad `key` al limpiarla.
///
/// Los contadores quedan en cero y los booleanos en `false` para que el
/// documento siga siendo válido según el esquema.
pub(crate) fn neutral_value(key: &str, current: &str) -> &'static str {
    if let Some((_, value)) = NEUTRAL_OVERRIDES.iter().find(|(name, _)| *name == key) {
        return value;
    }
    let current = current.trim();
    if current.parse::<i64>().is_ok() {
        "0"
    } else if current.eq_ignore_ascii_case("true") || current.eq_ignore_ascii_case("false") {
        "false"
    } else {
        ""
    }
}

pub(super) fn extract_office_metadata(bytes: &[u8]) -> Result<RawMetadata, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut metadata = RawMetadata::new();

    if let Some(root) = read_part(&mut archive, CORE_PATH)? {
        for (key, value) in scalar_children(&root) {
            metadata.insert(key, value);
        }
    }

    if let Some(root) = read_part(&mut archive, APP_PATH)? {
        for (key, value) in scalar_children(&root) {
            metadata.insert(key, value);
        }
    }

    if let Some(root) = read_part(&mut archive, CUSTOM_PATH)? {
        for (name, value) in custom_properties(&root) {
            metadata.insert(format!("{CUSTOM_KEY_PREFIX}{name}"), value);
        }
    }

    Ok(metadata)
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<Element>, ExtractionError> {
    let mut contents = Vec::new();
    match archive.by_name(name) {
        Ok(mut file) => {
            file.read_to_end(&mut contents)?;
        }
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(error) => return Err(error.into()),
    }
    Element::parse(Cursor::new(contents))
        .map(Some)
        .map_err(|e| ExtractionError::Xml(format!("{name}: {e}")))
}

/// Clave calificada tal como aparece en el XML (`dc:creator`, `Company`).
pub(crate) fn qualified_name(element: &Element) -> String {
    match element.prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", element.name),
        _ => element.name.clone(),
    }
}

/// Hijos directos sin elementos anidados y con un valor distinto del neutro.
fn scalar_children(root: &Element) -> Vec<(String, String)> {
    root.children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(child) if !has_element_children(child) => {
                let key = qualified_name(child);
                let text = element_text_content(child);
                (neutral_value(&key, &text) != text).then_some((key, text))
            }
            _ => None,
        })
        .collect()
}

fn has_element_children(element: &Element) -> bool {
    element
        .children
        .iter()
        .any(|node| matches!(node, XMLNode::Element(_)))
}

pub(crate) fn element_text_content(element: &Element) -> String {
    let mut content = String::new();
    for node in &element.children {
        if let XMLNode::Text(text) | XMLNode::CData(text) = node {
            content.push_str(text);
        }
    }
    content.trim().to_string()
}

pub(crate) fn custom_property_name(property: &Element) -> Option<&str> {
    if property.name != "property" {
        return None;
    }
    property
        .attributes
        .get("name")
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
}

fn custom_properties(root: &Element) -> Vec<(String, String)> {
    root.children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(child) => {
                let name = custom_property_name(child)?;
                let value = child
                    .children
                    .iter()
                    .find_map(|node| match node {
                        XMLNode::Element(value_node) => Some(element_text_content(value_node)),
                        _ => None,
                    })
                    .unwrap_or_default();
                (!value.is_empty()).then(|| (name.to_string(), value))
            }
            _ => None,
        })
        .collect()
}

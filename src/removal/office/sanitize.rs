use std::io::Cursor;
use xmltree::{EmitterConfig, Element, XMLNode};

use super::constants::CUSTOM_PROPERTIES_EMPTY;
use crate::error::RemovalError;
use crate::extraction::office::{
    CUSTOM_KEY_PREFIX, custom_property_name, element_text_content, neutral_value, qualified_name,
};
use crate::removal::RemovalScope;

/// Neutraliza las propiedades de `core.xml` o `app.xml` que el alcance elimina.
pub(super) fn sanitize_properties(
    contents: Vec<u8>,
    scope: &RemovalScope<'_>,
) -> Result<(Vec<u8>, bool), RemovalError> {
    let mut root = parse_xml(&contents)?;

    let mut modified = false;
    for node in root.children.iter_mut() {
        let XMLNode::Element(child) = node else {
            continue;
        };
        if child
            .children
            .iter()
            .any(|node| matches!(node, XMLNode::Element(_)))
        {
            continue;
        }

        let key = qualified_name(child);
        let current = element_text_content(child);
        if current.is_empty() || !scope.removes(&key) {
            continue;
        }
        modified |= set_element_text(child, neutral_value(&key, &current));
    }

    if !modified {
        return Ok((contents, false));
    }
    Ok((write_xml(&root)?, true))
}

/// Con alcance total se sustituye por la plantilla vacía; si no, se quitan solo las propiedades afectadas.
pub(super) fn sanitize_custom_properties(
    contents: Vec<u8>,
    scope: &RemovalScope<'_>,
) -> Result<(Vec<u8>, bool), RemovalError> {
    if scope.is_total() {
        let sanitized = CUSTOM_PROPERTIES_EMPTY.as_bytes().to_vec();
        let modified = contents != sanitized;
        return Ok((sanitized, modified));
    }

    let mut root = parse_xml(&contents)?;
    let before = root.children.len();
    root.children.retain(|node| match node {
        XMLNode::Element(child) => custom_property_name(child)
            .is_none_or(|name| !scope.removes(&format!("{CUSTOM_KEY_PREFIX}{name}"))),
        _ => true,
    });

    if root.children.len() == before {
        return Ok((contents, false));
    }
    Ok((write_xml(&root)?, true))
}

pub(super) fn parse_xml(contents: &[u8]) -> Result<Element, RemovalError> {
    Element::parse(Cursor::new(contents))
        .map_err(|e| RemovalError::Xml(format!("Error leyendo XML de metadata: {e}")))
}

fn write_xml(root: &Element) -> Result<Vec<u8>, RemovalError> {
    let mut output = Vec::new();
    let mut config = EmitterConfig::new();
    config.perform_indent = false;
    config.write_document_declaration = true;
    root.write_with_config(&mut output, config)
        .map_err(|e| RemovalError::Xml(format!("Error escribiendo XML sanitizado: {e}")))?;
    Ok(output)
}

/// Sustituye el texto de un elemento si difiere del valor actual.
fn set_element_text(element: &mut Element, new_value: &str) -> bool {
    if element_text_content(element) == new_value {
        return false;
    }

    element
        .children
        .retain(|node| !matches!(node, XMLNode::Text(_) | XMLNode::CData(_)));
    if !new_value.is_empty() {
        element.children.push(XMLNode::Text(new_value.to_string()));
    }
    true
}

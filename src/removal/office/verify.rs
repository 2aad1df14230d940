use std::io::{Cursor, Read};
use xmltree::{Element, XMLNode};
use zip::ZipArchive;
use zip::result::ZipError;

use super::sanitize::parse_xml;
use crate::error::RemovalError;
use crate::extraction::office::{
    APP_PATH, CORE_PATH, CUSTOM_KEY_PREFIX, CUSTOM_PATH, custom_property_name,
    element_text_content, neutral_value, qualified_name,
};
use crate::removal::RemovalScope;

/// Comprueba que ningún campo que el alcance elimina conserva un valor identificable.
pub(crate) fn verify_office_metadata_clean(
    bytes: &[u8],
    scope: &RemovalScope<'_>,
) -> Result<bool, RemovalError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    for name in [CORE_PATH, APP_PATH] {
        if let Some(root) = read_part(&mut archive, name)?
            && !properties_clean(&root, scope)
        {
            return Ok(false);
        }
    }

    match read_part(&mut archive, CUSTOM_PATH)? {
        Some(root) => Ok(custom_clean(&root, scope)),
        None => Ok(true),
    }
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<Element>, RemovalError> {
    let mut contents = Vec::new();
    match archive.by_name(name) {
        Ok(mut file) => {
            file.read_to_end(&mut contents)?;
        }
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(error) => return Err(error.into()),
    }
    parse_xml(&contents).map(Some)
}

fn properties_clean(root: &Element, scope: &RemovalScope<'_>) -> bool {
    root.children.iter().all(|node| match node {
        XMLNode::Element(child) => {
            let key = qualified_name(child);
            let text = element_text_content(child);
            text.is_empty() || !scope.removes(&key) || neutral_value(&key, &text) == text
        }
        _ => true,
    })
}

fn custom_clean(root: &Element, scope: &RemovalScope<'_>) -> bool {
    root.children.iter().all(|node| match node {
        XMLNode::Element(child) => match custom_property_name(child) {
            Some(name) => !scope.removes(&format!("{CUSTOM_KEY_PREFIX}{name}")),
            None => !scope.is_total(),
        },
        _ => true,
    })
}

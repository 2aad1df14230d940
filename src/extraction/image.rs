//! Campos EXIF de la imagen principal.

use exif::{Exif, Field, In, Reader, Tag, Value};
use std::io::Cursor;

use crate::analysis::RawMetadata;
use crate::error::ExtractionError;

pub(super) const GPS_POSITION_KEY: &str = "GPSPosition";

pub(super) fn extract_image_metadata(bytes: &[u8]) -> Result<RawMetadata, ExtractionError> {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) | Err(exif::Error::BlankValue(_)) => {
            return Ok(RawMetadata::new());
        }
        Err(error) => return Err(error.into()),
    };

    let mut metadata = RawMetadata::new();
    for field in exif.fields() {
        if field.ifd_num != In::PRIMARY || field.tag == Tag::MakerNote {
            continue;
        }
        let value = field_value(field, &exif);
        if value.is_empty() {
            continue;
        }
        metadata.insert(field.tag.to_string(), value);
    }

    if let Some(position) = gps_position(&exif) {
        metadata.insert(GPS_POSITION_KEY, position);
    }

    Ok(metadata)
}

/// Texto sin comillas para ASCII; el resto usa la representación de kamadak-exif con unidad.
fn field_value(field: &Field, exif: &Exif) -> String {
    match &field.value {
        Value::Ascii(texts) => texts
            .iter()
            .map(|text| String::from_utf8_lossy(text).trim_end_matches('\0').trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => field.display_value().with_unit(exif).to_string().trim().to_string(),
    }
}

/// Coordenadas en grados decimales con signo, `"lat, lon"`.
fn gps_position(exif: &Exif) -> Option<String> {
    let latitude = signed_coordinate(
        exif.get_field(Tag::GPSLatitude, In::PRIMARY)?,
        exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY)?,
        b'S',
    )?;
    let longitude = signed_coordinate(
        exif.get_field(Tag::GPSLongitude, In::PRIMARY)?,
        exif.get_field(Tag::GPSLongitudeRef, In::PRIMARY)?,
        b'W',
    )?;
    Some(format!("{latitude:.6}, {longitude:.6}"))
}

fn signed_coordinate(coordinate: &Field, reference: &Field, negative: u8) -> Option<f64> {
    let Value::Rational(parts) = &coordinate.value else {
        return None;
    };
    let degrees = parts.first()?.to_f64();
    let minutes = parts.get(1).map(|part| part.to_f64()).unwrap_or(0.0);
    let seconds = parts.get(2).map(|part| part.to_f64()).unwrap_or(0.0);
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    if !decimal.is_finite() {
        return None;
    }

    let Value::Ascii(texts) = &reference.value else {
        return None;
    };
    let is_negative = texts
        .first()
        .and_then(|text| text.first())
        .is_some_and(|byte| byte.eq_ignore_ascii_case(&negative));

    Some(if is_negative { -decimal } else { decimal })
}

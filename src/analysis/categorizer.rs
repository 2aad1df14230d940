//! Clasificación de claves de metadata por palabras clave.
//!
//! Las listas se evalúan en este orden y gana la primera coincidencia:
//! ubicación, dispositivo, datos personales, autoría, cámara, software y
//! fecha/hora. Cambiar el orden altera las puntuaciones, porque claves como
//! `ExposureTime` o `GPSTimeStamp` coinciden con más de una lista.

use super::category::Category;

const LOCATION_KEYWORDS: &[&str] = &[
    "gps",
    "latitude",
    "longitude",
    "altitude",
    "location",
    "geotag",
    "country",
    "sublocation",
    "coordinates",
];

const DEVICE_KEYWORDS: &[&str] = &[
    "make",
    "model",
    "serial",
    "device",
    "lens",
    "hostcomputer",
];

const PERSONAL_KEYWORDS: &[&str] = &[
    "owner",
    "company",
    "manager",
    "email",
    "phone",
    "contact",
    "address",
    "usercomment",
];

const AUTHOR_KEYWORDS: &[&str] = &[
    "author",
    "artist",
    "creator",
    "copyright",
    "lastmodifiedby",
    "byline",
    "rights",
];

const CAMERA_KEYWORDS: &[&str] = &[
    "exposure",
    "iso",
    "fnumber",
    "aperture",
    "flash",
    "focal",
    "shutter",
    "whitebalance",
    "metering",
    "sensitivity",
    "brightness",
    "scenecapture",
];

const SOFTWARE_KEYWORDS: &[&str] = &[
    "software",
    "producer",
    "application",
    "program",
    "processing",
    "generator",
    "tool",
];

const TIMESTAMP_KEYWORDS: &[&str] = &[
    "datetime",
    "date",
    "time",
    "created",
    "modified",
    "timestamp",
];

/// Reglas en orden de precedencia.
pub const CATEGORY_RULES: [(Category, &[&str]); 7] = [
    (Category::Location, LOCATION_KEYWORDS),
    (Category::Device, DEVICE_KEYWORDS),
    (Category::Personal, PERSONAL_KEYWORDS),
    (Category::Author, AUTHOR_KEYWORDS),
    (Category::Camera, CAMERA_KEYWORDS),
    (Category::Software, SOFTWARE_KEYWORDS),
    (Category::Timestamp, TIMESTAMP_KEYWORDS),
];

/// Asigna una categoría a una clave de metadata.
///
/// El valor no interviene en la decisión; se acepta para que la firma sea
/// simétrica con el par que entrega el extractor.
pub fn categorize(key: &str, _value: &str) -> Category {
    let key = key.to_ascii_lowercase();
    if key.is_empty() {
        return Category::Other;
    }

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| key.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Palabras clave asociadas a una categoría (vacío para `Other`).
pub fn keywords_for(category: Category) -> &'static [&'static str] {
    CATEGORY_RULES
        .iter()
        .find(|(candidate, _)| *candidate == category)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

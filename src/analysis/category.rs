//! Categorías semánticas de metadata y niveles de riesgo derivados.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Tipo de información que revela un campo de metadata.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Location,
    Device,
    Author,
    Personal,
    Camera,
    Software,
    Timestamp,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Location,
        Category::Device,
        Category::Author,
        Category::Personal,
        Category::Camera,
        Category::Software,
        Category::Timestamp,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Location => "location",
            Category::Device => "device",
            Category::Author => "author",
            Category::Personal => "personal",
            Category::Camera => "camera",
            Category::Software => "software",
            Category::Timestamp => "timestamp",
            Category::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Location => "Ubicación",
            Category::Device => "Dispositivo",
            Category::Author => "Autoría",
            Category::Personal => "Datos personales",
            Category::Camera => "Ajustes de cámara",
            Category::Software => "Software",
            Category::Timestamp => "Fecha/Hora",
            Category::Other => "Otros",
        }
    }

    /// Texto explicativo que acompaña a cada factor de riesgo.
    pub fn description(self) -> &'static str {
        match self {
            Category::Location => {
                "El archivo contiene coordenadas GPS o datos de ubicación que revelan dónde se creó"
            }
            Category::Device => "El archivo identifica el fabricante, modelo o número de serie del dispositivo",
            Category::Author => "El archivo contiene el nombre del autor, creador o titular de derechos",
            Category::Personal => {
                "El archivo contiene datos personales u organizacionales (propietario, empresa, contacto)"
            }
            Category::Camera => "El archivo contiene ajustes técnicos de la cámara",
            Category::Software => "El archivo revela el software usado para crearlo o editarlo",
            Category::Timestamp => "El archivo contiene marcas de tiempo de creación o modificación",
            Category::Other => "El archivo contiene metadata técnica adicional",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownCategory(input.to_string()))
    }
}

/// Severidad ordenada de menor a mayor.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::None => "Sin riesgo",
            RiskLevel::Low => "Bajo",
            RiskLevel::Medium => "Medio",
            RiskLevel::High => "Alto",
            RiskLevel::Critical => "Crítico",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskLevel::Critical => {
                "Riesgo de privacidad crítico. Elimina la metadata antes de compartir el archivo."
            }
            RiskLevel::High => {
                "Se encontró metadata sensible. Conviene eliminarla antes de compartir."
            }
            RiskLevel::Medium => {
                "Se detectó algo de metadata. Revísala antes de publicarla en redes sociales."
            }
            RiskLevel::Low => "Metadata mínima detectada. Relativamente seguro para compartir.",
            RiskLevel::None => "No se detectó metadata relevante. El archivo parece limpio.",
        }
    }

    /// Consejos adicionales mostrados junto a la recomendación principal.
    pub fn tips(self) -> &'static [&'static str] {
        match self {
            RiskLevel::Critical => &[
                "No compartas este archivo sin eliminar su metadata",
                "Las coordenadas GPS exponen tu ubicación exacta",
                "Elimina toda la metadata antes de compartir",
                "Considera cuándo y dónde se creó este archivo",
            ],
            RiskLevel::High => &[
                "Elimina la metadata antes de publicarlo en redes sociales",
                "Puede exponer información personal",
                "Usa la limpieza por plataforma para conservar solo lo necesario",
            ],
            RiskLevel::Medium => &[
                "Parte de la metadata puede revelar información sobre ti",
                "Considera eliminarla al compartir contenido sensible",
                "Seguro para la mayoría de envíos privados",
            ],
            RiskLevel::Low => &[
                "Riesgo de privacidad mínimo",
                "Solo hay metadata básica",
                "En general es seguro compartirlo",
            ],
            RiskLevel::None => &[
                "No se detectó metadata significativa",
                "El archivo parece limpio",
                "Seguro para compartir",
            ],
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

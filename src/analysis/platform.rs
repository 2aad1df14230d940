//! Reglas por plataforma de destino: qué categorías se consideran riesgosas al publicar.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::warn;

use super::category::Category;
use super::entry::MetadataEntry;
use crate::error::ConfigError;

pub const GENERAL_PLATFORM: &str = "general";
const REMOVE_ALL_MARKER: &str = "all";

/// Conjunto de categorías a eliminar, o todas (`"all"`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum RemoveRule {
    All,
    Categories(BTreeSet<Category>),
}

impl RemoveRule {
    pub fn contains(&self, category: Category) -> bool {
        match self {
            RemoveRule::All => true,
            RemoveRule::Categories(categories) => categories.contains(&category),
        }
    }
}

impl TryFrom<Vec<String>> for RemoveRule {
    type Error = ConfigError;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        if values
            .iter()
            .any(|value| value.trim().eq_ignore_ascii_case(REMOVE_ALL_MARKER))
        {
            return Ok(RemoveRule::All);
        }
        values
            .iter()
            .map(|value| value.parse::<Category>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(RemoveRule::Categories)
    }
}

impl From<RemoveRule> for Vec<String> {
    fn from(rule: RemoveRule) -> Self {
        match rule {
            RemoveRule::All => vec![REMOVE_ALL_MARKER.to_string()],
            RemoveRule::Categories(categories) => categories
                .into_iter()
                .map(|category| category.as_str().to_string())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlatformPolicy {
    pub platform: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub remove: RemoveRule,
    #[serde(default)]
    pub keep: BTreeSet<Category>,
}

impl PlatformPolicy {
    pub fn new(
        platform: impl Into<String>,
        remove: RemoveRule,
        keep: impl IntoIterator<Item = Category>,
    ) -> Result<Self, ConfigError> {
        let platform = platform.into();
        let policy = Self {
            platform: normalize_platform(&platform),
            display_name: platform,
            description: String::new(),
            remove,
            keep: keep.into_iter().collect(),
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn with_details(mut self, display_name: &str, description: &str) -> Self {
        self.display_name = display_name.to_string();
        self.description = description.to_string();
        self
    }

    /// Una categoría no puede figurar a la vez en `remove` y en `keep`.
    ///
    /// Con `"all"` no hay solapamiento posible: `keep` actúa como excepción.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let RemoveRule::Categories(removed) = &self.remove {
            let overlap: Vec<&str> = removed
                .intersection(&self.keep)
                .map(|category| category.as_str())
                .collect();
            if !overlap.is_empty() {
                return Err(ConfigError::PolicyOverlap {
                    platform: self.platform.clone(),
                    categories: overlap.join(", "),
                });
            }
        }
        Ok(())
    }

    /// `keep` siempre gana; después se aplica `remove` (o `"all"`).
    pub fn is_risky(&self, category: Category) -> bool {
        if self.keep.contains(&category) {
            return false;
        }
        self.remove.contains(category)
    }

    pub fn removes_everything(&self) -> bool {
        matches!(self.remove, RemoveRule::All) && self.keep.is_empty()
    }

    pub fn general() -> Self {
        Self::builtin(GENERAL_PLATFORM, RemoveRule::All, &[]).with_details(
            "General (eliminar todo)",
            "Eliminación completa de metadata para máxima privacidad",
        )
    }

    /// Política incorporada; sus reglas no se solapan, así que no pasa por `validate`.
    fn builtin(platform: &str, remove: RemoveRule, keep: &[Category]) -> Self {
        Self {
            platform: platform.to_string(),
            display_name: platform.to_string(),
            description: String::new(),
            remove,
            keep: keep.iter().copied().collect(),
        }
    }

    /// Tabla incorporada de plataformas conocidas.
    pub fn defaults() -> Vec<Self> {
        use Category::*;

        let policy = |name: &str,
                      display: &str,
                      description: &str,
                      remove: RemoveRule,
                      keep: &[Category]| {
            Self::builtin(name, remove, keep).with_details(display, description)
        };
        let only = |categories: &[Category]| {
            RemoveRule::Categories(categories.iter().copied().collect())
        };

        vec![
            Self::general(),
            policy(
                "instagram",
                "Instagram",
                "Instagram elimina gran parte del EXIF, pero conviene limpiarlo antes de subirlo",
                RemoveRule::All,
                &[Timestamp],
            ),
            policy(
                "facebook",
                "Facebook",
                "Facebook puede conservar parte de la metadata. Elimina GPS y datos del dispositivo",
                only(&[Location, Device, Camera, Personal]),
                &[Timestamp],
            ),
            policy(
                "twitter",
                "Twitter/X",
                "Twitter elimina parte de la metadata, no toda. Elimina GPS y datos de autoría",
                only(&[Location, Author, Personal]),
                &[],
            ),
            policy(
                "linkedin",
                "LinkedIn",
                "LinkedIn conserva metadata profesional. Elimina GPS y datos del dispositivo",
                only(&[Location, Device, Camera, Software, Personal]),
                &[Author, Timestamp],
            ),
        ]
    }
}

fn normalize_platform(platform: &str) -> String {
    platform.trim().to_lowercase()
}

/// Tabla de políticas de solo lectura, compartida entre hilos.
///
/// Reemplazarla produce un motor nuevo; nunca se modifica en sitio.
#[derive(Clone, Debug)]
pub struct PlatformRuleEngine {
    policies: Arc<HashMap<String, PlatformPolicy>>,
    general: Arc<PlatformPolicy>,
}

impl PlatformRuleEngine {
    pub fn new(policies: impl IntoIterator<Item = PlatformPolicy>) -> Result<Self, ConfigError> {
        let mut table = HashMap::new();
        for mut policy in policies {
            policy.platform = normalize_platform(&policy.platform);
            policy.validate()?;
            if table.contains_key(&policy.platform) {
                return Err(ConfigError::DuplicatePlatform(policy.platform));
            }
            table.insert(policy.platform.clone(), policy);
        }
        Ok(Self::from_table(table))
    }

    fn from_table(mut table: HashMap<String, PlatformPolicy>) -> Self {
        let general = table
            .entry(GENERAL_PLATFORM.to_string())
            .or_insert_with(PlatformPolicy::general)
            .clone();

        Self {
            policies: Arc::new(table),
            general: Arc::new(general),
        }
    }

    /// Construye un motor nuevo con otra tabla; el actual sigue siendo válido para quien lo use.
    pub fn replace_policies(
        &self,
        policies: impl IntoIterator<Item = PlatformPolicy>,
    ) -> Result<Self, ConfigError> {
        Self::new(policies)
    }

    /// Política de la plataforma, o `general` si no existe o no se indicó.
    pub fn policy_for(&self, platform: &str) -> &PlatformPolicy {
        let key = normalize_platform(platform);
        if key.is_empty() {
            return self.general.as_ref();
        }
        match self.policies.get(&key) {
            Some(policy) => policy,
            None => {
                warn!(platform = %key, "plataforma desconocida, se usa la política general");
                self.general.as_ref()
            }
        }
    }

    pub fn contains(&self, platform: &str) -> bool {
        self.policies.contains_key(&normalize_platform(platform))
    }

    pub fn is_risky(&self, category: Category, platform: &str) -> bool {
        self.policy_for(platform).is_risky(category)
    }

    /// Subsecuencia de entradas que la plataforma considera riesgosas, en el orden original.
    pub fn risky_entries<'a>(
        &self,
        entries: &'a [MetadataEntry],
        platform: &str,
    ) -> Vec<&'a MetadataEntry> {
        let policy = self.policy_for(platform);
        entries
            .iter()
            .filter(|entry| policy.is_risky(entry.category()))
            .collect()
    }

    /// Todas las políticas ordenadas por clave, con `general` al final.
    pub fn platforms(&self) -> Vec<&PlatformPolicy> {
        let mut policies: Vec<&PlatformPolicy> = self.policies.values().collect();
        policies.sort_by(|a, b| {
            (a.platform == GENERAL_PLATFORM)
                .cmp(&(b.platform == GENERAL_PLATFORM))
                .then_with(|| a.platform.cmp(&b.platform))
        });
        policies
    }
}

impl Default for PlatformRuleEngine {
    fn default() -> Self {
        Self::from_table(
            PlatformPolicy::defaults()
                .into_iter()
                .map(|policy| (policy.platform.clone(), policy))
                .collect(),
        )
    }
}

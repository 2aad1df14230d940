//! Configuración del analizador: pesos, bandas, umbrales y políticas por plataforma.
//!
//! Se carga una sola vez al arrancar y se trata como de solo lectura.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analysis::{
    LevelThresholds, PlatformPolicy, PlatformRuleEngine, RiskScorer, RiskWeights, ScoringPolicy,
    TierBands,
};
use crate::error::ConfigError;

/// Variable de entorno con la ruta de un archivo de configuración.
pub const ENV_VAR: &str = "METARISK_CONFIG";
/// Archivo que se busca en el directorio de trabajo si la variable no está definida.
pub const DEFAULT_FILE: &str = "metarisk.json";
pub const DEFAULT_MAX_VALUE_LEN: usize = 500;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub weights: RiskWeights,
    pub tiers: TierBands,
    pub scoring: ScoringPolicy,
    pub thresholds: LevelThresholds,
    pub platforms: Vec<PlatformPolicy>,
    pub max_value_len: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            tiers: TierBands::default(),
            scoring: ScoringPolicy::default(),
            thresholds: LevelThresholds::default(),
            platforms: PlatformPolicy::defaults(),
            max_value_len: DEFAULT_MAX_VALUE_LEN,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&contents)?;
        info!(path = %path.display(), "configuración cargada");
        Ok(config)
    }

    /// Busca la configuración en `METARISK_CONFIG`, luego en `metarisk.json`; si no hay, usa los valores por defecto.
    pub fn discover() -> Result<Self, ConfigError> {
        match Self::discover_path(env::var_os(ENV_VAR).map(PathBuf::from), Path::new(DEFAULT_FILE)) {
            Some(path) => Self::load(&path),
            None => {
                debug!("sin archivo de configuración, se usan los valores por defecto");
                Ok(Self::default())
            }
        }
    }

    fn discover_path(from_env: Option<PathBuf>, fallback: &Path) -> Option<PathBuf> {
        if let Some(path) = from_env
            && !path.as_os_str().is_empty()
        {
            return Some(path);
        }
        fallback.is_file().then(|| fallback.to_path_buf())
    }

    /// Valida todas las secciones construyendo los servicios que dependen de ellas.
    pub fn validate(&self) -> Result<(), ConfigError> {
        RiskScorer::new(self)?;
        PlatformRuleEngine::new(self.platforms.iter().cloned())?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

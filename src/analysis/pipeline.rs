//! Orquestación: clasificar, puntuar y, si se indica, evaluar para una plataforma.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use super::categorizer::categorize;
use super::category::{Category, RiskLevel};
use super::entry::{MetadataEntry, RawMetadata};
use super::platform::PlatformRuleEngine;
use super::scoring::{PlatformAssessment, RiskAssessment, RiskScorer};
use crate::config::AnalyzerConfig;
use crate::error::ConfigError;

/// Resultado completo de un análisis, listo para mostrarse o exportarse.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub entries: Vec<MetadataEntry>,
    pub assessment: RiskAssessment,
    pub categories_found: BTreeSet<Category>,
    pub has_gps: bool,
    pub has_camera_info: bool,
    pub has_author_info: bool,
    pub has_software_info: bool,
    pub platform_risk: Option<PlatformAssessment>,
}

impl AnalysisResult {
    pub fn score(&self) -> u8 {
        self.assessment.score
    }

    pub fn level(&self) -> RiskLevel {
        self.assessment.level
    }
}

/// Servicio inmutable construido una vez a partir de la configuración.
///
/// Clonarlo es barato (la tabla de plataformas se comparte), así que puede
/// repartirse entre hilos de trabajo.
#[derive(Clone, Debug, Default)]
pub struct AnalysisPipeline {
    scorer: RiskScorer,
    platforms: PlatformRuleEngine,
}

impl AnalysisPipeline {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            scorer: RiskScorer::new(config)?,
            platforms: PlatformRuleEngine::new(config.platforms.iter().cloned())?,
        })
    }

    /// Devuelve un pipeline con otra tabla de plataformas; `self` no cambia.
    pub fn with_platforms(&self, platforms: PlatformRuleEngine) -> Self {
        Self {
            scorer: self.scorer.clone(),
            platforms,
        }
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn platforms(&self) -> &PlatformRuleEngine {
        &self.platforms
    }

    /// Clasifica cada par en el orden entregado por el extractor.
    pub fn categorize_all(&self, raw: &RawMetadata) -> Vec<MetadataEntry> {
        raw.iter()
            .map(|(key, value)| self.scorer.entry(key, value, categorize(key, value)))
            .collect()
    }

    pub fn analyze(&self, raw: &RawMetadata, platform: Option<&str>) -> AnalysisResult {
        let entries = self.categorize_all(raw);
        let assessment = self.scorer.score(&entries);
        let categories_found = assessment.categories_found();
        let platform_risk = platform
            .map(|platform| self.scorer.analyze_for_platform(&entries, platform, &self.platforms));

        info!(
            entries = entries.len(),
            score = assessment.score,
            level = %assessment.level,
            platform = platform.unwrap_or("-"),
            "análisis completado"
        );

        AnalysisResult {
            has_gps: categories_found.contains(&Category::Location),
            has_camera_info: categories_found.contains(&Category::Device)
                || categories_found.contains(&Category::Camera),
            has_author_info: categories_found.contains(&Category::Author)
                || categories_found.contains(&Category::Personal),
            has_software_info: categories_found.contains(&Category::Software),
            entries,
            assessment,
            categories_found,
            platform_risk,
        }
    }
}

//! Motor de decisión: clasificación de metadata, puntuación de riesgo y reglas por plataforma.
//!
//! Todo lo que vive aquí es cálculo puro sobre datos ya extraídos; no hay E/S
//! ni estado mutable compartido.

mod categorizer;
mod category;
mod entry;
mod pipeline;
mod platform;
mod scoring;

#[cfg(test)]
mod tests;

pub use categorizer::{CATEGORY_RULES, categorize, keywords_for};
pub use category::{Category, RiskLevel};
pub use entry::{MetadataEntry, RawMetadata, truncate_value};
pub use pipeline::{AnalysisPipeline, AnalysisResult};
pub use platform::{GENERAL_PLATFORM, PlatformPolicy, PlatformRuleEngine, RemoveRule};
pub use scoring::{
    LevelThresholds, PlatformAssessment, RiskAssessment, RiskFactor, RiskScorer, RiskWeights,
    ScoringPolicy, Tier, TierBands, TierScore,
};

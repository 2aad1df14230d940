//! Cálculo de la puntuación de riesgo (0-100) y del nivel asociado.
//!
//! La política es escalonada: manda el nivel más grave presente y el volumen
//! solo ajusta dentro de la banda de ese nivel. No es aditiva entre
//! categorías.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, error};

use super::category::{Category, RiskLevel};
use super::entry::{MetadataEntry, truncate_value};
use super::platform::PlatformRuleEngine;
use crate::config::AnalyzerConfig;
use crate::error::{ConfigError, InvariantViolation};

/// Peso (0-100) de cada categoría.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub location: u8,
    pub device: u8,
    pub author: u8,
    pub personal: u8,
    pub camera: u8,
    pub software: u8,
    pub timestamp: u8,
    pub other: u8,
}

impl RiskWeights {
    pub fn weight(&self, category: Category) -> u8 {
        match category {
            Category::Location => self.location,
            Category::Device => self.device,
            Category::Author => self.author,
            Category::Personal => self.personal,
            Category::Camera => self.camera,
            Category::Software => self.software,
            Category::Timestamp => self.timestamp,
            Category::Other => self.other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let weight = self.weight(category);
            if weight > 100 {
                return Err(ConfigError::WeightOutOfRange { category, weight });
            }
        }
        Ok(())
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            location: 90,
            personal: 70,
            author: 60,
            software: 45,
            device: 40,
            camera: 30,
            timestamp: 20,
            other: 5,
        }
    }
}

/// Banda de severidad a la que pertenece un peso.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Tier {
    Low,
    Medium,
    High,
    Critical,
}

/// Pesos mínimos de cada banda.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierBands {
    pub critical: u8,
    pub high: u8,
    pub medium: u8,
}

impl TierBands {
    pub fn tier_of(&self, weight: u8) -> Tier {
        if weight >= self.critical {
            Tier::Critical
        } else if weight >= self.high {
            Tier::High
        } else if weight >= self.medium {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.critical > self.high && self.high > self.medium {
            Ok(())
        } else {
            Err(ConfigError::InvalidScoring(format!(
                "las bandas deben ser estrictamente decrecientes (crítica {}, alta {}, media {})",
                self.critical, self.high, self.medium
            )))
        }
    }
}

impl Default for TierBands {
    fn default() -> Self {
        Self {
            critical: 80,
            high: 60,
            medium: 40,
        }
    }
}

/// Puntuación de una banda: `base + step * (n - 1)`, limitada a `cap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TierScore {
    pub base: u8,
    pub step: u8,
    pub cap: u8,
}

impl TierScore {
    fn score(&self, entries_in_tier: usize) -> u32 {
        let extra = entries_in_tier.saturating_sub(1) as u32;
        (self.base as u32 + self.step as u32 * extra).min(self.cap as u32)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub critical: TierScore,
    pub high: TierScore,
    pub medium: TierScore,
    pub low: TierScore,
    pub volume_threshold: usize,
    pub volume_bonus: u8,
}

impl ScoringPolicy {
    fn tier_score(&self, tier: Tier) -> &TierScore {
        match tier {
            Tier::Critical => &self.critical,
            Tier::High => &self.high,
            Tier::Medium => &self.medium,
            Tier::Low => &self.low,
        }
    }

    /// Las bandas no se solapan; así subir la categoría de una entrada nunca baja la puntuación.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = [
            ("crítica", &self.critical),
            ("alta", &self.high),
            ("media", &self.medium),
            ("baja", &self.low),
        ];
        for (name, tier) in ordered {
            if tier.cap > 100 || tier.base > tier.cap {
                return Err(ConfigError::InvalidScoring(format!(
                    "la banda {name} debe cumplir base <= tope <= 100"
                )));
            }
        }
        for pair in ordered.windows(2) {
            let (upper_name, upper) = pair[0];
            let (lower_name, lower) = pair[1];
            if upper.base <= lower.cap {
                return Err(ConfigError::InvalidScoring(format!(
                    "la base de la banda {upper_name} debe superar el tope de la banda {lower_name}"
                )));
            }
        }
        if self.volume_bonus > 100 {
            return Err(ConfigError::InvalidScoring(
                "el bono por volumen no puede superar 100".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            critical: TierScore {
                base: 85,
                step: 5,
                cap: 95,
            },
            high: TierScore {
                base: 65,
                step: 5,
                cap: 75,
            },
            medium: TierScore {
                base: 40,
                step: 5,
                cap: 55,
            },
            low: TierScore {
                base: 9,
                step: 4,
                cap: 24,
            },
            volume_threshold: 20,
            volume_bonus: 5,
        }
    }
}

/// Umbrales de puntuación para cada nivel; cualquier valor mayor que cero es al menos `low`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelThresholds {
    pub critical: u8,
    pub high: u8,
    pub medium: u8,
}

impl LevelThresholds {
    pub fn level_for(&self, score: u8) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else if score > 0 {
            RiskLevel::Low
        } else {
            RiskLevel::None
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.critical <= 100
            && self.critical > self.high
            && self.high > self.medium
            && self.medium > 0
        {
            Ok(())
        } else {
            Err(ConfigError::InvalidScoring(format!(
                "umbrales de nivel inválidos (crítico {}, alto {}, medio {})",
                self.critical, self.high, self.medium
            )))
        }
    }
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            critical: 75,
            high: 50,
            medium: 25,
        }
    }
}

/// Resumen de una categoría presente, pensado para mostrarse en la interfaz.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: Category,
    pub severity: RiskLevel,
    pub description: String,
    pub entries: Vec<MetadataEntry>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    pub recommendation: String,
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    pub fn empty() -> Self {
        Self {
            score: 0,
            level: RiskLevel::None,
            recommendation: RiskLevel::None.recommendation().to_string(),
            factors: Vec::new(),
        }
    }

    pub fn categories_found(&self) -> BTreeSet<Category> {
        self.factors.iter().map(|factor| factor.category).collect()
    }
}

/// Evaluación restringida a lo que una plataforma considera riesgoso.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlatformAssessment {
    pub platform: String,
    pub requested: String,
    pub assessment: RiskAssessment,
    pub risky_entries: Vec<MetadataEntry>,
    pub retained_entries: Vec<MetadataEntry>,
}

impl PlatformAssessment {
    pub fn score(&self) -> u8 {
        self.assessment.score
    }

    pub fn level(&self) -> RiskLevel {
        self.assessment.level
    }
}

/// Servicio sin estado mutable que construye entradas y las puntúa.
#[derive(Clone, Debug)]
pub struct RiskScorer {
    weights: RiskWeights,
    tiers: TierBands,
    policy: ScoringPolicy,
    thresholds: LevelThresholds,
    max_value_len: usize,
}

impl RiskScorer {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        config.weights.validate()?;
        config.tiers.validate()?;
        config.scoring.validate()?;
        config.thresholds.validate()?;
        if config.max_value_len == 0 {
            return Err(ConfigError::InvalidValueLength);
        }

        Ok(Self {
            weights: config.weights,
            tiers: config.tiers,
            policy: config.scoring,
            thresholds: config.thresholds,
            max_value_len: config.max_value_len,
        })
    }

    pub fn weights(&self) -> &RiskWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &LevelThresholds {
        &self.thresholds
    }

    pub fn tier_of(&self, category: Category) -> Tier {
        self.tiers.tier_of(self.weights.weight(category))
    }

    /// Nivel de riesgo que corresponde a una categoría con los pesos configurados.
    pub fn level_of(&self, category: Category) -> RiskLevel {
        if self.weights.weight(category) == 0 {
            return RiskLevel::None;
        }
        match self.tier_of(category) {
            Tier::Critical => RiskLevel::Critical,
            Tier::High => RiskLevel::High,
            Tier::Medium => RiskLevel::Medium,
            Tier::Low => RiskLevel::Low,
        }
    }

    /// Construye una entrada con el valor acotado y el nivel derivado de su categoría.
    pub fn entry(&self, key: &str, value: &str, category: Category) -> MetadataEntry {
        let (value, truncated) = truncate_value(value, self.max_value_len);
        if truncated {
            debug!(key, max = self.max_value_len, "valor de metadata recortado");
        }
        MetadataEntry::new(key, value, category, self.level_of(category))
    }

    pub fn validate(&self, entry: &MetadataEntry) -> Result<(), InvariantViolation> {
        let expected = self.level_of(entry.category());
        if entry.risk_level() == expected {
            Ok(())
        } else {
            Err(InvariantViolation {
                key: entry.key().to_string(),
                category: entry.category(),
                declared: entry.risk_level(),
                expected,
            })
        }
    }

    /// Puntúa un conjunto de entradas; las que violan el invariante se descartan.
    pub fn score(&self, entries: &[MetadataEntry]) -> RiskAssessment {
        let valid: Vec<&MetadataEntry> = entries
            .iter()
            .filter(|entry| match self.validate(entry) {
                Ok(()) => true,
                Err(violation) => {
                    error!(%violation, "entrada descartada al puntuar");
                    false
                }
            })
            .collect();

        if valid.is_empty() {
            return RiskAssessment::empty();
        }

        let score = self.compute_score(&valid);
        let level = self.thresholds.level_for(score);

        RiskAssessment {
            score,
            level,
            recommendation: level.recommendation().to_string(),
            factors: self.build_factors(&valid),
        }
    }

    fn compute_score(&self, entries: &[&MetadataEntry]) -> u8 {
        // Categorías con peso cero no aportan puntuación.
        let tiers: Vec<Tier> = entries
            .iter()
            .filter(|entry| self.weights.weight(entry.category()) > 0)
            .map(|entry| self.tier_of(entry.category()))
            .collect();
        let Some(top_tier) = tiers.iter().copied().max() else {
            return 0;
        };

        let in_top_tier = tiers.iter().filter(|tier| **tier == top_tier).count();

        let mut score = self.policy.tier_score(top_tier).score(in_top_tier);
        if entries.len() > self.policy.volume_threshold {
            score += self.policy.volume_bonus as u32;
        }

        score.min(100) as u8
    }

    fn build_factors(&self, entries: &[&MetadataEntry]) -> Vec<RiskFactor> {
        let present: BTreeSet<Category> = entries.iter().map(|entry| entry.category()).collect();

        let mut factors: Vec<RiskFactor> = present
            .into_iter()
            .map(|category| RiskFactor {
                category,
                severity: self.level_of(category),
                description: category.description().to_string(),
                entries: entries
                    .iter()
                    .filter(|entry| entry.category() == category)
                    .map(|entry| (*entry).clone())
                    .collect(),
            })
            .collect();

        factors.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.category.as_str().cmp(b.category.as_str()))
        });
        factors
    }

    /// Recalcula el riesgo considerando solo lo que `platform` considera riesgoso.
    pub fn analyze_for_platform(
        &self,
        entries: &[MetadataEntry],
        platform: &str,
        rules: &PlatformRuleEngine,
    ) -> PlatformAssessment {
        let policy = rules.policy_for(platform);

        let (risky_entries, retained_entries): (Vec<MetadataEntry>, Vec<MetadataEntry>) = entries
            .iter()
            .cloned()
            .partition(|entry| policy.is_risky(entry.category()));

        PlatformAssessment {
            platform: policy.platform.clone(),
            requested: platform.to_string(),
            assessment: self.score(&risky_entries),
            risky_entries,
            retained_entries,
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        let config = AnalyzerConfig::default();
        Self {
            weights: config.weights,
            tiers: config.tiers,
            policy: config.scoring,
            thresholds: config.thresholds,
            max_value_len: config.max_value_len,
        }
    }
}

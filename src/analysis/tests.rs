use super::*;
use crate::config::AnalyzerConfig;

fn raw(pairs: &[(&str, &str)]) -> RawMetadata {
    pairs.iter().copied().collect()
}

fn entries_for(scorer: &RiskScorer, categories: &[Category]) -> Vec<MetadataEntry> {
    categories
        .iter()
        .enumerate()
        .map(|(index, category)| scorer.entry(&format!("campo{index}"), "valor", *category))
        .collect()
}

#[test]
fn gps_coordinates_are_critical() {
    let pipeline = AnalysisPipeline::default();
    let result = pipeline.analyze(
        &raw(&[("GPSLatitude", "37.77"), ("GPSLongitude", "-122.4")]),
        None,
    );

    assert!(
        result
            .entries
            .iter()
            .all(|entry| entry.category() == Category::Location)
    );
    assert!(result.score() >= 75, "puntuación {}", result.score());
    assert_eq!(result.level(), RiskLevel::Critical);
    assert!(result.has_gps);
    assert!(result.platform_risk.is_none());
}

#[test]
fn software_only_is_medium_or_low() {
    let result = AnalysisPipeline::default().analyze(&raw(&[("Software", "Photoshop 2023")]), None);

    assert_eq!(result.entries[0].category(), Category::Software);
    assert!((15..=40).contains(&result.score()), "puntuación {}", result.score());
    assert!(matches!(result.level(), RiskLevel::Medium | RiskLevel::Low));
    assert!(result.has_software_info);
    assert!(!result.has_gps);
}

#[test]
fn empty_metadata_has_no_risk() {
    let result = AnalysisPipeline::default().analyze(&RawMetadata::new(), None);

    assert_eq!(result.score(), 0);
    assert_eq!(result.level(), RiskLevel::None);
    assert!(result.assessment.factors.is_empty());
    assert!(result.categories_found.is_empty());
    assert_eq!(
        result.assessment.recommendation,
        RiskLevel::None.recommendation()
    );
}

#[test]
fn linkedin_keeps_author_even_though_base_score_flags_it() {
    let pipeline = AnalysisPipeline::default();
    let result = pipeline.analyze(
        &raw(&[("Artist", "Jane Doe"), ("GPSLatitude", "40.4")]),
        Some("linkedin"),
    );

    assert!(!pipeline.platforms().is_risky(Category::Author, "linkedin"));

    let artist = &result.entries[0];
    assert_eq!(artist.category(), Category::Author);
    assert_eq!(artist.risk_level(), RiskLevel::High);
    assert!(result.has_author_info);

    let platform = result
        .platform_risk
        .as_ref()
        .expect("se pidió una plataforma");
    assert_eq!(platform.platform, "linkedin");
    assert!(platform.risky_entries.iter().all(|entry| entry.key() != "Artist"));
    assert!(platform.retained_entries.iter().any(|entry| entry.key() == "Artist"));
    assert_eq!(platform.risky_entries.len(), 1);
}

#[test]
fn author_alone_is_high_without_platform_and_clean_for_linkedin() {
    let pipeline = AnalysisPipeline::default();
    let result = pipeline.analyze(&raw(&[("Artist", "Jane Doe")]), Some("LinkedIn"));

    assert_eq!(result.level(), RiskLevel::High);
    let platform = result.platform_risk.expect("se pidió una plataforma");
    assert!(platform.risky_entries.is_empty());
    assert_eq!(platform.score(), 0);
    assert_eq!(platform.level(), RiskLevel::None);
}

#[test]
fn unknown_platform_is_scored_with_general_policy() {
    let pipeline = AnalysisPipeline::default();
    let metadata = raw(&[("Artist", "Jane Doe"), ("DateTime", "2024:01:01 10:00:00")]);
    let result = pipeline.analyze(&metadata, Some("myspace"));

    let platform = result.platform_risk.expect("se pidió una plataforma");
    assert_eq!(platform.platform, GENERAL_PLATFORM);
    assert_eq!(platform.requested, "myspace");
    assert_eq!(platform.risky_entries.len(), 2);
    assert_eq!(platform.assessment, result.assessment);
}

#[test]
fn analyze_is_idempotent() {
    let pipeline = AnalysisPipeline::default();
    let metadata = raw(&[
        ("Make", "Canon"),
        ("GPSAltitude", "12 m"),
        ("Software", "GIMP"),
        ("Orientation", "1"),
    ]);

    let first = pipeline.analyze(&metadata, Some("facebook"));
    let second = pipeline.analyze(&metadata, Some("facebook"));
    assert_eq!(first, second);
}

#[test]
fn entries_follow_extractor_order() {
    let result = AnalysisPipeline::default().analyze(
        &raw(&[("Software", "GIMP"), ("Artist", "A"), ("Make", "Canon")]),
        None,
    );
    let keys: Vec<&str> = result.entries.iter().map(|entry| entry.key()).collect();
    assert_eq!(keys, vec!["Software", "Artist", "Make"]);
}

#[test]
fn long_values_are_truncated_not_rejected() {
    let long_value = "x".repeat(900);
    let result = AnalysisPipeline::default().analyze(&raw(&[("UserComment", long_value.as_str())]), None);

    assert_eq!(result.entries[0].value().chars().count(), 500);
    assert_eq!(result.entries[0].category(), Category::Personal);
}

#[test]
fn level_boundaries_are_exact() {
    let thresholds = LevelThresholds::default();
    let cases = [
        (100, RiskLevel::Critical),
        (75, RiskLevel::Critical),
        (74, RiskLevel::High),
        (50, RiskLevel::High),
        (49, RiskLevel::Medium),
        (25, RiskLevel::Medium),
        (24, RiskLevel::Low),
        (1, RiskLevel::Low),
        (0, RiskLevel::None),
    ];
    for (score, expected) in cases {
        assert_eq!(thresholds.level_for(score), expected, "puntuación {score}");
    }
}

#[test]
fn every_score_maps_to_a_level_in_order() {
    let thresholds = LevelThresholds::default();
    let levels: Vec<RiskLevel> = (0..=100).map(|score| thresholds.level_for(score)).collect();
    assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn score_never_decreases_when_an_entry_is_upgraded() {
    let scorer = RiskScorer::default();
    let weights = *scorer.weights();

    let mut bases: Vec<Vec<Category>> = Vec::new();
    for first in Category::ALL {
        bases.push(vec![first]);
        for second in Category::ALL {
            bases.push(vec![first, second]);
            for third in Category::ALL {
                bases.push(vec![first, second, third]);
            }
        }
    }

    for base in bases {
        let before = scorer.score(&entries_for(&scorer, &base)).score;
        for index in 0..base.len() {
            for upgrade in Category::ALL {
                if weights.weight(upgrade) <= weights.weight(base[index]) {
                    continue;
                }
                let mut upgraded = base.clone();
                upgraded[index] = upgrade;
                let after = scorer.score(&entries_for(&scorer, &upgraded)).score;
                assert!(
                    after >= before,
                    "{base:?} -> {upgraded:?} bajó de {before} a {after}"
                );
            }
        }
    }
}

#[test]
fn score_stays_within_bounds_for_large_inputs() {
    let scorer = RiskScorer::default();
    for category in Category::ALL {
        let many = entries_for(&scorer, &[category; 60]);
        let assessment = scorer.score(&many);
        assert!(assessment.score <= 100);
        assert!(assessment.score > 0);
    }

    let gps = entries_for(&scorer, &[Category::Location; 30]);
    assert_eq!(scorer.score(&gps).score, 100);
}

// El riesgo lo domina la categoría más grave; las demás no suman.
#[test]
fn worst_tier_dominates_instead_of_accumulating() {
    let scorer = RiskScorer::default();

    let gps_only = scorer.score(&entries_for(&scorer, &[Category::Location]));
    let gps_and_more = scorer.score(&entries_for(
        &scorer,
        &[
            Category::Location,
            Category::Personal,
            Category::Author,
            Category::Software,
            Category::Device,
            Category::Camera,
            Category::Timestamp,
            Category::Other,
        ],
    ));
    assert_eq!(gps_only.score, 85);
    assert_eq!(gps_and_more.score, gps_only.score);

    let two_gps = scorer.score(&entries_for(
        &scorer,
        &[Category::Location, Category::Location],
    ));
    assert_eq!(two_gps.score, 90);

    let many_low = scorer.score(&entries_for(&scorer, &[Category::Timestamp; 20]));
    assert!(many_low.score < 25, "puntuación {}", many_low.score);
}

#[test]
fn volume_bonus_applies_above_threshold() {
    let scorer = RiskScorer::default();

    let twenty = scorer.score(&entries_for(&scorer, &[Category::Other; 20]));
    let twenty_one = scorer.score(&entries_for(&scorer, &[Category::Other; 21]));

    assert_eq!(twenty.score, 24);
    assert_eq!(twenty.level, RiskLevel::Low);
    assert_eq!(twenty_one.score, 29);
    assert_eq!(twenty_one.level, RiskLevel::Medium);
}

#[test]
fn factors_are_ordered_by_severity_then_name() {
    let result = AnalysisPipeline::default().analyze(
        &raw(&[
            ("DateTime", "2024:01:01"),
            ("Software", "GIMP"),
            ("Make", "Canon"),
            ("Artist", "Jane"),
            ("GPSLatitude", "1.0"),
            ("GPSLongitude", "2.0"),
        ]),
        None,
    );

    let order: Vec<Category> = result
        .assessment
        .factors
        .iter()
        .map(|factor| factor.category)
        .collect();
    assert_eq!(
        order,
        vec![
            Category::Location,
            Category::Author,
            Category::Device,
            Category::Software,
            Category::Timestamp,
        ]
    );
    assert_eq!(result.assessment.factors[0].entries.len(), 2);
    assert_eq!(result.assessment.factors[0].severity, RiskLevel::Critical);
}

#[test]
fn entry_risk_level_always_matches_its_category() {
    let scorer = RiskScorer::default();
    for category in Category::ALL {
        let entry = scorer.entry("k", "v", category);
        assert_eq!(entry.risk_level(), scorer.level_of(category));
        assert!(scorer.validate(&entry).is_ok());
    }
}

#[test]
fn mismatched_entry_is_reported_and_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let scorer = RiskScorer::default();
    let forged: MetadataEntry = serde_json::from_str(
        r#"{ "key": "Artist", "value": "x", "category": "author", "risk_level": "low" }"#,
    )?;

    let violation = scorer
        .validate(&forged)
        .expect_err("la entrada no debería validar");
    assert_eq!(violation.expected, RiskLevel::High);
    assert_eq!(violation.declared, RiskLevel::Low);

    let gps = scorer.entry("GPSLatitude", "1.0", Category::Location);
    let assessment = scorer.score(&[forged, gps]);
    assert_eq!(assessment.score, 85);
    assert_eq!(assessment.factors.len(), 1);
    assert_eq!(assessment.factors[0].category, Category::Location);
    Ok(())
}

#[test]
fn zero_weight_categories_do_not_score() -> Result<(), Box<dyn std::error::Error>> {
    let config = AnalyzerConfig::from_json(r#"{ "weights": { "other": 0 } }"#)?;
    let pipeline = AnalysisPipeline::new(&config)?;
    let result = pipeline.analyze(&raw(&[("Orientation", "1")]), None);

    assert_eq!(result.entries[0].risk_level(), RiskLevel::None);
    assert_eq!(result.score(), 0);
    assert_eq!(result.level(), RiskLevel::None);
    Ok(())
}

#[test]
fn custom_weights_change_tiers_without_touching_the_algorithm()
-> Result<(), Box<dyn std::error::Error>> {
    let config = AnalyzerConfig::from_json(r#"{ "weights": { "software": 85 } }"#)?;
    let pipeline = AnalysisPipeline::new(&config)?;
    let result = pipeline.analyze(&raw(&[("Software", "GIMP")]), None);

    assert_eq!(result.entries[0].risk_level(), RiskLevel::Critical);
    assert_eq!(result.level(), RiskLevel::Critical);
    Ok(())
}

#[test]
fn replacing_platforms_yields_a_new_pipeline() -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = AnalysisPipeline::default();
    let strict = PlatformPolicy::new(
        "linkedin",
        RemoveRule::All,
        std::iter::empty(),
    )?;
    let replaced =
        pipeline.with_platforms(pipeline.platforms().replace_policies([strict])?);

    let metadata = raw(&[("Artist", "Jane Doe")]);
    let before = pipeline.analyze(&metadata, Some("linkedin"));
    let after = replaced.analyze(&metadata, Some("linkedin"));

    assert!(before.platform_risk.map(|p| p.risky_entries.is_empty()).unwrap_or(false));
    assert!(after.platform_risk.map(|p| p.risky_entries.len() == 1).unwrap_or(false));
    Ok(())
}

#[test]
fn pipeline_is_shareable_across_threads() {
    let pipeline = AnalysisPipeline::default();
    let metadata = raw(&[("GPSLatitude", "1.0"), ("Model", "X100")]);
    let expected = pipeline.analyze(&metadata, Some("twitter"));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = pipeline.clone();
            let metadata = metadata.clone();
            std::thread::spawn(move || pipeline.analyze(&metadata, Some("twitter")))
        })
        .collect();

    for handle in handles {
        let result = handle.join().expect("el hilo de análisis no debería fallar");
        assert_eq!(result, expected);
    }
}

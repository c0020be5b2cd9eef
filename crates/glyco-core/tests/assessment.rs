//! End-to-end tests: artifact file -> context -> assessment.

mod common;

use glyco_core::artifact::ModelArtifact;
use glyco_core::error::ModelError;
use glyco_core::prelude::*;
use glyco_core::testing::sample_artifact;
use ndarray::array;

#[test]
fn default_patient_end_to_end() {
    let (_dir, ctx) = common::load_sample_context();
    assert!(ctx.source().is_some());

    let assessment = assess(&ctx, &FeatureVector::default(), &AssessOptions::default())
        .expect("default measurements are in range");

    assert_eq!(assessment.prediction.status, DiabetesStatus::NonDiabetes);
    let p = &assessment.prediction.probabilities;
    assert_eq!(p.len(), 3);
    assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    // Diabetes: (2/18 + 9/25 + 4/52) / 3
    assert!((p[0] - (2.0 / 18.0 + 9.0 / 25.0 + 4.0 / 52.0) / 3.0).abs() < 1e-12);

    let shares = assessment.explanation.shares();
    assert_eq!(shares.len(), 5);
    assert!(shares.windows(2).all(|w| w[0].percentage >= w[1].percentage));
    assert!(shares.iter().all(|s| s.percentage >= 0.0));
    assert!((shares.iter().map(|s| s.percentage).sum::<f64>() - 100.0).abs() < 1e-9);

    let chart = assessment.chart.as_ref().expect("ranked explanation has a chart");
    assert!(chart.to_svg().contains("Percentage Contribution of Features to Prediction"));
    assert_eq!(assessment.tips.title, "Tips for maintaining Non-Diabetes status");
}

#[test]
fn high_risk_patient_gets_diabetes_tips() {
    let (_dir, ctx) = common::load_sample_context();
    let features = FeatureVector::new(180.0, 33.0, 60.0, 110.0, 112.0);
    let assessment = assess(&ctx, &features, &AssessOptions::default()).unwrap();

    assert_eq!(assessment.prediction.status, DiabetesStatus::Diabetes);
    assert_eq!(assessment.tips, tips_for_label("Diabetes"));
    assert_eq!(assessment.probability_lines(2)[0].split(": ").next(), Some("Probability of Diabetes"));
}

#[test]
fn explanation_is_additive_through_public_api() {
    let (_dir, ctx) = common::load_sample_context();
    let explainer = ctx.explainer();
    let rows = array![[100.0, 25.0, 50.0, 90.0, 100.0], [126.0, 31.2, 54.0, 104.0, 108.0]];
    let output = explainer.shap_values(rows.view(), AttributionLayout::PerClass).unwrap();

    for (i, row) in rows.outer_iter().enumerate() {
        let proba = ctx.forest().predict_proba(row.as_slice().unwrap());
        for class in 0..3 {
            let phi = output.for_class(i, class).unwrap();
            let total = explainer.expected_value()[class] + phi.iter().sum::<f64>();
            assert!((total - proba[class]).abs() < 1e-10);
        }
    }
}

#[test]
fn missing_model_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = ModelContext::load(&path).unwrap_err();
    match err {
        GlycoError::Io(msg) => assert!(msg.contains("absent.json"), "{msg}"),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn incompatible_artifacts_fail_at_load() {
    let dir = tempfile::tempdir().unwrap();

    let mut reordered = sample_artifact();
    reordered.feature_names = Some(
        ["BMI", "FBS", "Age", "wc", "Hc"].iter().map(|s| s.to_string()).collect(),
    );
    let path = dir.path().join("reordered.json");
    std::fs::write(&path, reordered.to_json_pretty().unwrap()).unwrap();
    assert!(matches!(
        ModelContext::load(&path),
        Err(GlycoError::Model(ModelError::FeatureOrder { position: 0, .. }))
    ));

    let mut relabelled = sample_artifact();
    relabelled.classes = Some(vec!["Diabetes".into(), "Healthy".into(), "Pre-Diabetes".into()]);
    let path = dir.path().join("relabelled.json");
    std::fs::write(&path, relabelled.to_json_pretty().unwrap()).unwrap();
    assert!(matches!(
        ModelContext::load(&path),
        Err(GlycoError::Model(ModelError::ClassLabel { position: 1, .. }))
    ));

    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "{\"format_version\": 1").unwrap();
    assert!(matches!(ModelContext::load(&path), Err(GlycoError::Serialization(_))));
}

#[test]
fn artifact_file_round_trips_to_the_same_predictions() {
    let (_dir, path) = common::sample_model_file();
    let loaded = ModelArtifact::from_path(&path).unwrap();
    assert_eq!(loaded, sample_artifact());

    let ctx = ModelContext::load(&path).unwrap();
    let reference = glyco_core::testing::sample_context();
    let features = FeatureVector::new(115.0, 27.0, 40.0, 85.0, 95.0);
    assert_eq!(ctx.predict(&features), reference.predict(&features));
}

#[test]
fn externally_exported_attributions_normalize_like_native_ones() {
    // Same numbers in both nestings: [class][instance][feature] and
    // [instance][class][feature].
    let per_class = AttributionOutput::from_nested(
        AttributionLayout::PerClass,
        vec![
            vec![vec![0.0; 5]],
            vec![vec![2.0, -6.0, 0.0, 1.0, 1.0]],
            vec![vec![0.0; 5]],
        ],
    )
    .unwrap();
    let stacked = AttributionOutput::from_nested(
        AttributionLayout::Stacked,
        vec![vec![vec![0.0; 5], vec![2.0, -6.0, 0.0, 1.0, 1.0], vec![0.0; 5]]],
    )
    .unwrap();

    let names = Feature::short_names();
    let a = normalize_output(&per_class, 0, 1, &names).unwrap();
    let b = normalize_output(&stacked, 0, 1, &names).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a.labels(),
        vec!["BMI (60.0%)", "FBS (20.0%)", "wc (10.0%)", "Hc (10.0%)", "Age (0.0%)"]
    );
}

#[test]
fn bundled_model_matches_sample_fixture() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../models/random_forest_model.json");
    let ctx = ModelContext::load(&path).expect("bundled model loads");
    assert_eq!(ModelArtifact::from_path(&path).unwrap(), sample_artifact());
    assert_eq!(ctx.summary().n_nodes, 17);
    assert_eq!(ctx.summary().max_depth, 3);
}

//! End-to-end pipeline tests: clinical records through vectorization,
//! partitioning and hybrid scoring to a prediction.

use lesion_fhe::{
    CkksParams, EncryptionContext, Error, FeatureIndexPartition, FeatureSpace, HybridScorer,
    ModelParameters, Record, Value,
};

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn cohort() -> Vec<Record> {
    vec![
        record(&[
            ("age_group", Value::Text("18-39".into())),
            ("gender", Value::Text("female".into())),
            ("lesion_size_mm", Value::Number(3.0)),
        ]),
        record(&[
            ("age_group", Value::Text("60+".into())),
            ("gender", Value::Text("male".into())),
            ("lesion_size_mm", Value::Number(15.0)),
        ]),
        record(&[
            ("age_group", Value::Text("40-59".into())),
            ("gender", Value::Text("female".into())),
            ("lesion_size_mm", Value::Number(9.0)),
        ]),
    ]
}

fn model_for(space: &FeatureSpace) -> ModelParameters {
    let dim = space.dimension();
    let weights = (0..2)
        .map(|k| {
            (0..dim)
                .map(|j| if (j + k) % 2 == 0 { 0.8 } else { -0.4 })
                .collect()
        })
        .collect();
    ModelParameters::new(weights, vec![0.1, -0.1], vec!["benign".into(), "suspect".into()])
        .unwrap()
}

#[test]
fn test_record_to_prediction_roundtrip() {
    let space = FeatureSpace::fit(&cohort()).unwrap();
    let partition =
        FeatureIndexPartition::from_feature_space(&space, &["age_group", "gender"]).unwrap();
    let model = model_for(&space);
    let scorer = HybridScorer::new(&model, &partition).unwrap();
    let ctx = EncryptionContext::new(CkksParams::new_test_256());

    let x = space
        .vectorize(&record(&[
            ("age_group", Value::Text("60+".into())),
            ("gender", Value::Text("male".into())),
            ("lesion_size_mm", Value::Number(12.0)),
        ]))
        .unwrap();

    let hybrid_pred = scorer.predict(&ctx, &x).unwrap();
    let plain_pred = model.predict(&x).unwrap();
    assert_eq!(
        hybrid_pred.class_index, plain_pred.class_index,
        "hybrid and plaintext predictions diverged"
    );
}

#[test]
fn test_partition_covers_one_hot_slots_of_sensitive_columns() {
    let space = FeatureSpace::fit(&cohort()).unwrap();
    let partition =
        FeatureIndexPartition::from_feature_space(&space, &["age_group", "gender"]).unwrap();

    // Only lesion_size_mm stays in plaintext.
    assert_eq!(partition.plain.len(), 1);
    assert_eq!(space.slot_names()[partition.plain[0]], "lesion_size_mm");
    assert_eq!(
        partition.sensitive.len() + partition.plain.len(),
        space.dimension()
    );
}

#[test]
fn test_unseen_category_flows_through_whole_pipeline() {
    let space = FeatureSpace::fit(&cohort()).unwrap();
    let partition =
        FeatureIndexPartition::from_feature_space(&space, &["age_group", "gender"]).unwrap();
    let model = model_for(&space);
    let scorer = HybridScorer::new(&model, &partition).unwrap();
    let ctx = EncryptionContext::new(CkksParams::new_test_256());

    let x = space
        .vectorize(&record(&[
            ("age_group", Value::Text("60+".into())),
            ("gender", Value::Text("unspecified".into())),
            ("lesion_size_mm", Value::Number(5.0)),
        ]))
        .unwrap();
    // Scoring an all-zero one-hot block is still well defined.
    let scores = scorer.score(&ctx, &x).unwrap();
    assert_eq!(scores.len(), 2);
}

#[test]
fn test_malformed_record_fails_before_any_encryption() {
    let space = FeatureSpace::fit(&cohort()).unwrap();
    let err = space
        .vectorize(&record(&[(
            "age_group",
            Value::Text("60+".into()),
        )]))
        .unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch { .. }));
}

#[test]
fn test_stale_partition_is_rejected_by_scorer() {
    let space = FeatureSpace::fit(&cohort()).unwrap();
    let model = model_for(&space);
    // Partition computed against a smaller, outdated layout.
    let stale = FeatureIndexPartition {
        sensitive: vec![0],
        plain: vec![1],
        dimension: 2,
    };
    assert!(matches!(
        HybridScorer::new(&model, &stale),
        Err(Error::DimensionMismatch { .. })
    ));
}

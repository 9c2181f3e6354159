//! Integration tests for the hybrid scoring protocol: score decomposition,
//! drift against the plaintext reference, and key separation.

use lesion_fhe::{
    CkksParams, ConsistencyOracle, EncryptionContext, Error, FeatureIndexPartition,
    HybridScorer, ModelParameters,
};

fn context() -> EncryptionContext {
    EncryptionContext::new(CkksParams::new_test_256())
}

fn partition(sensitive: Vec<usize>, plain: Vec<usize>, dimension: usize) -> FeatureIndexPartition {
    FeatureIndexPartition {
        sensitive,
        plain,
        dimension,
    }
}

#[test]
fn test_two_class_worked_example() {
    // W = [[1, 2], [0.5, -1]], b = [0, 0.1], x = [1, 1], feature 0 sensitive.
    // Expected scores: z_A = 1 + 2 + 0 = 3.0, z_B = 0.5 - 1 + 0.1 = -0.4.
    let ctx = context();
    let model = ModelParameters::new(
        vec![vec![1.0, 2.0], vec![0.5, -1.0]],
        vec![0.0, 0.1],
        vec!["A".into(), "B".into()],
    )
    .unwrap();
    let part = partition(vec![0], vec![1], 2);
    let scorer = HybridScorer::new(&model, &part).unwrap();

    let scores = scorer.score(&ctx, &[1.0, 1.0]).unwrap();
    assert!((scores[0] - 3.0).abs() < 1e-2, "z_A = {}", scores[0]);
    assert!((scores[1] - (-0.4)).abs() < 1e-2, "z_B = {}", scores[1]);

    let pred = model.predict_from_scores(&scores).unwrap();
    assert_eq!(pred.label, "A");
}

#[test]
fn test_affine_decomposition_is_exact_in_plaintext() {
    // With integer-valued features and weights the split sums recombine
    // exactly, independent of any encryption noise.
    let model = ModelParameters::new(
        vec![vec![2.0, -3.0, 5.0, 1.0, -4.0]],
        vec![7.0],
        vec!["only".into()],
    )
    .unwrap();
    let part = partition(vec![1, 4], vec![0, 2, 3], 5);
    let x = [3.0, -2.0, 1.0, 6.0, 2.0];

    let (x_sens, x_plain) = part.split(&x).unwrap();
    let (w_sens, w_plain) = part.split(&model.weights[0]).unwrap();
    let z_sens: f64 = x_sens.iter().zip(&w_sens).map(|(a, b)| a * b).sum();
    let z_plain: f64 = x_plain.iter().zip(&w_plain).map(|(a, b)| a * b).sum();

    let direct = model.score(&x).unwrap()[0];
    assert_eq!(z_sens + z_plain + model.biases[0], direct);
}

#[test]
fn test_hybrid_tracks_plaintext_within_tolerance() {
    let ctx = context();
    let model = ModelParameters::new(
        vec![
            vec![0.31, -1.7, 0.02, 2.4, -0.9, 1.15],
            vec![-0.44, 0.83, 1.9, -2.1, 0.5, -0.07],
            vec![1.02, 0.11, -0.6, 0.77, -1.3, 0.4],
        ],
        vec![0.9, -0.25, 0.0],
        vec!["benign".into(), "pre_malignant".into(), "malignant".into()],
    )
    .unwrap();
    let part = partition(vec![0, 2, 5], vec![1, 3, 4], 6);
    let scorer = HybridScorer::new(&model, &part).unwrap();
    let x = [1.3, -0.8, 2.2, 0.4, -1.6, 0.9];

    let hybrid = scorer.score(&ctx, &x).unwrap();
    let plain = model.score(&x).unwrap();
    let report = ConsistencyOracle::default()
        .verify(&model.class_labels, &plain, &hybrid)
        .unwrap();
    assert!(report.within_tolerance);
    assert!(report.max_drift < 1e-2, "max drift {}", report.max_drift);
}

#[test]
fn test_full_sensitive_set_scores_everything_encrypted() {
    let ctx = context();
    let model = ModelParameters::new(
        vec![vec![1.0, -2.0, 0.5], vec![0.25, 0.75, -1.0]],
        vec![0.1, -0.2],
        vec!["A".into(), "B".into()],
    )
    .unwrap();
    let part = partition(vec![0, 1, 2], vec![], 3);
    let scorer = HybridScorer::new(&model, &part).unwrap();
    let x = [2.0, 1.0, -3.0];

    let hybrid = scorer.score(&ctx, &x).unwrap();
    let plain = model.score(&x).unwrap();
    for (h, p) in hybrid.iter().zip(&plain) {
        assert!((h - p).abs() < 1e-2, "hybrid {} vs plaintext {}", h, p);
    }
}

#[test]
fn test_evaluator_scores_without_secret_key() {
    let key_holder = context();
    let evaluator = key_holder.public_view();
    let model = ModelParameters::new(
        vec![vec![1.5, -0.5]],
        vec![0.25],
        vec!["only".into()],
    )
    .unwrap();
    let part = partition(vec![0], vec![1], 2);
    let scorer = HybridScorer::new(&model, &part).unwrap();

    let encrypted = scorer.score_encrypted(&evaluator, &[2.0, 4.0]).unwrap();
    assert!(matches!(
        scorer.decrypt_scores(&evaluator, &encrypted),
        Err(Error::DecryptionUnavailable)
    ));

    let scores = scorer.decrypt_scores(&key_holder, &encrypted).unwrap();
    assert!((scores[0] - 1.25).abs() < 1e-2, "score {}", scores[0]);
}

#[test]
fn test_oracle_flags_encryption_noise_under_zero_tolerance() {
    // Fractional weights guarantee rounding plus encryption noise, so an
    // absurdly tight tolerance must trip.
    let ctx = context();
    let model = ModelParameters::new(
        vec![vec![1.0 / 3.0, 2.0 / 7.0]],
        vec![1.0 / 9.0],
        vec!["only".into()],
    )
    .unwrap();
    let part = partition(vec![0], vec![1], 2);
    let scorer = HybridScorer::new(&model, &part).unwrap();
    let x = [1.0 / 3.0, 5.0 / 11.0];

    let hybrid = scorer.score(&ctx, &x).unwrap();
    let plain = model.score(&x).unwrap();
    let err = ConsistencyOracle::new(1e-12)
        .verify(&model.class_labels, &plain, &hybrid)
        .unwrap_err();
    assert!(matches!(err, Error::ToleranceExceeded { .. }));
}

#[test]
fn test_tie_break_is_deterministic_after_decryption() {
    // Equal plaintext scores can come back unequal by noise; the argmax on
    // the DECRYPTED scores is still deterministic for the given ciphertexts,
    // and the plaintext reference keeps the lowest index.
    let model = ModelParameters::new(
        vec![vec![1.0, 0.0], vec![1.0, 0.0]],
        vec![0.0, 0.0],
        vec!["first".into(), "second".into()],
    )
    .unwrap();
    let pred = model.predict(&[4.0, 9.0]).unwrap();
    assert_eq!(pred.class_index, 0);
    assert_eq!(pred.label, "first");
}

//! End-to-end demonstration: oral-lesion classification with the sensitive
//! demographic features scored under encryption.
//!
//! Run with `RUST_LOG=debug` for the pipeline's internal logging.

use lesion_fhe::{
    CkksParams, ConsistencyOracle, EncryptionContext, FeatureIndexPartition, FeatureSpace,
    HybridScorer, ModelParameters, Record, Result, Value,
};

const SENSITIVE_COLUMNS: [&str; 3] = ["age_group", "skin_color", "gender"];

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Small synthetic cohort standing in for the clinical training set.
fn training_records() -> Vec<Record> {
    vec![
        record(&[
            ("age_group", Value::Text("18-39".into())),
            ("gender", Value::Text("female".into())),
            ("skin_color", Value::Text("light".into())),
            ("tobacco_use", Value::Text("no".into())),
            ("lesion_size_mm", Value::Number(3.0)),
            ("lesion_count", Value::Number(1.0)),
        ]),
        record(&[
            ("age_group", Value::Text("40-59".into())),
            ("gender", Value::Text("male".into())),
            ("skin_color", Value::Text("dark".into())),
            ("tobacco_use", Value::Text("yes".into())),
            ("lesion_size_mm", Value::Number(11.0)),
            ("lesion_count", Value::Number(2.0)),
        ]),
        record(&[
            ("age_group", Value::Text("60+".into())),
            ("gender", Value::Text("male".into())),
            ("skin_color", Value::Text("medium".into())),
            ("tobacco_use", Value::Text("former".into())),
            ("lesion_size_mm", Value::Number(18.0)),
            ("lesion_count", Value::Number(3.0)),
        ]),
        record(&[
            ("age_group", Value::Text("40-59".into())),
            ("gender", Value::Text("female".into())),
            ("skin_color", Value::Text("light".into())),
            ("tobacco_use", Value::Text("no".into())),
            ("lesion_size_mm", Value::Number(6.0)),
            ("lesion_count", Value::Number(1.0)),
        ]),
    ]
}

/// Deterministic stand-in weights for an externally trained classifier.
fn demo_model(dimension: usize) -> Result<ModelParameters> {
    let labels = vec![
        "benign".to_string(),
        "pre_malignant".to_string(),
        "malignant".to_string(),
    ];
    let weights = (0..labels.len())
        .map(|k| {
            (0..dimension)
                .map(|j| {
                    let sign = if (j + k) % 2 == 0 { 1.0 } else { -1.0 };
                    sign * (0.15 + 0.1 * ((j % 5) as f64)) * (k as f64 * 0.5 + 0.5)
                })
                .collect()
        })
        .collect();
    let biases = vec![0.2, -0.1, 0.05];
    ModelParameters::new(weights, biases, labels)
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=============================================================");
    println!(" Hybrid Encrypted Oral-Lesion Classification");
    println!("=============================================================\n");

    println!("Phase 1: encryption context");
    let params = CkksParams::new_demo_8192();
    println!(
        "  ring dimension n = {}, {} chain primes, working scale 2^40",
        params.n,
        params.num_primes()
    );
    let ctx = EncryptionContext::new(params);
    println!("  key pair generated\n");

    println!("Phase 2: feature space");
    let space = FeatureSpace::fit(&training_records())?;
    println!("  fitted {} slots:", space.dimension());
    for name in space.slot_names() {
        println!("    {}", name);
    }
    println!();

    println!("Phase 3: sensitivity partition");
    let partition = FeatureIndexPartition::from_feature_space(&space, &SENSITIVE_COLUMNS)?;
    println!(
        "  sensitive columns {:?} -> {} encrypted slots, {} plaintext slots\n",
        SENSITIVE_COLUMNS,
        partition.sensitive.len(),
        partition.plain.len()
    );

    println!("Phase 4: model");
    let model = demo_model(space.dimension())?;
    println!(
        "  linear one-vs-rest, {} classes over {} features\n",
        model.num_classes(),
        model.dimension()
    );

    println!("Phase 5: hybrid scoring");
    let patient = record(&[
        ("age_group", Value::Text("60+".into())),
        ("gender", Value::Text("male".into())),
        ("skin_color", Value::Text("light".into())),
        ("tobacco_use", Value::Text("yes".into())),
        ("lesion_size_mm", Value::Number(14.0)),
        ("lesion_count", Value::Number(2.0)),
    ]);
    let x = space.vectorize(&patient)?;
    let scorer = HybridScorer::new(&model, &partition)?;

    // The evaluator never holds the secret key.
    let evaluator = ctx.public_view();
    let encrypted_scores = scorer.score_encrypted(&evaluator, &x)?;
    println!("  evaluator produced {} encrypted class scores", encrypted_scores.len());
    let hybrid_scores = scorer.decrypt_scores(&ctx, &encrypted_scores)?;
    let prediction = model.predict_from_scores(&hybrid_scores)?;
    for (label, score) in model.class_labels.iter().zip(&hybrid_scores) {
        println!("    {:<15} {:>10.6}", label, score);
    }
    println!("  predicted class: {}\n", prediction.label);

    println!("Phase 6: consistency check");
    let plaintext_scores = model.score(&x)?;
    let report =
        ConsistencyOracle::default().verify(&model.class_labels, &plaintext_scores, &hybrid_scores)?;
    println!(
        "  max drift {:.3e} (tolerance {:.1e})",
        report.max_drift, report.tolerance
    );
    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("  report serialization failed: {}", e),
    }

    println!("\nPhase 7: unseen category handling");
    let unusual = record(&[
        ("age_group", Value::Text("60+".into())),
        ("gender", Value::Text("unspecified".into())),
        ("skin_color", Value::Text("light".into())),
        ("tobacco_use", Value::Text("yes".into())),
        ("lesion_size_mm", Value::Number(9.0)),
        ("lesion_count", Value::Number(1.0)),
    ]);
    let x2 = space.vectorize(&unusual)?;
    let pred2 = scorer.predict(&ctx, &x2)?;
    println!(
        "  gender value never seen at fit time activates no slot; predicted: {}",
        pred2.label
    );

    println!("\nDone.");
    Ok(())
}

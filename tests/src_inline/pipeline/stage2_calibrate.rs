use super::*;

fn overlapping() -> (Vec<f64>, Vec<bool>) {
    let scores = vec![-9.1, -8.7, -8.2, -7.9, -7.5, -7.4, -6.8, -6.1, -5.9, -5.2, -4.8, -4.0];
    let activity = vec![
        true, true, false, true, true, false, true, false, false, true, false, false,
    ];
    (scores, activity)
}

#[test]
fn test_fit_satisfies_likelihood_equations() {
    let (scores, activity) = overlapping();
    let model = LogisticCalibrator::default().fit(&scores, &activity).unwrap();
    let probs = model.predict_all(&scores);
    let n = scores.len() as f64;
    let mean_residual = probs
        .iter()
        .zip(&activity)
        .map(|(p, &a)| p - if a { 1.0 } else { 0.0 })
        .sum::<f64>()
        / n;
    assert!(mean_residual.abs() < 1e-3);
    // Lower docking energies are the actives, so the slope is negative.
    assert!(model.slope() < 0.0);
    assert!(probs.iter().all(|&p| p > 0.0 && p < 1.0));
}

#[test]
fn test_probabilities_are_monotone_in_slope_direction() {
    let (scores, activity) = overlapping();
    let model = LogisticCalibrator::default().fit(&scores, &activity).unwrap();
    let probs = model.predict_all(&scores);
    for w in probs.windows(2) {
        assert!(w[1] <= w[0], "scores ascend, slope < 0 so probabilities must not rise");
    }
}

#[test]
fn test_perfect_separation_converges_inside_unit_interval() {
    let scores = vec![5.0, 4.0, 3.0, 2.0, 1.0];
    let activity = vec![true, true, false, false, false];
    let model = LogisticCalibrator::default().fit(&scores, &activity).unwrap();
    let probs = model.predict_all(&scores);
    assert!(model.slope() > 0.0);
    for w in probs.windows(2) {
        assert!(w[0] > w[1]);
    }
    assert!(probs.iter().all(|&p| p > 0.0 && p < 1.0));
    assert!(probs[1] > 0.5 && probs[2] < 0.5);
}

#[test]
fn test_constant_scores_fall_back_to_prevalence() {
    let scores = vec![1.0, 1.0, 1.0, 1.0];
    let activity = vec![true, false, true, false];
    let model = LogisticCalibrator::default().fit(&scores, &activity).unwrap();
    assert_eq!(model.slope(), 0.0);
    for p in model.predict_all(&scores) {
        assert!((p - 0.5).abs() < 1e-12);
    }
}

#[test]
fn test_single_class_is_rejected() {
    let err = LogisticCalibrator::default()
        .fit(&[1.0, 2.0, 3.0], &[false, false, false])
        .unwrap_err();
    assert_eq!(err, FitError::SingleClass);
    let err = LogisticCalibrator::default()
        .fit(&[1.0, 2.0], &[true, true])
        .unwrap_err();
    assert_eq!(err, FitError::SingleClass);
}

#[test]
fn test_length_mismatch_is_rejected() {
    let err = LogisticCalibrator::default()
        .fit(&[1.0, 2.0, 3.0], &[true, false])
        .unwrap_err();
    assert!(matches!(err, FitError::LengthMismatch { .. }));
}

#[test]
fn test_iteration_limit_reports_not_converged() {
    let config = CalibrationConfig {
        max_iter: 1,
        tol: 1e-4,
    };
    let err = LogisticCalibrator::new(config)
        .fit(&[5.0, 4.0, 3.0, 2.0, 1.0], &[true, true, false, false, false])
        .unwrap_err();
    assert!(matches!(err, FitError::NotConverged { iterations: 1, .. }));
}

#[test]
fn test_calibrate_keeps_input_order() {
    let (scores, activity) = overlapping();
    let (model, samples) = calibrate(&scores, &activity, &CalibrationConfig::default()).unwrap();
    assert_eq!(samples.len(), scores.len());
    for (sample, &score) in samples.iter().zip(&scores) {
        assert_eq!(sample.sample.score, score);
        assert_eq!(sample.probability, model.predict(score));
    }
}

#[test]
fn test_raw_space_coefficients_reproduce_predictions() {
    let (scores, activity) = overlapping();
    let model = LogisticCalibrator::default().fit(&scores, &activity).unwrap();
    for &s in &scores {
        let direct = crate::numeric::sigmoid(model.intercept() + model.slope() * s);
        assert!((direct - model.predict(s)).abs() < 1e-9);
    }
}

//! Statistical checks for the evaluation metrics.

mod common;

use rand::prelude::*;

use common::{assert_approx_eq, random_labels};
use sparse_lr::training::{Accuracy, Auc, LogLoss, Metric};

#[test]
fn random_scores_give_chance_auc() {
    let mut rng = StdRng::seed_from_u64(1);
    let n = 10_000;
    let labels = random_labels(n, &mut rng);
    let scores: Vec<f64> = (0..n).map(|_| rng.r#gen::<f64>()).collect();

    let auc = Auc.compute(&scores, &labels);
    assert!((auc - 0.5).abs() < 0.1, "auc = {auc}");
}

#[test]
fn separating_scores_give_perfect_auc() {
    let mut rng = StdRng::seed_from_u64(2);
    let labels = random_labels(1_000, &mut rng);
    let scores: Vec<f64> = labels
        .iter()
        .map(|&y| y + rng.r#gen::<f64>() * 0.5)
        .collect();

    assert_eq!(Auc.compute(&scores, &labels), 1.0);

    let reversed: Vec<f64> = scores.iter().map(|s| -s).collect();
    assert_eq!(Auc.compute(&reversed, &labels), 0.0);
}

#[test]
fn shifted_uniform_scores_hit_target_auc() {
    // P(U1 + s > U2) = 1 - (1 - s)^2 / 2 for s in [0, 1].
    let target: f64 = 0.7;
    let shift = 1.0 - (2.0 * (1.0 - target)).sqrt();

    let mut rng = StdRng::seed_from_u64(3);
    let n = 50_000;
    let labels = random_labels(n, &mut rng);
    let scores: Vec<f64> = labels
        .iter()
        .map(|&y| rng.r#gen::<f64>() + y * shift)
        .collect();

    let auc = Auc.compute(&scores, &labels);
    assert!((auc - target).abs() < 0.01, "auc = {auc}");
}

#[test]
fn constant_scores_give_half() {
    let labels = [1.0, 0.0, 1.0, 0.0, 0.0];
    let scores = [0.3; 5];
    assert_approx_eq!(Auc.compute(&scores, &labels), 0.5, 1e-12);
}

#[test]
fn confident_correct_predictions_score_well() {
    let labels = [1.0, 0.0, 1.0, 0.0];
    let good = [0.95, 0.05, 0.9, 0.1];
    let bad = [0.05, 0.95, 0.1, 0.9];

    assert!(LogLoss.compute(&good, &labels) < LogLoss.compute(&bad, &labels));
    assert_eq!(Accuracy::default().compute(&good, &labels), 1.0);
    assert_eq!(Accuracy::default().compute(&bad, &labels), 0.0);
    assert!(!LogLoss.higher_is_better());
    assert!(Auc.higher_is_better());
}

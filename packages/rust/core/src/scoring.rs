//! Propensity scoring with a small random forest.
//!
//! The classifier is refit from scratch on every call from a fixed set of
//! eight labelled examples, then predicts the positive-class probability of
//! each lead. Nothing is persisted between calls.
//!
//! The forest follows the classic recipe: bootstrap resampling per tree,
//! fully grown trees split on Gini impurity, and `max(1, ⌊√n_features⌋)`
//! candidate features per split. One seeded RNG drives all randomness, so
//! identical input and seed give identical scores.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use leadgen_shared::{FeatureVector, LeadGenError, Result};

/// Number of features the forest sees.
const N_FEATURES: usize = FeatureVector::LEN;

/// Fixed training examples: `(role_score, funding_score, hub_flag) → label`.
pub const TRAINING_SET: [([u8; N_FEATURES], u8); 8] = [
    ([3, 3, 1], 1),
    ([2, 3, 1], 1),
    ([2, 3, 0], 1),
    ([2, 3, 1], 1),
    ([1, 1, 0], 0),
    ([1, 1, 1], 0),
    ([1, 2, 0], 0),
    ([1, 1, 0], 0),
];

type Sample = [f64; N_FEATURES];

// ---------------------------------------------------------------------------
// Decision tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Fraction of positive samples that reached this leaf.
        positive: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, x: &Sample) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { positive } => return *positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }
}

/// Training data for one forest.
struct Dataset<'a> {
    samples: &'a [Sample],
    labels: &'a [u8],
}

impl Dataset<'_> {
    fn positive_fraction(&self, idx: &[usize]) -> f64 {
        let positives = idx.iter().filter(|&&i| self.labels[i] == 1).count();
        positives as f64 / idx.len() as f64
    }

    fn is_constant(&self, idx: &[usize], feature: usize) -> bool {
        let first = self.samples[idx[0]][feature];
        idx.iter().all(|&i| self.samples[i][feature] == first)
    }

    /// Grow a tree until every leaf is pure or has only constant features.
    fn grow(&self, idx: &[usize], max_features: usize, rng: &mut StdRng) -> Node {
        let positive = self.positive_fraction(idx);
        if positive == 0.0 || positive == 1.0 {
            return Node::Leaf { positive };
        }

        // Features are visited in random order; constant ones do not count
        // towards `max_features`.
        let mut order: Vec<usize> = (0..N_FEATURES).collect();
        order.shuffle(rng);
        let candidates: Vec<usize> = order
            .into_iter()
            .filter(|&f| !self.is_constant(idx, f))
            .take(max_features)
            .collect();

        let best = candidates
            .iter()
            .filter_map(|&f| self.best_threshold(idx, f).map(|(t, g)| (f, t, g)))
            .min_by(|a, b| a.2.total_cmp(&b.2));

        let Some((feature, threshold, _)) = best else {
            return Node::Leaf { positive };
        };

        let (left, right): (Vec<usize>, Vec<usize>) = idx
            .iter()
            .partition(|&&i| self.samples[i][feature] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(self.grow(&left, max_features, rng)),
            right: Box::new(self.grow(&right, max_features, rng)),
        }
    }

    /// Midpoint threshold with the lowest weighted Gini impurity.
    /// Ties keep the lowest threshold.
    fn best_threshold(&self, idx: &[usize], feature: usize) -> Option<(f64, f64)> {
        let mut values: Vec<f64> = idx.iter().map(|&i| self.samples[i][feature]).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        let mut best: Option<(f64, f64)> = None;
        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let impurity = self.split_impurity(idx, feature, threshold);
            if best.is_none_or(|(_, b)| impurity < b) {
                best = Some((threshold, impurity));
            }
        }
        best
    }

    fn split_impurity(&self, idx: &[usize], feature: usize, threshold: f64) -> f64 {
        let (mut left_n, mut left_pos, mut right_n, mut right_pos) = (0usize, 0usize, 0usize, 0usize);
        for &i in idx {
            let positive = usize::from(self.labels[i] == 1);
            if self.samples[i][feature] <= threshold {
                left_n += 1;
                left_pos += positive;
            } else {
                right_n += 1;
                right_pos += positive;
            }
        }

        let total = idx.len() as f64;
        (left_n as f64 / total) * gini(left_pos, left_n)
            + (right_n as f64 / total) * gini(right_pos, right_n)
    }
}

fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

// ---------------------------------------------------------------------------
// Forest
// ---------------------------------------------------------------------------

/// Bagged ensemble of Gini decision trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<Node>,
}

impl RandomForest {
    /// Fit `n_estimators` trees on `samples` / `labels` (labels are 0 or 1).
    pub fn fit(samples: &[Sample], labels: &[u8], n_estimators: usize, seed: u64) -> Result<Self> {
        if samples.is_empty() || samples.len() != labels.len() {
            return Err(LeadGenError::Scoring(format!(
                "invalid training set: {} samples, {} labels",
                samples.len(),
                labels.len()
            )));
        }
        if n_estimators == 0 {
            return Err(LeadGenError::Scoring("forest needs at least one tree".into()));
        }

        let data = Dataset { samples, labels };
        let max_features = max_features(N_FEATURES);
        let mut rng = StdRng::seed_from_u64(seed);
        let n = samples.len();

        let trees = (0..n_estimators)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                data.grow(&bootstrap, max_features, &mut rng)
            })
            .collect();

        Ok(Self { trees })
    }

    /// Fit on [`TRAINING_SET`].
    pub fn fit_default(n_estimators: usize, seed: u64) -> Result<Self> {
        let samples: Vec<Sample> = TRAINING_SET
            .iter()
            .map(|(x, _)| x.map(f64::from))
            .collect();
        let labels: Vec<u8> = TRAINING_SET.iter().map(|(_, y)| *y).collect();
        Self::fit(&samples, &labels, n_estimators, seed)
    }

    /// Positive-class probability averaged over all trees.
    pub fn predict_proba(&self, x: &Sample) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        sum / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

/// Candidate features per split: `max(1, ⌊√n⌋)`.
fn max_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().floor() as usize).max(1)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Score each feature vector in `[0, 100]`, in input order.
///
/// Fails with [`LeadGenError::Scoring`] when `features` is empty.
#[instrument(skip_all, fields(leads = features.len(), n_estimators = n_estimators, seed = seed))]
pub fn score(features: &[FeatureVector], n_estimators: usize, seed: u64) -> Result<Vec<f64>> {
    if features.is_empty() {
        return Err(LeadGenError::Scoring("no leads to score".into()));
    }

    let forest = RandomForest::fit_default(n_estimators, seed)?;
    let scores: Vec<f64> = features
        .iter()
        .map(|f| (forest.predict_proba(&f.to_array()) * 100.0).clamp(0.0, 100.0))
        .collect();

    debug!(trees = forest.n_trees(), "leads scored");
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREES: usize = 100;
    const SEED: u64 = 42;

    fn fv(role: u8, funding: u8, hub: u8) -> FeatureVector {
        FeatureVector::new(role, funding, hub)
    }

    fn all_vectors() -> Vec<FeatureVector> {
        let mut out = Vec::new();
        for role in 1..=3 {
            for funding in 1..=3 {
                for hub in 0..=1 {
                    out.push(fv(role, funding, hub));
                }
            }
        }
        out
    }

    #[test]
    fn empty_input_is_scoring_error() {
        let err = score(&[], TREES, SEED).unwrap_err();
        assert!(matches!(err, LeadGenError::Scoring(_)));
    }

    #[test]
    fn zero_trees_is_rejected() {
        assert!(score(&[fv(1, 1, 0)], 0, SEED).is_err());
    }

    #[test]
    fn scores_are_in_range() {
        let scores = score(&all_vectors(), TREES, SEED).unwrap();
        assert_eq!(scores.len(), 18);
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    }

    #[test]
    fn scoring_is_deterministic() {
        let input = all_vectors();
        let first = score(&input, TREES, SEED).unwrap();
        let second = score(&input, TREES, SEED).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn scores_do_not_depend_on_batch_composition() {
        let alone = score(&[fv(2, 3, 0)], TREES, SEED).unwrap();
        let batch = score(&[fv(1, 1, 1), fv(2, 3, 0), fv(3, 1, 0)], TREES, SEED).unwrap();
        assert_eq!(alone[0], batch[1]);
    }

    #[test]
    fn strongest_profile_outranks_weakest() {
        let scores = score(&[fv(3, 3, 1), fv(1, 1, 0)], TREES, SEED).unwrap();
        assert!(scores[0] >= scores[1]);
    }

    #[test]
    fn executive_at_funded_hub_company_scores_high() {
        let scores = score(&[fv(3, 3, 1)], TREES, SEED).unwrap();
        assert!(scores[0] >= 80.0, "score was {}", scores[0]);
    }

    #[test]
    fn junior_grant_funded_outside_hub_scores_low() {
        let scores = score(&[fv(1, 1, 0)], TREES, SEED).unwrap();
        assert!(scores[0] < 60.0, "score was {}", scores[0]);
    }

    #[test]
    fn single_tree_predicts_pure_leaves() {
        // Training labels never disagree for identical inputs, so every leaf
        // of a fully grown tree is pure.
        let forest = RandomForest::fit_default(1, 7).unwrap();
        for v in all_vectors() {
            let p = forest.predict_proba(&v.to_array());
            assert!(p == 0.0 || p == 1.0, "p = {p}");
        }
    }

    #[test]
    fn max_features_rule() {
        assert_eq!(max_features(1), 1);
        assert_eq!(max_features(3), 1);
        assert_eq!(max_features(4), 2);
        assert_eq!(max_features(10), 3);
    }

    #[test]
    fn gini_values() {
        assert_eq!(gini(0, 4), 0.0);
        assert_eq!(gini(4, 4), 0.0);
        assert!((gini(2, 4) - 0.5).abs() < 1e-12);
        assert_eq!(gini(0, 0), 0.0);
    }
}

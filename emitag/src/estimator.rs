use hashbrown::HashMap;

use crate::corpus::TrainingSet;
use crate::errors::{EmitagError, Result};
use crate::model::{EmissionTable, Model};
use crate::vocabulary::{Vocabulary, UNK};

/// Default value of the smoothing constant `k`.
pub const DEFAULT_SMOOTHING: f64 = 0.5;

/// Estimator of emission scores.
///
/// Emission scores are computed from the counts of a training set as follows:
///
/// * `count(x, y) / (count(y) + k)` for a word `x` observed in training, and
/// * `k / (count(y) + k)` for the unknown-word placeholder,
///
/// where `count(x, y)` is the number of times `x` was tagged `y`, `count(y)` is the number of
/// times tag `y` appeared, and `k` is the smoothing constant.
///
/// # Examples
///
/// ```
/// use emitag::{Estimator, Observation, TrainingSet, UNK};
///
/// let ts: TrainingSet = [("the", "DT"), ("the", "DT"), ("dog", "NN"), ("barks", "VB")]
///     .into_iter()
///     .map(|(w, t)| Observation::new(w, t))
///     .collect();
/// let estimator = Estimator::new(&ts).unwrap();
///
/// assert_eq!(0.8, estimator.emission("the", "DT"));
/// assert_eq!(0.2, estimator.emission(UNK, "DT"));
///
/// let model = estimator.into_model();
/// let tagger = model.tagger().unwrap();
/// assert_eq!("DT", tagger.tag_token("the").unwrap());
/// assert_eq!("NN", tagger.tag_token("cat").unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct Estimator {
    tags: Vocabulary,
    words: Vocabulary,
    // (word ID, tag ID) -> count
    pair_counts: HashMap<(usize, usize), usize>,
    tag_counts: Vec<usize>,
    smoothing: f64,
}

impl Estimator {
    /// Counts words and tags of a training set.
    ///
    /// # Errors
    ///
    /// [`EmitagError::InvalidArgument`] will be returned if `training_set` is empty.
    pub fn new(training_set: &TrainingSet) -> Result<Self> {
        if training_set.is_empty() {
            return Err(EmitagError::invalid_argument(
                "training_set",
                "no observations",
            ));
        }
        let mut tags = Vocabulary::new();
        let mut words = Vocabulary::new();
        let mut pair_counts = HashMap::new();
        let mut tag_counts = vec![];
        for obs in training_set.iter() {
            let word_id = words.get_or_insert(obs.word());
            let tag_id = tags.get_or_insert(obs.tag());
            if tag_id == tag_counts.len() {
                tag_counts.push(0);
            }
            tag_counts[tag_id] += 1;
            *pair_counts.entry((word_id, tag_id)).or_insert(0) += 1;
        }
        log::info!(
            "counted {} observations: {} words, {} tags",
            training_set.len(),
            words.len(),
            tags.len(),
        );
        Ok(Self {
            tags,
            words,
            pair_counts,
            tag_counts,
            smoothing: DEFAULT_SMOOTHING,
        })
    }

    /// Sets the smoothing constant `k`.
    ///
    /// # Errors
    ///
    /// [`EmitagError::InvalidArgument`] will be returned if `k` is not a positive finite number.
    pub fn smoothing(mut self, k: f64) -> Result<Self> {
        if !k.is_finite() || k <= 0.0 {
            return Err(EmitagError::invalid_argument(
                "k",
                format!("must be a positive finite number, got {k}"),
            ));
        }
        self.smoothing = k;
        Ok(self)
    }

    /// Gets the smoothing constant `k`.
    pub const fn k(&self) -> f64 {
        self.smoothing
    }

    /// Gets tags in first-occurrence order.
    pub const fn tags(&self) -> &Vocabulary {
        &self.tags
    }

    /// Gets words in first-occurrence order.
    pub const fn words(&self) -> &Vocabulary {
        &self.words
    }

    /// Gets the number of times `word` was tagged `tag`.
    pub fn count(&self, word: &str, tag: &str) -> usize {
        match (self.words.id(word), self.tags.id(tag)) {
            (Some(word_id), Some(tag_id)) => self.pair_count(word_id, tag_id),
            _ => 0,
        }
    }

    /// Gets the number of times `tag` appeared.
    pub fn tag_count(&self, tag: &str) -> usize {
        self.tags.id(tag).map_or(0, |tag_id| self.tag_counts[tag_id])
    }

    /// Computes the emission score of `word` for `tag`. `word` may be [`UNK`].
    pub fn emission(&self, word: &str, tag: &str) -> f64 {
        let den = self.tag_count(tag) as f64 + self.smoothing;
        if word == UNK {
            self.smoothing / den
        } else {
            self.count(word, tag) as f64 / den
        }
    }

    #[inline(always)]
    fn pair_count(&self, word_id: usize, tag_id: usize) -> usize {
        self.pair_counts
            .get(&(word_id, tag_id))
            .copied()
            .unwrap_or(0)
    }

    /// Builds the emission table.
    ///
    /// The table has one row per word in vocabulary order followed by the unknown-word row. Each
    /// row has one entry per tag in vocabulary order.
    pub fn fit(&self) -> EmissionTable {
        let dens: Vec<f64> = self
            .tag_counts
            .iter()
            .map(|&c| c as f64 + self.smoothing)
            .collect();
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(self.words.len() + 1);
        for word_id in 0..self.words.len() {
            rows.push(
                dens.iter()
                    .enumerate()
                    .map(|(tag_id, den)| self.pair_count(word_id, tag_id) as f64 / den)
                    .collect(),
            );
        }
        rows.push(dens.iter().map(|den| self.smoothing / den).collect());
        log::debug!("built emission table: {} x {}", rows.len(), dens.len());
        EmissionTable::new_unchecked(rows, self.tags.len())
    }

    /// Builds the emission table and bundles it with clones of the vocabularies.
    pub fn fit_model(&self) -> Model {
        Model::from_estimator(self.tags.clone(), self.words.clone(), self.fit(), self.smoothing)
    }

    /// Builds the emission table and bundles it with the vocabularies.
    pub fn into_model(self) -> Model {
        let table = self.fit();
        Model::from_estimator(self.tags, self.words, table, self.smoothing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::corpus::Observation;

    fn training_set(pairs: &[(&str, &str)]) -> TrainingSet {
        pairs.iter().map(|&(w, t)| Observation::new(w, t)).collect()
    }

    fn dog_corpus() -> TrainingSet {
        training_set(&[("the", "DT"), ("the", "DT"), ("dog", "NN"), ("barks", "VB")])
    }

    #[test]
    fn test_counts() {
        let estimator = Estimator::new(&dog_corpus()).unwrap();
        assert_eq!(2, estimator.count("the", "DT"));
        assert_eq!(2, estimator.tag_count("DT"));
        assert_eq!(1, estimator.count("dog", "NN"));
        assert_eq!(1, estimator.tag_count("NN"));
        assert_eq!(0, estimator.count("dog", "DT"));
        assert_eq!(0, estimator.count("cat", "NN"));
        assert_eq!(0, estimator.tag_count("JJ"));
        assert_eq!(vec!["DT", "NN", "VB"], estimator.tags().iter().collect::<Vec<_>>());
        assert_eq!(
            vec!["the", "dog", "barks"],
            estimator.words().iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_emission() {
        let estimator = Estimator::new(&dog_corpus()).unwrap();
        assert_eq!(2. / 2.5, estimator.emission("the", "DT"));
        assert_eq!(1. / 1.5, estimator.emission("dog", "NN"));
        assert_eq!(0.5 / 2.5, estimator.emission(UNK, "DT"));
        assert_eq!(0.5 / 1.5, estimator.emission(UNK, "VB"));
        assert_eq!(0.0, estimator.emission("the", "NN"));
    }

    #[test]
    fn test_fit_rows() {
        let estimator = Estimator::new(&dog_corpus()).unwrap();
        let table = estimator.fit();
        assert_eq!(4, table.n_rows());
        assert_eq!(3, table.n_tags());
        assert_eq!(&[0.8, 0.0, 0.0], table.row(0).unwrap());
        assert_eq!(&[0.0, 1. / 1.5, 0.0], table.row(1).unwrap());
        assert_eq!(&[0.0, 0.0, 1. / 1.5], table.row(2).unwrap());
        assert_eq!(&[0.2, 0.5 / 1.5, 0.5 / 1.5], table.row(3).unwrap());
    }

    #[test]
    fn test_fit_matches_emission() {
        let ts = training_set(&[
            ("a", "X"),
            ("b", "Y"),
            ("a", "Y"),
            ("c", "Z"),
            ("a", "X"),
            ("b", "X"),
        ]);
        let estimator = Estimator::new(&ts).unwrap().smoothing(0.3).unwrap();
        let table = estimator.fit();
        let words: Vec<_> = estimator.words().iter().chain([UNK]).collect();
        for (row, word) in table.rows().iter().zip(words) {
            assert_eq!(estimator.tags().len(), row.len());
            for (&e, tag) in row.iter().zip(estimator.tags().iter()) {
                assert_eq!(estimator.emission(word, tag).to_bits(), e.to_bits());
                assert!((0.0..=1.0).contains(&e));
            }
        }
    }

    #[test]
    fn test_fit_deterministic() {
        let estimator = Estimator::new(&dog_corpus()).unwrap();
        let a = estimator.fit();
        let b = Estimator::new(&dog_corpus()).unwrap().fit();
        assert_eq!(a, b);
        assert_eq!(a, estimator.fit());
    }

    #[test]
    fn test_smoothing() {
        let estimator = Estimator::new(&dog_corpus()).unwrap().smoothing(1.0).unwrap();
        assert_eq!(1.0, estimator.k());
        assert_eq!(1. / 3., estimator.emission(UNK, "DT"));
        assert_eq!(2. / 3., estimator.emission("the", "DT"));
    }

    #[test]
    fn test_smoothing_invalid() {
        for k in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = Estimator::new(&dog_corpus()).unwrap().smoothing(k).unwrap_err();
            assert!(matches!(err, EmitagError::InvalidArgument(_)), "{k}");
        }
    }

    #[test]
    fn test_empty_training_set() {
        let err = Estimator::new(&TrainingSet::default()).unwrap_err();
        assert!(matches!(err, EmitagError::InvalidArgument(_)));
    }

    #[test]
    fn test_into_model() {
        let estimator = Estimator::new(&dog_corpus()).unwrap();
        let model = estimator.fit_model();
        assert_eq!(model, estimator.into_model());
        assert_eq!(3, model.words().len());
        assert_eq!(DEFAULT_SMOOTHING, model.smoothing());
    }
}

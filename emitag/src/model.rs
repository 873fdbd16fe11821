use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::errors::{EmitagError, Result};
use crate::tagger::Tagger;
use crate::vocabulary::{Vocabulary, UNK};

// Rows of the EmissionTable are ordered as follows:
//
//          tag1 tag2 tag3 ...
//
// word1     .    .    .
// word2     .    .    .
// ...
// #UNK#     .    .    .
//
// Row `i < |words|` belongs to the word with ID `i`, and row `|words|` to the unknown-word
// placeholder.

/// Emission scores for each word and tag.
///
/// Scores are smoothed relative frequencies in `[0, 1]`. They do not sum to 1 within a row.
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionTable {
    rows: Vec<Vec<f64>>,
    n_tags: usize,
}

impl EmissionTable {
    /// Creates a table from rows of scores.
    ///
    /// # Errors
    ///
    /// [`EmitagError::InvalidModel`] will be returned when `rows` is empty, when rows have
    /// different lengths, or when a score is not within `[0, 1]`.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_tags = rows
            .first()
            .ok_or_else(|| EmitagError::invalid_model("emission table has no rows"))?
            .len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_tags {
                return Err(EmitagError::invalid_model(format!(
                    "row {i} has {} entries, expected {n_tags}",
                    row.len(),
                )));
            }
            if let Some(p) = row.iter().find(|p| !(0.0..=1.0).contains(*p)) {
                return Err(EmitagError::invalid_model(format!(
                    "row {i} has an out-of-range score {p}",
                )));
            }
        }
        Ok(Self { rows, n_tags })
    }

    pub(crate) const fn new_unchecked(rows: Vec<Vec<f64>>, n_tags: usize) -> Self {
        Self { rows, n_tags }
    }

    /// Gets the scores of row `idx`.
    #[inline(always)]
    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// Gets all rows. The last one is the unknown-word row.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Gets the number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Gets the number of entries in each row.
    pub const fn n_tags(&self) -> usize {
        self.n_tags
    }
}

#[derive(Encode)]
struct ModelDataRef<'a> {
    tags: &'a [String],
    words: &'a [String],
    rows: &'a [Vec<f64>],
    smoothing: f64,
}

#[derive(Decode)]
struct ModelData {
    tags: Vec<String>,
    words: Vec<String>,
    rows: Vec<Vec<f64>>,
    smoothing: f64,
}

/// Model data.
///
/// A model bundles the tag and word vocabularies with the [`EmissionTable`] built from them, so
/// that a table is always used together with the vocabularies it was estimated from.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    tags: Vocabulary,
    words: Vocabulary,
    table: EmissionTable,
    smoothing: f64,
}

impl Model {
    /// Creates a model.
    ///
    /// # Errors
    ///
    /// [`EmitagError::InvalidModel`] will be returned when:
    ///
    /// * there are no tags.
    /// * the word vocabulary contains the reserved placeholder [`UNK`].
    /// * `smoothing` is not a positive finite number.
    /// * the table does not have exactly one row per word plus the unknown-word row, or its
    ///   width differs from the number of tags.
    pub fn new(
        tags: Vocabulary,
        words: Vocabulary,
        table: EmissionTable,
        smoothing: f64,
    ) -> Result<Self> {
        if tags.is_empty() {
            return Err(EmitagError::invalid_model("tag vocabulary is empty"));
        }
        if words.contains(UNK) {
            return Err(EmitagError::invalid_model(format!(
                "`{UNK}` is reserved for unknown words"
            )));
        }
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(EmitagError::invalid_model(format!(
                "smoothing constant must be a positive finite number, got {smoothing}"
            )));
        }
        if table.n_tags() != tags.len() {
            return Err(EmitagError::invalid_model(format!(
                "table has {} columns but there are {} tags",
                table.n_tags(),
                tags.len(),
            )));
        }
        if table.n_rows() != words.len() + 1 {
            return Err(EmitagError::invalid_model(format!(
                "table has {} rows but there are {} words",
                table.n_rows(),
                words.len(),
            )));
        }
        Ok(Self {
            tags,
            words,
            table,
            smoothing,
        })
    }

    pub(crate) const fn from_estimator(
        tags: Vocabulary,
        words: Vocabulary,
        table: EmissionTable,
        smoothing: f64,
    ) -> Self {
        Self {
            tags,
            words,
            table,
            smoothing,
        }
    }

    /// Gets the tag vocabulary.
    pub const fn tags(&self) -> &Vocabulary {
        &self.tags
    }

    /// Gets the word vocabulary. It does not contain [`UNK`].
    pub const fn words(&self) -> &Vocabulary {
        &self.words
    }

    /// Gets the emission table.
    pub const fn table(&self) -> &EmissionTable {
        &self.table
    }

    /// Gets the smoothing constant the table was estimated with.
    pub const fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Creates a tagger borrowing this model.
    ///
    /// # Errors
    ///
    /// See [`Tagger::new()`].
    pub fn tagger(&self) -> Result<Tagger<'_>> {
        Tagger::new(&self.tags, &self.words, &self.table)
    }

    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        let data = ModelDataRef {
            tags: self.tags.keys(),
            words: self.words.keys(),
            rows: self.table.rows(),
            smoothing: self.smoothing,
        };
        bincode::encode_into_std_write(data, &mut wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is. If the decoded table is
    /// inconsistent with its vocabularies, [`EmitagError::InvalidModel`] will be returned.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let data: ModelData = bincode::decode_from_std_read(&mut rdr, bincode::config::standard())?;
        let tags = Vocabulary::from(data.tags);
        let words = Vocabulary::from(data.words);
        let table = EmissionTable::new(data.rows)?;
        Self::new(tags, words, table, data.smoothing)
    }
}

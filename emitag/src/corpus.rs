use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::errors::{EmitagError, Result};
use crate::vocabulary::UNK;

/// A word annotated with its tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    word: String,
    tag: String,
}

impl Observation {
    /// Creates an observation.
    pub fn new<W, T>(word: W, tag: T) -> Self
    where
        W: Into<String>,
        T: Into<String>,
    {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }

    #[inline(always)]
    /// Gets the word.
    pub fn word(&self) -> &str {
        &self.word
    }

    #[inline(always)]
    /// Gets the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Observations of a training corpus in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrainingSet {
    observations: Vec<Observation>,
    n_sentences: usize,
}

impl TrainingSet {
    /// Parses a training corpus.
    ///
    /// Each line is either blank (a sentence boundary) or exactly two whitespace-separated fields
    /// `word tag`.
    ///
    /// # Errors
    ///
    /// [`EmitagError::MalformedLine`] will be returned when a non-blank line does not have exactly
    /// two fields, or when its word is the reserved placeholder [`UNK`](crate::UNK).
    ///
    /// # Examples
    ///
    /// ```
    /// use emitag::TrainingSet;
    ///
    /// let corpus = "the DT\ndog NN\n\nbarks VB\n";
    /// let ts = TrainingSet::from_reader(corpus.as_bytes()).unwrap();
    /// assert_eq!(3, ts.len());
    /// assert_eq!(2, ts.n_sentences());
    /// assert_eq!("NN", ts.observations()[1].tag());
    ///
    /// assert!(TrainingSet::from_reader("the DT extra\n".as_bytes()).is_err());
    /// ```
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut observations = vec![];
        let mut n_sentences = 0;
        let mut in_sentence = false;
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let (word, tag) = match (fields.next(), fields.next(), fields.next()) {
                (None, _, _) => {
                    in_sentence = false;
                    continue;
                }
                (Some(word), Some(tag), None) => (word, tag),
                (Some(_), None, _) => {
                    return Err(EmitagError::malformed_line(i + 1, "missing tag field"));
                }
                (Some(_), Some(_), Some(_)) => {
                    return Err(EmitagError::malformed_line(
                        i + 1,
                        format!("expected 2 fields, got {}", line.split_whitespace().count()),
                    ));
                }
            };
            if word == UNK {
                return Err(EmitagError::malformed_line(
                    i + 1,
                    format!("`{UNK}` is reserved for unknown words"),
                ));
            }
            if !in_sentence {
                n_sentences += 1;
                in_sentence = true;
            }
            observations.push(Observation::new(word, tag));
        }
        Ok(Self {
            observations,
            n_sentences,
        })
    }

    /// Reads a training corpus from a file.
    ///
    /// # Errors
    ///
    /// [`EmitagError::FileNotFound`] will be returned if `path` does not exist. See also
    /// [`TrainingSet::from_reader()`].
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => EmitagError::file_not_found(path),
            _ => EmitagError::from(e),
        })?;
        let ts = Self::from_reader(BufReader::new(f))?;
        log::debug!(
            "loaded {} observations in {} sentences from {}",
            ts.len(),
            ts.n_sentences,
            path.display(),
        );
        Ok(ts)
    }

    /// Gets observations in file order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Iterates observations in file order.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.observations.iter()
    }

    /// Gets the number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns `true` if there are no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Gets the number of blank-line separated sentences.
    pub const fn n_sentences(&self) -> usize {
        self.n_sentences
    }
}

impl FromIterator<Observation> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        let observations: Vec<_> = iter.into_iter().collect();
        let n_sentences = usize::from(!observations.is_empty());
        Self {
            observations,
            n_sentences,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_keeps_file_order() {
        let ts = TrainingSet::from_reader("b X\na Y\n\n\nc X\n".as_bytes()).unwrap();
        let pairs: Vec<_> = ts.iter().map(|o| (o.word(), o.tag())).collect();
        assert_eq!(vec![("b", "X"), ("a", "Y"), ("c", "X")], pairs);
        assert_eq!(2, ts.n_sentences());
    }

    #[test]
    fn test_from_reader_whitespace() {
        let ts = TrainingSet::from_reader("  the\tDT  \r\n   \n\tdog   NN".as_bytes()).unwrap();
        assert_eq!(
            vec![Observation::new("the", "DT"), Observation::new("dog", "NN")],
            ts.observations(),
        );
        assert_eq!(2, ts.n_sentences());
    }

    #[test]
    fn test_from_reader_empty() {
        let ts = TrainingSet::from_reader("\n\n".as_bytes()).unwrap();
        assert!(ts.is_empty());
        assert_eq!(0, ts.n_sentences());
    }

    #[test]
    fn test_from_reader_single_field() {
        let err = TrainingSet::from_reader("the DT\ndog\n".as_bytes()).unwrap_err();
        match err {
            EmitagError::MalformedLine(e) => assert_eq!(2, e.line_no()),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_from_reader_three_fields() {
        let err = TrainingSet::from_reader("\n\nNew York NNP\n".as_bytes()).unwrap_err();
        match err {
            EmitagError::MalformedLine(e) => assert_eq!(3, e.line_no()),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_from_reader_reserved_word() {
        let err = TrainingSet::from_reader("#UNK# NN\n".as_bytes()).unwrap_err();
        assert!(matches!(err, EmitagError::MalformedLine(_)));
    }

    #[test]
    fn test_load_not_found() {
        let err = TrainingSet::load("/nonexistent/emitag/train").unwrap_err();
        match err {
            EmitagError::FileNotFound(e) => {
                assert_eq!(Path::new("/nonexistent/emitag/train"), e.path())
            }
            e => panic!("unexpected error: {e}"),
        }
    }
}

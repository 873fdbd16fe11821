use std::fmt;

use crate::errors::{EmitagError, Result};
use crate::model::EmissionTable;
use crate::vocabulary::{Vocabulary, UNK};

/// Returns the index of the largest score. Ties go to the lowest index.
///
/// # Examples
///
/// ```
/// use emitag::argmax;
///
/// assert_eq!(Some(1), argmax(&[0.1, 0.5, 0.5, 0.2]));
/// assert_eq!(None, argmax(&[]));
/// ```
pub fn argmax(row: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &p) in row.iter().enumerate() {
        match best {
            Some((_, q)) if p <= q => {}
            _ => best = Some((i, p)),
        }
    }
    best.map(|(i, _)| i)
}

/// A line of tagger output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaggedLine<'a> {
    /// Sentence boundary.
    Separator,

    /// A token and its tag.
    Token { token: String, tag: &'a str },
}

impl fmt::Display for TaggedLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Separator => Ok(()),
            Self::Token { token, tag } => write!(f, "{token} {tag}"),
        }
    }
}

/// Tagger.
///
/// Each token is assigned the tag with the highest emission score, independently of the
/// surrounding tokens.
#[derive(Clone, Copy, Debug)]
pub struct Tagger<'a> {
    tags: &'a Vocabulary,
    words: &'a Vocabulary,
    table: &'a EmissionTable,
}

impl<'a> Tagger<'a> {
    /// Creates a new tagger.
    ///
    /// `table` must have been built from `tags` and `words`.
    ///
    /// # Errors
    ///
    /// [`EmitagError::InvalidModel`] will be returned if the table width differs from the number
    /// of tags or if there are no tags.
    pub fn new(
        tags: &'a Vocabulary,
        words: &'a Vocabulary,
        table: &'a EmissionTable,
    ) -> Result<Self> {
        if tags.is_empty() {
            return Err(EmitagError::invalid_model("tag vocabulary is empty"));
        }
        if table.n_tags() != tags.len() {
            return Err(EmitagError::invalid_model(format!(
                "table has {} columns but there are {} tags",
                table.n_tags(),
                tags.len(),
            )));
        }
        Ok(Self { tags, words, table })
    }

    /// Tags a single token.
    ///
    /// Tokens not in the word vocabulary are looked up in the unknown-word row.
    ///
    /// # Errors
    ///
    /// [`EmitagError::MissingTableRow`] will be returned if the table has no row for the token.
    pub fn tag_token(&self, token: &str) -> Result<&'a str> {
        let (key, idx) = match self.words.id(token) {
            Some(idx) => (token, idx),
            None => (UNK, self.words.len()),
        };
        let row = self
            .table
            .row(idx)
            .ok_or_else(|| EmitagError::missing_table_row(key))?;
        argmax(row)
            .and_then(|i| self.tags.get(i))
            .ok_or_else(|| EmitagError::invalid_model(format!("row of `{key}` has no tags")))
    }

    /// Tags a single input line. Surrounding whitespace is ignored and a blank line is a
    /// sentence boundary.
    pub fn tag_line(&self, line: &str) -> Result<TaggedLine<'a>> {
        let token = line.trim();
        if token.is_empty() {
            return Ok(TaggedLine::Separator);
        }
        Ok(TaggedLine::Token {
            tag: self.tag_token(token)?,
            token: token.to_string(),
        })
    }

    /// Lazily tags input lines, one output item per input line.
    ///
    /// # Examples
    ///
    /// ```
    /// use emitag::{Estimator, TaggedLine, TrainingSet};
    ///
    /// let ts = TrainingSet::from_reader("the DT\ndog NN\n".as_bytes()).unwrap();
    /// let model = Estimator::new(&ts).unwrap().into_model();
    /// let tagger = model.tagger().unwrap();
    ///
    /// let out: Vec<String> = tagger
    ///     .tag_lines(["the", "dog", "", "the"])
    ///     .map(|line| line.unwrap().to_string())
    ///     .collect();
    /// assert_eq!(vec!["the DT", "dog NN", "", "the DT"], out);
    /// ```
    pub fn tag_lines<I, S>(&self, lines: I) -> TagLines<'a, I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        TagLines {
            tagger: *self,
            lines: lines.into_iter(),
        }
    }
}

/// Iterator returned by [`Tagger::tag_lines()`].
pub struct TagLines<'a, I> {
    tagger: Tagger<'a>,
    lines: I,
}

impl<'a, I, S> Iterator for TagLines<'a, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<TaggedLine<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines
            .next()
            .map(|line| self.tagger.tag_line(line.as_ref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::corpus::TrainingSet;
    use crate::estimator::Estimator;
    use crate::model::Model;

    fn dog_model() -> Model {
        let ts = TrainingSet::from_reader("the DT\nthe DT\ndog NN\nbarks VB\n".as_bytes()).unwrap();
        Estimator::new(&ts).unwrap().into_model()
    }

    #[test]
    fn test_argmax_first_maximum() {
        assert_eq!(Some(0), argmax(&[0.3, 0.3, 0.3]));
        assert_eq!(Some(2), argmax(&[0.0, 0.1, 0.7, 0.7]));
        assert_eq!(Some(0), argmax(&[0.0]));
    }

    #[test]
    fn test_tie_break_by_tag_order() {
        let tags: Vocabulary = ["A", "B", "C"].into_iter().collect();
        let words: Vocabulary = ["x"].into_iter().collect();
        let table =
            EmissionTable::new(vec![vec![0.1, 0.4, 0.4], vec![0.5, 0.5, 0.2]]).unwrap();
        let tagger = Tagger::new(&tags, &words, &table).unwrap();
        assert_eq!("B", tagger.tag_token("x").unwrap());
        assert_eq!("A", tagger.tag_token("y").unwrap());
    }

    #[test]
    fn test_tag_token() {
        let model = dog_model();
        let tagger = model.tagger().unwrap();
        assert_eq!("DT", tagger.tag_token("the").unwrap());
        assert_eq!("NN", tagger.tag_token("dog").unwrap());
        assert_eq!("VB", tagger.tag_token("barks").unwrap());
        // NN and VB share the largest unknown-word score; NN comes first.
        assert_eq!("NN", tagger.tag_token("cat").unwrap());
        assert_eq!("NN", tagger.tag_token(UNK).unwrap());
    }

    #[test]
    fn test_tag_lines_preserves_layout() {
        let model = dog_model();
        let tagger = model.tagger().unwrap();
        let input = ["the", " dog ", "", "barks", "", "", "cat"];
        let out: Vec<_> = tagger
            .tag_lines(input)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(input.len(), out.len());
        assert_eq!(
            vec![
                TaggedLine::Token {
                    token: "the".to_string(),
                    tag: "DT"
                },
                TaggedLine::Token {
                    token: "dog".to_string(),
                    tag: "NN"
                },
                TaggedLine::Separator,
                TaggedLine::Token {
                    token: "barks".to_string(),
                    tag: "VB"
                },
                TaggedLine::Separator,
                TaggedLine::Separator,
                TaggedLine::Token {
                    token: "cat".to_string(),
                    tag: "NN"
                },
            ],
            out,
        );
    }

    #[test]
    fn test_tag_with_reloaded_model() {
        let mut buf = vec![];
        dog_model().write(&mut buf).unwrap();
        let model = Model::read(buf.as_slice()).unwrap();
        let tagger = model.tagger().unwrap();
        let out: Vec<_> = tagger
            .tag_lines(["the", "cat", "", "barks"])
            .map(|line| line.unwrap().to_string())
            .collect();
        assert_eq!(vec!["the DT", "cat NN", "", "barks VB"], out);
    }

    #[test]
    fn test_tagged_line_display() {
        let line = TaggedLine::Token {
            token: "dog".to_string(),
            tag: "NN",
        };
        assert_eq!("dog NN", line.to_string());
        assert_eq!("", TaggedLine::Separator.to_string());
    }

    #[test]
    fn test_missing_table_row() {
        let tags: Vocabulary = ["A", "B"].into_iter().collect();
        let words: Vocabulary = ["x", "y"].into_iter().collect();
        // No row for `y` and none for the unknown word.
        let table = EmissionTable::new(vec![vec![0.1, 0.4]]).unwrap();
        let tagger = Tagger::new(&tags, &words, &table).unwrap();
        assert_eq!("B", tagger.tag_token("x").unwrap());
        match tagger.tag_token("y").unwrap_err() {
            EmitagError::MissingTableRow(e) => assert_eq!("y", e.word()),
            e => panic!("unexpected error: {e}"),
        }
        match tagger.tag_token("z").unwrap_err() {
            EmitagError::MissingTableRow(e) => assert_eq!(UNK, e.word()),
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_width_mismatch() {
        let tags: Vocabulary = ["A", "B", "C"].into_iter().collect();
        let words = Vocabulary::new();
        let table = EmissionTable::new(vec![vec![0.1, 0.4]]).unwrap();
        assert!(matches!(
            Tagger::new(&tags, &words, &table),
            Err(EmitagError::InvalidModel(_))
        ));
    }
}

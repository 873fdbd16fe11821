//! Accuracy measurement against gold-standard tags.

use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

use crate::errors::{EmitagError, Result};

/// Tag-wise counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TagMeasure {
    /// Number of correct predictions.
    pub n_correct: usize,

    /// Number of occurrences of the tag in the gold standard.
    pub n_observed: usize,

    /// Number of predictions of the tag.
    pub n_predicted: usize,
}

impl TagMeasure {
    /// Gets `n_correct / n_predicted`, or 0 if the tag was never predicted.
    pub fn precision(&self) -> f64 {
        if self.n_predicted == 0 {
            0.0
        } else {
            self.n_correct as f64 / self.n_predicted as f64
        }
    }

    /// Gets `n_correct / n_observed`, or 0 if the tag is not in the gold standard.
    pub fn recall(&self) -> f64 {
        if self.n_observed == 0 {
            0.0
        } else {
            self.n_correct as f64 / self.n_observed as f64
        }
    }

    /// Gets the harmonic mean of precision and recall.
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r > 0.0 {
            2. * p * r / (p + r)
        } else {
            0.0
        }
    }
}

/// Accumulated evaluation of tagged tokens.
#[derive(Clone, Debug, Default)]
pub struct Evaluation {
    // Uses BTreeMap to report tags in a stable order.
    measures: BTreeMap<String, TagMeasure>,
    n_correct: usize,
    n_total: usize,
}

impl Evaluation {
    /// Creates an empty evaluation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one token.
    pub fn push(&mut self, gold: &str, predicted: &str) {
        self.measures.entry(gold.to_string()).or_default().n_observed += 1;
        self.measures
            .entry(predicted.to_string())
            .or_default()
            .n_predicted += 1;
        if gold == predicted {
            if let Some(m) = self.measures.get_mut(gold) {
                m.n_correct += 1;
            }
            self.n_correct += 1;
        }
        self.n_total += 1;
    }

    /// Compares a gold-standard file with a predicted file.
    ///
    /// Both inputs have one `token tag` pair per line and blank lines between sentences. The two
    /// inputs must have the same tokens and blank lines at the same positions.
    ///
    /// # Errors
    ///
    /// [`EmitagError::InvalidArgument`] will be returned if the inputs are not aligned, and
    /// [`EmitagError::MalformedLine`] if a line is not a `token tag` pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use emitag::Evaluation;
    ///
    /// let gold = "the DT\ndog NN\n\nbarks VB\n";
    /// let pred = "the DT\ndog VB\n\nbarks VB\n";
    /// let eval = Evaluation::from_readers(gold.as_bytes(), pred.as_bytes()).unwrap();
    /// assert_eq!(3, eval.n_total());
    /// assert_eq!(2, eval.n_correct());
    /// ```
    pub fn from_readers<G, P>(gold: G, predicted: P) -> Result<Self>
    where
        G: BufRead,
        P: BufRead,
    {
        let mut eval = Self::new();
        let mut gold_lines = gold.lines();
        let mut pred_lines = predicted.lines();
        let mut line_no = 0;
        loop {
            line_no += 1;
            let (g, p) = match (gold_lines.next(), pred_lines.next()) {
                (None, None) => break,
                (Some(g), Some(p)) => (g?, p?),
                _ => {
                    return Err(EmitagError::invalid_argument(
                        "predicted",
                        format!("line {line_no}: inputs have different numbers of lines"),
                    ))
                }
            };
            match (parse_pair(&g, line_no)?, parse_pair(&p, line_no)?) {
                (None, None) => {}
                (Some((g_token, g_tag)), Some((p_token, p_tag))) if g_token == p_token => {
                    eval.push(g_tag, p_tag);
                }
                _ => {
                    return Err(EmitagError::invalid_argument(
                        "predicted",
                        format!("line {line_no}: token mismatch"),
                    ))
                }
            }
        }
        Ok(eval)
    }

    /// Iterates tag-wise counts in tag order.
    pub fn measures(&self) -> impl Iterator<Item = (&str, &TagMeasure)> + '_ {
        self.measures.iter().map(|(tag, m)| (tag.as_str(), m))
    }

    /// Gets the counts of `tag`.
    pub fn measure(&self, tag: &str) -> Option<&TagMeasure> {
        self.measures.get(tag)
    }

    /// Gets the number of correctly tagged tokens.
    pub const fn n_correct(&self) -> usize {
        self.n_correct
    }

    /// Gets the number of evaluated tokens.
    pub const fn n_total(&self) -> usize {
        self.n_total
    }

    /// Gets the ratio of correctly tagged tokens.
    pub fn accuracy(&self) -> f64 {
        if self.n_total == 0 {
            0.0
        } else {
            self.n_correct as f64 / self.n_total as f64
        }
    }

    /// Gets macro-averaged precision, recall and F1 over tags present in the gold standard.
    pub fn macro_average(&self) -> (f64, f64, f64) {
        let observed: Vec<_> = self
            .measures
            .values()
            .filter(|m| m.n_observed != 0)
            .collect();
        if observed.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let n = observed.len() as f64;
        let (p, r, f) = observed.iter().fold((0.0, 0.0, 0.0), |(p, r, f), m| {
            (p + m.precision(), r + m.recall(), f + m.f1())
        });
        (p / n, r / n, f / n)
    }
}

fn parse_pair(line: &str, line_no: usize) -> Result<Option<(&str, &str)>> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (None, _, _) => Ok(None),
        (Some(token), Some(tag), None) => Ok(Some((token, tag))),
        _ => Err(EmitagError::malformed_line(line_no, "expected `token tag`")),
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Performance by tag (#match, #model, #ref) (precision, recall, F1):"
        )?;
        for (tag, m) in &self.measures {
            if m.n_observed == 0 {
                writeln!(
                    f,
                    "\t{tag}: ({}, {}, {}) (******, ******, ******)",
                    m.n_correct, m.n_predicted, m.n_observed,
                )?;
            } else {
                writeln!(
                    f,
                    "\t{tag}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    m.n_correct,
                    m.n_predicted,
                    m.n_observed,
                    m.precision(),
                    m.recall(),
                    m.f1(),
                )?;
            }
        }
        let (p, r, f1) = self.macro_average();
        writeln!(f, "Macro-average precision, recall, F1: ({p:.4}, {r:.4}, {f1:.4})")?;
        write!(
            f,
            "Item accuracy: {}/{} => {:.4}",
            self.n_correct,
            self.n_total,
            self.accuracy(),
        )
    }
}

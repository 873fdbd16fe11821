#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Emitag
//!
//! Emitag is a simple sequence tagger (e.g. part-of-speech or named-entity tagging) based on
//! smoothed emission scores. Each token is assigned the tag with the highest score for the token,
//! independently of its neighbors.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{prelude::*, stdin, BufReader, BufWriter};
//!
//! use emitag::{Estimator, Model, TrainingSet};
//!
//! let ts = TrainingSet::load("train").unwrap();
//! let model = Estimator::new(&ts).unwrap().smoothing(0.5).unwrap().into_model();
//! let mut f = BufWriter::new(File::create("params.bin").unwrap());
//! model.write(&mut f).unwrap();
//! drop(f);
//!
//! let f = BufReader::new(File::open("params.bin").unwrap());
//! let model = Model::read(f).unwrap();
//! let tagger = model.tagger().unwrap();
//!
//! let lines: Vec<String> = stdin().lock().lines().map(Result::unwrap).collect();
//! for line in tagger.tag_lines(&lines) {
//!     println!("{}", line.unwrap());
//! }
//! ```

mod corpus;
mod estimator;
mod model;
mod tagger;
mod vocabulary;

pub mod errors;
pub mod evaluation;

pub use corpus::{Observation, TrainingSet};
pub use estimator::{Estimator, DEFAULT_SMOOTHING};
pub use evaluation::{Evaluation, TagMeasure};
pub use model::{EmissionTable, Model};
pub use tagger::{argmax, TagLines, TaggedLine, Tagger};
pub use vocabulary::{Vocabulary, UNK};

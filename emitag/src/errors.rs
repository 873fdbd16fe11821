//! Definition of errors.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

pub type Result<T, E = EmitagError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum EmitagError {
    FileNotFound(FileNotFoundError),
    MalformedLine(MalformedLineError),
    MissingTableRow(MissingTableRowError),
    InvalidModel(InvalidModelError),
    InvalidArgument(InvalidArgumentError),
    DecodeError(bincode::error::DecodeError),
    EncodeError(bincode::error::EncodeError),
    IOError(std::io::Error),
}

impl EmitagError {
    pub(crate) fn file_not_found<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self::FileNotFound(FileNotFoundError { path: path.into() })
    }

    pub(crate) fn malformed_line<S>(line_no: usize, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::MalformedLine(MalformedLineError {
            line_no,
            msg: msg.into(),
        })
    }

    pub(crate) fn missing_table_row<S>(word: S) -> Self
    where
        S: Into<String>,
    {
        Self::MissingTableRow(MissingTableRowError { word: word.into() })
    }

    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }
}

impl fmt::Display for EmitagError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::FileNotFound(e) => e.fmt(f),
            Self::MalformedLine(e) => e.fmt(f),
            Self::MissingTableRow(e) => e.fmt(f),
            Self::InvalidModel(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::DecodeError(e) => e.fmt(f),
            Self::EncodeError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for EmitagError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DecodeError(e) => Some(e),
            Self::EncodeError(e) => Some(e),
            Self::IOError(e) => Some(e),
            _ => None,
        }
    }
}

/// Error used when an input file does not exist.
#[derive(Debug)]
pub struct FileNotFoundError {
    /// Path that could not be opened.
    pub(crate) path: PathBuf,
}

impl FileNotFoundError {
    /// Gets the path that could not be opened.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for FileNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FileNotFoundError: {}", self.path.display())
    }
}

impl Error for FileNotFoundError {}

/// Error used when a line of the training corpus cannot be parsed.
#[derive(Debug)]
pub struct MalformedLineError {
    /// 1-based line number.
    pub(crate) line_no: usize,

    /// Error message.
    pub(crate) msg: String,
}

impl MalformedLineError {
    /// Gets the 1-based number of the offending line.
    pub const fn line_no(&self) -> usize {
        self.line_no
    }
}

impl fmt::Display for MalformedLineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MalformedLineError: line {}: {}", self.line_no, self.msg)
    }
}

impl Error for MalformedLineError {}

/// Error used when the emission table has no row for a looked-up word.
#[derive(Debug)]
pub struct MissingTableRowError {
    /// The word (or the unknown-word placeholder) without a row.
    pub(crate) word: String,
}

impl MissingTableRowError {
    /// Gets the word that has no row.
    pub fn word(&self) -> &str {
        &self.word
    }
}

impl fmt::Display for MissingTableRowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MissingTableRowError: no row for `{}`", self.word)
    }
}

impl Error for MissingTableRowError {}

/// Error used when the model is invalid.
#[derive(Debug)]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidModelError: {}", self.msg)
    }
}

impl Error for InvalidModelError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

impl From<bincode::error::DecodeError> for EmitagError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::DecodeError(error)
    }
}

impl From<bincode::error::EncodeError> for EmitagError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::EncodeError(error)
    }
}

impl From<std::io::Error> for EmitagError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}

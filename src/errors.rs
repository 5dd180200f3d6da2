use thiserror;

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid base '{}' in \"{seq}\"", base_char(.base))]
    InvalidBase { base: u8, seq: String },

    #[error("Duplicate read ID: {0}")]
    DuplicateReadId(String),

    #[error("Read {0} was already matched by an earlier stage")]
    AlreadyMatched(String),

    #[error("Unknown read ID: {0}")]
    UnknownReadId(String),

    #[error("Match for read {id} starts at {start}, past the end of the {len} bp sequence")]
    MatchOutOfBounds { id: String, start: usize, len: usize },

    #[error("Read {id} has {seq_len} bases but {qual_len} quality scores")]
    QualityLengthMismatch {
        id: String,
        seq_len: usize,
        qual_len: usize,
    },

    #[error("Empty primer sequence")]
    EmptyPrimer,

    #[error("At most 3 mismatches are supported for complete matching, but {0} were requested")]
    TooManyMismatches(usize),

    #[error("External aligner \"{program}\" failed: {reason}")]
    ExternalTool { program: String, reason: String },

    #[error("Could not parse line {line} of the aligner hit table: {reason}")]
    ParseHit { line: usize, reason: String },

    #[error("Error reading or writing \"{file}\": {source}")]
    FileIo { file: String, source: BoxError },

    #[error("Error reading or writing bytes: {0}")]
    BytesIo(BoxError),

    #[error("Error parsing record {idx} in {origin}: {source}")]
    ParseRecord {
        origin: Origin,
        idx: usize,
        source: BoxError,
    },

    #[error("Unpaired read in {0}")]
    UnpairedRead(String),

    #[error("Error parsing configuration: {source}")]
    ParseConfig { source: BoxError },
}

/// Where a batch of reads came from, for error messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Origin {
    File(String),
    Stdin,
    Bytes,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Origin::*;
        match self {
            File(file) => write!(f, "file: \"{}\"", file),
            Stdin => write!(f, "standard input"),
            Bytes => write!(f, "bytes"),
        }
    }
}

fn base_char(b: &u8) -> char {
    char::from(*b)
}

pub fn utf8(b: &[u8]) -> String {
    String::from_utf8_lossy(b).into_owned()
}

pub(crate) fn file_io(file: impl AsRef<std::path::Path>, e: impl Into<BoxError>) -> Error {
    Error::FileIo {
        file: file.as_ref().display().to_string(),
        source: e.into(),
    }
}

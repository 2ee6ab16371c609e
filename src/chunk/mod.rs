//! Chunk list loading and parsing
//!
//! The chunk file is plain text with one `<start> <end>` interval per line. Each
//! worker reads the whole file itself; the line number is the chunk index that
//! decides which worker owns the chunk, so lines are kept raw and in order and
//! only parsed when a worker reaches them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading the chunk file
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("Unable to open file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed reading {} at line {}", path.display(), line + 1)]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

/// Why a chunk line could not be parsed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkParseError {
    #[error("expected 2 whitespace-separated tokens, found {found}")]
    TooFewTokens { found: usize },
    #[error("expected 2 whitespace-separated tokens, found {found}")]
    TooManyTokens { found: usize },
    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

/// One interval to impute
///
/// The tokens are passed through to impute2 and into the output file name
/// unchanged; they are not required to be numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDescriptor {
    pub start: String,
    pub end: String,
}

impl ChunkDescriptor {
    /// Split a line into exactly two tokens
    ///
    /// Lines loaded from non-UTF-8 bytes carry U+FFFD and are rejected here
    /// rather than passed on to impute2.
    pub fn parse(line: &str) -> Result<Self, ChunkParseError> {
        if line.contains(char::REPLACEMENT_CHARACTER) {
            return Err(ChunkParseError::InvalidEncoding);
        }
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(start), Some(end)) => {
                let extra = tokens.count();
                if extra > 0 {
                    return Err(ChunkParseError::TooManyTokens { found: 2 + extra });
                }
                Ok(Self {
                    start: start.to_string(),
                    end: end.to_string(),
                })
            }
            (Some(_), None) => Err(ChunkParseError::TooFewTokens { found: 1 }),
            _ => Err(ChunkParseError::TooFewTokens { found: 0 }),
        }
    }
}

/// Ordered, immutable list of raw chunk lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkList {
    lines: Vec<String>,
}

impl ChunkList {
    /// Read every line of `path`
    ///
    /// Bytes that are not UTF-8 do not fail the load; they become U+FFFD and
    /// the line is reported as malformed when its owner parses it.
    pub fn load(path: &Path) -> Result<Self, ChunkError> {
        let file = File::open(path).map_err(|source| ChunkError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = BufReader::new(file);
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).map_err(|source| ChunkError::Read {
                path: path.to_path_buf(),
                line: lines.len(),
                source,
            })?;
            if read == 0 {
                break;
            }
            if buf.ends_with(b"\n") {
                buf.pop();
                if buf.ends_with(b"\r") {
                    buf.pop();
                }
            }
            lines.push(String::from_utf8_lossy(&buf).into_owned());
        }

        Ok(Self { lines })
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Raw line at chunk index `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

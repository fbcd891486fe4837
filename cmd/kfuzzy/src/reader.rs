//! Input file readers.
//!
//! Supported formats:
//!
//! - `simple`: `n d k` followed by `n` rows of `d` numbers.
//! - `tab`: `d k z`, then `k` counts whose last value is the number of
//!   objects `n`, then the unknown-value marker, then `n` rows of `d`
//!   numbers. Unknown values are replaced by their column mean.
//! - `json`: `{"clusters": k, "vectors": [[...], ...]}`.

use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use kfuzzy::{approx_eq, Vector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by input readers.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unexpected end of input at token {position}: expected {expected}")]
    UnexpectedEof {
        position: usize,
        expected: &'static str,
    },

    #[error("invalid token {token:?} at position {position}: expected {expected}")]
    InvalidToken {
        position: usize,
        token: String,
        expected: &'static str,
    },

    #[error("trailing data at token {position}: {token:?}")]
    TrailingData { position: usize, token: String },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Vectors to cluster plus the cluster count requested by the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Input {
    pub clusters: usize,
    pub vectors: Vec<Vector>,
}

/// Parses the whole text of an input file.
pub trait InputReader {
    fn read(&self, text: &str) -> Result<Input, ReadError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Simple,
    Tab,
    Json,
}

impl InputFormat {
    /// Guesses the format from a file extension. Unknown extensions map
    /// to `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str())?.to_lowercase().as_str() {
            "tab" => Some(InputFormat::Tab),
            "json" => Some(InputFormat::Json),
            "txt" | "in" => Some(InputFormat::Simple),
            _ => None,
        }
    }

    pub fn reader(self) -> Box<dyn InputReader> {
        match self {
            InputFormat::Simple => Box::new(SimpleReader),
            InputFormat::Tab => Box::new(TabReader),
            InputFormat::Json => Box::new(JsonReader),
        }
    }
}

/// Whitespace tokenizer that remembers how many tokens it has consumed.
struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
            position: 0,
        }
    }

    fn next<T: FromStr>(&mut self, expected: &'static str) -> Result<T, ReadError> {
        let position = self.position;
        let token = self
            .iter
            .next()
            .ok_or(ReadError::UnexpectedEof { position, expected })?;
        self.position += 1;
        token.parse().map_err(|_| ReadError::InvalidToken {
            position,
            token: token.to_string(),
            expected,
        })
    }

    fn finish(mut self) -> Result<(), ReadError> {
        match self.iter.next() {
            Some(token) => Err(ReadError::TrailingData {
                position: self.position,
                token: token.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Zero-width rows consume no tokens, so a header claiming objects of
/// dimension 0 could never be checked against the input.
fn reject_empty_rows(objects: usize, dims: usize, position: usize) -> Result<(), ReadError> {
    if objects > 0 && dims == 0 {
        return Err(ReadError::InvalidToken {
            position,
            token: dims.to_string(),
            expected: "positive dimension count",
        });
    }
    Ok(())
}

/// Reads the `simple` format.
///
/// ```text
/// 4 2 3
/// 1.0 2.0
/// 1.1 2.1
/// 5.0 1.0
/// 5.1 1.0
/// ```
pub struct SimpleReader;

impl InputReader for SimpleReader {
    fn read(&self, text: &str) -> Result<Input, ReadError> {
        let mut tokens = Tokens::new(text);
        let objects: usize = tokens.next("object count")?;
        let dims: usize = tokens.next("dimension count")?;
        let clusters: usize = tokens.next("cluster count")?;

        reject_empty_rows(objects, dims, 1)?;

        // Counts come from the file; rows are only allocated as tokens arrive.
        let mut vectors = Vec::new();
        for _ in 0..objects {
            let mut row = Vec::new();
            for _ in 0..dims {
                row.push(tokens.next::<f64>("component")?);
            }
            vectors.push(Vector::new(row));
        }
        tokens.finish()?;
        Ok(Input { clusters, vectors })
    }
}

/// Reads the `tab` format, imputing unknown values with column means.
pub struct TabReader;

impl InputReader for TabReader {
    fn read(&self, text: &str) -> Result<Input, ReadError> {
        let mut tokens = Tokens::new(text);
        let dims: usize = tokens.next("dimension count")?;
        let clusters: usize = tokens.next("cluster count")?;
        let _reserved: i64 = tokens.next("reserved zero")?;

        let mut objects = 0usize;
        for _ in 0..clusters {
            objects = tokens.next("object count")?;
        }
        let unknown: f64 = tokens.next("unknown value marker")?;
        reject_empty_rows(objects, dims, 0)?;

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for _ in 0..objects {
            let mut row = Vec::new();
            for _ in 0..dims {
                row.push(tokens.next::<f64>("component")?);
            }
            rows.push(row);
        }
        tokens.finish()?;

        let width = rows.first().map_or(0, Vec::len);
        let means: Vec<f64> = (0..width)
            .map(|j| {
                let (sum, known) = rows
                    .iter()
                    .map(|row| row[j])
                    .filter(|&x| !approx_eq(x, unknown))
                    .fold((0.0f64, 0usize), |(s, k), x| (s + x, k + 1));
                if known == 0 { 0.0 } else { sum / known as f64 }
            })
            .collect();

        let mut imputed = 0usize;
        let vectors = rows
            .into_iter()
            .map(|mut row| {
                for (x, &mean) in row.iter_mut().zip(&means) {
                    if approx_eq(*x, unknown) {
                        *x = mean;
                        imputed += 1;
                    }
                }
                Vector::new(row)
            })
            .collect();

        if imputed > 0 {
            tracing::debug!(imputed, "replaced unknown values with column means");
        }
        Ok(Input { clusters, vectors })
    }
}

/// Reads the `json` format.
pub struct JsonReader;

impl InputReader for JsonReader {
    fn read(&self, text: &str) -> Result<Input, ReadError> {
        Ok(serde_json::from_str(text)?)
    }
}

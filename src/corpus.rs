use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

static PASSAGE_DIR: Dir = include_dir!("src/passages");

/// A set of candidate passages, one of which is picked per session.
#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub passages: Vec<String>,
}

impl Corpus {
    /// The corpus shipped inside the binary.
    pub fn embedded() -> Result<Self, CorpusError> {
        let file = PASSAGE_DIR.get_file("default.json").ok_or_else(|| {
            CorpusError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "embedded passage file missing",
            ))
        })?;
        let contents = file.contents_utf8().ok_or_else(|| {
            CorpusError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "embedded passage file is not utf-8",
            ))
        })?;

        let corpus: Corpus = serde_json::from_str(contents)?;
        Self::build(corpus.name, corpus.passages)
    }

    /// Load a corpus from a plain text file, one candidate passage per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("file"));

        Self::build(name, contents.lines().map(str::to_string).collect())
    }

    /// Wrap a single caller-supplied passage.
    pub fn from_passage(passage: &str) -> Result<Self, CorpusError> {
        Self::build(String::from("custom"), vec![passage.to_string()])
    }

    fn build(name: String, raw: Vec<String>) -> Result<Self, CorpusError> {
        let passages = sanitize(raw);
        if passages.is_empty() {
            return Err(CorpusError::Empty);
        }
        log::debug!("corpus '{name}' loaded with {} passages", passages.len());
        Ok(Self { name, passages })
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Pick one passage uniformly at random.
    pub fn pick(&self) -> Result<String, CorpusError> {
        self.passages
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(CorpusError::Empty)
    }
}

/// Trim candidates and drop the unusable ones: blank lines and anything
/// carrying control characters the key capture could never match.
fn sanitize(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .filter_map(|entry| {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.chars().any(char::is_control) {
                log::warn!("dropping passage with control characters: {trimmed:?}");
                return None;
            }
            Some(trimmed.to_string())
        })
        .collect()
}

#[derive(Debug)]
pub enum CorpusError {
    /// No usable passages to run a test with.
    Empty,
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusError::Empty => write!(f, "corpus contains no usable passages"),
            CorpusError::Io(err) => write!(f, "failed to read corpus: {err}"),
            CorpusError::Parse(err) => write!(f, "failed to parse corpus: {err}"),
        }
    }
}

impl std::error::Error for CorpusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CorpusError::Empty => None,
            CorpusError::Io(err) => Some(err),
            CorpusError::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for CorpusError {
    fn from(err: io::Error) -> Self {
        CorpusError::Io(err)
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(err: serde_json::Error) -> Self {
        CorpusError::Parse(err)
    }
}

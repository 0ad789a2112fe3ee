//! Document emitters: one artifact per job, one output unit per input file.
//!
//! Every emitter follows the same lifecycle, `begin` -> `append`* -> `finish`.
//! Calling them out of order is a programming error and panics.
mod csv_file;
mod pdf;
mod text;

use std::path::{Path, PathBuf};

use crate::persist::PersistError;
use crate::OutputFormat;

pub use csv_file::CsvEmitter;
pub use pdf::{PdfEmitter, PdfLayout};
pub use text::{separator_line, split_text_artifact, TextArtifactError, TextEmitter};

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("pdf error: {0}")]
    Pdf(String),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

pub trait Emitter {
    fn begin(&mut self) -> Result<(), EmitError>;
    fn append(&mut self, label: &str, content: &str) -> Result<(), EmitError>;
    /// Persist the artifact at `output`, returning the final path.
    fn finish(&mut self, output: &Path) -> Result<PathBuf, EmitError>;
    /// Number of units (PDF sections, text blocks, CSV rows) appended so far.
    fn units(&self) -> usize;
}

/// Optional front matter: the root folder and its file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    pub title: String,
    pub tree: Vec<String>,
}

pub fn create_emitter(
    format: OutputFormat,
    cover: Option<Cover>,
    layout: &PdfLayout,
) -> Box<dyn Emitter> {
    match format {
        OutputFormat::Txt => Box::new(TextEmitter::new(cover)),
        // CSV rows are (label, content) only; there is no place for a cover.
        OutputFormat::Csv => Box::new(CsvEmitter::new()),
        OutputFormat::Pdf => Box::new(PdfEmitter::new(layout.clone(), cover)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    Created,
    Began,
    Finished,
}

impl Lifecycle {
    pub(crate) fn begin(&mut self, emitter: &str) {
        match *self {
            Lifecycle::Created => *self = Lifecycle::Began,
            other => panic!("{emitter}: begin() called while {other:?}"),
        }
    }

    pub(crate) fn check_append(&self, emitter: &str) {
        if *self != Lifecycle::Began {
            panic!("{emitter}: append() called while {self:?}");
        }
    }

    pub(crate) fn finish(&mut self, emitter: &str) {
        match *self {
            Lifecycle::Began => *self = Lifecycle::Finished,
            other => panic!("{emitter}: finish() called while {other:?}"),
        }
    }
}

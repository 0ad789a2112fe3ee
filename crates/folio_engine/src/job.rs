use std::path::{Path, PathBuf};

use crate::collect::{check_root, CollectError};
use crate::OutputFormat;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Root(#[from] CollectError),
    #[error("output name is empty")]
    EmptyOutputName,
    #[error("output name {0:?} must be a plain file name, not a path")]
    OutputNameIsPath(String),
}

/// A validated request: an existing root folder, a plain output base name
/// and a target format. Consumed by a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    root: PathBuf,
    output_name: String,
    format: OutputFormat,
}

impl ConversionJob {
    pub fn new(
        root: impl AsRef<Path>,
        output_name: &str,
        format: OutputFormat,
    ) -> Result<Self, ValidationError> {
        let output_name = validate_output_name(output_name)?;
        let root = check_root(root.as_ref())?;
        Ok(Self {
            root,
            output_name,
            format,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// `<output name>.<extension>`
    pub fn output_file_name(&self) -> String {
        format!("{}.{}", self.output_name, self.format.extension())
    }

    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.output_file_name())
    }
}

fn validate_output_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyOutputName);
    }
    let is_path = name.contains(['/', '\\', '\0']) || name == "." || name == "..";
    if is_path {
        return Err(ValidationError::OutputNameIsPath(name.to_string()));
    }
    Ok(name.to_string())
}

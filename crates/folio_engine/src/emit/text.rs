use std::path::{Path, PathBuf};

use super::{Cover, EmitError, Emitter, Lifecycle};
use crate::persist::persist_artifact;

const SEPARATOR_PREFIX: &str = "===== ";
const SEPARATOR_SUFFIX: &str = " bytes) =====";
const TREE_HEADING: &str = "# Project tree";

/// The line that opens every file block: `===== <label> (<len> bytes) =====`.
///
/// Carrying the byte length makes the block boundary unambiguous even when
/// the content itself contains separator-like lines. Backslashes and line
/// breaks in the label are escaped (`\\`, `\n`, `\r`) so the separator
/// stays on one line.
pub fn separator_line(label: &str, len: usize) -> String {
    format!(
        "{SEPARATOR_PREFIX}{} ({len}{SEPARATOR_SUFFIX}",
        escape_label(label)
    )
}

fn escape_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn unescape_label(raw: &str) -> Option<String> {
    let mut label = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            label.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => label.push('\\'),
            'n' => label.push('\n'),
            'r' => label.push('\r'),
            _ => return None,
        }
    }
    Some(label)
}

/// Plain UTF-8 concatenation of every file, each preceded by a separator line.
pub struct TextEmitter {
    cover: Option<Cover>,
    buffer: String,
    state: Lifecycle,
    units: usize,
}

impl TextEmitter {
    pub fn new(cover: Option<Cover>) -> Self {
        Self {
            cover,
            buffer: String::new(),
            state: Lifecycle::Created,
            units: 0,
        }
    }
}

impl Emitter for TextEmitter {
    fn begin(&mut self) -> Result<(), EmitError> {
        self.state.begin("TextEmitter");
        if let Some(cover) = &self.cover {
            self.buffer.push_str(TREE_HEADING);
            self.buffer.push('\n');
            self.buffer.push_str(&cover.title);
            self.buffer.push('\n');
            for line in &cover.tree {
                self.buffer.push_str(line);
                self.buffer.push('\n');
            }
            self.buffer.push('\n');
        }
        Ok(())
    }

    fn append(&mut self, label: &str, content: &str) -> Result<(), EmitError> {
        self.state.check_append("TextEmitter");
        self.buffer.push_str(&separator_line(label, content.len()));
        self.buffer.push('\n');
        self.buffer.push_str(content);
        self.buffer.push('\n');
        self.units += 1;
        Ok(())
    }

    fn finish(&mut self, output: &Path) -> Result<PathBuf, EmitError> {
        self.state.finish("TextEmitter");
        Ok(persist_artifact(output, self.buffer.as_bytes())?)
    }

    fn units(&self) -> usize {
        self.units
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextArtifactError {
    #[error("malformed separator at byte {offset}")]
    MalformedSeparator { offset: usize },
    #[error("content of {label:?} is truncated")]
    Truncated { label: String },
}

/// Recover the `(label, content)` pairs of a text artifact, skipping any
/// tree preamble before the first separator.
pub fn split_text_artifact(text: &str) -> Result<Vec<(String, String)>, TextArtifactError> {
    let mut pos = match first_separator(text) {
        Some(pos) => pos,
        None => return Ok(Vec::new()),
    };

    let mut blocks = Vec::new();
    while pos < text.len() {
        let line_end = text[pos..]
            .find('\n')
            .map(|i| pos + i)
            .ok_or(TextArtifactError::MalformedSeparator { offset: pos })?;
        let (label, len) = parse_separator(&text[pos..line_end])
            .ok_or(TextArtifactError::MalformedSeparator { offset: pos })?;

        let start = line_end + 1;
        let end = start + len;
        let content = text
            .get(start..end)
            .ok_or_else(|| TextArtifactError::Truncated {
                label: label.clone(),
            })?;
        if text.as_bytes().get(end) != Some(&b'\n') {
            return Err(TextArtifactError::Truncated { label });
        }
        blocks.push((label, content.to_string()));
        pos = end + 1;
    }
    Ok(blocks)
}

fn first_separator(text: &str) -> Option<usize> {
    if text.starts_with(SEPARATOR_PREFIX) {
        return Some(0);
    }
    text.find(&format!("\n{SEPARATOR_PREFIX}")).map(|i| i + 1)
}

fn parse_separator(line: &str) -> Option<(String, usize)> {
    let inner = line
        .strip_prefix(SEPARATOR_PREFIX)?
        .strip_suffix(SEPARATOR_SUFFIX)?;
    let (label, len) = inner.rsplit_once(" (")?;
    Some((unescape_label(label)?, len.parse().ok()?))
}

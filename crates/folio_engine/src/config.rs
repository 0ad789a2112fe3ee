use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::collect::CollectOptions;
use crate::decode::FallbackEncoding;
use crate::emit::PdfLayout;

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Where artifacts are written; the process working directory by default.
    pub output_dir: PathBuf,
    pub encodings: Vec<FallbackEncoding>,
    pub collect: CollectOptions,
    /// Prepend the project tree (text and PDF artifacts only).
    pub include_tree: bool,
    pub pdf: PdfLayout,
}

impl ConverterConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            encodings: FallbackEncoding::default_chain(),
            collect: CollectOptions::default(),
            include_tree: false,
            pdf: PdfLayout::default(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::default_with_output(cwd)
    }
}

/// Ready-made ignore lists for common project layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnorePreset {
    General,
    Web,
    Python,
    Aggressive,
}

impl IgnorePreset {
    pub const ALL: [IgnorePreset; 4] = [
        IgnorePreset::General,
        IgnorePreset::Web,
        IgnorePreset::Python,
        IgnorePreset::Aggressive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IgnorePreset::General => "general",
            IgnorePreset::Web => "web",
            IgnorePreset::Python => "python",
            IgnorePreset::Aggressive => "aggressive",
        }
    }

    pub fn patterns(self) -> Vec<String> {
        let raw: &[&str] = match self {
            IgnorePreset::General => &[
                "node_modules", ".git", ".svn", ".hg", ".idea", ".vscode", ".DS_Store",
                "thumbs.db", "__pycache__",
            ],
            IgnorePreset::Web => &[
                "node_modules", ".git", ".vscode", "dist", "build", "coverage", ".next", ".nuxt",
                "package-lock.json", "yarn.lock", ".DS_Store",
            ],
            IgnorePreset::Python => &[
                "__pycache__", "venv", ".venv", "env", ".git", ".vscode", "*.pyc", "*.pyd",
                "poetry.lock", ".ipynb_checkpoints", "site-packages",
            ],
            IgnorePreset::Aggressive => &[
                "node_modules", "venv", ".git", "dist", "build", "*.lock", "*.json", "*.svg",
                "*.png", "*.jpg", "*.pdf", "*.zip", "test", "tests", "docs", "assets",
            ],
        };
        raw.iter().map(|p| p.to_string()).collect()
    }
}

impl fmt::Display for IgnorePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ignore preset {0:?} (expected general, web, python or aggressive)")]
pub struct UnknownPreset(pub String);

impl FromStr for IgnorePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IgnorePreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Split a comma separated pattern list, dropping blanks.
pub fn parse_patterns(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

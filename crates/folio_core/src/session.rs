use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("dark"),
            Theme::Light => f.write_str("light"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Txt,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Txt => "txt",
            OutputFormat::Csv => "csv",
        }
    }

    /// Accepts `pdf`, `.PDF` and the like.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(OutputFormat::Pdf),
            "txt" => Some(OutputFormat::Txt),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

/// Explicit per-session settings handed to the shell at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub theme: Theme,
    pub last_folder: Option<String>,
    pub output_name: String,
    pub format: Option<OutputFormat>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            last_folder: None,
            output_name: "listing".to_string(),
            format: Some(OutputFormat::Txt),
        }
    }
}

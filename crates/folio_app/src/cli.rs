use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use folio_core::{OutputFormat, SessionConfig, Theme};
use folio_engine::{
    parse_patterns, ConverterConfig, ExtensionFilter, FallbackEncoding, IgnorePreset,
};
use folio_logging::LogDestination;
use log::LevelFilter;

use crate::platform::RunMode;

/// Concatenate every file under a folder into one PDF, TXT or CSV document.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
pub struct Cli {
    /// Folder to convert; can also be chosen in the shell.
    #[arg(short, long)]
    pub folder: Option<PathBuf>,

    /// Output base name, without extension or directories.
    #[arg(short, long, default_value = "listing")]
    pub name: String,

    /// Output format.
    #[arg(short = 't', long, value_enum, default_value_t = FormatArg::Txt)]
    pub format: FormatArg,

    /// Colour theme of the shell.
    #[arg(long, value_enum, default_value_t = ThemeArg::Dark)]
    pub theme: ThemeArg,

    /// Wildcard patterns to skip, comma separated (e.g. "target,*.lock").
    #[arg(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Add a ready-made ignore list: general, web, python or aggressive.
    #[arg(long)]
    pub preset: Vec<IgnorePreset>,

    /// Extensions to keep, comma separated; prefix with '!' to exclude.
    #[arg(long, default_value = "*")]
    pub ext: String,

    /// Decoding fallback chain tried after BOM sniffing, e.g. "utf-8,windows-1252" or "auto".
    #[arg(long = "encoding", value_delimiter = ',')]
    pub encodings: Vec<FallbackEncoding>,

    /// Convert only these files or folders (relative to the folder, or absolute), comma separated.
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<PathBuf>,

    /// With --only, still list unselected files in the project tree.
    #[arg(long)]
    pub ghosts: bool,

    /// Prepend a project tree to TXT and PDF output.
    #[arg(long)]
    pub tree: bool,

    /// Directory the artifact is written to (default: current directory).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Convert immediately and exit instead of opening the shell.
    #[arg(long)]
    pub run: bool,

    /// Log to the terminal as well as folio.log, at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Pdf,
    Txt,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Txt => OutputFormat::Txt,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

impl Cli {
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            theme: self.theme.into(),
            last_folder: self.folder.as_ref().map(|path| path.display().to_string()),
            output_name: self.name.clone(),
            format: Some(self.format.into()),
        }
    }

    pub fn converter_config(&self) -> Result<ConverterConfig> {
        let output_dir = match &self.output_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("cannot determine the current directory")?,
        };
        let mut config = ConverterConfig::default_with_output(output_dir);
        if !self.encodings.is_empty() {
            config.encodings = self.encodings.clone();
        }
        for preset in &self.preset {
            config.collect.ignore.extend(preset.patterns());
        }
        for raw in &self.ignore {
            config.collect.ignore.extend(parse_patterns(raw));
        }
        let mut seen = HashSet::new();
        config.collect.ignore.retain(|pattern| seen.insert(pattern.clone()));
        config.collect.extensions = ExtensionFilter::parse(&self.ext);
        config.collect.select = self.only.clone();
        config.collect.include_ghosts = self.ghosts;
        config.include_tree = self.tree;
        Ok(config)
    }

    pub fn mode(&self) -> RunMode {
        if self.run {
            RunMode::Once
        } else {
            RunMode::Interactive
        }
    }

    pub fn log_settings(&self) -> (LogDestination, LevelFilter) {
        if self.verbose {
            (LogDestination::Both, LevelFilter::Debug)
        } else {
            (LogDestination::File, LevelFilter::Info)
        }
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from("folio.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("folio").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn defaults_match_session_defaults() {
        let cli = parse(&[]);
        let session = cli.session();
        assert_eq!(session, SessionConfig::default());
        assert_eq!(cli.mode(), RunMode::Interactive);
        assert_eq!(cli.log_settings().0, LogDestination::File);
    }

    #[test]
    fn flags_flow_into_the_converter_config() {
        let cli = parse(&[
            "--folder",
            "/work/project",
            "--format",
            "csv",
            "--preset",
            "python",
            "--ignore",
            "target,*.lock",
            "--ext",
            ".rs,!lock",
            "--encoding",
            "utf-8,auto",
            "--output-dir",
            "/tmp/out",
            "--tree",
            "--only",
            "src,README.md",
            "--ghosts",
            "--run",
        ]);
        let config = cli.converter_config().expect("config");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(config.collect.ignore.iter().any(|p| p == "__pycache__"));
        assert!(config.collect.ignore.iter().any(|p| p == "target"));
        assert!(config.collect.ignore.iter().any(|p| p == "*.lock"));
        assert!(!config.collect.extensions.is_all());
        assert_eq!(
            config.encodings,
            vec![FallbackEncoding::Utf8, FallbackEncoding::Detect]
        );
        assert!(config.include_tree);
        assert_eq!(
            config.collect.select,
            vec![PathBuf::from("src"), PathBuf::from("README.md")]
        );
        assert!(config.collect.include_ghosts);
        assert_eq!(cli.mode(), RunMode::Once);
        assert_eq!(cli.session().format, Some(OutputFormat::Csv));
        assert_eq!(
            cli.session().last_folder.as_deref(),
            Some("/work/project")
        );
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let result = Cli::try_parse_from(["folio", "--preset", "cobol"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_logs_to_both_sinks() {
        let cli = parse(&["-v"]);
        assert_eq!(cli.log_settings(), (LogDestination::Both, LevelFilter::Debug));
    }
}

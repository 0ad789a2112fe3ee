use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use folio_engine::{
    convert, split_text_artifact, ConversionRequest, ConverterConfig, ConvertError, EngineEvent,
    ExtensionFilter, FailureKind, FallbackEncoding, JobProgress, OutputFormat, ProgressSink,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn progress(&self) -> Vec<JobProgress> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Progress(progress) => Some(progress.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Deletes `target` as soon as progress for `label` is reported, i.e. after
/// collection and before the file is decoded.
struct DeletingSink {
    label: &'static str,
    target: PathBuf,
}

impl ProgressSink for DeletingSink {
    fn emit(&self, event: EngineEvent) {
        if let EngineEvent::Progress(progress) = &event {
            if progress.label == self.label {
                fs::remove_file(&self.target).unwrap();
            }
        }
    }
}

struct Fixture {
    source: TempDir,
    output: TempDir,
}

impl Fixture {
    fn new() -> Self {
        folio_logging::initialize_for_tests();
        Self {
            source: TempDir::new().unwrap(),
            output: TempDir::new().unwrap(),
        }
    }

    fn write(&self, relative: &str, bytes: &[u8]) {
        let path = self.source.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    fn config(&self) -> ConverterConfig {
        ConverterConfig::default_with_output(self.output.path().to_path_buf())
    }

    fn request(&self, name: &str, format: OutputFormat) -> ConversionRequest {
        ConversionRequest {
            root: self.source.path().to_path_buf(),
            output_name: name.to_string(),
            format,
        }
    }
}

fn read_csv(path: &Path) -> Vec<(String, String)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|record| {
            let record = record.unwrap();
            (record[0].to_string(), record[1].to_string())
        })
        .collect()
}

#[test]
fn csv_scenario_keeps_unreadable_files_as_placeholder_rows() {
    let fx = Fixture::new();
    fx.write("a.txt", b"hello");
    fx.write("b.txt", "wörld".as_bytes());
    fx.write("c.bin", &[0x80, 0x81, 0xC3, 0x28]);

    let mut config = fx.config();
    config.encodings = vec![FallbackEncoding::Utf8];
    let sink = TestSink::default();
    let outcome = convert(1, &fx.request("out", OutputFormat::Csv), &config, &sink).unwrap();

    assert_eq!(outcome.output_path, fx.output.path().join("out.csv"));
    assert_eq!(outcome.files_processed, 3);
    assert_eq!(outcome.placeholders, 1);

    let rows = read_csv(&outcome.output_path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], ("a.txt".to_string(), "hello".to_string()));
    assert_eq!(rows[1], ("b.txt".to_string(), "wörld".to_string()));
    assert_eq!(rows[2].0, "c.bin");
    assert!(rows[2].1.starts_with("<error: c.bin"), "{}", rows[2].1);
}

#[test]
fn csv_round_trip_preserves_delimiters_quotes_and_newlines() {
    let fx = Fixture::new();
    let tricky = [
        ("1_commas.txt", "a,b,,c"),
        ("2_quotes.txt", "she said \"hi\"\n\"\""),
        ("3_newlines.txt", "line one\r\nline two\n\nend\n"),
        ("4_empty.txt", ""),
    ];
    for (name, content) in tricky {
        fx.write(name, content.as_bytes());
    }

    let outcome = convert(
        1,
        &fx.request("round", OutputFormat::Csv),
        &fx.config(),
        &TestSink::default(),
    )
    .unwrap();

    let expected: Vec<(String, String)> = tricky
        .iter()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect();
    assert_eq!(read_csv(&outcome.output_path), expected);
}

#[test]
fn text_round_trip_recovers_labels_and_boundaries() {
    let fx = Fixture::new();
    fx.write("a.txt", b"hello");
    // Content that imitates a separator must not split the block.
    fx.write("b/fake.txt", b"===== x.txt (3 bytes) =====\nabc\n");
    fx.write("c.txt", b"no trailing newline");

    let outcome = convert(
        7,
        &fx.request("out", OutputFormat::Txt),
        &fx.config(),
        &TestSink::default(),
    )
    .unwrap();

    let text = fs::read_to_string(&outcome.output_path).unwrap();
    assert_eq!(
        split_text_artifact(&text).unwrap(),
        vec![
            ("a.txt".to_string(), "hello".to_string()),
            (
                "b/fake.txt".to_string(),
                "===== x.txt (3 bytes) =====\nabc\n".to_string()
            ),
            ("c.txt".to_string(), "no trailing newline".to_string()),
        ]
    );
}

#[test]
fn text_tree_preamble_is_skipped_when_splitting() {
    let fx = Fixture::new();
    fx.write("src/main.rs", b"fn main() {}\n");
    fx.write("README.md", b"# readme\n");

    let mut config = fx.config();
    config.include_tree = true;
    let outcome = convert(
        1,
        &fx.request("tree", OutputFormat::Txt),
        &config,
        &TestSink::default(),
    )
    .unwrap();

    let text = fs::read_to_string(&outcome.output_path).unwrap();
    assert!(text.starts_with("# Project tree\n"));
    assert!(text.contains("\n[src]/\n    - main.rs\n"));
    let labels: Vec<String> = split_text_artifact(&text)
        .unwrap()
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(labels, vec!["README.md", "src/main.rs"]);
}

#[test]
fn empty_folder_succeeds_with_empty_text_artifact() {
    let fx = Fixture::new();
    let sink = TestSink::default();

    let outcome = convert(1, &fx.request("out", OutputFormat::Txt), &fx.config(), &sink).unwrap();

    assert_eq!(outcome.files_processed, 0);
    assert_eq!(fs::read_to_string(&outcome.output_path).unwrap(), "");
    assert!(sink.progress().is_empty());
}

#[test]
fn invalid_root_fails_before_any_output_exists() {
    let fx = Fixture::new();
    let request = ConversionRequest {
        root: fx.source.path().join("missing"),
        output_name: "out".to_string(),
        format: OutputFormat::Pdf,
    };

    let err = convert(1, &request, &fx.config(), &TestSink::default()).unwrap_err();

    assert!(matches!(err, ConvertError::Validation(_)));
    assert_eq!(err.to_failure().kind, FailureKind::RootNotFound);
    assert_eq!(fs::read_dir(fx.output.path()).unwrap().count(), 0);
}

#[test]
fn path_like_output_name_is_invalid_input() {
    let fx = Fixture::new();
    let err = convert(
        1,
        &fx.request("../escape", OutputFormat::Txt),
        &fx.config(),
        &TestSink::default(),
    )
    .unwrap_err();
    assert_eq!(err.to_failure().kind, FailureKind::InvalidInput);
    assert_eq!(fs::read_dir(fx.output.path()).unwrap().count(), 0);
}

#[test]
fn progress_reports_every_file_in_order() {
    let fx = Fixture::new();
    fx.write("a.txt", b"1");
    fx.write("b.txt", b"2");
    fx.write("c/d.txt", b"3");
    let sink = TestSink::default();

    convert(9, &fx.request("out", OutputFormat::Txt), &fx.config(), &sink).unwrap();

    let progress = sink.progress();
    let seen: Vec<(usize, usize, &str)> = progress
        .iter()
        .map(|p| (p.index, p.total, p.label.as_str()))
        .collect();
    assert_eq!(seen, vec![(1, 3, "a.txt"), (2, 3, "b.txt"), (3, 3, "c/d.txt")]);
    assert!(progress.iter().all(|p| p.job_id == 9));
}

#[test]
fn pdf_artifact_is_a_complete_document() {
    let fx = Fixture::new();
    fx.write("a.txt", b"hello");
    fx.write("b.txt", "wörld → λ".as_bytes());

    let outcome = convert(
        1,
        &fx.request("out", OutputFormat::Pdf),
        &fx.config(),
        &TestSink::default(),
    )
    .unwrap();

    assert_eq!(outcome.files_processed, 2);
    let bytes = fs::read(&outcome.output_path).unwrap();
    assert_eq!(&bytes[0..4], b"%PDF");
    let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(32)..]).to_string();
    assert!(tail.contains("%%EOF"), "{tail}");
}

#[test]
fn existing_artifact_is_overwritten() {
    let fx = Fixture::new();
    fx.write("a.txt", b"new");
    fs::write(fx.output.path().join("out.txt"), "old contents").unwrap();

    let outcome = convert(
        1,
        &fx.request("out", OutputFormat::Txt),
        &fx.config(),
        &TestSink::default(),
    )
    .unwrap();

    let text = fs::read_to_string(outcome.output_path).unwrap();
    assert!(!text.contains("old contents"));
    assert!(text.contains("new"));
}

#[test]
fn file_vanishing_after_collection_becomes_a_placeholder() {
    let fx = Fixture::new();
    fx.write("a.txt", b"alpha");
    fx.write("b.txt", b"beta");
    fx.write("c.txt", b"gamma");
    let sink = DeletingSink {
        label: "b.txt",
        target: fx.source.path().join("b.txt"),
    };

    let outcome = convert(1, &fx.request("out", OutputFormat::Csv), &fx.config(), &sink).unwrap();

    assert_eq!(outcome.files_processed, 3);
    assert_eq!(outcome.placeholders, 1);
    let rows = read_csv(&outcome.output_path);
    assert_eq!(rows[0], ("a.txt".to_string(), "alpha".to_string()));
    assert_eq!(rows[1].0, "b.txt");
    assert!(rows[1].1.starts_with("<error: b.txt: "), "{}", rows[1].1);
    assert_eq!(rows[2], ("c.txt".to_string(), "gamma".to_string()));
}

#[cfg(unix)]
#[test]
fn line_break_in_file_name_survives_text_round_trip() {
    let fx = Fixture::new();
    fx.write("a\nb.txt", b"odd name");
    fx.write("z.txt", b"last");

    let outcome = convert(
        1,
        &fx.request("out", OutputFormat::Txt),
        &fx.config(),
        &TestSink::default(),
    )
    .unwrap();

    let text = fs::read_to_string(&outcome.output_path).unwrap();
    assert_eq!(
        split_text_artifact(&text).unwrap(),
        vec![
            ("a\nb.txt".to_string(), "odd name".to_string()),
            ("z.txt".to_string(), "last".to_string()),
        ]
    );
}

#[test]
fn ghost_files_are_listed_in_the_tree_without_content() {
    let fx = Fixture::new();
    fx.write("src/lib.rs", b"pub fn lib() {}\n");
    fx.write("docs/guide.md", b"# guide\n");
    fx.write("logo.png", b"png");

    let mut config = fx.config();
    config.include_tree = true;
    config.collect.select = vec![PathBuf::from("src"), PathBuf::from("logo.png")];
    config.collect.include_ghosts = true;
    config.collect.extensions = ExtensionFilter::parse("!png");
    let sink = TestSink::default();

    let outcome = convert(1, &fx.request("out", OutputFormat::Txt), &config, &sink).unwrap();

    assert_eq!(outcome.files_processed, 1);
    assert_eq!(sink.progress().len(), 1);
    let text = fs::read_to_string(&outcome.output_path).unwrap();
    assert!(text.contains("\n[docs]/\n    - guide.md\n"), "{text}");
    assert!(text.contains("\n- logo.png\n"), "{text}");
    let labels: Vec<String> = split_text_artifact(&text)
        .unwrap()
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(labels, vec!["src/lib.rs"]);
}

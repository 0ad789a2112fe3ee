use std::fs;
use std::time::Duration;

use folio_engine::{
    ConversionRequest, ConverterConfig, EngineEvent, EngineHandle, FailureKind, OutputFormat,
};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(10);

#[test]
fn worker_reports_progress_then_exactly_one_completion() {
    let source = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(source.path().join("a.txt"), "a").unwrap();
    fs::write(source.path().join("b.txt"), "b").unwrap();

    let (engine, events) =
        EngineHandle::spawn(ConverterConfig::default_with_output(output.path().to_path_buf()));
    engine.submit(
        3,
        ConversionRequest {
            root: source.path().to_path_buf(),
            output_name: "merged".to_string(),
            format: OutputFormat::Txt,
        },
    );

    let mut progress = 0;
    let outcome = loop {
        match events.recv_timeout(WAIT).expect("engine event") {
            EngineEvent::Progress(p) => {
                assert_eq!(p.job_id, 3);
                progress += 1;
            }
            EngineEvent::JobCompleted { job_id, result } => {
                assert_eq!(job_id, 3);
                break result.expect("job succeeds");
            }
        }
    };

    assert_eq!(progress, 2);
    assert_eq!(outcome.files_processed, 2);
    assert_eq!(outcome.output_path, output.path().join("merged.txt"));
    assert!(events.try_recv().is_none());
}

#[test]
fn worker_reports_validation_failure() {
    let output = TempDir::new().unwrap();
    let (engine, events) =
        EngineHandle::spawn(ConverterConfig::default_with_output(output.path().to_path_buf()));
    engine.submit(
        1,
        ConversionRequest {
            root: output.path().join("missing"),
            output_name: "x".to_string(),
            format: OutputFormat::Csv,
        },
    );

    match events.recv_timeout(WAIT).expect("engine event") {
        EngineEvent::JobCompleted { result, .. } => {
            let failure = result.unwrap_err();
            assert_eq!(failure.kind, FailureKind::RootNotFound);
            assert!(failure.message.contains("missing"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

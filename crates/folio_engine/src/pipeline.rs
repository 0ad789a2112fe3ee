use std::path::PathBuf;
use std::sync::mpsc;

use folio_logging::{folio_debug, folio_info, folio_warn};

use crate::collect::{collect_files, CollectError, FileEntry};
use crate::decode::Decoder;
use crate::emit::{create_emitter, Cover, EmitError};
use crate::job::{ConversionJob, ValidationError};
use crate::tree::tree_lines;
use crate::{
    ConverterConfig, EngineEvent, FailureKind, JobFailure, JobId, JobOutcome, JobProgress,
    OutputFormat,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Unvalidated job input as it arrives from the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub root: PathBuf,
    pub output_name: String,
    pub format: OutputFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error("failed to write artifact: {0}")]
    Emit(#[from] EmitError),
}

impl ConvertError {
    pub fn to_failure(&self) -> JobFailure {
        let kind = match self {
            ConvertError::Validation(ValidationError::Root(_)) | ConvertError::Collect(_) => {
                FailureKind::RootNotFound
            }
            ConvertError::Validation(_) => FailureKind::InvalidInput,
            ConvertError::Emit(EmitError::Pdf(_)) => FailureKind::Render,
            ConvertError::Emit(_) => FailureKind::Io,
        };
        JobFailure::new(kind, self.to_string())
    }
}

/// Validate `request` and run it. Validation failures never touch the output directory.
pub fn convert(
    job_id: JobId,
    request: &ConversionRequest,
    config: &ConverterConfig,
    sink: &dyn ProgressSink,
) -> Result<JobOutcome, ConvertError> {
    let job = ConversionJob::new(&request.root, &request.output_name, request.format)?;
    run_conversion(job_id, &job, config, sink)
}

/// Collect, decode and emit every file of `job`, strictly one at a time.
///
/// Unreadable files become placeholders and never abort the run; only
/// collection of the root and writing the artifact are fatal.
pub fn run_conversion(
    job_id: JobId,
    job: &ConversionJob,
    config: &ConverterConfig,
    sink: &dyn ProgressSink,
) -> Result<JobOutcome, ConvertError> {
    let output_path = job.output_path(&config.output_dir);
    folio_info!(
        "Job {} started: root={:?} format={} output={:?}",
        job_id,
        job.root(),
        job.format(),
        output_path
    );

    let mut walk = collect_files(job.root(), config.collect.clone())?;
    let entries: Vec<FileEntry> = walk.by_ref().collect();
    if walk.skipped_errors() > 0 {
        folio_warn!(
            "Job {}: {} entries could not be listed and were skipped",
            job_id,
            walk.skipped_errors()
        );
    }
    let tree = config.include_tree.then(|| {
        let labels: Vec<String> = entries.iter().map(FileEntry::label).collect();
        tree_lines(labels.iter().map(String::as_str))
    });
    let entries: Vec<FileEntry> = entries.into_iter().filter(|e| !e.is_ghost()).collect();
    let total = entries.len();
    folio_debug!("Job {}: {} files collected", job_id, total);

    let labels: Vec<String> = entries.iter().map(FileEntry::label).collect();
    let cover = tree.map(|tree| Cover {
        title: job.root().display().to_string(),
        tree,
    });

    let decoder = Decoder::new(config.encodings.clone());
    let mut emitter = create_emitter(job.format(), cover, &config.pdf);
    emitter.begin()?;

    let mut placeholders = 0;
    for (index, (entry, label)) in entries.iter().zip(&labels).enumerate() {
        sink.emit(EngineEvent::Progress(JobProgress {
            job_id,
            index: index + 1,
            total,
            label: label.clone(),
        }));
        let content = decoder.decode_file(entry.path(), label);
        if content.is_placeholder() {
            placeholders += 1;
        }
        emitter.append(label, content.as_str())?;
    }

    let output_path = emitter.finish(&output_path)?;
    folio_info!(
        "Job {} finished: {} files ({} placeholders) -> {:?}",
        job_id,
        emitter.units(),
        placeholders,
        output_path
    );
    Ok(JobOutcome {
        output_path,
        files_processed: emitter.units(),
        placeholders,
    })
}

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use folio_core::{ConversionRequest, Effect, JobResult, Msg, OutputFormat};
use folio_engine::{ConverterConfig, EngineEvent, EngineEvents, EngineHandle};
use folio_logging::{folio_debug, folio_info, folio_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: ConverterConfig, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (engine, events) = EngineHandle::spawn(config);
        spawn_event_loop(events, msg_tx);
        Self { engine }
    }

    /// Runs the effects that need the engine; the shell handles the rest.
    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartConversion { job_id, request } => {
                    folio_info!(
                        "StartConversion job_id={} folder={} name={} format={}",
                        job_id,
                        request.folder,
                        request.output_name,
                        request.format
                    );
                    self.engine.submit(job_id, map_request(request));
                }
                other => folio_debug!("Effect {:?} is not for the engine", other),
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::JobProgress {
            job_id: progress.job_id,
            index: progress.index,
            total: progress.total,
            label: progress.label,
        },
        EngineEvent::JobCompleted { job_id, result } => Msg::JobDone {
            job_id,
            result: match result {
                Ok(outcome) => JobResult::Success {
                    output_path: outcome.output_path.display().to_string(),
                    files: outcome.files_processed,
                    placeholders: outcome.placeholders,
                },
                Err(failure) => {
                    folio_warn!("Job {} failed: {}", job_id, failure);
                    JobResult::Failed {
                        message: failure.to_string(),
                    }
                }
            },
        },
    }
}

fn map_request(request: ConversionRequest) -> folio_engine::ConversionRequest {
    folio_engine::ConversionRequest {
        root: PathBuf::from(request.folder),
        output_name: request.output_name,
        format: map_format(request.format),
    }
}

fn map_format(format: OutputFormat) -> folio_engine::OutputFormat {
    match format {
        OutputFormat::Pdf => folio_engine::OutputFormat::Pdf,
        OutputFormat::Txt => folio_engine::OutputFormat::Txt,
        OutputFormat::Csv => folio_engine::OutputFormat::Csv,
    }
}

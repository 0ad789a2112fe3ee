use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use folio_logging::folio_error;

use crate::pipeline::{convert, ChannelProgressSink, ConversionRequest, ProgressSink};
use crate::{ConverterConfig, EngineEvent, JobId};

enum EngineCommand {
    Convert {
        job_id: JobId,
        request: ConversionRequest,
    },
}

/// Submits jobs to the single background worker.
///
/// Jobs run one after another; nothing inside the pipeline is shared
/// between threads.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving side of the worker's progress and completion events.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn spawn(config: ConverterConfig) -> (Self, EngineEvents) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let sink = ChannelProgressSink::new(event_tx);
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&config, command, &sink);
            }
        });

        (Self { cmd_tx }, EngineEvents { event_rx })
    }

    pub fn submit(&self, job_id: JobId, request: ConversionRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Convert { job_id, request });
    }
}

impl EngineEvents {
    /// Blocks for the next event; `None` once the worker is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn handle_command(config: &ConverterConfig, command: EngineCommand, sink: &dyn ProgressSink) {
    match command {
        EngineCommand::Convert { job_id, request } => {
            let result = convert(job_id, &request, config, sink).map_err(|err| {
                folio_error!("Job {} failed: {}", job_id, err);
                err.to_failure()
            });
            sink.emit(EngineEvent::JobCompleted { job_id, result });
        }
    }
}

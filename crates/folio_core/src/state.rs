use std::collections::VecDeque;

use crate::view_model::{AppViewModel, ProgressView};
use crate::{JobResult, OutputFormat, SessionConfig, Theme};

pub type JobId = u64;

/// Activity lines kept for the view; older ones are dropped.
pub const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Running {
        job_id: JobId,
        processed: usize,
        total: usize,
        current: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// One user-facing message; the latest one replaces the previous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    folder: String,
    output_name: String,
    format: Option<OutputFormat>,
    theme: Theme,
    phase: JobPhase,
    next_job_id: JobId,
    notice: Option<Notice>,
    log: VecDeque<String>,
    log_dropped: usize,
    last_output: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_session(SessionConfig::default())
    }

    pub fn with_session(session: SessionConfig) -> Self {
        Self {
            folder: session.last_folder.unwrap_or_default(),
            output_name: session.output_name,
            format: session.format,
            theme: session.theme,
            next_job_id: 1,
            dirty: true,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let progress = match &self.phase {
            JobPhase::Idle => None,
            JobPhase::Running {
                job_id,
                processed,
                total,
                current,
            } => Some(ProgressView {
                job_id: *job_id,
                processed: *processed,
                total: *total,
                current: current.clone(),
            }),
        };
        AppViewModel {
            folder: self.folder.clone(),
            output_name: self.output_name.clone(),
            format: self.format,
            theme: self.theme,
            running: self.is_running(),
            progress,
            notice: self.notice.clone(),
            log: self.log.iter().cloned().collect(),
            log_start: self.log_dropped,
            last_output: self.last_output.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn phase(&self) -> &JobPhase {
        &self.phase
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, JobPhase::Running { .. })
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Current settings, in the shape the shell was started with.
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            theme: self.theme,
            last_folder: (!self.folder.is_empty()).then(|| self.folder.clone()),
            output_name: self.output_name.clone(),
            format: self.format,
        }
    }

    pub(crate) fn folder(&self) -> &str {
        &self.folder
    }

    pub(crate) fn output_name(&self) -> &str {
        &self.output_name
    }

    pub(crate) fn format(&self) -> Option<OutputFormat> {
        self.format
    }

    pub(crate) fn set_folder(&mut self, folder: String) {
        self.folder = folder;
        self.notice = None;
        self.mark_dirty();
    }

    pub(crate) fn set_output_name(&mut self, name: String) {
        self.output_name = name;
        self.mark_dirty();
    }

    pub(crate) fn set_format(&mut self, format: OutputFormat) {
        self.format = Some(format);
        self.mark_dirty();
    }

    pub(crate) fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.mark_dirty();
        self.theme
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn push_log(&mut self, line: impl Into<String>) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
            self.log_dropped += 1;
        }
        self.log.push_back(line.into());
        self.mark_dirty();
    }

    pub(crate) fn start_job(&mut self) -> JobId {
        let job_id = self.next_job_id;
        self.next_job_id += 1;
        self.phase = JobPhase::Running {
            job_id,
            processed: 0,
            total: 0,
            current: None,
        };
        self.notice = None;
        self.mark_dirty();
        job_id
    }

    pub(crate) fn apply_progress(&mut self, job_id: JobId, index: usize, total: usize, label: String) {
        if let JobPhase::Running {
            job_id: running,
            processed,
            total: known_total,
            current,
        } = &mut self.phase
        {
            if *running != job_id {
                return;
            }
            *processed = index;
            *known_total = total;
            *current = Some(label);
            self.dirty = true;
        }
    }

    pub(crate) fn apply_done(&mut self, job_id: JobId, result: JobResult) {
        match self.phase {
            JobPhase::Running {
                job_id: running, ..
            } if running == job_id => {}
            _ => return,
        }
        self.phase = JobPhase::Idle;
        match result {
            JobResult::Success {
                output_path,
                files,
                placeholders,
            } => {
                let summary = if placeholders == 0 {
                    format!("Created {output_path} from {files} files.")
                } else {
                    format!(
                        "Created {output_path} from {files} files ({placeholders} could not be read)."
                    )
                };
                self.last_output = Some(output_path);
                self.set_notice(Notice::info(summary));
            }
            JobResult::Failed { message } => {
                self.set_notice(Notice::error(message));
            }
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

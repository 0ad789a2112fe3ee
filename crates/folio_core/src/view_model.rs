use crate::{JobId, Notice, OutputFormat, Theme};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub folder: String,
    pub output_name: String,
    pub format: Option<OutputFormat>,
    pub theme: Theme,
    pub running: bool,
    pub progress: Option<ProgressView>,
    pub notice: Option<Notice>,
    /// The most recent activity lines, oldest first.
    pub log: Vec<String>,
    /// How many lines were dropped before `log[0]`.
    pub log_start: usize,
    pub last_output: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub job_id: JobId,
    pub processed: usize,
    pub total: usize,
    pub current: Option<String>,
}

impl ProgressView {
    /// Whole percent done; 0 until the first file is reported.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = self.processed.min(self.total) * 100 / self.total;
        u8::try_from(pct).unwrap_or(100)
    }
}

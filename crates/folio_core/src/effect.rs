use crate::{JobId, OutputFormat, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartConversion {
        job_id: JobId,
        request: ConversionRequest,
    },
    ApplyTheme(Theme),
    ShowStatus,
    Quit,
}

/// Input for one pipeline run, already checked for the obvious mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub folder: String,
    pub output_name: String,
    pub format: OutputFormat,
}

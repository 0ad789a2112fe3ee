#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a folder with the path picker or typed it.
    FolderChosen(String),
    /// A drag-and-drop payload resolved to a directory.
    FolderDropped(String),
    /// Something that is not a directory was dropped.
    DropRejected(String),
    /// User edited the output base name.
    OutputNameChanged(String),
    /// User picked an output format.
    FormatSelected(crate::OutputFormat),
    /// User flipped the dark/light switch.
    ThemeToggled,
    /// User clicked Convert.
    ConvertClicked,
    /// User asked for the current settings.
    StatusRequested,
    /// User closed the shell.
    QuitRequested,
    /// Engine progress for the running job.
    JobProgress {
        job_id: crate::JobId,
        index: usize,
        total: usize,
        label: String,
    },
    /// Engine completion for a job.
    JobDone {
        job_id: crate::JobId,
        result: JobResult,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    Success {
        output_path: String,
        files: usize,
        placeholders: usize,
    },
    Failed {
        message: String,
    },
}

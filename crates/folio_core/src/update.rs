use crate::{AppState, ConversionRequest, Effect, Msg, Notice};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FolderChosen(folder) => {
            state.push_log(format!("Folder selected: {folder}"));
            state.set_folder(folder);
            Vec::new()
        }
        Msg::FolderDropped(folder) => {
            state.push_log(format!("Folder dropped: {folder}"));
            state.set_folder(folder);
            Vec::new()
        }
        Msg::DropRejected(path) => {
            state.set_notice(Notice::warning(format!(
                "Only folders can be dropped: {path}"
            )));
            Vec::new()
        }
        Msg::OutputNameChanged(name) => {
            state.set_output_name(name);
            Vec::new()
        }
        Msg::FormatSelected(format) => {
            state.set_format(format);
            Vec::new()
        }
        Msg::ThemeToggled => {
            let theme = state.toggle_theme();
            vec![Effect::ApplyTheme(theme)]
        }
        Msg::ConvertClicked => {
            if state.is_running() {
                return (state, Vec::new());
            }
            match validate(&state) {
                Ok(request) => {
                    let job_id = state.start_job();
                    state.push_log(format!(
                        "Converting {} to {}.{} ({})",
                        request.folder,
                        request.output_name,
                        request.format.extension(),
                        request.format
                    ));
                    vec![Effect::StartConversion { job_id, request }]
                }
                Err(problem) => {
                    state.set_notice(Notice::error(problem));
                    Vec::new()
                }
            }
        }
        Msg::StatusRequested => vec![Effect::ShowStatus],
        Msg::QuitRequested => vec![Effect::Quit],
        Msg::JobProgress {
            job_id,
            index,
            total,
            label,
        } => {
            state.apply_progress(job_id, index, total, label);
            Vec::new()
        }
        Msg::JobDone { job_id, result } => {
            state.apply_done(job_id, result);
            Vec::new()
        }
    };

    (state, effects)
}

/// Catches the mistakes visible without touching the filesystem.
fn validate(state: &AppState) -> Result<ConversionRequest, String> {
    let folder = state.folder().trim();
    if folder.is_empty() {
        return Err("Select a project folder first.".to_string());
    }
    let name = state.output_name().trim();
    if name.is_empty() {
        return Err("Enter a name for the output file.".to_string());
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(format!(
            "Output name '{name}' must be a plain file name without directories."
        ));
    }
    let Some(format) = state.format() else {
        return Err("Choose an output format (PDF, TXT or CSV).".to_string());
    };
    Ok(ConversionRequest {
        folder: folder.to_string(),
        output_name: name.to_string(),
        format,
    })
}

use std::path::Path;

use folio_core::{parse_drop_payload, Msg, OutputFormat};

/// What a line typed into the shell asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Dispatch(Msg),
    Help,
    Invalid(String),
    Empty,
}

/// Parse one shell line. `is_dir` decides whether a dropped path is a folder.
pub fn parse_line(line: &str, is_dir: impl Fn(&Path) -> bool) -> ShellInput {
    let line = line.trim();
    if line.is_empty() {
        return ShellInput::Empty;
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "folder" | "cd" => match parse_drop_payload(rest) {
            Some(path) => ShellInput::Dispatch(Msg::FolderChosen(path)),
            None => ShellInput::Invalid("usage: folder <path>".to_string()),
        },
        "drop" => dropped(rest, &is_dir)
            .unwrap_or_else(|| ShellInput::Invalid("usage: drop <path>".to_string())),
        "name" => ShellInput::Dispatch(Msg::OutputNameChanged(rest.to_string())),
        "format" => match OutputFormat::parse(rest) {
            Some(format) => ShellInput::Dispatch(Msg::FormatSelected(format)),
            None => ShellInput::Invalid(format!("unknown format '{rest}', expected pdf, txt or csv")),
        },
        "theme" => ShellInput::Dispatch(Msg::ThemeToggled),
        "convert" | "run" => ShellInput::Dispatch(Msg::ConvertClicked),
        "status" => ShellInput::Dispatch(Msg::StatusRequested),
        "help" | "?" => ShellInput::Help,
        "quit" | "exit" => ShellInput::Dispatch(Msg::QuitRequested),
        _ => pasted_path(line, &is_dir).unwrap_or_else(|| {
            ShellInput::Invalid(format!("unknown command '{command}', type 'help'"))
        }),
    }
}

/// A path given to `drop` behaves like a drag-and-drop payload.
fn dropped(payload: &str, is_dir: &impl Fn(&Path) -> bool) -> Option<ShellInput> {
    let path = parse_drop_payload(payload)?;
    let msg = if is_dir(Path::new(&path)) {
        Msg::FolderDropped(path)
    } else {
        Msg::DropRejected(path)
    };
    Some(ShellInput::Dispatch(msg))
}

/// A bare pasted path counts as a drop only when something exists there.
fn pasted_path(line: &str, is_dir: &impl Fn(&Path) -> bool) -> Option<ShellInput> {
    let path = parse_drop_payload(line)?;
    if is_dir(Path::new(&path)) {
        Some(ShellInput::Dispatch(Msg::FolderDropped(path)))
    } else if Path::new(&path).exists() {
        Some(ShellInput::Dispatch(Msg::DropRejected(path)))
    } else {
        None
    }
}

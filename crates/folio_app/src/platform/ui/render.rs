use std::time::Duration;

use folio_core::{AppViewModel, Notice, NoticeKind, Theme};
use indicatif::{ProgressBar, ProgressStyle};

use super::constants::{BANNER, BAR_TICK_MS};

/// ANSI colour codes for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    accent: &'static str,
    spinner: &'static str,
    info: &'static str,
    warning: &'static str,
    error: &'static str,
    bar: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: "36",
                spinner: "cyan",
                info: "32",
                warning: "33",
                error: "31",
                bar: "green/238",
            },
            Theme::Light => Self {
                accent: "34",
                spinner: "blue",
                info: "34",
                warning: "35",
                error: "31",
                bar: "blue/250",
            },
        }
    }

    fn paint(code: &str, text: &str) -> String {
        format!("\x1b[{code}m{text}\x1b[0m")
    }

    fn notice(&self, notice: &Notice) -> String {
        let (code, tag) = match notice.kind {
            NoticeKind::Info => (self.info, "ok"),
            NoticeKind::Warning => (self.warning, "warning"),
            NoticeKind::Error => (self.error, "error"),
        };
        format!("{} {}", Self::paint(code, &format!("[{tag}]")), notice.text)
    }

    fn bar_style(&self) -> ProgressStyle {
        let template = format!(
            "{{spinner:.{spinner}}} [{{bar:40.{bar}}}] {{pos:>4}}/{{len}} {{wide_msg}}",
            spinner = self.spinner,
            bar = self.bar
        );
        ProgressStyle::with_template(&template).unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

/// Prints view changes to the terminal: new log lines, the latest notice
/// and a progress bar while a job runs.
pub struct Renderer {
    palette: Palette,
    bar: Option<ProgressBar>,
    log_seen: usize,
    last_notice: Option<Notice>,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            palette: Palette::for_theme(theme),
            bar: None,
            log_seen: 0,
            last_notice: None,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.palette = Palette::for_theme(theme);
        if let Some(bar) = &self.bar {
            bar.set_style(self.palette.bar_style());
        }
        self.line(Palette::paint(self.palette.accent, &format!("Theme: {theme}")));
    }

    pub fn print_banner(&self) {
        self.line(Palette::paint(self.palette.accent, BANNER));
    }

    pub fn print_status(&self, view: &AppViewModel) {
        for line in status_lines(view) {
            self.line(line);
        }
    }

    pub fn render(&mut self, view: &AppViewModel) {
        if view.progress.is_none() {
            if let Some(bar) = self.bar.take() {
                bar.finish_and_clear();
            }
        }

        for entry in unseen_log(view, self.log_seen) {
            self.line(Palette::paint(self.palette.accent, entry));
        }
        self.log_seen = view.log_start + view.log.len();

        if let Some(progress) = &view.progress {
            let palette = self.palette;
            let bar = self.bar.get_or_insert_with(|| {
                let bar = ProgressBar::new(0);
                bar.set_style(palette.bar_style());
                bar.enable_steady_tick(Duration::from_millis(BAR_TICK_MS));
                bar
            });
            bar.set_length(progress.total as u64);
            bar.set_position(progress.processed as u64);
            if let Some(current) = &progress.current {
                bar.set_message(current.clone());
            }
        }

        if view.notice != self.last_notice {
            if let Some(notice) = &view.notice {
                self.line(self.palette.notice(notice));
            }
            self.last_notice = view.notice.clone();
        }
    }

    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn line(&self, text: String) {
        match &self.bar {
            Some(bar) => bar.println(text),
            None => println!("{text}"),
        }
    }
}

/// Log lines past absolute position `seen`; lines already dropped from the
/// view are skipped.
fn unseen_log(view: &AppViewModel, seen: usize) -> &[String] {
    let skip = seen.saturating_sub(view.log_start).min(view.log.len());
    &view.log[skip..]
}

/// Plain-text summary of the current settings, one field per line.
pub fn status_lines(view: &AppViewModel) -> Vec<String> {
    let folder = if view.folder.is_empty() {
        "(none)"
    } else {
        view.folder.as_str()
    };
    let output = match view.format {
        Some(format) => format!("{}.{} ({format})", view.output_name.trim(), format.extension()),
        None => format!("{} (no format chosen)", view.output_name.trim()),
    };
    let state = match &view.progress {
        Some(progress) => format!(
            "converting {}/{} ({}%)",
            progress.processed,
            progress.total,
            progress.percent()
        ),
        None => "idle".to_string(),
    };
    let mut lines = vec![
        format!("Folder : {folder}"),
        format!("Output : {output}"),
        format!("Theme  : {}", view.theme),
        format!("State  : {state}"),
    ];
    if let Some(last) = &view.last_output {
        lines.push(format!("Last   : {last}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use folio_core::{OutputFormat, ProgressView};

    use super::*;

    #[test]
    fn status_lists_every_setting() {
        let view = AppViewModel {
            folder: "/work/project".to_string(),
            output_name: "bundle".to_string(),
            format: Some(OutputFormat::Pdf),
            theme: Theme::Light,
            running: true,
            progress: Some(ProgressView {
                job_id: 1,
                processed: 1,
                total: 4,
                current: Some("a.txt".to_string()),
            }),
            ..AppViewModel::default()
        };
        assert_eq!(
            status_lines(&view),
            vec![
                "Folder : /work/project".to_string(),
                "Output : bundle.pdf (PDF)".to_string(),
                "Theme  : light".to_string(),
                "State  : converting 1/4 (25%)".to_string(),
            ]
        );
    }

    #[test]
    fn empty_selection_is_spelled_out() {
        let lines = status_lines(&AppViewModel::default());
        assert_eq!(lines[0], "Folder : (none)");
        assert_eq!(lines[1], "Output :  (no format chosen)");
    }

    #[test]
    fn only_unseen_log_lines_are_printed() {
        let view = AppViewModel {
            log: vec!["c".to_string(), "d".to_string()],
            log_start: 2,
            ..AppViewModel::default()
        };
        assert_eq!(unseen_log(&view, 3), ["d".to_string()]);
        assert_eq!(unseen_log(&view, 0), ["c".to_string(), "d".to_string()]);
        assert!(unseen_log(&view, 4).is_empty());
    }

    #[test]
    fn themes_use_different_palettes() {
        assert_ne!(Palette::for_theme(Theme::Dark), Palette::for_theme(Theme::Light));
    }
}

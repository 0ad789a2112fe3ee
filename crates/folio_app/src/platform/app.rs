use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use anyhow::bail;
use folio_core::{update, AppState, Effect, Msg, NoticeKind, SessionConfig};
use folio_engine::ConverterConfig;
use folio_logging::{folio_info, folio_warn};

use super::effects::EffectRunner;
use super::input::{parse_line, ShellInput};
use super::ui;
use super::ui::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Read commands from stdin until `quit` or end of input.
    Interactive,
    /// Convert the configured folder once and exit.
    Once,
}

pub fn run_app(session: SessionConfig, config: ConverterConfig, mode: RunMode) -> anyhow::Result<()> {
    folio_info!(
        "Starting folio ({:?}), output dir {}",
        mode,
        config.output_dir.display()
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let mut state = AppState::with_session(session);
    let mut renderer = Renderer::new(state.theme());
    let effects = EffectRunner::new(config, msg_tx.clone());

    match mode {
        RunMode::Interactive => {
            renderer.print_banner();
            renderer.print_status(&state.view());
            spawn_input_thread(msg_tx);
        }
        RunMode::Once => {
            let _ = msg_tx.send(Msg::ConvertClicked);
        }
    }
    state.consume_dirty();

    let mut quit = false;
    while !quit {
        let Ok(first) = msg_rx.recv() else {
            break;
        };
        // Drain whatever else arrived so a burst of progress renders once.
        let mut inbox = vec![first];
        inbox.extend(msg_rx.try_iter());

        for msg in inbox {
            let (next, fx) = update(std::mem::take(&mut state), msg);
            state = next;
            let mut engine_effects = Vec::new();
            for effect in fx {
                match effect {
                    Effect::ApplyTheme(theme) => renderer.set_theme(theme),
                    Effect::ShowStatus => renderer.print_status(&state.view()),
                    Effect::Quit => quit = true,
                    other @ Effect::StartConversion { .. } => engine_effects.push(other),
                }
            }
            effects.enqueue(engine_effects);
            if mode == RunMode::Once && !state.is_running() {
                quit = true;
            }
        }

        if state.consume_dirty() {
            renderer.render(&state.view());
        }
    }

    renderer.finish();
    if state.is_running() {
        folio_warn!("Leaving while a conversion is still running");
    }
    folio_info!("folio shut down");

    if mode == RunMode::Once {
        if let Some(notice) = state.notice().filter(|n| n.kind == NoticeKind::Error) {
            bail!("{}", notice.text);
        }
    }
    Ok(())
}

fn spawn_input_thread(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match parse_line(&line, |path| path.is_dir()) {
                ShellInput::Dispatch(msg) => {
                    if msg_tx.send(msg).is_err() {
                        return;
                    }
                }
                ShellInput::Help => println!("{}", ui::constants::HELP_TEXT),
                ShellInput::Invalid(problem) => eprintln!("{problem}"),
                ShellInput::Empty => {}
            }
        }
        let _ = msg_tx.send(Msg::QuitRequested);
    });
}

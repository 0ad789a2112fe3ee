use folio_core::{update, AppState, Effect, Msg};

#[test]
fn status_and_quit_only_produce_effects() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::StatusRequested);
    assert_eq!(state, next);
    assert_eq!(effects, vec![Effect::ShowStatus]);

    let (next, effects) = update(state.clone(), Msg::QuitRequested);
    assert_eq!(state, next);
    assert_eq!(effects, vec![Effect::Quit]);
}

#[test]
fn editing_settings_has_no_effects() {
    let (state, effects) = update(AppState::new(), Msg::OutputNameChanged("bundle".into()));
    assert!(effects.is_empty());
    let (_, effects) = update(state, Msg::FolderChosen("/work".into()));
    assert!(effects.is_empty());
}

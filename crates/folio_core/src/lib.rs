//! Folio core: pure state machine and view-model helpers for the shell.
mod effect;
mod msg;
mod payload;
mod session;
mod state;
mod update;
mod view_model;

pub use effect::{ConversionRequest, Effect};
pub use msg::{JobResult, Msg};
pub use payload::parse_drop_payload;
pub use session::{OutputFormat, SessionConfig, Theme};
pub use state::{AppState, JobId, JobPhase, Notice, NoticeKind, LOG_CAPACITY};
pub use update::update;
pub use view_model::{AppViewModel, ProgressView};

mod app;
mod effects;
mod input;
pub(crate) mod ui;

pub use app::{run_app, RunMode};

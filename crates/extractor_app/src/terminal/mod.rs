//! Terminal front-end: config, effect execution and the event loop.
mod app;
mod config;
mod effects;
mod ui;

pub use app::{run_app, RunMode};
pub use config::{load_config, ConfigOverrides};

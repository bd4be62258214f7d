//! Application module: the model behind the TUI.
//!
//! `App` wraps the playback controller with everything the screen needs on
//! top of it: input modes, the playlist cursor, the search panel and queued
//! alerts.

mod model;
mod task;

pub use model::*;
pub use task::{TaskRequest, TaskResult};

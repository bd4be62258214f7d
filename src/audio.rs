//! Audio output: a [`MediaElement`](crate::player::MediaElement) backed by
//! `rodio`.
//!
//! The element itself only sends commands. A dedicated audio thread owns the
//! output stream and the sink, loads sources off-thread and reports
//! lifecycle notifications back over a channel.

mod engine;
mod fetch;
mod player;
mod sink;
mod thread;
mod types;

pub use fetch::{SourceError, read_source};
pub use player::AudioElement;

#[cfg(test)]
mod tests;

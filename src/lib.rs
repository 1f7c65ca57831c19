//! tickgrid - a generative step sequencer.
//!
//! Several tracks each hold a boolean note pattern for a fixed-length cycle.
//! A clock steps them in lock-step; hits trigger round-robin voices and
//! per-track visual feedback, and every cycle the patterns are redrawn.
//!
//! - [`seq`]: clock, voice pool, tracks and the sequencer itself
//! - [`audio`]: a small synthesis engine behind the `Voice` trait
//! - [`tui`]: terminal visualizers behind the `StepVisualizer` trait
//! - [`pipeline`]: session config, persistence and offline rendering

pub mod app;
pub mod audio;
pub mod audio_api;
pub mod error;
pub mod pipeline;
pub mod seq;
pub mod shared;
pub mod tui;

pub use app::App;
pub use error::{ConfigError, TrackError};
pub use pipeline::session::{SessionConfig, TrackConfig};
pub use seq::{Clock, Sequencer, StepVisualizer, Track, Voice, VoicePool};

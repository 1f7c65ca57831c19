// Sequencing and timing: everything here is independent of how notes are
// synthesized or drawn.

mod clock;
mod sequencer;
mod track;
mod voice_pool;

pub use clock::Clock;
pub use sequencer::{Sequencer, SequencerState, StepVisualizer};
pub use track::{Track, TrackParams};
pub use voice_pool::{Voice, VoicePool};

#[cfg(test)]
pub(crate) use voice_pool::testing as voice_testing;

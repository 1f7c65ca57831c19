// Everything the core can reject happens at construction time; once a
// session is running, ticking and stepping cannot fail.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("note count must be greater than zero")]
    ZeroNoteCount,

    #[error("voice capacity must be greater than zero")]
    ZeroVoiceCapacity,

    #[error("clock interval must be greater than zero")]
    ZeroInterval,

    #[error("session has no tracks")]
    NoTracks,

    #[error("master volume {0} is outside [0, 1]")]
    MasterVolumeOutOfRange(f32),

    #[error("track {index}")]
    Track {
        index: usize,
        #[source]
        source: TrackError,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    #[error("probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("random mode needs a probability")]
    MissingProbability,

    #[error("note pattern is empty")]
    EmptyNotePattern,

    #[error("pan {0} is outside [-1, 1]")]
    PanOutOfRange(f32),

    #[error("{0} must be a finite, non-negative number of seconds")]
    InvalidTime(&'static str),

    #[error("frequency {0} Hz must be positive")]
    InvalidFrequency(f32),
}

impl TrackError {
    pub fn at(self, index: usize) -> ConfigError {
        ConfigError::Track { index, source: self }
    }
}

pub use crate::audio::{EnvelopeParams, OscillatorType};

/// Index of a voice in the engine's fixed bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoiceId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceSpec {
    pub oscillator: OscillatorType,
    pub envelope: EnvelopeParams,
}

// Voices are allocated up front (see VoiceBank) so the audio callback never
// allocates; commands only address them by id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioCommand {
    Start(VoiceId),
    Stop(VoiceId),
    Pan { voice: VoiceId, value: f32 },
    Play {
        voice: VoiceId,
        start_time: f32,
        sustain_time: f32,
        frequency: Option<f32>,
    },
}

/// Every voice the engine will ever render, collected before it starts.
#[derive(Clone, Debug, Default)]
pub struct VoiceBank {
    specs: Vec<VoiceSpec>,
}

impl VoiceBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spec: VoiceSpec) -> VoiceId {
        self.specs.push(spec);
        VoiceId(self.specs.len() - 1)
    }

    pub fn specs(&self) -> &[VoiceSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

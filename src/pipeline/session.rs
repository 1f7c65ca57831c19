// The session file: everything needed to build the tracks, voices and clock
// for one run. Loaded from disk by persistence.rs or taken from the preset.

use serde::{Deserialize, Serialize};

use crate::audio_api::{EnvelopeParams, OscillatorType, VoiceBank, VoiceId, VoiceSpec};
use crate::error::ConfigError;
use crate::seq::{Clock, Sequencer, Track, TrackParams, Voice, VoicePool};
use crate::shared::{
    DEFAULT_INTERVAL_MS, DEFAULT_MASTER_VOLUME, DEFAULT_NOTE_COUNT, DEFAULT_VOICE_CAPACITY, NoteStyle,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    #[serde(default)]
    pub name: String,
    pub oscillator: OscillatorType,
    pub envelope: EnvelopeParams,
    #[serde(default)]
    pub pan: f32,
    pub start_time: f32,
    pub sustain_time: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_pattern: Option<Vec<bool>>,
    #[serde(default)]
    pub is_random: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(default)]
    pub style: NoteStyle,
}

impl TrackConfig {
    pub fn params(&self) -> TrackParams {
        TrackParams {
            pan: self.pan,
            start_time: self.start_time,
            sustain_time: self.sustain_time,
            frequency: self.frequency,
            note_pattern: self.note_pattern.clone(),
            is_random: self.is_random,
            probability: self.probability,
        }
    }

    pub fn voice_spec(&self) -> VoiceSpec {
        VoiceSpec {
            oscillator: self.oscillator,
            envelope: self.envelope,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub interval_ms: u64,
    pub note_count: usize,
    pub voice_capacity: usize,
    pub master_volume: f32,
    /// Fixes the pattern generator; `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub tracks: Vec<TrackConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::preset()
    }
}

impl SessionConfig {
    /// Four tracks: a random sine ping, a random short hiss, a fixed long
    /// hiss on every fifth eighth, and a random brown thump that always
    /// opens the cycle.
    pub fn preset() -> Self {
        let sine = TrackConfig {
            name: "sine".into(),
            oscillator: OscillatorType::Sine,
            envelope: EnvelopeParams {
                attack_level: 1.0,
                release_level: 0.0,
                attack_time: 0.01,
                decay_time: 0.05,
                sus_percent: 0.2,
                release_time: 0.01,
            },
            pan: 0.0,
            start_time: 0.01,
            sustain_time: 0.08,
            frequency: Some(880.0),
            note_pattern: None,
            is_random: true,
            probability: Some(0.6),
            style: NoteStyle::Sine,
        };
        let short_noise = TrackConfig {
            name: "short white".into(),
            oscillator: OscillatorType::White,
            envelope: EnvelopeParams {
                attack_level: 0.8,
                release_level: 0.0,
                attack_time: 0.001,
                decay_time: 0.03,
                sus_percent: 0.1,
                release_time: 0.01,
            },
            pan: -0.7,
            start_time: 0.01,
            sustain_time: 0.02,
            frequency: None,
            note_pattern: None,
            is_random: true,
            probability: Some(0.4),
            style: NoteStyle::ShortNoise,
        };
        let long_noise = TrackConfig {
            name: "long white".into(),
            oscillator: OscillatorType::White,
            envelope: EnvelopeParams {
                attack_level: 0.7,
                release_level: 0.0,
                attack_time: 0.001,
                decay_time: 0.15,
                sus_percent: 0.1,
                release_time: 0.1,
            },
            pan: 0.7,
            start_time: 0.01,
            sustain_time: 0.05,
            frequency: None,
            note_pattern: Some(vec![false, false, false, false, true, false, false, false]),
            is_random: false,
            probability: None,
            style: NoteStyle::LongNoise,
        };
        let mut downbeat = vec![false; 16];
        downbeat[0] = true;
        let brown = TrackConfig {
            name: "brown".into(),
            oscillator: OscillatorType::Brown,
            envelope: EnvelopeParams {
                attack_level: 0.9,
                release_level: 0.0,
                attack_time: 0.001,
                decay_time: 0.1,
                sus_percent: 0.2,
                release_time: 0.02,
            },
            pan: -0.2,
            start_time: 0.01,
            sustain_time: 0.05,
            frequency: None,
            note_pattern: Some(downbeat),
            is_random: true,
            probability: Some(0.3),
            style: NoteStyle::BrownNoise,
        };

        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            note_count: DEFAULT_NOTE_COUNT,
            voice_capacity: DEFAULT_VOICE_CAPACITY,
            master_volume: DEFAULT_MASTER_VOLUME,
            seed: None,
            tracks: vec![sine, short_noise, long_noise, brown],
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.note_count == 0 {
            return Err(ConfigError::ZeroNoteCount);
        }
        if self.voice_capacity == 0 {
            return Err(ConfigError::ZeroVoiceCapacity);
        }
        if !(0.0..=1.0).contains(&self.master_volume) {
            return Err(ConfigError::MasterVolumeOutOfRange(self.master_volume));
        }
        if self.tracks.is_empty() {
            return Err(ConfigError::NoTracks);
        }
        for (index, track) in self.tracks.iter().enumerate() {
            track.params().validate().map_err(|e| e.at(index))?;
        }
        Ok(())
    }

    /// Voice specs in the order [`build_sequencer`](Self::build_sequencer)
    /// hands out ids: track by track, slot by slot.
    pub fn voice_bank(&self) -> VoiceBank {
        let mut bank = VoiceBank::new();
        for track in &self.tracks {
            for _ in 0..self.voice_capacity {
                bank.add(track.voice_spec());
            }
        }
        bank
    }

    pub fn build_clock(&self) -> Result<Clock, ConfigError> {
        Clock::new(self.interval_ms)
    }

    pub fn build_sequencer(
        &self,
        mut make_voice: impl FnMut(VoiceId, VoiceSpec) -> Box<dyn Voice>,
    ) -> Result<Sequencer, ConfigError> {
        self.validate()?;
        let mut sequencer = match self.seed {
            Some(seed) => Sequencer::with_seed(self.note_count, seed)?,
            None => Sequencer::new(self.note_count)?,
        };
        let mut next_id = 0;
        for (index, track) in self.tracks.iter().enumerate() {
            let spec = track.voice_spec();
            let pool = VoicePool::from_fn(self.voice_capacity, |_| {
                let voice = make_voice(VoiceId(next_id), spec);
                next_id += 1;
                voice
            })?;
            let track = Track::new(track.params(), pool).map_err(|e| e.at(index))?;
            sequencer.add_track(track);
        }
        Ok(sequencer)
    }
}

use crate::audio_api::{AudioCommand, VoiceBank};

use super::frame::StereoFrame;
use super::voice::SynthVoice;

/// Renders the whole voice bank. Lives on the audio thread; the sequencer
/// only reaches it through [`AudioCommand`]s.
pub struct Engine {
    voices: Vec<SynthVoice>, // fixed at construction
    master_volume: f32,
}

impl Engine {
    pub fn new(sample_rate: u32, bank: &VoiceBank, master_volume: f32) -> Self {
        let voices = bank
            .specs()
            .iter()
            .enumerate()
            .map(|(i, spec)| SynthVoice::new(spec.oscillator, spec.envelope, sample_rate as f32, i as u64))
            .collect();
        Self {
            voices,
            master_volume,
        }
    }

    pub fn voices(&self) -> &[SynthVoice] {
        &self.voices
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        let id = match cmd {
            AudioCommand::Start(v) | AudioCommand::Stop(v) => v,
            AudioCommand::Pan { voice, .. } | AudioCommand::Play { voice, .. } => voice,
        };
        let Some(voice) = self.voices.get_mut(id.0) else {
            return;
        };
        match cmd {
            AudioCommand::Start(_) => voice.start(),
            AudioCommand::Stop(_) => voice.stop(),
            AudioCommand::Pan { value, .. } => voice.set_pan(value),
            AudioCommand::Play {
                start_time,
                sustain_time,
                frequency,
                ..
            } => voice.play(start_time, sustain_time, frequency),
        }
    }

    /// Overwrites `frames` with the mix of every voice.
    pub fn render_block(&mut self, frames: &mut [StereoFrame]) {
        frames.fill(StereoFrame::zero());
        for voice in &mut self.voices {
            voice.render_into(frames);
        }
        for frame in frames.iter_mut() {
            frame.scale(self.master_volume);
        }
    }
}

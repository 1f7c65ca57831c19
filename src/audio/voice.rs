use super::envelope::{Envelope, EnvelopeParams};
use super::frame::StereoFrame;
use super::oscillator::{Oscillator, OscillatorType};

/// An oscillator shaped by an envelope and placed in the stereo field.
/// This is what one slot of a track's voice pool sounds like.
#[derive(Clone, Debug)]
pub struct SynthVoice {
    oscillator: Oscillator,
    envelope: Envelope,
    pan: f32,
    running: bool,
}

impl SynthVoice {
    pub fn new(kind: OscillatorType, envelope: EnvelopeParams, sample_rate: f32, seed: u64) -> Self {
        Self {
            oscillator: Oscillator::new(kind, sample_rate, seed),
            envelope: Envelope::new(envelope, sample_rate),
            pan: 0.0,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pan_value(&self) -> f32 {
        self.pan
    }

    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }

    pub fn play(&mut self, start_time: f32, sustain_time: f32, frequency: Option<f32>) {
        if let Some(f) = frequency {
            self.oscillator.set_frequency(f);
        }
        self.envelope.trigger(start_time, sustain_time);
    }

    // amplitude goes to zero before the source is (re)started or halted,
    // so neither produces a click
    pub fn start(&mut self) {
        self.envelope.reset();
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.envelope.reset();
        self.running = false;
    }

    pub fn set_pan(&mut self, value: f32) {
        self.pan = value.clamp(-1.0, 1.0);
    }

    /// Adds this voice into `out`. A stopped voice, or one with nothing
    /// scheduled, contributes nothing.
    pub fn render_into(&mut self, out: &mut [StereoFrame]) {
        if !self.running || self.envelope.is_silent() {
            return;
        }
        for frame in out.iter_mut() {
            let level = self.envelope.next_level();
            let sample = self.oscillator.next_sample() * level;
            frame.add_panned(sample, self.pan);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice() -> SynthVoice {
        SynthVoice::new(OscillatorType::Square, EnvelopeParams::default(), 1000.0, 0)
    }

    fn energy(frames: &[StereoFrame]) -> f32 {
        frames.iter().map(|f| f.left.abs() + f.right.abs()).sum()
    }

    #[test]
    fn test_not_started_is_silent() {
        let mut v = voice();
        v.play(0.0, 0.1, Some(100.0));
        let mut out = vec![StereoFrame::zero(); 64];
        v.render_into(&mut out);
        assert_eq!(energy(&out), 0.0);
    }

    #[test]
    fn test_started_voice_sounds_after_play() {
        let mut v = voice();
        v.start();
        let mut out = vec![StereoFrame::zero(); 64];
        v.render_into(&mut out);
        assert_eq!(energy(&out), 0.0);

        v.play(0.0, 0.05, Some(100.0));
        v.render_into(&mut out);
        assert!(energy(&out) > 0.0);
        assert_eq!(v.frequency(), 100.0);
    }

    #[test]
    fn test_play_without_frequency_keeps_previous() {
        let mut v = voice();
        v.play(0.0, 0.0, Some(330.0));
        v.play(0.0, 0.0, None);
        assert_eq!(v.frequency(), 330.0);
    }

    #[test]
    fn test_pan_hard_left() {
        let mut v = voice();
        v.start();
        v.set_pan(-1.0);
        v.play(0.0, 0.05, None);
        let mut out = vec![StereoFrame::zero(); 32];
        v.render_into(&mut out);
        assert!(out.iter().all(|f| f.right.abs() < 1e-6));
        assert!(out.iter().any(|f| f.left.abs() > 0.0));
    }

    #[test]
    fn test_stop_silences() {
        let mut v = voice();
        v.start();
        v.play(0.0, 1.0, None);
        v.stop();
        let mut out = vec![StereoFrame::zero(); 32];
        v.render_into(&mut out);
        assert_eq!(energy(&out), 0.0);
        assert!(!v.is_running());
    }
}

use rand::Rng;

use super::voice_pool::{Voice, VoicePool};
use crate::error::TrackError;

/// Construction parameters for a [`Track`]. Synthesis settings (oscillator,
/// envelope) are already baked into the voices handed to the pool.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackParams {
    pub pan: f32,
    pub start_time: f32,
    pub sustain_time: f32,
    pub frequency: Option<f32>,
    pub note_pattern: Option<Vec<bool>>,
    pub is_random: bool,
    pub probability: Option<f64>,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            pan: 0.0,
            start_time: 0.01,
            sustain_time: 0.05,
            frequency: None,
            note_pattern: None,
            is_random: false,
            probability: None,
        }
    }
}

impl TrackParams {
    pub fn validate(&self) -> Result<(), TrackError> {
        if let Some(p) = self.probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(TrackError::ProbabilityOutOfRange(p));
            }
        } else if self.is_random {
            return Err(TrackError::MissingProbability);
        }
        if self.note_pattern.as_ref().is_some_and(|p| p.is_empty()) {
            return Err(TrackError::EmptyNotePattern);
        }
        if !(-1.0..=1.0).contains(&self.pan) {
            return Err(TrackError::PanOutOfRange(self.pan));
        }
        for (field, value) in [("start time", self.start_time), ("sustain time", self.sustain_time)] {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackError::InvalidTime(field));
            }
        }
        if let Some(f) = self.frequency {
            if !f.is_finite() || f <= 0.0 {
                return Err(TrackError::InvalidFrequency(f));
            }
        }
        Ok(())
    }
}

/// One voice line of the piece: a pattern regenerated every cycle and the
/// pool of voices that sounds it.
pub struct Track {
    voices: VoicePool<Box<dyn Voice>>,
    pattern: Vec<bool>,
    is_random: bool,
    fill_probability: f64,
    fixed_overlay: Option<Vec<bool>>,
    start_time: f32,
    sustain_time: f32,
    frequency: Option<f32>,
}

impl Track {
    pub fn new(params: TrackParams, mut voices: VoicePool<Box<dyn Voice>>) -> Result<Self, TrackError> {
        params.validate()?;
        voices.pan(params.pan);
        Ok(Self {
            voices,
            pattern: Vec::new(),
            is_random: params.is_random,
            fill_probability: params.probability.unwrap_or(0.0),
            fixed_overlay: params.note_pattern,
            start_time: params.start_time,
            sustain_time: params.sustain_time,
            frequency: params.frequency,
        })
    }

    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }

    pub fn voices(&self) -> &VoicePool<Box<dyn Voice>> {
        &self.voices
    }

    /// Rebuilds the pattern for a cycle of `note_count` steps.
    ///
    /// Random tracks draw the first half and repeat it as the second half.
    /// For an odd count the leftover last step gets its own draw. The fixed
    /// overlay is tiled across the cycle and ORed on top.
    pub fn generate_pattern<R: Rng>(&mut self, note_count: usize, rng: &mut R) {
        debug_assert!(note_count > 0);
        self.pattern.clear();

        if self.is_random {
            let half = note_count / 2;
            for _ in 0..half {
                let hit = rng.random::<f64>() < self.fill_probability;
                self.pattern.push(hit);
            }
            self.pattern.extend_from_within(..half);
            if note_count % 2 == 1 {
                let hit = rng.random::<f64>() < self.fill_probability;
                self.pattern.push(hit);
            }
        } else {
            self.pattern.resize(note_count, false);
        }

        if let Some(overlay) = &self.fixed_overlay {
            for (i, note) in self.pattern.iter_mut().enumerate() {
                *note |= overlay[i % overlay.len()];
            }
        }
    }

    pub fn is_hit(&self, step: usize) -> bool {
        self.pattern.get(step).copied().unwrap_or(false)
    }

    /// Sounds the next voice if the pattern has a note at `step`.
    /// Returns whether a note was scheduled.
    pub fn evaluate_step(&mut self, step: usize) -> bool {
        if !self.is_hit(step) {
            return false;
        }
        self.voices.play(self.start_time, self.sustain_time, self.frequency);
        true
    }

    pub fn start(&mut self) {
        self.voices.start();
    }

    pub fn stop(&mut self) {
        self.voices.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::voice_pool::testing::{VoiceCall, recording_voices};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    const F: bool = false;
    const T: bool = true;

    fn track(params: TrackParams) -> (Track, Rc<RefCell<Vec<(usize, VoiceCall)>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let pool = VoicePool::new(recording_voices(8, &log)).unwrap();
        let track = Track::new(params, pool).unwrap();
        log.borrow_mut().clear();
        (track, log)
    }

    #[test]
    fn test_fixed_pattern_is_exact() {
        let (mut t, _) = track(TrackParams {
            note_pattern: Some(vec![F, F, F, F, T, F, F, F]),
            ..TrackParams::default()
        });
        t.generate_pattern(8, &mut SmallRng::seed_from_u64(1));
        assert_eq!(t.pattern(), &[F, F, F, F, T, F, F, F]);
    }

    #[test]
    fn test_zero_probability_is_silent() {
        let (mut t, _) = track(TrackParams {
            is_random: true,
            probability: Some(0.0),
            ..TrackParams::default()
        });
        for seed in 0..16 {
            t.generate_pattern(32, &mut SmallRng::seed_from_u64(seed));
            assert_eq!(t.pattern(), vec![false; 32].as_slice());
        }
    }

    #[test]
    fn test_random_halves_mirror() {
        let (mut t, _) = track(TrackParams {
            is_random: true,
            probability: Some(0.5),
            ..TrackParams::default()
        });
        let mut rng = SmallRng::seed_from_u64(7);
        for note_count in [2, 8, 16, 32, 64] {
            t.generate_pattern(note_count, &mut rng);
            let half = note_count / 2;
            for i in 0..half {
                assert_eq!(t.pattern()[i], t.pattern()[i + half]);
            }
        }
    }

    #[test]
    fn test_overlay_never_suppresses() {
        let overlay = vec![T, F, F, T, F];
        let (mut t, _) = track(TrackParams {
            note_pattern: Some(overlay.clone()),
            is_random: true,
            probability: Some(0.3),
            ..TrackParams::default()
        });
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..20 {
            t.generate_pattern(32, &mut rng);
            for (i, note) in t.pattern().iter().enumerate() {
                if overlay[i % overlay.len()] {
                    assert!(*note, "overlay hit lost at step {i}");
                }
            }
        }
    }

    #[test]
    fn test_length_matches_note_count() {
        let (mut random, _) = track(TrackParams {
            is_random: true,
            probability: Some(0.5),
            note_pattern: Some(vec![T, F, F]),
            ..TrackParams::default()
        });
        let (mut fixed, _) = track(TrackParams::default());
        let mut rng = SmallRng::seed_from_u64(3);
        for note_count in 1..=33 {
            random.generate_pattern(note_count, &mut rng);
            fixed.generate_pattern(note_count, &mut rng);
            assert_eq!(random.pattern().len(), note_count);
            assert_eq!(fixed.pattern().len(), note_count);
        }
    }

    #[test]
    fn test_odd_count_keeps_mirror_and_adds_tail() {
        let (mut t, _) = track(TrackParams {
            is_random: true,
            probability: Some(1.0),
            ..TrackParams::default()
        });
        t.generate_pattern(7, &mut SmallRng::seed_from_u64(0));
        assert_eq!(t.pattern(), &[T; 7]);
    }

    #[test]
    fn test_evaluate_step_plays_only_hits() {
        let (mut t, log) = track(TrackParams {
            note_pattern: Some(vec![T, F]),
            start_time: 0.01,
            sustain_time: 0.08,
            frequency: Some(880.0),
            ..TrackParams::default()
        });
        t.generate_pattern(4, &mut SmallRng::seed_from_u64(0));
        let played: Vec<bool> = (0..4).map(|step| t.evaluate_step(step)).collect();
        assert_eq!(played, vec![T, F, T, F]);
        let calls = log.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (0, VoiceCall::Play { start: 0.01, sustain: 0.08, frequency: Some(880.0) }));
        assert_eq!(calls[1].0, 1);
    }

    #[test]
    fn test_pan_applied_at_construction() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let pool = VoicePool::new(recording_voices(2, &log)).unwrap();
        Track::new(TrackParams { pan: 0.7, ..TrackParams::default() }, pool).unwrap();
        assert_eq!(*log.borrow(), vec![(0, VoiceCall::Pan(0.7)), (1, VoiceCall::Pan(0.7))]);
    }

    #[test]
    fn test_validation() {
        let bad = [
            (TrackParams { probability: Some(1.5), ..TrackParams::default() }, TrackError::ProbabilityOutOfRange(1.5)),
            (TrackParams { is_random: true, ..TrackParams::default() }, TrackError::MissingProbability),
            (TrackParams { note_pattern: Some(vec![]), ..TrackParams::default() }, TrackError::EmptyNotePattern),
            (TrackParams { pan: -1.5, ..TrackParams::default() }, TrackError::PanOutOfRange(-1.5)),
            (TrackParams { sustain_time: -0.1, ..TrackParams::default() }, TrackError::InvalidTime("sustain time")),
            (TrackParams { frequency: Some(0.0), ..TrackParams::default() }, TrackError::InvalidFrequency(0.0)),
        ];
        for (params, expected) in bad {
            assert_eq!(params.validate(), Err(expected));
        }
        assert_eq!(TrackParams::default().validate(), Ok(()));
    }
}

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::track::Track;
use crate::error::ConfigError;

/// Presentation side of one track. The sequencer drives it; whoever owns it
/// decides what "display" means.
pub trait StepVisualizer {
    fn initialize(&mut self, step_count: usize);
    fn update(&mut self, pattern: &[bool]);
    fn display(&mut self);
    fn notify_step_played(&mut self, step: usize);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Running,
}

/// Steps every track in lock-step over a cycle of `note_count` steps and
/// regenerates all patterns when the cycle wraps.
///
/// Visualizers are owned by the caller and paired with tracks by index.
pub struct Sequencer {
    tracks: Vec<Track>,
    note_count: usize,
    current_step: usize,
    cycle: u64,
    state: SequencerState,
    rng: SmallRng,
}

impl Sequencer {
    pub fn new(note_count: usize) -> Result<Self, ConfigError> {
        Self::with_rng(note_count, SmallRng::from_os_rng())
    }

    pub fn with_seed(note_count: usize, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(note_count, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(note_count: usize, rng: SmallRng) -> Result<Self, ConfigError> {
        if note_count == 0 {
            return Err(ConfigError::ZeroNoteCount);
        }
        Ok(Self {
            tracks: Vec::new(),
            note_count,
            current_step: 0,
            cycle: 0,
            state: SequencerState::Idle,
            rng,
        })
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn note_count(&self) -> usize {
        self.note_count
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Number of completed cycles since `start`.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn start<V: StepVisualizer>(&mut self, visualizers: &mut [V]) {
        if visualizers.len() != self.tracks.len() {
            log::warn!(
                "{} visualizers for {} tracks, unpaired tracks play undisplayed",
                visualizers.len(),
                self.tracks.len()
            );
        }
        for track in &mut self.tracks {
            track.start();
        }
        self.regenerate();
        self.cycle = 0;
        for visualizer in visualizers.iter_mut() {
            visualizer.initialize(self.note_count);
        }
        self.update_visualizers(visualizers);
        self.state = SequencerState::Running;
        log::info!(
            "sequencer started: {} tracks, {} steps per cycle",
            self.tracks.len(),
            self.note_count
        );
    }

    pub fn stop(&mut self) {
        for track in &mut self.tracks {
            track.stop();
        }
        self.state = SequencerState::Idle;
        log::info!("sequencer stopped at step {}", self.current_step);
    }

    /// Plays the current step on every track and moves to the next one.
    ///
    /// When `muted` no voice is triggered, but visualizers are still told
    /// about every hit so the display keeps time with the cycle.
    pub fn advance_step<V: StepVisualizer>(&mut self, muted: bool, visualizers: &mut [V]) {
        if self.state != SequencerState::Running {
            log::debug!("advance_step ignored while idle");
            return;
        }
        let step = self.current_step;
        for (index, track) in self.tracks.iter_mut().enumerate() {
            if !track.is_hit(step) {
                continue;
            }
            if !muted {
                track.evaluate_step(step);
            }
            if let Some(visualizer) = visualizers.get_mut(index) {
                visualizer.notify_step_played(step);
            }
        }

        self.current_step += 1;
        if self.current_step >= self.note_count {
            self.regenerate();
            self.cycle += 1;
            self.update_visualizers(visualizers);
            log::debug!("cycle {} begins", self.cycle);
        }
    }

    pub fn render<V: StepVisualizer>(&self, visualizers: &mut [V]) {
        for visualizer in visualizers {
            visualizer.display();
        }
    }

    fn regenerate(&mut self) {
        for track in &mut self.tracks {
            track.generate_pattern(self.note_count, &mut self.rng);
        }
        self.current_step = 0;
    }

    fn update_visualizers<V: StepVisualizer>(&self, visualizers: &mut [V]) {
        for (track, visualizer) in self.tracks.iter().zip(visualizers.iter_mut()) {
            visualizer.update(track.pattern());
        }
    }
}

#[cfg(test)]
mod testing {
    use super::StepVisualizer;

    #[derive(Clone, Debug, PartialEq)]
    pub enum VisualizerCall {
        Initialize(usize),
        Update(Vec<bool>),
        Display,
        StepPlayed(usize),
    }

    #[derive(Default)]
    pub struct RecordingVisualizer {
        pub calls: Vec<VisualizerCall>,
    }

    impl RecordingVisualizer {
        pub fn played_steps(&self) -> Vec<usize> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    VisualizerCall::StepPlayed(step) => Some(*step),
                    _ => None,
                })
                .collect()
        }
    }

    impl StepVisualizer for RecordingVisualizer {
        fn initialize(&mut self, step_count: usize) {
            self.calls.push(VisualizerCall::Initialize(step_count));
        }

        fn update(&mut self, pattern: &[bool]) {
            self.calls.push(VisualizerCall::Update(pattern.to_vec()));
        }

        fn display(&mut self) {
            self.calls.push(VisualizerCall::Display);
        }

        fn notify_step_played(&mut self, step: usize) {
            self.calls.push(VisualizerCall::StepPlayed(step));
        }
    }
}

// The running session: clock, sequencer, visualizers and the mute flag,
// bundled so the host loop only ever talks to one value.

use crate::audio_api::{VoiceId, VoiceSpec};
use crate::error::ConfigError;
use crate::pipeline::session::SessionConfig;
use crate::seq::{Clock, Sequencer, Voice};
use crate::shared::InputEvent;
use crate::tui::visualizer::TrackVisualizer;

pub struct App {
    clock: Clock,
    sequencer: Sequencer,
    visualizers: Vec<TrackVisualizer>,
    muted: bool,
}

impl App {
    pub fn new(
        config: &SessionConfig,
        make_voice: impl FnMut(VoiceId, VoiceSpec) -> Box<dyn Voice>,
    ) -> Result<Self, ConfigError> {
        let sequencer = config.build_sequencer(make_voice)?;
        let clock = config.build_clock()?;
        let visualizers = config
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let label = if t.name.is_empty() { format!("track {}", i + 1) } else { t.name.clone() };
                TrackVisualizer::new(label, t.style)
            })
            .collect();
        Ok(Self {
            clock,
            sequencer,
            visualizers,
            muted: false,
        })
    }

    pub fn start(&mut self) {
        self.sequencer.start(&mut self.visualizers);
    }

    pub fn shutdown(&mut self) {
        self.sequencer.stop();
    }

    /// Feeds the clock; steps the sequencer when a boundary has passed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.clock.check(now_ms) {
            return false;
        }
        self.sequencer.advance_step(self.muted, &mut self.visualizers);
        true
    }

    /// Advances visual animations by one display frame.
    pub fn frame(&mut self) {
        self.sequencer.render(&mut self.visualizers);
    }

    /// Returns false once the user asked to quit.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::ToggleMute => {
                self.muted = !self.muted;
                log::info!("sound {}", if self.muted { "muted" } else { "on" });
                true
            }
            InputEvent::Quit => false,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn visualizers(&self) -> &[TrackVisualizer] {
        &self.visualizers
    }
}

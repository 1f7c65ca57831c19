use serde::{Deserialize, Serialize};

/// ADSR settings. Times are seconds; `sus_percent` places the sustain level
/// between `release_level` (0.0) and `attack_level` (1.0).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeParams {
    pub attack_level: f32,
    pub release_level: f32,
    pub attack_time: f32,
    pub decay_time: f32,
    pub sus_percent: f32,
    pub release_time: f32,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            attack_level: 1.0,
            release_level: 0.0,
            attack_time: 0.01,
            decay_time: 0.05,
            sus_percent: 0.2,
            release_time: 0.01,
        }
    }
}

impl EnvelopeParams {
    pub fn sustain_level(&self) -> f32 {
        self.release_level + self.sus_percent * (self.attack_level - self.release_level)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Delay,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Linear ADSR running at audio rate.
#[derive(Clone, Debug)]
pub struct Envelope {
    params: EnvelopeParams,
    sample_rate: f32,
    stage: Stage,
    level: f32,
    step: f32,
    target: f32,
    remaining: u32,
    hold: u32,
}

impl Envelope {
    pub fn new(params: EnvelopeParams, sample_rate: f32) -> Self {
        Self {
            params,
            sample_rate,
            stage: Stage::Idle,
            level: 0.0,
            step: 0.0,
            target: 0.0,
            remaining: 0,
            hold: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_silent(&self) -> bool {
        self.stage == Stage::Idle && self.level == 0.0
    }

    /// Drops to zero immediately without a release tail.
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
        self.level = 0.0;
        self.remaining = 0;
    }

    /// Schedules attack after `start_time` seconds and holds the sustain level
    /// for `sustain_time` seconds after decay. Retriggering restarts from the
    /// current level.
    pub fn trigger(&mut self, start_time: f32, sustain_time: f32) {
        self.hold = self.samples(sustain_time);
        self.stage = Stage::Delay;
        self.remaining = self.samples(start_time);
    }

    pub fn next_level(&mut self) -> f32 {
        match self.stage {
            Stage::Idle => {}
            Stage::Delay => {
                if self.remaining == 0 {
                    self.enter(Stage::Attack);
                    return self.next_level();
                }
                self.remaining -= 1;
            }
            Stage::Sustain => {
                if self.remaining == 0 {
                    self.enter(Stage::Release);
                    return self.next_level();
                }
                self.remaining -= 1;
            }
            Stage::Attack | Stage::Decay | Stage::Release => {
                self.level += self.step;
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.level = self.target;
                    match self.stage {
                        Stage::Attack => self.enter(Stage::Decay),
                        Stage::Decay => self.enter(Stage::Sustain),
                        _ => self.stage = Stage::Idle,
                    }
                }
            }
        }
        self.level
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        let (target, seconds) = match stage {
            Stage::Attack => (self.params.attack_level, self.params.attack_time),
            Stage::Decay => (self.params.sustain_level(), self.params.decay_time),
            Stage::Release => (self.params.release_level, self.params.release_time),
            Stage::Sustain => {
                self.remaining = self.hold;
                return;
            }
            Stage::Idle | Stage::Delay => return,
        };
        self.target = target;
        self.remaining = self.samples(seconds).max(1);
        self.step = (target - self.level) / self.remaining as f32;
    }

    fn samples(&self, seconds: f32) -> u32 {
        (seconds.max(0.0) * self.sample_rate).round() as u32
    }
}

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const DEFAULT_FREQUENCY: f32 = 440.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorType {
    #[default]
    Sine,
    Triangle,
    Sawtooth,
    Square,
    White,
    Pink,
    Brown,
}

impl OscillatorType {
    pub fn is_noise(self) -> bool {
        matches!(self, OscillatorType::White | OscillatorType::Pink | OscillatorType::Brown)
    }
}

/// Periodic waveform or noise source producing samples in roughly [-1, 1].
#[derive(Clone, Debug)]
pub struct Oscillator {
    kind: OscillatorType,
    sample_rate: f32,
    frequency: f32,
    phase: f32, // 0..1
    rng: SmallRng,
    pink: [f32; 7],
    brown: f32,
}

impl Oscillator {
    pub fn new(kind: OscillatorType, sample_rate: f32, seed: u64) -> Self {
        Self {
            kind,
            sample_rate,
            frequency: DEFAULT_FREQUENCY,
            phase: 0.0,
            rng: SmallRng::seed_from_u64(seed),
            pink: [0.0; 7],
            brown: 0.0,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    pub fn next_sample(&mut self) -> f32 {
        let out = match self.kind {
            OscillatorType::Sine => (self.phase * std::f32::consts::TAU).sin(),
            OscillatorType::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            OscillatorType::Sawtooth => 2.0 * self.phase - 1.0,
            OscillatorType::Square => {
                if self.phase < 0.5 { 1.0 } else { -1.0 }
            }
            OscillatorType::White => self.white(),
            OscillatorType::Pink => self.pink(),
            OscillatorType::Brown => self.brown(),
        };
        if !self.kind.is_noise() {
            self.phase += self.frequency / self.sample_rate;
            self.phase -= self.phase.floor();
        }
        out
    }

    fn white(&mut self) -> f32 {
        self.rng.random_range(-1.0..=1.0)
    }

    // Paul Kellet's refined pink filter
    fn pink(&mut self) -> f32 {
        let w = self.white();
        let b = &mut self.pink;
        b[0] = 0.99886 * b[0] + w * 0.0555179;
        b[1] = 0.99332 * b[1] + w * 0.0750759;
        b[2] = 0.96900 * b[2] + w * 0.1538520;
        b[3] = 0.86650 * b[3] + w * 0.3104856;
        b[4] = 0.55000 * b[4] + w * 0.5329522;
        b[5] = -0.7616 * b[5] - w * 0.0168980;
        let out = b[0] + b[1] + b[2] + b[3] + b[4] + b[5] + b[6] + w * 0.5362;
        b[6] = w * 0.115926;
        out * 0.11
    }

    // leaky integrated white noise
    fn brown(&mut self) -> f32 {
        let w = self.white();
        self.brown = (self.brown + 0.02 * w) / 1.02;
        self.brown * 3.5
    }
}

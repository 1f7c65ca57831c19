use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::audio_api::{AudioCommand, VoiceBank, VoiceId};
use crate::seq::Voice;

mod engine;
mod envelope;
mod frame;
mod oscillator;
mod voice;

pub use engine::Engine;
pub use envelope::{Envelope, EnvelopeParams, Stage};
pub use frame::StereoFrame;
pub use oscillator::{Oscillator, OscillatorType};
pub use voice::SynthVoice;

const COMMAND_QUEUE: usize = 1024;

pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn voice(&self, id: VoiceId) -> EngineVoice {
        EngineVoice::new(id, self.tx.clone())
    }
}

/// A [`Voice`] whose sound is rendered by the [`Engine`] on the other end
/// of a command channel.
pub struct EngineVoice {
    id: VoiceId,
    tx: Sender<AudioCommand>,
}

impl EngineVoice {
    pub fn new(id: VoiceId, tx: Sender<AudioCommand>) -> Self {
        Self { id, tx }
    }

    fn send(&self, cmd: AudioCommand) {
        match self.tx.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) => log::warn!("audio queue full, dropped {cmd:?}"),
            Err(TrySendError::Disconnected(_)) => log::debug!("audio engine gone, voice {} idle", self.id.0),
        }
    }
}

impl Voice for EngineVoice {
    fn play(&mut self, start_time: f32, sustain_time: f32, frequency: Option<f32>) {
        self.send(AudioCommand::Play {
            voice: self.id,
            start_time,
            sustain_time,
            frequency,
        });
    }

    fn start(&mut self) {
        self.send(AudioCommand::Start(self.id));
    }

    fn stop(&mut self) {
        self.send(AudioCommand::Stop(self.id));
    }

    fn pan(&mut self, value: f32) {
        self.send(AudioCommand::Pan { voice: self.id, value });
    }
}

pub fn command_channel() -> (Sender<AudioCommand>, Receiver<AudioCommand>) {
    crossbeam_channel::bounded(COMMAND_QUEUE)
}

/// Opens the default output device and starts rendering `bank`.
pub fn start_audio(bank: &VoiceBank, master_volume: f32) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = command_channel();

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let config = device.default_output_config().context("no default output config")?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let engine = Engine::new(sample_rate, bank, master_volume);
            let output_stream = build_output_stream_f32(&device, &config.into(), engine, rx, channels)?;
            output_stream.play().context("failed to play output stream")?;
            log::info!(
                "audio running: {} voices at {} Hz, {} channels",
                bank.len(),
                sample_rate,
                channels
            );

            Ok(AudioHandle {
                tx,
                _output_stream: output_stream,
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 supported for now)"),
    }
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut engine: Engine,
    rx: Receiver<AudioCommand>,
    channels: usize,
) -> anyhow::Result<cpal::Stream> {
    // sized generously up front; only grows if the host asks for a bigger block
    let mut scratch = vec![StereoFrame::zero(); 4096];

    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            let n_frames = data.len() / channels;
            if scratch.len() < n_frames {
                scratch.resize(n_frames, StereoFrame::zero());
            }
            let frames = &mut scratch[..n_frames];
            engine.render_block(frames);
            interleave(frames, data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

/// Writes stereo frames into an interleaved device buffer. Mono devices get
/// the average; extra channels beyond two are left silent.
fn interleave(frames: &[StereoFrame], data: &mut [f32], channels: usize) {
    for (frame, out) in frames.iter().zip(data.chunks_exact_mut(channels)) {
        match out {
            [mono] => *mono = 0.5 * (frame.left + frame.right),
            [left, right, rest @ ..] => {
                *left = frame.left;
                *right = frame.right;
                rest.fill(0.0);
            }
            [] => {}
        }
    }
}

// Offline bounce: drives the same clock and sequencer with simulated time
// and writes what the engine renders to a WAV file.

use std::path::Path;

use anyhow::Context;

use crate::app::App;
use crate::audio::{Engine, EngineVoice, StereoFrame, command_channel};
use crate::pipeline::session::SessionConfig;
use crate::seq::Voice;

const TAIL_MS: u64 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStats {
    pub frames: u64,
    pub steps: u64,
}

pub fn render_to_wav(config: &SessionConfig, cycles: u32, sample_rate: u32, path: &Path) -> anyhow::Result<RenderStats> {
    let last_step_ms = config
        .interval_ms
        .checked_mul(config.note_count as u64)
        .and_then(|cycle_ms| cycle_ms.checked_mul(cycles as u64))
        .filter(|ms| {
            ms.checked_add(TAIL_MS)
                .and_then(|end_ms| end_ms.checked_mul(sample_rate as u64))
                .is_some()
        })
        .with_context(|| format!("{cycles} cycles at {} ms per step is too long to render", config.interval_ms))?;
    let end_ms = last_step_ms + TAIL_MS;

    let bank = config.voice_bank();
    let mut engine = Engine::new(sample_rate, &bank, config.master_volume);
    let (tx, rx) = command_channel();
    let mut app = App::new(config, |id, _| -> Box<dyn Voice> { Box::new(EngineVoice::new(id, tx.clone())) })?;
    app.start();

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;

    let mut block = Vec::new();
    let mut written: u64 = 0;

    // one millisecond at a time, like a host loop running at 1 kHz
    for now_ms in 0..end_ms {
        // no new steps after the last cycle, only the release tail
        if now_ms <= last_step_ms {
            app.tick(now_ms);
        }
        for cmd in rx.try_iter() {
            engine.handle_cmd(cmd);
        }

        let target = (now_ms + 1) * sample_rate as u64 / 1000;
        let n = (target - written) as usize;
        block.resize(n, StereoFrame::zero());
        engine.render_block(&mut block);
        for frame in &block {
            writer.write_sample(to_i16(frame.left))?;
            writer.write_sample(to_i16(frame.right))?;
        }
        written = target;
    }
    writer.finalize().context("finalizing wav")?;

    let stats = RenderStats {
        frames: written,
        steps: app.clock().tick_count(),
    };
    log::info!("rendered {} frames ({} steps) to {}", stats.frames, stats.steps, path.display());
    Ok(stats)
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SessionConfig {
        let mut config = SessionConfig::preset();
        config.interval_ms = 20;
        config.note_count = 8;
        config.seed = Some(4);
        config
    }

    #[test]
    fn test_render_writes_expected_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let stats = render_to_wav(&small_config(), 2, 8_000, &path).unwrap();

        // 2 cycles of 8 steps at 20 ms plus the tail
        let expected_ms = 2 * 8 * 20 + TAIL_MS;
        assert_eq!(stats.frames, expected_ms * 8);
        assert_eq!(stats.steps, 16);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_rate, 8_000);
        assert_eq!(reader.duration() as u64, stats.frames);
    }

    #[test]
    fn test_render_is_audible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        render_to_wav(&small_config(), 1, 8_000, &path).unwrap();
        let mut reader = hound::WavReader::open(&path).unwrap();
        let peak = reader
            .samples::<i16>()
            .map(|s| s.unwrap().unsigned_abs())
            .max()
            .unwrap();
        assert!(peak > 0);
    }

    #[test]
    fn test_invalid_config_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config();
        config.tracks.clear();
        let err = render_to_wav(&config, 1, 8_000, &dir.path().join("x.wav")).unwrap_err();
        assert!(err.to_string().contains("no tracks"));
        assert!(!dir.path().join("x.wav").exists());
    }

    #[test]
    fn test_overlong_render_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config();
        config.interval_ms = u64::MAX / 4;
        let err = render_to_wav(&config, 1, 8_000, &dir.path().join("x.wav")).unwrap_err();
        assert!(err.to_string().contains("too long to render"));
        assert!(!dir.path().join("x.wav").exists());
    }

    #[test]
    fn test_sample_conversion_clamps() {
        assert_eq!(to_i16(2.0), i16::MAX);
        assert_eq!(to_i16(-2.0), -i16::MAX);
        assert_eq!(to_i16(0.0), 0);
    }
}

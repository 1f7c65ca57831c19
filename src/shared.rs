// Types and constants shared by the sequencer, the session config and the TUI.
//
// Controls:
//   Space / m / click   //  ToggleMute (visuals keep running while muted)
//   Esc / q             //  Quit

use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTE_COUNT: usize = 32;
pub const DEFAULT_VOICE_CAPACITY: usize = 8;
pub const DEFAULT_INTERVAL_MS: u64 = 120;
pub const DEFAULT_MASTER_VOLUME: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    ToggleMute,
    Quit,
}

/// How a track's steps are drawn. Each style has a resting glyph for a step
/// that is waiting to play and a short animation once it has played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteStyle {
    #[default]
    Sine,
    ShortNoise,
    LongNoise,
    BrownNoise,
}

impl NoteStyle {
    pub fn fade_frame_count(self) -> u32 {
        match self {
            NoteStyle::Sine => 60,
            NoteStyle::ShortNoise | NoteStyle::LongNoise | NoteStyle::BrownNoise => 30,
        }
    }

    pub fn before_play(self) -> &'static str {
        match self {
            NoteStyle::Sine => "●",
            NoteStyle::ShortNoise => "◇",
            NoteStyle::LongNoise => "═",
            NoteStyle::BrownNoise => "■",
        }
    }

    /// Glyph for a played step, `progress` running from 0.0 (just played)
    /// to 1.0 (faded out).
    pub fn after_play(self, progress: f32) -> &'static str {
        let frames: &[&'static str] = match self {
            NoteStyle::Sine => &["◉", "◎", "○", "◌", "·"],
            NoteStyle::ShortNoise => &["◆", "◈", "◇", "⋄", "·"],
            NoteStyle::LongNoise => &["☰", "≣", "≡", "=", "-"],
            NoteStyle::BrownNoise => &["■", "◆", "▲", "▴", "·"],
        };
        let eased = self.ease(progress.clamp(0.0, 1.0));
        let idx = ((eased * frames.len() as f32) as usize).min(frames.len() - 1);
        frames[idx]
    }

    // tonal steps ease out with a quartic, noise steps with a quintic
    fn ease(self, progress: f32) -> f32 {
        match self {
            NoteStyle::Sine | NoteStyle::ShortNoise => 1.0 - (progress - 1.0).powi(4),
            NoteStyle::LongNoise | NoteStyle::BrownNoise => (progress - 1.0).powi(5) + 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_play_endpoints() {
        for style in [NoteStyle::Sine, NoteStyle::ShortNoise, NoteStyle::LongNoise, NoteStyle::BrownNoise] {
            assert_ne!(style.after_play(0.0), style.after_play(1.0));
            // out-of-range progress clamps instead of indexing past the end
            assert_eq!(style.after_play(2.0), style.after_play(1.0));
        }
    }

    #[test]
    fn test_style_serde_names() {
        let json = serde_json::to_string(&NoteStyle::BrownNoise).unwrap();
        assert_eq!(json, "\"brown_noise\"");
        let back: NoteStyle = serde_json::from_str("\"short_noise\"").unwrap();
        assert_eq!(back, NoteStyle::ShortNoise);
    }
}

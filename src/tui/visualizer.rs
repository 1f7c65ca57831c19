use crate::seq::StepVisualizer;
use crate::shared::NoteStyle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoteCell {
    pub waiting: bool, // scheduled this cycle, not played yet
    pub played: bool,
    pub played_frames: u32,
}

/// What to draw for one step: a glyph and its opacity (1.0 = full ink).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub symbol: &'static str,
    pub opacity: f32,
}

/// One row of step cells for a track. Cells wait until their step plays,
/// then run a fade animation counted in display frames.
#[derive(Clone, Debug)]
pub struct TrackVisualizer {
    label: String,
    style: NoteStyle,
    cells: Vec<NoteCell>,
}

impl TrackVisualizer {
    pub fn new(label: impl Into<String>, style: NoteStyle) -> Self {
        Self {
            label: label.into(),
            style,
            cells: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn cells(&self) -> &[NoteCell] {
        &self.cells
    }

    pub fn glyph(&self, step: usize) -> Option<Glyph> {
        let cell = self.cells.get(step)?;
        if cell.waiting {
            return Some(Glyph {
                symbol: self.style.before_play(),
                opacity: 1.0,
            });
        }
        let fade = self.style.fade_frame_count();
        if cell.played && cell.played_frames < fade {
            let progress = cell.played_frames as f32 / fade as f32;
            return Some(Glyph {
                symbol: self.style.after_play(progress),
                opacity: 1.0 - progress,
            });
        }
        None
    }
}

impl StepVisualizer for TrackVisualizer {
    fn initialize(&mut self, step_count: usize) {
        self.cells = vec![
            NoteCell {
                waiting: true,
                ..NoteCell::default()
            };
            step_count
        ];
    }

    // a cell that is still fading keeps fading; only the waiting flag resets
    fn update(&mut self, pattern: &[bool]) {
        for (cell, hit) in self.cells.iter_mut().zip(pattern) {
            cell.waiting = *hit;
        }
    }

    fn display(&mut self) {
        let fade = self.style.fade_frame_count();
        for cell in &mut self.cells {
            if cell.played && cell.played_frames < fade {
                cell.played_frames += 1;
            }
        }
    }

    fn notify_step_played(&mut self, step: usize) {
        if let Some(cell) = self.cells.get_mut(step) {
            if cell.waiting {
                cell.waiting = false;
                cell.played = true;
                cell.played_frames = 0;
            }
        }
    }
}

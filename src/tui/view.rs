use crate::app::App;
use crate::tui::visualizer::TrackVisualizer;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const PAPER: u8 = 240;
const INK: u8 = 64;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let paper = Style::default().bg(gray(PAPER)).fg(gray(INK));
    frame.render_widget(Block::default().style(paper), area);

    let tracks = app.visualizers();
    let mut constraints = vec![Constraint::Length(1)]; // status line
    constraints.extend(tracks.iter().map(|_| Constraint::Length(4)));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1)); // help line

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_status(frame, sections[0], app);
    for (i, track) in tracks.iter().enumerate() {
        draw_track(frame, sections[i + 1], track, app.sequencer().current_step());
    }
    draw_help(frame, sections[sections.len() - 1]);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let seq = app.sequencer();
    let sound = if app.is_muted() {
        Span::styled(" MUTED ", Style::default().fg(gray(PAPER)).bg(gray(INK)))
    } else {
        Span::raw(" sound on ")
    };
    let line = Line::from(vec![
        Span::styled(" tickgrid ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " step {:>2}/{}  cycle {}  {} ms ",
            seq.current_step() + 1,
            seq.note_count(),
            seq.cycle() + 1,
            app.clock().interval_ms()
        )),
        sound,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

// Each track is two rows: first half of the cycle above the second, so the
// mirrored halves of a random pattern line up.
fn draw_track(frame: &mut Frame, area: Rect, track: &TrackVisualizer, current_step: usize) {
    let len = track.cells().len();
    let half = len.div_ceil(2);
    let rows = vec![
        step_row(track, 0..half, current_step),
        step_row(track, half..len, current_step),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(gray(200)))
        .title(format!(" {} ", track.label()));
    frame.render_widget(Paragraph::new(rows).block(block), area);
}

fn step_row(track: &TrackVisualizer, steps: std::ops::Range<usize>, current_step: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(steps.len() * 2);
    for step in steps {
        let mut span = match track.glyph(step) {
            Some(g) => Span::styled(g.symbol, Style::default().fg(ink(g.opacity))),
            None => Span::raw(" "),
        };
        if step == current_step {
            span.style = span.style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(span);
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Line::from(" space/m/click: mute   esc/q: quit ").style(Style::default().fg(gray(150)));
    frame.render_widget(Paragraph::new(help), area);
}

fn gray(v: u8) -> Color {
    Color::Rgb(v, v, v)
}

// blend ink toward paper as a glyph fades out
fn ink(opacity: f32) -> Color {
    let o = opacity.clamp(0.0, 1.0);
    let v = INK as f32 * o + PAPER as f32 * (1.0 - o);
    gray(v.round() as u8)
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use super::grid;
use crate::shared::NUM_LEDS;
use crate::touch::router::RecordState;

/// Everything the screen shows, copied out of the middle layer each frame.
pub struct Status<'a> {
    pub pattern_name: &'a str,
    pub pattern_index: usize,
    pub num_patterns: usize,
    pub position: usize,
    pub num_steps: usize,
    pub bpm: f32,
    pub playing: bool,
    pub at_beat: bool,
    pub record: RecordState,
    pub kit: Option<&'a str>,
    pub midi: Option<&'a str>,
    pub leds: &'a [bool; NUM_LEDS],
}

const HELP: &str =
    "pads 1234 qwer | a stop  s play  d rec | f g h nav | z/x pattern | ^S save  ^D dup  esc quit";

pub fn render(frame: &mut Frame, area: Rect, status: &Status) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // screen
            Constraint::Min(6),    // leds
            Constraint::Length(1), // key help
        ])
        .split(area);

    draw_screen(frame, sections[0], status);
    grid::draw_leds(frame, sections[1], status.leds);
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        sections[2],
    );
}

fn draw_screen(frame: &mut Frame, area: Rect, status: &Status) {
    let transport = if status.playing { "PLAY" } else { "STOP" };
    let record = match status.record {
        RecordState::Idle => Span::raw(""),
        RecordState::RecordHeld => Span::styled("REC HELD", Style::default().fg(Color::Yellow)),
        RecordState::RecordMode => Span::styled(
            "REC",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };
    let beat = if status.playing && status.at_beat { "*" } else { " " };

    let lines = vec![
        Line::from(format!(
            "pattern {}/{}  {}",
            status.pattern_index + 1,
            status.num_patterns,
            status.pattern_name
        )),
        Line::from(vec![
            Span::raw(format!(
                "{transport} {beat} step {:>2}/{}  {:.1} bpm  ",
                status.position + 1,
                status.num_steps,
                status.bpm
            )),
            record,
        ]),
        Line::from(format!(
            "kit: {}  midi: {}",
            status.kit.unwrap_or("none"),
            status.midi.unwrap_or("none")
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("drumcard")),
        area,
    );
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::shared::{NUM_DRUM_PADS, NUM_LEDS};

const LED_LABELS: [&str; NUM_LEDS] = [
    "1", "2", "3", "4", "Q", "W", "E", "R",
    "STOP", "PLAY", "REC", "NAV", "A", "B", "SHIFT",
];

// drum LEDs on the top row, the rest underneath
pub fn draw_leds(frame: &mut Frame, area: Rect, lit: &[bool; NUM_LEDS]) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50); 2])
        .split(area);

    draw_row(frame, rows[0], &LED_LABELS[..NUM_DRUM_PADS], &lit[..NUM_DRUM_PADS]);
    draw_row(frame, rows[1], &LED_LABELS[NUM_DRUM_PADS..], &lit[NUM_DRUM_PADS..]);
}

fn draw_row(frame: &mut Frame, area: Rect, labels: &[&str], lit: &[bool]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, labels.len() as u32); labels.len()])
        .split(area);

    for ((cell, label), on) in cols.iter().zip(labels).zip(lit) {
        let style = if *on {
            Style::default().fg(Color::LightMagenta).bg(Color::Magenta)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered().title(*label).border_style(style).style(style);
        frame.render_widget(block, *cell);
    }
}

// Built-in patterns used when nothing has been saved yet.
// Same digit-string layout as the save file; 32 steps = one bar of 32nd notes.
use crate::pipeline::pattern::{Pattern, PatternBank};
use crate::pipeline::persistence::parse_pattern;

const DEMO: &[(&str, [&str; 8])] = &[
    ("basic", [
        "10000000 00000000 10000000 00000000", // kick
        "00000000 10000000 00000000 10000000", // snare
        "10001000 10001000 10001000 10001000", // hat closed
        "00000000 00000000 00000000 00000000", // hat open
        "00000000 00000000 00000000 00000000", // clap
        "00000000 00000000 00000000 00000000", // tom
        "00000000 00000000 00000000 00000000", // ride
        "00000000 00000000 00000000 00000000", // crash
    ]),
    ("four-floor", [
        "10000000 10000000 10000000 10000000",
        "00000000 00000000 00000000 00000000",
        "00000000 00000000 00000000 00000000",
        "00001000 00001000 00001000 00001000",
        "00000000 10000000 00000000 10000000",
        "00000000 00000000 00000000 00000000",
        "00000000 00000000 00000000 00000000",
        "10000000 00000000 00000000 00000000",
    ]),
    ("breakbeat", [
        "10000000 00000010 00100000 00000000",
        "00000000 10000000 00000000 10000100",
        "10101010 10101010 10101010 10101010",
        "00000000 00000000 00000000 00000010",
        "00000000 00000000 00000000 00000000",
        "00000000 00000000 00000000 00000000",
        "00000000 00000000 00000000 00000000",
        "00000000 00000000 00000000 00000000",
    ]),
    ("tom-fill", [
        "10000000 00000000 10000000 00000000",
        "00000000 10000000 00000000 00000000",
        "10001000 10001000 10000000 00000000",
        "00000000 00000000 00000000 00000000",
        "00000000 00000000 00000000 00000000",
        "00000000 00000000 00001010 10101010",
        "00000000 00000000 00000000 00000000",
        "10000000 00000000 00000000 00000000",
    ]),
];

const BLANK_STEPS: usize = 32;
const BLANK_PADS: usize = 8;

pub fn demo() -> PatternBank {
    let patterns: Vec<Pattern> = DEMO
        .iter()
        .filter_map(|(name, seq)| parse_pattern(name, seq).ok())
        .collect();
    PatternBank::new(patterns).unwrap_or_else(|_| blank())
}

pub fn blank() -> PatternBank {
    let pattern = Pattern::blank("blank", BLANK_STEPS, BLANK_PADS);
    PatternBank::single(pattern)
}

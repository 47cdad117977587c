// Physical layout of the drum card:
//
//   touch inputs (20 channels on the sensor, first 16 wired):
//     0..8    drum pads 1-8
//     8       stop
//     9       play
//     10      record
//     11 12 13  up / mid / down
//     14 15   pattern A (next) / pattern B (prev)
//     16      shift (on the board but not wired to the sensor)
//
//   LEDs (15 on/off outputs):
//     0..8    drum pads, 8 stop, 9 play, 10 rec,
//     11      up/mid/down share one, 12 A, 13 B, 14 shift

pub const NUM_INPUTS: usize = 20;
pub const WIRED_INPUTS: usize = 16;
pub const NUM_DRUM_PADS: usize = 8;
pub const NUM_LEDS: usize = 15;

pub const LED_PLAY: usize = 9;
pub const LED_REC: usize = 10;

const PAD_TO_LED: [Option<usize>; NUM_INPUTS] = [
    Some(0), Some(1), Some(2), Some(3),
    Some(4), Some(5), Some(6), Some(7),
    Some(8), Some(9), Some(10),          // stop, play, rec
    Some(11), Some(11), Some(11),        // up, mid, down
    Some(12), Some(13), Some(14),        // A, B, shift
    None, None, None,                    // not wired
];

/// What a touch input index means on this board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pad {
    Drum(usize),
    Stop,
    Play,
    Record,
    Up,
    Mid,
    Down,
    PatternNext,
    PatternPrev,
    Shift,
}

impl Pad {
    pub fn from_index(index: usize) -> Option<Pad> {
        let pad = match index {
            i if i < NUM_DRUM_PADS => Pad::Drum(i),
            8 => Pad::Stop,
            9 => Pad::Play,
            10 => Pad::Record,
            11 => Pad::Up,
            12 => Pad::Mid,
            13 => Pad::Down,
            14 => Pad::PatternNext,
            15 => Pad::PatternPrev,
            16 => Pad::Shift,
            _ => return None,
        };
        Some(pad)
    }
}

pub fn pad_to_led(index: usize) -> Option<usize> {
    PAD_TO_LED.get(index).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drum_pads_light_their_own_led() {
        for i in 0..NUM_DRUM_PADS {
            assert_eq!(Pad::from_index(i), Some(Pad::Drum(i)));
            assert_eq!(pad_to_led(i), Some(i));
        }
    }

    #[test]
    fn navigation_pads_share_an_led() {
        assert_eq!(pad_to_led(11), pad_to_led(13));
        assert_eq!(pad_to_led(17), None);
        assert_eq!(pad_to_led(99), None);
        assert_eq!(Pad::from_index(17), None);
    }
}

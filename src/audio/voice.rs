use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// One-shot sample playback. Each pad owns one, so retriggering a pad
/// restarts its sound instead of stacking another copy.
#[derive(Clone, Debug)]
pub struct Voice {
    pub pos: f32,
    pub pitch: f32,
    pub gain: f32,
    pub active: bool,
}

impl Voice {
    pub fn idle() -> Self {
        Self { pos: 0.0, pitch: 1.0, gain: 0.0, active: false }
    }

    pub fn start(&mut self, gain: f32) {
        self.pos = 0.0;
        self.gain = gain;
        self.active = true;
    }

    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        let data = &buffer.data;
        let len = data.len();

        for frame in out.iter_mut() {
            let i = self.pos as usize;
            if i >= len {
                self.active = false;
                break;
            }
            let frac = self.pos - i as f32;
            let s0 = data[i];
            let s1 = data.get(i + 1).copied().unwrap_or(s0);
            frame.left += lerp(s0.left, s1.left, frac) * self.gain;
            frame.right += lerp(s0.right, s1.right, frac) * self.gain;
            self.pos += self.pitch;
        }
    }
}

use crossbeam_channel::Sender;

use crate::audio_api::AudioCommand;

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::voice::Voice;

const MAX_NOTES: usize = 8; // hard cap so we wont malloc in audio callback
const PAD_GAIN: f32 = 0.8;
const SYNTH_LEVEL: f32 = 0.2;
const RELEASE_SECS: f32 = 0.1;

#[derive(Clone, Copy, Debug)]
struct Note { // basic saw oscillator for midi notes
    note: u8,
    phase: f32, // 0..1
    phase_inc: f32,
    amp: f32,
    releasing: bool,
    alive: bool,
}

impl Note {
    const SILENT: Note = Note {
        note: 0,
        phase: 0.0,
        phase_inc: 0.0,
        amp: 0.0,
        releasing: false,
        alive: false,
    };
}

/// Kit samples plus one voice per sample, built off the audio thread.
#[derive(Clone, Debug, Default)]
pub struct LoadedKit {
    buffers: Vec<SampleBuffer>,
    voices: Vec<Voice>,
}

impl LoadedKit {
    pub fn new(buffers: Vec<SampleBuffer>) -> Self {
        let voices = vec![Voice::idle(); buffers.len()];
        Self { buffers, voices }
    }
}

pub struct Engine {
    sample_rate: f32,
    release_decay: f32,
    kit: LoadedKit,
    retired: Sender<LoadedKit>, // replaced kits go back to be freed off the audio thread
    notes: [Note; MAX_NOTES],
}

impl Engine {
    pub fn new(sample_rate: f32, retired: Sender<LoadedKit>) -> Self {
        Self {
            sample_rate,
            // -60dB over the release time
            release_decay: 0.001_f32.powf(1.0 / (RELEASE_SECS * sample_rate)),
            kit: LoadedKit::default(),
            retired,
            notes: [Note::SILENT; MAX_NOTES],
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::LoadKit(kit) => {
                let old = std::mem::replace(&mut self.kit, kit);
                let _ = self.retired.try_send(old);
            }
            AudioCommand::Play { voice } => {
                if let Some(v) = self.kit.voices.get_mut(voice) {
                    v.start(PAD_GAIN);
                }
            }
            AudioCommand::Stop { voice } => {
                if let Some(v) = self.kit.voices.get_mut(voice) {
                    v.active = false;
                }
            }
            AudioCommand::NoteOn { note, velocity: 0 } | AudioCommand::NoteOff { note } => {
                self.release_note(note)
            }
            AudioCommand::NoteOn { note, velocity } => self.press_note(note, velocity),
        }
    }

    fn press_note(&mut self, note: u8, velocity: u8) {
        // what slot do we write to?
        let slot = self.notes.iter().position(|n| !n.alive).unwrap_or(0);
        self.notes[slot] = Note {
            note,
            phase: 0.0,
            phase_inc: midi_to_hz(note) / self.sample_rate,
            amp: SYNTH_LEVEL * velocity as f32 / 127.0,
            releasing: false,
            alive: true,
        };
    }

    fn release_note(&mut self, note: u8) {
        for n in self.notes.iter_mut().filter(|n| n.alive && n.note == note) {
            n.releasing = true;
        }
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        out.fill(StereoFrame::zero());
        for (voice, buffer) in self.kit.voices.iter_mut().zip(&self.kit.buffers) {
            voice.render_into(buffer, out);
        }
        for frame in out.iter_mut() {
            let s = self.next_synth_sample();
            frame.left += s;
            frame.right += s;
        }
    }

    fn next_synth_sample(&mut self) -> f32 {
        let mut out = 0.0f32;
        for n in &mut self.notes {
            if !n.alive {
                continue;
            }
            out += n.amp * (2.0 * n.phase - 1.0);
            n.phase += n.phase_inc;
            if n.phase >= 1.0 {
                n.phase -= 1.0;
            }
            if n.releasing {
                n.amp *= self.release_decay;
                if n.amp < 0.0005 {
                    n.alive = false;
                }
            }
        }
        out
    }
}

fn midi_to_hz(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, Receiver};

    fn kit() -> LoadedKit {
        let click = SampleBuffer { data: vec![StereoFrame { left: 1.0, right: 1.0 }; 4] };
        LoadedKit::new(vec![click.clone(), click])
    }

    fn engine() -> (Engine, Receiver<LoadedKit>) {
        let (tx, rx) = bounded(2);
        (Engine::new(1000.0, tx), rx)
    }

    #[test]
    fn pad_plays_its_sample() {
        let (mut engine, _retired) = engine();
        engine.handle_cmd(AudioCommand::LoadKit(kit()));
        engine.handle_cmd(AudioCommand::Play { voice: 1 });
        let mut out = vec![StereoFrame::zero(); 8];
        engine.render_block(&mut out);
        assert_eq!(out[0].left, PAD_GAIN);
        assert_eq!(out[4].left, 0.0);
    }

    #[test]
    fn unknown_voice_is_ignored() {
        let (mut engine, _retired) = engine();
        engine.handle_cmd(AudioCommand::Play { voice: 7 });
        let mut out = vec![StereoFrame::zero(); 2];
        engine.render_block(&mut out);
        assert_eq!(out[0].left, 0.0);
    }

    #[test]
    fn stop_silences_pad() {
        let (mut engine, _retired) = engine();
        engine.handle_cmd(AudioCommand::LoadKit(kit()));
        engine.handle_cmd(AudioCommand::Play { voice: 0 });
        engine.handle_cmd(AudioCommand::Stop { voice: 0 });
        let mut out = vec![StereoFrame::zero(); 2];
        engine.render_block(&mut out);
        assert_eq!(out[0].left, 0.0);
    }

    #[test]
    fn note_releases_to_silence() {
        let (mut engine, _retired) = engine();
        engine.handle_cmd(AudioCommand::NoteOn { note: 69, velocity: 127 });
        assert!(engine.notes[0].alive);
        engine.handle_cmd(AudioCommand::NoteOn { note: 69, velocity: 0 });
        assert!(engine.notes[0].releasing);

        let mut out = vec![StereoFrame::zero(); 1000];
        engine.render_block(&mut out);
        assert!(!engine.notes[0].alive);
    }

    #[test]
    fn replaced_kit_is_handed_back() {
        let (mut engine, retired) = engine();
        engine.handle_cmd(AudioCommand::LoadKit(kit()));
        assert!(retired.try_recv().unwrap().buffers.is_empty());

        engine.handle_cmd(AudioCommand::LoadKit(LoadedKit::new(vec![])));
        let old = retired.try_recv().unwrap();
        assert_eq!(old.buffers.len(), 2);
        assert_eq!(old.voices.len(), 2);
    }

    #[test]
    fn a440() {
        assert!((midi_to_hz(69) - 440.0).abs() < 1e-3);
        assert!((midi_to_hz(81) - 880.0).abs() < 1e-2);
    }
}

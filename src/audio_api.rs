use crate::audio::LoadedKit;

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files or allocate (interrupts thread), so the kit
    // is decoded and its voices built up front, then handed over whole.
    LoadKit(LoadedKit),

    // One-shot sample voices, one per pad
    Play { voice: usize },
    Stop { voice: usize },

    // MIDI-driven synth
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
}

/// Something that can play and stop sample voices.
pub trait Voices {
    fn play(&mut self, voice: usize);
    fn stop(&mut self, voice: usize);
}

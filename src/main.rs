mod audio;
mod audio_api;
mod clock;
mod config;
mod error;
mod loader;
mod middle;
mod midi;
mod pipeline;
mod sequencer;
mod shared;
mod touch;
mod tui;

#[cfg(test)]
mod test_fixture;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use audio::{AudioHandle, LoadedKit};
use audio_api::AudioCommand;
use clock::{ticks_diff, MonotonicTicks, TickSource};
use config::Config;
use middle::Middle;
use midi::{MidiIn, MidiMessage};
use pipeline::persistence;
use tui::input::{KeyboardPads, ShellCommand};
use tui::view::Status;
use tui::LedPanel;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let project_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    init_logging(&project_dir)?;

    let config = Config::load(&project_dir);
    let patterns_path = config.patterns_path(&project_dir);
    let bank = persistence::load_or_template(&patterns_path, config.load_demo);

    let audio = audio::start_audio()?;
    let kit = load_drums(&config, &project_dir, bank.num_pads(), &audio);
    let midi = match MidiIn::connect_first() {
        Ok(midi) => midi,
        Err(e) => {
            warn!("midi unavailable: {e:#}");
            None
        }
    };

    let ticks = MonotonicTicks::new();
    let mut middle = Middle::new(&config, bank, audio, LedPanel::default(), ticks.now())?;

    terminal::enable_raw_mode()?;
    // real key-up events where the terminal supports them
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        )
    );
    let _guard = RawModeGuard; // auto drops when out of scope
    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let mut pads = KeyboardPads::default();
    let input_every = config.input_poll_ms as i32;
    let mut last_input = ticks.now();
    let sleep = Duration::from_millis(config.scheduler_poll_ms);

    loop {
        let now = ticks.now();
        middle.advance(now);

        if let Some(midi) = &midi {
            for msg in midi.drain() {
                handle_midi(middle.voices(), msg);
            }
        }

        if ticks_diff(now, last_input) >= input_every {
            last_input = now;
            for cmd in pads.poll(Duration::ZERO, now)? {
                match cmd {
                    ShellCommand::Quit => {
                        save(&patterns_path, &middle);
                        info!("bye");
                        return Ok(());
                    }
                    ShellCommand::Save => save(&patterns_path, &middle),
                    ShellCommand::Duplicate => {
                        middle.duplicate_pattern();
                    }
                }
            }
            middle.poll_touch(now, &pads.touches(now));

            let seq = middle.sequencer();
            let bank = middle.bank();
            let status = Status {
                pattern_name: &bank.active().name,
                pattern_index: bank.active_index(),
                num_patterns: bank.len(),
                position: seq.position(),
                num_steps: bank.num_steps(),
                bpm: seq.bpm(),
                playing: seq.is_playing(),
                at_beat: seq.at_beat(),
                record: middle.router().state(),
                kit: kit.as_deref(),
                midi: midi.as_ref().map(MidiIn::port_name),
                leds: middle.leds().lit(),
            };
            term.draw(|frame| tui::view::render(frame, frame.area(), &status))?;
        }

        std::thread::sleep(sleep);
    }
}

// the terminal belongs to the LED panel, so logs go to a file
fn init_logging(project_dir: &Path) -> anyhow::Result<()> {
    let path = project_dir.join("drumcard.log");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Find the configured kit and hand its samples to the engine. Returns its name.
fn load_drums(config: &Config, project_dir: &Path, num_pads: usize, audio: &AudioHandle) -> Option<String> {
    let root = config.kit_path(project_dir);
    let kits = match loader::kits::find_kits(&root, num_pads) {
        Ok(kits) => kits,
        Err(e) => {
            warn!("no drum kits: {e:#}");
            return None;
        }
    };
    let Some(kit) = kits.get(config.kit_index) else {
        warn!(index = config.kit_index, found = kits.len(), "kit index out of range");
        return None;
    };
    match loader::kits::load_kit(kit, audio.sample_rate()) {
        Ok(buffers) => {
            audio.send(AudioCommand::LoadKit(LoadedKit::new(buffers)));
            Some(kit.name.clone())
        }
        Err(e) => {
            error!("{e:#}");
            None
        }
    }
}

fn handle_midi(audio: &AudioHandle, msg: MidiMessage) {
    debug!(?msg, "midi in");
    match msg {
        MidiMessage::NoteOn { note, velocity, .. } => audio.send(AudioCommand::NoteOn { note, velocity }),
        MidiMessage::NoteOff { note, .. } => audio.send(AudioCommand::NoteOff { note }),
        MidiMessage::SystemReset => info!("midi system reset"),
        MidiMessage::ControlChange { .. }
        | MidiMessage::PitchBend { .. }
        | MidiMessage::ChannelPressure { .. } => {}
    }
}

fn save(path: &Path, middle: &Middle<AudioHandle, LedPanel>) {
    if let Err(e) = persistence::save_patterns(path, middle.bank()) {
        error!("saving patterns to {}: {e}", path.display());
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = terminal::disable_raw_mode();
    }
}

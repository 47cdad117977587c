// Runtime knobs, read from <project_dir>/drumcard.json if it exists.
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::sequencer::{SETTLE_TICKS, STEPS_PER_BEAT};

const CONFIG_FILE: &str = "drumcard.json";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bpm: f32,
    pub steps_per_beat: u32, // 8 = 32nd notes, 4 = 16th notes
    pub settle_ticks: u32,   // how long after a step before sequenced trigs are released
    pub pad_lit_ms: u32,
    pub scheduler_poll_ms: u64,
    pub input_poll_ms: u32,
    pub patterns_file: PathBuf,
    pub kit_dir: PathBuf,
    pub kit_index: usize,
    pub load_demo: bool, // demo patterns vs a single blank one when nothing is saved
    pub start_pattern: isize,
    pub start_playing: bool,
    pub chord_guard: bool,
    pub choke_on_release: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            steps_per_beat: STEPS_PER_BEAT,
            settle_ticks: SETTLE_TICKS,
            pad_lit_ms: 100,
            scheduler_poll_ms: 1,
            input_poll_ms: 50,
            patterns_file: PathBuf::from("saved_patterns.json"),
            kit_dir: PathBuf::from("drumkits"),
            kit_index: 0,
            load_demo: true,
            start_pattern: 1,
            start_playing: true,
            chord_guard: false,
            choke_on_release: false,
        }
    }
}

impl Config {
    pub fn load(project_dir: &Path) -> Self {
        let path = project_dir.join(CONFIG_FILE);
        let Ok(data) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    // relative paths in the config are relative to the project dir
    pub fn patterns_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.patterns_file)
    }

    pub fn kit_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.kit_dir)
    }
}

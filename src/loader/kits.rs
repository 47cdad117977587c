// Drum kits on disk: <kit_dir>/kit*/ with one .wav per pad, taken in name order.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::audio::SampleBuffer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kit {
    pub name: String,
    pub samples: Vec<PathBuf>, // exactly num_pads, sorted
}

/// Every usable kit under `root`, sorted by directory name.
pub fn find_kits(root: &Path, num_pads: usize) -> anyhow::Result<Vec<Kit>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(root)
        .with_context(|| format!("reading kit dir {}", root.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && file_name(path).to_lowercase().starts_with("kit"))
        .collect();
    dirs.sort();

    let mut kits = Vec::new();
    for dir in dirs {
        let name = file_name(&dir);
        let mut samples = index_wav_in_dir(&dir)?;
        if samples.len() < num_pads {
            warn!(kit = %name, found = samples.len(), needed = num_pads, "skipping kit with too few samples");
            continue;
        }
        samples.truncate(num_pads);
        kits.push(Kit { name, samples });
    }
    Ok(kits)
}

/// Decode a kit's samples at the output rate, one buffer per pad.
pub fn load_kit(kit: &Kit, target_rate: u32) -> anyhow::Result<Vec<SampleBuffer>> {
    let buffers = kit
        .samples
        .iter()
        .map(|path| SampleBuffer::load_wav(path, target_rate))
        .collect::<anyhow::Result<Vec<_>>>()
        .with_context(|| format!("loading kit {}", kit.name))?;
    info!(kit = %kit.name, pads = buffers.len(), "kit loaded");
    Ok(buffers)
}

fn index_wav_in_dir(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut wavs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            let hidden = file_name(path).starts_with('.');
            let is_wav = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
            path.is_file() && is_wav && !hidden
        })
        .collect();
    wavs.sort();
    Ok(wavs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::StereoFrame;

    fn silent_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();
    }

    fn make_kit(root: &Path, name: &str, files: &[&str]) {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        for f in files {
            silent_wav(&dir.join(f));
        }
    }

    #[test]
    fn finds_complete_kits_in_order() {
        let root = tempfile::tempdir().unwrap();
        make_kit(root.path(), "Kit-b", &["2.wav", "1.WAV", "3.wav"]);
        make_kit(root.path(), "kit-a", &["a.wav", "b.wav"]);
        make_kit(root.path(), "kit-short", &["a.wav"]);
        make_kit(root.path(), "loops", &["a.wav", "b.wav"]);
        fs::write(root.path().join("kit-file.wav"), b"not a dir").unwrap();

        let kits = find_kits(root.path(), 2).unwrap();
        let names: Vec<_> = kits.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["Kit-b", "kit-a"]);

        let first: Vec<_> = kits[0].samples.iter().map(|p| file_name(p)).collect();
        assert_eq!(first, ["1.WAV", "2.wav"]);
    }

    #[test]
    fn skips_hidden_and_non_wav_files() {
        let root = tempfile::tempdir().unwrap();
        make_kit(root.path(), "kit", &["a.wav", "._a.wav"]);
        fs::write(root.path().join("kit").join("notes.txt"), b"hi").unwrap();
        assert!(find_kits(root.path(), 2).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        assert!(find_kits(&root.path().join("drumkits"), 8).is_err());
    }

    #[test]
    fn loads_one_buffer_per_pad() {
        let root = tempfile::tempdir().unwrap();
        make_kit(root.path(), "kit1", &["a.wav", "b.wav", "c.wav"]);
        let kits = find_kits(root.path(), 3).unwrap();

        let buffers = load_kit(&kits[0], 8000).unwrap();
        assert_eq!(buffers.len(), 3);
        assert_eq!(buffers[0].data, vec![StereoFrame::zero(); 2]);
    }
}

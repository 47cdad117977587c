// Saving and loading the pattern bank.
//
// On disk a pattern is pad-major, one digit string per pad, digit position = step:
//
//   [{ "name": "basic",
//      "seq": [ "10000000 00000000 10000000 00000000",    <- kick
//               "00000000 10000000 00000000 10000000",    <- snare
//               ... one per pad ] }]
//
// Whitespace inside the strings is ignored so they can be grouped by beat.
// In memory the grid is transposed to step-major (see pattern.rs).
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::pipeline::pattern::{Pattern, PatternBank};
use crate::pipeline::templates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredPattern {
    pub name: String,
    pub seq: Vec<String>,
}

/// Parse pad-major digit strings into a step-major pattern.
pub fn parse_pattern<S: AsRef<str>>(name: &str, seq: &[S]) -> Result<Pattern> {
    let pads = seq
        .iter()
        .enumerate()
        .map(|(pad, line)| parse_line(name, pad, line.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let num_steps = pads.first().map(Vec::len).unwrap_or(0);
    if num_steps == 0 {
        return Err(Error::Parse(format!("pattern '{name}' is empty")));
    }
    if let Some(bad) = pads.iter().position(|p| p.len() != num_steps) {
        return Err(Error::Parse(format!(
            "pattern '{name}' pad {bad} has {} steps, expected {num_steps}",
            pads[bad].len()
        )));
    }

    let steps = (0..num_steps)
        .map(|step| pads.iter().map(|p| p[step]).collect())
        .collect();
    Pattern::new(name, steps).map_err(|e| Error::Parse(e.to_string()))
}

fn parse_line(name: &str, pad: usize, line: &str) -> Result<Vec<bool>> {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(Error::Parse(format!(
                "pattern '{name}' pad {pad}: unexpected '{other}'"
            ))),
        })
        .collect()
}

/// Transpose back to pad-major digit strings.
pub fn render_pattern(pattern: &Pattern) -> StoredPattern {
    let seq = (0..pattern.num_pads())
        .map(|pad| {
            pattern
                .steps()
                .iter()
                .map(|row| if row[pad] { '1' } else { '0' })
                .collect()
        })
        .collect();
    StoredPattern { name: pattern.name.clone(), seq }
}

pub fn load_patterns(path: &Path) -> Result<PatternBank> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let stored: Vec<StoredPattern> = serde_json::from_str(&data)?;
    let patterns = stored
        .iter()
        .map(|p| parse_pattern(&p.name, &p.seq))
        .collect::<Result<Vec<_>>>()?;
    if patterns.is_empty() {
        return Err(Error::Parse(format!("{} holds no patterns", path.display())));
    }
    // mismatched shapes are bad data here, not a bad call
    PatternBank::new(patterns).map_err(|e| Error::Parse(e.to_string()))
}

/// Load saved patterns, or fall back to a built-in template. Never fails.
pub fn load_or_template(path: &Path, load_demo: bool) -> PatternBank {
    match load_patterns(path) {
        Ok(bank) => {
            info!("loaded {} patterns from {}", bank.len(), path.display());
            return bank;
        }
        Err(Error::NotFound(_)) => info!("no saved patterns at {}", path.display()),
        Err(e) if e.is_parse() => warn!("ignoring unreadable saved patterns: {e}"),
        Err(e) => warn!("load_patterns: {e}"),
    }
    if load_demo {
        info!("no saved patterns, loading demo patterns");
        templates::demo()
    } else {
        info!("no saved patterns, loading blank pattern");
        templates::blank()
    }
}

// Save the bank to disk, creating the parent dir if needed. Only reads the bank.
pub fn save_patterns(path: &Path, bank: &PatternBank) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let stored: Vec<StoredPattern> = bank.patterns().iter().map(render_pattern).collect();
    let json = serde_json::to_string_pretty(&stored)?;
    std::fs::write(path, json)?;
    info!("saved {} patterns to {}", stored.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_transposes_to_step_major() {
        let p = parse_pattern("t", &["1010", "0011"]).unwrap();
        assert_eq!(p.num_steps(), 4);
        assert_eq!(p.num_pads(), 2);
        assert_eq!(p.row(0), &[true, false]);
        assert_eq!(p.row(2), &[true, true]);
        assert_eq!(p.row(3), &[false, true]);
    }

    #[test]
    fn parse_ignores_spaces() {
        let p = parse_pattern("t", &["1000 0000 1000 1000"]).unwrap();
        assert_eq!(p.num_steps(), 16);
        assert!(p.get(12, 0));
    }

    #[test]
    fn parse_rejects_bad_digits_and_ragged_rows() {
        assert!(parse_pattern("t", &["10x0"]).unwrap_err().is_parse());
        assert!(parse_pattern("t", &["1010", "10"]).unwrap_err().is_parse());
        assert!(parse_pattern::<&str>("t", &[]).unwrap_err().is_parse());
    }

    #[test]
    fn render_matches_disk_layout() {
        let p = parse_pattern("t", &["1010", "0011"]).unwrap();
        let stored = render_pattern(&p);
        assert_eq!(stored.name, "t");
        assert_eq!(stored.seq, vec!["1010".to_string(), "0011".to_string()]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_patterns(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn malformed_file_is_parse_error_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_patterns.json");
        std::fs::write(&path, "[{\"name\": \"x\", \"seq\": [\"12\"]}]").unwrap();
        assert!(load_patterns(&path).unwrap_err().is_parse());

        std::fs::write(&path, "not json").unwrap();
        assert!(load_patterns(&path).unwrap_err().is_parse());

        let bank = load_or_template(&path, true);
        assert_eq!(bank, templates::demo());
        let bank = load_or_template(&path, false);
        assert_eq!(bank, templates::blank());
    }

    #[test]
    fn empty_list_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved_patterns.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(load_patterns(&path).unwrap_err().is_parse());
    }

    #[test]
    fn save_then_load_restores_bank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("saved_patterns.json");
        let mut bank = templates::demo();
        bank.active_mut().set(5, 3, true);
        save_patterns(&path, &bank).unwrap();

        let loaded = load_patterns(&path).unwrap();
        assert_eq!(loaded.patterns(), bank.patterns());
    }

    #[test]
    fn save_into_unwritable_path_reports_io() {
        let dir = tempfile::tempdir().unwrap();
        // a file where the parent directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let bank = templates::blank();
        let err = save_patterns(&blocker.join("saved.json"), &bank).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(bank, templates::blank());
    }

    proptest! {
        #[test]
        fn disk_form_round_trips(
            grid in (1usize..40, 1usize..12).prop_flat_map(|(steps, pads)| {
                prop::collection::vec(prop::collection::vec(any::<bool>(), pads), steps)
            })
        ) {
            let pattern = Pattern::new("p", grid.clone()).unwrap();
            let stored = render_pattern(&pattern);
            let parsed = parse_pattern(&stored.name, &stored.seq).unwrap();
            prop_assert_eq!(parsed.steps(), grid.as_slice());
        }
    }
}

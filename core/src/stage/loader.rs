//! Stage definition loading
//!
//! Load stage definitions from TOML files. A file can hold several
//! `[[stage]]` tables; directories are walked recursively and files that
//! fail to load are reported and skipped so one bad file doesn't take the
//! whole set down.

use std::fs;
use std::path::Path;

use super::{StageConfig, StageDefinition, StageError};

/// Parse stage definitions from TOML text. `origin` names the source in
/// errors.
pub fn load_stages_from_str(
    content: &str,
    origin: &Path,
) -> Result<Vec<StageDefinition>, StageError> {
    let config: StageConfig = toml::from_str(content).map_err(|e| StageError::ParseToml {
        path: origin.to_path_buf(),
        source: e,
    })?;

    for stage in &config.stages {
        if let Err(reason) = stage.validate() {
            return Err(StageError::InvalidDefinition {
                path: origin.to_path_buf(),
                reason,
            });
        }
    }

    Ok(config.stages)
}

/// Load stage definitions from a single TOML file
pub fn load_stages_from_file(path: &Path) -> Result<Vec<StageDefinition>, StageError> {
    let content = fs::read_to_string(path).map_err(|e| StageError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_stages_from_str(&content, path)
}

/// Load all stage definitions from a directory (recursive)
pub fn load_stages_from_dir(dir: &Path) -> Result<Vec<StageDefinition>, StageError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stages = Vec::new();
    load_stages_recursive(dir, &mut stages)?;
    Ok(stages)
}

fn load_stages_recursive(
    dir: &Path,
    stages: &mut Vec<StageDefinition>,
) -> Result<(), StageError> {
    let entries = fs::read_dir(dir).map_err(|e| StageError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            load_stages_recursive(&path, stages)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match load_stages_from_file(&path) {
                Ok(file_stages) => {
                    for stage in &file_stages {
                        tracing::debug!(id = %stage.id, path = %path.display(), "loaded stage");
                    }
                    stages.extend(file_stages);
                }
                Err(e) => {
                    tracing::warn!("{e}");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stage_config() {
        let toml = r#"
[[stage]]
id = "test"
name = "Test Stage"
stage_length_secs = 301.0

[[stage.moves]]
label = "Opener"
duration_secs = 16.0

[[stage.moves]]
label = "Marker"
duration_secs = 4.0
skip = true

[[stage.break_timeline]]
label = "Break"
duration_secs = 10.0

[[stage.break_timeline]]
label = "End of Break"
duration_secs = 1.0

[[stage.break_timings]]
remaining_low_secs = 140.0
remaining_high_secs = 145.0
final_break_secs = 7.0
"#;

        let stages = load_stages_from_str(toml, Path::new("test.toml")).expect("parse failed");
        assert_eq!(stages.len(), 1);

        let stage = &stages[0];
        assert_eq!(stage.id, "test");
        assert_eq!(stage.moves.len(), 2);
        assert!(!stage.moves[0].skip);
        assert!(stage.moves[1].skip);
        assert_eq!(stage.break_timeline.len(), 2);
        assert_eq!(stage.break_timings.len(), 1);
        assert_eq!(stage.moves[0].duration_ms(), 16_000);
    }

    #[test]
    fn missing_tables_default_to_empty() {
        let toml = r#"
[[stage]]
id = "bare"
name = "Bare Stage"
"#;

        let stages = load_stages_from_str(toml, Path::new("test.toml")).expect("parse failed");
        assert_eq!(stages[0].stage_length_secs, 301.0);
        assert!(stages[0].moves.is_empty());
        assert!(stages[0].break_timeline.is_empty());
    }

    #[test]
    fn invalid_definition_is_rejected() {
        let toml = r#"
[[stage]]
id = ""
name = "No Id"
"#;

        let result = load_stages_from_str(toml, Path::new("test.toml"));
        assert!(matches!(
            result,
            Err(StageError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let toml = r#"
[[stage]]
id = "neg"
name = "Negative"

[[stage.moves]]
label = "Bad"
duration_secs = -3.0
"#;

        assert!(load_stages_from_str(toml, Path::new("test.toml")).is_err());
    }
}

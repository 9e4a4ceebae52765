// Data-driven runtime configuration.
//
// `SpellwrightConfig` is loaded from JSON (`--config <path>` in the CLI).
// Every field has a default, so an empty object `{}` is a valid config and
// a missing file argument means `SpellwrightConfig::default()`. CLI flags
// override whatever the file says.
//
// None of these settings affect spell content: sequential and parallel
// execution produce identical spells, and the corpus override only changes
// which validated corpus is used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SpellError;

/// How the three component generators are scheduled for one whisper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Execution {
    Sequential,
    /// Glyph, ritual and verse run concurrently via `rayon::join`.
    #[default]
    Parallel,
}

/// Output format of the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpellwrightConfig {
    pub execution: Execution,
    /// Corpus file to load instead of the embedded default.
    pub corpus_path: Option<PathBuf>,
    pub render: RenderFormat,
}

impl SpellwrightConfig {
    pub fn from_json(json: &str) -> Result<Self, SpellError> {
        serde_json::from_str(json).map_err(|e| SpellError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SpellError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SpellError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = SpellwrightConfig::from_json("{}").unwrap();
        assert_eq!(config, SpellwrightConfig::default());
        assert_eq!(config.execution, Execution::Parallel);
        assert_eq!(config.render, RenderFormat::Text);
        assert_eq!(config.corpus_path, None);
    }

    #[test]
    fn test_config_loads_from_json_string() {
        let json = r#"{
            "execution": "sequential",
            "corpus_path": "data/custom.json",
            "render": "json"
        }"#;
        let config = SpellwrightConfig::from_json(json).unwrap();
        assert_eq!(config.execution, Execution::Sequential);
        assert_eq!(config.corpus_path, Some(PathBuf::from("data/custom.json")));
        assert_eq!(config.render, RenderFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = SpellwrightConfig::from_json(r#"{"threads": 4}"#).unwrap_err();
        assert!(matches!(err, SpellError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_execution() {
        assert!(SpellwrightConfig::from_json(r#"{"execution": "gpu"}"#).is_err());
    }

    #[test]
    fn test_default_config_roundtrips() {
        let config = SpellwrightConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert_eq!(SpellwrightConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SpellwrightConfig::load(Path::new("/nonexistent/spellwright.json")).unwrap_err();
        assert!(matches!(err, SpellError::Config(_)));
    }
}

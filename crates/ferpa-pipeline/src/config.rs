use std::path::Path;
use std::time::Duration;

use ferpa_anonymize::detector::{DEFAULT_LABELS, DEFAULT_MIN_SCORE, DetectorSettings};
use ferpa_anonymize::placeholder::{DEFAULT_PLACEHOLDER_FORMAT, PlaceholderFormat};
use ferpa_anonymize::recognizers::remote::DEFAULT_TIMEOUT_MS;
use ferpa_core::models::entity::EntityType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_MAX_CONCURRENT_DOCUMENTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FerpaConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub anonymization: AnonymizationConfig,
    #[serde(default)]
    pub ferpa: FerpaPolicy,
    #[serde(default = "default_max_concurrent_documents")]
    pub max_concurrent_documents: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub statistical: StatisticalConfig,
    /// Regexes for school names; unset uses the built-in patterns.
    pub school_patterns: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticalConfig {
    pub enabled: bool,
    pub min_score: f64,
    pub labels: Vec<EntityType>,
    /// Remote NER service tried before the built-in patterns.
    pub remote: Option<RemoteRecognizerConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecognizerConfig {
    pub endpoint: String,
    #[serde(default = "default_remote_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizationConfig {
    pub placeholder_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FerpaPolicy {
    /// Must stay true; the pipeline refuses to start otherwise.
    pub anonymize_before_api: bool,
    pub log_all_api_calls: bool,
}

fn default_max_concurrent_documents() -> usize {
    DEFAULT_MAX_CONCURRENT_DOCUMENTS
}

fn default_remote_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for FerpaConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            detection: DetectionConfig::default(),
            anonymization: AnonymizationConfig::default(),
            ferpa: FerpaPolicy::default(),
            max_concurrent_documents: DEFAULT_MAX_CONCURRENT_DOCUMENTS,
        }
    }
}

impl Default for StatisticalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_score: DEFAULT_MIN_SCORE,
            labels: DEFAULT_LABELS.to_vec(),
            remote: None,
        }
    }
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            placeholder_format: DEFAULT_PLACEHOLDER_FORMAT.to_string(),
        }
    }
}

impl Default for FerpaPolicy {
    fn default() -> Self {
        Self {
            anonymize_before_api: true,
            log_all_api_calls: true,
        }
    }
}

impl RemoteRecognizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl FerpaConfig {
    /// Read, migrate and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        // Parse as raw JSON so we can run migrations before deserializing.
        let json: Value = serde_json::from_str(contents)?;
        let on_disk_version = json
            .get("config_version")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        let migrated = migrate(json, on_disk_version)?;
        let config: FerpaConfig = serde_json::from_value(migrated)?;
        config.validate()?;
        Ok(config)
    }

    /// Write to a temp file, restrict permissions, then rename over `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }

        // Always write the current version, regardless of what was loaded.
        let stamped = FerpaConfig {
            config_version: CURRENT_VERSION,
            ..self.clone()
        };
        let json = serde_json::to_string_pretty(&stamped)?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes()).map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }

        std::fs::rename(&tmp_path, path).map_err(write_err)?;

        tracing::info!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ferpa.anonymize_before_api {
            tracing::error!("ferpa.anonymize_before_api is disabled, refusing to start");
            return Err(ConfigError::Invalid(
                "ferpa.anonymize_before_api must be true".to_string(),
            ));
        }
        if self.max_concurrent_documents == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_documents must be at least 1".to_string(),
            ));
        }
        self.detector_settings()
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.placeholder_format()?;
        Ok(())
    }

    pub fn detector_settings(&self) -> DetectorSettings {
        let statistical = &self.detection.statistical;
        DetectorSettings {
            statistical_enabled: statistical.enabled,
            min_score: statistical.min_score,
            labels: statistical.labels.clone(),
            school_patterns: self.detection.school_patterns.clone(),
        }
    }

    pub fn placeholder_format(&self) -> Result<PlaceholderFormat, ConfigError> {
        PlaceholderFormat::new(self.anonymization.placeholder_format.as_str())
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: Value, from_version: u32) -> Result<Value, ConfigError> {
    if from_version > CURRENT_VERSION {
        return Err(ConfigError::TooNew {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }

    // v0 → v1: the NER block was called "presidio", either under
    // "detection" or at the top level, and placeholder_format was top-level.
    if from_version < 1 {
        let obj = json.as_object_mut().ok_or(ConfigError::NotAnObject)?;

        let top_level_ner = obj.remove("presidio");
        let top_level_format = obj.remove("placeholder_format");

        let detection = obj
            .entry("detection")
            .or_insert_with(|| Value::Object(Default::default()))
            .as_object_mut()
            .ok_or(ConfigError::NotAnObject)?;
        if let Some(mut legacy) = detection.remove("presidio").or(top_level_ner) {
            if let Some(block) = legacy.as_object_mut() {
                if let Some(threshold) = block.remove("score_threshold") {
                    block.entry("min_score").or_insert(threshold);
                }
            }
            detection.entry("statistical").or_insert(legacy);
        }

        if let Some(format) = top_level_format {
            let anonymization = obj
                .entry("anonymization")
                .or_insert_with(|| Value::Object(Default::default()))
                .as_object_mut()
                .ok_or(ConfigError::NotAnObject)?;
            anonymization.entry("placeholder_format").or_insert(format);
        }

        obj.insert("config_version".to_string(), Value::Number(1.into()));
        tracing::info!("migrated config v0 → v1 (presidio → detection.statistical)");
    }

    Ok(json)
}

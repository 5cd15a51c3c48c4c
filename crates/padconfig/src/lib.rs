//! TOML configuration for the fragpad playground.
//!
//! ```toml
//! version = 1
//! debounce = "500ms"
//! time_scale = 0.01
//!
//! [window]
//! width = 1280
//! height = 720
//! antialias = "auto"
//!
//! [export]
//! default_name = "shader"
//! extension = "frag"
//! directory = "/home/me/shaders"
//! ```
//!
//! Every key is optional; a missing file yields [`PlaygroundConfig::default`].

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntialiasSetting {
    Auto,
    Off,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

impl AntialiasSetting {
    pub fn from_samples(samples: u32) -> Option<Self> {
        match samples {
            0 | 1 => Some(Self::Off),
            2 => Some(Self::Samples2),
            4 => Some(Self::Samples4),
            8 => Some(Self::Samples8),
            16 => Some(Self::Samples16),
            _ => None,
        }
    }

    /// Explicit MSAA sample count, `None` for `Auto`.
    pub fn samples(self) -> Option<u32> {
        match self {
            Self::Auto => None,
            Self::Off => Some(1),
            Self::Samples2 => Some(2),
            Self::Samples4 => Some(4),
            Self::Samples8 => Some(8),
            Self::Samples16 => Some(16),
        }
    }
}

impl Default for AntialiasSetting {
    fn default() -> Self {
        Self::Auto
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub version: u32,
    #[serde(deserialize_with = "deserialize_millis")]
    pub debounce: Duration,
    pub time_scale: f32,
    pub window: WindowSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    pub width: u32,
    pub height: u32,
    pub title: String,
    #[serde(deserialize_with = "deserialize_antialias")]
    pub antialias: AntialiasSetting,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub default_name: String,
    pub extension: String,
    pub directory: Option<PathBuf>,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            debounce: Duration::from_millis(500),
            time_scale: 0.01,
            window: WindowSection::default(),
            export: ExportSection::default(),
        }
    }
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "fragpad".to_string(),
            antialias: AntialiasSetting::default(),
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            default_name: "shader".to_string(),
            extension: "frag".to_string(),
            directory: None,
        }
    }
}

impl PlaygroundConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: PlaygroundConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads and validates `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Like [`PlaygroundConfig::load`] but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        if self.debounce.is_zero() {
            return Err(ConfigError::Invalid(
                "debounce must be greater than zero".into(),
            ));
        }

        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time_scale must be a positive number, got {}",
                self.time_scale
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.export.default_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "export.default_name may not be empty".into(),
            ));
        }

        let extension = self.export.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "export.extension '{}' is not a valid file extension",
                self.export.extension
            )));
        }

        Ok(())
    }
}

/// Durations are human-readable strings ("750ms", "1s") or bare numbers of
/// milliseconds.
fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of milliseconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_millis(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_millis(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v / 1000.0))
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn deserialize_antialias<'de, D>(deserializer: D) -> Result<AntialiasSetting, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Num(i64),
    }

    match Helper::deserialize(deserializer)? {
        Helper::Str(raw) => parse_antialias(&raw).map_err(de::Error::custom),
        Helper::Num(value) => {
            if value < 0 {
                return Err(de::Error::custom("antialias value must be non-negative"));
            }
            parse_antialias(&value.to_string()).map_err(de::Error::custom)
        }
    }
}

/// Parses `auto`, `off` or an MSAA sample count.
pub fn parse_antialias(raw: &str) -> Result<AntialiasSetting, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(AntialiasSetting::Auto),
        "off" | "none" | "disable" | "disabled" | "0" | "1" => Ok(AntialiasSetting::Off),
        "2" => Ok(AntialiasSetting::Samples2),
        "4" => Ok(AntialiasSetting::Samples4),
        "8" => Ok(AntialiasSetting::Samples8),
        "16" => Ok(AntialiasSetting::Samples16),
        other => Err(format!("invalid antialias setting '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
version = 1
debounce = "750ms"
time_scale = 0.001

[window]
width = 800
height = 600
title = "scratch"
antialias = 4

[export]
default_name = "sketch"
extension = ".glsl"
directory = "/tmp/exports"
"#;

    #[test]
    fn parses_sample_config() {
        let config = PlaygroundConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.debounce, Duration::from_millis(750));
        assert_eq!(config.time_scale, 0.001);
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert_eq!(config.window.title, "scratch");
        assert_eq!(config.window.antialias, AntialiasSetting::Samples4);
        assert_eq!(config.export.default_name, "sketch");
        assert_eq!(config.export.directory, Some(PathBuf::from("/tmp/exports")));
    }

    #[test]
    fn empty_input_yields_defaults() {
        let config = PlaygroundConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlaygroundConfig::default());
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.export.extension, "frag");
    }

    #[test]
    fn bare_debounce_number_is_milliseconds() {
        let config = PlaygroundConfig::from_toml_str("debounce = 250").unwrap();
        assert_eq!(config.debounce, Duration::from_millis(250));
    }

    #[test]
    fn rejects_invalid_values() {
        for input in [
            "version = 2",
            "debounce = 0",
            "time_scale = -1.0",
            "[window]\nwidth = 0",
            "[export]\ndefault_name = \"  \"",
            "[export]\nextension = \"a/b\"",
        ] {
            let err = PlaygroundConfig::from_toml_str(input).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{input}: {err}");
        }
    }

    #[test]
    fn rejects_malformed_antialias() {
        let err = PlaygroundConfig::from_toml_str("[window]\nantialias = \"3\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("config.toml");
        assert_eq!(
            PlaygroundConfig::load_or_default(&missing).unwrap(),
            PlaygroundConfig::default()
        );

        fs::write(&missing, "debounce = \"1s\"").unwrap();
        let loaded = PlaygroundConfig::load_or_default(&missing).unwrap();
        assert_eq!(loaded.debounce, Duration::from_secs(1));
        assert!(matches!(
            PlaygroundConfig::load(&dir.path().join("nope.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}

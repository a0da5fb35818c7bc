//! Pipeline configuration.
//!
//! One explicit [`PackConfig`] value is threaded through the pipeline
//! instead of ambient global state. Defaults match the classic workflow
//! (pack `./input` into `./output.image`, flash at `0x12000`); a
//! `flashpack.toml` in the working directory overrides them, and CLI
//! arguments override both.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Source directory packed when none is given.
pub const DEFAULT_SOURCE_DIR: &str = "input";

/// Default image output path.
pub const DEFAULT_OUTPUT: &str = "output.image";

/// Flasher binary used when the config names none.
pub const DEFAULT_ESPTOOL: &str = "esptool.py";

/// Flash offset of the filesystem region on ESP8266 devices.
pub const DEFAULT_BASE_ADDRESS: u32 = 0x12000;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "flashpack.toml";

/// Everything the pipeline needs, resolved once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    pub source_dir: PathBuf,
    pub output: PathBuf,
    /// Flasher binary name or path, resolved via PATH at upload time.
    pub esptool: String,
    /// Device flash offset the image is written to. A deployment
    /// convention between this tool and the device-side reader; nothing
    /// in the image depends on it.
    pub base_address: u32,
    pub port: Option<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            esptool: DEFAULT_ESPTOOL.to_string(),
            base_address: DEFAULT_BASE_ADDRESS,
            port: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    image: Option<ImageToml>,
    flash: Option<FlashToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImageToml {
    source_dir: Option<PathBuf>,
    output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FlashToml {
    esptool: Option<String>,
    base_address: Option<u32>,
    port: Option<String>,
}

impl PackConfig {
    /// Load configuration, merging the config file over the defaults.
    ///
    /// An explicit `path` must exist and parse. With `None`, a
    /// `flashpack.toml` in the working directory is used when present and
    /// a missing file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = PathBuf::from(CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("reading config '{}'", config_path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("parsing config '{}'", config_path.display()))
    }

    fn from_toml(raw: &str) -> Result<Self> {
        let parsed: ConfigToml = toml::from_str(raw)?;
        let mut config = Self::default();

        if let Some(image) = parsed.image {
            if let Some(source_dir) = image.source_dir {
                config.source_dir = source_dir;
            }
            if let Some(output) = image.output {
                config.output = output;
            }
        }
        if let Some(flash) = parsed.flash {
            if let Some(esptool) = flash.esptool {
                config.esptool = esptool;
            }
            if let Some(base_address) = flash.base_address {
                config.base_address = base_address;
            }
            if let Some(port) = flash.port {
                config.port = Some(port);
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_the_classic_workflow() {
        let config = PackConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("input"));
        assert_eq!(config.output, PathBuf::from("output.image"));
        assert_eq!(config.esptool, "esptool.py");
        assert_eq!(config.base_address, 0x12000);
        assert!(config.port.is_none());
    }

    #[test]
    fn test_full_config_overrides_everything() {
        let config = PackConfig::from_toml(
            r#"
            [image]
            source_dir = "web"
            output = "site.image"

            [flash]
            esptool = "/opt/esptool/esptool.py"
            base_address = 0x40000
            port = "/dev/ttyUSB0"
            "#,
        )
        .unwrap();

        assert_eq!(config.source_dir, PathBuf::from("web"));
        assert_eq!(config.output, PathBuf::from("site.image"));
        assert_eq!(config.esptool, "/opt/esptool/esptool.py");
        assert_eq!(config.base_address, 0x40000);
        assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB0"));
    }

    #[test]
    fn test_partial_config_keeps_remaining_defaults() {
        let config = PackConfig::from_toml("[image]\nsource_dir = \"web\"\n").unwrap();
        assert_eq!(config.source_dir, PathBuf::from("web"));
        assert_eq!(config.output, PathBuf::from("output.image"));
        assert_eq!(config.base_address, 0x12000);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = PackConfig::from_toml("[image]\nsource = \"typo\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("flashpack.toml");
        fs::write(&path, "[flash]\nport = \"/dev/ttyACM0\"\n").unwrap();

        let config = PackConfig::load(Some(&path)).unwrap();
        assert_eq!(config.port.as_deref(), Some("/dev/ttyACM0"));
    }

    #[test]
    fn test_load_explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let result = PackConfig::load(Some(&temp.path().join("missing.toml")));
        assert!(result.is_err());
    }
}

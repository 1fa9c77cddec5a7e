use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::protocol::constants::{DEFAULT_COMPRESSED_SUFFIX, DEFAULT_UNCOMPRESSED_MARKER};

pub const DEFAULT_CONFIG_FILE: &str = "huffpack.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub compressed_suffix: String,
    pub uncompressed_marker: String,
    pub log_filter: String,
    pub overwrite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compressed_suffix: DEFAULT_COMPRESSED_SUFFIX.to_string(),
            uncompressed_marker: DEFAULT_UNCOMPRESSED_MARKER.to_string(),
            log_filter: "huffpack=info".to_string(),
            overwrite: true,
        }
    }
}

impl Config {
    /// Reads `config_path` (or `huffpack.toml`) when it exists, otherwise
    /// falls back to defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_file = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

        if config_file.exists() {
            let content = std::fs::read_to_string(config_file)
                .with_context(|| format!("reading {}", config_file.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", config_file.display()))?;
            tracing::debug!("Loaded config from {:?}", config_file);
            Ok(config)
        } else if config_path.is_some() {
            anyhow::bail!("config file {} does not exist", config_file.display())
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)
            .with_context(|| format!("writing {}", config_path.display()))?;
        Ok(())
    }

    /// `name.ext` -> `name.ext.huf`
    pub fn compressed_path(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_os_string();
        name.push(&self.compressed_suffix);
        PathBuf::from(name)
    }

    /// `name.ext.huf` -> `name_unc.ext`. The marker goes before the first
    /// `.` of the file name, or at the end when there is none.
    pub fn decompressed_path(&self, input: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name
            .strip_suffix(self.compressed_suffix.as_str())
            .unwrap_or(&file_name);

        let renamed = match stem.find('.') {
            Some(dot) if dot > 0 => format!(
                "{}{}{}",
                &stem[..dot],
                self.uncompressed_marker,
                &stem[dot..]
            ),
            _ => format!("{}{}", stem, self.uncompressed_marker),
        };
        input.with_file_name(renamed)
    }
}

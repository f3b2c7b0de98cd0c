use config::{Config, ConfigError, Environment, File as ConfigFile};
use glob::Pattern;
use serde::Deserialize;

use crate::error::Error;
use crate::packer::OversizePolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Glob matched against file names (not full paths).
    pub file_pattern: String,
    /// Folder that receives loose data files during segregation.
    pub holding_folder: String,
    /// Prefix of the numbered subfolders the distribute flow creates.
    pub subfolder_prefix: String,
    pub manifest_file_name: String,
    pub on_oversized_file: OversizePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            file_pattern: "*.pod5".to_string(),
            holding_folder: "pod5_segregated_folder".to_string(),
            subfolder_prefix: "subfolder_".to_string(),
            manifest_file_name: "partitions.json".to_string(),
            on_oversized_file: OversizePolicy::Reject,
        }
    }
}

impl AppConfig {
    pub fn file_matcher(&self) -> Result<Pattern, Error> {
        Pattern::new(&self.file_pattern).map_err(|source| Error::InvalidPattern {
            pattern: self.file_pattern.clone(),
            source,
        })
    }
}

/// Defaults, then an optional `Config.*` file, then `PODSPLIT_*` variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("file_pattern", defaults.file_pattern)?
        .set_default("holding_folder", defaults.holding_folder)?
        .set_default("subfolder_prefix", defaults.subfolder_prefix)?
        .set_default("manifest_file_name", defaults.manifest_file_name)?
        .set_default("on_oversized_file", "reject")?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("PODSPLIT"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

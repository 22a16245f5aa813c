use std::{fs, path::Path};

use forgework_smithing::SmithingConfig;
use tracing::warn;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config/smithing.toml";

/// Load smithing settings, falling back to defaults on any error.
///
/// A missing default file is expected and only noted; an explicit path that
/// cannot be read or parsed is reported.
pub fn load_smithing_config(path: Option<&Path>) -> SmithingConfig {
    let explicit = path.is_some();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    match fs::read_to_string(path) {
        Ok(contents) => parse_smithing_config(&contents, path),
        Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no smithing config, using defaults");
            SmithingConfig::default()
        }
        Err(err) => {
            warn!("Failed to read {}: {err}. Using defaults", path.display());
            SmithingConfig::default()
        }
    }
}

fn parse_smithing_config(contents: &str, path: &Path) -> SmithingConfig {
    match toml::from_str::<SmithingConfig>(contents) {
        Ok(config) => config,
        Err(err) => {
            warn!("Failed to parse {}: {err}. Using defaults", path.display());
            SmithingConfig::default()
        }
    }
}

//! Configuration loading utilities

use crate::settings::ConfigValidationError;
use crate::Settings;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};

pub const DEFAULT_CONFIG_PATH: &str = "config/config";
pub const ENV_PREFIX: &str = "ANCHOR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
	#[error("Failed to read configuration: {0}")]
	Config(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Validation(#[from] ConfigValidationError),
}

/// Load `config/config.*` overlaid with `ANCHOR_*` environment variables
///
/// Nested keys use a double underscore, e.g. `ANCHOR_NETWORK__HORIZON_URL`.
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	load_config_from(DEFAULT_CONFIG_PATH)
}

/// Same as [`load_config`] with an explicit file path (extension optional)
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let builder = Config::builder().add_source(File::with_name(path).required(false));
	finish(builder)
}

/// Parse settings from a TOML document, still honouring environment overrides
pub fn load_config_from_str(toml: &str) -> Result<Settings, ConfigLoadError> {
	let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
	finish(builder)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigLoadError> {
	let settings: Settings = builder
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.prefix_separator("_")
				.separator("__")
				.try_parsing(true),
		)
		.build()?
		.try_deserialize()?;

	settings.validate()?;
	Ok(settings)
}

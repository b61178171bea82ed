//! Anchor Configuration
//!
//! Settings loading and startup logging for the anchor transfer client.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, load_config_from_str, ConfigLoadError};
pub use settings::{
	AssetConfig, AuthSettings, ConfigValidationError, LogFormat, LoggingSettings, NetworkSettings,
	Settings, TimeoutSettings, WalletSettings,
};
pub use startup_logger::{log_discovery_complete, log_service_info};

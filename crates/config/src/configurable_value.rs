//! Secret values that come from the environment or straight from the config file

use anchor_types::AuthToken;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A secret configured either as an environment variable name or in plain text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigurableValue {
	/// "env" reads the variable named in `value`, "plain" uses `value` as is
	#[serde(rename = "type")]
	pub value_type: ValueType,
	pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Env,
	Plain,
}

impl ConfigurableValue {
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
		}
	}

	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
		}
	}

	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self.value_type {
			ValueType::Env => std::env::var(&self.value).map_err(|_| {
				ConfigurableValueError::EnvironmentVariableNotFound(self.value.clone())
			}),
			ValueType::Plain => Ok(self.value.clone()),
		}
	}

	/// Resolve into a bearer token; blank values are rejected
	pub fn resolve_token(&self) -> Result<AuthToken, ConfigurableValueError> {
		let resolved = self.resolve()?;
		if resolved.trim().is_empty() {
			return Err(ConfigurableValueError::Empty(self.description()));
		}
		Ok(AuthToken::new(resolved))
	}

	/// Plain secrets end up in config files and shell history
	pub fn is_plain(&self) -> bool {
		matches!(self.value_type, ValueType::Plain)
	}

	/// Where the value comes from, safe to log
	pub fn description(&self) -> String {
		match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "configured plain value".to_string(),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),

	#[error("Value from {0} is empty")]
	Empty(String),
}

// Never print plain secrets
impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
		}
	}
}

/// `env:NAME` selects an environment variable, anything else is plain
impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		if let Some(env_var) = value.strip_prefix("env:") {
			Self::from_env(env_var)
		} else {
			Self::from_plain(value)
		}
	}
}

impl From<String> for ConfigurableValue {
	fn from(value: String) -> Self {
		ConfigurableValue::from(value.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::env;

	#[test]
	fn test_plain_value() {
		let config = ConfigurableValue::from_plain("anchor-jwt");
		assert_eq!(config.value_type, ValueType::Plain);
		assert_eq!(config.resolve().unwrap(), "anchor-jwt");
		assert!(config.is_plain());
	}

	#[test]
	fn test_env_value() {
		env::set_var("ANCHOR_TEST_TOKEN", "token-from-env");

		let config = ConfigurableValue::from_env("ANCHOR_TEST_TOKEN");
		assert_eq!(config.resolve().unwrap(), "token-from-env");
		assert_eq!(
			config.resolve_token().unwrap().expose_secret(),
			"token-from-env"
		);

		env::remove_var("ANCHOR_TEST_TOKEN");
	}

	#[test]
	fn test_env_value_not_found() {
		let config = ConfigurableValue::from_env("ANCHOR_TEST_MISSING_TOKEN");
		assert!(matches!(
			config.resolve(),
			Err(ConfigurableValueError::EnvironmentVariableNotFound(_))
		));
	}

	#[test]
	fn test_blank_token_is_rejected() {
		let config = ConfigurableValue::from_plain("   ");
		assert!(matches!(
			config.resolve_token(),
			Err(ConfigurableValueError::Empty(_))
		));
	}

	#[test]
	fn test_from_string_conversion() {
		let plain_config = ConfigurableValue::from("plain-value");
		assert_eq!(plain_config.value_type, ValueType::Plain);

		let env_config = ConfigurableValue::from("env:ANCHOR_TOKEN");
		assert_eq!(env_config.value_type, ValueType::Env);
		assert_eq!(env_config.value, "ANCHOR_TOKEN");
	}

	#[test]
	fn test_display_redacts_plain_values() {
		assert_eq!(
			ConfigurableValue::from_plain("secret").to_string(),
			"plain:[REDACTED]"
		);
		assert_eq!(
			ConfigurableValue::from_env("ANCHOR_TOKEN").to_string(),
			"env:ANCHOR_TOKEN"
		);
	}

	#[test]
	fn test_serde_shape() {
		let config = ConfigurableValue::from_env("ANCHOR_TOKEN");

		let json = serde_json::to_string(&config).unwrap();
		assert!(json.contains("\"type\":\"env\""));

		let deserialized: ConfigurableValue = serde_json::from_str(&json).unwrap();
		assert_eq!(deserialized, config);
	}
}

//! Shared domain models used across adapters and services

pub mod asset;
pub mod auth_token;
pub mod domain_config;
pub mod memo;

pub use asset::Asset;
pub use auth_token::AuthToken;
pub use domain_config::{CurrencyEntry, DomainConfig, DOMAIN_CONFIG_PATH};
pub use memo::{Memo, MemoType};

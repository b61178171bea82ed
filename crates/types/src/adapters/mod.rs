//! Collaborator interfaces implemented by the adapters crate

pub mod traits;

pub use traits::{AccountLedger, AnchorResponse, DomainConfigResolver, TransferServerClient};

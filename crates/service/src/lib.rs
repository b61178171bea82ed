//! Anchor Service
//!
//! Transfer server discovery, capability aggregation and transfer execution.

pub mod discovery;
pub mod executor;
pub mod failures;
pub mod mapper;
pub mod resolver;
pub mod transactions;
pub mod transfer_info;

pub use discovery::{DiscoveryService, TransferServerCache};
pub use executor::{classify_response, TransferService};
pub use failures::ItemFailure;
pub use mapper::ordered_concurrent_map;
pub use resolver::{IssuerResolver, ResolvedTransferServer};
pub use transfer_info::{AssetTransferInfos, TransferInfoService};

//! CaaS connection and resource records for the Dimension Data cloud.
//!
//! Provides an authenticated connection for both API generations, response
//! decoding with provider error mapping, and the plain records driver code
//! returns to its callers.

#![deny(missing_docs)]

pub mod connection;
pub mod models;
pub mod response;

pub use connection::{Connection, ConnectionBuilder};
pub use models::{
    Network, NetworkDomain, OperationStatus, Pool, PoolMember, VipNode, Vlan, VirtualListener,
};
pub use response::parse_response;

/// Convenient result alias sharing the `dimensiondata-core` error type.
pub type Result<T> = dimensiondata_core::Result<T>;

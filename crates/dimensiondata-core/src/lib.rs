//! # dimensiondata-core
//!
//! Core types and utilities for working with the Dimension Data CaaS API.
//!
//! This crate provides the error taxonomy, the static region table, XML lookup
//! helpers and HTTP client configuration shared by the CaaS client crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and provider error-code mapping
//! - [`region`] - Static table of API regions and their hosts
//! - [`xml`] - Namespace-aware XML lookup helpers
//! - [`config`] - Deserializable connection configuration
//! - [`client`] - HTTP client tuning and API version constants

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod region;
pub mod xml;

// Re-export commonly used types
pub use error::{Error, ErrorCode, Result};
pub use region::{Region, DEFAULT_REGION};

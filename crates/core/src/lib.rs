//! Core functionality for the crev web of trust.
//!
//! This crate provides the fundamental types, encodings and on-disk layout
//! shared by the identity, proof and trust graph crates.

pub mod config;
pub mod encoding;
pub mod error;
pub mod logging;
pub mod paths;
pub mod types;

pub use config::{CrevConfig, CurrentId, CONFIG_FORMAT_VERSION};
pub use encoding::{from_base64, to_base64};
pub use error::{Error, Result};
pub use paths::CrevPaths;
pub use types::{IdType, Level, PublicId, Rating, TrustLevel};

//! Configuration module for the charity ledger
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Persisted user settings (local UTC offset, year floor, narrative command)

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;

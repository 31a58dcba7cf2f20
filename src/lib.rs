//! EDS Alert support library
//!
//! Geo math, display formatting, device capability wrappers, expiring
//! key-value storage and the offline cache worker behind the EDS speed-camera
//! alert app.

pub mod analytics;
pub mod assess;
pub mod capability;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod format;
pub mod geo;
pub mod shortcuts;
pub mod storage;
pub mod worker;

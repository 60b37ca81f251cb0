pub mod config;
pub mod logging;

// Verification pipeline: build lookup -> manifest fetch -> normalization -> reconciliation.
pub mod builds;
pub mod checksum;
pub mod expected;
pub mod fetch;
pub mod gameinfo;
pub mod manifest;
pub mod options;
pub mod reconcile;

//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod chat_transport;
pub mod config_store;
pub mod issue_tracker;
pub mod minutes_logger;

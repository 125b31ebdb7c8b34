//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod command;
pub mod session_registry;
pub mod triage_controller;

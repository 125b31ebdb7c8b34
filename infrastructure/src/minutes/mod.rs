//! Meeting minutes persistence.
//!
//! Provides [`JsonlMinutesLogger`], a JSONL writer that implements the
//! [`MinutesLogger`](triage_application::MinutesLogger) port.

mod jsonl_minutes;

pub use jsonl_minutes::JsonlMinutesLogger;

//! Issue queue
//!
//! - [`IssueQueue`]: the tracker's ordered issue list, materialised once per fetch
//! - [`build_candidates`]: the stable two-partition ordering used by `next`

mod builder;

pub use builder::{IssueQueue, build_candidates};

//! Output module for extraction reports
//!
//! This module handles:
//! - The success and failure report shapes of a single extraction
//! - Rendering either shape as 4-space indented JSON

mod report;

pub use report::{render_json, ExtractOutcome, FetchError, FetchResult, NO_TITLE};

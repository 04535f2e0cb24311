//! URL handling module for Sumi-Links
//!
//! This module provides href resolution against a page's base URL and the
//! scheme defaulting applied to user-supplied targets.

mod resolve;
mod scheme;

// Re-export main functions
pub use resolve::resolve_href;
pub use scheme::{ensure_scheme, is_web_scheme};

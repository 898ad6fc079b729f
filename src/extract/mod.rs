//! Content extraction module
//!
//! Locates the main-content container for a page and pulls structured
//! text out of it.

mod container;
mod content;

pub use container::{remove_noise, select_container};
pub use content::extract;

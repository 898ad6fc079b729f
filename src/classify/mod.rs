//! Page classification module
//!
//! Assigns each page a type label from its URL shape (and document shape
//! when available), and decides whether classified pages are content-rich
//! enough to extract.

mod page_type;
mod richness;

pub use page_type::{classify, AVOID_PAGE_TYPES, CONTENT_PAGE_TYPES};
pub use richness::{is_avoid_type, is_content_rich, is_content_type};

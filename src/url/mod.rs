//! URL handling module for kb-harvest
//!
//! Provides relative-link resolution, canonical cleaning driven by the site
//! rule table, and domain extraction/comparison helpers.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_internal_link};
pub use normalize::{clean, normalize};

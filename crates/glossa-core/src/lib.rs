//! # glossa-core
//!
//! Core types, traits and the keyword-linking engine for glossa.
//!
//! This crate provides the data structures and trait definitions that the
//! database and API crates depend on, plus the pieces of the linker that do
//! not touch any store: the [`KeywordIndex`], the [`Linker`] and the
//! per-request [`RequestContext`].

pub mod context;
pub mod defaults;
pub mod error;
pub mod keyword_index;
pub mod linker;
pub mod memory;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use context::RequestContext;
pub use error::{Error, Result};
pub use keyword_index::KeywordIndex;
pub use linker::{escape_html, htmlify, keyword_path, Linker};
pub use models::*;
pub use traits::*;

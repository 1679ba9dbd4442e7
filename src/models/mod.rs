//! Data models for the library catalog

pub mod book;
pub mod member;

// Re-export commonly used types
pub use book::{Book, BookKind};
pub use member::Member;

//! Content stream parsing.
//!
//! - `content` - Lexer turning decoded content-stream bytes into raw operator events

pub mod content;

pub use content::ContentParser;

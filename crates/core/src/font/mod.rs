//! Font-facing lookups for the interpreter.
//!
//! Fonts themselves are never parsed here; this module only defines the
//! metrics port the run builder queries, plus its reference backends.

pub mod metrics;

// Re-export main types for convenience
pub use metrics::{FontWidths, GlyphMetrics, WidthTableMetrics, ZeroMetrics};

//! High-level API module for run extraction.
//!
//! # Example
//!
//! ```
//! use textrun_core::api::extract_runs;
//!
//! let runs = extract_runs(b"BT /F1 12 Tf 72 700 Td (Hi) Tj ET", None).unwrap();
//! assert_eq!(runs.len(), 2);
//! assert_eq!((runs[0].x, runs[0].y), (72.0, 700.0));
//! ```

pub mod high_level;

// Re-export for convenience
pub use high_level::{
    PageRuns, extract_runs, extract_runs_with, interpret_pages, interpret_pages_parallel,
    page_events,
};

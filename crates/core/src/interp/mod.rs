//! Content stream interpretation and run output.
//!
//! This module contains:
//! - `event`: Raw and validated operator events
//! - `interpreter`: The operator dispatcher owning the text state stack
//! - `device`: The run builder that places characters
//! - `ops`: Operator implementations
//! - `params`: Interpretation options

pub mod device;
pub mod event;
pub mod interpreter;
pub mod ops;
pub mod params;

// Re-export main types for convenience
pub use device::{RunBuilder, WORD_SEPARATOR};
pub use event::{EventKind, Operand, Operator, RawEvent, TextSeq, TextSeqItem};
pub use interpreter::TextRunInterpreter;
pub use params::InterpretOptions;

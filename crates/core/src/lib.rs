//! textrun - PDF text-operator interpreter producing positioned text runs.
//!
//! Feed it a page's content-stream operators (as typed events, or as decoded
//! content-stream bytes through the `parser` module) and it returns one
//! `SpatialObject` per shown character, located by composing the text
//! rendering matrix with the text matrix.

pub mod api;
pub mod error;
pub mod font;
pub mod interp;
pub mod model;
pub mod parser;
pub mod utils;

pub use api::{PageRuns, extract_runs, interpret_pages};
pub use error::{InterpError, Result};
pub use font::{GlyphMetrics, ZeroMetrics};
pub use interp::{InterpretOptions, Operand, RawEvent, TextRunInterpreter};
pub use model::{SpatialObject, TextState, TextStateStack};
pub use utils::Matrix3;

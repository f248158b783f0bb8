//! Text-rendering data model.
//!
//! - `state` - Text graphics state frames and their stack (TextState, TextStateStack)
//! - `run` - Positioned output records (SpatialObject)

pub mod run;
pub mod state;

// Re-export main types for convenience
pub use run::SpatialObject;
pub use state::{FontHandle, TextState, TextStateStack};

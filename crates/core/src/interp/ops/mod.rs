//! Content stream operator implementations.
//!
//! - `text` - Page scope, text state, positioning and showing (BT, ET, Tc, Tw, Tz, TL, Tf, Ts, Td, TD, Tm, T*, Tj, TJ, ', ")

mod text;

// Note: text.rs defines an impl block for TextRunInterpreter,
// so no pub use is needed - the methods are automatically available on the type.

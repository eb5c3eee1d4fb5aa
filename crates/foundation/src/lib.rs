pub mod color;
pub mod easing;
pub mod math;
pub mod text;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use color::*;
pub use easing::*;
pub use time::*;

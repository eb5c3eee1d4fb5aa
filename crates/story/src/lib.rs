//! Scroll-driven presentation effects around the map.
//!
//! Nothing here touches the DOM. The page reports element geometry and scroll
//! offsets; the effects answer with poses, counter text and scrubbed offsets.

pub mod board;
pub mod counter;
pub mod reveal;
pub mod scrub;

pub use board::*;
pub use counter::*;
pub use reveal::*;
pub use scrub::*;

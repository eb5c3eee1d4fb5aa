pub mod event_bus;
pub mod frame;
pub mod scroll;
pub mod transition;

pub use event_bus::*;
pub use frame::*;
pub use scroll::*;
pub use transition::*;

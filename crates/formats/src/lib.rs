pub mod dataset;
pub mod error;
pub mod gate;
pub mod shape;
pub mod topology;

pub use dataset::*;
pub use error::*;
pub use gate::*;
pub use shape::*;
pub use topology::*;

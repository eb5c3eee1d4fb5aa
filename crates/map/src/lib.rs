pub mod camera;
pub mod config;
pub mod connections;
pub mod controller;
pub mod events;
pub mod panel;
pub mod resolver;
pub mod scenes;
pub mod selection;
pub mod world;

pub use camera::*;
pub use config::*;
pub use connections::*;
pub use controller::*;
pub use events::*;
pub use panel::*;
pub use resolver::*;
pub use scenes::*;
pub use selection::*;
pub use world::*;

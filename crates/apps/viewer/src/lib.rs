pub mod config;
pub mod loader;
pub mod map;

pub use config::*;
pub use loader::*;
pub use map::*;

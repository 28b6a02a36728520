pub mod zoom;

pub use zoom::*;

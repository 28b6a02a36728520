pub mod feature;
pub mod geometry;
pub mod join;
pub mod topojson;
pub mod tsv;

pub use feature::*;
pub use geometry::*;
pub use join::*;
pub use topojson::*;
pub use tsv::*;

pub mod node;
pub mod reconcile;
pub mod svg;
pub mod transform;
pub mod tree;

pub use node::*;
pub use reconcile::*;
pub use transform::*;
pub use tree::*;

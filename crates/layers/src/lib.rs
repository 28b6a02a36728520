pub mod countries;
pub mod layer;
pub mod legend;
pub mod palette;
pub mod path;
pub mod symbology;

pub use countries::*;
pub use layer::*;
pub use legend::*;
pub use palette::*;
pub use path::*;
pub use symbology::*;

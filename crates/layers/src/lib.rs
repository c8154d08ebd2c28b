pub mod compositor;
pub mod isochrones;
pub mod labels;
pub mod layer;
pub mod legend;
pub mod symbology;
pub mod vector;

pub use compositor::*;
pub use isochrones::*;
pub use layer::*;
pub use legend::*;

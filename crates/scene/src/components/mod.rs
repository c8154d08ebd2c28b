pub mod hour_feature;
pub mod vector_geometry;

pub use hour_feature::*;
pub use vector_geometry::*;

pub mod bearing;
pub mod bounds;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bearing::*;
pub use bounds::*;
pub use time::*;

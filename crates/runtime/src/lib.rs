pub mod event_bus;
pub mod timer;

pub use event_bus::*;
pub use timer::*;

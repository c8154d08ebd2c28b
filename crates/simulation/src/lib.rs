pub mod client;
pub mod error;
pub mod export;
pub mod protocol;
pub mod summary;

pub use client::*;
pub use error::*;
pub use export::*;
pub use protocol::*;
pub use summary::*;

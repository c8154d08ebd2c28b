//! Interactive session state for the FeuCast client.
//!
//! A [`Session`] owns everything that changes while a user works: the drawn
//! perimeter, the last simulation result and its hour index, the playback
//! cursor and timer, and the visible overlay. Side effects meant for the UI are
//! queued as [`ViewEvent`]s. The [`Driver`] runs a session on a single tokio
//! task, interleaving user commands, service calls and timer ticks.

pub mod commands;
pub mod controls;
pub mod driver;
pub mod events;
pub mod orchestrator;
pub mod playback;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use commands::*;
pub use controls::*;
pub use driver::*;
pub use events::*;
pub use orchestrator::*;
pub use playback::*;
pub use session::*;

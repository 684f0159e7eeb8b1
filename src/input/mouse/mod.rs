//! Input and state handling for the mouse.
//!
//! A [`Mouse`] is owned by the thread which receives the platform's mouse
//! events and forwards them to its [`Backend`]. Any thread may poll the
//! resulting [`MouseState`] through a [`MouseHandle`] without blocking.

mod backend;
mod device;
mod event;
mod state;
mod tracker;

pub use backend::*;
pub use device::*;
pub use event::*;
pub use state::*;
pub use tracker::*;

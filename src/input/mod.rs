//! Input devices.

pub mod mouse;

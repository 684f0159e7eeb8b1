//! Mouse state for game loops.
//!
//! The producer side is fed from the host platform: the message procedure of
//! a Win32 window ([`DesktopBackend`]), the pointer notifications of an
//! app-shell window ([`ModernBackend`]), or nothing at all ([`NullBackend`]).
//! The consumer side is a snapshot, [`MouseState`], which can be polled from
//! any thread, plus a [`ButtonStateTracker`] for detecting presses and
//! releases between frames.
//!
//! Positions are reported in one of two modes. In [`Mode::Absolute`] they are
//! window client coordinates. In [`Mode::Relative`] the cursor is hidden and
//! captured, and each movement is reported once as a delta.
//!
//! [`DesktopBackend`]: input::mouse::DesktopBackend
//! [`ModernBackend`]: input::mouse::ModernBackend
//! [`NullBackend`]: input::mouse::NullBackend
//! [`MouseState`]: input::mouse::MouseState
//! [`ButtonStateTracker`]: input::mouse::ButtonStateTracker
//! [`Mode::Absolute`]: input::mouse::Mode::Absolute
//! [`Mode::Relative`]: input::mouse::Mode::Relative

pub mod errors;
pub mod input;
pub mod window;

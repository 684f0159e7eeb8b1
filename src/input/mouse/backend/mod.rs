//! Producers of mouse state, one per kind of platform.

mod desktop;
mod modern;
mod null;

pub use desktop::*;
pub use modern::*;
pub use null::*;

use super::DeviceCore;
use crate::errors::Result;

/// The contract shared by all mouse backends.
///
/// A backend receives notifications from the platform on the producer thread
/// and turns them into changes of the shared [`DeviceCore`]. Which backend is
/// used is decided at compile time, by the type parameter of
/// [`Mouse`](super::Mouse).
///
/// Backends are driven through [`Mouse`](super::Mouse), which applies pending
/// wheel resets and mode transitions before forwarding each event. Any error
/// returned from an event handler is reported to the caller only after
/// leaving the shared state as it was before the failing step.
pub trait Backend {
    /// What the backend binds to, e.g. a window.
    type Target: PartialEq;
    type ButtonEvent;
    type MotionEvent;
    type WheelEvent;

    /// Whether [`DeviceCore::set_mode`] must fail until a target is bound.
    const REQUIRES_BINDING: bool;

    /// Binds to `target`, or unbinds with `None`. Binding the current target
    /// again does nothing. Otherwise the current target is unbound first.
    fn bind(&mut self, core: &DeviceCore, target: Option<Self::Target>) -> Result<()>;

    /// Takes a pending mode request and performs the platform side of it
    /// (cursor visibility, confinement) before committing the new mode.
    fn apply_pending_mode_transition(&mut self, core: &DeviceCore) -> Result<()>;

    fn on_button_event(&mut self, core: &DeviceCore, event: Self::ButtonEvent) -> Result<()>;

    fn on_motion_event(&mut self, core: &DeviceCore, event: Self::MotionEvent) -> Result<()>;

    fn on_wheel_event(&mut self, core: &DeviceCore, event: Self::WheelEvent) -> Result<()>;

    fn on_focus_change(&mut self, core: &DeviceCore, focused: bool) -> Result<()>;
}

/// The backend which suits the build target.
#[cfg(windows)]
pub type PlatformBackend = DesktopBackend<crate::window::Win32Platform>;

/// The backend which suits the build target.
#[cfg(not(windows))]
pub type PlatformBackend = NullBackend;

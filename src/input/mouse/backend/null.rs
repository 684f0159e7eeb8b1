//! A backend for platforms without a mouse.

use ::tracing::trace;

use super::Backend;
use crate::{errors::Result, input::mouse::DeviceCore};

/// A backend which never produces any input.
///
/// Every read reports a zeroed [`MouseState`], and mode changes are accepted
/// and dropped. Useful on consoles and phones, and in tests of code which
/// merely needs a [`Mouse`] to exist.
///
/// [`MouseState`]: crate::input::mouse::MouseState
/// [`Mouse`]: crate::input::mouse::Mouse
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBackend(());

impl NullBackend {
    pub fn new() -> Self {
        Self(())
    }
}

impl Backend for NullBackend {
    type Target = ();
    type ButtonEvent = ();
    type MotionEvent = ();
    type WheelEvent = ();

    const REQUIRES_BINDING: bool = false;

    fn bind(&mut self, core: &DeviceCore, target: Option<()>) -> Result<()> {
        core.set_binding(None, target.is_some());
        Ok(())
    }

    fn apply_pending_mode_transition(&mut self, core: &DeviceCore) -> Result<()> {
        if let Some(mode) = core.take_mode_request() {
            trace!(mode = <&str>::from(mode), "Ignoring mode request");
        }
        Ok(())
    }

    fn on_button_event(&mut self, _: &DeviceCore, _: ()) -> Result<()> {
        Ok(())
    }

    fn on_motion_event(&mut self, _: &DeviceCore, _: ()) -> Result<()> {
        Ok(())
    }

    fn on_wheel_event(&mut self, _: &DeviceCore, _: ()) -> Result<()> {
        Ok(())
    }

    fn on_focus_change(&mut self, _: &DeviceCore, _: bool) -> Result<()> {
        Ok(())
    }
}

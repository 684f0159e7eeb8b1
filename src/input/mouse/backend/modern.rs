//! The backend for app-shell windows which deliver pointer notifications
//! through subscriptions rather than a message procedure.

use ::strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use ::tracing::{debug, error, trace};

use super::Backend;
use crate::{
    errors::{Error, PlatformResult, Result},
    input::mouse::{ButtonSet, DeviceCore, Mode, ModeRequestNotifier, Point},
};

/// The logical DPI at which one logical unit is one pixel.
pub const BASELINE_DPI: f32 = 96.0;

/// Identifies a subscription, so it can be removed again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventToken(pub i64);

/// The pointer notifications a window can be subscribed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum PointerNotification {
    Pressed,
    Released,
    Moved,
    WheelChanged,
}

/// The platform calls the [`ModernBackend`] needs.
///
/// Subscriptions deliver their notifications on the window's thread, which
/// the host forwards into the [`Mouse`](crate::input::mouse::Mouse).
pub trait CoreWindowPlatform {
    type Window: Clone + PartialEq;
    type Cursor;

    fn subscribe(
        &mut self,
        window: &Self::Window,
        notification: PointerNotification,
    ) -> PlatformResult<EventToken>;

    fn unsubscribe(
        &mut self,
        window: &Self::Window,
        notification: PointerNotification,
        token: EventToken,
    ) -> PlatformResult<()>;

    /// Subscribes to unaccelerated movement of the mouse device itself.
    fn subscribe_device_moved(&mut self) -> PlatformResult<EventToken>;

    fn unsubscribe_device_moved(&mut self, token: EventToken) -> PlatformResult<()>;

    /// Detaches the window's cursor, leaving it without one. Returns `None`
    /// if the window had no cursor.
    fn take_pointer_cursor(&mut self, window: &Self::Window)
        -> PlatformResult<Option<Self::Cursor>>;

    /// Sets (or with `None` hides) the window's cursor.
    fn set_pointer_cursor(
        &mut self,
        window: &Self::Window,
        cursor: Option<&Self::Cursor>,
    ) -> PlatformResult<()>;

    /// Creates the standard arrow cursor.
    fn create_arrow_cursor(&mut self) -> PlatformResult<Self::Cursor>;

    /// A callback which wakes the window's thread after a mode change was
    /// requested. Without one, requests are applied with the next pointer
    /// notification.
    fn mode_request_notifier(&self, _window: &Self::Window) -> Option<ModeRequestNotifier> {
        None
    }
}

/// The kind of device behind a pointer notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum PointerDeviceKind {
    Mouse,
    Pen,
    Touch,
}

/// A position in device-independent units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LogicalPoint {
    pub x: f32,
    pub y: f32,
}

impl LogicalPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts to physical pixels at `dpi`, rounding to the nearest pixel.
    pub fn to_pixels(self, dpi: f32) -> Point {
        let scale = |logical: f32| (logical * dpi / BASELINE_DPI).round() as i32;
        Point::new(scale(self.x), scale(self.y))
    }
}

/// The payload of a pointer notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPoint {
    pub device: PointerDeviceKind,
    /// All buttons held when the notification was raised.
    pub buttons: ButtonSet,
    pub position: LogicalPoint,
}

/// Movement reported by the app shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerMotion {
    /// The pointer moved over the window.
    Pointer(PointerPoint),
    /// The mouse device moved, in raw device units.
    Device { dx: i32, dy: i32 },
}

/// A wheel notification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerWheel {
    pub point: PointerPoint,
    pub delta: i32,
}

/// A backend driven by the pointer notifications of an app-shell window.
///
/// Positions arrive in logical units and are scaled by the current DPI.
/// Relative movement comes from the device-level moved notification, which is
/// only consulted in [`Mode::Relative`].
pub struct ModernBackend<P: CoreWindowPlatform> {
    platform: P,
    window: Option<P::Window>,
    subscriptions: Vec<(PointerNotification, EventToken)>,
    device_subscription: Option<EventToken>,
    /// The window's cursor while it is hidden for relative mode.
    stored_cursor: Option<P::Cursor>,
    /// Last pointer position seen in absolute mode, restored when relative
    /// mode ends.
    last_position: Point,
    cursor_hidden: bool,
    dpi: f32,
}

impl<P: CoreWindowPlatform> ModernBackend<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            window: None,
            subscriptions: Vec::new(),
            device_subscription: None,
            stored_cursor: None,
            last_position: Point::zero(),
            cursor_hidden: false,
            dpi: BASELINE_DPI,
        }
    }

    /// Sets the initial DPI. Defaults to [`BASELINE_DPI`].
    pub fn with_dpi(self, dpi: f32) -> Self {
        Self { dpi, ..self }
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Call when the window's DPI changes. Affects positions reported from
    /// then on.
    pub fn set_dpi(&mut self, dpi: f32) {
        debug!(dpi, "DPI changed");
        self.dpi = dpi;
    }

    /// The bound window, if any.
    pub fn window(&self) -> Option<&P::Window> {
        self.window.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    fn subscribe_all(&mut self, window: &P::Window) -> PlatformResult<()> {
        for notification in PointerNotification::iter() {
            let token = self.platform.subscribe(window, notification)?;
            self.subscriptions.push((notification, token));
        }
        self.device_subscription = Some(self.platform.subscribe_device_moved()?);
        Ok(())
    }

    /// Removes every subscription, returning the first failure. Keeps going
    /// after a failure so nothing is left subscribed that can be removed.
    fn unsubscribe_all(&mut self, window: &P::Window) -> PlatformResult<()> {
        let mut result = Ok(());
        for (notification, token) in self.subscriptions.drain(..).rev() {
            let removed = self.platform.unsubscribe(window, notification, token);
            result = result.and(removed);
        }
        if let Some(token) = self.device_subscription.take() {
            result = result.and(self.platform.unsubscribe_device_moved(token));
        }
        result
    }

    fn hide_cursor(&mut self, window: &P::Window) -> Result<()> {
        if self.cursor_hidden {
            return Ok(());
        }
        let cursor = self.platform.take_pointer_cursor(window)?;
        if let Err(e) = self.platform.set_pointer_cursor(window, None) {
            // Put back what was taken so the step leaves nothing changed.
            if let Err(e) = self.platform.set_pointer_cursor(window, cursor.as_ref()) {
                error!("Failed to restore cursor: {}", e);
            }
            return Err(e.into());
        }
        self.stored_cursor = cursor;
        self.cursor_hidden = true;
        Ok(())
    }

    fn show_cursor(&mut self, window: &P::Window) -> Result<()> {
        if !self.cursor_hidden {
            return Ok(());
        }
        let cursor = match self.stored_cursor.take() {
            Some(cursor) => cursor,
            None => self.platform.create_arrow_cursor()?,
        };
        if let Err(e) = self.platform.set_pointer_cursor(window, Some(&cursor)) {
            self.stored_cursor = Some(cursor);
            return Err(e.into());
        }
        self.cursor_hidden = false;
        Ok(())
    }

    fn track_pointer(&mut self, core: &DeviceCore, point: &PointerPoint) {
        if core.mode() == Mode::Absolute {
            self.last_position = point.position.to_pixels(self.dpi);
            core.set_position(self.last_position);
        }
    }
}

impl<P: CoreWindowPlatform> Backend for ModernBackend<P> {
    type Target = P::Window;
    type ButtonEvent = PointerPoint;
    type MotionEvent = PointerMotion;
    type WheelEvent = PointerWheel;

    const REQUIRES_BINDING: bool = true;

    fn bind(&mut self, core: &DeviceCore, target: Option<P::Window>) -> Result<()> {
        if self.window == target {
            return Ok(());
        }

        if let Some(old) = self.window.take() {
            debug!("Unbinding mouse from core window");
            core.set_binding(None, false);
            let shown = self.show_cursor(&old);
            self.unsubscribe_all(&old)
                .map_err(Error::RegistrationFailed)?;
            shown?;
        }

        let Some(window) = target else {
            return Ok(());
        };

        debug!("Binding mouse to core window");
        if let Err(e) = self.subscribe_all(&window) {
            if let Err(e) = self.unsubscribe_all(&window) {
                error!("Failed to roll back subscriptions: {}", e);
            }
            return Err(Error::RegistrationFailed(e));
        }
        core.set_binding(self.platform.mode_request_notifier(&window), true);
        self.window = Some(window.clone());

        if core.mode() == Mode::Relative {
            self.hide_cursor(&window)?;
        }
        Ok(())
    }

    fn apply_pending_mode_transition(&mut self, core: &DeviceCore) -> Result<()> {
        let Some(window) = self.window.clone() else {
            return Ok(());
        };

        match core.take_mode_request() {
            Some(mode) if mode == core.mode() => {}
            Some(Mode::Relative) => {
                self.hide_cursor(&window)?;
                core.commit_mode(Mode::Relative);
            }
            Some(Mode::Absolute) => {
                self.show_cursor(&window)?;
                core.set_position(self.last_position);
                core.commit_mode(Mode::Absolute);
            }
            None => {}
        }
        Ok(())
    }

    fn on_button_event(&mut self, core: &DeviceCore, point: PointerPoint) -> Result<()> {
        trace!(
            device = <&str>::from(point.device),
            buttons = ?point.buttons,
            "Pointer buttons"
        );
        if point.device == PointerDeviceKind::Mouse {
            core.set_buttons(point.buttons);
        }
        self.track_pointer(core, &point);
        Ok(())
    }

    fn on_motion_event(&mut self, core: &DeviceCore, motion: PointerMotion) -> Result<()> {
        match motion {
            PointerMotion::Pointer(point) => {
                if point.device == PointerDeviceKind::Mouse {
                    core.set_buttons(point.buttons);
                }
                self.track_pointer(core, &point);
            }
            PointerMotion::Device { dx, dy } => {
                if core.mode() == Mode::Relative {
                    core.set_relative_delta(Point::new(dx, dy));
                }
            }
        }
        Ok(())
    }

    fn on_wheel_event(&mut self, core: &DeviceCore, wheel: PointerWheel) -> Result<()> {
        if wheel.point.device == PointerDeviceKind::Mouse {
            core.set_buttons(wheel.point.buttons);
            core.add_scroll_wheel_delta(wheel.delta);
            self.track_pointer(core, &wheel.point);
        }
        Ok(())
    }

    fn on_focus_change(&mut self, core: &DeviceCore, focused: bool) -> Result<()> {
        debug!(focused, "Mouse focus changed");
        if !focused {
            core.set_buttons(ButtonSet::empty());
        }
        Ok(())
    }
}

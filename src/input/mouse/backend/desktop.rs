//! The desktop backend, fed by the message stream of a native window.

use ::tracing::{debug, trace, warn};

use super::Backend;
use crate::{
    errors::{Error, PlatformResult, Result},
    input::mouse::{
        DeviceCore, Mode, ModeRequestNotifier, Mouse, MouseButton, MouseEvent, Point,
        RawInputHandle,
    },
    window::{WindowHandle, WindowsProcessMessage},
};

/// The platform calls the [`DesktopBackend`] needs.
///
/// [`Win32Platform`] implements this for Windows. Every call is made on the
/// thread which owns the bound window.
///
/// [`Win32Platform`]: crate::window::Win32Platform
pub trait DesktopPlatform {
    /// Starts delivery of raw mouse input (`WM_INPUT`) to `window`.
    fn register_raw_input(&mut self, window: WindowHandle) -> PlatformResult<()>;

    /// Stops delivery of raw mouse input to `window`.
    fn unregister_raw_input(&mut self, window: WindowHandle) -> PlatformResult<()>;

    /// Shows or hides the cursor. Calls are balanced by the backend.
    fn set_cursor_visible(&mut self, visible: bool);

    /// Confines the cursor to the client area of `window`.
    fn clip_cursor_to_client(&mut self, window: WindowHandle) -> PlatformResult<()>;

    /// Lets the cursor move freely again.
    fn release_cursor_clip(&mut self) -> PlatformResult<()>;

    /// Moves the cursor to a point given in client coordinates of `window`.
    fn move_cursor_to(&mut self, window: WindowHandle, point: Point) -> PlatformResult<()>;

    /// Reads the relative movement from a raw input packet. Returns `None`
    /// for packets which are not relative mouse movement (e.g. keyboard
    /// input, or absolute movement as sent over remote desktop).
    fn read_raw_motion(&mut self, input: RawInputHandle) -> PlatformResult<Option<Point>>;

    /// A callback which makes `window` receive a message soon, so that a mode
    /// change requested from another thread is applied promptly.
    fn mode_request_notifier(&self, window: WindowHandle) -> Option<ModeRequestNotifier>;
}

/// A button change reported by the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: MouseButton,
    pub pressed: bool,
    /// Cursor position in client coordinates when the button changed.
    pub at: Point,
}

/// Movement reported by the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionEvent {
    /// The cursor is at the given client coordinates.
    Cursor(Point),
    /// A raw input packet which may contain relative movement.
    RawInput(RawInputHandle),
    /// Relative movement, already read from raw input.
    Raw(Point),
}

/// Wheel movement reported by the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WheelEvent {
    pub delta: i32,
}

/// A backend driven by the messages of a native desktop window.
///
/// In [`Mode::Absolute`] the position follows the cursor messages of the
/// window. In [`Mode::Relative`] the cursor is hidden and confined to the
/// window, and movement is taken from raw input, which is unaffected by
/// pointer acceleration and by the cursor hitting the edge of the screen.
///
/// Forward every message of the window's procedure through
/// [`Mouse::process_message`]; it ignores messages which are not mouse
/// messages.
pub struct DesktopBackend<P: DesktopPlatform> {
    platform: P,
    window: Option<WindowHandle>,
    /// Last cursor position seen in absolute mode, restored when relative
    /// mode ends.
    last_position: Point,
    in_focus: bool,
    cursor_hidden: bool,
    cursor_clipped: bool,
}

impl<P: DesktopPlatform> DesktopBackend<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            window: None,
            last_position: Point::zero(),
            in_focus: true,
            cursor_hidden: false,
            cursor_clipped: false,
        }
    }

    /// The bound window, if any.
    pub fn window(&self) -> Option<WindowHandle> {
        self.window
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Hides the cursor and confines it to the bound window.
    fn capture_cursor(&mut self, window: WindowHandle) -> Result<()> {
        self.platform.clip_cursor_to_client(window)?;
        self.cursor_clipped = true;
        if !self.cursor_hidden {
            self.platform.set_cursor_visible(false);
            self.cursor_hidden = true;
        }
        Ok(())
    }

    fn release_cursor(&mut self) -> Result<()> {
        if self.cursor_clipped {
            self.platform.release_cursor_clip()?;
            self.cursor_clipped = false;
        }
        if self.cursor_hidden {
            self.platform.set_cursor_visible(true);
            self.cursor_hidden = false;
        }
        Ok(())
    }

    fn enter_relative(&mut self, core: &DeviceCore, window: WindowHandle) -> Result<()> {
        self.capture_cursor(window)?;
        core.commit_mode(Mode::Relative);
        Ok(())
    }

    fn enter_absolute(&mut self, core: &DeviceCore, window: WindowHandle) -> Result<()> {
        self.release_cursor()?;
        if let Err(e) = self.platform.move_cursor_to(window, self.last_position) {
            // Not fatal, the cursor simply stays where it was hidden.
            warn!("Failed to restore cursor position: {}", e);
        }
        core.set_position(self.last_position);
        core.commit_mode(Mode::Absolute);
        Ok(())
    }

    fn track_cursor(&mut self, core: &DeviceCore, at: Point) {
        if core.mode() == Mode::Absolute {
            self.last_position = at;
            core.set_position(at);
        }
    }
}

impl<P: DesktopPlatform> Backend for DesktopBackend<P> {
    type Target = WindowHandle;
    type ButtonEvent = ButtonEvent;
    type MotionEvent = MotionEvent;
    type WheelEvent = WheelEvent;

    const REQUIRES_BINDING: bool = true;

    fn bind(&mut self, core: &DeviceCore, target: Option<WindowHandle>) -> Result<()> {
        if self.window == target {
            return Ok(());
        }

        if let Some(old) = self.window.take() {
            debug!(hwnd = old.raw(), "Unbinding mouse from window");
            core.set_binding(None, false);
            let released = self.release_cursor();
            self.platform
                .unregister_raw_input(old)
                .map_err(Error::RegistrationFailed)?;
            released?;
        }

        let Some(window) = target else {
            return Ok(());
        };

        debug!(hwnd = window.raw(), "Binding mouse to window");
        self.platform
            .register_raw_input(window)
            .map_err(Error::RegistrationFailed)?;
        self.window = Some(window);
        core.set_binding(self.platform.mode_request_notifier(window), true);

        if core.mode() == Mode::Relative {
            self.capture_cursor(window)?;
        }
        Ok(())
    }

    fn apply_pending_mode_transition(&mut self, core: &DeviceCore) -> Result<()> {
        // Requests made before a window exists wait for one.
        let Some(window) = self.window else {
            return Ok(());
        };

        match core.take_mode_request() {
            Some(mode) if mode == core.mode() => Ok(()),
            Some(Mode::Relative) => self.enter_relative(core, window),
            Some(Mode::Absolute) => self.enter_absolute(core, window),
            None => Ok(()),
        }
    }

    fn on_button_event(&mut self, core: &DeviceCore, event: ButtonEvent) -> Result<()> {
        trace!(
            button = <&str>::from(event.button),
            pressed = event.pressed,
            "Mouse button"
        );
        core.set_button(event.button, event.pressed);
        self.track_cursor(core, event.at);
        Ok(())
    }

    fn on_motion_event(&mut self, core: &DeviceCore, event: MotionEvent) -> Result<()> {
        match event {
            MotionEvent::Cursor(at) => self.track_cursor(core, at),
            MotionEvent::RawInput(input) => {
                if self.in_focus && core.mode() == Mode::Relative {
                    if let Some(delta) = self.platform.read_raw_motion(input)? {
                        core.set_relative_delta(delta);
                    }
                }
            }
            MotionEvent::Raw(delta) => {
                if self.in_focus && core.mode() == Mode::Relative {
                    core.set_relative_delta(delta);
                }
            }
        }
        Ok(())
    }

    fn on_wheel_event(&mut self, core: &DeviceCore, event: WheelEvent) -> Result<()> {
        core.add_scroll_wheel_delta(event.delta);
        Ok(())
    }

    fn on_focus_change(&mut self, core: &DeviceCore, focused: bool) -> Result<()> {
        debug!(focused, "Mouse focus changed");
        if focused {
            self.in_focus = true;
            if core.mode() == Mode::Relative {
                core.set_position(Point::zero());
                if let Some(window) = self.window {
                    self.capture_cursor(window)?;
                }
            }
        } else {
            // Buttons released while unfocused are never reported, so none
            // can be considered pressed. The wheel is kept.
            core.set_buttons(Default::default());
            core.set_position(Point::zero());
            self.in_focus = false;
        }
        Ok(())
    }
}

impl<P: DesktopPlatform> Mouse<DesktopBackend<P>> {
    /// Handles a message from the bound window's procedure.
    ///
    /// Pending wheel resets and mode changes are applied for every message,
    /// mouse related or not.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if the message was a mouse message. Mouse messages
    /// should still be forwarded to the default window procedure.
    pub fn process_message(&mut self, msg: WindowsProcessMessage) -> Result<bool> {
        let Some(event) = MouseEvent::new(msg) else {
            self.apply_pending()?;
            return Ok(false);
        };

        match event {
            MouseEvent::Activate { active } => self.on_focus_change(active)?,
            MouseEvent::RawInput { handle } => {
                self.on_motion_event(MotionEvent::RawInput(handle))?
            }
            MouseEvent::Move { at } | MouseEvent::Hover { at } => {
                self.on_motion_event(MotionEvent::Cursor(at))?
            }
            MouseEvent::Button {
                button,
                pressed,
                at,
            } => self.on_button_event(ButtonEvent { button, pressed, at })?,
            MouseEvent::Wheel { delta } => self.on_wheel_event(WheelEvent { delta })?,
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::PlatformError,
        input::mouse::{device::test_lock, Builder, ButtonStateTracker, ButtonState, MouseState},
        window::msgs::*,
    };

    use ::pretty_assertions::assert_eq;
    use ::std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };
    use ::strum::IntoEnumIterator;

    /// A platform call, as recorded by [`FakePlatform`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Register(WindowHandle),
        Unregister(WindowHandle),
        CursorVisible(bool),
        Clip(WindowHandle),
        ReleaseClip,
        MoveCursor(WindowHandle, Point),
    }

    /// Records platform calls and serves canned raw input.
    #[derive(Default)]
    struct FakePlatform {
        calls: Vec<Call>,
        raw_input: HashMap<RawInputHandle, Option<Point>>,
        fail_register: bool,
        fail_clip: bool,
        wakeups: Arc<AtomicUsize>,
    }

    impl DesktopPlatform for FakePlatform {
        fn register_raw_input(&mut self, window: WindowHandle) -> PlatformResult<()> {
            if self.fail_register {
                return Err(PlatformError::new(87));
            }
            self.calls.push(Call::Register(window));
            Ok(())
        }

        fn unregister_raw_input(&mut self, window: WindowHandle) -> PlatformResult<()> {
            self.calls.push(Call::Unregister(window));
            Ok(())
        }

        fn set_cursor_visible(&mut self, visible: bool) {
            self.calls.push(Call::CursorVisible(visible));
        }

        fn clip_cursor_to_client(&mut self, window: WindowHandle) -> PlatformResult<()> {
            if self.fail_clip {
                return Err(PlatformError::new(5));
            }
            self.calls.push(Call::Clip(window));
            Ok(())
        }

        fn release_cursor_clip(&mut self) -> PlatformResult<()> {
            self.calls.push(Call::ReleaseClip);
            Ok(())
        }

        fn move_cursor_to(&mut self, window: WindowHandle, point: Point) -> PlatformResult<()> {
            self.calls.push(Call::MoveCursor(window, point));
            Ok(())
        }

        fn read_raw_motion(&mut self, input: RawInputHandle) -> PlatformResult<Option<Point>> {
            self.raw_input
                .get(&input)
                .copied()
                .ok_or_else(|| PlatformError::new(6))
        }

        fn mode_request_notifier(&self, _: WindowHandle) -> Option<ModeRequestNotifier> {
            let wakeups = Arc::clone(&self.wakeups);
            Some(Box::new(move || {
                wakeups.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
        }
    }

    const WM_PAINT: u32 = 0x000F;

    fn hwnd(raw: isize) -> WindowHandle {
        WindowHandle::new(raw).unwrap()
    }

    fn msg(umsg: u32, wparam: usize, lparam: isize) -> WindowsProcessMessage {
        WindowsProcessMessage::new(umsg, wparam, lparam)
    }

    fn coords(x: i16, y: i16) -> isize {
        (((y as u16 as u32) << 16) | (x as u16 as u32)) as isize
    }

    fn bound_mouse() -> Mouse<DesktopBackend<FakePlatform>> {
        let mut mouse = Mouse::new(DesktopBackend::new(FakePlatform::default())).unwrap();
        mouse.bind(Some(hwnd(0x1F38))).unwrap();
        mouse
    }

    fn calls(mouse: &Mouse<DesktopBackend<FakePlatform>>) -> &[Call] {
        &mouse.backend().platform().calls
    }

    fn enter_relative(mouse: &mut Mouse<DesktopBackend<FakePlatform>>) {
        mouse.set_mode(Mode::Relative).unwrap();
        mouse.process_message(msg(WM_PAINT, 0, 0)).unwrap();
        assert_eq!(mouse.core().mode(), Mode::Relative);
    }

    #[test]
    fn test_bind_registers_raw_input_once() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        mouse.bind(Some(hwnd(0x1F38))).unwrap();
        assert_eq!(calls(&mouse), [Call::Register(hwnd(0x1F38))]);
        assert!(mouse.core().is_bound());
    }

    #[test]
    fn test_rebind_unregisters_previous_window() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        mouse.bind(Some(hwnd(0x2A40))).unwrap();
        mouse.bind(None).unwrap();
        mouse.bind(None).unwrap();

        assert_eq!(
            calls(&mouse),
            [
                Call::Register(hwnd(0x1F38)),
                Call::Unregister(hwnd(0x1F38)),
                Call::Register(hwnd(0x2A40)),
                Call::Unregister(hwnd(0x2A40)),
            ]
        );
        assert!(!mouse.core().is_bound());
        assert!(matches!(
            mouse.set_mode(Mode::Relative),
            Err(Error::BackendUnavailable)
        ));
    }

    #[test]
    fn test_failed_registration_is_reported() {
        let _lock = test_lock();
        let platform = FakePlatform {
            fail_register: true,
            ..Default::default()
        };
        let mut mouse = Mouse::new(DesktopBackend::new(platform)).unwrap();

        let err = mouse.bind(Some(hwnd(0x1F38))).unwrap_err();
        assert!(matches!(err, Error::RegistrationFailed(_)));
        assert_eq!(mouse.backend().window(), None);
        assert!(!mouse.core().is_bound());
    }

    #[test]
    fn test_set_mode_requires_window() {
        let _lock = test_lock();
        let mouse = Mouse::new(DesktopBackend::new(FakePlatform::default())).unwrap();
        assert!(matches!(
            mouse.set_mode(Mode::Relative),
            Err(Error::BackendUnavailable)
        ));
    }

    #[test]
    fn test_absolute_position_follows_messages() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();

        assert!(mouse.process_message(msg(WM_MOUSEMOVE, 0, coords(100, 50))).unwrap());
        for _ in 0..3 {
            let state = mouse.get_state();
            assert_eq!((state.x, state.y), (100, 50));
            assert_eq!(state.position_mode, Mode::Absolute);
        }

        mouse
            .process_message(msg(WM_RBUTTONDOWN, 0x0002, coords(101, 52)))
            .unwrap();
        let state = mouse.get_state();
        assert!(state.right_button);
        assert_eq!((state.x, state.y), (101, 52));

        // Wheel messages carry screen coordinates, which are not used.
        mouse
            .process_message(msg(WM_MOUSEWHEEL, 0x0078_0000, coords(900, 700)))
            .unwrap();
        assert_eq!(mouse.get_state().position(), Point::new(101, 52));
    }

    #[test]
    fn test_all_buttons_from_messages() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();

        for (down, wparam) in [
            (WM_LBUTTONDOWN, 0),
            (WM_RBUTTONDOWN, 0),
            (WM_MBUTTONDOWN, 0),
            (WM_XBUTTONDOWN, 0x0001_0000),
            (WM_XBUTTONDOWN, 0x0002_0000),
        ] {
            mouse.process_message(msg(down, wparam, 0)).unwrap();
        }
        let state = mouse.get_state();
        for button in MouseButton::iter() {
            assert!(state.is_pressed(button), "{button:?}");
        }

        for (up, wparam) in [
            (WM_LBUTTONUP, 0),
            (WM_RBUTTONUP, 0),
            (WM_MBUTTONUP, 0),
            (WM_XBUTTONUP, 0x0001_0000),
            (WM_XBUTTONUP, 0x0002_0000),
        ] {
            mouse.process_message(msg(up, wparam, 0)).unwrap();
        }
        assert!(mouse.get_state().buttons().is_empty());
    }

    #[test]
    fn test_non_mouse_messages_are_not_handled() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        assert!(!mouse.process_message(msg(WM_PAINT, 0, 0)).unwrap());
        assert_eq!(mouse.get_state(), MouseState::default());
    }

    #[test]
    fn test_relative_mode_captures_cursor() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        let window = hwnd(0x1F38);

        mouse.set_mode(Mode::Relative).unwrap();
        assert_eq!(mouse.backend().platform().wakeups.load(Ordering::SeqCst), 1);
        // Nothing happens until the window handles a message.
        assert_eq!(mouse.core().mode(), Mode::Absolute);

        mouse.process_message(msg(WM_PAINT, 0, 0)).unwrap();
        assert_eq!(
            calls(&mouse),
            [
                Call::Register(window),
                Call::Clip(window),
                Call::CursorVisible(false),
            ]
        );
        let state = mouse.get_state();
        assert_eq!(state.position_mode, Mode::Relative);
        assert_eq!(state.position(), Point::zero());
    }

    /// Bind, switch to relative, move by (5, -3): the first read reports the
    /// movement, the second reports none.
    #[test]
    fn test_relative_delta_is_delivered_once() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        mouse.backend_mut().platform.raw_input =
            [(RawInputHandle(0x0203_0A51), Some(Point::new(5, -3)))]
                .into_iter()
                .collect();
        enter_relative(&mut mouse);

        mouse.process_message(msg(WM_INPUT, 0, 0x0203_0A51)).unwrap();
        let state = mouse.get_state();
        assert_eq!(
            (state.x, state.y, state.position_mode),
            (5, -3, Mode::Relative)
        );

        let state = mouse.get_state();
        assert_eq!((state.x, state.y), (0, 0));
    }

    #[test]
    fn test_relative_mode_ignores_cursor_messages() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        enter_relative(&mut mouse);

        mouse.process_message(msg(WM_MOUSEMOVE, 0, coords(300, 200))).unwrap();
        mouse
            .process_message(msg(WM_LBUTTONDOWN, 0x0001, coords(300, 200)))
            .unwrap();
        let state = mouse.get_state();
        assert_eq!(state.position(), Point::zero());
        assert!(state.left_button);
    }

    #[test]
    fn test_absolute_raw_input_is_ignored() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        mouse.backend_mut().platform.raw_input =
            [(RawInputHandle(7), None)].into_iter().collect();
        enter_relative(&mut mouse);

        mouse.on_motion_event(MotionEvent::RawInput(RawInputHandle(7))).unwrap();
        assert_eq!(mouse.get_state().position(), Point::zero());
    }

    #[test]
    fn test_raw_input_failure_leaves_state() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        enter_relative(&mut mouse);
        mouse.on_motion_event(MotionEvent::Raw(Point::new(2, 2))).unwrap();

        let err = mouse.process_message(msg(WM_INPUT, 0, 0x99)).unwrap_err();
        assert!(matches!(err, Error::Platform(_)));
        assert_eq!(mouse.get_state().position(), Point::new(2, 2));
    }

    /// Absolute → relative → absolute without movement restores the last
    /// absolute coordinate, on screen and in the state.
    #[test]
    fn test_absolute_position_restored_after_relative() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        let window = hwnd(0x1F38);

        mouse.process_message(msg(WM_MOUSEMOVE, 0, coords(640, 360))).unwrap();
        enter_relative(&mut mouse);
        mouse.on_motion_event(MotionEvent::Raw(Point::new(9, 9))).unwrap();

        mouse.set_mode(Mode::Absolute).unwrap();
        mouse.process_message(msg(WM_PAINT, 0, 0)).unwrap();

        let state = mouse.get_state();
        assert_eq!(state.position_mode, Mode::Absolute);
        assert_eq!(state.position(), Point::new(640, 360));
        assert_eq!(
            &calls(&mouse)[3..],
            [
                Call::ReleaseClip,
                Call::CursorVisible(true),
                Call::MoveCursor(window, Point::new(640, 360)),
            ]
        );
    }

    #[test]
    fn test_failed_clip_keeps_absolute_mode() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        mouse.process_message(msg(WM_MOUSEMOVE, 0, coords(12, 34))).unwrap();
        mouse.backend_mut().platform.fail_clip = true;

        mouse.set_mode(Mode::Relative).unwrap();
        let err = mouse.process_message(msg(WM_PAINT, 0, 0)).unwrap_err();
        assert!(matches!(err, Error::Platform(_)));

        let state = mouse.get_state();
        assert_eq!(state.position_mode, Mode::Absolute);
        assert_eq!(state.position(), Point::new(12, 34));
        assert!(!calls(&mouse).contains(&Call::CursorVisible(false)));
    }

    #[test]
    fn test_focus_loss_clears_buttons_keeps_wheel() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();

        mouse
            .process_message(msg(WM_MBUTTONDOWN, 0x0010, coords(20, 30)))
            .unwrap();
        mouse.process_message(msg(WM_MOUSEWHEEL, 0x0078_0000, 0)).unwrap();
        mouse.process_message(msg(WM_ACTIVATEAPP, 0, 0)).unwrap();

        let state = mouse.get_state();
        assert!(state.buttons().is_empty());
        assert_eq!(state.position(), Point::zero());
        assert_eq!(state.scroll_wheel_value, 120);
    }

    #[test]
    fn test_unfocused_raw_input_is_ignored() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        enter_relative(&mut mouse);

        mouse.on_focus_change(false).unwrap();
        mouse.on_motion_event(MotionEvent::Raw(Point::new(4, 4))).unwrap();
        assert_eq!(mouse.get_state().position(), Point::zero());

        mouse.on_focus_change(true).unwrap();
        mouse.on_motion_event(MotionEvent::Raw(Point::new(4, 4))).unwrap();
        assert_eq!(mouse.get_state().position(), Point::new(4, 4));
    }

    #[test]
    fn test_focus_regain_recaptures_cursor() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        let window = hwnd(0x1F38);
        enter_relative(&mut mouse);

        mouse.process_message(msg(WM_ACTIVATEAPP, 0, 0)).unwrap();
        mouse.process_message(msg(WM_ACTIVATEAPP, 1, 0)).unwrap();

        // The cursor is clipped again, but was never shown so is not hidden
        // a second time.
        assert_eq!(
            &calls(&mouse)[1..],
            [
                Call::Clip(window),
                Call::CursorVisible(false),
                Call::Clip(window),
            ]
        );
    }

    #[test]
    fn test_wheel_reset_applied_on_next_message() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();

        for delta in [0x0078_0000, 0x0078_0000, 0xFFD8_0000] {
            mouse.process_message(msg(WM_MOUSEWHEEL, delta, 0)).unwrap();
        }
        assert_eq!(mouse.get_state().scroll_wheel_value, 200);

        mouse.reset_scroll_wheel_value();
        assert_eq!(mouse.get_state().scroll_wheel_value, 0);

        mouse.process_message(msg(WM_MOUSEWHEEL, 0x0078_0000, 0)).unwrap();
        assert_eq!(mouse.get_state().scroll_wheel_value, 120);
    }

    #[test]
    fn test_initial_relative_mode_waits_for_window() {
        let _lock = test_lock();
        let mut mouse = Builder::new()
            .with_mode(Mode::Relative)
            .build(DesktopBackend::new(FakePlatform::default()))
            .unwrap();

        mouse.process_message(msg(WM_PAINT, 0, 0)).unwrap();
        assert_eq!(mouse.core().mode(), Mode::Absolute);

        mouse.bind(Some(hwnd(0x1F38))).unwrap();
        mouse.process_message(msg(WM_PAINT, 0, 0)).unwrap();
        assert_eq!(mouse.core().mode(), Mode::Relative);
    }

    #[test]
    fn test_unbind_releases_captured_cursor() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        enter_relative(&mut mouse);

        mouse.bind(None).unwrap();
        assert!(!mouse.core().is_bound());
        assert_eq!(
            &calls(&mouse)[3..],
            [
                Call::ReleaseClip,
                Call::CursorVisible(true),
                Call::Unregister(hwnd(0x1F38)),
            ]
        );
    }

    /// A click spanning two frames is seen as `Pressed` then `Released`.
    #[test]
    fn test_single_frame_click() {
        let _lock = test_lock();
        let mut mouse = bound_mouse();
        let mut tracker = ButtonStateTracker::new();

        mouse
            .process_message(msg(WM_LBUTTONDOWN, 0x0001, coords(5, 5)))
            .unwrap();
        tracker.update(&mouse.get_state());
        assert_eq!(tracker.left_button(), ButtonState::Pressed);

        mouse.process_message(msg(WM_LBUTTONUP, 0, coords(5, 5))).unwrap();
        tracker.update(&mouse.get_state());
        assert_eq!(tracker.left_button(), ButtonState::Released);
    }
}

//! The Win32 implementation of the desktop platform calls.

use ::std::{ffi::c_void, mem::size_of};
use ::tap::Pipe;
use ::tracing::debug;
use ::windows::Win32::{
    Foundation::{BOOL, HWND, POINT, RECT},
    Graphics::Gdi::ClientToScreen,
    UI::{
        Input::{
            GetRawInputData,
            KeyboardAndMouse::{TrackMouseEvent, TME_HOVER, TRACKMOUSEEVENT},
            RegisterRawInputDevices, HRAWINPUT, RAWINPUT, RAWINPUTDEVICE, RAWINPUTHEADER,
            RIDEV_INPUTSINK, RIDEV_REMOVE, RID_INPUT,
        },
        WindowsAndMessaging::{ClipCursor, GetClientRect, SetCursorPos, ShowCursor},
    },
};

use super::WindowHandle;
use crate::{
    errors::{Context, Error, PlatformError, PlatformResult},
    input::mouse::{DesktopPlatform, ModeRequestNotifier, Point, RawInputHandle},
};

/// HID usage page and usage of a generic mouse.
const HID_USAGE_PAGE_GENERIC: u16 = 0x01;
const HID_USAGE_GENERIC_MOUSE: u16 = 0x02;

/// `RAWINPUTHEADER::dwType` of mouse packets.
const RIM_TYPEMOUSE: u32 = 0;
/// `RAWMOUSE::usFlags` bit set when the packet carries absolute coordinates.
const MOUSE_MOVE_ABSOLUTE: u16 = 0x01;

/// The [`DesktopPlatform`] for Win32 windows.
#[derive(Clone, Copy, Debug, Default)]
pub struct Win32Platform(());

impl Win32Platform {
    pub fn new() -> Self {
        Self(())
    }

    fn register(&self, device: RAWINPUTDEVICE) -> PlatformResult<()> {
        unsafe { RegisterRawInputDevices(&[device], size_of::<RAWINPUTDEVICE>() as u32) }
            .ok()
            .function("RegisterRawInputDevices")
    }

    /// The client rectangle of `window`, in screen coordinates.
    fn client_rect_on_screen(window: HWND) -> PlatformResult<RECT> {
        let mut rect = RECT::default();
        unsafe { GetClientRect(window, &mut rect) }
            .ok()
            .context("Failed to get client area of window")
            .function("GetClientRect")?;

        let mut corners = [
            POINT {
                x: rect.left,
                y: rect.top,
            },
            POINT {
                x: rect.right,
                y: rect.bottom,
            },
        ];
        for corner in &mut corners {
            unsafe { ClientToScreen(window, corner) }
                .ok()
                .context("Failed to map client area to screen")
                .function("ClientToScreen")?;
        }

        Ok(RECT {
            left: corners[0].x,
            top: corners[0].y,
            right: corners[1].x,
            bottom: corners[1].y,
        })
    }
}

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw())
}

impl DesktopPlatform for Win32Platform {
    fn register_raw_input(&mut self, window: WindowHandle) -> PlatformResult<()> {
        debug!(hwnd = window.raw(), "Registering raw mouse input");
        self.register(RAWINPUTDEVICE {
            usUsagePage: HID_USAGE_PAGE_GENERIC,
            usUsage: HID_USAGE_GENERIC_MOUSE,
            dwFlags: RIDEV_INPUTSINK,
            hwndTarget: hwnd(window),
        })
        .context("Failed to register window for raw mouse input")
    }

    fn unregister_raw_input(&mut self, window: WindowHandle) -> PlatformResult<()> {
        debug!(hwnd = window.raw(), "Unregistering raw mouse input");
        // Removal must not name a target window.
        self.register(RAWINPUTDEVICE {
            usUsagePage: HID_USAGE_PAGE_GENERIC,
            usUsage: HID_USAGE_GENERIC_MOUSE,
            dwFlags: RIDEV_REMOVE,
            hwndTarget: HWND::default(),
        })
        .context("Failed to unregister raw mouse input")
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        // Returns the new display counter, which cannot fail.
        let _ = unsafe { ShowCursor(BOOL::from(visible)) };
    }

    fn clip_cursor_to_client(&mut self, window: WindowHandle) -> PlatformResult<()> {
        let rect = Self::client_rect_on_screen(hwnd(window))?;
        unsafe { ClipCursor(Some(&rect as *const RECT)) }
            .ok()
            .context("Failed to clip cursor to window")
            .function("ClipCursor")
    }

    fn release_cursor_clip(&mut self) -> PlatformResult<()> {
        unsafe { ClipCursor(None) }
            .ok()
            .context("Failed to release cursor clip")
            .function("ClipCursor")
    }

    fn move_cursor_to(&mut self, window: WindowHandle, point: Point) -> PlatformResult<()> {
        let mut screen = POINT {
            x: point.x,
            y: point.y,
        };
        unsafe { ClientToScreen(hwnd(window), &mut screen) }
            .ok()
            .context("Failed to map cursor position to screen")
            .function("ClientToScreen")?;
        unsafe { SetCursorPos(screen.x, screen.y) }
            .ok()
            .context("Failed to move cursor")
            .function("SetCursorPos")
    }

    fn read_raw_motion(&mut self, input: RawInputHandle) -> PlatformResult<Option<Point>> {
        let mut raw = RAWINPUT::default();
        let mut size = size_of::<RAWINPUT>() as u32;
        let read = unsafe {
            GetRawInputData(
                HRAWINPUT(input.0),
                RID_INPUT,
                Some(&mut raw as *mut RAWINPUT as *mut c_void),
                &mut size,
                size_of::<RAWINPUTHEADER>() as u32,
            )
        };
        if read == u32::MAX {
            return Err(PlatformError::last_os_error())
                .context("Failed to read raw input")
                .function("GetRawInputData");
        }

        if raw.header.dwType != RIM_TYPEMOUSE {
            return Ok(None);
        }
        let mouse = unsafe { raw.data.mouse };
        if mouse.usFlags & MOUSE_MOVE_ABSOLUTE != 0 {
            return Ok(None);
        }
        Point::new(mouse.lLastX, mouse.lLastY)
            .pipe(Some)
            .pipe(Ok)
    }

    fn mode_request_notifier(&self, window: WindowHandle) -> Option<ModeRequestNotifier> {
        let raw = window.raw();
        Some(Box::new(move || {
            // A hover message is posted to the window almost immediately,
            // which wakes its message loop.
            let mut track = TRACKMOUSEEVENT {
                cbSize: size_of::<TRACKMOUSEEVENT>() as u32,
                dwFlags: TME_HOVER,
                hwndTrack: HWND(raw),
                dwHoverTime: 1,
            };
            unsafe { TrackMouseEvent(&mut track) }
                .ok()
                .context("Failed to request hover notification")
                .function("TrackMouseEvent")
                .map_err(Error::SynchronizationPrimitiveUnavailable)
        }))
    }
}

//! Adapter for Win32 mouse messages into their strongly-typed Rust
//! counterparts.

use ::deku::prelude::*;

use super::{MouseButton, Point};
use crate::window::{msgs::*, WindowsProcessMessage};

/// An opaque handle to a raw input packet (an `HRAWINPUT`), as delivered in
/// the `lparam` of `WM_INPUT`. Only valid while that message is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RawInputHandle(pub isize);

/// A mouse-related window message, decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEvent {
    /// The application was activated or deactivated.
    Activate { active: bool },
    /// Raw mouse input arrived. The movement is read from the platform.
    RawInput { handle: RawInputHandle },
    /// The cursor moved within the client area.
    Move { at: Point },
    /// The cursor hovered. Carries the position like a move.
    Hover { at: Point },
    Button {
        button: MouseButton,
        pressed: bool,
        at: Point,
    },
    /// The wheel turned by `delta`, in multiples of [`WHEEL_DELTA`] for
    /// notched wheels.
    Wheel { delta: i32 },
}

impl MouseEvent {
    /// Indicates whether the given [`WindowsProcessMessage`] is a mouse event.
    ///
    /// If the message contains a mouse event, it can be converted into
    /// [`MouseEvent`].
    pub const fn is_mouse_event(msg: WindowsProcessMessage) -> bool {
        matches!(
            msg.identifier(),
            WM_ACTIVATEAPP
                | WM_INPUT
                | WM_MOUSEMOVE
                | WM_LBUTTONDOWN
                | WM_LBUTTONUP
                | WM_RBUTTONDOWN
                | WM_RBUTTONUP
                | WM_MBUTTONDOWN
                | WM_MBUTTONUP
                | WM_MOUSEWHEEL
                | WM_XBUTTONDOWN
                | WM_XBUTTONUP
                | WM_MOUSEHOVER
        )
    }

    /// Adapts a Windows process message into a [`MouseEvent`]. Returns `None`
    /// for messages which are not mouse events.
    pub fn new(msg: WindowsProcessMessage) -> Option<Self> {
        let button = |button, pressed| {
            CursorCoords::decode(msg.lparam()).map(|at| Self::Button {
                button,
                pressed,
                at: at.into(),
            })
        };

        match msg.identifier() {
            WM_ACTIVATEAPP => Some(Self::Activate {
                active: msg.wparam() != 0,
            }),
            WM_INPUT => Some(Self::RawInput {
                handle: RawInputHandle(msg.lparam()),
            }),
            WM_MOUSEMOVE => {
                CursorCoords::decode(msg.lparam()).map(|at| Self::Move { at: at.into() })
            }
            WM_MOUSEHOVER => {
                CursorCoords::decode(msg.lparam()).map(|at| Self::Hover { at: at.into() })
            }
            WM_LBUTTONDOWN => button(MouseButton::Left, true),
            WM_LBUTTONUP => button(MouseButton::Left, false),
            WM_RBUTTONDOWN => button(MouseButton::Right, true),
            WM_RBUTTONUP => button(MouseButton::Right, false),
            WM_MBUTTONDOWN => button(MouseButton::Middle, true),
            WM_MBUTTONUP => button(MouseButton::Middle, false),
            WM_XBUTTONDOWN | WM_XBUTTONUP => {
                let pressed = msg.identifier() == WM_XBUTTONDOWN;
                match WParamWords::decode(msg.wparam())?.high as u16 {
                    XBUTTON1 => button(MouseButton::X1, pressed),
                    XBUTTON2 => button(MouseButton::X2, pressed),
                    // Unknown extra button. The position is still current.
                    _ => CursorCoords::decode(msg.lparam()).map(|at| Self::Move { at: at.into() }),
                }
            }
            WM_MOUSEWHEEL => WParamWords::decode(msg.wparam()).map(|words| Self::Wheel {
                delta: i32::from(words.high),
            }),
            _ => None,
        }
    }
}

/// Client-area cursor coordinates packed into the low 32 bits of `lparam`.
/// Both words are signed, as coordinates can be negative on multi-monitor
/// setups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, DekuRead)]
#[deku(endian = "big")]
pub(crate) struct CursorCoords {
    /// Bits 16-31.
    pub(crate) y: i16,
    /// Bits 0-15.
    pub(crate) x: i16,
}

impl CursorCoords {
    fn decode(lparam: isize) -> Option<Self> {
        Self::from_bytes((&(lparam as u32).to_be_bytes(), 0))
            .ok()
            .map(|(_, coords)| coords)
    }
}

impl From<CursorCoords> for Point {
    fn from(coords: CursorCoords) -> Self {
        Point::new(coords.x.into(), coords.y.into())
    }
}

/// The two words of `wparam` for wheel and extra button messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, DekuRead)]
#[deku(endian = "big")]
pub(crate) struct WParamWords {
    /// Bits 16-31. The signed wheel delta, or which extra button changed.
    pub(crate) high: i16,
    /// Bits 0-15. Which buttons and modifier keys are down (`MK_*`).
    pub(crate) low: u16,
}

impl WParamWords {
    fn decode(wparam: usize) -> Option<Self> {
        Self::from_bytes((&(wparam as u32).to_be_bytes(), 0))
            .ok()
            .map(|(_, words)| words)
    }
}

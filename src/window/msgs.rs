//! Identifiers of the window messages the mouse responds to.
//!
//! Defined here rather than taken from the `windows` crate so the message
//! adapter can be built and tested on any host.

pub const WM_ACTIVATEAPP: u32 = 0x001C;
pub const WM_INPUT: u32 = 0x00FF;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MOUSEWHEEL: u32 = 0x020A;
pub const WM_XBUTTONDOWN: u32 = 0x020B;
pub const WM_XBUTTONUP: u32 = 0x020C;
pub const WM_MOUSEHOVER: u32 = 0x02A1;

/// High word of `wparam` in `WM_XBUTTON*` messages.
pub const XBUTTON1: u16 = 0x0001;
pub const XBUTTON2: u16 = 0x0002;

/// One notch of a standard mouse wheel.
pub const WHEEL_DELTA: i32 = 120;

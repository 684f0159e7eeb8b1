//! Window plumbing: raw window messages, window handles, and the Win32
//! implementation of the desktop platform calls.

pub mod msgs;
#[cfg(windows)]
mod win32;

#[cfg(windows)]
pub use win32::*;

use ::std::num::NonZeroIsize;

/// An opaque handle to a native window (an `HWND` on Windows).
///
/// Handles are plain values: they are `Send` and can be compared, but say
/// nothing about whether the window still exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle(NonZeroIsize);

impl WindowHandle {
    /// Wraps a raw window handle. Returns `None` for the null handle.
    pub fn new(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(Self)
    }

    pub fn raw(self) -> isize {
        self.0.get()
    }
}

/// The raw parts of a message delivered to a window procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowsProcessMessage {
    pub umsg: u32,
    pub wparam: usize,
    pub lparam: isize,
}

impl WindowsProcessMessage {
    pub const fn new(umsg: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            umsg,
            wparam,
            lparam,
        }
    }

    /// The message identifier, e.g. [`msgs::WM_MOUSEMOVE`].
    pub const fn identifier(&self) -> u32 {
        self.umsg
    }

    pub const fn wparam(&self) -> usize {
        self.wparam
    }

    pub const fn lparam(&self) -> isize {
        self.lparam
    }
}

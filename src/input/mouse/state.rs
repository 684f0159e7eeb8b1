//! The mouse state snapshot and the small value types it is built from.

use ::bitvec::prelude::*;
use ::strum::{EnumCount, EnumIter, IntoStaticStr};

/// How [`MouseState::x`] and [`MouseState::y`] should be interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, IntoStaticStr)]
#[repr(u8)]
pub enum Mode {
    /// The position is the cursor's coordinate in the client area of the
    /// bound window, in pixels. The cursor is visible.
    #[default]
    Absolute = 0,
    /// The position is the movement since the last read. The cursor is
    /// hidden and confined to the bound window.
    Relative = 1,
}

impl Mode {
    pub(crate) const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Relative,
            _ => Self::Absolute,
        }
    }

    /// The opposite mode.
    pub const fn other(self) -> Self {
        match self {
            Self::Absolute => Self::Relative,
            Self::Relative => Self::Absolute,
        }
    }
}

/// The five buttons tracked for a mouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[repr(u8)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
    /// The first extended button, usually "back".
    X1 = 3,
    /// The second extended button, usually "forward".
    X2 = 4,
}

impl MouseButton {
    const fn index(self) -> usize {
        self as usize
    }
}

/// A position or movement in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Packs both coordinates into one word so they can be stored and loaded
    /// together.
    pub(crate) const fn pack(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    pub(crate) const fn unpack(packed: u64) -> Self {
        Self {
            x: (packed >> 32) as u32 as i32,
            y: packed as u32 as i32,
        }
    }
}

/// The set of pressed mouse buttons.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonSet(BitArr!(for 5, in u8, Lsb0));

impl ButtonSet {
    /// A set with no buttons pressed.
    pub fn empty() -> Self {
        Self(BitArray::ZERO)
    }

    pub(crate) fn from_bits(bits: u8) -> Self {
        Self(BitArray::new([bits & 0b1_1111]))
    }

    pub(crate) fn bits(self) -> u8 {
        self.0.into_inner()[0]
    }

    /// Returns `true` if the given button is pressed.
    pub fn contains(&self, button: MouseButton) -> bool {
        self.0[button.index()]
    }

    /// Marks the given button as pressed or released.
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        self.0.set(button.index(), pressed);
    }

    /// Returns a copy of the set with `button` marked as pressed.
    pub fn with(mut self, button: MouseButton) -> Self {
        self.set(button, true);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.not_any()
    }
}

impl FromIterator<MouseButton> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = MouseButton>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl ::std::fmt::Debug for ButtonSet {
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        use ::strum::IntoEnumIterator;

        f.debug_set()
            .entries(
                MouseButton::iter()
                    .filter(|b| self.contains(*b))
                    .map(<&'static str>::from),
            )
            .finish()
    }
}

/// A snapshot of the mouse state, as returned by [`Mouse::get_state`].
///
/// The snapshot is a plain copy. It does not change after it was taken, no
/// matter what the mouse does in the meantime.
///
/// [`Mouse::get_state`]: crate::input::mouse::Mouse::get_state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseState {
    pub left_button: bool,
    pub right_button: bool,
    pub middle_button: bool,
    pub x_button1: bool,
    pub x_button2: bool,
    /// Horizontal position in [`Mode::Absolute`], or horizontal movement since
    /// the last read in [`Mode::Relative`].
    pub x: i32,
    /// Vertical position in [`Mode::Absolute`], or vertical movement since
    /// the last read in [`Mode::Relative`].
    pub y: i32,
    /// Accumulated wheel movement since the last
    /// [`reset_scroll_wheel_value`]. One detent is usually 120.
    ///
    /// [`reset_scroll_wheel_value`]: crate::input::mouse::Mouse::reset_scroll_wheel_value
    pub scroll_wheel_value: i32,
    pub position_mode: Mode,
}

impl MouseState {
    /// Returns `true` if the given button was pressed when the snapshot was
    /// taken.
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.left_button,
            MouseButton::Right => self.right_button,
            MouseButton::Middle => self.middle_button,
            MouseButton::X1 => self.x_button1,
            MouseButton::X2 => self.x_button2,
        }
    }

    /// The pressed buttons as a set.
    pub fn buttons(&self) -> ButtonSet {
        use ::strum::IntoEnumIterator;

        MouseButton::iter().filter(|b| self.is_pressed(*b)).collect()
    }

    pub(crate) fn set_buttons(&mut self, buttons: ButtonSet) {
        self.left_button = buttons.contains(MouseButton::Left);
        self.right_button = buttons.contains(MouseButton::Right);
        self.middle_button = buttons.contains(MouseButton::Middle);
        self.x_button1 = buttons.contains(MouseButton::X1);
        self.x_button2 = buttons.contains(MouseButton::X2);
    }

    /// The position (or movement) as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

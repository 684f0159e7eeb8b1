//! Edge detection for mouse buttons across consecutive state snapshots.

use ::strum::{EnumCount, IntoEnumIterator};

use super::{MouseButton, MouseState};

/// The transition of a single button between two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonState {
    /// Not pressed in either snapshot.
    #[default]
    Up = 0,
    /// Pressed in both snapshots.
    Held = 1,
    /// Pressed before, not pressed now.
    Released = 2,
    /// Not pressed before, pressed now.
    Pressed = 3,
}

impl ButtonState {
    /// Derives the transition from the previous and current press state.
    pub const fn between(was_pressed: bool, is_pressed: bool) -> Self {
        let changed = was_pressed ^ is_pressed;
        match (is_pressed as u8) | ((changed as u8) << 1) {
            0 => Self::Up,
            1 => Self::Held,
            2 => Self::Released,
            _ => Self::Pressed,
        }
    }
}

/// The transitions of all five buttons between two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ButtonTransitions([ButtonState; MouseButton::COUNT]);

impl ButtonTransitions {
    /// Compares two snapshots, taken in that order.
    pub fn between(previous: &MouseState, current: &MouseState) -> Self {
        let mut transitions = [ButtonState::Up; MouseButton::COUNT];
        for (button, transition) in MouseButton::iter().zip(transitions.iter_mut()) {
            *transition =
                ButtonState::between(previous.is_pressed(button), current.is_pressed(button));
        }
        Self(transitions)
    }

    /// The transition for the given button.
    pub fn get(&self, button: MouseButton) -> ButtonState {
        self.0[button as usize]
    }
}

/// Tracks button transitions from one [`MouseState`] to the next.
///
/// Feed the tracker one snapshot per frame, in order. Each
/// [`update`](Self::update) compares the new snapshot with the one from the
/// previous call, so a click that starts and ends between two frames is
/// never seen as [`ButtonState::Held`].
///
/// # Example
///
/// ```
/// use ::mousetrap::input::mouse::{ButtonState, ButtonStateTracker, MouseState};
///
/// let mut tracker = ButtonStateTracker::new();
///
/// let pressed = MouseState { left_button: true, ..Default::default() };
/// tracker.update(&pressed);
/// assert_eq!(tracker.left_button(), ButtonState::Pressed);
///
/// tracker.update(&pressed);
/// assert_eq!(tracker.left_button(), ButtonState::Held);
///
/// tracker.update(&MouseState::default());
/// assert_eq!(tracker.left_button(), ButtonState::Released);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ButtonStateTracker {
    transitions: ButtonTransitions,
    last_state: MouseState,
}

impl ButtonStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `state` against the snapshot from the previous call and store
    /// it for the next one.
    pub fn update(&mut self, state: &MouseState) {
        self.transitions = ButtonTransitions::between(&self.last_state, state);
        self.last_state = *state;
    }

    /// Forget the previous snapshot and report every button as
    /// [`ButtonState::Up`].
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The snapshot passed to the most recent [`update`](Self::update).
    pub fn last_state(&self) -> &MouseState {
        &self.last_state
    }

    /// All transitions computed by the most recent update.
    pub fn transitions(&self) -> ButtonTransitions {
        self.transitions
    }

    pub fn get(&self, button: MouseButton) -> ButtonState {
        self.transitions.get(button)
    }

    pub fn left_button(&self) -> ButtonState {
        self.get(MouseButton::Left)
    }

    pub fn right_button(&self) -> ButtonState {
        self.get(MouseButton::Right)
    }

    pub fn middle_button(&self) -> ButtonState {
        self.get(MouseButton::Middle)
    }

    pub fn x_button1(&self) -> ButtonState {
        self.get(MouseButton::X1)
    }

    pub fn x_button2(&self) -> ButtonState {
        self.get(MouseButton::X2)
    }
}

//! The shared mouse state, its owner, and handles for polling it from other
//! threads.

use ::lazy_static::lazy_static;
use ::parking_lot::{Mutex, RwLock};
use ::std::sync::{
    atomic::{AtomicBool, AtomicI32, AtomicU64, AtomicU8, Ordering},
    Arc, Weak,
};
use ::tap::Pipe;
use ::tracing::{debug, error, trace};

use super::{Backend, ButtonSet, Mode, MouseButton, MouseState, Point};
use crate::errors::{Error, Result};

lazy_static! {
    /// The one live device, if any. Held weakly so the registry never keeps a
    /// dropped device alive.
    static ref LIVE_DEVICE: Mutex<Weak<DeviceCore>> = Mutex::new(Weak::new());
}

/// A callback which wakes the producer thread after a mode change was
/// requested, so the request is applied without waiting for unrelated input.
pub type ModeRequestNotifier = Box<dyn Fn() -> Result<()> + Send + Sync>;

/// The state shared between the producer (the thread which receives mouse
/// events from the platform) and any number of consumers.
///
/// Every field is an independent atomic. Readers copy them one at a time
/// without locking, so a read racing with an event may mix values from just
/// before and just after that event. Position is stored as one packed word
/// and the five buttons as one byte, so neither of those can tear.
///
/// The methods documented as *producer side* must only be called from the
/// producer thread, typically by a [`Backend`].
pub struct DeviceCore {
    buttons: AtomicU8,
    position: AtomicU64,
    scroll_wheel_value: AtomicI32,
    mode: AtomicU8,

    /// Set by a consumer to zero the wheel. Reads report zero while set, the
    /// producer zeroes the accumulator and clears it on its next event.
    scroll_reset_requested: AtomicBool,
    /// Set once the current relative delta has been returned by a read (or
    /// when relative mode was just entered). Reads report no movement while
    /// set, the producer clears it when writing a new delta.
    relative_delta_consumed: AtomicBool,

    /// Depth-1 request slots for [`Mode::Absolute`] and [`Mode::Relative`].
    absolute_requested: AtomicBool,
    relative_requested: AtomicBool,

    /// Whether the backend needs a binding before the mode may change.
    binding_required: bool,
    bound: AtomicBool,
    notifier: RwLock<Option<ModeRequestNotifier>>,

    /// Cleared when the owning [`Mouse`] is dropped.
    owner_alive: AtomicBool,
}

impl DeviceCore {
    fn new(binding_required: bool) -> Self {
        Self {
            buttons: AtomicU8::new(0),
            position: AtomicU64::new(Point::zero().pack()),
            scroll_wheel_value: AtomicI32::new(0),
            mode: AtomicU8::new(Mode::Absolute as u8),
            scroll_reset_requested: AtomicBool::new(false),
            relative_delta_consumed: AtomicBool::new(false),
            absolute_requested: AtomicBool::new(false),
            relative_requested: AtomicBool::new(false),
            binding_required,
            bound: AtomicBool::new(false),
            notifier: RwLock::new(None),
            owner_alive: AtomicBool::new(true),
        }
    }

    /// Returns a copy of the current state.
    ///
    /// Never blocks. A pending wheel reset is reported as a zero wheel value,
    /// and in [`Mode::Relative`] each movement is normally returned by one
    /// call, with later calls reporting zero movement until the next movement
    /// arrives. The position is loaded before the movement is marked as read,
    /// so a movement stored between the two can be lost while the previous
    /// one is reported again.
    pub fn get_state(&self) -> MouseState {
        let mode = self.mode();
        let position = Point::unpack(self.position.load(Ordering::Acquire));

        let mut state = MouseState {
            x: position.x,
            y: position.y,
            scroll_wheel_value: self.scroll_wheel_value.load(Ordering::Acquire),
            position_mode: mode,
            ..Default::default()
        };
        state.set_buttons(self.buttons());

        if self.scroll_reset_requested.load(Ordering::Acquire) {
            state.scroll_wheel_value = 0;
        }

        if mode == Mode::Relative && self.relative_delta_consumed.swap(true, Ordering::AcqRel) {
            state.x = 0;
            state.y = 0;
        }

        state
    }

    /// Requests the wheel value be reset to zero.
    ///
    /// Subsequent reads on any thread report zero immediately. The stored
    /// value is zeroed when the producer handles its next event.
    pub fn reset_scroll_wheel_value(&self) {
        self.scroll_reset_requested.store(true, Ordering::Release);
    }

    /// Requests a change of position mode.
    ///
    /// The request is accepted immediately but applied by the producer when
    /// it handles its next event, which is also when the cursor is hidden or
    /// shown. Requesting the mode the device is already in does nothing,
    /// other than withdrawing a pending request for the other mode.
    ///
    /// Fails with [`Error::BackendUnavailable`] if the backend must be bound
    /// to a window first.
    pub fn set_mode(&self, mode: Mode) -> Result<()> {
        if self.binding_required && !self.bound.load(Ordering::Acquire) {
            return Err(Error::BackendUnavailable);
        }

        self.request_slot(mode.other())
            .store(false, Ordering::Release);
        if self.mode() == mode {
            return Ok(());
        }

        trace!(mode = <&str>::from(mode), "Mode change requested");
        self.request_slot(mode).store(true, Ordering::Release);

        match &*self.notifier.read() {
            Some(notify) => notify(),
            None => Ok(()),
        }
    }

    /// The mode currently in effect. A requested mode change is not reflected
    /// until the producer has applied it.
    pub fn mode(&self) -> Mode {
        self.mode.load(Ordering::Acquire).pipe(Mode::from_raw)
    }

    /// Whether the backend is currently bound to a window or device.
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    /// *Producer side.* The currently pressed buttons.
    pub fn buttons(&self) -> ButtonSet {
        self.buttons.load(Ordering::Acquire).pipe(ButtonSet::from_bits)
    }

    /// *Producer side.* Marks a single button as pressed or released.
    pub fn set_button(&self, button: MouseButton, pressed: bool) {
        let mut buttons = self.buttons();
        buttons.set(button, pressed);
        self.set_buttons(buttons);
    }

    /// *Producer side.* Replaces the state of all buttons at once.
    pub fn set_buttons(&self, buttons: ButtonSet) {
        self.buttons.store(buttons.bits(), Ordering::Release);
    }

    /// *Producer side.* The stored position, without applying any pending
    /// consume flags.
    pub fn position(&self) -> Point {
        Point::unpack(self.position.load(Ordering::Acquire))
    }

    /// *Producer side.* Overwrites the stored position.
    pub fn set_position(&self, position: Point) {
        self.position.store(position.pack(), Ordering::Release);
    }

    /// *Producer side.* Stores a new relative movement and makes it available
    /// to exactly one read.
    pub fn set_relative_delta(&self, delta: Point) {
        self.set_position(delta);
        self.relative_delta_consumed.store(false, Ordering::Release);
    }

    /// *Producer side.* Adds wheel movement to the accumulated value.
    pub fn add_scroll_wheel_delta(&self, delta: i32) {
        self.scroll_wheel_value.fetch_add(delta, Ordering::AcqRel);
    }

    /// *Producer side.* Applies a pending wheel reset. Returns `true` if one
    /// was pending.
    pub fn apply_scroll_wheel_reset(&self) -> bool {
        let pending = self.scroll_reset_requested.load(Ordering::Acquire);
        if pending {
            self.scroll_wheel_value.store(0, Ordering::Release);
            self.scroll_reset_requested.store(false, Ordering::Release);
        }
        pending
    }

    /// *Producer side.* Takes the pending mode request, if any.
    pub fn take_mode_request(&self) -> Option<Mode> {
        [Mode::Absolute, Mode::Relative]
            .into_iter()
            .find(|mode| self.request_slot(*mode).swap(false, Ordering::AcqRel))
    }

    /// *Producer side.* Returns the pending mode request without taking it.
    pub fn peek_mode_request(&self) -> Option<Mode> {
        [Mode::Absolute, Mode::Relative]
            .into_iter()
            .find(|mode| self.request_slot(*mode).load(Ordering::Acquire))
    }

    /// *Producer side.* Puts a mode into effect. Entering [`Mode::Relative`]
    /// clears the position and marks it as already read, so no movement is
    /// reported until the first relative event arrives.
    pub fn commit_mode(&self, mode: Mode) {
        if mode == Mode::Relative {
            self.relative_delta_consumed.store(true, Ordering::Release);
            self.set_position(Point::zero());
        }
        self.mode.store(mode as u8, Ordering::Release);
        debug!(mode = <&str>::from(mode), "Mouse mode changed");
    }

    /// *Producer side.* Records whether the backend is bound, along with the
    /// callback used to wake the producer on mode requests.
    pub fn set_binding(&self, notifier: Option<ModeRequestNotifier>, bound: bool) {
        *self.notifier.write() = notifier;
        self.bound.store(bound, Ordering::Release);
    }

    fn request_slot(&self, mode: Mode) -> &AtomicBool {
        match mode {
            Mode::Absolute => &self.absolute_requested,
            Mode::Relative => &self.relative_requested,
        }
    }
}

/// A cloneable, thread-safe handle to the live mouse device.
///
/// The handle is how game logic on other threads polls the mouse. It stays
/// valid after the [`Mouse`] is dropped, but the state no longer changes.
#[derive(Clone)]
pub struct MouseHandle {
    core: Arc<DeviceCore>,
}

impl MouseHandle {
    /// Gets a handle to the live mouse device.
    ///
    /// Fails with [`Error::NoInstance`] if no [`Mouse`] has been constructed,
    /// or if it has already been dropped.
    pub fn get() -> Result<Self> {
        LIVE_DEVICE
            .lock()
            .upgrade()
            .filter(|core| core.owner_alive.load(Ordering::Acquire))
            .map(|core| Self { core })
            .ok_or(Error::NoInstance)
    }

    /// See [`DeviceCore::get_state`].
    pub fn get_state(&self) -> MouseState {
        self.core.get_state()
    }

    /// See [`DeviceCore::reset_scroll_wheel_value`].
    pub fn reset_scroll_wheel_value(&self) {
        self.core.reset_scroll_wheel_value()
    }

    /// See [`DeviceCore::set_mode`].
    pub fn set_mode(&self, mode: Mode) -> Result<()> {
        self.core.set_mode(mode)
    }
}

/// A builder pattern object which configures a [`Mouse`].
///
/// ```
/// use ::mousetrap::input::mouse::{Builder, Mode, NullBackend};
///
/// let mouse = Builder::new()
///     .with_mode(Mode::Relative)
///     .build(NullBackend::new())
///     .expect("No other mouse should exist");
/// # drop(mouse);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    mode: Mode,
}

impl Builder {
    /// Construct a new builder. Default values will be used for all properties
    /// until explicitly set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial [`Mode`].
    ///
    /// Defaults to [`Mode::Absolute`]. Backends which need a window apply a
    /// relative initial mode once a window is bound and the first event
    /// arrives.
    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode }
    }

    /// Gets the currently set initial mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Build the [`Mouse`], driven by `backend`.
    ///
    /// Fails with [`Error::AlreadyInitialized`] if another [`Mouse`] is alive.
    pub fn build<B: Backend>(&self, backend: B) -> Result<Mouse<B>> {
        let mut live = LIVE_DEVICE.lock();
        if live
            .upgrade()
            .map_or(false, |core| core.owner_alive.load(Ordering::Acquire))
        {
            return Err(Error::AlreadyInitialized);
        }

        let core = Arc::new(DeviceCore::new(B::REQUIRES_BINDING));
        if self.mode == Mode::Relative {
            core.relative_requested.store(true, Ordering::Release);
        }
        *live = Arc::downgrade(&core);
        drop(live);

        debug!(
            backend = ::std::any::type_name::<B>(),
            mode = <&str>::from(self.mode),
            "Creating mouse"
        );
        Ok(Mouse { core, backend })
    }
}

/// The mouse device, owned by the thread which receives the platform's mouse
/// events.
///
/// Only one [`Mouse`] may be alive at a time. The owner forwards platform
/// events into it (see [`Backend`]) and may poll it directly; other threads
/// poll through a [`MouseHandle`].
///
/// # Example
///
/// ```
/// use ::mousetrap::input::mouse::{Mouse, Mode, NullBackend};
///
/// let mouse = Mouse::new(NullBackend::new()).unwrap();
/// let handle = mouse.handle();
///
/// ::std::thread::spawn(move || {
///     let state = handle.get_state();
///     assert_eq!(state.position_mode, Mode::Absolute);
/// })
/// .join()
/// .unwrap();
/// ```
pub struct Mouse<B: Backend> {
    core: Arc<DeviceCore>,
    backend: B,
}

impl<B: Backend> Mouse<B> {
    /// Constructs the mouse with default settings. See [`Builder`].
    pub fn new(backend: B) -> Result<Self> {
        Builder::new().build(backend)
    }

    /// A handle for polling the mouse from other threads.
    pub fn handle(&self) -> MouseHandle {
        MouseHandle {
            core: Arc::clone(&self.core),
        }
    }

    /// The shared state.
    pub fn core(&self) -> &DeviceCore {
        &self.core
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// See [`DeviceCore::get_state`].
    pub fn get_state(&self) -> MouseState {
        self.core.get_state()
    }

    /// See [`DeviceCore::reset_scroll_wheel_value`].
    pub fn reset_scroll_wheel_value(&self) {
        self.core.reset_scroll_wheel_value()
    }

    /// See [`DeviceCore::set_mode`].
    pub fn set_mode(&self, mode: Mode) -> Result<()> {
        self.core.set_mode(mode)
    }

    /// Binds the backend to a window (or unbinds it with `None`). Binding the
    /// target which is already bound does nothing; otherwise the previous
    /// target is always unbound first.
    pub fn bind(&mut self, target: Option<B::Target>) -> Result<()> {
        self.backend.bind(&self.core, target)
    }

    /// Forwards a button event from the platform.
    pub fn on_button_event(&mut self, event: B::ButtonEvent) -> Result<()> {
        self.apply_pending()?;
        self.backend.on_button_event(&self.core, event)
    }

    /// Forwards a movement event from the platform.
    pub fn on_motion_event(&mut self, event: B::MotionEvent) -> Result<()> {
        self.apply_pending()?;
        self.backend.on_motion_event(&self.core, event)
    }

    /// Forwards a wheel event from the platform.
    pub fn on_wheel_event(&mut self, event: B::WheelEvent) -> Result<()> {
        self.apply_pending()?;
        self.backend.on_wheel_event(&self.core, event)
    }

    /// Forwards a focus change of the bound window or application.
    pub fn on_focus_change(&mut self, focused: bool) -> Result<()> {
        self.apply_pending()?;
        self.backend.on_focus_change(&self.core, focused)
    }

    /// Applies pending consumer requests. Called before every event.
    pub(crate) fn apply_pending(&mut self) -> Result<()> {
        if self.core.apply_scroll_wheel_reset() {
            trace!("Scroll wheel reset applied");
        }
        self.backend.apply_pending_mode_transition(&self.core)
    }
}

impl<B: Backend> Drop for Mouse<B> {
    fn drop(&mut self) {
        debug!("Dropping mouse");
        self.core.owner_alive.store(false, Ordering::Release);
        if let Err(e) = self.backend.bind(&self.core, None) {
            error!("Failed to unbind mouse: {}", e);
        }
    }
}

/// Serializes tests which construct a [`Mouse`], as only one may be alive at
/// a time across the whole test binary.
#[cfg(test)]
pub(crate) fn test_lock() -> ::parking_lot::MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = ::parking_lot::const_mutex(());
    LOCK.lock()
}

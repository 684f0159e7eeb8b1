//! Crate-specific error and result types, plus common conversions.

use ::std::fmt::{self, Display};

/// Result type returned by the pointer device and its backends.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Result type returned by the platform seams ([`DesktopPlatform`],
/// [`CoreWindowPlatform`]).
///
/// [`DesktopPlatform`]: crate::input::mouse::DesktopPlatform
/// [`CoreWindowPlatform`]: crate::input::mouse::CoreWindowPlatform
pub type PlatformResult<T> = ::std::result::Result<T, PlatformError>;

/// Error type for the pointer device.
///
/// None of these are transient. They indicate either misuse (a second
/// device, a mode change before anything was bound) or an environment
/// failure reported by the platform, and are never retried internally.
#[derive(Clone, Debug, ::thiserror::Error)]
pub enum Error {
    /// A second device was constructed while the first one is still alive.
    #[error("A mouse device already exists; only one instance may be alive at a time")]
    AlreadyInitialized,

    /// The device was accessed before construction or after it was dropped.
    #[error("No mouse device is alive")]
    NoInstance,

    /// The platform rejected an event subscription or raw input registration.
    #[error("Failed to register for mouse events\nCaused by:\n    {0}")]
    RegistrationFailed(#[source] PlatformError),

    /// The operation needs a window or device binding which was never made.
    #[error("The mouse backend is not bound to a window")]
    BackendUnavailable,

    /// The signal used to wake the producer could not be created or raised.
    #[error("Failed to signal the mouse event producer\nCaused by:\n    {0}")]
    SynchronizationPrimitiveUnavailable(#[source] PlatformError),

    /// Any other platform call failed while handling an event.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// An error reported by the platform layer. The error attempts to
/// pro-actively capture as much context as possible (error codes, system
/// error message strings, etc).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformError {
    /// The raw platform error code (an `HRESULT` on Windows).
    code: i32,

    /// The system message for `code`, if one was available.
    message: Option<String>,

    /// The name of the platform API function which failed.
    function: Option<&'static str>,

    /// An optional context information which describes what was happening
    /// at the time error.
    context: Option<String>,
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            message,
            function,
            context,
        } = &self;

        if let Some(context) = context {
            write!(f, "{context}\nCaused by:\n    ")?;
        }

        match message {
            Some(message) => write!(f, "{message} (0x{code:08X})")?,
            None => write!(f, "platform error 0x{code:08X}")?,
        }

        if let Some(function) = function {
            write!(f, " ({function})")?;
        }

        Ok(())
    }
}

impl ::std::error::Error for PlatformError {}

impl PlatformError {
    /// Constructs a new error from a raw platform error code.
    pub fn new(code: i32) -> Self {
        Self {
            code,
            message: None,
            function: None,
            context: None,
        }
    }

    /// Attaches the system message describing the error code.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Returns the underlying platform error code.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the name of the platform function which failed, if known.
    pub fn function(&self) -> Option<&'static str> {
        self.function
    }

    /// Captures the calling thread's last OS error.
    #[cfg(windows)]
    pub(crate) fn last_os_error() -> Self {
        ::windows::core::Error::from_win32().into()
    }

    #[cfg(not(windows))]
    pub(crate) fn last_os_error() -> Self {
        let err = ::std::io::Error::last_os_error();
        Self::new(err.raw_os_error().unwrap_or_default()).with_message(err.to_string())
    }
}

#[cfg(windows)]
impl From<::windows::core::Error> for PlatformError {
    fn from(err: ::windows::core::Error) -> Self {
        Self::new(err.code().0).with_message(err.message().to_string())
    }
}

/// A crate-private trait which allows context information to be attached to
/// fallible types.
///
/// This is useful to attach high level context information and track which
/// particular platform function failed, something that might not be obvious
/// when relying on the inner error code alone.
pub(crate) trait Context<T> {
    /// Attach the name of the function which failed to the error as additional
    /// context.
    fn function(self, function: &'static str) -> PlatformResult<T>
    where
        Self: Sized;

    /// Attach a context message to a fallible type and return a platform
    /// error.
    fn context(self, ctx: impl AsRef<str>) -> PlatformResult<T>
    where
        Self: Sized;
}

impl<T> Context<T> for PlatformResult<T> {
    fn function(mut self, f: &'static str) -> PlatformResult<T> {
        if let Err(err) = &mut self {
            err.function = Some(f);
        }
        self
    }

    fn context(mut self, ctx: impl AsRef<str>) -> PlatformResult<T> {
        if let Err(err) = &mut self {
            err.context = Some(ctx.as_ref().to_owned());
        }
        self
    }
}

impl<T> Context<T> for Option<T> {
    fn function(self, function: &'static str) -> PlatformResult<T> {
        self.ok_or_else(PlatformError::last_os_error)
            .function(function)
    }

    fn context(self, ctx: impl AsRef<str>) -> PlatformResult<T> {
        self.ok_or_else(PlatformError::last_os_error).context(ctx)
    }
}

#[cfg(windows)]
impl<T> Context<T> for ::windows::core::Result<T> {
    fn function(self, function: &'static str) -> PlatformResult<T> {
        self.map_err(PlatformError::from).function(function)
    }

    fn context(self, ctx: impl AsRef<str>) -> PlatformResult<T> {
        self.map_err(PlatformError::from).context(ctx)
    }
}

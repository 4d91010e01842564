//! win32k Display Subsystem
//!
//! The display half of the win32k personality layer. A host display/input
//! library provides a pixel surface, an event queue and timers; this crate
//! draws on that surface for GDI callers and turns the host's events into
//! NT input while acting as the cooperative scheduler's idle handler.
//!
//! # Architecture
//!
//! - `surface`: the shared pixel buffer and its format
//! - `damage`: rectangles reported to the host after drawing
//! - `host`: the host library contract and scoped surface locking
//! - `software`: a headless host with a virtual clock
//! - `driver`: the virtual display driver and its per-depth variants
//! - `input`: NT input records and host event translation
//! - `timer`: the timer queue contract
//! - `idle`: the event loop run when no task is runnable
//! - `manager`: the process-wide driver instance

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod damage;
pub mod driver;
pub mod host;
pub mod idle;
pub mod input;
pub mod manager;
pub mod software;
pub mod surface;
pub mod timer;

use core::fmt;

pub use config::DisplayConfig;
pub use damage::DamageRect;
pub use driver::{create_manager, DisplayDriver, VirtualDisplay, Win32kManager};
pub use host::{Host, HostError, HostEvent};
pub use idle::{EventBridge, IdleEnv, IdleOutcome, Sleeper};
pub use input::Input;
pub use software::SoftwareHost;
pub use surface::{DisplayMode, PixelFormat, Surface};
pub use timer::{Timeout, TimerQueue};

/// Display error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Host video/timer subsystem could not be started
    HostInitFailed,
    /// Host could not set up the requested mode
    ModeNotSupported,
    /// No driver variant exists for this pixel depth
    UnsupportedDepth(u8),
    /// Surface lock could not be acquired
    LockFailed,
    /// Host event wait failed
    WaitFailed,
    /// Surface does not exist yet
    NotInitialized,
    /// A driver is already installed
    AlreadyInitialized,
    /// The driver is running the idle loop
    Busy,
    /// Out of memory
    OutOfMemory,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostInitFailed => write!(f, "Host display initialization failed"),
            Self::ModeNotSupported => write!(f, "Display mode not supported"),
            Self::UnsupportedDepth(bpp) => write!(f, "No driver for {} bpp", bpp),
            Self::LockFailed => write!(f, "Surface lock failed"),
            Self::WaitFailed => write!(f, "Host event wait failed"),
            Self::NotInitialized => write!(f, "Display not initialized"),
            Self::AlreadyInitialized => write!(f, "Display already initialized"),
            Self::Busy => write!(f, "Display is in the idle loop"),
            Self::OutOfMemory => write!(f, "Out of memory"),
        }
    }
}

impl From<HostError> for DisplayError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::InitFailed => DisplayError::HostInitFailed,
            HostError::ModeFailed => DisplayError::ModeNotSupported,
            HostError::LockFailed => DisplayError::LockFailed,
            HostError::NoSurface => DisplayError::NotInitialized,
            HostError::OutOfMemory => DisplayError::OutOfMemory,
            HostError::WaitFailed => DisplayError::WaitFailed,
        }
    }
}

/// Result alias for display operations.
pub type DisplayResult<T> = Result<T, DisplayError>;

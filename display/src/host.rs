//! Host display library contract.
//!
//! The host library owns the video mode, the visible surface, the input
//! event queue and a timer facility whose callbacks post events into that
//! queue. Direct access to surface memory may require an explicit lock,
//! which [`SurfaceGuard`] scopes.

use crate::config::TIMER_WAKE_CODE;
use crate::damage::DamageRect;
use crate::surface::{DisplayMode, Surface};
use crate::{DisplayError, DisplayResult};

/// Host library error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// Video/timer subsystem failed to start
    InitFailed,
    /// Video mode could not be set
    ModeFailed,
    /// Surface lock failed
    LockFailed,
    /// No surface exists
    NoSurface,
    /// Waiting for an event failed
    WaitFailed,
    /// Out of memory
    OutOfMemory,
}

/// Host key symbol. Letters and digits coincide with lowercase ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySym(pub u32);

impl KeySym {
    pub const RETURN: KeySym = KeySym(13);
    pub const ESCAPE: KeySym = KeySym(27);
    pub const SPACE: KeySym = KeySym(32);
    pub const NUM_0: KeySym = KeySym(b'0' as u32);
    pub const NUM_9: KeySym = KeySym(b'9' as u32);
    pub const A: KeySym = KeySym(b'a' as u32);
    pub const Z: KeySym = KeySym(b'z' as u32);
    pub const UP: KeySym = KeySym(273);
    pub const DOWN: KeySym = KeySym(274);
    pub const RIGHT: KeySym = KeySym(275);
    pub const LEFT: KeySym = KeySym(276);
    pub const F1: KeySym = KeySym(282);
}

/// Host mouse button numbers
pub mod button {
    pub const LEFT: u8 = 1;
    pub const MIDDLE: u8 = 2;
    pub const RIGHT: u8 = 3;
    pub const WHEEL_UP: u8 = 4;
    pub const WHEEL_DOWN: u8 = 5;
}

/// An event delivered by the host library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The user asked to close the display
    Quit,
    /// Key press or release
    Key {
        sym: KeySym,
        scancode: u8,
        pressed: bool,
    },
    /// Mouse button press or release
    MouseButton {
        button: u8,
        pressed: bool,
        x: u16,
        y: u16,
    },
    /// Mouse moved
    MouseMotion {
        x: u16,
        y: u16,
        xrel: i16,
        yrel: i16,
    },
    /// Application-defined event
    User { code: i32 },
    /// Any host event this layer does not consume
    Other(u8),
}

impl HostEvent {
    /// The event a host timer callback posts.
    pub const TIMER_WAKE: HostEvent = HostEvent::User {
        code: TIMER_WAKE_CODE,
    };

    pub fn is_timer_wake(&self) -> bool {
        *self == Self::TIMER_WAKE
    }
}

/// Host timer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// The host display/input library.
pub trait Host: Send {
    /// Whether the video subsystem is running
    fn was_init(&self) -> bool;

    /// Start the video and timer subsystems
    fn init(&mut self) -> Result<(), HostError>;

    /// Shut everything down; the surface goes away
    fn quit(&mut self);

    /// Set the video mode, creating the visible surface
    fn set_video_mode(&mut self, mode: DisplayMode) -> Result<(), HostError>;

    fn surface(&self) -> Option<&Surface>;

    fn surface_mut(&mut self) -> Option<&mut Surface>;

    /// Whether direct pixel access needs `lock_surface`
    fn must_lock(&self) -> bool;

    fn lock_surface(&mut self) -> Result<(), HostError>;

    fn unlock_surface(&mut self);

    /// Present a changed rectangle of the surface
    fn update_rect(&mut self, rect: DamageRect);

    /// Take the next event without blocking
    fn poll_event(&mut self) -> Option<HostEvent>;

    /// Block until an event arrives
    fn wait_event(&mut self) -> Result<HostEvent, HostError>;

    /// Arm a one-shot timer that posts [`HostEvent::TIMER_WAKE`] after
    /// `interval_ms` milliseconds.
    fn add_timer(&mut self, interval_ms: u32) -> Option<TimerId>;

    /// Cancel a timer. Returns false if it already fired.
    fn remove_timer(&mut self, id: TimerId) -> bool;
}

/// Scoped surface lock.
///
/// Locks only when the host demands it and unlocks on drop.
pub struct SurfaceGuard<'a, H: Host + ?Sized> {
    host: &'a mut H,
    locked: bool,
}

impl<'a, H: Host + ?Sized> SurfaceGuard<'a, H> {
    /// Acquire access to the surface.
    pub fn lock(host: &'a mut H) -> DisplayResult<Self> {
        if host.surface().is_none() {
            return Err(DisplayError::NotInitialized);
        }
        let locked = host.must_lock();
        if locked {
            host.lock_surface()?;
        }
        Ok(Self { host, locked })
    }

    pub fn surface(&mut self) -> DisplayResult<&mut Surface> {
        self.host.surface_mut().ok_or(DisplayError::NotInitialized)
    }
}

impl<H: Host + ?Sized> Drop for SurfaceGuard<'_, H> {
    fn drop(&mut self) {
        if self.locked {
            self.host.unlock_surface();
        }
    }
}

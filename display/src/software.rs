//! Headless software host.
//!
//! An in-memory implementation of the host library: the surface is a plain
//! buffer, time is a virtual millisecond clock, and events are scheduled
//! at clock instants. `wait_event` advances the clock to the next event or
//! timer expiry instead of sleeping, and fails when nothing could ever
//! arrive. Lock failures can be injected, and every damage notification is
//! recorded.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::damage::DamageRect;
use crate::host::{Host, HostError, HostEvent, TimerId};
use crate::surface::{DisplayMode, Surface};

/// Headless host with a virtual clock.
pub struct SoftwareHost {
    initialized: bool,
    fail_init: bool,
    surface: Option<Surface>,
    /// Extra bytes appended to every surface row
    pitch_padding: usize,
    must_lock: bool,
    fail_locks: bool,
    locked: bool,
    lock_count: usize,
    damage: Vec<DamageRect>,
    /// Virtual clock in milliseconds
    now: u64,
    /// Pending events ordered by delivery time
    queue: VecDeque<(u64, HostEvent)>,
    /// Armed timers and their deadlines
    timers: HashMap<TimerId, u64>,
    next_timer: u32,
    wait_calls: usize,
}

impl SoftwareHost {
    pub fn new() -> Self {
        Self {
            initialized: false,
            fail_init: false,
            surface: None,
            pitch_padding: 0,
            must_lock: true,
            fail_locks: false,
            locked: false,
            lock_count: 0,
            damage: Vec::new(),
            now: 0,
            queue: VecDeque::new(),
            timers: HashMap::new(),
            next_timer: 1,
            wait_calls: 0,
        }
    }

    /// Make `init` fail.
    pub fn set_fail_init(&mut self, fail: bool) {
        self.fail_init = fail;
    }

    /// Pad surface rows created by later mode sets.
    pub fn set_pitch_padding(&mut self, bytes: usize) {
        self.pitch_padding = bytes;
    }

    pub fn set_must_lock(&mut self, must_lock: bool) {
        self.must_lock = must_lock;
    }

    /// Make every surface lock fail.
    pub fn set_fail_locks(&mut self, fail: bool) {
        self.fail_locks = fail;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Number of successful surface locks.
    pub fn lock_count(&self) -> usize {
        self.lock_count
    }

    /// Damage notifications in the order they were issued.
    pub fn damage(&self) -> &[DamageRect] {
        &self.damage
    }

    pub fn clear_damage(&mut self) {
        self.damage.clear();
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of armed timers.
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of `wait_event` calls so far.
    pub fn wait_calls(&self) -> usize {
        self.wait_calls
    }

    /// Queue an event for immediate delivery.
    pub fn push_event(&mut self, event: HostEvent) {
        self.push_event_at(self.now, event);
    }

    /// Queue an event for delivery at virtual time `at`.
    pub fn push_event_at(&mut self, at: u64, event: HostEvent) {
        let pos = self
            .queue
            .iter()
            .position(|&(t, _)| t > at)
            .unwrap_or(self.queue.len());
        self.queue.insert(pos, (at, event));
    }

    /// Advance the clock, firing any timers that expire on the way.
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
        self.fire_due_timers();
    }

    fn fire_due_timers(&mut self) {
        let now = self.now;
        let mut due: Vec<(TimerId, u64)> = self
            .timers
            .iter()
            .filter(|&(_, &deadline)| deadline <= now)
            .map(|(&id, &deadline)| (id, deadline))
            .collect();
        due.sort_by_key(|&(_, deadline)| deadline);

        for (id, deadline) in due {
            // one-shot: the callback does not re-arm
            self.timers.remove(&id);
            self.push_event_at(deadline, HostEvent::TIMER_WAKE);
        }
    }

    fn pop_ready(&mut self) -> Option<HostEvent> {
        match self.queue.front() {
            Some(&(at, _)) if at <= self.now => self.queue.pop_front().map(|(_, ev)| ev),
            _ => None,
        }
    }
}

impl Default for SoftwareHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for SoftwareHost {
    fn was_init(&self) -> bool {
        self.initialized
    }

    fn init(&mut self) -> Result<(), HostError> {
        if self.fail_init {
            return Err(HostError::InitFailed);
        }
        self.initialized = true;
        Ok(())
    }

    fn quit(&mut self) {
        self.initialized = false;
        self.surface = None;
        self.locked = false;
        self.timers.clear();
        self.queue.clear();
    }

    fn set_video_mode(&mut self, mode: DisplayMode) -> Result<(), HostError> {
        if !self.initialized {
            return Err(HostError::ModeFailed);
        }
        let row = mode.width as usize * mode.format.bytes_per_pixel();
        let surface = Surface::with_pitch(
            mode.width,
            mode.height,
            mode.format,
            row + self.pitch_padding,
        )?;
        self.surface = Some(surface);
        Ok(())
    }

    fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }

    fn must_lock(&self) -> bool {
        self.must_lock
    }

    fn lock_surface(&mut self) -> Result<(), HostError> {
        if self.fail_locks || self.surface.is_none() {
            return Err(HostError::LockFailed);
        }
        self.locked = true;
        self.lock_count += 1;
        Ok(())
    }

    fn unlock_surface(&mut self) {
        self.locked = false;
    }

    fn update_rect(&mut self, rect: DamageRect) {
        debug_assert!(!self.locked, "damage reported while the surface is locked");
        self.damage.push(rect);
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.fire_due_timers();
        self.pop_ready()
    }

    fn wait_event(&mut self) -> Result<HostEvent, HostError> {
        self.wait_calls += 1;
        self.fire_due_timers();
        if let Some(event) = self.pop_ready() {
            return Ok(event);
        }

        let next_event = self.queue.front().map(|&(at, _)| at);
        let next_timer = self.timers.values().copied().min();
        let wake = match (next_event, next_timer) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            // nothing can ever arrive
            (None, None) => return Err(HostError::WaitFailed),
        };

        self.now = self.now.max(wake);
        self.fire_due_timers();
        self.pop_ready().ok_or(HostError::WaitFailed)
    }

    fn add_timer(&mut self, interval_ms: u32) -> Option<TimerId> {
        if !self.initialized {
            return None;
        }
        let id = TimerId(self.next_timer);
        self.next_timer = self.next_timer.wrapping_add(1);
        self.timers.insert(id, self.now + interval_ms as u64);
        Some(id)
    }

    fn remove_timer(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }
}

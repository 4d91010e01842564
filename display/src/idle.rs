//! Idle Loop
//!
//! When the cooperative scheduler has nothing runnable it calls the
//! installed [`Sleeper`]. One call runs one iteration: a ready host event is
//! handled immediately; otherwise the caller may block on the host until
//! either input arrives or a host timer mirroring the kernel's earliest
//! timer fires.
//!
//! If nothing could ever wake the process (no timers, no window listening
//! for input, no other runnable task) a blocking call returns
//! [`IdleOutcome::Quit`] instead of hanging.

use crate::host::{Host, HostEvent, TimerId};
use crate::input::{self, Input};
use crate::timer::TimerQueue;

/// Destination for synthesized input.
pub trait InputSink {
    fn send_input(&mut self, input: &Input);
}

/// Scheduler state the idle loop needs for deadlock detection.
pub trait TaskMonitor {
    /// True when the calling task is the only one left that could run.
    fn is_last_runnable(&self) -> bool;

    /// True when some window is interested in input.
    fn has_active_window(&self) -> bool;
}

/// Kernel collaborators for one idle iteration.
pub struct IdleEnv<'a> {
    pub timers: &'a mut dyn TimerQueue,
    pub input: &'a mut dyn InputSink,
    pub tasks: &'a dyn TaskMonitor,
}

/// Result of one idle iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleOutcome {
    /// Input was handled, or the caller did not want to block
    Continue,
    /// The process must exit
    Quit,
    /// The mirrored kernel timer expired
    TimedOut,
}

impl IdleOutcome {
    pub fn is_quit(&self) -> bool {
        matches!(self, IdleOutcome::Quit)
    }
}

/// The scheduler's idle handler.
pub trait Sleeper {
    fn check_events(&mut self, env: &mut IdleEnv<'_>, wait: bool) -> IdleOutcome;
}

/// Idle loop statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleStats {
    /// Input records handed to the sink
    pub dispatched: u64,
    /// Host timers armed
    pub timers_armed: u64,
    /// Host timers that woke a wait
    pub timers_fired: u64,
    /// Host timers removed unfired
    pub timers_cancelled: u64,
    /// Blocking calls refused because nothing could wake the process
    pub deadlocks: u64,
}

/// Multiplexes host events and kernel timers.
#[derive(Debug, Default)]
pub struct EventBridge {
    stats: IdleStats,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> IdleStats {
        self.stats
    }

    /// Run one idle iteration against `host`.
    pub fn check_events<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        env: &mut IdleEnv<'_>,
        wait: bool,
    ) -> IdleOutcome {
        let expiry = env.timers.next_expiry();

        if let Some(event) = host.poll_event() {
            if event.is_timer_wake() {
                return IdleOutcome::TimedOut;
            }
            return self.dispatch(&event, env);
        }

        if expiry.is_none() && !env.tasks.has_active_window() && wait && env.tasks.is_last_runnable()
        {
            log::info!("[idle] nothing left to wake the process, quitting");
            self.stats.deadlocks += 1;
            return IdleOutcome::Quit;
        }

        if !wait {
            return IdleOutcome::Continue;
        }

        let mut armed: Option<TimerId> = None;
        if let Some(timeout) = expiry {
            let interval = timeout.to_host_millis();
            armed = host.add_timer(interval);
            match armed {
                Some(_) => self.stats.timers_armed += 1,
                None => log::warn!("[idle] could not arm a {} ms host timer", interval),
            }
        }

        let outcome = match host.wait_event() {
            Ok(event) if event.is_timer_wake() => {
                // a fired one-shot timer is already gone
                armed = None;
                self.stats.timers_fired += 1;
                IdleOutcome::TimedOut
            }
            Ok(event) => self.dispatch(&event, env),
            Err(err) => {
                log::error!("[idle] host event wait failed: {:?}", err);
                IdleOutcome::Quit
            }
        };

        if let Some(id) = armed {
            host.remove_timer(id);
            self.stats.timers_cancelled += 1;
        }
        outcome
    }

    fn dispatch(&mut self, event: &HostEvent, env: &mut IdleEnv<'_>) -> IdleOutcome {
        if *event == HostEvent::Quit {
            log::debug!("[idle] host quit event");
            return IdleOutcome::Quit;
        }

        log::debug!("[idle] host event {:?}", event);
        if let Some(input) = input::translate(event, env.timers.tick_count()) {
            env.input.send_input(&input);
            self.stats.dispatched += 1;
        }
        IdleOutcome::Continue
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::host::KeySym;
    use crate::software::SoftwareHost;
    use crate::timer::Timeout;
    use alloc::vec::Vec;

    pub(crate) struct FakeTimers {
        pub next: Option<Timeout>,
        pub ticks: u32,
    }

    impl TimerQueue for FakeTimers {
        fn next_expiry(&mut self) -> Option<Timeout> {
            self.next
        }

        fn tick_count(&self) -> u32 {
            self.ticks
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub inputs: Vec<Input>,
    }

    impl InputSink for RecordingSink {
        fn send_input(&mut self, input: &Input) {
            self.inputs.push(*input);
        }
    }

    pub(crate) struct FakeTasks {
        pub last_runnable: bool,
        pub active_window: bool,
    }

    impl TaskMonitor for FakeTasks {
        fn is_last_runnable(&self) -> bool {
            self.last_runnable
        }

        fn has_active_window(&self) -> bool {
            self.active_window
        }
    }

    fn space(pressed: bool) -> HostEvent {
        HostEvent::Key {
            sym: KeySym::SPACE,
            scancode: 0x39,
            pressed,
        }
    }

    fn started_host() -> SoftwareHost {
        let mut host = SoftwareHost::new();
        host.init().unwrap();
        host
    }

    fn idle_tasks() -> FakeTasks {
        FakeTasks {
            last_runnable: true,
            active_window: false,
        }
    }

    #[test]
    fn test_deadlock_quits_without_blocking() {
        let mut host = started_host();
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers { next: None, ticks: 0 };
        let mut sink = RecordingSink::default();
        let tasks = idle_tasks();
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(bridge.check_events(&mut host, &mut env, true), IdleOutcome::Quit);
        assert_eq!(host.wait_calls(), 0);
        assert_eq!(bridge.stats().deadlocks, 1);
    }

    #[test]
    fn test_active_window_prevents_deadlock() {
        let mut host = started_host();
        host.push_event_at(5, space(true));
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers { next: None, ticks: 0 };
        let mut sink = RecordingSink::default();
        let tasks = FakeTasks {
            last_runnable: true,
            active_window: true,
        };
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(
            bridge.check_events(&mut host, &mut env, true),
            IdleOutcome::Continue
        );
        assert_eq!(host.wait_calls(), 1);
        assert_eq!(sink.inputs.len(), 1);
    }

    #[test]
    fn test_event_before_timer_disarms_it() {
        let mut host = started_host();
        host.push_event_at(10, space(true));
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers {
            next: Some(Timeout::from_millis(50)),
            ticks: 777,
        };
        let mut sink = RecordingSink::default();
        let tasks = idle_tasks();
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(
            bridge.check_events(&mut host, &mut env, true),
            IdleOutcome::Continue
        );
        assert_eq!(host.now(), 10);
        assert_eq!(host.active_timers(), 0);
        assert_eq!(sink.inputs.len(), 1);
        match sink.inputs[0] {
            Input::Keyboard(ki) => assert_eq!(ki.time, 777),
            other => panic!("unexpected {:?}", other),
        }

        let stats = bridge.stats();
        assert_eq!(stats.timers_armed, 1);
        assert_eq!(stats.timers_cancelled, 1);
        assert_eq!(stats.timers_fired, 0);

        // no stray wake later
        host.advance(100);
        assert_eq!(host.poll_event(), None);
    }

    #[test]
    fn test_timer_expiry_wakes_wait() {
        let mut host = started_host();
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers {
            next: Some(Timeout::from_100ns(250_001)),
            ticks: 0,
        };
        let mut sink = RecordingSink::default();
        let tasks = idle_tasks();
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(
            bridge.check_events(&mut host, &mut env, true),
            IdleOutcome::TimedOut
        );
        assert_eq!(host.now(), 26);
        assert!(sink.inputs.is_empty());
        assert_eq!(bridge.stats().timers_fired, 1);
        assert_eq!(bridge.stats().timers_cancelled, 0);
    }

    #[test]
    fn test_ready_event_short_circuits() {
        let mut host = started_host();
        host.push_event(space(false));
        host.push_event(space(true));
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers {
            next: Some(Timeout::from_millis(5)),
            ticks: 0,
        };
        let mut sink = RecordingSink::default();
        let tasks = idle_tasks();
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(
            bridge.check_events(&mut host, &mut env, true),
            IdleOutcome::Continue
        );
        assert_eq!(sink.inputs.len(), 1);
        assert_eq!(host.wait_calls(), 0);
        assert_eq!(host.active_timers(), 0);
    }

    #[test]
    fn test_no_wait_returns_without_blocking() {
        let mut host = started_host();
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers { next: None, ticks: 0 };
        let mut sink = RecordingSink::default();
        let tasks = idle_tasks();
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(
            bridge.check_events(&mut host, &mut env, false),
            IdleOutcome::Continue
        );
        assert_eq!(host.wait_calls(), 0);
        assert_eq!(bridge.stats().deadlocks, 0);
    }

    #[test]
    fn test_quit_event() {
        let mut host = started_host();
        host.push_event(HostEvent::Quit);
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers { next: None, ticks: 0 };
        let mut sink = RecordingSink::default();
        let tasks = FakeTasks {
            last_runnable: false,
            active_window: true,
        };
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert!(bridge.check_events(&mut host, &mut env, false).is_quit());
        assert!(sink.inputs.is_empty());
    }

    #[test]
    fn test_quit_while_blocked() {
        let mut host = started_host();
        host.push_event_at(3, HostEvent::Quit);
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers {
            next: Some(Timeout::from_millis(40)),
            ticks: 0,
        };
        let mut sink = RecordingSink::default();
        let tasks = idle_tasks();
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(bridge.check_events(&mut host, &mut env, true), IdleOutcome::Quit);
        assert_eq!(host.active_timers(), 0);
    }

    #[test]
    fn test_wait_failure_quits() {
        let mut host = started_host();
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers { next: None, ticks: 0 };
        let mut sink = RecordingSink::default();
        let tasks = FakeTasks {
            last_runnable: false,
            active_window: false,
        };
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(bridge.check_events(&mut host, &mut env, true), IdleOutcome::Quit);
        assert_eq!(host.wait_calls(), 1);
        assert_eq!(bridge.stats().deadlocks, 0);
    }

    #[test]
    fn test_unmapped_key_not_dispatched() {
        let mut host = started_host();
        host.push_event(HostEvent::Key {
            sym: KeySym::F1,
            scancode: 0x3b,
            pressed: true,
        });
        let mut bridge = EventBridge::new();
        let mut timers = FakeTimers { next: None, ticks: 0 };
        let mut sink = RecordingSink::default();
        let tasks = idle_tasks();
        let mut env = IdleEnv {
            timers: &mut timers,
            input: &mut sink,
            tasks: &tasks,
        };

        assert_eq!(
            bridge.check_events(&mut host, &mut env, true),
            IdleOutcome::Continue
        );
        assert!(sink.inputs.is_empty());
        assert_eq!(bridge.stats().dispatched, 0);
    }
}

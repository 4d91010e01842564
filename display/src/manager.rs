//! Process-wide display manager
//!
//! The kernel has exactly one display driver, which is also the idle
//! handler the scheduler calls when nothing is runnable.
//!
//! The slot lock is never held across an idle iteration. The driver is
//! taken out of the slot while it waits on the host and dispatches input,
//! so input sinks may call back into this module. Drawing through
//! [`with_manager`] fails with [`DisplayError::Busy`] in that window, and a
//! [`shutdown`] requested from inside it runs once the iteration is over.

use alloc::boxed::Box;
use spin::Mutex;

use crate::driver::{DisplayDriver, Win32kManager};
use crate::idle::{IdleEnv, IdleOutcome, Sleeper};
use crate::{DisplayError, DisplayResult};

enum Slot {
    Vacant,
    Ready(Box<dyn Win32kManager>),
    /// Driver is out running the idle loop
    Idling { shutdown_requested: bool },
}

/// Global manager instance.
static MANAGER: Mutex<Slot> = Mutex::new(Slot::Vacant);

/// Initialize `manager` and install it.
pub fn install(mut manager: Box<dyn Win32kManager>) -> DisplayResult<()> {
    let mut slot = MANAGER.lock();
    if !matches!(*slot, Slot::Vacant) {
        return Err(DisplayError::AlreadyInitialized);
    }
    manager.init()?;
    *slot = Slot::Ready(manager);
    Ok(())
}

pub fn is_installed() -> bool {
    !matches!(*MANAGER.lock(), Slot::Vacant)
}

/// Run `f` on the installed manager.
pub fn with_manager<R>(f: impl FnOnce(&mut dyn Win32kManager) -> R) -> DisplayResult<R> {
    let mut slot = MANAGER.lock();
    match &mut *slot {
        Slot::Ready(manager) => Ok(f(manager.as_mut())),
        Slot::Idling { .. } => Err(DisplayError::Busy),
        Slot::Vacant => Err(DisplayError::NotInitialized),
    }
}

/// Idle hook for the scheduler. Without a manager there is nothing that
/// could wake the process.
pub fn check_events(env: &mut IdleEnv<'_>, wait: bool) -> IdleOutcome {
    let mut manager = {
        let mut slot = MANAGER.lock();
        match core::mem::replace(
            &mut *slot,
            Slot::Idling {
                shutdown_requested: false,
            },
        ) {
            Slot::Ready(manager) => manager,
            Slot::Vacant => {
                *slot = Slot::Vacant;
                return IdleOutcome::Quit;
            }
            idling @ Slot::Idling { .. } => {
                // nested call from inside an iteration
                *slot = idling;
                return IdleOutcome::Continue;
            }
        }
    };

    let outcome = manager.check_events(env, wait);

    let mut slot = MANAGER.lock();
    if matches!(
        *slot,
        Slot::Idling {
            shutdown_requested: true
        }
    ) {
        *slot = Slot::Vacant;
        drop(slot);
        manager.fini();
    } else {
        *slot = Slot::Ready(manager);
    }
    outcome
}

/// Shut the manager down and uninstall it. Called during an idle
/// iteration, the shutdown happens when that iteration returns.
pub fn shutdown() {
    let mut slot = MANAGER.lock();
    if let Slot::Idling { shutdown_requested } = &mut *slot {
        *shutdown_requested = true;
        return;
    }
    if let Slot::Ready(mut manager) = core::mem::replace(&mut *slot, Slot::Vacant) {
        drop(slot);
        manager.fini();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::driver::create_manager;
    use crate::host::{HostEvent, KeySym};
    use crate::idle::tests::{FakeTasks, FakeTimers, RecordingSink};
    use crate::idle::InputSink;
    use crate::input::Input;
    use crate::software::SoftwareHost;
    use alloc::vec::Vec;
    use win32k_gdi::ColorRef;

    fn small_manager(host: SoftwareHost) -> Box<dyn Win32kManager> {
        let config = DisplayConfig::default().with_mode(16, 16, 16);
        create_manager(host, config).unwrap()
    }

    /// Sink that calls back into the manager on every input and asks for a
    /// shutdown on the second one.
    #[derive(Default)]
    struct ReentrantSink {
        seen: Vec<(bool, Option<DisplayError>, IdleOutcome)>,
    }

    impl InputSink for ReentrantSink {
        fn send_input(&mut self, _input: &Input) {
            let mut timers = FakeTimers { next: None, ticks: 0 };
            let mut inner = RecordingSink::default();
            let tasks = FakeTasks {
                last_runnable: false,
                active_window: true,
            };
            let mut env = IdleEnv {
                timers: &mut timers,
                input: &mut inner,
                tasks: &tasks,
            };
            let nested = check_events(&mut env, true);
            self.seen
                .push((is_installed(), with_manager(|_| ()).err(), nested));
            if self.seen.len() == 2 {
                shutdown();
            }
        }
    }

    fn run_with(sink: &mut dyn InputSink, wait: bool) -> IdleOutcome {
        let mut timers = FakeTimers { next: None, ticks: 0 };
        let tasks = FakeTasks {
            last_runnable: true,
            active_window: false,
        };
        let mut env = IdleEnv {
            timers: &mut timers,
            input: sink,
            tasks: &tasks,
        };
        check_events(&mut env, wait)
    }

    // One test owns the global slot so parallel tests never race on it.
    #[test]
    fn test_manager_lifecycle() {
        assert!(!is_installed());
        assert_eq!(
            with_manager(|_| ()).err(),
            Some(DisplayError::NotInitialized)
        );

        install(small_manager(SoftwareHost::new())).unwrap();
        assert!(is_installed());
        assert_eq!(
            install(small_manager(SoftwareHost::new())).err(),
            Some(DisplayError::AlreadyInitialized)
        );

        let drawn = with_manager(|m| m.set_pixel(3, 3, ColorRef::WHITE)).unwrap();
        assert_eq!(drawn, Ok(()));

        let mut sink = RecordingSink::default();
        assert_eq!(run_with(&mut sink, true), IdleOutcome::Quit);
        assert_eq!(run_with(&mut sink, false), IdleOutcome::Continue);
        // the slot is refilled after each iteration
        assert_eq!(with_manager(|_| ()), Ok(()));

        shutdown();
        assert!(!is_installed());
        assert_eq!(run_with(&mut sink, false), IdleOutcome::Quit);
        shutdown();

        // input sinks may call back into the manager
        let mut host = SoftwareHost::new();
        for _ in 0..2 {
            host.push_event(HostEvent::Key {
                sym: KeySym::SPACE,
                scancode: 0x39,
                pressed: true,
            });
        }
        install(small_manager(host)).unwrap();

        let mut sink = ReentrantSink::default();
        assert_eq!(run_with(&mut sink, false), IdleOutcome::Continue);
        assert_eq!(
            sink.seen,
            [(true, Some(DisplayError::Busy), IdleOutcome::Continue)]
        );
        assert!(is_installed());
        assert_eq!(with_manager(|_| ()), Ok(()));

        // shutdown from inside the iteration runs once it returns
        assert_eq!(run_with(&mut sink, false), IdleOutcome::Continue);
        assert_eq!(sink.seen.len(), 2);
        assert_eq!(
            sink.seen[1],
            (true, Some(DisplayError::Busy), IdleOutcome::Continue)
        );
        assert!(!is_installed());
        assert_eq!(run_with(&mut sink, false), IdleOutcome::Quit);
        assert_eq!(sink.seen.len(), 2);
    }

    #[test]
    fn test_failed_init_not_installed() {
        let mut host = SoftwareHost::new();
        host.set_fail_init(true);
        let manager = create_manager(host, DisplayConfig::default()).unwrap();
        // a driver that fails init never reaches the slot, even if one is
        // already installed by another test
        assert!(install(manager).is_err());
    }
}

//! Timer queue contract
//!
//! Timers belong to the kernel's timer queue. The idle loop only asks how
//! long until the earliest one expires and mirrors that with a single host
//! timer, whose resolution is whole milliseconds.

/// 100 ns units per millisecond
const TICKS_PER_MS: u64 = 10_000;

/// Time remaining until a timer expires, in NT 100 ns units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timeout(u64);

impl Timeout {
    pub const ZERO: Timeout = Timeout(0);

    pub const fn from_100ns(units: u64) -> Self {
        Self(units)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(TICKS_PER_MS))
    }

    pub const fn as_100ns(&self) -> u64 {
        self.0
    }

    /// Host timer interval, rounded up so the host never fires early.
    pub fn to_host_millis(&self) -> u32 {
        let ms = self.0 / TICKS_PER_MS + u64::from(self.0 % TICKS_PER_MS != 0);
        u32::try_from(ms).unwrap_or(u32::MAX)
    }
}

/// The kernel timer queue, as seen by the idle loop.
pub trait TimerQueue {
    /// Time until the earliest pending timer, or `None` if nothing is
    /// pending. Expired timers are processed as a side effect.
    fn next_expiry(&mut self) -> Option<Timeout>;

    /// Milliseconds since boot, used to timestamp input.
    fn tick_count(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_millis_round_up() {
        assert_eq!(Timeout::ZERO.to_host_millis(), 0);
        assert_eq!(Timeout::from_100ns(1).to_host_millis(), 1);
        assert_eq!(Timeout::from_100ns(10_000).to_host_millis(), 1);
        assert_eq!(Timeout::from_100ns(10_001).to_host_millis(), 2);
        assert_eq!(Timeout::from_millis(50).to_host_millis(), 50);
    }

    #[test]
    fn test_host_millis_saturate() {
        assert_eq!(Timeout::from_100ns(u64::MAX - 1).to_host_millis(), u32::MAX);
        assert_eq!(Timeout::from_millis(u64::MAX).as_100ns(), u64::MAX);
    }
}

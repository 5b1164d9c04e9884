use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Single-slot relay for the latest simulation time.
///
/// The simulation thread overwrites the slot every step and the render
/// thread samples it every frame. There is no queue: a slow reader simply
/// misses intermediate values. Before the first write the slot reads zero.
#[derive(Debug, Default)]
pub struct ClockBridge {
    latest: Mutex<Duration>,
}

impl ClockBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `sim_time`, replacing whatever was there.
    pub fn set_time(&self, sim_time: Duration) {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest = sim_time;
    }

    /// Most recently stored time.
    pub fn read_time(&self) -> Duration {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn reads_zero_before_first_write() {
        assert_eq!(ClockBridge::new().read_time(), Duration::ZERO);
    }

    #[test]
    fn last_write_wins() {
        let clock = ClockBridge::new();
        for ms in [10, 20, 30, 40] {
            clock.set_time(Duration::from_millis(ms));
        }
        assert_eq!(clock.read_time(), Duration::from_millis(40));
        // Reading does not drain the slot.
        assert_eq!(clock.read_time(), Duration::from_millis(40));
    }

    #[test]
    fn reader_sees_non_decreasing_values_across_threads() {
        let clock = Arc::new(ClockBridge::new());
        let writer = {
            let clock = clock.clone();
            thread::spawn(move || {
                for step in 1..=10_000u64 {
                    clock.set_time(Duration::from_micros(step));
                }
            })
        };

        let mut last = Duration::ZERO;
        while !writer.is_finished() {
            let now = clock.read_time();
            assert!(now >= last, "time went backwards: {now:?} < {last:?}");
            last = now;
        }
        writer.join().unwrap();
        assert_eq!(clock.read_time(), Duration::from_micros(10_000));
    }
}

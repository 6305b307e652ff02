use std::time::{Duration, Instant};

use crate::definitions::timer;

/// Represents a timer inside of the chip
/// infrastruture, it will count down to
/// zero from what ever number given.
///
/// The timer does not own a clock, the driver
/// calls [`tick`](Timer::tick) with the 60Hz cadence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    /// will store the value of the timer
    value: u8,
}

impl Timer {
    /// Will create a new timer with the given value.
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Will set the value from which the timer shall count down from.
    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Will get the value that the counter is currently at.
    pub fn get_value(&self) -> u8 {
        self.value
    }

    /// Will decrement the timer by one, if it hasn't reached zero yet.
    pub fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }

    /// Checks if the timer is still counting down.
    pub fn is_active(&self) -> bool {
        self.value > 0
    }
}

/// Keeps track of how many timer frames have passed on the wall clock.
///
/// Frames that were missed (e.g. the driver was blocked) are reported
/// all at once by the next call to [`due`](FrameClock::due).
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// the moment the next frame is due
    next: Instant,
    /// the length of a single frame
    interval: Duration,
}

impl FrameClock {
    /// Will create a new clock ticking with the timer frequency
    /// starting at `now`.
    pub fn new(now: Instant) -> Self {
        Self::with_interval(now, Duration::from_micros(timer::INTERVAL_MICROS))
    }

    pub fn with_interval(now: Instant, interval: Duration) -> Self {
        Self {
            next: now + interval,
            interval,
        }
    }

    /// Will return the amount of frames that became due until `now`.
    pub fn due(&mut self, now: Instant) -> u32 {
        let mut frames = 0;
        while self.next <= now {
            self.next += self.interval;
            frames += 1;
        }
        frames
    }

    /// The time left until the next frame is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Will drop all the frames that are overdue, used after the driver
    /// was paused.
    pub fn resync(&mut self, now: Instant) {
        self.next = now + self.interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer() {
        let mut timer = Timer::new(2);
        assert!(timer.is_active());

        timer.tick();
        assert_eq!(timer.get_value(), 1);
        timer.tick();
        assert_eq!(timer.get_value(), 0);
        assert!(!timer.is_active());

        // stays at zero
        timer.tick();
        assert_eq!(timer.get_value(), 0);

        timer.set_value(timer::HERZ as u8);
        for _ in 0..timer::HERZ {
            timer.tick();
        }
        assert_eq!(timer.get_value(), 0);
    }

    #[test]
    fn test_frame_clock() {
        let start = Instant::now();
        let interval = Duration::from_millis(10);
        let mut clock = FrameClock::with_interval(start, interval);

        assert_eq!(clock.due(start), 0);
        assert_eq!(clock.until_next(start), interval);

        assert_eq!(clock.due(start + Duration::from_millis(10)), 1);
        // the same moment doesn't produce the frame twice
        assert_eq!(clock.due(start + Duration::from_millis(10)), 0);

        assert_eq!(clock.due(start + Duration::from_millis(45)), 3);
        assert_eq!(
            clock.until_next(start + Duration::from_millis(45)),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn test_frame_clock_resync() {
        let start = Instant::now();
        let interval = Duration::from_millis(10);
        let mut clock = FrameClock::with_interval(start, interval);

        let later = start + Duration::from_secs(1);
        clock.resync(later);
        assert_eq!(clock.due(later), 0);
        assert_eq!(clock.due(later + interval), 1);
    }
}

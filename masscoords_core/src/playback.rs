//! Playback clock for animation-synchronized marker display.
//!
//! The clock advances once per rendered tick (display refresh, not a fixed
//! rate). Past the last frame it wraps to 0 — looping playback, not a
//! clamp. Fractional accumulation from non-integer speeds is truncated
//! every tick, so `speed < 1` repeats the same integer frame across ticks.

/// Frame counter state machine: `Stopped` or `Running`, toggled directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackClock {
    frame: f64,
    playing: bool,
    speed: f64,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PlaybackClock {
    /// Creates a stopped clock at frame 0 with the given speed
    /// (frames per tick).
    pub fn new(speed: f64) -> Self {
        Self {
            frame: 0.0,
            playing: false,
            speed,
        }
    }

    /// Whether the clock is in the `Running` state.
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Frames advanced per tick.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current integer frame index.
    #[inline]
    pub fn frame(&self) -> usize {
        self.frame as usize
    }

    /// Toggles between `Stopped` and `Running`.
    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Advances one tick and returns the integer frame index.
    ///
    /// If running: `frame += speed`, then wrap to 0 when the result
    /// exceeds `max_frame` (or when there is no valid frame at all).
    /// The frame is floored after the wrap check, never rounded.
    pub fn tick(&mut self, max_frame: Option<usize>) -> usize {
        if self.playing {
            self.frame += self.speed;
            match max_frame {
                Some(max) if self.frame <= max as f64 => {}
                _ => self.frame = 0.0,
            }
        }
        self.frame = self.frame.floor();
        self.frame as usize
    }

    /// Jumps to a frame, clamped to `[0, max_frame]` (0 when none).
    pub fn scrub(&mut self, frame: usize, max_frame: Option<usize>) {
        let max = max_frame.unwrap_or(0);
        self.frame = frame.min(max) as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stopped_clock_holds_frame() {
        let mut clock = PlaybackClock::new(1.0);
        assert!(!clock.is_playing());
        assert_eq!(clock.tick(Some(10)), 0);
        assert_eq!(clock.tick(Some(10)), 0);
    }

    #[test]
    fn test_running_clock_advances() {
        let mut clock = PlaybackClock::new(1.0);
        clock.toggle();
        assert_eq!(clock.tick(Some(10)), 1);
        assert_eq!(clock.tick(Some(10)), 2);
    }

    #[test]
    fn test_wrap_resets_to_zero_not_remainder() {
        // max_frame = 5, speed = 2, frame = 4: 4+2=6 > 5 wraps to 0, not 1
        let mut clock = PlaybackClock::new(2.0);
        clock.toggle();
        clock.scrub(4, Some(5));
        assert_eq!(clock.tick(Some(5)), 0);
    }

    #[test]
    fn test_last_frame_is_reachable_before_wrap() {
        let mut clock = PlaybackClock::new(1.0);
        clock.toggle();
        clock.scrub(4, Some(5));
        assert_eq!(clock.tick(Some(5)), 5);
        assert_eq!(clock.tick(Some(5)), 0);
    }

    #[test]
    fn test_fractional_speed_truncates() {
        // 0.5 per tick floors back to 0 every tick: frame 0 repeats forever
        let mut clock = PlaybackClock::new(0.5);
        clock.toggle();
        assert_eq!(clock.tick(Some(10)), 0);
        assert_eq!(clock.tick(Some(10)), 0);
        assert_eq!(clock.tick(Some(10)), 0);
    }

    #[test]
    fn test_no_frames_pins_to_zero() {
        let mut clock = PlaybackClock::new(3.0);
        clock.toggle();
        assert_eq!(clock.tick(None), 0);
        assert_eq!(clock.tick(None), 0);
    }

    #[test]
    fn test_scrub_clamps() {
        let mut clock = PlaybackClock::new(1.0);
        clock.scrub(99, Some(5));
        assert_eq!(clock.frame(), 5);
        clock.scrub(3, None);
        assert_eq!(clock.frame(), 0);
    }

    proptest! {
        /// The integer frame stays inside [0, max_frame] under any tick
        /// sequence and speed.
        #[test]
        fn prop_frame_stays_in_bounds(
            speed in 0.0f64..20.0,
            max_frame in 0usize..200,
            ticks in 1usize..100,
        ) {
            let mut clock = PlaybackClock::new(speed);
            clock.toggle();
            for _ in 0..ticks {
                let frame = clock.tick(Some(max_frame));
                prop_assert!(frame <= max_frame);
            }
        }
    }
}

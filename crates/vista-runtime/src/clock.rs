//! Frame clock

use std::time::Instant;

/// Longest frame delta handed to the simulation, in seconds
const MAX_DELTA: f32 = 0.25;

/// Measures time between frames
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f32,
    /// Frames ticked so far
    pub frame_count: u64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock and return the new delta. Call once per frame.
    pub fn tick(&mut self) -> f32 {
        self.advance(Instant::now())
    }

    fn advance(&mut self, now: Instant) -> f32 {
        self.frame_count += 1;

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return 0.0;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f32();
        self.last_instant = now;

        // A stalled frame (window drag, breakpoint) would otherwise teleport the camera
        self.delta_time = elapsed.min(MAX_DELTA);
        self.total_time += self.delta_time as f64;
        self.delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame_count, 0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn test_delta_measured() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.advance(start);
        let dt = clock.advance(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-4);
        assert!((clock.total_time - 0.016).abs() < 1e-4);
    }

    #[test]
    fn test_delta_clamped() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.advance(start);
        let dt = clock.advance(start + Duration::from_secs(3));
        assert_eq!(dt, 0.25);
    }
}

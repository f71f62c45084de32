//! Driver-time clocks: the time attack countdown and the game stopwatch.
//!
//! Both only move when the engine's `advance` feeds them a delta.

use serde::{Deserialize, Serialize};

/// One-shot countdown. Fires once per `restart`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    duration: f32,
    elapsed: f32,
    running: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            running: false,
        }
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds left, or zero when stopped.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        if self.running {
            (self.duration - self.elapsed).max(0.0)
        } else {
            0.0
        }
    }

    /// Start over from the full duration.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by `dt` seconds. Returns true exactly once, on the tick the
    /// countdown runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.running = false;
            return true;
        }
        false
    }
}

/// Elapsed play time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stopwatch {
    elapsed: f64,
    running: bool,
}

impl Stopwatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Reset to `elapsed` seconds and start running.
    pub fn start_at(&mut self, elapsed: f64) {
        self.elapsed = elapsed;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.running {
            self.elapsed += f64::from(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_fires_once() {
        let mut c = Countdown::new(3.0);
        assert!(!c.tick(5.0), "stopped countdown never fires");

        c.restart();
        assert!(!c.tick(1.0));
        assert!((c.remaining() - 2.0).abs() < 1e-6);
        assert!(!c.tick(1.5));
        assert!(c.tick(0.5));
        assert!(!c.tick(10.0));
        assert!(!c.is_running());
    }

    #[test]
    fn test_countdown_restart() {
        let mut c = Countdown::new(1.0);
        c.restart();
        c.tick(0.75);
        c.restart();
        assert!(!c.tick(0.75));
        assert!(c.tick(0.25));
    }

    #[test]
    fn test_stopwatch() {
        let mut w = Stopwatch::new();
        w.tick(1.0);
        assert_eq!(w.elapsed(), 0.0);

        w.start_at(10.0);
        w.tick(0.5);
        w.stop();
        w.tick(3.0);
        assert!((w.elapsed() - 10.5).abs() < 1e-9);
    }
}

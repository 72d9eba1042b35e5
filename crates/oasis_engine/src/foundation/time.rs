//! Time management utilities
//!
//! All timing is driven by an explicit wall-clock reading in seconds (the
//! platform's clock), so the simulation can be replayed deterministically.

/// Fixed-rate gate for the logic tick.
///
/// The simulation step runs only when more than `threshold` seconds have
/// elapsed since the previous step. Rendering is not gated.
#[derive(Debug, Clone)]
pub struct TickGate {
    threshold: f64,
    last_tick: f64,
    tick_count: u64,
}

impl TickGate {
    /// Create a gate that opens once more than `threshold` seconds have passed
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last_tick: 0.0,
            tick_count: 0,
        }
    }

    /// Restart the gate from `now` (used when play begins after a menu)
    pub fn reset(&mut self, now: f64) {
        self.last_tick = now;
    }

    /// Poll the gate.
    ///
    /// Returns the elapsed time since the last tick when the gate opens, and
    /// records `now` as the new tick time.
    pub fn poll(&mut self, now: f64) -> Option<f32> {
        let delta = now - self.last_tick;
        if delta > self.threshold {
            self.last_tick = now;
            self.tick_count += 1;
            Some(delta as f32)
        } else {
            None
        }
    }

    /// Time elapsed since the last tick; input handlers scale accelerations by it
    pub fn since_last_tick(&self, now: f64) -> f32 {
        (now - self.last_tick).max(0.0) as f32
    }

    /// Number of ticks that have run
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Gate threshold in seconds
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Elapsed-time comparison against a fixed dwell duration.
///
/// Not a cancellation token: it only answers whether the dwell has passed.
#[derive(Debug, Clone, Copy)]
pub struct DwellTimer {
    started_at: f64,
    duration: f64,
}

impl DwellTimer {
    /// Start a dwell of `duration` seconds at `now`
    pub fn start(now: f64, duration: f64) -> Self {
        Self {
            started_at: now,
            duration,
        }
    }

    /// Seconds elapsed since the dwell started
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.started_at
    }

    /// Whether the full dwell has elapsed
    pub fn is_elapsed(&self, now: f64) -> bool {
        self.elapsed(now) > self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_stays_closed_below_threshold() {
        let mut gate = TickGate::new(0.05);
        assert_eq!(gate.poll(0.01), None);
        assert_eq!(gate.poll(0.05), None);
        assert_eq!(gate.tick_count(), 0);
    }

    #[test]
    fn test_gate_reports_accumulated_delta() {
        let mut gate = TickGate::new(0.05);
        assert_eq!(gate.poll(0.02), None);
        let delta = gate.poll(0.08).expect("gate should open");
        assert!((delta - 0.08).abs() < 1e-6);

        // Next window measured from the last tick, not from zero
        assert_eq!(gate.poll(0.10), None);
        assert!(gate.poll(0.14).is_some());
        assert_eq!(gate.tick_count(), 2);
    }

    #[test]
    fn test_dwell_timer() {
        let dwell = DwellTimer::start(3.0, 10.0);
        assert!(!dwell.is_elapsed(12.0));
        assert!(!dwell.is_elapsed(13.0));
        assert!(dwell.is_elapsed(13.5));
    }
}

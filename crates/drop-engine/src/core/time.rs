/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }
}

/// Virtual wall clock in milliseconds.
///
/// The runner advances it by the real frame delta, so timers measured against it
/// follow real time rather than the number of simulation steps. Tests advance it by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    now_ms: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by a frame delta given in seconds. Negative deltas are ignored.
    pub fn advance_secs(&mut self, dt: f32) {
        self.advance_ms(dt as f64 * 1000.0);
    }

    /// Advance by a delta in milliseconds. Negative deltas are ignored.
    pub fn advance_ms(&mut self, ms: f64) {
        if ms > 0.0 {
            self.now_ms += ms;
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

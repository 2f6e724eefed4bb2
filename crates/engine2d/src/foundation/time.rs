//! Frame timing

/// Frame clock driven by the platform's frame pump
///
/// The platform reports raw frame deltas; the clock clamps them to a maximum
/// step so a slow frame cannot blow up the simulation.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_delta_time: f32,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock clamping deltas to `max_delta_time` seconds
    pub fn new(max_delta_time: f32) -> Self {
        Self {
            max_delta_time: max_delta_time.max(0.0),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance by one frame and return the clamped delta
    pub fn tick(&mut self, raw_delta: f32) -> f32 {
        let delta = if raw_delta.is_finite() {
            raw_delta.clamp(0.0, self.max_delta_time)
        } else {
            log::warn!("Non-finite frame delta {raw_delta}, using zero");
            0.0
        };

        self.delta_time = delta;
        self.total_time += delta;
        self.frame_count += 1;
        delta
    }

    /// Delta of the last tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Simulated time since the clock was created
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Upper bound applied to every delta
    pub fn max_delta_time(&self) -> f32 {
        self.max_delta_time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.05)
    }
}

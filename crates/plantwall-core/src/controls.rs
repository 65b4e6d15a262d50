// ── Control ranges ──
//
// Bounds for the adjustable form values. Frontends step through these
// with the arrow keys (TUI) or validate flags against them (CLI).

/// An inclusive integer range with a step size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub min: u16,
    pub max: u16,
    pub step: u16,
}

/// Lighting brightness in percent.
pub const BRIGHTNESS: RangeSpec = RangeSpec::new(0, 100, 5);

/// Manual watering run length in seconds.
pub const WATERING_DURATION: RangeSpec = RangeSpec::new(10, 300, 5);

/// Automatic watering interval in hours (up to one week).
pub const WATERING_INTERVAL_HOURS: RangeSpec = RangeSpec::new(1, 168, 1);

impl RangeSpec {
    pub const fn new(min: u16, max: u16, step: u16) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(self, value: u16) -> u16 {
        value.clamp(self.min, self.max)
    }

    /// Clamp, then round to the nearest step counted from `min`.
    pub fn snap(self, value: u16) -> u16 {
        let value = self.clamp(value);
        if self.step <= 1 {
            return value;
        }
        let offset = value - self.min;
        let steps = (offset + self.step / 2) / self.step;
        self.clamp(self.min.saturating_add(steps.saturating_mul(self.step)))
    }

    pub fn step_up(self, value: u16) -> u16 {
        self.snap(value.saturating_add(self.step))
    }

    pub fn step_down(self, value: u16) -> u16 {
        self.snap(value.saturating_sub(self.step))
    }
}

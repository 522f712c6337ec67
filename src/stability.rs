use crate::config::StabilityConfig;

/// Consecutive-frame counter gating scan, positioning and move decisions.
///
/// The count grows by one for every frame that yields exactly nine valid
/// regions and drops to zero on any other frame or on a classification failure.
#[derive(Debug, Clone)]
pub struct StabilityGate {
    count: u32,
    thresholds: StabilityConfig,
}

impl StabilityGate {
    pub fn new(thresholds: StabilityConfig) -> Self {
        Self {
            count: 0,
            thresholds,
        }
    }

    /// Feed one frame's detection outcome and return the updated count
    pub fn observe(&mut self, nine_regions: bool) -> u32 {
        if nine_regions {
            self.count = self.count.saturating_add(1);
        } else {
            self.count = 0;
        }
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn thresholds(&self) -> &StabilityConfig {
        &self.thresholds
    }

    /// Stable long enough to take a before-snapshot
    pub fn is_armed(&self) -> bool {
        self.count >= self.thresholds.arm
    }

    /// Past the guidance threshold, comparison snapshots are refreshed every frame
    pub fn is_guiding(&self) -> bool {
        self.count > self.thresholds.guide
    }

    pub fn is_confirming(&self) -> bool {
        self.count >= self.thresholds.confirm
    }

    /// Fires exactly once per stable run
    pub fn at_scan(&self) -> bool {
        self.count == self.thresholds.scan
    }

    /// Fires exactly once per stable run
    pub fn at_position(&self) -> bool {
        self.count == self.thresholds.position
    }
}

//! Pilot flame-presence filter.
//!
//! The pilot sensor is an AC flame-rectification probe: the raw ADC stream
//! is a noisy on/off signal with single-cycle dropouts. A first-order IIR
//! low-pass (time constant ~5 samples, so ~5 s at the 1 Hz loop rate)
//! debounces it into a stable presence signal — slow enough to ride out a
//! one-cycle dropout, fast enough to report a lost pilot within seconds.
//!
//! Integer arithmetic throughout: `smoothed' = (4*smoothed + raw) / 5`
//! with truncating division. Values are non-negative so truncation and
//! floor coincide.

/// Exponential smoothing filter over the raw pilot ADC stream.
///
/// Starts at zero, so after a cold boot the pilot reads "absent" for the
/// first few cycles until the smoothed value climbs past the threshold.
#[derive(Debug, Clone, Copy)]
pub struct PilotFilter {
    smoothed: u16,
    threshold: u16,
}

impl PilotFilter {
    pub fn new(threshold: u16) -> Self {
        Self {
            smoothed: 0,
            threshold,
        }
    }

    /// Fold one raw sample into the smoothed value and return it.
    pub fn update(&mut self, raw: u16) -> u16 {
        let next = (4 * u32::from(self.smoothed) + u32::from(raw)) / 5;
        self.smoothed = next as u16;
        self.smoothed
    }

    /// Current smoothed ADC count.
    pub fn smoothed(&self) -> u16 {
        self.smoothed
    }

    /// Whether the smoothed signal is above the lit-pilot threshold.
    pub fn is_pilot_present(&self) -> bool {
        self.smoothed > self.threshold
    }
}

//! Raw instrument count span and engineering-unit scaling.
//!
//! Process values travel in two representations: engineering units (0–100 %)
//! and the instrument's native integer counts. The span maps linearly between
//! the two. All functions here are pure and total: out-of-range inputs are
//! clamped, never rejected.

use serde::{Deserialize, Serialize};

/// Lowest raw count of the default instrument span.
pub const RAW_LO: f64 = 6240.0;

/// Highest raw count of the default instrument span.
pub const RAW_HI: f64 = 31208.0;

/// Feedback at or below this count reads as a closed limit indication.
pub const CLOSED_LIMIT: i32 = 6340;

/// Feedback at or above this count reads as an open limit indication.
pub const OPEN_LIMIT: i32 = 31208;

/// Linear engineering (0–100 %) to raw count mapping over a fixed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Raw count at 0 %.
    pub lo: f64,
    /// Raw count at 100 %.
    pub hi: f64,
}

impl RawSpan {
    /// The instrument span shared by all analog devices.
    pub const DEFAULT: Self = Self {
        lo: RAW_LO,
        hi: RAW_HI,
    };

    /// Full width of the span in counts.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Clamp a count into `[lo, hi]`.
    pub fn clamp(&self, count: f64) -> f64 {
        count.clamp(self.lo, self.hi)
    }

    /// Convert an engineering percentage to a raw count, truncated to an
    /// integer. Input is clamped to `[0, 100]`.
    pub fn unscale(&self, percent: f64) -> i32 {
        let pct = percent.clamp(0.0, 100.0);
        (self.lo + self.width() * pct / 100.0) as i32
    }

    /// Convert a raw count back to an engineering percentage. Input is
    /// clamped into the span.
    pub fn to_percent(&self, count: f64) -> f64 {
        (self.clamp(count) - self.lo) / self.width() * 100.0
    }

    /// Derate a configured maximum rate by how far a driving channel's count
    /// sits above the span minimum: zero at `lo`, the full rate at `hi`.
    ///
    /// The driving count is clamped to `lo` from below only, so a channel
    /// pegged above the span can exceed the configured rate.
    pub fn scaled_rate_of_change(&self, driving_count: f64, max_rate: f64) -> f64 {
        let driving = driving_count.max(self.lo);
        max_rate * (driving - self.lo) / self.width()
    }
}

impl Default for RawSpan {
    fn default() -> Self {
        Self::DEFAULT
    }
}

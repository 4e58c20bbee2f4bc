/// Zoom level model: pixels per second with a fit-to-view floor.
use serde::{Deserialize, Serialize};

use crate::Seconds;

/// Multiplier applied per zoom step.
pub const ZOOM_STEP: f64 = 1.25;

/// Upper bound on the zoom level.
pub const MAX_PX_PER_SEC: f64 = 1200.0;

/// Lower bound when no usable view geometry exists.
pub const MIN_PX_PER_SEC: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomModel {
    px_per_sec: Option<f64>,
    step: f64,
    max_px_per_sec: f64,
}

impl Default for ZoomModel {
    fn default() -> Self {
        Self {
            px_per_sec: None,
            step: ZOOM_STEP,
            max_px_per_sec: MAX_PX_PER_SEC,
        }
    }
}

impl ZoomModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom level, `None` until a level has been applied.
    pub fn current(&self) -> Option<f64> {
        self.px_per_sec
    }

    /// Forget the current level (a new source invalidates it).
    pub fn reset(&mut self) {
        self.px_per_sec = None;
    }

    /// Zoom at which the whole duration exactly fills the view; falls back
    /// to the global minimum when either input is unusable.
    pub fn fit(view_width: f64, duration: Seconds) -> f64 {
        if view_width.is_finite() && duration.is_finite() && view_width > 0.0 && duration > 0.0 {
            (view_width / duration).max(MIN_PX_PER_SEC)
        } else {
            MIN_PX_PER_SEC
        }
    }

    /// Clamp a requested level into `[fit, max]`. The whole duration stays
    /// visible and the upper bound holds for any request, including
    /// non-finite ones.
    pub fn clamp(&self, requested: f64, fit: f64) -> f64 {
        requested.max(fit).min(self.max_px_per_sec)
    }

    /// Clamp and store a requested level, returning the value now in effect.
    pub fn apply(&mut self, requested: f64, fit: f64) -> f64 {
        let clamped = self.clamp(requested, fit);
        self.px_per_sec = Some(clamped);
        clamped
    }

    /// One exponential step in; starts from fit when no level is set.
    pub fn zoom_in(&mut self, fit: f64) -> f64 {
        match self.px_per_sec {
            Some(level) => self.apply(level * self.step, fit),
            None => self.reset_zoom(fit),
        }
    }

    /// One exponential step out; starts from fit when no level is set.
    pub fn zoom_out(&mut self, fit: f64) -> f64 {
        match self.px_per_sec {
            Some(level) => self.apply(level / self.step, fit),
            None => self.reset_zoom(fit),
        }
    }

    /// Back to the fit level.
    pub fn reset_zoom(&mut self, fit: f64) -> f64 {
        self.apply(fit, fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_fills_the_view() {
        assert_eq!(ZoomModel::fit(800.0, 400.0), 2.0);
        // short audio in a wide view still fits above the floor
        assert_eq!(ZoomModel::fit(1000.0, 10.0), 100.0);
    }

    #[test]
    fn test_fit_falls_back_on_bad_geometry() {
        assert_eq!(ZoomModel::fit(0.0, 60.0), MIN_PX_PER_SEC);
        assert_eq!(ZoomModel::fit(800.0, 0.0), MIN_PX_PER_SEC);
        assert_eq!(ZoomModel::fit(f64::NAN, 60.0), MIN_PX_PER_SEC);
        assert_eq!(ZoomModel::fit(800.0, f64::INFINITY), MIN_PX_PER_SEC);
        // very long audio clamps up to the floor
        assert_eq!(ZoomModel::fit(800.0, 10_000.0), MIN_PX_PER_SEC);
    }

    #[test]
    fn test_clamp_bounds_hold_for_any_request() {
        let zoom = ZoomModel::new();
        let fit = 2.0;
        for requested in [-5.0, 0.0, 1.0, 2.0, 500.0, 5000.0, f64::NEG_INFINITY] {
            let clamped = zoom.clamp(requested, fit);
            assert!(clamped >= fit, "requested {requested} went below fit");
            assert!(clamped <= MAX_PX_PER_SEC, "requested {requested} went above max");
        }
        assert_eq!(zoom.clamp(f64::INFINITY, fit), MAX_PX_PER_SEC);
        assert_eq!(zoom.clamp(f64::NAN, fit), fit);
    }

    #[test]
    fn test_steps_fall_back_to_fit_when_unset() {
        let fit = 4.0;
        let mut zoom = ZoomModel::new();
        assert_eq!(zoom.zoom_in(fit), fit);

        let mut zoom = ZoomModel::new();
        assert_eq!(zoom.zoom_out(fit), fit);
    }

    #[test]
    fn test_reset_in_out_returns_to_fit() {
        let fit = 4.0;
        let mut zoom = ZoomModel::new();
        assert_eq!(zoom.reset_zoom(fit), fit);
        assert_eq!(zoom.zoom_in(fit), 5.0);
        // zoom out is clamped at fit, so the round trip lands exactly back
        assert_eq!(zoom.zoom_out(fit), fit);
    }

    #[test]
    fn test_zoom_in_saturates_at_max() {
        let fit = 2.0;
        let mut zoom = ZoomModel::new();
        zoom.apply(1100.0, fit);
        assert_eq!(zoom.zoom_in(fit), MAX_PX_PER_SEC);
        assert_eq!(zoom.zoom_in(fit), MAX_PX_PER_SEC);
    }
}

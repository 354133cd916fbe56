//! Calibrated nomograph axes.
//!
//! An axis is an affine map between a position on the scanned chart (pixels,
//! millimetres, any linear unit) and the axis value, taken in log10 space for
//! logarithmic scales:
//!
//! ```text
//! map(v)   = (1 − f)·p0 + f·p1,         f = (t(v) − t0) / (t1 − t0)
//! unmap(p) = t⁻¹( (1 − g)·t0 + g·t1 ), g = (p − p0) / (p1 − p0)
//! ```
//!
//! where `t = log10` on a log axis and the identity on a linear one. The
//! interpolation is exact at both anchors.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{require_finite, CalcError, CalcResult};

/// Relative slack when deciding whether a value lies inside the calibrated range
const RANGE_EPSILON: f64 = 1e-12;

fn lerp(a: f64, b: f64, f: f64) -> f64 {
    (1.0 - f) * a + f * b
}

/// Axis graduation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisScale {
    /// Logarithmic (values must be positive)
    Log,
    /// Linear
    Linear,
}

impl AxisScale {
    /// Value into the space the axis is linear in.
    pub fn transform(&self, value: f64) -> Option<f64> {
        match self {
            AxisScale::Log if value > 0.0 => Some(value.log10()),
            AxisScale::Log => None,
            AxisScale::Linear => Some(value),
        }
    }

    pub fn inverse(&self, t: f64) -> f64 {
        match self {
            AxisScale::Log => 10f64.powf(t),
            AxisScale::Linear => t,
        }
    }

    pub(crate) fn check_value(&self, axis: &str, value: f64) -> CalcResult<f64> {
        require_finite(axis, value)?;
        self.transform(value).ok_or_else(|| {
            CalcError::invalid_input(axis, value.to_string(), "Log axis values must be positive")
        })
    }
}

/// A picked (position, value) pair on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub position: f64,
    pub value: f64,
}

impl CalibrationPoint {
    pub fn new(position: f64, value: f64) -> Self {
        CalibrationPoint { position, value }
    }
}

/// Result of reading an axis in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisReading {
    pub axis: String,
    pub position: f64,
    pub value: f64,
    /// Outside the calibrated range
    pub extrapolated: bool,
}

/// Immutable calibrated axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NomographAxis {
    pub name: String,
    pub scale: AxisScale,

    /// First anchor (position, transformed value)
    p0: f64,
    t0: f64,

    /// Second anchor
    p1: f64,
    t1: f64,

    /// RMS position error of the calibration points (0 for a two-point axis)
    pub fit_residual: f64,
}

impl NomographAxis {
    /// Axis through two calibration points.
    ///
    /// Fails with `InsufficientCalibration` when the points share a position
    /// or a transformed value, and with `InvalidDomainInput` for a
    /// non-positive value on a log axis.
    pub fn from_points(
        name: impl Into<String>,
        scale: AxisScale,
        first: CalibrationPoint,
        second: CalibrationPoint,
    ) -> CalcResult<Self> {
        let name = name.into();
        require_finite(&name, first.position)?;
        require_finite(&name, second.position)?;
        let t0 = scale.check_value(&name, first.value)?;
        let t1 = scale.check_value(&name, second.value)?;
        Self::from_anchors(name, scale, (first.position, t0), (second.position, t1), 0.0)
    }

    /// Axis through two anchors already in transformed space.
    pub(crate) fn from_anchors(
        name: String,
        scale: AxisScale,
        (p0, t0): (f64, f64),
        (p1, t1): (f64, f64),
        fit_residual: f64,
    ) -> CalcResult<Self> {
        if p0 == p1 {
            return Err(CalcError::insufficient_calibration(
                name,
                "Calibration points share a position",
            ));
        }
        if t0 == t1 {
            return Err(CalcError::insufficient_calibration(
                name,
                "Calibration points have equal values on this scale",
            ));
        }
        Ok(NomographAxis {
            name,
            scale,
            p0,
            t0,
            p1,
            t1,
            fit_residual,
        })
    }

    /// Calibrated value range (low, high)
    pub fn value_range(&self) -> (f64, f64) {
        let (a, b) = (self.scale.inverse(self.t0), self.scale.inverse(self.t1));
        (a.min(b), a.max(b))
    }

    /// Calibrated position range (low, high)
    pub fn position_range(&self) -> (f64, f64) {
        (self.p0.min(self.p1), self.p0.max(self.p1))
    }

    /// Position of a value, without range checks or logging.
    pub fn position_of(&self, value: f64) -> CalcResult<f64> {
        let t = self.scale.check_value(&self.name, value)?;
        Ok(lerp(self.p0, self.p1, (t - self.t0) / (self.t1 - self.t0)))
    }

    /// Value at a position, without range checks or logging.
    pub fn value_at(&self, position: f64) -> f64 {
        let t = lerp(self.t0, self.t1, (position - self.p0) / (self.p1 - self.p0));
        self.scale.inverse(t)
    }

    fn outside(&self, x: f64, a: f64, b: f64) -> bool {
        let (lo, hi) = (a.min(b), a.max(b));
        let slack = RANGE_EPSILON * (hi - lo).abs().max(1.0);
        x < lo - slack || x > hi + slack
    }

    /// Value to position; flags and logs extrapolation.
    pub fn map(&self, value: f64) -> CalcResult<AxisReading> {
        let position = self.position_of(value)?;
        let extrapolated = self.outside(position, self.p0, self.p1);
        if extrapolated {
            warn!(event = "axis_extrapolated", axis = %self.name, value, position, "value outside calibrated range");
        }
        Ok(AxisReading {
            axis: self.name.clone(),
            position,
            value,
            extrapolated,
        })
    }

    /// Position to value; flags and logs extrapolation.
    pub fn unmap(&self, position: f64) -> CalcResult<AxisReading> {
        require_finite(&self.name, position)?;
        let value = self.value_at(position);
        let extrapolated = self.outside(position, self.p0, self.p1);
        if extrapolated {
            warn!(event = "axis_extrapolated", axis = %self.name, value, position, "position outside calibrated range");
        }
        Ok(AxisReading {
            axis: self.name.clone(),
            position,
            value,
            extrapolated,
        })
    }
}

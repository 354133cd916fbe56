//! Axis calibration from picked chart points.
//!
//! Two distinct points define the axis exactly. With more than two, a
//! least-squares line is fitted in transformed space (position against
//! log10 value or value) and the RMS position error is kept on the axis.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::axis::{AxisScale, CalibrationPoint, NomographAxis};
use crate::errors::{require_finite, CalcError, CalcResult};

/// Collects calibration points for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NomographCalibrator {
    pub axis: String,
    pub scale: AxisScale,
    pub points: Vec<CalibrationPoint>,
}

impl NomographCalibrator {
    pub fn new(axis: impl Into<String>, scale: AxisScale) -> Self {
        NomographCalibrator {
            axis: axis.into(),
            scale,
            points: Vec::new(),
        }
    }

    pub fn with_point(mut self, position: f64, value: f64) -> Self {
        self.add_point(position, value);
        self
    }

    pub fn add_point(&mut self, position: f64, value: f64) {
        self.points.push(CalibrationPoint::new(position, value));
    }

    /// Distinct points in transformed space, duplicates collapsed.
    fn distinct_points(&self) -> CalcResult<Vec<(f64, f64)>> {
        let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(self.points.len());
        for point in &self.points {
            require_finite(&self.axis, point.position)?;
            let t = self.scale.check_value(&self.axis, point.value)?;

            let existing = distinct
                .iter()
                .find(|(p, _)| *p == point.position)
                .map(|&(_, value)| value);
            match existing {
                Some(existing) if existing == t => continue,
                Some(_) => {
                    return Err(CalcError::insufficient_calibration(
                        &self.axis,
                        format!("Position {} is assigned two different values", point.position),
                    ))
                }
                None => distinct.push((point.position, t)),
            }
        }
        Ok(distinct)
    }

    /// Build the calibrated axis.
    pub fn calibrate(&self) -> CalcResult<NomographAxis> {
        let points = self.distinct_points()?;
        if points.len() < 2 {
            return Err(CalcError::insufficient_calibration(
                &self.axis,
                format!("{} distinct point(s) supplied, at least 2 required", points.len()),
            ));
        }

        let axis = if points.len() == 2 {
            NomographAxis::from_anchors(self.axis.clone(), self.scale, points[0], points[1], 0.0)?
        } else {
            fit_axis(&self.axis, self.scale, &points)?
        };

        info!(
            event = "axis_calibrated",
            axis = %self.axis,
            points = points.len(),
            fit_residual = axis.fit_residual,
        );
        Ok(axis)
    }
}

/// Least-squares position = a + b·t, anchored at the extreme transformed values.
fn fit_axis(name: &str, scale: AxisScale, points: &[(f64, f64)]) -> CalcResult<NomographAxis> {
    let n = points.len() as f64;
    let mean_p = points.iter().map(|(p, _)| p).sum::<f64>() / n;
    let mean_t = points.iter().map(|(_, t)| t).sum::<f64>() / n;

    let s_tt: f64 = points.iter().map(|(_, t)| (t - mean_t).powi(2)).sum();
    let s_tp: f64 = points.iter().map(|(p, t)| (t - mean_t) * (p - mean_p)).sum();

    if s_tt == 0.0 {
        return Err(CalcError::insufficient_calibration(
            name,
            "All calibration points have equal values on this scale",
        ));
    }
    let slope = s_tp / s_tt;
    if slope == 0.0 {
        return Err(CalcError::insufficient_calibration(
            name,
            "Fitted axis has zero slope",
        ));
    }
    let intercept = mean_p - slope * mean_t;

    let rms = (points
        .iter()
        .map(|(p, t)| (p - (intercept + slope * t)).powi(2))
        .sum::<f64>()
        / n)
        .sqrt();

    let t_min = points.iter().map(|(_, t)| *t).fold(f64::INFINITY, f64::min);
    let t_max = points.iter().map(|(_, t)| *t).fold(f64::NEG_INFINITY, f64::max);

    NomographAxis::from_anchors(
        name.to_string(),
        scale,
        (intercept + slope * t_min, t_min),
        (intercept + slope * t_max, t_max),
        rms,
    )
}

//! # Nomograph Calibration
//!
//! Converts positions picked on a scanned design chart into physical values
//! and back. Each axis is calibrated independently from (position, value)
//! pairs; cross-axis constructions (turning lines, pivot points) are built
//! from the [`geometry`] helpers.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::nomograph::{AxisScale, NomographCalibrator};
//!
//! let axis = NomographCalibrator::new("Mr", AxisScale::Log)
//!     .with_point(100.0, 1000.0)
//!     .with_point(800.0, 20000.0)
//!     .calibrate()
//!     .unwrap();
//!
//! let reading = axis.unmap(450.0).unwrap();
//! assert!(!reading.extrapolated);
//! println!("Mr at 450: {:.0} psi", reading.value);
//! ```

pub mod axis;
pub mod calibrator;
pub mod geometry;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use axis::{AxisReading, AxisScale, CalibrationPoint, NomographAxis};
pub use calibrator::NomographCalibrator;
pub use geometry::{Line, Point};

use crate::errors::{CalcError, CalcResult};

/// Roadbed resilient modulus axis of the composite-k chart (psi)
pub const AXIS_MR: &str = "Mr";
/// Subbase thickness axis of the composite-k chart (in)
pub const AXIS_DSB: &str = "DSB";
/// Composite modulus of subgrade reaction axis (pci)
pub const AXIS_K: &str = "k";

/// A named set of calibrated axes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NomographChart {
    pub name: String,
    pub axes: BTreeMap<String, NomographAxis>,
}

impl NomographChart {
    pub fn new(name: impl Into<String>) -> Self {
        NomographChart {
            name: name.into(),
            axes: BTreeMap::new(),
        }
    }

    /// Add or replace an axis, keyed by its name.
    pub fn insert(&mut self, axis: NomographAxis) {
        self.axes.insert(axis.name.clone(), axis);
    }

    /// Calibrate and add an axis.
    pub fn calibrate(&mut self, calibrator: &NomographCalibrator) -> CalcResult<()> {
        let axis = calibrator.calibrate()?;
        self.insert(axis);
        Ok(())
    }

    pub fn axis(&self, name: &str) -> CalcResult<&NomographAxis> {
        self.axes.get(name).ok_or_else(|| CalcError::AxisNotFound {
            axis: name.to_string(),
        })
    }

    pub fn map(&self, axis: &str, value: f64) -> CalcResult<AxisReading> {
        self.axis(axis)?.map(value)
    }

    pub fn unmap(&self, axis: &str, position: f64) -> CalcResult<AxisReading> {
        self.axis(axis)?.unmap(position)
    }

    /// AASHTO composite modulus of subgrade reaction chart, default calibration.
    ///
    /// Mr runs vertically (1000 psi at 850 down to 20000 psi at 350); DSB and
    /// k share the horizontal direction (4 in at 180 to 18 in at 720, and
    /// 50 pci at 820 to 1500 pci at 1020).
    pub fn composite_k() -> CalcResult<Self> {
        let mut chart = NomographChart::new("Composite modulus of subgrade reaction");
        chart.calibrate(
            &NomographCalibrator::new(AXIS_MR, AxisScale::Log)
                .with_point(850.0, 1000.0)
                .with_point(350.0, 20000.0),
        )?;
        chart.calibrate(
            &NomographCalibrator::new(AXIS_DSB, AxisScale::Log)
                .with_point(180.0, 4.0)
                .with_point(720.0, 18.0),
        )?;
        chart.calibrate(
            &NomographCalibrator::new(AXIS_K, AxisScale::Log)
                .with_point(820.0, 50.0)
                .with_point(1020.0, 1500.0),
        )?;
        Ok(chart)
    }

    /// Read k∞ from Mr and subbase thickness.
    ///
    /// The turning point sits at (DSB position, Mr position); k is read on
    /// the k axis at the turning point's horizontal position. Needs the
    /// `Mr`, `DSB` and `k` axes.
    pub fn read_composite_k(&self, mr_psi: f64, dsb_in: f64) -> CalcResult<CompositeKReading> {
        let mr = self.map(AXIS_MR, mr_psi)?;
        let dsb = self.map(AXIS_DSB, dsb_in)?;
        let turning_point = Point::new(dsb.position, mr.position);
        let k = self.unmap(AXIS_K, turning_point.x)?;
        Ok(CompositeKReading {
            extrapolated: mr.extrapolated || dsb.extrapolated || k.extrapolated,
            mr,
            dsb,
            k,
            turning_point,
        })
    }
}

/// Result of a composite-k chart construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeKReading {
    pub mr: AxisReading,
    pub dsb: AxisReading,
    pub k: AxisReading,
    pub turning_point: Point,
    /// Any of the three readings is outside its calibrated range
    pub extrapolated: bool,
}

impl CompositeKReading {
    pub fn k_pci(&self) -> f64 {
        self.k.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chart_has_three_axes() {
        let chart = NomographChart::composite_k().unwrap();
        assert_eq!(chart.axes.len(), 3);
        assert!(chart.axis(AXIS_MR).is_ok());
        assert!(matches!(chart.axis("CBR"), Err(CalcError::AxisNotFound { .. })));
    }

    #[test]
    fn test_composite_k_reading() {
        let chart = NomographChart::composite_k().unwrap();
        let reading = chart.read_composite_k(5000.0, 10.0).unwrap();

        assert!(!reading.mr.extrapolated);
        assert!(!reading.dsb.extrapolated);
        assert_eq!(reading.turning_point.y, reading.mr.position);
        // DSB 10 in sits at x ≈ 509; the k axis only spans 820-1020
        assert!((reading.dsb.position - 508.97).abs() < 0.01);
        assert!(reading.k.extrapolated);
        assert!(reading.extrapolated);
        assert!(reading.k_pci() > 0.0);
    }

    #[test]
    fn test_calibration_positions_reproduced() {
        let chart = NomographChart::composite_k().unwrap();
        assert_eq!(chart.map(AXIS_MR, 1000.0).unwrap().position, 850.0);
        assert_eq!(chart.map(AXIS_MR, 20000.0).unwrap().position, 350.0);
        assert_eq!(chart.map(AXIS_K, 50.0).unwrap().position, 820.0);
        assert_eq!(chart.map(AXIS_K, 1500.0).unwrap().position, 1020.0);
        assert!((chart.unmap(AXIS_DSB, 720.0).unwrap().value - 18.0).abs() < 1e-9);
    }
}

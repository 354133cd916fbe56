//! # Nomograph Reading
//!
//! Calibrates a chart from picked (position, value) pairs and answers a list
//! of reading requests against it. With no axes supplied, the default
//! composite modulus of subgrade reaction chart is used.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "label": "k∞ for CBR 5 subgrade",
//!   "chart_name": "Composite k",
//!   "axes": [],
//!   "readings": [
//!     { "kind": "CompositeK", "mr_psi": 7500.0, "dsb_in": 8.0 },
//!     { "kind": "ValueAt", "axis": "Mr", "position": 600.0 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::CalcResult;
use crate::nomograph::{
    AxisReading, AxisScale, CalibrationPoint, CompositeKReading, NomographCalibrator, NomographChart,
};

/// Calibration points for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisCalibrationInput {
    pub name: String,
    pub scale: AxisScale,
    pub points: Vec<CalibrationPoint>,
}

impl AxisCalibrationInput {
    fn calibrator(&self) -> NomographCalibrator {
        NomographCalibrator {
            axis: self.name.clone(),
            scale: self.scale,
            points: self.points.clone(),
        }
    }
}

/// One question asked of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ReadingRequest {
    /// Value under a picked position
    ValueAt { axis: String, position: f64 },
    /// Position of a known value
    PositionOf { axis: String, value: f64 },
    /// Composite-k construction from Mr and subbase thickness
    CompositeK { mr_psi: f64, dsb_in: f64 },
}

/// Input for a nomograph reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NomographInput {
    pub label: String,

    #[serde(default)]
    pub chart_name: String,

    /// Axes to calibrate; empty selects the default composite-k chart
    #[serde(default)]
    pub axes: Vec<AxisCalibrationInput>,

    pub readings: Vec<ReadingRequest>,
}

impl NomographInput {
    /// Build the calibrated chart.
    pub fn chart(&self) -> CalcResult<NomographChart> {
        if self.axes.is_empty() {
            return NomographChart::composite_k();
        }
        let mut chart = NomographChart::new(self.chart_name.clone());
        for axis in &self.axes {
            chart.calibrate(&axis.calibrator())?;
        }
        Ok(chart)
    }
}

/// Calibrated axis as reported back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSummary {
    pub name: String,
    pub scale: AxisScale,
    pub value_range: (f64, f64),
    pub position_range: (f64, f64),
    pub fit_residual: f64,
}

/// Answer to one reading request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ReadingOutcome {
    Axis(AxisReading),
    CompositeK(CompositeKReading),
}

impl ReadingOutcome {
    pub fn extrapolated(&self) -> bool {
        match self {
            ReadingOutcome::Axis(r) => r.extrapolated,
            ReadingOutcome::CompositeK(r) => r.extrapolated,
        }
    }
}

/// Results from a nomograph reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NomographResult {
    pub chart_name: String,
    pub axes: Vec<AxisSummary>,
    pub readings: Vec<ReadingOutcome>,
}

impl NomographResult {
    pub fn any_extrapolated(&self) -> bool {
        self.readings.iter().any(ReadingOutcome::extrapolated)
    }
}

/// Calibrate the chart and answer every reading request.
pub fn calculate(input: &NomographInput) -> CalcResult<NomographResult> {
    info!(event = "chart_calibration_start", label = %input.label, axes = input.axes.len());

    let chart = input.chart()?;
    let readings = input
        .readings
        .iter()
        .map(|request| match request {
            ReadingRequest::ValueAt { axis, position } => chart.unmap(axis, *position).map(ReadingOutcome::Axis),
            ReadingRequest::PositionOf { axis, value } => chart.map(axis, *value).map(ReadingOutcome::Axis),
            ReadingRequest::CompositeK { mr_psi, dsb_in } => {
                chart.read_composite_k(*mr_psi, *dsb_in).map(ReadingOutcome::CompositeK)
            }
        })
        .collect::<CalcResult<Vec<_>>>()?;

    let axes = chart
        .axes
        .values()
        .map(|axis| AxisSummary {
            name: axis.name.clone(),
            scale: axis.scale,
            value_range: axis.value_range(),
            position_range: axis.position_range(),
            fit_residual: axis.fit_residual,
        })
        .collect();

    info!(event = "chart_calibration_end", chart = %chart.name, readings = readings.len());

    Ok(NomographResult {
        chart_name: chart.name,
        axes,
        readings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;

    fn mr_only() -> NomographInput {
        NomographInput {
            label: "Mr scale".to_string(),
            chart_name: "Test chart".to_string(),
            axes: vec![AxisCalibrationInput {
                name: "Mr".to_string(),
                scale: AxisScale::Log,
                points: vec![CalibrationPoint::new(100.0, 1000.0), CalibrationPoint::new(800.0, 20000.0)],
            }],
            readings: vec![
                ReadingRequest::ValueAt { axis: "Mr".to_string(), position: 450.0 },
                ReadingRequest::PositionOf { axis: "Mr".to_string(), value: 1000.0 },
            ],
        }
    }

    #[test]
    fn test_custom_axis_readings() {
        let result = calculate(&mr_only()).unwrap();
        assert_eq!(result.axes.len(), 1);
        assert_eq!(result.readings.len(), 2);

        match &result.readings[1] {
            ReadingOutcome::Axis(r) => assert_eq!(r.position, 100.0),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!result.any_extrapolated());
    }

    #[test]
    fn test_default_chart_when_no_axes() {
        let input = NomographInput {
            label: "k".to_string(),
            chart_name: String::new(),
            axes: vec![],
            readings: vec![ReadingRequest::CompositeK { mr_psi: 7500.0, dsb_in: 8.0 }],
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.axes.len(), 3);
        assert!(matches!(result.readings[0], ReadingOutcome::CompositeK(_)));
    }

    #[test]
    fn test_unknown_axis() {
        let mut input = mr_only();
        input.readings.push(ReadingRequest::ValueAt { axis: "DSB".to_string(), position: 1.0 });
        let err = calculate(&input).unwrap_err();
        assert!(matches!(err, CalcError::AxisNotFound { .. }));
    }

    #[test]
    fn test_request_json_format() {
        let json = r#"{ "kind": "CompositeK", "mr_psi": 7500.0, "dsb_in": 8.0 }"#;
        let request: ReadingRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request, ReadingRequest::CompositeK { mr_psi: 7500.0, dsb_in: 8.0 });
    }
}

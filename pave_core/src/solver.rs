//! # Structural Number Solver
//!
//! Finds the Structural Number that satisfies the flexible performance
//! equation, using Brent's method (inverse quadratic interpolation with a
//! bisection fallback) over a fixed bracket.
//!
//! The bracket is never widened and the result is never clamped: if the
//! residual does not change sign between the bracket ends the solver reports
//! [`CalcError::NoRootInBracket`], and if it cannot converge within the
//! configured iteration budget it reports [`CalcError::IterationLimitReached`].
//!
//! ## Example
//!
//! ```rust
//! use pave_core::equations::PerformanceEquation;
//! use pave_core::reliability::ReliabilityParameters;
//! use pave_core::solver::{SolverConfig, StructuralNumberSolver};
//!
//! let eq = PerformanceEquation::new(
//!     5_000_000.0,
//!     ReliabilityParameters { zr: -1.282, so: 0.45 },
//!     1.7,
//!     7500.0,
//! );
//! let solver = StructuralNumberSolver::new(SolverConfig::default());
//! let sn = solver.solve(&eq).unwrap();
//! assert!(sn.sn > 4.0 && sn.sn < 6.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equations::PerformanceEquation;
use crate::errors::{require_positive, CalcError, CalcResult};

/// Root-finder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Lower end of the SN bracket (just above zero)
    pub lower: f64,

    /// Upper end of the SN bracket
    pub upper: f64,

    /// Absolute tolerance on SN
    pub tolerance: f64,

    /// Hard iteration cap
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            lower: 0.01,
            upper: 25.0,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("solver.lower", self.lower)?;
        require_positive("solver.upper", self.upper)?;
        if self.upper <= self.lower {
            return Err(CalcError::invalid_input(
                "solver.upper",
                self.upper.to_string(),
                "Upper bracket must exceed lower bracket",
            ));
        }
        require_positive("solver.tolerance", self.tolerance)?;
        if self.tolerance > 1e-4 {
            return Err(CalcError::invalid_input(
                "solver.tolerance",
                self.tolerance.to_string(),
                "Tolerance must not exceed 1e-4 SN",
            ));
        }
        if self.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "solver.max_iterations",
                "0",
                "At least one iteration is required",
            ));
        }
        Ok(())
    }
}

/// A converged root.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootResult {
    /// Root location
    pub root: f64,

    /// Objective value at the root
    pub residual: f64,

    /// Iterations used
    pub iterations: usize,
}

/// Brent's method on `f` over `[a, b]`.
///
/// `f` returns `None` where it is undefined; an undefined end point counts as
/// "no sign change" and an undefined interior point falls back to bisection.
pub fn brent_root_find<F>(f: F, a: f64, b: f64, tolerance: f64, max_iterations: usize) -> CalcResult<RootResult>
where
    F: Fn(f64) -> Option<f64>,
{
    let no_root = |fa: Option<f64>, fb: Option<f64>| CalcError::NoRootInBracket {
        lower: a,
        upper: b,
        residual_lower: fa.unwrap_or(f64::NEG_INFINITY),
        residual_upper: fb.unwrap_or(f64::NEG_INFINITY),
    };

    let (fa0, fb0) = (f(a), f(b));
    let (mut fa, mut fb) = match (fa0, fb0) {
        (Some(fa), Some(fb)) => (fa, fb),
        _ => return Err(no_root(fa0, fb0)),
    };

    if fa == 0.0 {
        return Ok(RootResult { root: a, residual: 0.0, iterations: 0 });
    }
    if fb == 0.0 {
        return Ok(RootResult { root: b, residual: 0.0, iterations: 0 });
    }
    if fa.signum() == fb.signum() {
        return Err(no_root(Some(fa), Some(fb)));
    }

    let (mut a, mut b) = (a, b);
    let (mut c, mut fc) = (a, fa);
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * tolerance;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(RootResult { root: b, residual: fb, iterations: iteration });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Interpolation step (secant or inverse quadratic)
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let qa = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * qa * (qa - r) - (b - a) * (r - 1.0)),
                    (qa - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };

        fb = match f(b) {
            Some(value) => value,
            None => {
                // Undefined interior point: retreat to the midpoint of the bracket
                b = a + m;
                match f(b) {
                    Some(value) => value,
                    None => return Err(no_root(Some(fa), None)),
                }
            }
        };
    }

    Err(CalcError::IterationLimitReached {
        max_iterations,
        last_estimate: b,
    })
}

/// A solved structural number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolvedSn {
    /// Required structural number
    pub sn: f64,

    /// Performance-equation residual at `sn`
    pub residual: f64,

    /// Iterations the root finder used
    pub iterations: usize,
}

/// Root-finds the SN required by a [`PerformanceEquation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralNumberSolver {
    pub config: SolverConfig,
}

impl StructuralNumberSolver {
    pub fn new(config: SolverConfig) -> Self {
        StructuralNumberSolver { config }
    }

    /// Solve for the SN at which the residual is zero.
    ///
    /// Validates the equation inputs first, so a non-positive support
    /// modulus or serviceability loss is reported as an input error rather
    /// than as a missing root.
    pub fn solve(&self, equation: &PerformanceEquation) -> CalcResult<SolvedSn> {
        self.config.validate()?;
        equation.validate()?;

        let root = brent_root_find(
            |sn| equation.residual(sn),
            self.config.lower,
            self.config.upper,
            self.config.tolerance,
            self.config.max_iterations,
        )?;

        debug!(
            event = "sn_solved",
            support_mr_psi = equation.support_mr_psi,
            sn = root.root,
            residual = root.residual,
            iterations = root.iterations,
        );

        Ok(SolvedSn {
            sn: root.root,
            residual: root.residual,
            iterations: root.iterations,
        })
    }
}

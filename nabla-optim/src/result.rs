use std::fmt;

/// Trace record for one outer iteration of the solver.
#[derive(Debug, Clone, Copy)]
pub struct SolverIteration<F> {
    /// Whether the iteration's line search succeeded.
    pub success: bool,
    /// Cost evaluations the line search spent.
    pub line_search_iterations: usize,
    /// Accepted step size (zero when the line search failed).
    pub step_size: F,
    /// Objective value after the iteration.
    pub cost: F,
    /// `‖x‖` after the iteration.
    pub param_norm: F,
    /// `‖∇f(x)‖` after the iteration.
    pub gradient_norm: F,
}

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Gradient tolerance met.
    Converged,
    /// Iteration budget exhausted before the tolerance was met.
    MaxIterations,
    /// No acceptable step existed along the search direction.
    LineSearchFailed,
    /// A curvature pair with `sᵀy = 0` made the update ill-posed.
    DegenerateCurvature,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Converged => write!(f, "gradient tolerance met"),
            Termination::MaxIterations => write!(f, "maximum iterations reached"),
            Termination::LineSearchFailed => write!(f, "line search failed"),
            Termination::DegenerateCurvature => write!(f, "degenerate curvature pair"),
        }
    }
}

/// Result of a solver run.
///
/// The optimized point itself lives in the caller's buffer; this records
/// the trajectory. `iterations` holds one entry per outer iteration in
/// execution order, including a terminal failed one.
#[derive(Debug, Clone)]
pub struct SolverResult<F> {
    /// Whether the run converged.
    pub success: bool,
    /// Why the run stopped.
    pub termination: Termination,
    /// Objective value at the starting point.
    pub first_cost: F,
    /// Objective value at the final (best) point.
    pub final_cost: F,
    /// Per-iteration trace.
    pub iterations: Vec<SolverIteration<F>>,
}

use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// Floating-point type the fall model and the Runge-Kutta steppers run on.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {
    /// Converts an `f64` literal (a tableau coefficient, a physical constant).
    /// Values the target type cannot represent come back as NaN.
    fn lit(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }
}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Right-hand side of an autonomous or time-dependent ODE, such as the
/// polar-coordinate fall in `rotating_fall`.
pub trait DynamicalSystem<T: Scalar> {
    /// Number of state components (4 for `(r, θ, ṙ, θ̇)`).
    fn dimension(&self) -> usize;

    /// Writes the time derivative of `x` at time `t` into `out`, which has
    /// `dimension()` entries.
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// Fixed-step integrator advancing a state in place.
pub trait Steppable<T: Scalar> {
    /// Advances `state` from `t` to `t + dt` and moves `t` along with it.
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);
}

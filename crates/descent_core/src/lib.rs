pub mod comparison;
pub mod config;
pub mod curves;
pub mod error;
pub mod profile;
pub mod rotating_fall;
pub mod solvers;
/// The `descent_core` crate holds the numerical side of two small physics
/// demonstrations. It performs no I/O; every flow yields plain frame values
/// for an external renderer.
///
/// Key components:
/// - **Traits**: `Scalar`, `DynamicalSystem` (ODE right-hand sides), `Steppable` (solvers).
/// - **Solvers**: Tableau-driven fixed-step Runge-Kutta (RK4, Tsit5).
/// - **Rotating fall**: polar-coordinate fall of an object released from a tower
///   on a rotating Earth, with Earth and ground views per frame.
/// - **Curves / Profile / Comparison**: the fastest-descent race between a
///   cycloid, a straight line, a vertical-horizontal path and a circular arc.
pub mod traits;

pub use config::{DescentConfig, FallConfig, SamplingConfig};
pub use error::{DescentError, DescentResult};

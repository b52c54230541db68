use crate::traits::{DynamicalSystem, Scalar, Steppable};
use serde::{Deserialize, Serialize};

/// Butcher tableau of an explicit Runge-Kutta method.
/// Row `s` of `a` holds the weights of stages `0..s`.
#[derive(Debug)]
pub struct Tableau {
    pub name: &'static str,
    pub c: &'static [f64],
    pub a: &'static [&'static [f64]],
    pub b: &'static [f64],
}

impl Tableau {
    pub fn stages(&self) -> usize {
        self.b.len()
    }
}

/// Classic Runge-Kutta 4th order.
pub const RK4_TABLEAU: Tableau = Tableau {
    name: "rk4",
    c: &[0.0, 0.5, 0.5, 1.0],
    a: &[&[], &[0.5], &[0.0, 0.5], &[0.0, 0.0, 1.0]],
    b: &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
};

/// Tsitouras 5/4, stepped at fixed size with the 5th order weights.
pub const TSIT5_TABLEAU: Tableau = Tableau {
    name: "tsit5",
    c: &[0.0, 0.161, 0.327, 0.9, 0.9800255409045097, 1.0],
    a: &[
        &[],
        &[0.161],
        &[-0.008480655492356989, 0.335480655492357],
        &[2.898, -6.359447987781783, 4.361447987781783],
        &[
            5.325864858437957,
            -11.748883564062828,
            7.495539342889693,
            -0.09249506636030195,
        ],
        &[
            5.86145544294642,
            -12.92096931784711,
            8.159367898576159,
            -0.071584973281401,
            -0.02826857949054663,
        ],
    ],
    b: &[
        0.09646076681806523,
        0.01,
        0.4798896504144996,
        1.379008574103742,
        -3.290069515436099,
        2.324710524099774,
    ],
};

/// Fixed-step explicit Runge-Kutta stepper driven by a [`Tableau`].
pub struct ExplicitRungeKutta<T: Scalar> {
    tableau: &'static Tableau,
    stages: Vec<Vec<T>>,
    tmp: Vec<T>,
}

impl<T: Scalar> ExplicitRungeKutta<T> {
    pub fn new(tableau: &'static Tableau, dim: usize) -> Self {
        Self {
            tableau,
            stages: vec![vec![T::zero(); dim]; tableau.stages()],
            tmp: vec![T::zero(); dim],
        }
    }

    pub fn rk4(dim: usize) -> Self {
        Self::new(&RK4_TABLEAU, dim)
    }

    pub fn tsit5(dim: usize) -> Self {
        Self::new(&TSIT5_TABLEAU, dim)
    }

    pub fn tableau(&self) -> &'static Tableau {
        self.tableau
    }

    pub fn dimension(&self) -> usize {
        self.tmp.len()
    }
}

impl<T: Scalar> Steppable<T> for ExplicitRungeKutta<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let t0 = *t;
        let tableau = self.tableau;

        for s in 0..tableau.stages() {
            // tmp = y + dt * sum_j a[s][j] * k_j
            for i in 0..state.len() {
                let mut acc = T::zero();
                for (j, &weight) in tableau.a[s].iter().enumerate() {
                    acc = acc + T::lit(weight) * self.stages[j][i];
                }
                self.tmp[i] = state[i] + dt * acc;
            }
            system.apply(t0 + T::lit(tableau.c[s]) * dt, &self.tmp, &mut self.stages[s]);
        }

        for i in 0..state.len() {
            let mut acc = T::zero();
            for (j, &weight) in tableau.b.iter().enumerate() {
                acc = acc + T::lit(weight) * self.stages[j][i];
            }
            state[i] = state[i] + dt * acc;
        }

        *t = t0 + dt;
    }
}

/// Stepper choice exposed through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stepper {
    #[default]
    Rk4,
    Tsit5,
}

impl Stepper {
    pub fn tableau(self) -> &'static Tableau {
        match self {
            Stepper::Rk4 => &RK4_TABLEAU,
            Stepper::Tsit5 => &TSIT5_TABLEAU,
        }
    }

    pub fn build<T: Scalar>(self, dim: usize) -> ExplicitRungeKutta<T> {
        ExplicitRungeKutta::new(self.tableau(), dim)
    }

    pub fn as_str(self) -> &'static str {
        self.tableau().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rk4" => Some(Stepper::Rk4),
            "tsit5" => Some(Stepper::Tsit5),
            _ => None,
        }
    }
}

/// Integrates `state` over `[t, t + span]` using `substeps` equal steps.
/// A `substeps` of zero is treated as one.
pub fn integrate_span<T: Scalar>(
    stepper: &mut impl Steppable<T>,
    system: &impl DynamicalSystem<T>,
    t: &mut T,
    state: &mut [T],
    span: T,
    substeps: usize,
) {
    let count = substeps.max(1);
    let start = *t;
    let h = span / T::lit(count as f64);
    for _ in 0..count {
        stepper.step(system, t, state, h);
    }
    // Land exactly on the end of the span regardless of accumulated rounding.
    *t = start + span;
}

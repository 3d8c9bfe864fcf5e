//! One-shot closed-form calculators
//!
//! Unlike experiment kinds these are not stepped over time and touch no
//! entities: each call validates its inputs and returns a result struct.

pub mod biology;
pub mod chemistry;
pub mod physics;

pub use biology::{complementary_strand, ecosystem, Populations};
pub use chemistry::{reaction_rate, titration_curve, TitrationCurve, TitrationPoint};
pub use physics::{
    ohms_law, pendulum_period, pendulum_trace, thin_lens, CircuitSolution, LensImage,
    PendulumTrace,
};

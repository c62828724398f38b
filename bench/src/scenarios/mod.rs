//! Registry workloads with representative listener counts and event mixes.
//!
//! # Scenarios
//!
//! - **Mix**: a seeded random stream of three event types over a shared actor population
//! - **Churn**: listeners joining and leaving between fire calls

pub mod churn;
pub mod mix;

pub use churn::{ChurnConfig, ChurnScenario};
pub use mix::{MixConfig, MixScenario};

/// Common trait for benchmark scenarios.
pub trait Scenario {
    /// Human-readable name of the scenario.
    fn name(&self) -> &'static str;

    /// Brief description of what this scenario tests.
    fn description(&self) -> &'static str;

    /// Number of listeners registered once set up.
    fn listener_count(&self) -> usize;

    /// Create the registry and register the initial listeners.
    fn setup(&mut self);

    /// Run one round of the workload.
    fn update(&mut self);

    /// Unregister everything.
    fn teardown(&mut self);
}

//! Registration churn.
//!
//! A stable set of tickers stays registered while a rotating group joins, receives one
//! tick and leaves again. Measures registration and unregistration against a populated
//! binding, including the cached contract lookup.

use std::sync::Arc;

use rusty_bus::Registry;

use crate::fixtures::{Tick, Ticker};
use crate::scenarios::Scenario;

pub struct ChurnConfig {
    /// Tickers registered for the whole run.
    pub resident: usize,
    /// Tickers that join and leave every round.
    pub transient: usize,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            resident: 64,
            transient: 16,
        }
    }
}

pub struct ChurnScenario {
    config: ChurnConfig,
    registry: Registry,
    resident: Vec<Arc<Ticker>>,
    transient: Vec<Arc<Ticker>>,
}

impl ChurnScenario {
    pub fn with_config(config: ChurnConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            resident: Vec::new(),
            transient: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Scenario for ChurnScenario {
    fn name(&self) -> &'static str {
        "churn"
    }

    fn description(&self) -> &'static str {
        "listeners joining and leaving between fire calls"
    }

    fn listener_count(&self) -> usize {
        self.config.resident
    }

    fn setup(&mut self) {
        self.registry = Registry::new();
        self.resident = (0..self.config.resident)
            .map(|_| Arc::new(Ticker::default()))
            .collect();
        self.transient = (0..self.config.transient)
            .map(|_| Arc::new(Ticker::default()))
            .collect();
        for ticker in &self.resident {
            let _ = self.registry.register_listeners(ticker);
        }
    }

    fn update(&mut self) {
        for ticker in &self.transient {
            let _ = self.registry.register_listeners(ticker);
        }
        let _ = self.registry.fire_event(&Tick(1));
        for ticker in &self.transient {
            self.registry.unregister_listeners(ticker);
        }
    }

    fn teardown(&mut self) {
        for ticker in &self.resident {
            self.registry.unregister_listeners(ticker);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;

    #[test]
    fn transient_listeners_leave_after_each_round() {
        // Given
        let mut scenario = ChurnScenario::with_config(ChurnConfig {
            resident: 3,
            transient: 2,
        });
        scenario.setup();

        // When
        scenario.update();
        scenario.update();

        // Then
        assert_eq!(scenario.registry().listener_count::<Tick>(), 3);
        assert!(
            scenario
                .transient
                .iter()
                .all(|ticker| ticker.ticks.load(Ordering::Relaxed) == 2)
        );

        // When
        scenario.teardown();

        // Then
        assert_eq!(scenario.registry().listener_count::<Tick>(), 0);
    }

    #[test]
    fn describes_itself() {
        let scenario = ChurnScenario::with_config(ChurnConfig::default());
        assert_eq!(scenario.name(), "churn");
        assert!(scenario.description().starts_with("listeners joining"));
        assert_eq!(scenario.listener_count(), 64);
    }
}

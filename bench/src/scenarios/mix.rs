//! Random event mix.
//!
//! A population of [`Actor`]s listens for ticks, moves and damage. Each round fires a
//! batch of events whose types and payloads are drawn from a seeded generator, so runs are
//! comparable across machines and commits.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rusty_bus::{Event, Registry};

use crate::fixtures::{Actor, Damaged, Moved, Tick};
use crate::scenarios::Scenario;

/// Configuration for the event mix benchmark.
pub struct MixConfig {
    /// Actors registered for all three event types.
    pub actors: usize,
    /// Events fired per round.
    pub batch: usize,
    /// Relative weights of tick, move and damage events.
    pub weights: [u32; 3],
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            actors: 64,
            batch: 256,
            weights: [6, 3, 1],
            seed: 12345,
        }
    }
}

pub struct MixScenario {
    config: MixConfig,
    rng: ChaCha8Rng,
    registry: Registry,
    actors: Vec<Arc<Actor>>,
    fired: u64,
}

impl MixScenario {
    pub fn new() -> Self {
        Self::with_config(MixConfig::default())
    }

    pub fn with_config(config: MixConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            registry: Registry::new(),
            actors: Vec::new(),
            fired: 0,
        }
    }

    /// Total events fired so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Total handler invocations across all actors.
    pub fn handled(&self) -> u64 {
        self.actors.iter().map(|actor| actor.handled()).sum()
    }

    fn next_event(&mut self) -> Box<dyn Event> {
        let [tick, moved, _] = self.config.weights;
        let total: u32 = self.config.weights.iter().sum();
        let roll = self.rng.gen_range(0..total.max(1));
        if roll < tick {
            Box::new(Tick(self.fired))
        } else if roll < tick + moved {
            Box::new(Moved {
                x: self.rng.gen_range(-100.0..100.0),
                y: self.rng.gen_range(-100.0..100.0),
            })
        } else {
            Box::new(Damaged {
                amount: self.rng.gen_range(1..50),
            })
        }
    }
}

impl Default for MixScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario for MixScenario {
    fn name(&self) -> &'static str {
        "mix"
    }

    fn description(&self) -> &'static str {
        "seeded random stream of three event types over shared listeners"
    }

    fn listener_count(&self) -> usize {
        self.config.actors
    }

    fn setup(&mut self) {
        self.registry = Registry::new();
        self.actors = (0..self.config.actors)
            .map(|_| Arc::new(Actor::default()))
            .collect();
        for actor in &self.actors {
            // Actor contracts are well-formed and never conflict.
            let _ = self.registry.register_listeners(actor);
        }
    }

    fn update(&mut self) {
        for _ in 0..self.config.batch {
            let event = self.next_event();
            let _ = self.registry.fire_event(event.as_ref());
            self.fired += 1;
        }
    }

    fn teardown(&mut self) {
        for actor in &self.actors {
            self.registry.unregister_listeners(actor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_actor_handles_every_event() {
        // Given
        let mut scenario = MixScenario::with_config(MixConfig {
            actors: 4,
            batch: 32,
            ..Default::default()
        });
        scenario.setup();

        // When
        scenario.update();

        // Then
        assert_eq!(scenario.fired(), 32);
        assert_eq!(scenario.handled(), 32 * 4);
        assert_eq!(scenario.listener_count(), 4);
    }

    #[test]
    fn describes_itself() {
        let scenario = MixScenario::new();
        assert_eq!(scenario.name(), "mix");
        assert!(scenario.description().contains("three event types"));
    }

    #[test]
    fn same_seed_same_stream() {
        // Given
        let mut first = MixScenario::new();
        let mut second = MixScenario::new();

        // When
        let a: Vec<String> = (0..16).map(|_| format!("{:?}", first.next_event())).collect();
        let b: Vec<String> = (0..16).map(|_| format!("{:?}", second.next_event())).collect();

        // Then
        assert_eq!(a, b);
    }
}

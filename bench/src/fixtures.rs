//! Events, contracts and listeners shared by the benchmarks.
//!
//! Handlers do a single relaxed atomic add so the measurement is dominated by routing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rusty_bus::{Event, Handled, Listener, Registry, capability};

#[derive(Debug, Clone, Copy, Event)]
pub struct Tick(pub u64);

#[derive(Debug, Clone, Copy, Event)]
pub struct Moved {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Event)]
pub struct Damaged {
    pub amount: u32,
}

#[capability]
pub trait TickListener: Listener {
    fn on_tick(&self, event: &Tick);
}

#[capability]
pub trait MoveListener: Listener {
    fn on_move(&self, event: &Moved) -> Handled;
}

#[capability]
pub trait DamageListener: Listener {
    fn on_damage(&self, event: &Damaged);
}

/// Listens for ticks only.
#[derive(Default, Listener)]
#[listens(TickListener)]
pub struct Ticker {
    pub ticks: AtomicU64,
}

impl TickListener for Ticker {
    fn on_tick(&self, event: &Tick) {
        self.ticks.fetch_add(event.0, Ordering::Relaxed);
    }
}

/// Listens for every benchmark event.
#[derive(Default, Listener)]
#[listens(TickListener, MoveListener, DamageListener)]
pub struct Actor {
    pub handled: AtomicU64,
}

impl Actor {
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }
}

impl TickListener for Actor {
    fn on_tick(&self, _event: &Tick) {
        self.handled.fetch_add(1, Ordering::Relaxed);
    }
}

impl MoveListener for Actor {
    fn on_move(&self, event: &Moved) -> Handled {
        if event.x.is_nan() || event.y.is_nan() {
            return Err("position is not a number".into());
        }
        self.handled.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl DamageListener for Actor {
    fn on_damage(&self, event: &Damaged) {
        if event.amount > 0 {
            self.handled.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// A registry with `count` tickers registered, in order.
pub fn tickers(count: usize) -> rusty_bus::Result<(Registry, Vec<Arc<Ticker>>)> {
    let registry = Registry::new();
    let tickers: Vec<Arc<Ticker>> = (0..count).map(|_| Arc::new(Ticker::default())).collect();
    for ticker in &tickers {
        registry.register_listeners(ticker)?;
    }
    Ok((registry, tickers))
}

use rusty_bus::{Event, Listener, capability};

/// An RGB background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
  pub const DEFAULT: Rgb = Rgb(238, 238, 238);
  pub const RED: Rgb = Rgb(255, 175, 175);
  pub const BLUE: Rgb = Rgb(175, 175, 255);
}

impl std::fmt::Display for Rgb {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
  }
}

#[derive(Debug, Event)]
pub struct RedEvent {
  pub color: Rgb,
}

#[derive(Debug, Event)]
pub struct BlueEvent;

#[derive(Debug, Event)]
pub struct ResetEvent;

#[capability]
pub trait RedEventListener: Listener {
  fn on_red(&self, event: &RedEvent);
}

#[capability]
pub trait BlueEventListener: Listener {
  fn on_blue(&self, event: &BlueEvent);
}

#[capability]
pub trait ResetEventListener: Listener {
  fn on_reset(&self, event: &ResetEvent);
}

use std::sync::{Arc, Mutex, PoisonError};

use rusty_bus::{Listener, Registry};

use crate::events::{
  BlueEvent, BlueEventListener, RedEvent, RedEventListener, ResetEvent, ResetEventListener, Rgb,
};

/// A labelled area with a background colour.
pub struct Panel {
  label: &'static str,
  background: Mutex<Rgb>,
}

impl Panel {
  fn new(label: &'static str) -> Self {
    Self {
      label,
      background: Mutex::new(Rgb::DEFAULT),
    }
  }

  pub fn label(&self) -> &'static str {
    self.label
  }

  pub fn background(&self) -> Rgb {
    *self.background.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn paint(&self, color: Rgb) {
    *self.background.lock().unwrap_or_else(PoisonError::into_inner) = color;
  }
}

/// Anything shown in the demo window.
pub trait View: Send + Sync {
  fn panel(&self) -> &Panel;
}

#[derive(Listener)]
#[listens(RedEventListener, ResetEventListener)]
pub struct RedPanel {
  panel: Panel,
}

impl RedEventListener for RedPanel {
  fn on_red(&self, event: &RedEvent) {
    self.panel.paint(event.color);
  }
}

impl ResetEventListener for RedPanel {
  fn on_reset(&self, _event: &ResetEvent) {
    self.panel.paint(Rgb::DEFAULT);
  }
}

#[derive(Listener)]
#[listens(BlueEventListener, ResetEventListener)]
pub struct BluePanel {
  panel: Panel,
}

impl BlueEventListener for BluePanel {
  fn on_blue(&self, _event: &BlueEvent) {
    self.panel.paint(Rgb::BLUE);
  }
}

impl ResetEventListener for BluePanel {
  fn on_reset(&self, _event: &ResetEvent) {
    self.panel.paint(Rgb::DEFAULT);
  }
}

#[derive(Listener)]
#[listens(RedEventListener, BlueEventListener, ResetEventListener)]
pub struct BlueRedPanel {
  panel: Panel,
}

impl RedEventListener for BlueRedPanel {
  fn on_red(&self, event: &RedEvent) {
    self.panel.paint(event.color);
  }
}

impl BlueEventListener for BlueRedPanel {
  fn on_blue(&self, _event: &BlueEvent) {
    self.panel.paint(Rgb::BLUE);
  }
}

impl ResetEventListener for BlueRedPanel {
  fn on_reset(&self, _event: &ResetEvent) {
    self.panel.paint(Rgb::DEFAULT);
  }
}

macro_rules! view {
  ($($ty:ident),*) => {
    $(impl View for $ty {
      fn panel(&self) -> &Panel {
        &self.panel
      }
    })*
  };
}

view!(RedPanel, BluePanel, BlueRedPanel);

/// Build the three demo panels and register each with `registry`.
pub fn build(registry: &Registry) -> rusty_bus::Result<Vec<Arc<dyn View>>> {
  let red = Arc::new(RedPanel {
    panel: Panel::new("RED"),
  });
  let blue = Arc::new(BluePanel {
    panel: Panel::new("BLUE"),
  });
  let both = Arc::new(BlueRedPanel {
    panel: Panel::new("RED & BLUE"),
  });

  registry.register_listeners(&red)?;
  registry.register_listeners(&blue)?;
  registry.register_listeners(&both)?;

  Ok(vec![red as Arc<dyn View>, blue, both])
}

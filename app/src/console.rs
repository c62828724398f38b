use std::sync::Arc;

use crossbeam::channel::Receiver;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use rusty_bus::Registry;
use rusty_bus::logger::LogMessage;

use crate::events::{BlueEvent, RedEvent, ResetEvent, Rgb};
use crate::panels::View;

const HELP: &str = "commands: red | blue | reset | describe | help | quit";

/// What the console should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Quit,
}

struct Internal {
  registry: Arc<Registry>,
  views: Vec<Arc<dyn View>>,
}

impl Internal {
  fn handle_command(&self, command: &str) -> Flow {
    let fired = match command {
      "red" => self.registry.fire_event(&RedEvent { color: Rgb::RED }),
      "blue" => self.registry.fire_event(&BlueEvent),
      "reset" => self.registry.fire_event(&ResetEvent),
      "describe" => {
        print!("{}", self.registry);
        return Flow::Continue;
      }
      "quit" | "exit" => return Flow::Quit,
      "" => return Flow::Continue,
      "help" => {
        println!("{HELP}");
        return Flow::Continue;
      }
      other => {
        println!("unknown command '{other}', {HELP}");
        return Flow::Continue;
      }
    };

    match fired {
      Ok(()) => self.show_panels(),
      Err(err) => println!("error: {err}"),
    }
    Flow::Continue
  }

  fn show_panels(&self) {
    for view in &self.views {
      let panel = view.panel();
      println!("  [{:<10}] {}", panel.label(), panel.background());
    }
  }
}

/// Line-oriented control surface for the demo panels.
pub struct Console {
  internal: Internal,
  log_recv: Receiver<LogMessage>,
}

impl Console {
  pub fn new(
    registry: Arc<Registry>,
    views: Vec<Arc<dyn View>>,
    log_recv: Receiver<LogMessage>,
  ) -> Self {
    Self {
      internal: Internal { registry, views },
      log_recv,
    }
  }

  pub fn handle_command(&self, command: &str) -> Flow {
    let flow = self.internal.handle_command(command.trim());
    self.drain_log();
    flow
  }

  /// Read commands until `quit`, end of input or interrupt.
  pub fn run(&self) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    self.drain_log();
    self.internal.show_panels();
    println!("{HELP}");

    loop {
      match editor.readline("bus> ") {
        Ok(line) => {
          let _ = editor.add_history_entry(line.as_str());
          if self.handle_command(&line) == Flow::Quit {
            break;
          }
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
        Err(err) => return Err(err.into()),
      }
    }
    Ok(())
  }

  fn drain_log(&self) {
    for message in self.log_recv.try_iter() {
      println!("[{:<5} {}] {}", message.level, message.target, message.message);
    }
  }
}

#[cfg(test)]
mod tests {
  use crossbeam::channel::unbounded;

  use super::*;
  use crate::panels;

  fn console() -> (Console, Arc<Registry>) {
    let registry = Arc::new(Registry::new());
    let views = panels::build(&registry).unwrap();
    let (_sender, receiver) = unbounded();
    (Console::new(Arc::clone(&registry), views, receiver), registry)
  }

  #[test]
  fn quit_ends_the_session() {
    // Given
    let (console, _) = console();

    // When
    let flow = console.handle_command("  quit ");

    // Then
    assert_eq!(flow, Flow::Quit);
  }

  #[test]
  fn colour_commands_repaint_panels() {
    // Given
    let (console, _) = console();

    // When
    let flow = console.handle_command("blue");

    // Then
    assert_eq!(flow, Flow::Continue);
    let backgrounds: Vec<Rgb> = console
      .internal
      .views
      .iter()
      .map(|view| view.panel().background())
      .collect();
    assert_eq!(backgrounds, vec![Rgb::DEFAULT, Rgb::BLUE, Rgb::BLUE]);
  }

  #[test]
  fn unknown_commands_are_ignored() {
    // Given
    let (console, registry) = console();

    // When
    let flow = console.handle_command("green");

    // Then
    assert_eq!(flow, Flow::Continue);
    assert_eq!(registry.binding_count(), 3);
  }
}

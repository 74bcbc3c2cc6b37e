//! Command registry and execution context
//!
//! Commands self-describe (name, summaries, per-argument help) and are
//! collected into the registry by explicit registration calls at startup,
//! so the table is deterministic and the top-level dispatch loop can find
//! a command by name without one central wiring site.

use modwatch_core::{Config, Dispatcher, ModwatchError};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;

/// Everything a command gets to work with: its arguments, the loaded
/// configuration, the shared dispatcher, and the advisory shutdown flag
/// set by the interrupt handler.
pub struct CommandContext<'a> {
    pub args: &'a [String],
    pub config: &'a Config,
    pub dispatcher: &'a Dispatcher,
    pub shutdown: &'a AtomicBool,
}

pub type Execute = fn(&CommandContext) -> Result<(), ModwatchError>;

pub struct Command {
    pub name: &'static str,
    pub summary: &'static str,
    pub details: &'static str,
    pub arg_summary: &'static str,
    pub arg_details: &'static [(&'static str, &'static str)],
    pub execute: Execute,
}

pub struct Registry {
    table: BTreeMap<&'static str, Command>,
}

impl Registry {
    /// Builds the full command table. Registration order does not matter;
    /// the table iterates alphabetically for usage output.
    pub fn build() -> Self {
        let mut registry = Self {
            table: BTreeMap::new(),
        };
        crate::commands::register_all(&mut registry);
        registry
    }

    pub fn add(&mut self, command: Command) {
        self.table.insert(command.name, command);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.table.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.table.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_registers_every_command() {
        let registry = Registry::build();
        for name in [
            "ban-events",
            "bans",
            "followers",
            "following",
            "helix",
            "info",
            "kraken",
            "oauth-authorize",
            "oauth-revoke",
            "oauth-validate",
        ] {
            assert!(registry.get(name).is_some(), "command '{}' missing", name);
        }
    }

    #[test]
    fn unknown_command_is_not_found() {
        let registry = Registry::build();
        assert!(registry.get("frobnicate").is_none());
    }

    #[test]
    fn iteration_is_alphabetical() {
        let registry = Registry::build();
        let names: Vec<&str> = registry.iter().map(|command| command.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}

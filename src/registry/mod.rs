//! Name to command table shared by the loader, dispatcher and help listing.

mod entry;

use std::collections::HashMap;

pub use entry::{CommandEntry, Origin, Procedure, ProcedureResult};

/// Authoritative `name -> CommandEntry` table for one process.
///
/// The first entry registered under a name wins; later ones are refused.
#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, CommandEntry>,
    order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `entry` unless its name is taken. Returns `false` on collision.
    pub fn insert(&mut self, entry: CommandEntry) -> bool {
        if self.commands.contains_key(entry.name()) {
            return false;
        }
        let name = entry.name().to_string();
        self.order.push(name.clone());
        self.commands.insert(name, entry);
        true
    }

    /// Case-sensitive exact lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    /// Entries with a non-empty description, sorted by name.
    pub fn list(&self) -> Vec<&CommandEntry> {
        let mut visible: Vec<&CommandEntry> = self
            .commands
            .values()
            .filter(|entry| !entry.is_hidden())
            .collect();
        visible.sort_by(|a, b| a.name().cmp(b.name()));
        visible
    }

    /// Every entry in registration order.
    pub fn all(&self) -> impl Iterator<Item = &CommandEntry> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.all()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, description: &str) -> CommandEntry {
        CommandEntry::new(name, |_, _| Ok(None)).with_description(description)
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = Registry::new();
        assert!(registry.insert(entry("add", "first")));
        assert!(!registry.insert(entry("add", "second")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("add").unwrap().description(), "first");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut registry = Registry::new();
        registry.insert(entry("Add", "mixed case"));

        assert!(registry.lookup("Add").is_some());
        assert!(registry.lookup("add").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn list_skips_hidden_entries_and_sorts_by_name() {
        let mut registry = Registry::new();
        registry.insert(entry("zeta", "last"));
        registry.insert(entry("secret", ""));
        registry.insert(entry("alpha", "first"));

        let names: Vec<&str> = registry.list().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn all_keeps_registration_order() {
        let mut registry = Registry::new();
        registry.insert(entry("zeta", "last"));
        registry.insert(entry("secret", ""));
        registry.insert(entry("alpha", "first"));

        let names: Vec<&str> = registry.all().map(|e| e.name()).collect();
        assert_eq!(names, vec!["zeta", "secret", "alpha"]);
        assert_eq!(registry.names().count(), 3);
    }
}

//! Help listing built from the registry's visible entries.

use crate::registry::Registry;

/// `(name, description)` pairs for every entry with a description, sorted by name.
pub fn format(registry: &Registry) -> Vec<(&str, &str)> {
    registry
        .list()
        .into_iter()
        .map(|entry| (entry.name(), entry.description()))
        .collect()
}

/// The listing rendered as `name: description` lines.
pub fn render(registry: &Registry) -> Vec<String> {
    format(registry)
        .into_iter()
        .map(|(name, description)| format!("{name}: {description}"))
        .collect()
}

//! Action registry: canonical action name -> failure-isolated unit.
//!
//! Built once at startup by [`build_registry`] and read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use remocon_core::Action;

use crate::alias::StringAlias;
use crate::isolation::FailureIsolated;
use crate::normalize::action_name;
use crate::types::{AliasDefinition, EntryKind};

/// Configuration-time registry violations. All of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Action name must not contain whitespaces (violated by {raw:?})")]
    WhitespaceInName { raw: String },

    #[error("Empty action name is not allowed: {raw:?}")]
    EmptyActionName { raw: String },

    #[error("Attempt to redefine action {name:?} (in `actions`)")]
    DuplicateAction { name: String },

    #[error("Empty alias name is not allowed: {raw:?}")]
    EmptyAliasName { raw: String },

    #[error("Attempt to redefine an alias {raw:?} (in `aliases`)")]
    DuplicateAlias { raw: String },

    #[error("Attempt to overwrite an existing action by alias {raw:?} (in `aliases`)")]
    AliasShadowsAction { raw: String },

    #[error(
        "Alias {alias:?} relies on the action {base:?} which does not exist. \
         Note that aliases for aliases are not supported"
    )]
    MissingBase { alias: String, base: String },
}

struct Entry {
    kind: EntryKind,
    unit: Arc<dyn Action>,
}

/// Immutable mapping from canonical action name to executable unit.
#[derive(Default)]
pub struct ActionRegistry {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
}

impl ActionRegistry {
    /// Look up a unit by canonical name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.entries.get(name).map(|e| Arc::clone(&e.unit))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<EntryKind> {
        self.entries.get(name).map(|e| e.kind)
    }

    /// Entries in registration order: actions first, then aliases.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Action>)> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name).map(|e| (name.as_str(), &e.unit)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn count(&self, kind: EntryKind) -> usize {
        self.entries.values().filter(|e| e.kind == kind).count()
    }

    fn insert(&mut self, name: String, kind: EntryKind, unit: Arc<dyn Action>) {
        self.order.push(name.clone());
        self.entries.insert(name, Entry { kind, unit: FailureIsolated::wrap(unit) });
    }
}

/// Lowercase, trim and strip leading slashes from a configured key.
pub fn canonicalize_key(raw: &str) -> Result<String, RegistryError> {
    let key = raw.trim().trim_start_matches('/').to_lowercase();
    if key.chars().any(char::is_whitespace) {
        return Err(RegistryError::WhitespaceInName { raw: raw.to_string() });
    }
    Ok(key)
}

/// Build the registry from ordered action and alias definitions.
///
/// Actions are registered first; aliases may only reference actions, never
/// other aliases. Every registered unit is wrapped in [`FailureIsolated`].
pub fn build_registry(
    actions: Vec<(String, Arc<dyn Action>)>,
    aliases: Vec<(String, AliasDefinition)>,
) -> Result<ActionRegistry, RegistryError> {
    let mut registry = ActionRegistry::default();

    for (raw, unit) in actions {
        debug!(raw = ?raw, "Processing action");
        let name = canonicalize_key(&raw)?;
        if name.is_empty() {
            return Err(RegistryError::EmptyActionName { raw });
        }
        if registry.contains(&name) {
            return Err(RegistryError::DuplicateAction { name });
        }
        registry.insert(name, EntryKind::Base, unit);
    }

    for (raw, definition) in aliases {
        debug!(raw = ?raw, "Processing alias");
        let name = canonicalize_key(&raw)?;
        if name.is_empty() {
            return Err(RegistryError::EmptyAliasName { raw });
        }
        match registry.kind(&name) {
            Some(EntryKind::Alias) => return Err(RegistryError::DuplicateAlias { raw }),
            Some(EntryKind::Base) => return Err(RegistryError::AliasShadowsAction { raw }),
            None => {}
        }

        let unit: Arc<dyn Action> = match definition {
            AliasDefinition::StringAlias(text) => {
                let base_name = action_name(&text);
                let base = match registry.kind(&base_name) {
                    Some(EntryKind::Base) => registry.get(&base_name),
                    _ => None,
                };
                let Some(base) = base else {
                    return Err(RegistryError::MissingBase { alias: raw, base: base_name });
                };
                Arc::new(StringAlias::new(&text, base))
            }
            AliasDefinition::CustomAlias(unit) => unit,
        };
        registry.insert(name, EntryKind::Alias, unit);
    }

    Ok(registry)
}

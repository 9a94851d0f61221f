/// Registry input types.
use std::fmt;
use std::sync::Arc;

use remocon_core::Action;

/// How an alias is defined.
#[derive(Clone)]
pub enum AliasDefinition {
    /// A command text such as `"/shell ls -la"`: forwards to the named base
    /// action with the text after its first token prepended to the caller's rest.
    StringAlias(String),
    /// An arbitrary unit registered under the alias name.
    CustomAlias(Arc<dyn Action>),
}

impl fmt::Debug for AliasDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasDefinition::StringAlias(text) => f.debug_tuple("StringAlias").field(text).finish(),
            AliasDefinition::CustomAlias(_) => f.write_str("CustomAlias(..)"),
        }
    }
}

/// Whether an entry of the registry came from `actions` or `aliases`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Base,
    Alias,
}

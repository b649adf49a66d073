//! Command registry.
//!
//! Commands are registered once at startup under a primary name plus any
//! number of aliases. Descriptors are immutable and shared through `Arc`;
//! aliases only point at a primary name, never at a descriptor of their own.

mod context;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

pub use context::CommandContext;

/// Menu category of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    General,
    Quran,
    Quiz,
    Media,
    Owner,
}

impl Category {
    /// i18n key of the category heading.
    pub fn key(self) -> &'static str {
        match self {
            Self::General => "menu.general",
            Self::Quran => "menu.quran",
            Self::Quiz => "menu.quiz",
            Self::Media => "menu.media",
            Self::Owner => "menu.owner",
        }
    }
}

/// Who may run a command and where.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionFlags {
    pub owner_only: bool,
    pub group_only: bool,
    pub private_only: bool,
}

/// Executor of a command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()>;
}

/// A registered command.
pub struct CommandDescriptor {
    pub name: String,
    pub aliases: Vec<String>,
    pub permissions: PermissionFlags,
    pub category: Category,
    /// i18n key of the one-line description shown in menus.
    pub description: &'static str,
    handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    pub fn new(
        name: &str,
        category: Category,
        description: &'static str,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.to_lowercase(),
            aliases: Vec::new(),
            permissions: PermissionFlags::default(),
            category,
            description,
            handler: Arc::new(handler),
        }
    }

    #[must_use]
    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| a.to_lowercase()));
        self
    }

    #[must_use]
    pub fn owner_only(mut self) -> Self {
        self.permissions.owner_only = true;
        self
    }

    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn group_only(mut self) -> Self {
        self.permissions.group_only = true;
        self
    }

    #[must_use]
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn private_only(mut self) -> Self {
        self.permissions.private_only = true;
        self
    }

    pub async fn execute(&self, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
        self.handler.execute(ctx).await
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("permissions", &self.permissions)
            .field("category", &self.category)
            .finish()
    }
}

/// Name/alias to descriptor mapping. Read-only once built.
#[derive(Default)]
pub struct CommandRegistry {
    /// Primary name -> descriptor.
    descriptors: BTreeMap<String, Arc<CommandDescriptor>>,
    /// Any token (primary name or alias) -> primary name.
    lookup: HashMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name and every alias.
    ///
    /// A token that is already taken is overwritten (last registration wins)
    /// and a warning is logged.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        let name = descriptor.name.clone();
        let tokens: Vec<String> = std::iter::once(name.clone())
            .chain(descriptor.aliases.iter().cloned())
            .collect();

        if self.descriptors.contains_key(&name) {
            warn!("Command '{}' registered twice, replacing previous descriptor", name);
        }

        for token in tokens {
            if let Some(previous) = self.lookup.insert(token.clone(), name.clone())
                && previous != name
            {
                warn!(
                    "Command token '{}' reassigned from '{}' to '{}'",
                    token, previous, name
                );
            }
        }

        debug!("Registered command: {}", name);
        self.descriptors.insert(name, Arc::new(descriptor));
    }

    /// Resolve a command token (already lowercased) to its descriptor.
    pub fn resolve(&self, token: &str) -> Option<Arc<CommandDescriptor>> {
        self.lookup
            .get(token)
            .and_then(|name| self.descriptors.get(name))
            .cloned()
    }

    /// All descriptors, once each, ordered by name.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn list_unique(&self) -> Vec<Arc<CommandDescriptor>> {
        self.descriptors.values().cloned().collect()
    }

    /// Descriptors grouped by category.
    pub fn by_category(&self) -> BTreeMap<Category, Vec<Arc<CommandDescriptor>>> {
        let mut groups: BTreeMap<Category, Vec<Arc<CommandDescriptor>>> = BTreeMap::new();
        for descriptor in self.descriptors.values() {
            groups
                .entry(descriptor.category)
                .or_default()
                .push(Arc::clone(descriptor));
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }
}

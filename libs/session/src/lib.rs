mod memory;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sitebot_core::{PublishedSite, UserId};

pub use memory::MemorySessionStore;

/// Shared session store handle used across the bot.
pub type SharedSessionStore = Arc<dyn SessionStore>;

/// Where a user currently is in the create-site conversation.
///
/// The pending site name only exists while a file is awaited, so it lives
/// inside the `AwaitingFile` variant rather than as a separate field that
/// could drift out of sync with the step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    #[default]
    Idle,
    AwaitingName,
    AwaitingFile {
        name: String,
    },
}

/// Per-user conversation state plus the user's publish history.
///
/// Created on first interaction, held in process memory indefinitely and
/// lost on restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub step: Step,
    #[serde(default)]
    pub sites: Vec<PublishedSite>,
}

impl Session {
    /// Returns the step to `Idle`, dropping any pending name. The publish
    /// history is retained.
    pub fn reset_step(&mut self) {
        self.step = Step::Idle;
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, user: UserId) -> Result<Option<Session>>;
    async fn save(&self, user: UserId, session: Session) -> Result<()>;
    async fn delete(&self, user: UserId) -> Result<()>;
}

/// Returns an in-memory session store wrapped in an [`Arc`].
pub fn shared_memory_store() -> SharedSessionStore {
    Arc::new(MemorySessionStore::new())
}

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use sitebot_core::UserId;

use crate::{Session, SessionStore};

/// Process-local session store. Per-entry atomicity is all the bot needs
/// since events for one user are handled sequentially.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<i64, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, user: UserId) -> Result<Option<Session>> {
        Ok(self.sessions.get(&user.0).map(|entry| entry.value().clone()))
    }

    async fn save(&self, user: UserId, session: Session) -> Result<()> {
        self.sessions.insert(user.0, session);
        Ok(())
    }

    async fn delete(&self, user: UserId) -> Result<()> {
        self.sessions.remove(&user.0);
        Ok(())
    }
}
